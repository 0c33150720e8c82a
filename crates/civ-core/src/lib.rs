//! Shared model for gitlab-ci-validate: outcomes, errors, endpoint
//! configuration and run aggregation.

pub mod endpoint;
pub mod error;
pub mod outcome;
pub mod report;

pub use endpoint::*;
pub use error::*;
pub use outcome::*;
pub use report::*;

/// Exit status when the lint endpoint rejects our credentials.
pub const AUTH_FAILURE_EXIT_CODE: u8 = 1;
