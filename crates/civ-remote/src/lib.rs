//! Client for the GitLab CI lint endpoint.

pub mod client;
pub mod request;
pub mod response;
#[cfg(any(test, feature = "stub"))]
pub mod stub;
pub mod transport;

pub use client::*;
pub use request::*;
pub use response::*;
#[cfg(any(test, feature = "stub"))]
pub use stub::*;
pub use transport::*;
