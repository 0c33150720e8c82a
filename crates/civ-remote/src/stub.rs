use std::collections::VecDeque;
use std::sync::Mutex;

use civ_core::LintError;

use crate::transport::{LintHttpRequest, LintHttpResponse, LintTransport};

/// In-memory transport: replays queued replies in order and records every
/// request it was given.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<Result<LintHttpResponse, String>>>,
    sent: Mutex<Vec<LintHttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(LintHttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }));
        self
    }

    /// Queue a connection-level failure.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(message.to_string()));
        self
    }

    pub fn sent(&self) -> Vec<LintHttpRequest> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn push(&self, reply: Result<LintHttpResponse, String>) {
        self.replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }
}

impl LintTransport for StubTransport {
    async fn send(&self, request: LintHttpRequest) -> Result<LintHttpResponse, LintError> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        let next = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match next {
            Some(Ok(resp)) => Ok(resp),
            Some(Err(msg)) => Err(LintError::Transport(msg)),
            None => Err(LintError::Transport("stub transport has no reply queued".into())),
        }
    }
}
