//! Mock reasoning provider for tests and offline use.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::provider::{CompletionRequest, ProviderError, ReasoningProvider};

/// One scripted reply.
#[derive(Debug, Clone)]
enum ScriptedReply {
    Text(String),
    Fail(ProviderError),
}

#[derive(Default)]
struct MockInner {
    replies: Mutex<VecDeque<ScriptedReply>>,
    operations: Mutex<Vec<&'static str>>,
}

/// Scripted provider that replays queued replies in order.
///
/// Cheaply cloneable; clones share the same script and call log, so a test
/// can keep a handle after moving the provider into a [`super::Gateway`].
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<MockInner>,
}

impl MockProvider {
    /// Create an empty mock. With no scripted replies every call fails
    /// with a non-retryable error.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw text reply.
    pub fn reply_with(self, text: impl Into<String>) -> Self {
        self.inner
            .replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Text(text.into()));
        self
    }

    /// Queue a JSON reply.
    pub fn reply_with_json(self, value: serde_json::Value) -> Self {
        let text = value.to_string();
        self.reply_with(text)
    }

    /// Queue a failure.
    pub fn fail_with(self, error: ProviderError) -> Self {
        self.inner
            .replies
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Fail(error));
        self
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.inner.operations.lock().unwrap().len()
    }

    /// Operation names received, in call order.
    pub fn operations(&self) -> Vec<&'static str> {
        self.inner.operations.lock().unwrap().clone()
    }
}

impl ReasoningProvider for MockProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        self.inner.operations.lock().unwrap().push(request.operation);

        match self.inner.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(error)) => Err(error),
            None => Err(ProviderError::BadRequest(format!(
                "no scripted reply for operation '{}'",
                request.operation
            ))),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ResponseShape;

    fn request(operation: &'static str) -> CompletionRequest {
        CompletionRequest::new(
            operation,
            "noop".to_string(),
            serde_json::json!({}),
            ResponseShape::Object,
        )
    }

    #[test]
    fn test_replies_in_order() {
        let mock = MockProvider::new().reply_with("first").reply_with("second");

        assert_eq!(mock.complete(&request("a")).unwrap(), "first");
        assert_eq!(mock.complete(&request("b")).unwrap(), "second");
        assert_eq!(mock.operations(), vec!["a", "b"]);
    }

    #[test]
    fn test_exhausted_script_fails_non_retryably() {
        let mock = MockProvider::new();
        let err = mock.complete(&request("audit")).unwrap_err();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockProvider::new().reply_with("only");
        let clone = mock.clone();

        clone.complete(&request("x")).unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
