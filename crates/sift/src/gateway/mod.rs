//! Resilient gateway to the external reasoning service.
//!
//! Every call to the reasoning collaborator goes through [`Gateway::execute`],
//! which adds retry with exponential backoff, immediate propagation of
//! non-retryable failures, and schema validation of the response. A response
//! that is reachable but malformed degrades to the operation's empty default
//! rather than an error, so "the assistant found nothing to suggest" and
//! "the assistant is unreachable" stay distinguishable for callers.

mod anthropic;
mod mock;
mod provider;
mod retry;

pub use anthropic::{AnthropicProvider, ProviderConfig};
pub use mock::MockProvider;
pub use provider::{CompletionRequest, ProviderError, ReasoningProvider, ResponseShape};
pub use retry::RetryPolicy;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Result, SiftError};

type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Retry-resilient mediator between the core and a reasoning provider.
///
/// The gateway owns no dataset state and is freely reentrant.
pub struct Gateway {
    provider: Arc<dyn ReasoningProvider>,
    policy: RetryPolicy,
    sleep: SleepFn,
}

impl Gateway {
    /// Create a gateway around a provider with the default retry policy.
    pub fn new(provider: impl ReasoningProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            policy: RetryPolicy::default(),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Set the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the sleep function. Tests use this to record backoff delays
    /// instead of actually waiting.
    pub fn with_sleep_fn(mut self, sleep: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    /// Execute one operation against the reasoning service.
    ///
    /// Retries retryable provider failures within the policy's budget.
    /// Non-retryable failures and exhausted budgets surface as
    /// [`SiftError::Gateway`]. A reachable response that fails schema
    /// validation returns `T::default()` instead of an error.
    pub fn execute<T: DeserializeOwned + Default>(&self, request: &CompletionRequest) -> Result<T> {
        let mut attempt = 0u32;
        loop {
            match self.provider.complete(request) {
                Ok(raw) => return Ok(self.parse_response(request, &raw)),
                Err(error) => match self.policy.next_delay(attempt, &error) {
                    Some(delay) => {
                        debug!(
                            operation = request.operation,
                            provider = self.provider.name(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            %error,
                            "retrying gateway call"
                        );
                        (self.sleep)(delay);
                        attempt += 1;
                    }
                    None => {
                        return Err(SiftError::Gateway {
                            attempts: attempt + 1,
                            message: error.to_string(),
                        });
                    }
                },
            }
        }
    }

    fn parse_response<T: DeserializeOwned + Default>(
        &self,
        request: &CompletionRequest,
        raw: &str,
    ) -> T {
        let body = match serde_json::from_str::<serde_json::Value>(extract_json(raw)) {
            Ok(value) => value,
            Err(error) => {
                warn!(
                    operation = request.operation,
                    provider = self.provider.name(),
                    %error,
                    "response is not valid JSON, using empty default"
                );
                return T::default();
            }
        };

        if !request.expects.matches(&body) {
            warn!(
                operation = request.operation,
                provider = self.provider.name(),
                expected = ?request.expects,
                "response has the wrong top-level shape, using empty default"
            );
            return T::default();
        }

        match serde_json::from_value(body) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(
                    operation = request.operation,
                    provider = self.provider.name(),
                    %error,
                    "response failed schema validation, using empty default"
                );
                T::default()
            }
        }
    }
}

/// Extract the JSON body from a response, stripping markdown code fences
/// when the model wraps its answer in one.
fn extract_json(response: &str) -> &str {
    if response.contains("```json") {
        response
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .unwrap_or(response)
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}
