//! Reasoning provider trait and request types.

use serde_json::Value;
use thiserror::Error;

/// Failure classes a provider can report.
///
/// The retryable/fatal split drives the gateway's backoff decision:
/// rate limiting and transient transport problems are worth retrying,
/// authentication and malformed-request failures never are.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Explicit "too many requests" signal.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Transport failure or server-side error, likely transient.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Authentication or authorization failure.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request itself was rejected as malformed.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ProviderError {
    /// Whether the gateway may retry after this failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_) | ProviderError::Transient(_))
    }
}

/// The structural shape an operation expects back.
///
/// The gateway vets the raw JSON against this before deserializing, so a
/// collaborator answering with the wrong top-level structure degrades the
/// same way any other malformed response does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON array of objects.
    Array,
    /// A single JSON object.
    Object,
}

impl ResponseShape {
    /// Whether a parsed JSON value has this top-level shape.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ResponseShape::Array => value.is_array(),
            ResponseShape::Object => value.is_object(),
        }
    }
}

/// One request to the reasoning collaborator.
///
/// The payload is always a bounded sample; the instruction describes the
/// operation and the exact JSON shape expected back.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Operation name, for logging.
    pub operation: &'static str,
    /// Operation-specific instruction text.
    pub instruction: String,
    /// Bounded data payload sent alongside the instruction.
    pub payload: Value,
    /// Expected response shape.
    pub expects: ResponseShape,
}

impl CompletionRequest {
    /// Create a new request.
    pub fn new(
        operation: &'static str,
        instruction: String,
        payload: Value,
        expects: ResponseShape,
    ) -> Self {
        Self {
            operation,
            instruction,
            payload,
            expects,
        }
    }
}

/// Capability seam for the external reasoning service.
///
/// Implementations must be thread-safe (Send + Sync) so a gateway can be
/// shared across operations. Providers return raw text; parsing and
/// schema validation belong to the gateway.
pub trait ReasoningProvider: Send + Sync {
    /// Send one request and return the raw response text.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError>;

    /// Provider name, for logging.
    fn name(&self) -> &str;
}
