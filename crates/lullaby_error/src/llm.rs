//! Chat-completion provider errors and retry classification.

/// Failure conditions when talking to an OpenAI-compatible endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum LlmErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Non-success HTTP status returned by the API
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the API
        message: String,
    },
    /// Could not reach the API
    #[display("Connection failed: {}", _0)]
    Connection(String),
    /// Request exceeded its timeout
    #[display("Request timed out after {}s", _0)]
    Timeout(u64),
    /// Response carried no choices or empty content
    #[display("Empty response from API")]
    EmptyResponse,
    /// Response body could not be decoded
    #[display("Failed to parse API response: {}", _0)]
    ResponseParsing(String),
    /// Request limiter was shut down
    #[display("Rate limiter closed")]
    RateLimiterClosed,
}

impl LlmErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Rate limits, server errors, connection failures, and timeouts are
    /// transient. Authentication failures and malformed requests are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            LlmErrorKind::Connection(_) => true,
            LlmErrorKind::Timeout(_) => true,
            _ => false,
        }
    }
}

/// LLM provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use lullaby_error::{LlmError, LlmErrorKind};
///
/// let err = LlmError::new(LlmErrorKind::MissingApiKey("OPENAI_API_KEY".to_string()));
/// assert!(format!("{}", err).contains("OPENAI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("LLM Error: {} at line {} in {}", kind, line, file)]
pub struct LlmError {
    /// The kind of error that occurred
    pub kind: LlmErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl LlmError {
    /// Create a new LlmError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LlmErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use lullaby_error::{LlmError, LlmErrorKind, RetryableError};
///
/// let err = LlmError::new(LlmErrorKind::Http {
///     status_code: 429,
///     message: "Rate limit reached".to_string(),
/// });
///
/// assert!(err.is_retryable());
///
/// let auth = LlmError::new(LlmErrorKind::Http {
///     status_code: 401,
///     message: "Invalid API key".to_string(),
/// });
/// assert!(!auth.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for LlmError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
