//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, JsonError, LlmError, RetryableError, StoryError};
#[cfg(feature = "database")]
use crate::DatabaseError;
#[cfg(feature = "tui")]
use crate::TuiError;

/// Every failure domain in the workspace, one variant each.
///
/// # Examples
///
/// ```
/// use lullaby_error::{LullabyError, JsonError};
///
/// let json_err = JsonError::new("trailing characters");
/// let err: LullabyError = json_err.into();
/// assert!(format!("{}", err).contains("JSON Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LullabyErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Chat-completion provider error
    #[from(LlmError)]
    Llm(LlmError),
    /// Story pipeline error
    #[from(StoryError)]
    Story(StoryError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// TUI error
    #[cfg(feature = "tui")]
    #[from(TuiError)]
    Tui(TuiError),
}

/// Lullaby error with kind discrimination.
///
/// # Examples
///
/// ```
/// use lullaby_error::{LullabyResult, ConfigError};
///
/// fn might_fail() -> LullabyResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Lullaby Error: {}", _0)]
pub struct LullabyError(Box<LullabyErrorKind>);

impl LullabyError {
    /// Create a new error from a kind.
    pub fn new(kind: LullabyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LullabyErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LullabyErrorKind
impl<T> From<T> for LullabyError
where
    T: Into<LullabyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for LullabyError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            LullabyErrorKind::Llm(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Lullaby operations.
///
/// # Examples
///
/// ```
/// use lullaby_error::{LullabyResult, StoryError, StoryErrorKind};
///
/// fn fetch_story() -> LullabyResult<String> {
///     Err(StoryError::new(StoryErrorKind::InvalidInput("empty".into())))?
/// }
/// ```
pub type LullabyResult<T> = std::result::Result<T, LullabyError>;
