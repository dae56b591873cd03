//! Story pipeline error types.

/// Failure conditions raised by the story pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoryErrorKind {
    /// User request rejected before any model call
    #[display("Invalid story request: {}", _0)]
    InvalidInput(String),
    /// Parent settings failed validation
    #[display("Invalid parent settings: {}", _0)]
    InvalidParentSettings(String),
    /// Model reply could not be interpreted
    #[display("Could not interpret model reply: {}", _0)]
    UnparseableReply(String),
    /// Writing an export file failed
    #[display("Export failed: {}", _0)]
    Export(String),
}

/// Story pipeline error with source location tracking.
///
/// # Examples
///
/// ```
/// use lullaby_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::InvalidInput("Input cannot be empty".into()));
/// assert!(format!("{}", err).contains("Input cannot be empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The kind of error that occurred
    pub kind: StoryErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
