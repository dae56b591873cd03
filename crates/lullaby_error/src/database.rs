//! Database error types.

/// Database error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Connection failed
    #[display("Database connection error: {}", _0)]
    Connection(String),
    /// Database file stayed locked through every retry
    #[display("Database is locked: {}", _0)]
    Locked(String),
    /// Query execution failed
    #[display("Database query error: {}", _0)]
    Query(String),
    /// JSON column could not be encoded or decoded
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Migration error
    #[display("Migration error: {}", _0)]
    Migration(String),
}

/// Database error with source location tracking.
///
/// # Examples
///
/// ```
/// use lullaby_error::{DatabaseError, DatabaseErrorKind};
///
/// let err = DatabaseError::new(DatabaseErrorKind::Locked("database is locked".into()));
/// assert!(err.is_locked());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// The kind of error that occurred
    pub kind: DatabaseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new DatabaseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether the failure came from SQLite reporting a locked database.
    pub fn is_locked(&self) -> bool {
        match &self.kind {
            DatabaseErrorKind::Locked(_) => true,
            DatabaseErrorKind::Connection(msg) | DatabaseErrorKind::Query(msg) => {
                msg.to_lowercase().contains("locked")
            }
            _ => false,
        }
    }
}

impl From<diesel::result::Error> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        let message = err.to_string();
        if message.to_lowercase().contains("locked") {
            DatabaseError::new(DatabaseErrorKind::Locked(message))
        } else {
            DatabaseError::new(DatabaseErrorKind::Query(message))
        }
    }
}

impl From<diesel::ConnectionError> for DatabaseError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DatabaseError::new(DatabaseErrorKind::Connection(err.to_string()))
    }
}

impl From<serde_json::Error> for DatabaseError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        DatabaseError::new(DatabaseErrorKind::Serialization(err.to_string()))
    }
}
