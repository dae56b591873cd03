//! Single-message error types.
//!
//! JSON, configuration, and builder failures carry nothing beyond a message,
//! so they share one shape generated by [`message_error!`].

macro_rules! message_error {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
        #[display("{} Error: {} at line {} in {}", $label, message, line, file)]
        pub struct $name {
            /// The underlying error message
            pub message: String,
            /// Line number where the error occurred
            pub line: u32,
            /// File where the error occurred
            pub file: &'static str,
        }

        impl $name {
            /// Create a new error with the given message at the caller's location.
            #[track_caller]
            pub fn new(message: impl Into<String>) -> Self {
                let location = std::panic::Location::caller();
                Self {
                    message: message.into(),
                    line: location.line(),
                    file: location.file(),
                }
            }
        }
    };
}

message_error!(
    /// JSON serialization or deserialization error.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_error::JsonError;
    ///
    /// let err = JsonError::new("expected value at line 1 column 1");
    /// assert!(format!("{}", err).starts_with("JSON Error"));
    /// ```
    JsonError,
    "JSON"
);

message_error!(
    /// Configuration loading or validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_error::ConfigError;
    ///
    /// let err = ConfigError::new("judge.strictness_level must be in 1..=10");
    /// assert!(err.message.contains("strictness"));
    /// ```
    ConfigError,
    "Configuration"
);

message_error!(
    /// Builder error raised when a derived builder is missing a required field.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_error::BuilderError;
    ///
    /// let err = BuilderError::new("`messages` must be initialized");
    /// assert!(format!("{}", err).contains("messages"));
    /// ```
    BuilderError,
    "Builder"
);
