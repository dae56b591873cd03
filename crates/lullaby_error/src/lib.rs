//! Error types for the Lullaby bedtime story generator.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! [`LullabyError`] boxes any of them, and [`RetryableError`] tells the
//! retry layer which failures are worth another attempt.
//!
//! # Examples
//!
//! ```
//! use lullaby_error::{LullabyResult, LlmError, LlmErrorKind, RetryableError};
//!
//! fn call_model() -> LullabyResult<String> {
//!     Err(LlmError::new(LlmErrorKind::Http {
//!         status_code: 503,
//!         message: "overloaded".into(),
//!     }))?
//! }
//!
//! let err = call_model().unwrap_err();
//! assert!(err.is_retryable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod llm;
mod story;
#[cfg(feature = "database")]
mod database;
#[cfg(feature = "tui")]
mod tui;
mod error;

pub use message::{BuilderError, ConfigError, JsonError};
pub use llm::{LlmError, LlmErrorKind, RetryableError};
pub use story::{StoryError, StoryErrorKind};
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
#[cfg(feature = "tui")]
pub use tui::{TuiError, TuiErrorKind, TuiResult};
pub use error::{LullabyError, LullabyErrorKind, LullabyResult};
