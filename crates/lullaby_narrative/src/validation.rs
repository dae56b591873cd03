//! Request validation and text sanitizing.

use lullaby_core::ParentSettings;
use lullaby_error::{LullabyResult, StoryError, StoryErrorKind};
use regex::Regex;
use std::sync::LazyLock;

const MAX_INPUT_CHARS: usize = 5000;
const MIN_INPUT_CHARS: usize = 2;
const MAX_CHILD_NAME_CHARS: usize = 100;

static UNSAFE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)<script[^>]*>", r"(?i)javascript:", r"(?i)on\w+\s*="]
        .into_iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

fn invalid_input(message: impl Into<String>) -> lullaby_error::LullabyError {
    StoryError::new(StoryErrorKind::InvalidInput(message.into())).into()
}

/// Check a story request before it reaches the model.
///
/// Length limits apply to the trimmed request, counted in characters.
///
/// # Errors
///
/// Returns [`StoryErrorKind::InvalidInput`] with a user-facing message when
/// the request is empty, too long, too short, or looks like markup injection.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::validate_user_input;
///
/// assert!(validate_user_input("A bunny who loves the moon").is_ok());
/// assert!(validate_user_input("   ").is_err());
/// assert!(validate_user_input("<script>alert(1)</script>").is_err());
/// ```
pub fn validate_user_input(request: &str) -> LullabyResult<()> {
    if request.is_empty() {
        return Err(invalid_input("Input cannot be empty"));
    }

    let trimmed = request.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("Input cannot be empty or only whitespace"));
    }

    let length = trimmed.chars().count();
    if length > MAX_INPUT_CHARS {
        return Err(invalid_input(format!(
            "Input too long ({length} characters). Maximum {MAX_INPUT_CHARS} characters allowed."
        )));
    }
    if length < MIN_INPUT_CHARS {
        return Err(invalid_input(
            "Input too short. Please provide at least 2 characters.",
        ));
    }

    if UNSAFE_PATTERNS.iter().any(|re| re.is_match(trimmed)) {
        tracing::warn!("Rejected request containing markup");
        return Err(invalid_input("Input contains potentially unsafe content"));
    }

    Ok(())
}

/// Check parent settings that the type system cannot.
///
/// Persona, value, and interest membership is guaranteed by their enums;
/// only free-text fields are checked here.
pub fn validate_parent_settings(settings: &ParentSettings) -> LullabyResult<()> {
    let too_long = settings
        .child_name
        .as_ref()
        .is_some_and(|name| name.chars().count() > MAX_CHILD_NAME_CHARS);
    if too_long {
        return Err(StoryError::new(StoryErrorKind::InvalidParentSettings(
            "Child name too long (max 100 characters)".to_string(),
        ))
        .into());
    }
    Ok(())
}

/// Truncate `text` to `max_length` characters, marking the cut.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::sanitize_text;
///
/// assert_eq!(sanitize_text("short", 10), "short");
/// assert_eq!(sanitize_text("abcdefgh", 3), "abc... [truncated]");
/// ```
pub fn sanitize_text(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((cut, _)) => format!("{}... [truncated]", &text[..cut]),
        None => text.to_string(),
    }
}
