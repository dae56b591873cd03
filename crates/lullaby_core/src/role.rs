//! Role types for chat participants.

use serde::{Deserialize, Serialize};

/// Who authored a chat message.
///
/// Serializes in the lowercase form chat-completion APIs expect.
///
/// # Examples
///
/// ```
/// use lullaby_core::Role;
///
/// assert_eq!(format!("{}", Role::System), "system");
/// assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the model's persona
    #[display("system")]
    System,
    /// The prompt being answered
    #[display("user")]
    User,
    /// Prior model replies
    #[display("assistant")]
    Assistant,
}
