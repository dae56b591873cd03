//! Judge verdicts and evaluations.

use serde::{Deserialize, Serialize};

/// Judge decision for a story.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Verdict {
    /// Good enough to read tonight
    Accept,
    /// Needs another pass
    Revise,
    /// Evaluation could not be completed
    Error,
}

/// Scored judgement of a story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Final verdict after applying the acceptance threshold
    pub verdict: Verdict,
    /// Overall score on a 0-10 scale
    pub overall_score: f64,
    /// Human-readable breakdown of scores and feedback
    pub detailed_feedback: String,
    /// Whether the overall score reached the minimum acceptance score
    pub meets_threshold: bool,
    /// Per-criterion scores in the order the judge returned them
    #[serde(default)]
    pub scores: Vec<(String, serde_json::Value)>,
    /// Raw judge reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Error that prevented evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Evaluation {
    /// Evaluation recording a failure instead of a score.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_core::{Evaluation, Verdict};
    ///
    /// let eval = Evaluation::error("Empty story provided for evaluation", "Empty story");
    /// assert_eq!(eval.verdict, Verdict::Error);
    /// assert_eq!(eval.overall_score, 0.0);
    /// assert!(!eval.meets_threshold);
    /// ```
    pub fn error(feedback: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Error,
            overall_score: 0.0,
            detailed_feedback: feedback.into(),
            meets_threshold: false,
            scores: Vec::new(),
            raw_response: None,
            error: Some(error.into()),
        }
    }
}
