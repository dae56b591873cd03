//! Guardrail validation report.

use serde::{Deserialize, Serialize};

/// Outcome of running safety and age checks over a story.
///
/// # Examples
///
/// ```
/// use lullaby_core::ValidationReport;
///
/// let report = ValidationReport::from_checks(
///     (true, vec![]),
///     (false, vec!["Story may lack sufficient positive elements".to_string()]),
/// );
/// assert!(!report.is_valid);
/// assert!(report.is_safe);
/// assert_eq!(report.all_issues.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Safe and age-appropriate
    pub is_valid: bool,
    /// Passed the content-safety check
    #[serde(default)]
    pub is_safe: bool,
    /// Passed the age-appropriateness check
    #[serde(default)]
    pub is_age_appropriate: bool,
    /// Safety violations and concerns
    #[serde(default)]
    pub safety_violations: Vec<String>,
    /// Age-appropriateness issues
    #[serde(default)]
    pub age_issues: Vec<String>,
    /// Safety violations followed by age issues
    #[serde(default)]
    pub all_issues: Vec<String>,
    /// Generation error that prevented validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationReport {
    /// Combine `(is_safe, violations)` and `(is_appropriate, issues)` results.
    pub fn from_checks(safety: (bool, Vec<String>), age: (bool, Vec<String>)) -> Self {
        let (is_safe, safety_violations) = safety;
        let (is_age_appropriate, age_issues) = age;
        let all_issues = safety_violations
            .iter()
            .chain(age_issues.iter())
            .cloned()
            .collect();
        Self {
            is_valid: is_safe && is_age_appropriate,
            is_safe,
            is_age_appropriate,
            safety_violations,
            age_issues,
            all_issues,
            error: None,
        }
    }

    /// Report for a draft that failed before it could be validated.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}
