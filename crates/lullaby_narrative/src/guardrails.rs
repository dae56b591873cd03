//! Content safety and age-appropriateness checks.

use crate::extraction::{extract_json, parse_json};
use lullaby_config::{GuardrailConfig, LullabyConfig, StoryConfig};
use lullaby_core::{GenerateRequest, Message, ResponseFormat, ValidationReport};
use lullaby_error::{BuilderError, LullabyResult};
use lullaby_interface::LullabyDriver;
use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

const SYSTEM_PROMPT: &str =
    "You are a content safety expert for children's stories. Always respond with valid JSON.";

const DANGER_WORDS: [&str; 7] = ["kill", "death", "die", "blood", "weapon", "gun", "knife"];
const FEAR_WORDS: [&str; 5] = ["terrifying", "horror", "nightmare", "scary", "frightening"];
const INAPPROPRIATE_WORDS: [&str; 4] = ["hate", "stupid", "idiot", "dumb"];
const COMPLEX_WORDS: [&str; 4] = ["nevertheless", "consequently", "furthermore", "therefore"];
const POSITIVE_WORDS: [&str; 8] = [
    "kind", "friend", "help", "love", "happy", "smile", "laugh", "joy",
];

/// Characters of context on either side of a keyword checked for negation.
const CONTEXT_RADIUS: usize = 20;

#[derive(Debug, Deserialize)]
struct SafetyReply {
    #[serde(default)]
    is_safe: bool,
    #[serde(default)]
    violations: Vec<String>,
    #[serde(default)]
    concerns: Vec<String>,
}

/// Safety and age checks for generated stories.
pub struct StoryGuardrails<D> {
    driver: Arc<D>,
    story: StoryConfig,
    guardrails: GuardrailConfig,
    retry_policy: RetryPolicy,
}

impl<D: LullabyDriver> StoryGuardrails<D> {
    /// Create guardrails using the story and guardrail sections of `config`.
    pub fn new(driver: Arc<D>, config: &LullabyConfig) -> Self {
        Self {
            driver,
            story: config.story.clone(),
            guardrails: config.guardrails.clone(),
            retry_policy: RetryPolicy::guardrails(),
        }
    }

    /// Replace the retry policy for the model safety check.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Check a story for prohibited content.
    ///
    /// Returns `(is_safe, violations)`. The model check runs first when
    /// enabled; any model or parsing failure falls back to
    /// [`keyword_content_safety_check`].
    #[instrument(skip_all, fields(story_len = story.len()))]
    pub async fn check_content_safety(&self, story: &str) -> (bool, Vec<String>) {
        if !self.guardrails.enable_content_filter {
            return (true, Vec::new());
        }
        if story.trim().is_empty() {
            return (false, vec!["Empty story".to_string()]);
        }
        if !self.guardrails.use_llm_guardrails {
            return keyword_content_safety_check(story);
        }

        match self.llm_content_safety_check(story).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "Model safety check failed, using keyword check");
                keyword_content_safety_check(story)
            }
        }
    }

    async fn llm_content_safety_check(&self, story: &str) -> LullabyResult<(bool, Vec<String>)> {
        let excerpt: String = story.chars().take(2000).collect();
        let (min, max) = (self.story.target_age_min, self.story.target_age_max);
        let prompt = format!(
            "Analyze this bedtime story for children aged {min}-{max} years.

STORY:
{excerpt}

Check for:
1. Violence, danger, or harmful content (even if mentioned in a safe context)
2. Scary or frightening content that could cause nightmares
3. Inappropriate language or themes
4. Content that is not suitable for ages {min}-{max}

Respond with JSON:
{{
  \"is_safe\": true/false,
  \"violations\": [\"violation1\", \"violation2\"],
  \"concerns\": [\"concern1\", \"concern2\"]
}}

If the story is safe, return {{\"is_safe\": true, \"violations\": [], \"concerns\": []}}
"
        );

        let request = GenerateRequest::builder()
            .messages(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .temperature(0.1f32)
            .max_tokens(300u32)
            .response_format(ResponseFormat::JsonObject)
            .timeout_secs(20u64)
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;

        let response = retry_with_backoff(self.retry_policy, || {
            self.driver.generate(&request)
        })
        .await?;

        let reply: SafetyReply = parse_json(&extract_json(&response.text())?)?;
        let mut issues = reply.violations;
        issues.extend(reply.concerns);
        tracing::debug!(is_safe = reply.is_safe, issues = issues.len(), "Model safety check");
        Ok((reply.is_safe, issues))
    }

    /// Heuristic check that a story suits the target age range.
    ///
    /// Returns `(is_appropriate, issues)`.
    pub fn check_age_appropriateness(&self, story: &str) -> (bool, Vec<String>) {
        if !self.guardrails.enable_age_check {
            return (true, Vec::new());
        }
        age_heuristics(story)
    }

    /// Run both checks and combine them into a report.
    #[instrument(skip_all)]
    pub async fn validate_story(&self, story: &str) -> ValidationReport {
        let safety = self.check_content_safety(story).await;
        let age = self.check_age_appropriateness(story);
        let report = ValidationReport::from_checks(safety, age);
        if !report.is_valid {
            tracing::info!(issues = ?report.all_issues, "Story failed guardrails");
        }
        report
    }

    /// Safety guideline block for the story prompt.
    pub fn safety_prompt_addition(&self) -> String {
        format!(
            "
IMPORTANT SAFETY GUIDELINES FOR STORY GENERATION:
- Target audience: Children aged {}-{} years
- PROHIBITED: {}
- REQUIRED: {}
- Use simple to medium-complexity vocabulary
- Keep sentences relatively short and clear
- Include positive themes and uplifting messages
- Ensure happy endings that teach valuable lessons
",
            self.story.target_age_min,
            self.story.target_age_max,
            capitalized_list(&self.guardrails.prohibited_themes),
            capitalized_list(&self.guardrails.required_elements),
        )
    }
}

fn capitalized_list(items: &[String]) -> String {
    let joined = items.join(", ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => joined,
    }
}

/// Up to [`CONTEXT_RADIUS`] characters either side of byte offset `at`.
fn context_window(text: &str, at: usize) -> &str {
    let char_pos = text[..at].chars().count();
    let byte_at = |n: usize| text.char_indices().nth(n).map_or(text.len(), |(i, _)| i);
    &text[byte_at(char_pos.saturating_sub(CONTEXT_RADIUS))..byte_at(char_pos + CONTEXT_RADIUS)]
}

/// Keyword safety check used when the model check is off or failing.
///
/// Danger and fear words are forgiven when negated nearby ("not scary",
/// "no knife"); inappropriate words never are.
///
/// # Examples
///
/// ```
/// use lullaby_narrative::keyword_content_safety_check;
///
/// assert!(keyword_content_safety_check("The forest was not scary at all.").0);
///
/// let (safe, violations) = keyword_content_safety_check("The pirate had a knife.");
/// assert!(!safe);
/// assert_eq!(violations, vec!["Contains dangerous content: 'knife'"]);
/// ```
pub fn keyword_content_safety_check(story: &str) -> (bool, Vec<String>) {
    let lower = story.to_lowercase();
    let mut violations = Vec::new();

    let negated = |keyword: &str, negations: &[&str]| {
        lower.find(keyword).map(|at| {
            let window = context_window(&lower, at);
            negations.iter().any(|n| window.contains(n))
        })
    };

    for keyword in DANGER_WORDS {
        if negated(keyword, &["not ", "no ", "never "]) == Some(false) {
            violations.push(format!("Contains dangerous content: '{keyword}'"));
        }
    }
    for keyword in FEAR_WORDS {
        if negated(keyword, &["not ", "no "]) == Some(false) {
            violations.push(format!("Contains scary content: '{keyword}'"));
        }
    }
    for keyword in INAPPROPRIATE_WORDS {
        if lower.contains(keyword) {
            violations.push(format!("Contains inappropriate language: '{keyword}'"));
        }
    }

    (violations.is_empty(), violations)
}

fn age_heuristics(story: &str) -> (bool, Vec<String>) {
    let lower = story.to_lowercase();
    let mut issues = Vec::new();

    let long_sentences = story
        .split('.')
        .filter(|sentence| sentence.split_whitespace().count() > 25)
        .count();
    if long_sentences > 3 {
        issues.push("Too many long sentences for target age group".to_string());
    }

    let complex = COMPLEX_WORDS.iter().filter(|w| lower.contains(*w)).count();
    if complex > 5 {
        issues.push("Vocabulary may be too complex for younger children".to_string());
    }

    let positive = POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
    if positive < 3 {
        issues.push("Story may lack sufficient positive elements".to_string());
    }

    (issues.is_empty(), issues)
}
