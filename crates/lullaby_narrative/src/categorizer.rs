//! Request categorization.

use crate::validation::sanitize_text;
use lullaby_core::{Categorization, Category, GenerateRequest, Message};
use lullaby_error::{BuilderError, LullabyResult, StoryError, StoryErrorKind};
use lullaby_interface::LullabyDriver;
use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

const SYSTEM_PROMPT: &str = "You are an expert at understanding children's story requests and extracting key story elements.";

const KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Adventure,
        &["adventure", "journey", "quest", "explore", "discover"],
    ),
    (Category::Friendship, &["friend", "friendship", "together", "help"]),
    (
        Category::Fantasy,
        &["magic", "wizard", "fairy", "dragon", "castle", "princess"],
    ),
    (
        Category::Animals,
        &["animal", "cat", "dog", "bird", "rabbit", "bear", "lion"],
    ),
];

/// Classifies story requests with the model, falling back to keywords.
pub struct StoryCategorizer<D> {
    driver: Arc<D>,
    retry_policy: RetryPolicy,
}

impl<D: LullabyDriver> StoryCategorizer<D> {
    /// Create a categorizer over `driver`.
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            retry_policy: RetryPolicy::categorizer(),
        }
    }

    /// Replace the retry policy for model calls.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Categorize a request and extract its story elements.
    ///
    /// Never fails: any model or parsing problem yields
    /// [`fallback_categorize`].
    #[instrument(skip_all, fields(request_len = request.len()))]
    pub async fn categorize_and_extract(&self, request: &str) -> Categorization {
        match self.analyze(request).await {
            Ok(analysis) => {
                let categorization = parse_categorization(&analysis);
                tracing::debug!(category = %categorization.category, "Categorized request");
                categorization
            }
            Err(e) => {
                tracing::warn!(error = %e, "Categorizer failed, using keyword fallback");
                fallback_categorize(request)
            }
        }
    }

    async fn analyze(&self, request: &str) -> LullabyResult<String> {
        let request = sanitize_text(request, 5000);
        let prompt = categorizer_prompt(&request);
        let generate = GenerateRequest::builder()
            .messages(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .temperature(0.3f32)
            .max_tokens(300u32)
            .timeout_secs(30u64)
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;

        let response = retry_with_backoff(self.retry_policy, || {
            self.driver.generate(&generate)
        })
        .await?;

        let text = response.text();
        if text.trim().is_empty() {
            return Err(StoryError::new(StoryErrorKind::UnparseableReply(
                "empty categorization".to_string(),
            ))
            .into());
        }
        Ok(text)
    }
}

fn categorizer_prompt(request: &str) -> String {
    format!(
        "Analyze this bedtime story request and extract key information.

USER REQUEST:
{request}

Please provide:
1. Category (choose one): adventure, friendship, fantasy, animals, or default
2. Key characters mentioned or implied
3. Main theme or focus
4. Setting or environment
5. Special elements to include (magic, animals, specific objects, etc.)
6. Story tone preference (if any)

Respond in this exact format:
CATEGORY: [category]
CHARACTERS: [list of characters or \"none specified\"]
THEME: [main theme]
SETTING: [setting or \"any\"]
ELEMENTS: [special elements or \"none\"]
TONE: [tone preference or \"neutral\"]
"
    )
}

fn split_list(value: &str, none_marker: &str) -> Vec<String> {
    if value.eq_ignore_ascii_case(none_marker) {
        return Vec::new();
    }
    value.split(',').map(|item| item.trim().to_string()).collect()
}

/// Parse a `FIELD: value` analysis reply.
///
/// Unknown categories become [`Category::Default`]; missing lines keep their
/// defaults.
///
/// # Examples
///
/// ```
/// use lullaby_core::Category;
/// use lullaby_narrative::parse_categorization;
///
/// let reply = "CATEGORY: Animals\nCHARACTERS: Alice, Bob the cat\nSETTING: any\nELEMENTS: none";
/// let c = parse_categorization(reply);
/// assert_eq!(c.category, Category::Animals);
/// assert_eq!(c.characters, vec!["Alice", "Bob the cat"]);
/// assert!(c.elements.is_empty());
/// assert_eq!(c.tone, "neutral");
/// ```
pub fn parse_categorization(analysis: &str) -> Categorization {
    let mut categorization = Categorization::disabled();

    for line in analysis.lines().map(str::trim) {
        let Some((field, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match field {
            "CATEGORY" => {
                categorization.category = Category::from_str(value).unwrap_or_default();
            }
            "CHARACTERS" => categorization.characters = split_list(value, "none specified"),
            "THEME" => categorization.theme = value.to_string(),
            "SETTING" => categorization.setting = value.to_string(),
            "ELEMENTS" => categorization.elements = split_list(value, "none"),
            "TONE" => categorization.tone = value.to_string(),
            _ => {}
        }
    }

    categorization.raw_analysis = Some(analysis.to_string());
    categorization
}

/// Keyword categorization used when the model is unavailable.
///
/// The first matching group wins, in the order adventure, friendship,
/// fantasy, animals.
///
/// # Examples
///
/// ```
/// use lullaby_core::Category;
/// use lullaby_narrative::fallback_categorize;
///
/// assert_eq!(fallback_categorize("A quest with my friend").category, Category::Adventure);
/// assert_eq!(fallback_categorize("A dragon's castle").category, Category::Fantasy);
/// assert_eq!(fallback_categorize("Bedtime").category, Category::Default);
/// ```
pub fn fallback_categorize(request: &str) -> Categorization {
    let lower = request.to_lowercase();
    let category = KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| lower.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or_default();
    Categorization::fallback(category)
}
