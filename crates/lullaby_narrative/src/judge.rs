//! Story quality judging and revision prompts.

use crate::extraction::safe_parse_json;
use lullaby_config::{JudgeConfig, LullabyConfig, StoryConfig};
use lullaby_core::{Evaluation, GenerateRequest, Message, ResponseFormat, Verdict};
use lullaby_error::{BuilderError, LullabyResult};
use lullaby_interface::LullabyDriver;
use lullaby_rate_limit::{RetryPolicy, retry_with_backoff};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::instrument;

const SYSTEM_PROMPT: &str = "You are an expert children's story evaluator with deep knowledge of child development and storytelling. Always respond with valid JSON only.";

/// Scores stories against the configured criteria.
pub struct StoryJudge<D> {
    driver: Arc<D>,
    judge: JudgeConfig,
    story: StoryConfig,
    retry_policy: RetryPolicy,
}

impl<D: LullabyDriver> StoryJudge<D> {
    /// Create a judge using the judge and story sections of `config`.
    pub fn new(driver: Arc<D>, config: &LullabyConfig) -> Self {
        Self {
            driver,
            judge: config.judge.clone(),
            story: config.story.clone(),
            retry_policy: RetryPolicy::judge(),
        }
    }

    /// Replace the retry policy for judge calls.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Score a story needs to be accepted.
    pub fn min_score(&self) -> f64 {
        self.judge.minimum_acceptance_score
    }

    /// Build the evaluation prompt.
    pub fn create_judge_prompt(&self, story: &str, request: &str) -> String {
        let (min, max) = (self.story.target_age_min, self.story.target_age_max);
        let story: String = story.chars().take(3000).collect();
        let request: String = request.chars().take(500).collect();
        let criteria = self
            .judge
            .evaluation_criteria
            .iter()
            .map(|criterion| format!("- {criterion}"))
            .collect::<Vec<_>>()
            .join("\n");
        let strictness = strictness_line(self.judge.strictness_level);

        format!(
            "You are an expert judge evaluating a bedtime story for children aged {min}-{max} years.

STORY TO EVALUATE:
{story}

USER REQUEST (if provided):
{request}

EVALUATION CRITERIA (rate each 0-10):
{criteria}

ADDITIONAL CONSIDERATIONS:
- Age-appropriateness: Is the content, vocabulary, and themes suitable for ages {min}-{max}?
- Story structure: Does it have a clear beginning, middle, and end with a satisfying resolution?
- Character development: Are characters relatable and well-developed?
- Moral value: Does the story teach a positive lesson or value?
- Engagement level: Will children be interested and engaged?
- Language complexity: Is the vocabulary and sentence structure appropriate?

{strictness}

Please respond with a JSON object in this exact format:
{{
  \"scores\": {{
    \"age_appropriateness\": <0-10>,
    \"story_structure\": <0-10>,
    \"character_development\": <0-10>,
    \"moral_value\": <0-10>,
    \"engagement_level\": <0-10>,
    \"language_complexity\": <0-10>,
    \"overall\": <0-10>
  }},
  \"feedback\": {{
    \"what_works_well\": \"<detailed feedback>\",
    \"suggestions_for_improvement\": \"<detailed suggestions>\"
  }},
  \"verdict\": \"<ACCEPT or REVISE>\"
}}

IMPORTANT: Respond ONLY with valid JSON. No additional text before or after.
"
        )
    }

    /// Evaluate a story.
    ///
    /// Never fails: an empty story or a failed call produces an evaluation
    /// with [`Verdict::Error`] and a score of zero.
    #[instrument(skip_all, fields(story_len = story.len(), min_score = self.judge.minimum_acceptance_score))]
    pub async fn evaluate_story(&self, story: &str, request: &str) -> Evaluation {
        if story.trim().is_empty() {
            return Evaluation::error("Empty story provided for evaluation", "Empty story");
        }

        let prompt = self.create_judge_prompt(story, request);
        match self.call_judge_api(prompt).await {
            Ok(reply) => {
                let evaluation = interpret_reply(&reply, self.min_score());
                tracing::info!(
                    score = evaluation.overall_score,
                    verdict = %evaluation.verdict,
                    "Judged story"
                );
                evaluation
            }
            Err(e) => {
                tracing::error!(error = %e, "Judge call failed");
                Evaluation::error(format!("Error during evaluation: {e}"), e.to_string())
            }
        }
    }

    async fn call_judge_api(&self, prompt: String) -> LullabyResult<String> {
        let request = GenerateRequest::builder()
            .messages(vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)])
            .temperature(self.judge.judge_temperature)
            .max_tokens(self.judge.max_judge_tokens)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| BuilderError::new(e.to_string()))?;

        let response = retry_with_backoff(self.retry_policy, || {
            self.driver.generate(&request)
        })
        .await?;
        Ok(response.text())
    }

    /// Build the revision instructions passed to the storyteller.
    pub fn generate_revision_prompt(&self, original: &str, feedback: &str, request: &str) -> String {
        format!(
            "You are a skilled children's storyteller. Please revise the following story based on the judge's feedback.

ORIGINAL USER REQUEST:
{request}

ORIGINAL STORY:
{original}

JUDGE'S FEEDBACK:
{feedback}

Please create an improved version of the story that addresses all the feedback while maintaining the core narrative AND the storytelling variety/style that was specified in the original instructions. Ensure the story is:
- Appropriate for children aged {}-{}
- Engaging and well-structured
- Contains positive themes and a happy resolution
- Uses age-appropriate vocabulary and sentence structure
- Maintains the narrative style, perspective, and variety approach from the original generation

REVISED STORY:
",
            self.story.target_age_min, self.story.target_age_max,
        )
    }
}

fn strictness_line(level: u8) -> String {
    let guidance = match level {
        0..=3 => "Be encouraging and accept stories that are solid even if they are not polished.",
        4..=7 => "Apply balanced, fair standards.",
        _ => "Be demanding and only give high scores to stories that excel on every criterion.",
    };
    format!("STRICTNESS LEVEL: {level}/10. {guidance}")
}

fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Turn a judge reply into an evaluation.
fn interpret_reply(reply: &str, min_score: f64) -> Evaluation {
    let data = match serde_json::from_str::<Value>(reply) {
        Ok(Value::Object(map)) => map,
        _ => safe_parse_json(reply),
    };

    let scores: Map<String, Value> = data
        .get("scores")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    let feedback = data.get("feedback").and_then(Value::as_object);
    let claimed_accept = data
        .get("verdict")
        .and_then(Value::as_str)
        .is_some_and(|v| v.eq_ignore_ascii_case("ACCEPT"));

    let overall_value = scores.get("overall").filter(|v| v.is_number());
    let overall_score = overall_value.and_then(Value::as_f64).unwrap_or(0.0);
    let meets_threshold = overall_score >= min_score;
    let verdict = if claimed_accept || meets_threshold {
        Verdict::Accept
    } else {
        Verdict::Revise
    };

    let feedback_field = |key: &str| {
        feedback
            .and_then(|f| f.get(key))
            .map(plain)
            .unwrap_or_else(|| "N/A".to_string())
    };
    let score_lines = scores
        .iter()
        .filter(|(key, _)| key.as_str() != "overall")
        .map(|(key, value)| format!("- {key}: {}/10", plain(value)))
        .collect::<Vec<_>>()
        .join("\n");
    let overall_display = overall_value.map(plain).unwrap_or_else(|| "0.0".to_string());

    let detailed_feedback = format!(
        "SCORES:\n{score_lines}\n\nOverall Score: {overall_display}/10\n\nFEEDBACK:\nWhat Works Well: {}\n\nSuggestions for Improvement: {}\n\nVERDICT: {verdict}\n",
        feedback_field("what_works_well"),
        feedback_field("suggestions_for_improvement"),
    );

    Evaluation {
        verdict,
        overall_score,
        detailed_feedback,
        meets_threshold,
        scores: scores.into_iter().collect(),
        raw_response: Some(reply.to_string()),
        error: None,
    }
}
