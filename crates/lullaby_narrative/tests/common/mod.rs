//! Scripted driver and in-memory storage shared by pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lullaby_core::{
    GenerateRequest, GenerateResponse, StoredStory, StoryFilter, StoryOutcome, StoryStatistics,
};
use lullaby_error::{JsonError, LlmError, LlmErrorKind, LullabyResult};
use lullaby_interface::{LullabyDriver, StoryRepository};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A story that passes both keyword and age checks.
pub const GOOD_STORY: &str = "Milo the kind rabbit loved to help his friend Pip. \
They would smile and laugh together every day. \
One evening they shared their joy with the moon, and everyone felt happy and safe.";

/// A story the age heuristics reject for lacking positive words.
pub const FLAT_STORY: &str = "The rock sat on the hill. The wind moved the grass.";

pub const CATEGORY_REPLY: &str = "CATEGORY: animals
CHARACTERS: Milo, Pip
THEME: Friendship
SETTING: A meadow
ELEMENTS: the moon
TONE: neutral";

pub const SAFE_REPLY: &str = r#"{"is_safe": true, "violations": [], "concerns": []}"#;

pub fn judge_reply(score: f64) -> String {
    format!(
        r#"{{"scores": {{"moral_value": {score}, "overall": {score}}}, "feedback": {{"what_works_well": "Gentle tone", "suggestions_for_improvement": "More dialogue"}}, "verdict": "REVISE"}}"#
    )
}

/// Pipeline stage, recognized from the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Categorizer,
    Guardrails,
    Judge,
    Storyteller,
}

impl Stage {
    fn of(request: &GenerateRequest) -> Self {
        let system = request
            .messages
            .first()
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        if system.contains("expert at understanding") {
            Stage::Categorizer
        } else if system.contains("content safety expert") {
            Stage::Guardrails
        } else if system.contains("children's story evaluator") {
            Stage::Judge
        } else {
            Stage::Storyteller
        }
    }
}

pub type Reply = Result<String, LlmErrorKind>;

/// Driver that answers each stage from a queue, then from a default.
pub struct MockDriver {
    queues: Mutex<HashMap<Stage, VecDeque<Reply>>>,
    defaults: HashMap<Stage, Reply>,
    requests: Mutex<Vec<(Stage, GenerateRequest)>>,
}

impl MockDriver {
    pub fn new() -> Self {
        let defaults = HashMap::from([
            (Stage::Categorizer, Ok(CATEGORY_REPLY.to_string())),
            (Stage::Guardrails, Ok(SAFE_REPLY.to_string())),
            (Stage::Judge, Ok(judge_reply(8.0))),
            (Stage::Storyteller, Ok(GOOD_STORY.to_string())),
        ]);
        Self {
            queues: Mutex::new(HashMap::new()),
            defaults,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer `stage` with `reply` once the queue is empty.
    pub fn with_default(mut self, stage: Stage, reply: Reply) -> Self {
        self.defaults.insert(stage, reply);
        self
    }

    /// Queue replies for `stage`, used before the default.
    pub fn with_script(self, stage: Stage, replies: Vec<Reply>) -> Self {
        self.queues
            .lock()
            .unwrap()
            .entry(stage)
            .or_default()
            .extend(replies);
        self
    }

    pub fn calls(&self, stage: Stage) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .count()
    }

    pub fn requests(&self, stage: Stage) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == stage)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// User prompt of the `n`th request sent to `stage`.
    pub fn prompt(&self, stage: Stage, n: usize) -> String {
        self.requests(stage)[n]
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LullabyDriver for MockDriver {
    async fn generate(&self, req: &GenerateRequest) -> LullabyResult<GenerateResponse> {
        let stage = Stage::of(req);
        self.requests.lock().unwrap().push((stage, req.clone()));

        let queued = self
            .queues
            .lock()
            .unwrap()
            .get_mut(&stage)
            .and_then(VecDeque::pop_front);
        let reply = queued.unwrap_or_else(|| self.defaults[&stage].clone());

        match reply {
            Ok(text) => Ok(GenerateResponse::from_text(text)),
            Err(kind) => Err(LlmError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Non-retryable failure, so tests never sleep in backoff.
pub fn auth_error() -> LlmErrorKind {
    LlmErrorKind::Http {
        status_code: 401,
        message: "Invalid API key".to_string(),
    }
}

/// Repository that keeps saved outcomes in memory.
///
/// Clones share the same store, so a test can keep a handle after boxing one.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    pub saved: Arc<Mutex<Vec<StoryOutcome>>>,
    pub fail: bool,
}

impl MemoryRepository {
    pub fn failing() -> Self {
        Self {
            saved: Arc::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl StoryRepository for MemoryRepository {
    async fn save_story(&self, outcome: &StoryOutcome) -> LullabyResult<i32> {
        if self.fail {
            return Err(JsonError::new("could not encode story").into());
        }
        let mut saved = self.saved.lock().unwrap();
        saved.push(outcome.clone());
        Ok(saved.len() as i32)
    }

    async fn get_story(&self, _id: i32) -> LullabyResult<Option<StoredStory>> {
        Ok(None)
    }

    async fn list_stories(&self, _limit: i64, _offset: i64) -> LullabyResult<Vec<StoredStory>> {
        Ok(Vec::new())
    }

    async fn search_stories(&self, _query: &str, _limit: i64) -> LullabyResult<Vec<StoredStory>> {
        Ok(Vec::new())
    }

    async fn filter_stories(&self, _filter: &StoryFilter) -> LullabyResult<Vec<StoredStory>> {
        Ok(Vec::new())
    }

    async fn delete_story(&self, _id: i32) -> LullabyResult<bool> {
        Ok(false)
    }

    async fn statistics(&self) -> LullabyResult<StoryStatistics> {
        Ok(StoryStatistics::default())
    }
}
