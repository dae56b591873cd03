//! Configuration loading and command-line overrides.

use super::commands::GenerateArgs;
use lullaby::{ConfigError, LullabyConfig, LullabyResult, StoryArc};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Load the explicit file if given, otherwise the standard layers.
pub fn load_config(path: Option<&Path>) -> LullabyResult<LullabyConfig> {
    match path {
        Some(path) => LullabyConfig::from_file(path),
        None => LullabyConfig::load(),
    }
}

/// Database file: the `--database` flag, else `storage.database_path`.
pub fn database_path(config: &LullabyConfig, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| config.storage.database_path.clone())
}

/// Apply `generate` flags to `config`, then validate the result.
pub fn apply_overrides(config: &mut LullabyConfig, args: &GenerateArgs) -> LullabyResult<()> {
    if let Some(n) = args.max_revisions {
        config.judge.max_revision_attempts = n;
    }
    if args.no_refinement {
        config.orchestration.enable_iterative_refinement = false;
    }
    if args.no_categorization {
        config.orchestration.enable_categorization = false;
    }
    if args.no_feedback {
        config.orchestration.enable_user_feedback = false;
    }
    if args.no_save {
        config.storage.enabled = false;
    }
    if let Some(t) = args.temperature {
        config.story.storyteller_temperature = t;
    }
    if let Some(n) = args.max_tokens {
        config.story.max_story_tokens = n;
    }
    if let Some(arc) = &args.arc {
        config.story.story_arc_type = parse_arc(arc)?;
    }
    if let Some(t) = args.judge_temperature {
        config.judge.judge_temperature = t;
    }
    if let Some(s) = args.strictness {
        config.judge.strictness_level = s;
    }
    if let Some(s) = args.min_score {
        config.judge.minimum_acceptance_score = s;
    }

    tracing::debug!(?config, "Applied command-line overrides");
    config.validate()
}

fn parse_arc(raw: &str) -> LullabyResult<StoryArc> {
    StoryArc::from_str(raw.trim()).map_err(|_| {
        let choices: Vec<String> = StoryArc::iter().map(|a| a.to_string()).collect();
        ConfigError::new(format!(
            "Invalid story arc: {}. Must be one of: {}",
            raw,
            choices.join(", ")
        ))
        .into()
    })
}
