//! Top-level configuration and loading.

use crate::{
    ApiConfig, GuardrailConfig, JudgeConfig, ModelConfig, OrchestrationConfig, StorageConfig,
    StoryConfig,
};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use lullaby_error::{ConfigError, LullabyError, LullabyResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// Bundled defaults shipped with the binary.
const DEFAULT_CONFIG: &str = include_str!("../../../lullaby.toml");

/// Complete Lullaby configuration.
///
/// # Example
///
/// ```toml
/// [judge]
/// minimum_acceptance_score = 8.0
/// max_revision_attempts = 2
///
/// [storage]
/// database_path = "/home/me/.local/share/lullaby/stories.db"
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LullabyConfig {
    /// Model selection
    pub model: ModelConfig,
    /// Endpoint and request limits
    pub api: ApiConfig,
    /// Storyteller settings
    pub story: StoryConfig,
    /// Judge settings
    pub judge: JudgeConfig,
    /// Guardrail settings
    pub guardrails: GuardrailConfig,
    /// Pipeline switches
    pub orchestration: OrchestrationConfig,
    /// Story history database
    pub storage: StorageConfig,
}

impl LullabyConfig {
    /// Load configuration with precedence: env > current dir > home dir > bundled.
    ///
    /// Sources in order (later sources override earlier):
    /// 1. Bundled defaults (`lullaby.toml` shipped with the library)
    /// 2. `~/.config/lullaby/lullaby.toml`
    /// 3. `./lullaby.toml`
    /// 4. `LULLABY_<SECTION>__<KEY>` environment variables
    ///
    /// User files are optional and silently skipped if missing.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lullaby_config::LullabyConfig;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = LullabyConfig::load()?;
    /// config.validate()?;
    /// println!("Using model {}", config.model.name);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> LullabyResult<Self> {
        debug!("Loading configuration: env > current dir > home dir > bundled defaults");

        let mut builder = Self::bundled_builder();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/lullaby/lullaby.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("lullaby").required(false))
            .add_source(Self::environment());

        Self::finish(builder)
    }

    /// Load one explicit file layered over the bundled defaults.
    ///
    /// Environment variables still take precedence over the file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> LullabyResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from file");

        if !path.exists() {
            return Err(ConfigError::new(format!(
                "Configuration file not found: {}",
                path.display()
            ))
            .into());
        }

        let builder = Self::bundled_builder()
            .add_source(File::from(path))
            .add_source(Self::environment());

        Self::finish(builder)
    }

    /// Parse only the bundled defaults.
    pub fn bundled() -> LullabyResult<Self> {
        Self::finish(Self::bundled_builder())
    }

    fn bundled_builder() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn environment() -> Environment {
        Environment::with_prefix("LULLABY")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> LullabyResult<Self> {
        builder
            .build()
            .map_err(|e| {
                LullabyError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                LullabyError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Check every value is within its allowed range.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_config::LullabyConfig;
    ///
    /// let mut config = LullabyConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.judge.strictness_level = 11;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> LullabyResult<()> {
        check_temperature("story.storyteller_temperature", self.story.storyteller_temperature)?;
        check_temperature("judge.judge_temperature", self.judge.judge_temperature)?;

        if !(500..=4000).contains(&self.story.max_story_tokens) {
            return Err(ConfigError::new(format!(
                "story.max_story_tokens must be between 500 and 4000, got {}",
                self.story.max_story_tokens
            ))
            .into());
        }

        if !(1..=10).contains(&self.judge.strictness_level) {
            return Err(ConfigError::new(format!(
                "judge.strictness_level must be between 1 and 10, got {}",
                self.judge.strictness_level
            ))
            .into());
        }

        let score = self.judge.minimum_acceptance_score;
        if !score.is_finite() || !(0.0..=10.0).contains(&score) {
            return Err(ConfigError::new(format!(
                "judge.minimum_acceptance_score must be between 0.0 and 10.0, got {}",
                score
            ))
            .into());
        }

        if self.judge.max_revision_attempts > 5 {
            return Err(ConfigError::new(format!(
                "judge.max_revision_attempts must be between 0 and 5, got {}",
                self.judge.max_revision_attempts
            ))
            .into());
        }

        if self.story.target_age_min > self.story.target_age_max {
            return Err(ConfigError::new(format!(
                "story.target_age_min ({}) must not exceed story.target_age_max ({})",
                self.story.target_age_min, self.story.target_age_max
            ))
            .into());
        }

        Ok(())
    }

    /// API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

fn check_temperature(name: &str, value: f32) -> LullabyResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::new(format!(
            "{} must be between 0.0 and 1.0, got {}",
            name, value
        ))
        .into());
    }
    Ok(())
}
