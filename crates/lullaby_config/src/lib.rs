//! Layered configuration for the Lullaby bedtime story generator.
//!
//! Values come from the bundled `lullaby.toml`, then optional user files,
//! then `LULLABY_` environment variables. See [`LullabyConfig::load`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod sections;

pub use config::LullabyConfig;
pub use sections::{
    ApiConfig, CategoryStrategy, GuardrailConfig, JudgeConfig, ModelConfig, OrchestrationConfig,
    StorageConfig, StoryConfig,
};
