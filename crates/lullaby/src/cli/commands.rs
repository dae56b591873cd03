//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Lullaby - judge-refined bedtime stories for children aged 5 to 10
#[derive(Parser, Debug)]
#[command(name = "lullaby")]
#[command(about = "Generate, judge, and browse bedtime stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Story database path, overriding `storage.database_path`
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a bedtime story
    Generate(GenerateArgs),

    /// Browse and manage saved stories
    #[command(subcommand)]
    Stories(StoriesCommands),

    /// Launch the terminal dashboard over the story database
    Tui,
}

/// Options for `generate`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// What the story should be about; prompts when omitted
    pub request: Option<String>,

    /// Storytelling persona (e.g. gentle_friend, adventurous_explorer)
    #[arg(long)]
    pub persona: Option<String>,

    /// Value to emphasize (repeatable)
    #[arg(long = "value")]
    pub values: Vec<String>,

    /// Child's interest (repeatable)
    #[arg(long = "interest")]
    pub interests: Vec<String>,

    /// Child's name, offered for a main character
    #[arg(long)]
    pub child_name: Option<String>,

    /// Extra elements to weave into the story
    #[arg(long)]
    pub custom_elements: Option<String>,

    /// Skip the change-request prompt after generation
    #[arg(long)]
    pub no_feedback: bool,

    /// Do not save the story to the database
    #[arg(long)]
    pub no_save: bool,

    /// Maximum judge passes in the refinement loop (0-5)
    #[arg(long)]
    pub max_revisions: Option<u32>,

    /// Disable judge-driven revision
    #[arg(long)]
    pub no_refinement: bool,

    /// Skip model categorization of the request
    #[arg(long)]
    pub no_categorization: bool,

    /// Storyteller temperature (0.0-1.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Storyteller token budget (500-4000)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Story arc (hero_journey, three_act, simple_adventure)
    #[arg(long)]
    pub arc: Option<String>,

    /// Judge temperature (0.0-1.0)
    #[arg(long)]
    pub judge_temperature: Option<f32>,

    /// Judge strictness (1-10)
    #[arg(long)]
    pub strictness: Option<u8>,

    /// Score a story needs to be accepted (0.0-10.0)
    #[arg(long)]
    pub min_score: Option<f64>,
}

/// Story history subcommands
#[derive(Subcommand, Debug)]
pub enum StoriesCommands {
    /// List recent stories
    List {
        /// Maximum number of stories to display
        #[arg(long, default_value = "10")]
        limit: i64,

        /// Number of stories to skip
        #[arg(long, default_value = "0")]
        offset: i64,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Show one story in full
    Show {
        /// Story ID
        id: i32,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Search requests and story text
    Search {
        /// Text to look for
        query: String,

        /// Maximum number of results
        #[arg(long, default_value = "50")]
        limit: i64,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Filter by category and score
    Filter {
        /// Category (adventure, friendship, fantasy, animals, default)
        #[arg(long)]
        category: Option<String>,

        /// Minimum judge score
        #[arg(long)]
        min_score: Option<f64>,

        /// Maximum judge score
        #[arg(long)]
        max_score: Option<f64>,

        /// Maximum number of results
        #[arg(long, default_value = "50")]
        limit: i64,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Delete a story
    Delete {
        /// Story ID
        id: i32,
    },

    /// Export every story to a JSON file
    Export {
        /// Output path; defaults to stories_export_<timestamp>.json
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show aggregate statistics
    Stats {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
