//! Core data types for the Lullaby bedtime story generator.
//!
//! This crate provides the data types shared by every Lullaby crate: chat
//! requests, categorizations, guardrail reports, judge evaluations, variety
//! choices, parent settings, and persisted stories.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod category;
mod evaluation;
mod message;
mod outcome;
mod parent;
mod request;
mod role;
mod telemetry;
mod validation;
mod variety;

pub use category::{Categorization, Category};
pub use evaluation::{Evaluation, Verdict};
pub use message::Message;
pub use outcome::{StoredStory, StoryFilter, StoryOutcome, StoryStatistics};
pub use parent::{Interest, ParentSettings, Persona, StoryArc, StoryValue};
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Output, ResponseFormat,
};
pub use role::Role;
pub use telemetry::init_telemetry;
pub use validation::ValidationReport;
pub use variety::{
    DescribedStyle, DialogueStyle, MoralStyle, NamedStyle, NarrativeStyle, Perspective,
    StoryStructure, VarietyConfig,
};
