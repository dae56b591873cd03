//! Trait definitions for the Lullaby bedtime story generator.
//!
//! [`LullabyDriver`] is the seam between the story pipeline and a chat model
//! backend. [`StoryRepository`] is the seam between the pipeline and story
//! persistence.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod driver;
mod repository;

pub use driver::LullabyDriver;
pub use repository::StoryRepository;
