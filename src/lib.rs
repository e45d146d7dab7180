/// Zunzuneo - Synthetic Social-Media Personas
///
/// Core library turning a world-state prompt into complete persona records:
/// personality sampling, prompt composition, LLM completion, validation and
/// assembly, plus the repository boundary those records are handed to.

pub mod config;
pub mod core;


pub use crate::core::persona_gen::{PersonaPipeline, PipelineError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
