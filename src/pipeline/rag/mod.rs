pub mod evidence;
pub mod context;
pub mod prompt;
pub mod orchestrator;

pub use evidence::*;
pub use context::*;
pub use prompt::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RagError {
    #[error("LLM generation failed: {0}")]
    Generation(String),

    #[error("Question is empty")]
    EmptyQuestion,
}
