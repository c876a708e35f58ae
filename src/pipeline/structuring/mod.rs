pub mod types;
pub mod blood_group;
pub mod lab_values;
pub mod medications;
pub mod clinical_notes;
pub mod facts;
pub mod classify;
pub mod date;
pub mod orchestrator;

pub use types::*;
pub use facts::*;
pub use classify::*;
pub use date::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuringError {
    #[error("Recognizer pattern {name} failed to compile: {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Recognizer {name} failed: {reason}")]
    RecognizerFailed { name: String, reason: String },
}
