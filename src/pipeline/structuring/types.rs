use regex::Regex;

use super::StructuringError;
use crate::models::MedicalFact;

/// One entry of the fact extractor's recognizer table.
///
/// A recognizer contributes zero or more well-formed facts. Returning `Err`
/// marks a defect in the recognizer itself; the extractor logs it and moves
/// on to the next recognizer.
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn recognize(&self, text: &str) -> Result<Vec<MedicalFact>, StructuringError>;
}

/// Compile a table pattern, tagging failures with the entry name.
pub(crate) fn compile_pattern(name: &str, pattern: &str) -> Result<Regex, StructuringError> {
    Regex::new(pattern).map_err(|e| StructuringError::InvalidPattern {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
