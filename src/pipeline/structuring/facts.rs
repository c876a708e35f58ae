use std::sync::LazyLock;

use super::blood_group::BloodGroupRecognizer;
use super::clinical_notes::ClinicalNoteRecognizer;
use super::lab_values::LabValueRecognizer;
use super::medications::MedicationRecognizer;
use super::types::Recognizer;
use crate::models::MedicalFact;

/// Ordered table of recognizers run over corrected text.
///
/// Facts come out in recognizer order, then in match order within each
/// recognizer. Overlapping matches from different recognizers are all kept.
pub struct FactExtractor {
    recognizers: Vec<Box<dyn Recognizer>>,
}

impl FactExtractor {
    pub fn new(recognizers: Vec<Box<dyn Recognizer>>) -> Self {
        Self { recognizers }
    }

    /// Blood group, lab values and vitals, medications, then clinical notes.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(BloodGroupRecognizer),
            Box::new(LabValueRecognizer),
            Box::new(MedicationRecognizer),
            Box::new(ClinicalNoteRecognizer),
        ])
    }

    pub fn extract(&self, text: &str) -> Vec<MedicalFact> {
        let mut facts = Vec::new();
        for recognizer in &self.recognizers {
            match recognizer.recognize(text) {
                Ok(found) => {
                    tracing::debug!(recognizer = recognizer.name(), count = found.len(), "Recognizer finished");
                    facts.extend(found);
                }
                Err(e) => {
                    tracing::warn!(recognizer = recognizer.name(), error = %e, "Recognizer failed, skipping");
                }
            }
        }
        facts
    }
}

static STANDARD: LazyLock<FactExtractor> = LazyLock::new(FactExtractor::standard);

/// Run the standard recognizer table over corrected text.
pub fn extract_facts(corrected: &str) -> Vec<MedicalFact> {
    STANDARD.extract(corrected)
}
