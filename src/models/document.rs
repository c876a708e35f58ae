use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentType;
use super::fact::MedicalFact;

/// Per-document extraction envelope, persisted next to the raw OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMedicalData {
    pub document_type: DocumentType,
    pub report_date: Option<NaiveDate>,
    pub facts: Vec<MedicalFact>,
    pub corrected_text: String,
}

/// A stored document as handed to the query-time components.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub id: Uuid,
    pub filename: Option<String>,
    pub document_type: DocumentType,
    pub report_date: Option<NaiveDate>,
    pub raw_text: String,
    pub corrected_text: Option<String>,
}

impl SourceDocument {
    /// Build a stored document from its raw OCR text and extraction output.
    pub fn from_extraction(
        id: Uuid,
        filename: Option<String>,
        raw_text: String,
        data: &ExtractedMedicalData,
    ) -> Self {
        Self {
            id,
            filename,
            document_type: data.document_type,
            report_date: data.report_date,
            raw_text,
            corrected_text: Some(data.corrected_text.clone()),
        }
    }

    /// Text the LLM saw and citations point into: corrected when available.
    pub fn stored_text(&self) -> &str {
        self.corrected_text.as_deref().unwrap_or(&self.raw_text)
    }

    /// Display label: type and date, else filename, else type alone.
    pub fn label(&self) -> String {
        match (&self.report_date, &self.filename) {
            (Some(date), _) => format!("{} · {}", self.document_type.label(), date),
            (None, Some(name)) if !name.trim().is_empty() => name.clone(),
            _ => self.document_type.label().to_string(),
        }
    }
}
