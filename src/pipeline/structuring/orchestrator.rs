use serde::{Deserialize, Serialize};

use super::classify::{classify_document, classify_from_facts};
use super::date::resolve_date;
use super::facts::FactExtractor;
use crate::models::{DocumentType, ExtractedMedicalData};
use crate::pipeline::extraction::{sanitize_ocr_text, ExtractionError, OcrEngine, OcrOutput};
use crate::pipeline::normalize::{self, Normalizer};

/// Mean OCR confidence below which a page is logged as unreliable.
const LOW_OCR_CONFIDENCE: f32 = 60.0;

/// OCR output together with the extraction derived from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedDocument {
    pub ocr: OcrOutput,
    pub data: ExtractedMedicalData,
}

/// Orchestrates per-document extraction:
/// sanitize → normalize → {facts, classify, date} → envelope
pub struct DocumentProcessor<'n> {
    normalizer: &'n Normalizer,
    extractor: FactExtractor,
}

impl DocumentProcessor<'static> {
    /// Processor over the process-wide normalizer.
    pub fn new() -> Self {
        Self::with_normalizer(normalize::global())
    }
}

impl Default for DocumentProcessor<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'n> DocumentProcessor<'n> {
    pub fn with_normalizer(normalizer: &'n Normalizer) -> Self {
        Self {
            normalizer,
            extractor: FactExtractor::standard(),
        }
    }

    /// Derive the extraction envelope from raw OCR text. Never fails: text
    /// with nothing recognizable yields no facts, unknown type and no date.
    pub fn process_text(&self, raw: &str) -> ExtractedMedicalData {
        let sanitized = sanitize_ocr_text(raw);
        let corrected = self.normalizer.normalize(&sanitized);
        let facts = self.extractor.extract(&corrected);

        let mut document_type = classify_document(&corrected);
        if document_type == DocumentType::Unknown {
            document_type = classify_from_facts(&facts);
        }
        let report_date = resolve_date(&corrected);

        tracing::debug!(
            chars = corrected.len(),
            facts = facts.len(),
            document_type = %document_type,
            has_date = report_date.is_some(),
            "Document processed"
        );

        ExtractedMedicalData {
            document_type,
            report_date,
            facts,
            corrected_text: corrected,
        }
    }

    /// Run OCR on an uploaded image, then extract from the recognized text.
    pub fn process_image(
        &self,
        engine: &dyn OcrEngine,
        image_bytes: &[u8],
    ) -> Result<ProcessedDocument, ExtractionError> {
        let ocr = engine.recognize(image_bytes)?;
        if ocr.confidence < LOW_OCR_CONFIDENCE {
            tracing::warn!(
                confidence = ocr.confidence,
                "Low OCR confidence, extracted facts may be unreliable"
            );
        }
        let data = self.process_text(&ocr.text);
        Ok(ProcessedDocument { ocr, data })
    }

    /// Extract from a plain-text upload. Bytes that are not UTF-8 are a
    /// boundary defect and are rejected rather than lossily decoded.
    pub fn process_bytes(&self, bytes: &[u8]) -> Result<ExtractedMedicalData, ExtractionError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            tracing::warn!(
                valid_up_to = e.valid_up_to(),
                len = bytes.len(),
                "Rejected non-UTF-8 text upload"
            );
            ExtractionError::from(e)
        })?;
        Ok(self.process_text(text))
    }
}
