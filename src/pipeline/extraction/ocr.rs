use super::types::{OcrEngine, OcrOutput};
use super::ExtractionError;

/// Mock OCR engine for unit testing without a real recognizer.
pub struct MockOcrEngine {
    result: Result<OcrOutput, String>,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            result: Ok(OcrOutput {
                text: text.to_string(),
                confidence,
            }),
        }
    }

    /// An engine whose every call fails with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn recognize(&self, image_bytes: &[u8]) -> Result<OcrOutput, ExtractionError> {
        if image_bytes.is_empty() {
            return Err(ExtractionError::EmptyInput);
        }
        self.result
            .clone()
            .map_err(ExtractionError::OcrProcessing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ocr_returns_configured_text() {
        let engine = MockOcrEngine::new("Metformin 500mg", 92.0);
        let result = engine.recognize(b"fake_image_bytes").unwrap();
        assert_eq!(result.text, "Metformin 500mg");
        assert!((result.confidence - 92.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mock_ocr_rejects_empty_image() {
        let engine = MockOcrEngine::new("anything", 90.0);
        assert!(matches!(
            engine.recognize(b""),
            Err(ExtractionError::EmptyInput)
        ));
    }

    #[test]
    fn failing_mock_reports_processing_error() {
        let engine = MockOcrEngine::failing("engine crashed");
        let err = engine.recognize(b"fake").unwrap_err();
        assert!(matches!(err, ExtractionError::OcrProcessing(ref m) if m == "engine crashed"));
    }
}
