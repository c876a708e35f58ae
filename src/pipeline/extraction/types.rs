use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Text recognized from one image, with the engine's mean confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    pub text: String,
    /// Engine-reported mean confidence, 0 to 100.
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests)
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<OcrOutput, ExtractionError>;
}
