pub mod types;
pub mod ocr;
pub mod sanitize;

pub use types::*;
pub use ocr::*;
pub use sanitize::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("Empty input: nothing to extract")]
    EmptyInput,

    #[error("Text encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),
}
