//! OCR text normalization: misread correction, abbreviation expansion and
//! unit normalization, all driven by the tables in `tables.rs`.

pub mod tables;
pub mod medical_correction;
pub mod normalizer;

pub use normalizer::*;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Cannot read dictionary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed dictionary file: {0}")]
    Json(#[from] serde_json::Error),
}
