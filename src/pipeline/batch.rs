//! Concurrent extraction over many uploaded documents.
//!
//! Extraction is CPU-bound and independent per document, so each text runs
//! on the blocking pool. Results come back in input order.

use std::sync::Arc;

use crate::models::{DocumentType, ExtractedMedicalData};
use crate::pipeline::structuring::DocumentProcessor;

/// Extract every text concurrently. A task that panics is logged and its
/// slot holds an empty extraction; the rest of the batch is unaffected.
pub async fn process_batch(texts: Vec<String>) -> Vec<ExtractedMedicalData> {
    let processor = Arc::new(DocumentProcessor::new());
    let total = texts.len();

    let handles: Vec<_> = texts
        .into_iter()
        .map(|text| {
            let processor = Arc::clone(&processor);
            tokio::task::spawn_blocking(move || processor.process_text(&text))
        })
        .collect();

    let mut results = Vec::with_capacity(total);
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(data) => results.push(data),
            Err(e) => {
                tracing::error!(index, error = %e, "Extraction task failed");
                results.push(empty_extraction());
            }
        }
    }

    tracing::info!(documents = total, "Batch extraction complete");
    results
}

fn empty_extraction() -> ExtractedMedicalData {
    ExtractedMedicalData {
        document_type: DocumentType::Unknown,
        report_date: None,
        facts: vec![],
        corrected_text: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn results_follow_input_order() {
        let texts = vec![
            "Blood Group: A+".to_string(),
            "Tab. Paracetamol 500mg".to_string(),
            "nothing here".to_string(),
            "Pulse: 72 bpm".to_string(),
        ];
        let results = process_batch(texts).await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].facts[0].value, "A+");
        assert_eq!(results[1].document_type, DocumentType::Prescription);
        assert!(results[2].facts.is_empty());
        assert_eq!(results[3].facts[0].name, "Pulse");
    }

    #[tokio::test]
    async fn batch_matches_sequential_processing() {
        let texts: Vec<String> = (0..16)
            .map(|i| format!("Hemoglobin: {}.5 g/dL\nDate: {:02}/01/2024", 10 + i % 5, i + 1))
            .collect();
        let processor = DocumentProcessor::new();
        let expected: Vec<_> = texts.iter().map(|t| processor.process_text(t)).collect();

        assert_eq!(process_batch(texts).await, expected);
    }

    #[tokio::test]
    async fn empty_batch() {
        assert!(process_batch(vec![]).await.is_empty());
    }

    #[test]
    fn empty_extraction_is_blank() {
        let data = empty_extraction();
        assert!(data.facts.is_empty());
        assert_eq!(data.document_type, DocumentType::Unknown);
        assert!(data.corrected_text.is_empty());
    }
}
