use crate::models::SourceDocument;

/// Character budget for the rendered context (roughly 3000 tokens).
const MAX_CONTEXT_CHARS: usize = 12_000;

/// Render the patient's documents as tagged blocks for the LLM prompt.
///
/// Each block carries type, date and filename followed by the stored text,
/// which is the corrected text whenever one exists. Documents that would
/// overflow the budget are left out whole rather than cut mid-line.
pub fn build_context(docs: &[SourceDocument]) -> String {
    let mut blocks = Vec::new();
    let mut total_chars = 0;

    for doc in docs {
        let block = format_document(doc);
        let len = block.chars().count();
        if total_chars + len > MAX_CONTEXT_CHARS {
            tracing::debug!(
                document_id = %doc.id,
                chars = len,
                "Context budget reached, document left out"
            );
            continue;
        }
        total_chars += len;
        blocks.push(block);
    }

    blocks.join("\n\n")
}

fn format_document(doc: &SourceDocument) -> String {
    let mut header = format!("[Doc ID: {}] [Type: {}]", doc.id, doc.document_type.label());
    if let Some(date) = doc.report_date {
        header.push_str(&format!(" [Date: {date}]"));
    }
    if let Some(name) = doc.filename.as_deref().filter(|n| !n.trim().is_empty()) {
        header.push_str(&format!(" [File: {name}]"));
    }
    format!("<DOCUMENT>\n{header}\n{}\n</DOCUMENT>", doc.stored_text().trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentType;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn doc(raw: &str, corrected: Option<&str>) -> SourceDocument {
        SourceDocument {
            id: Uuid::new_v4(),
            filename: Some("cbc.jpg".into()),
            document_type: DocumentType::BloodReport,
            report_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            raw_text: raw.into(),
            corrected_text: corrected.map(String::from),
        }
    }

    #[test]
    fn block_carries_metadata_and_corrected_text() {
        let d = doc("Hb: 13.5 gm%", Some("Hemoglobin: 13.5 g/dL"));
        let context = build_context(std::slice::from_ref(&d));
        assert!(context.contains(&format!("[Doc ID: {}]", d.id)));
        assert!(context.contains("[Type: Blood Report]"));
        assert!(context.contains("[Date: 2024-03-15]"));
        assert!(context.contains("[File: cbc.jpg]"));
        assert!(context.contains("Hemoglobin: 13.5 g/dL"));
        assert!(!context.contains("gm%"));
    }

    #[test]
    fn raw_text_when_no_correction() {
        let context = build_context(&[doc("Pulse: 72 bpm", None)]);
        assert!(context.contains("Pulse: 72 bpm"));
    }

    #[test]
    fn documents_keep_corpus_order() {
        let context = build_context(&[doc("first text", None), doc("second text", None)]);
        let first = context.find("first text").unwrap();
        let second = context.find("second text").unwrap();
        assert!(first < second);
        assert_eq!(context.matches("<DOCUMENT>").count(), 2);
    }

    #[test]
    fn over_budget_documents_are_left_out() {
        let huge = "x".repeat(MAX_CONTEXT_CHARS);
        let context = build_context(&[doc(&huge, None), doc("Pulse: 72 bpm", None)]);
        assert!(!context.contains(&huge));
        assert!(context.contains("Pulse: 72 bpm"));
    }

    #[test]
    fn empty_corpus_is_empty_context() {
        assert_eq!(build_context(&[]), "");
    }
}
