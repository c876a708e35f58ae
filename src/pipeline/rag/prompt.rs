pub const GROUNDED_SYSTEM_PROMPT: &str = r#"You are a personal medical records assistant. You help patients understand their own uploaded documents. You are NOT a doctor.

ABSOLUTE RULES, NO EXCEPTIONS:
1. Answer ONLY from the provided documents. If the documents do not contain the answer, say so.
2. NEVER diagnose, prescribe, recommend treatments, or give clinical advice.
3. NEVER say "you have [condition]"; instead say "your documents show..."
4. Quote values exactly as written, with their units and the document date.
5. Mention which document each statement comes from.
6. Use plain, patient-friendly language.
7. If something in the documents warrants medical attention, suggest the patient discuss it with their healthcare provider.

DOCUMENTS:
The following blocks contain the patient's documents. ONLY use information from these blocks."#;

/// Build the user prompt: documents first, then the question.
pub fn build_prompt(question: &str, context: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(context);
    prompt.push_str("\n\n");
    prompt.push_str(&format!("Patient question: {}\n\n", question.trim()));
    prompt.push_str("Respond based ONLY on the documents above.");
    prompt
}

/// Fixed answer when the patient has no documents yet.
pub fn no_documents_response() -> String {
    "I don't have any documents to reference yet. Once you upload medical documents, I'll be able to answer questions about them.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_enforces_grounding() {
        assert!(GROUNDED_SYSTEM_PROMPT.contains("ONLY from the provided documents"));
        assert!(GROUNDED_SYSTEM_PROMPT.contains("NEVER diagnose"));
    }

    #[test]
    fn prompt_contains_question_and_context() {
        let prompt = build_prompt("  What is my hemoglobin? ", "<DOCUMENT>\nHemoglobin: 13.5 g/dL\n</DOCUMENT>");
        assert!(prompt.starts_with("<DOCUMENT>"));
        assert!(prompt.contains("Patient question: What is my hemoglobin?\n"));
        assert!(prompt.contains("Hemoglobin: 13.5 g/dL"));
        assert!(prompt.ends_with("ONLY on the documents above."));
    }

    #[test]
    fn no_documents_response_mentions_upload() {
        let response = no_documents_response();
        assert!(response.contains("documents"));
        assert!(response.contains("upload"));
    }
}
