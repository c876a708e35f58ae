//! Answer-to-source grounding.
//!
//! A recall-biased lexical heuristic, not semantic search: any reasonably
//! long line sharing a term with the question or answer is a candidate.
//! Snippets are always cut from the stored text itself, never rephrased.

use std::collections::BTreeSet;

use crate::models::{EvidenceItem, SourceDocument};

pub const DEFAULT_MAX_ITEMS: usize = 5;
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 200;

/// Tuning knobs for the evidence locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidenceConfig {
    /// Stop collecting once this many items were accepted.
    pub max_items: usize,
    /// Lines whose trimmed length is at most this are noise.
    pub min_line_len: usize,
    /// Terms whose length is at most this are ignored.
    pub min_term_len: usize,
    pub snippet_max_chars: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            min_line_len: 10,
            min_term_len: 3,
            snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS,
        }
    }
}

/// Locate supporting lines for `answer` with the default limits.
pub fn locate_evidence(
    question: &str,
    answer: &str,
    corpus: &[SourceDocument],
) -> Vec<EvidenceItem> {
    locate_evidence_with(question, answer, corpus, &EvidenceConfig::default())
}

/// Locate supporting lines: documents in corpus order, lines in text order,
/// first `max_items` candidates win.
pub fn locate_evidence_with(
    question: &str,
    answer: &str,
    corpus: &[SourceDocument],
    config: &EvidenceConfig,
) -> Vec<EvidenceItem> {
    let terms = search_terms(question, answer, config.min_term_len);
    if terms.is_empty() || config.max_items == 0 {
        return vec![];
    }

    let mut items = Vec::new();
    'documents: for doc in corpus {
        let label = doc.label();
        for (index, line) in doc.stored_text().lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.chars().count() <= config.min_line_len {
                continue;
            }
            let lower = trimmed.to_lowercase();
            if !terms.iter().any(|term| lower.contains(term.as_str())) {
                continue;
            }

            let (snippet, truncated) = truncate_chars(trimmed, config.snippet_max_chars);
            items.push(EvidenceItem {
                document_id: doc.id,
                document_label: label.clone(),
                snippet: snippet.to_string(),
                line_number: index + 1,
                truncated,
            });
            if items.len() >= config.max_items {
                break 'documents;
            }
        }
    }

    tracing::debug!(
        terms = terms.len(),
        documents = corpus.len(),
        items = items.len(),
        "Evidence located"
    );
    items
}

/// Drop items that no longer point at verbatim text of a corpus document.
pub fn verify_evidence(items: Vec<EvidenceItem>, corpus: &[SourceDocument]) -> Vec<EvidenceItem> {
    items
        .into_iter()
        .filter(|item| {
            let Some(doc) = corpus.iter().find(|d| d.id == item.document_id) else {
                tracing::warn!(
                    document_id = %item.document_id,
                    "Evidence references a document outside the corpus, removed"
                );
                return false;
            };
            let verbatim = doc.raw_text.contains(&item.snippet)
                || doc
                    .corrected_text
                    .as_deref()
                    .is_some_and(|t| t.contains(&item.snippet));
            if !verbatim {
                tracing::warn!(
                    document_id = %item.document_id,
                    line = item.line_number,
                    "Evidence snippet is not verbatim source text, removed"
                );
            }
            verbatim
        })
        .collect()
}

/// Lowercase whitespace tokens of question and answer, edge punctuation
/// trimmed, longer than `min_len` characters.
fn search_terms(question: &str, answer: &str, min_len: usize) -> BTreeSet<String> {
    question
        .split_whitespace()
        .chain(answer.split_whitespace())
        .map(|token| {
            token
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| token.chars().count() > min_len)
        .collect()
}

/// First `max_chars` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
