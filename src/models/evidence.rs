use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A citation linking a generated answer to a line of a source document.
///
/// `snippet` is always a verbatim substring of the document's stored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceItem {
    pub document_id: Uuid,
    pub document_label: String,
    pub snippet: String,
    /// 1-based line number in the stored text.
    pub line_number: usize,
    pub truncated: bool,
}
