use crate::models::{DocumentType, FactKind, MedicalFact};

/// A classifier keyword. Short ones must stand as whole words so that
/// "ct" does not fire inside "doctor" or "rx" inside "Marx".
#[derive(Debug, Clone, Copy)]
enum Keyword {
    Substring(&'static str),
    Word(&'static str),
}

impl Keyword {
    fn found_in(self, lower: &str) -> bool {
        match self {
            Self::Substring(k) => lower.contains(k),
            Self::Word(k) => contains_word(lower, k),
        }
    }
}

const PRESCRIPTION: &[Keyword] = &[
    Keyword::Substring("prescription"),
    Keyword::Word("rx"),
    Keyword::Substring("tab."),
    Keyword::Substring("cap."),
];

const SCAN: &[Keyword] = &[
    Keyword::Substring("scan"),
    Keyword::Substring("x-ray"),
    Keyword::Word("mri"),
    Keyword::Word("ct"),
    Keyword::Substring("ultrasound"),
];

const RECEIPT: &[Keyword] = &[
    Keyword::Substring("receipt"),
    Keyword::Substring("invoice"),
    Keyword::Substring("bill"),
    Keyword::Substring("payment"),
];

/// Classify a document from its corrected text. The first rule that fires
/// wins, so a prescription mentioning a scan is still a prescription.
pub fn classify_document(corrected: &str) -> DocumentType {
    let lower = corrected.to_lowercase();
    let any = |keywords: &[Keyword]| keywords.iter().any(|k| k.found_in(&lower));

    if lower.contains("blood") && (lower.contains("report") || lower.contains("test")) {
        DocumentType::BloodReport
    } else if any(PRESCRIPTION) {
        DocumentType::Prescription
    } else if any(SCAN) {
        DocumentType::Scan
    } else if any(RECEIPT) {
        DocumentType::Receipt
    } else {
        DocumentType::Unknown
    }
}

/// Infer the type from extracted facts when the keyword rules found nothing.
pub fn classify_from_facts(facts: &[MedicalFact]) -> DocumentType {
    let is_measurement = |k: FactKind| {
        matches!(k, FactKind::LabValue | FactKind::Vital | FactKind::BloodGroup)
    };
    let has_measurements = facts.iter().any(|f| is_measurement(f.kind));
    let has_meds = facts.iter().any(|f| f.kind == FactKind::Medication);

    match (has_measurements, has_meds) {
        (true, false) => DocumentType::BloodReport,
        (false, true) => DocumentType::Prescription,
        _ => DocumentType::Unknown,
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}
