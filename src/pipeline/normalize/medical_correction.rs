//! Dictionary repair of digit-for-letter OCR misreads.
//!
//! Only tokens mixing letters and digits ("Hem0glob1n", "Creat1nine") are
//! candidates, so ordinary words like "podium" never drift into "sodium".
//! A candidate is replaced when exactly one dictionary term is closest to it
//! and that term is at most two edits away.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Lowercase, sorted.
const MEDICAL_TERMS: &[&str] = &[
    "albumin", "allopurinol", "amlodipine", "amoxicillin", "amylase",
    "atorvastatin", "azithromycin", "bicarbonate", "bilirubin", "calcium",
    "cetirizine", "chloride", "cholesterol", "ciprofloxacin", "clopidogrel",
    "cortisol", "creatinine", "diclofenac", "erythrocytes", "ferritin",
    "glucose", "hematocrit", "hemoglobin", "ibuprofen", "insulin",
    "leukocytes", "levothyroxine", "lymphocytes", "metformin", "metoprolol",
    "monocytes", "neutrophils", "omeprazole", "pantoprazole", "paracetamol",
    "phosphate", "platelets", "potassium", "prednisolone", "sodium",
    "telmisartan", "thyroxine", "triglycerides", "urea",
];

const MIN_TOKEN_CHARS: usize = 5;
const MAX_EDITS: usize = 2;

static TOKEN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+").ok());

/// Repair misread medical terms inside `text`; everything else is copied.
pub fn correct_medical_terms(text: &str) -> String {
    let Some(token_re) = TOKEN.as_ref() else {
        return text.to_string();
    };
    token_re
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            match closest_term(token) {
                Some(term) => with_case_of(token, term),
                None => token.to_string(),
            }
        })
        .into_owned()
}

fn closest_term(token: &str) -> Option<&'static str> {
    let has_digit = token.chars().any(|c| c.is_ascii_digit());
    let has_letter = token.chars().any(char::is_alphabetic);
    if !has_digit || !has_letter || token.chars().count() < MIN_TOKEN_CHARS {
        return None;
    }

    let lower: Vec<char> = token.to_lowercase().chars().collect();
    let mut best: Option<(usize, &'static str)> = None;
    let mut tied = false;

    for &term in MEDICAL_TERMS {
        if lower.len().abs_diff(term.len()) > MAX_EDITS {
            continue;
        }
        let distance = levenshtein(&lower, term);
        if distance > MAX_EDITS {
            continue;
        }
        match best {
            Some((current, _)) if distance > current => {}
            Some((current, _)) if distance == current => tied = true,
            _ => {
                best = Some((distance, term));
                tied = false;
            }
        }
    }

    best.filter(|_| !tied).map(|(_, term)| term)
}

/// Carry the capitalization of `original` (ALL CAPS, Capitalized or lower)
/// over to `term`.
fn with_case_of(original: &str, term: &str) -> String {
    let letters = || original.chars().filter(|c| c.is_alphabetic());
    if letters().all(char::is_uppercase) {
        return term.to_uppercase();
    }
    if letters().next().is_some_and(char::is_uppercase) {
        let mut chars = term.chars();
        return chars
            .next()
            .map(|first| first.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
    }
    term.to_string()
}

fn levenshtein(a: &[char], b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, &ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}
