use std::sync::LazyLock;

use regex::Regex;

use super::types::{compile_pattern, Recognizer};
use super::StructuringError;
use crate::models::{Confidence, FactKind, MedicalFact};

/// ABO letter, tolerating the "0" and degree-sign misreads of "O".
const ABO: &str = r"(?P<abo>(?:AB|A|B|O|0)\b|°)";

/// Rh indicator, word or sign.
const RH: &str = r"(?:[ \t]*(?:rh(?:esus)?[ \t]*(?:factor)?[ \t]*[:\-]?[ \t]*)?(?P<rh>positive|negative|pos\b|neg\b|\+ve\b|-ve\b|−ve\b|\+|-|−))?";

/// Ordered most specific first; the first pattern that matches anywhere wins.
static PATTERNS: LazyLock<Vec<Result<(&'static str, Regex), StructuringError>>> =
    LazyLock::new(|| {
        [
            (
                "blood group/type label",
                format!(r"(?i)\bblood[ \t]*(?:group|type)\b[^A-Za-z0-9\n]{{0,5}}{ABO}{RH}"),
            ),
            (
                "ABO label",
                format!(r"(?i)\babo(?:[ \t]*(?:group|type))?\b[^A-Za-z0-9\n]{{0,5}}{ABO}{RH}"),
            ),
            (
                "Rh-anchored",
                format!(
                    r"(?i)(?:^|[\s:(]){ABO}[ \t]*rh(?:esus)?[ \t]*(?:factor)?[ \t]*[:\-]?[ \t]*(?P<rh>positive|negative|pos\b|neg\b|\+ve\b|-ve\b|\+|-)"
                ),
            ),
        ]
        .into_iter()
        .map(|(name, pattern)| compile_pattern(name, &pattern).map(|re| (name, re)))
        .collect()
    });

pub struct BloodGroupRecognizer;

impl Recognizer for BloodGroupRecognizer {
    fn name(&self) -> &'static str {
        "blood_group"
    }

    fn recognize(&self, text: &str) -> Result<Vec<MedicalFact>, StructuringError> {
        for entry in PATTERNS.iter() {
            let (pattern_name, re) = match entry {
                Ok(compiled) => compiled,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping blood group pattern");
                    continue;
                }
            };

            let Some(caps) = re.captures(text) else {
                continue;
            };
            let abo = caps.name("abo").map(|m| m.as_str()).unwrap_or("");
            let rh = caps.name("rh").map(|m| m.as_str()).unwrap_or("");
            let value = format!("{}{}", canonical_abo(abo), canonical_rh(rh));

            let fact = MedicalFact::new(
                FactKind::BloodGroup,
                "Blood Group",
                &value,
                "",
                Confidence::High,
                format!("{pattern_name} pattern matched \"{}\"", caps[0].trim()),
            );
            return Ok(fact.into_iter().collect());
        }
        Ok(vec![])
    }
}

fn canonical_abo(letter: &str) -> String {
    match letter {
        "0" | "°" => "O".to_string(),
        other => other.to_uppercase(),
    }
}

fn canonical_rh(indicator: &str) -> &'static str {
    match indicator.to_lowercase().as_str() {
        "positive" | "pos" | "+ve" | "+" => "+",
        "negative" | "neg" | "-ve" | "−ve" | "-" | "−" => "-",
        _ => "",
    }
}
