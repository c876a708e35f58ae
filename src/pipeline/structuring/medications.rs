use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::lab_values::is_measurement_name;
use super::types::{compile_pattern, Recognizer};
use super::StructuringError;
use crate::models::{Confidence, FactKind, MedicalFact};

/// Connectives that never start, and never end, a medicine name.
const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "of", "to", "in", "as"];

const DOSE: &str = r"(?P<dose>\d+(?:\.\d+)?)[ \t]*(?P<unit>(?:mcg|mg|µg|ml|iu|units?|g)\b|%)";

/// "Tab. Paracetamol 500mg", "Inj Insulin 10 units", "Syp. Benadryl".
/// Only the prescription shorthands anchor; "tablet" or "injection" in an
/// instruction never does.
static ANCHORED: LazyLock<Result<Regex, StructuringError>> = LazyLock::new(|| {
    compile_pattern(
        "prefixed medication",
        &format!(
            r"(?i)\b(?P<form>tab|cap|syp|syr|inj)(?P<dot>\.)?[ \t]+(?P<name>[a-z][a-z0-9\-]*(?:[ \t]+[a-z][a-z0-9\-]*)?)(?:[ \t]+{DOSE})?"
        ),
    )
});

/// "Metformin 500mg" on a line of its own, optionally numbered or bulleted.
static FALLBACK: LazyLock<Result<Regex, StructuringError>> = LazyLock::new(|| {
    compile_pattern(
        "unprefixed medication",
        &format!(
            r"(?i)^[ \t]*(?:\d+[.)][ \t]*|[-*•][ \t]*)?(?P<name>[a-z][a-z\-]{{2,}}(?:[ \t]+[a-z][a-z\-]{{2,}})?)[ \t]+{DOSE}(?P<slash>[ \t]*/)?"
        ),
    )
});

pub struct MedicationRecognizer;

impl Recognizer for MedicationRecognizer {
    fn name(&self) -> &'static str {
        "medications"
    }

    fn recognize(&self, text: &str) -> Result<Vec<MedicalFact>, StructuringError> {
        let anchored = ANCHORED.as_ref().map_err(Clone::clone)?;
        let fallback = match FALLBACK.as_ref() {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(error = %e, "Unprefixed medication fallback disabled");
                None
            }
        };

        let mut facts = Vec::new();
        for line in text.lines() {
            let mut anchored_hit = false;
            for caps in anchored.captures_iter(line) {
                if let Some(fact) = anchored_fact(&caps) {
                    anchored_hit = true;
                    facts.push(fact);
                }
            }
            if anchored_hit {
                continue;
            }
            if let Some(caps) = fallback.and_then(|re| re.captures(line)) {
                facts.extend(fallback_fact(&caps));
            }
        }

        Ok(facts)
    }
}

fn anchored_fact(caps: &Captures<'_>) -> Option<MedicalFact> {
    let raw_name = caps.name("name")?.as_str();
    // An undotted "cap" or "tab" is only a prefix before a capitalized name.
    if caps.name("dot").is_none() && !raw_name.starts_with(|c: char| c.is_uppercase()) {
        return None;
    }
    let name = clean_name(raw_name)?;
    let form = caps.name("form").map(|m| m.as_str()).unwrap_or("");
    let reason = format!("\"{form}\" prefix followed by a medicine name");
    dosed_fact(caps, name, Confidence::Medium, reason)
}

fn fallback_fact(caps: &Captures<'_>) -> Option<MedicalFact> {
    // "Glucose 110 mg/dL" is a concentration, not a dose.
    if caps.name("slash").is_some() {
        return None;
    }
    let name = clean_name(caps.name("name")?.as_str())?;
    if is_measurement_name(&name) {
        return None;
    }
    dosed_fact(
        caps,
        name,
        Confidence::Low,
        "name followed by a dose without a Tab./Cap. prefix".to_string(),
    )
}

/// Value is the dose amount when one was captured, else the name itself.
fn dosed_fact(
    caps: &Captures<'_>,
    name: String,
    confidence: Confidence,
    reason: String,
) -> Option<MedicalFact> {
    match (caps.name("dose"), caps.name("unit")) {
        (Some(dose), unit) => MedicalFact::new(
            FactKind::Medication,
            name,
            dose.as_str(),
            unit.map(|u| u.as_str()).unwrap_or(""),
            confidence,
            reason,
        ),
        (None, _) => {
            let value = name.clone();
            MedicalFact::new(FactKind::Medication, name, &value, "", confidence, reason)
        }
    }
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.iter().any(|s| s.eq_ignore_ascii_case(word))
}

/// Reject names starting with a connective and trim trailing connectives.
fn clean_name(raw: &str) -> Option<String> {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    if words.first().is_some_and(|w| is_stop_word(w)) {
        return None;
    }
    while words.last().is_some_and(|w| is_stop_word(w)) {
        words.pop();
    }
    if words.is_empty() {
        return None;
    }
    Some(words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(text: &str) -> Vec<MedicalFact> {
        MedicationRecognizer.recognize(text).unwrap()
    }

    #[test]
    fn patterns_compile() {
        assert!(ANCHORED.is_ok());
        assert!(FALLBACK.is_ok());
    }

    #[test]
    fn prefixed_with_dose() {
        let facts = recognize("Tab. Paracetamol 500mg");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].kind, FactKind::Medication);
        assert_eq!(facts[0].name, "Paracetamol");
        assert_eq!(facts[0].value, "500");
        assert_eq!(facts[0].unit, "mg");
        assert_eq!(facts[0].confidence, Confidence::Medium);
    }

    #[test]
    fn prefixed_without_dose_uses_name_as_value() {
        let facts = recognize("Syp. Benadryl");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "Benadryl");
        assert_eq!(facts[0].value, "Benadryl");
        assert!(facts[0].unit.is_empty());
    }

    #[test]
    fn two_word_names() {
        let facts = recognize("Tab Augmentin Duo 625 mg");
        assert_eq!(facts[0].name, "Augmentin Duo");
        assert_eq!(facts[0].value, "625");
    }

    #[test]
    fn injection_units() {
        let facts = recognize("Inj. Insulin 10 units");
        assert_eq!(facts[0].name, "Insulin");
        assert_eq!(facts[0].value, "10");
        assert_eq!(facts[0].unit, "units");
    }

    #[test]
    fn several_on_one_line() {
        let facts = recognize("Tab. Metformin 500mg, Cap. Omeprazole 20mg");
        let names: Vec<_> = facts.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Metformin", "Omeprazole"]);
    }

    #[test]
    fn connective_start_is_suppressed() {
        assert!(recognize("Remove the cap of the bottle").is_empty());
    }

    #[test]
    fn trailing_connective_is_trimmed() {
        let facts = recognize("Tab. Paracetamol and rest");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "Paracetamol");
    }

    #[test]
    fn unprefixed_fallback_is_low() {
        let facts = recognize("1. Metformin 500mg twice daily");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "Metformin");
        assert_eq!(facts[0].value, "500");
        assert_eq!(facts[0].confidence, Confidence::Low);
    }

    #[test]
    fn fallback_skips_concentrations_and_measurements() {
        assert!(recognize("Glucose 110 mg/dL").is_empty());
        assert!(recognize("Creatinine 1.1 mg").is_empty());
    }

    #[test]
    fn fallback_only_on_lines_without_prefix() {
        let facts = recognize("Tab. Amlodipine 5mg\nAtorvastatin 10mg");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].confidence, Confidence::Medium);
        assert_eq!(facts[1].name, "Atorvastatin");
        assert_eq!(facts[1].confidence, Confidence::Low);
    }

    #[test]
    fn instruction_prose_is_not_a_medication() {
        assert!(recognize("Take 1 tablet after food").is_empty());
        assert!(recognize("Injection site redness noted").is_empty());
        assert!(recognize("Capsule endoscopy advised").is_empty());
        assert!(recognize("Syrup to be shaken well").is_empty());
        assert!(recognize("Wear a cap outdoors").is_empty());
    }

    #[test]
    fn undotted_prefix_needs_capitalized_name() {
        let facts = recognize("Inj Insulin 10 units");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "Insulin");
        assert_eq!(facts[0].confidence, Confidence::Medium);

        let facts = recognize("tab. paracetamol 650mg");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "paracetamol");
    }

    #[test]
    fn plain_prose_yields_nothing() {
        assert!(recognize("Patient reports mild headache since morning").is_empty());
    }
}
