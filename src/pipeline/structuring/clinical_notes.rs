//! Labelled free-text fields: diagnosis, allergies, advised tests and the
//! patient header (age, sex, date of birth).

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::date::parse_date;
use super::types::{compile_pattern, Recognizer};
use super::StructuringError;
use crate::models::{Confidence, FactKind, MedicalFact};

struct NoteRule {
    name: &'static str,
    pattern: &'static str,
    build: fn(&Captures<'_>) -> Vec<MedicalFact>,
}

const NOTE_RULES: &[NoteRule] = &[
    NoteRule {
        name: "diagnosis",
        pattern: r"(?im)^[ \t]*(?:(?:provisional|final|clinical)[ \t]+)?(?:diagnosis|impression)[ \t]*[:\-][ \t]*(?P<value>[^\n]+)",
        build: build_diagnosis,
    },
    NoteRule {
        name: "allergy",
        pattern: r"(?im)\b(?:allerg(?:y|ies)[ \t]*[:\-]|allergic[ \t]+to)[ \t]*(?P<value>[^\n]+)",
        build: build_allergies,
    },
    NoteRule {
        name: "tests advised",
        pattern: r"(?im)^[ \t]*(?:advised|advice|investigations?|tests?[ \t]+advised)[ \t]*[:\-][ \t]*(?P<value>[^\n]+)",
        build: build_tests,
    },
    NoteRule {
        name: "age and sex",
        pattern: r"(?i)\bage[ \t]*/[ \t]*(?:sex|gender)[ \t]*[:\-]?[ \t]*(?P<age>\d{1,3})[ \t]*(?:years?|yrs?|y)?[ \t]*/[ \t]*(?P<sex>male|female|m|f)\b",
        build: build_age_sex,
    },
    NoteRule {
        name: "age",
        pattern: r"(?i)\bage[ \t]*[:\-][ \t]*(?P<age>\d{1,3})(?:[ \t]*(?:years?|yrs?|y))?\b",
        build: build_age_sex,
    },
    NoteRule {
        name: "sex",
        pattern: r"(?i)\b(?:sex|gender)[ \t]*[:\-][ \t]*(?P<sex>male|female|m|f)\b",
        build: build_age_sex,
    },
    NoteRule {
        name: "date of birth",
        pattern: r"(?i)\b(?:dob|d\.o\.b\.?|date[ \t]+of[ \t]+birth)[ \t]*[:\-]?[ \t]*(?P<value>\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}|\d{4}-\d{1,2}-\d{1,2}|\d{1,2}[ \t]+[a-z]{3,9}\.?[ \t]+\d{4})",
        build: build_birth_date,
    },
];

static COMPILED: LazyLock<Vec<(&'static NoteRule, Result<Regex, StructuringError>)>> =
    LazyLock::new(|| {
        NOTE_RULES
            .iter()
            .map(|rule| (rule, compile_pattern(rule.name, rule.pattern)))
            .collect()
    });

pub struct ClinicalNoteRecognizer;

impl Recognizer for ClinicalNoteRecognizer {
    fn name(&self) -> &'static str {
        "clinical_notes"
    }

    fn recognize(&self, text: &str) -> Result<Vec<MedicalFact>, StructuringError> {
        let mut facts = Vec::new();
        for (rule, compiled) in COMPILED.iter() {
            match compiled {
                Ok(re) => {
                    for caps in re.captures_iter(text) {
                        facts.extend((rule.build)(&caps));
                    }
                }
                Err(e) => tracing::warn!(rule = rule.name, error = %e, "Skipping clinical note rule"),
            }
        }
        Ok(facts)
    }
}

fn captured<'t>(caps: &Captures<'t>, group: &str) -> &'t str {
    caps.name(group).map(|m| m.as_str()).unwrap_or("")
}

fn clean_item(item: &str) -> &str {
    item.trim().trim_end_matches(['.', ';', ',']).trim()
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split([',', ';'])
        .flat_map(|part| part.split(" and "))
        .map(clean_item)
        .filter(|item| !item.is_empty())
        .collect()
}

fn is_nil(item: &str) -> bool {
    let lower = item.to_lowercase();
    matches!(lower.as_str(), "nil" | "none" | "nkda" | "nka" | "no" | "not known")
        || lower.starts_with("no known")
}

fn build_diagnosis(caps: &Captures<'_>) -> Vec<MedicalFact> {
    MedicalFact::new(
        FactKind::Diagnosis,
        "Diagnosis",
        clean_item(captured(caps, "value")),
        "",
        Confidence::Medium,
        "labelled diagnosis line",
    )
    .into_iter()
    .collect()
}

fn build_allergies(caps: &Captures<'_>) -> Vec<MedicalFact> {
    let value = captured(caps, "value");
    if is_nil(clean_item(value)) {
        return vec![];
    }
    split_list(value)
        .into_iter()
        .filter(|item| !is_nil(item))
        .filter_map(|item| {
            MedicalFact::new(
                FactKind::Allergy,
                "Allergy",
                item,
                "",
                Confidence::Medium,
                "labelled allergy list",
            )
        })
        .collect()
}

fn build_tests(caps: &Captures<'_>) -> Vec<MedicalFact> {
    split_list(captured(caps, "value"))
        .into_iter()
        .filter_map(|item| {
            MedicalFact::new(
                FactKind::Test,
                "Test Advised",
                item,
                "",
                Confidence::Medium,
                "labelled list of advised investigations",
            )
        })
        .collect()
}

fn build_age_sex(caps: &Captures<'_>) -> Vec<MedicalFact> {
    let mut facts = Vec::new();
    if let Some(age) = caps.name("age") {
        facts.extend(MedicalFact::new(
            FactKind::PatientInfo,
            "Age",
            age.as_str(),
            "years",
            Confidence::High,
            "labelled patient age",
        ));
    }
    if let Some(sex) = caps.name("sex") {
        let canonical = if sex.as_str().to_lowercase().starts_with('f') {
            "Female"
        } else {
            "Male"
        };
        facts.extend(MedicalFact::new(
            FactKind::PatientInfo,
            "Sex",
            canonical,
            "",
            Confidence::High,
            "labelled patient sex",
        ));
    }
    facts
}

/// Stored as ISO-8601 when the date parses, verbatim otherwise.
fn build_birth_date(caps: &Captures<'_>) -> Vec<MedicalFact> {
    let raw = captured(caps, "value");
    let value = parse_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string());
    MedicalFact::new(
        FactKind::PatientInfo,
        "Date of Birth",
        &value,
        "",
        Confidence::High,
        "labelled date of birth",
    )
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize(text: &str) -> Vec<MedicalFact> {
        ClinicalNoteRecognizer.recognize(text).unwrap()
    }

    fn values(facts: &[MedicalFact], kind: FactKind) -> Vec<&str> {
        facts
            .iter()
            .filter(|f| f.kind == kind)
            .map(|f| f.value.as_str())
            .collect()
    }

    #[test]
    fn all_rules_compile() {
        for (rule, compiled) in COMPILED.iter() {
            assert!(compiled.is_ok(), "rule {} failed to compile", rule.name);
        }
    }

    #[test]
    fn diagnosis_line() {
        let facts = recognize("Provisional Diagnosis: Type 2 Diabetes Mellitus.");
        assert_eq!(values(&facts, FactKind::Diagnosis), vec!["Type 2 Diabetes Mellitus"]);
        assert_eq!(facts[0].confidence, Confidence::Medium);

        let facts = recognize("Impression - Viral fever");
        assert_eq!(values(&facts, FactKind::Diagnosis), vec!["Viral fever"]);
    }

    #[test]
    fn allergy_list_is_split() {
        let facts = recognize("Allergies: Penicillin, Sulfa drugs");
        assert_eq!(values(&facts, FactKind::Allergy), vec!["Penicillin", "Sulfa drugs"]);

        let facts = recognize("Patient is allergic to peanuts and shellfish.");
        assert_eq!(values(&facts, FactKind::Allergy), vec!["peanuts", "shellfish"]);
    }

    #[test]
    fn nil_allergies_yield_nothing() {
        assert!(recognize("Allergy: Nil").is_empty());
        assert!(recognize("Allergies: NKDA").is_empty());
        assert!(recognize("Allergies - No known drug allergies").is_empty());
    }

    #[test]
    fn advised_tests() {
        let facts = recognize("Advised: Complete Blood Count, Lipid Profile");
        assert_eq!(
            values(&facts, FactKind::Test),
            vec!["Complete Blood Count", "Lipid Profile"]
        );
    }

    #[test]
    fn patient_header() {
        let facts = recognize("Age: 45 years\nSex: M");
        let age = facts.iter().find(|f| f.name == "Age").unwrap();
        assert_eq!(age.value, "45");
        assert_eq!(age.unit, "years");
        assert_eq!(age.confidence, Confidence::High);
        let sex = facts.iter().find(|f| f.name == "Sex").unwrap();
        assert_eq!(sex.value, "Male");
    }

    #[test]
    fn combined_age_sex() {
        let facts = recognize("Age/Sex: 32Y/F");
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].value, "32");
        assert_eq!(facts[1].value, "Female");
    }

    #[test]
    fn date_of_birth_in_iso() {
        let facts = recognize("DOB: 12/06/1980");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].name, "Date of Birth");
        assert_eq!(facts[0].value, "1980-06-12");
    }

    #[test]
    fn unlabelled_prose_yields_nothing() {
        assert!(recognize("Patient came for routine follow up").is_empty());
    }
}
