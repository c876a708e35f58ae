use serde::{Deserialize, Serialize};

use super::enums::{Confidence, FactKind};

/// One atomic datum inferred from a document's corrected text.
///
/// Facts are created in one batch per document and never updated
/// individually: re-extraction replaces the whole set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalFact {
    pub kind: FactKind,
    pub name: String,
    pub value: String,
    pub unit: String,
    pub confidence: Confidence,
    pub reason: String,
}

impl MedicalFact {
    /// Build a fact, or `None` when the captured value is blank.
    /// Recognizers go through here so an empty capture never becomes a fact.
    pub fn new(
        kind: FactKind,
        name: impl Into<String>,
        value: &str,
        unit: impl Into<String>,
        confidence: Confidence,
        reason: impl Into<String>,
    ) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            kind,
            name: name.into(),
            value: value.to_string(),
            unit: unit.into(),
            confidence,
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_value_yields_no_fact() {
        assert!(MedicalFact::new(
            FactKind::LabValue,
            "Hemoglobin",
            "   ",
            "g/dL",
            Confidence::High,
            "test",
        )
        .is_none());
    }

    #[test]
    fn value_is_trimmed() {
        let fact = MedicalFact::new(
            FactKind::Vital,
            "Pulse",
            " 72 ",
            "bpm",
            Confidence::High,
            "test",
        )
        .unwrap();
        assert_eq!(fact.value, "72");
        assert_eq!(fact.unit, "bpm");
    }

    #[test]
    fn serializes_with_snake_case_kind() {
        let fact = MedicalFact::new(
            FactKind::BloodGroup,
            "Blood Group",
            "O+",
            "",
            Confidence::High,
            "test",
        )
        .unwrap();
        let json = serde_json::to_value(&fact).unwrap();
        assert_eq!(json["kind"], "blood_group");
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["value"], "O+");
    }
}
