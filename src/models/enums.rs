use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(DocumentType {
    BloodReport => "blood_report",
    Prescription => "prescription",
    Scan => "scan",
    Receipt => "receipt",
    Unknown => "unknown",
});

str_enum!(FactKind {
    LabValue => "lab_value",
    Vital => "vital",
    Diagnosis => "diagnosis",
    Medication => "medication",
    BloodGroup => "blood_group",
    Allergy => "allergy",
    Test => "test",
    PatientInfo => "patient_info",
});

str_enum!(Confidence {
    High => "high",
    Medium => "medium",
    Low => "low",
});

impl DocumentType {
    /// Human-readable label used in citations and LLM context blocks.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BloodReport => "Blood Report",
            Self::Prescription => "Prescription",
            Self::Scan => "Scan",
            Self::Receipt => "Receipt",
            Self::Unknown => "Document",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_type_round_trip() {
        for (variant, s) in [
            (DocumentType::BloodReport, "blood_report"),
            (DocumentType::Prescription, "prescription"),
            (DocumentType::Scan, "scan"),
            (DocumentType::Receipt, "receipt"),
            (DocumentType::Unknown, "unknown"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentType::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn fact_kind_round_trip() {
        for (variant, s) in [
            (FactKind::LabValue, "lab_value"),
            (FactKind::Vital, "vital"),
            (FactKind::Diagnosis, "diagnosis"),
            (FactKind::Medication, "medication"),
            (FactKind::BloodGroup, "blood_group"),
            (FactKind::Allergy, "allergy"),
            (FactKind::Test, "test"),
            (FactKind::PatientInfo, "patient_info"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(FactKind::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn confidence_round_trip() {
        for (variant, s) in [
            (Confidence::High, "high"),
            (Confidence::Medium, "medium"),
            (Confidence::Low, "low"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(Confidence::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn invalid_enum_value_is_rejected() {
        let err = FactKind::from_str("symptom").unwrap_err();
        assert!(err.to_string().contains("FactKind"));
        assert!(err.to_string().contains("symptom"));
    }

    #[test]
    fn serde_uses_wire_strings() {
        let json = serde_json::to_string(&FactKind::BloodGroup).unwrap();
        assert_eq!(json, "\"blood_group\"");
        let json = serde_json::to_string(&DocumentType::BloodReport).unwrap();
        assert_eq!(json, "\"blood_report\"");
        let parsed: Confidence = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Confidence::Medium);
    }
}
