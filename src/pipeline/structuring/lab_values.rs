//! Keyword-anchored numeric measurements: lab values and vitals.
//!
//! Each table entry names the keywords that may label a measurement, the
//! value shape, and the unit tokens accepted right after the value. The
//! keyword must immediately precede the value; only separators (`:`, `=`,
//! `-`) and one short parenthetical are allowed between them.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{compile_pattern, Recognizer};
use super::StructuringError;
use crate::models::{Confidence, FactKind, MedicalFact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// Single number, thousands separators allowed ("2,50,000", "13.5").
    Number,
    /// Two numbers joined by "/" ("120/80").
    Pair,
}

impl ValueShape {
    fn pattern(self) -> &'static str {
        match self {
            Self::Number => r"\d{1,3}(?:,\d{2,3})+(?:\.\d+)?|\d+(?:\.\d+)?",
            Self::Pair => r"\d{2,3}[ \t]*/[ \t]*\d{2,3}",
        }
    }
}

#[derive(Debug)]
pub struct LabRule {
    pub name: &'static str,
    pub kind: FactKind,
    /// Regex alternation of labels, matched as whole words ignoring case.
    pub keywords: &'static str,
    pub shape: ValueShape,
    pub default_unit: &'static str,
    /// Regex alternation of unit tokens, longest first.
    pub units: &'static str,
    /// Words that, directly before a keyword, mean a different measurement
    /// ("HDL Cholesterol" is not total cholesterol).
    pub exclude_prefixes: &'static str,
}

pub const LAB_RULES: &[LabRule] = &[
    LabRule {
        name: "Hemoglobin",
        kind: FactKind::LabValue,
        keywords: r"ha?emoglobin|hgb|hb",
        shape: ValueShape::Number,
        default_unit: "g/dL",
        units: r"g/dL|g/L|mmol/L",
        exclude_prefixes: r"corpuscular|glycated|glycosylated|cell",
    },
    LabRule {
        name: "WBC",
        kind: FactKind::LabValue,
        keywords: r"white[ \t]+blood[ \t]+cells?(?:[ \t]+count)?|total[ \t]+leu[ck]ocyte[ \t]+count|wbc|tlc",
        shape: ValueShape::Number,
        default_unit: "/cumm",
        units: r"cells/cumm|/cumm|x[ \t]*10\^?3/µL|/µL|/uL",
        exclude_prefixes: "",
    },
    LabRule {
        name: "RBC",
        kind: FactKind::LabValue,
        keywords: r"red[ \t]+blood[ \t]+cells?(?:[ \t]+count)?|rbc",
        shape: ValueShape::Number,
        default_unit: "million/cumm",
        units: r"million/cumm|mill/cumm|x[ \t]*10\^?6/µL|/cumm",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Platelets",
        kind: FactKind::LabValue,
        keywords: r"platelets?(?:[ \t]+count)?|plt",
        shape: ValueShape::Number,
        default_unit: "/cumm",
        units: r"lakhs?/cumm|/cumm|x[ \t]*10\^?3/µL|/µL",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Fasting Blood Sugar",
        kind: FactKind::LabValue,
        keywords: r"fasting[ \t]+(?:blood[ \t]+|plasma[ \t]+)?(?:sugar|glucose)|fbs",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Random Blood Sugar",
        kind: FactKind::LabValue,
        keywords: r"random[ \t]+(?:blood[ \t]+|plasma[ \t]+)?(?:sugar|glucose)|rbs",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Post Prandial Blood Sugar",
        kind: FactKind::LabValue,
        keywords: r"post[ \t\-]*prandial[ \t]+(?:blood[ \t]+|plasma[ \t]+)?(?:sugar|glucose)|ppbs",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Glucose",
        kind: FactKind::LabValue,
        keywords: r"(?:blood[ \t]+)?(?:glucose|sugar)",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: r"urine",
    },
    LabRule {
        name: "Cholesterol",
        kind: FactKind::LabValue,
        keywords: r"(?:total[ \t]+)?cholesterol",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: r"hdl|ldl|vldl",
    },
    LabRule {
        name: "Blood Pressure",
        kind: FactKind::Vital,
        keywords: r"blood[ \t]+pressure|bp",
        shape: ValueShape::Pair,
        default_unit: "mmHg",
        units: r"mmHg",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Pulse",
        kind: FactKind::Vital,
        keywords: r"pulse(?:[ \t]+rate)?|heart[ \t]+rate",
        shape: ValueShape::Number,
        default_unit: "bpm",
        units: r"bpm|/min",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Temperature",
        kind: FactKind::Vital,
        keywords: r"temperature|temp",
        shape: ValueShape::Number,
        default_unit: "°F",
        units: r"°F|°C",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Oxygen Saturation",
        kind: FactKind::Vital,
        keywords: r"oxygen[ \t]+saturation|spo2|o2[ \t]+sat(?:uration)?",
        shape: ValueShape::Number,
        default_unit: "%",
        units: r"%",
        exclude_prefixes: "",
    },
    LabRule {
        name: "ESR",
        kind: FactKind::LabValue,
        keywords: r"erythrocyte[ \t]+sedimentation[ \t]+rate|esr",
        shape: ValueShape::Number,
        default_unit: "mm/hr",
        units: r"mm/hr",
        exclude_prefixes: "",
    },
    LabRule {
        name: "HbA1c",
        kind: FactKind::LabValue,
        keywords: r"hba1c|glycated[ \t]+ha?emoglobin|glycosylated[ \t]+ha?emoglobin",
        shape: ValueShape::Number,
        default_unit: "%",
        units: r"%|mmol/mol",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Creatinine",
        kind: FactKind::LabValue,
        keywords: r"(?:serum[ \t]+)?creatinine",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|µmol/L|umol/L",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Blood Urea Nitrogen",
        kind: FactKind::LabValue,
        keywords: r"blood[ \t]+urea[ \t]+nitrogen|bun",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: "",
    },
    LabRule {
        name: "Urea",
        kind: FactKind::LabValue,
        keywords: r"(?:blood[ \t]+|serum[ \t]+)?urea",
        shape: ValueShape::Number,
        default_unit: "mg/dL",
        units: r"mg/dL|mmol/L",
        exclude_prefixes: "",
    },
];

impl LabRule {
    fn pattern(&self) -> String {
        let skip = if self.exclude_prefixes.is_empty() {
            String::new()
        } else {
            format!(r"(?:\b(?P<skip>{})[ \t]+)?", self.exclude_prefixes)
        };
        format!(
            r"(?i){skip}\b(?:{keywords})\b[ \t]*(?:\([^)\n]{{0,40}}\)[ \t]*)?[ \t:=\-]*(?P<value>{value})(?:[ \t]*(?P<unit>{units}))?",
            keywords = self.keywords,
            value = self.shape.pattern(),
            units = self.units,
        )
    }
}

static COMPILED: LazyLock<Vec<(&'static LabRule, Result<Regex, StructuringError>)>> =
    LazyLock::new(|| {
        LAB_RULES
            .iter()
            .map(|rule| (rule, compile_pattern(rule.name, &rule.pattern())))
            .collect()
    });

/// Matches a whole string that is one of the measurement labels.
static MEASUREMENT_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    let keywords: Vec<&str> = LAB_RULES.iter().map(|r| r.keywords).collect();
    Regex::new(&format!(r"(?i)^(?:{})$", keywords.join("|"))).ok()
});

/// Whether `name` is a lab or vital label rather than a medicine.
pub fn is_measurement_name(name: &str) -> bool {
    MEASUREMENT_NAME
        .as_ref()
        .is_some_and(|re| re.is_match(name.trim()))
}

pub struct LabValueRecognizer;

impl Recognizer for LabValueRecognizer {
    fn name(&self) -> &'static str {
        "lab_values"
    }

    fn recognize(&self, text: &str) -> Result<Vec<MedicalFact>, StructuringError> {
        let mut facts = Vec::new();

        for (rule, compiled) in COMPILED.iter() {
            let re = match compiled {
                Ok(re) => re,
                Err(e) => {
                    tracing::warn!(rule = rule.name, error = %e, "Skipping lab value rule");
                    continue;
                }
            };

            for caps in re.captures_iter(text) {
                if caps.name("skip").is_some() {
                    continue;
                }
                let Some(value) = caps.name("value") else {
                    continue;
                };
                let value: String = match rule.shape {
                    ValueShape::Pair => value.as_str().split_whitespace().collect(),
                    ValueShape::Number => value.as_str().to_string(),
                };
                let unit = caps
                    .name("unit")
                    .map(|m| m.as_str())
                    .unwrap_or(rule.default_unit);

                facts.extend(MedicalFact::new(
                    rule.kind,
                    rule.name,
                    &value,
                    unit,
                    Confidence::High,
                    format!("\"{}\" label followed by a value", rule.name),
                ));
            }
        }

        Ok(facts)
    }
}
