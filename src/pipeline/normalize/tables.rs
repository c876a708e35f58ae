//! Built-in rewrite tables for the normalizer.
//!
//! Every substitution the normalizer performs lives here as data. Adding a
//! term is a table edit; the control flow in `normalizer.rs` never changes.

/// A single regex rewrite. `replacement` uses `regex` expansion syntax
/// (`${1}`). When `requires_digit` is set the match is only rewritten if it
/// contains an ASCII digit, so correctly spelled words are left alone.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    pub pattern: &'static str,
    pub replacement: &'static str,
    pub requires_digit: bool,
    pub description: &'static str,
}

const fn rule(pattern: &'static str, replacement: &'static str, description: &'static str) -> RewriteRule {
    RewriteRule {
        pattern,
        replacement,
        requires_digit: false,
        description,
    }
}

const fn digit_rule(
    pattern: &'static str,
    replacement: &'static str,
    description: &'static str,
) -> RewriteRule {
    RewriteRule {
        pattern,
        replacement,
        requires_digit: true,
        description,
    }
}

/// Stage 1: situational OCR misread corrections. Order matters: blood-group
/// glyphs are fixed before the degree sign is claimed by temperatures, and
/// temperatures before the generic digit/letter fixes.
pub const OCR_RULES: &[RewriteRule] = &[
    rule(
        r"(?im)\b(blood\s*(?:group|type)|abo(?:\s*(?:group|type))?)(\s*[:\-]?\s*)[0o°]([ \t]*(?:rh|\+|-|−|positive|negative|pos\b|neg\b|ve\b)|[ \t]*$|[ \t]*[,;)])",
        "${1}${2}O${3}",
        "O-like glyph after blood group vocabulary",
    ),
    rule(
        r"(?im)(^|[\s:(])[0o°]([ \t]*rh(?:esus)?[ \t]*(?:factor)?[ \t]*[:\-]?[ \t]*(?:positive|negative|pos\b|neg\b|\+ve\b|-ve\b|\+|-))",
        "${1}O${2}",
        "O-like glyph before Rh factor vocabulary",
    ),
    rule(
        r"(?im)(\b(?:blood[ \t]*(?:group|type)|abo)\b[^\n]*?[\s:(])[0o°]([ \t]*(?:positive|negative|\+ve\b|-ve\b))",
        "${1}O${2}",
        "O-like glyph before a bare Rh sign on a blood group line",
    ),
    rule(
        r"(?i)(\d)[ \t]*[°º˚][ \t]*c\b",
        "${1}°C",
        "degree glyph variants, Celsius",
    ),
    rule(
        r"(?i)(\d)[ \t]*[°º˚][ \t]*f\b",
        "${1}°F",
        "degree glyph variants, Fahrenheit",
    ),
    rule(
        r"(?i)(\d)[ \t]*deg(?:rees?|\.)?[ \t]*(?:c|celsius)\b",
        "${1}°C",
        "spelled-out degrees, Celsius",
    ),
    rule(
        r"(?i)(\d)[ \t]*deg(?:rees?|\.)?[ \t]*(?:f|fahrenheit)\b",
        "${1}°F",
        "spelled-out degrees, Fahrenheit",
    ),
    rule(r"(\d)o([CF])\b", "${1}°${2}", "letter o read for a degree sign"),
    rule(r"\bl(\d)", "1${1}", "letter l read for digit 1"),
    digit_rule(
        r"(?i)\bha?[e3]m[o0]g[l1][o0]b[i1l]n\b",
        "Hemoglobin",
        "digit-for-letter misreads in hemoglobin",
    ),
    digit_rule(
        r"(?i)\bp[l1]a[t7]e[l1]e[t7](s?)\b",
        "Platelet${1}",
        "digit-for-letter misreads in platelets",
    ),
    digit_rule(
        r"(?i)\bg[l1]uc[o0]se\b",
        "Glucose",
        "digit-for-letter misreads in glucose",
    ),
    digit_rule(
        r"(?i)\bch[o0][l1]ester[o0][l1]\b",
        "Cholesterol",
        "digit-for-letter misreads in cholesterol",
    ),
];

/// A standalone token that starts with a digit and is otherwise digits or
/// letter o. Every "o" in such a token is a misread zero ("5oo", "2o5000").
pub const DIGIT_RUN: &str = r"\b\d[0-9oO]*\b";

/// Stage 2: clinical abbreviations, matched as whole words ignoring case.
/// No expansion may contain a key as a whole word, otherwise a second pass
/// would expand again.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Hb", "Hemoglobin"),
    ("Hgb", "Hemoglobin"),
    ("FBS", "Fasting Blood Sugar"),
    ("RBS", "Random Blood Sugar"),
    ("PPBS", "Post Prandial Blood Sugar"),
    ("TLC", "Total Leukocyte Count"),
    ("WBC", "White Blood Cell Count"),
    ("RBC", "Red Blood Cell Count"),
    ("Plt", "Platelet Count"),
    ("ESR", "Erythrocyte Sedimentation Rate"),
    ("Hct", "Hematocrit"),
    ("PCV", "Packed Cell Volume"),
    ("MCV", "Mean Corpuscular Volume"),
    ("CBC", "Complete Blood Count"),
    ("LFT", "Liver Function Test"),
    ("KFT", "Kidney Function Test"),
    ("RFT", "Renal Function Test"),
    ("TSH", "Thyroid Stimulating Hormone"),
    ("BUN", "Blood Urea Nitrogen"),
    ("TG", "Triglycerides"),
    ("BP", "Blood Pressure"),
    ("RR", "Respiratory Rate"),
    ("SpO2", "Oxygen Saturation"),
    ("Temp", "Temperature"),
    ("DM", "Diabetes Mellitus"),
    ("HTN", "Hypertension"),
    ("CKD", "Chronic Kidney Disease"),
    ("UTI", "Urinary Tract Infection"),
    ("OD", "Once Daily"),
    ("BD", "Twice Daily"),
    ("BID", "Twice Daily"),
    ("TDS", "Three Times Daily"),
    ("TID", "Three Times Daily"),
    ("QID", "Four Times Daily"),
    ("HS", "At Bedtime"),
    ("SOS", "If Needed"),
    ("PRN", "As Needed"),
    ("Dx", "Diagnosis"),
    ("Rx", "Prescription"),
    ("Hx", "History"),
    ("USG", "Ultrasound"),
    ("ECG", "Electrocardiogram"),
];

/// Stage 3: unit spelling variants to canonical units. Each canonical form
/// is a fixed point of its own pattern.
pub const UNIT_RULES: &[RewriteRule] = &[
    rule(r"(?i)\bmg\s*%", "mg/dL", "mg% is mg/dL"),
    rule(r"(?i)\bg(?:m|ms)?\s*%", "g/dL", "gm% is g/dL"),
    rule(r"(?i)\bmg\s*/\s*dl\b", "mg/dL", "mg/dL casing"),
    rule(r"(?i)\bg(?:m|ms)?\s*/\s*dl\b", "g/dL", "g/dL spellings"),
    rule(r"(?i)\bmg\s*/\s*l\b", "mg/L", "mg/L casing"),
    rule(r"(?i)\bg(?:m|ms)?\s*/\s*l\b", "g/L", "g/L spellings"),
    rule(r"(?i)\bmmol\s*/\s*l\b", "mmol/L", "mmol/L casing"),
    rule(r"(?i)\bng\s*/\s*ml\b", "ng/mL", "ng/mL casing"),
    rule(r"(?i)\biu\s*/\s*l\b", "IU/L", "IU/L casing"),
    rule(r"(?i)\bu\s*/\s*l\b", "U/L", "U/L casing"),
    rule(r"(?i)\bmm\s*(?:of\s*)?hg\b", "mmHg", "mmHg spellings"),
    rule(
        r"(?i)\bmm\s*/\s*(?:1st\s+)?(?:hr|hour)\b",
        "mm/hr",
        "ESR rate spellings",
    ),
    rule(
        r"(?i)\bbeats\s*(?:/|per)\s*min(?:ute)?\b",
        "bpm",
        "beats per minute spelled out",
    ),
    rule(r"(?i)\bbpm\b", "bpm", "bpm casing"),
    rule(r"(?i)/\s*cu\.?\s*mm\b", "/cumm", "per cubic millimetre"),
    rule(r"(?i)\bmicrograms?\b", "mcg", "micrograms"),
];
