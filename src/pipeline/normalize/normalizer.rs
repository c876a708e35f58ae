use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::Deserialize;

use super::medical_correction::correct_medical_terms;
use super::tables::{RewriteRule, ABBREVIATIONS, DIGIT_RUN, OCR_RULES, UNIT_RULES};
use super::NormalizeError;

/// Extra dictionary entries merged over the built-in tables at startup.
///
/// ```json
/// { "abbreviations": { "Cr": "Creatinine" }, "units": { "mcg/dl": "mcg/dL" } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DictionaryExtension {
    #[serde(default)]
    pub abbreviations: BTreeMap<String, String>,
    #[serde(default)]
    pub units: BTreeMap<String, String>,
}

impl DictionaryExtension {
    pub fn from_json(json: &str) -> Result<Self, NormalizeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, NormalizeError> {
        let content = std::fs::read_to_string(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

struct CompiledRule {
    regex: Regex,
    replacement: String,
    requires_digit: bool,
}

impl CompiledRule {
    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.regex.replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            if self.requires_digit && !whole.chars().any(|c| c.is_ascii_digit()) {
                return whole.to_string();
            }
            let mut out = String::new();
            caps.expand(&self.replacement, &mut out);
            out
        })
    }
}

/// Compiles a table entry. A broken entry is logged and dropped so the rest
/// of the table still applies.
fn compile(pattern: &str, replacement: &str, requires_digit: bool, what: &str) -> Option<CompiledRule> {
    match Regex::new(pattern) {
        Ok(regex) => Some(CompiledRule {
            regex,
            replacement: replacement.to_string(),
            requires_digit,
        }),
        Err(e) => {
            tracing::warn!(rule = what, error = %e, "Skipping normalizer rule that failed to compile");
            None
        }
    }
}

fn compile_rules(rules: &[RewriteRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .filter_map(|r| compile(r.pattern, r.replacement, r.requires_digit, r.description))
        .collect()
}

/// Three-stage OCR text normalizer: misread correction, abbreviation
/// expansion, unit normalization. Immutable once built.
pub struct Normalizer {
    ocr_rules: Vec<CompiledRule>,
    digit_run: Option<Regex>,
    abbreviation_regex: Option<Regex>,
    abbreviations: HashMap<String, String>,
    unit_rules: Vec<CompiledRule>,
}

impl Normalizer {
    /// Normalizer over the built-in tables only.
    pub fn builtin() -> Self {
        Self::with_extension(&DictionaryExtension::default())
    }

    /// Built-in tables plus `extension`. Extension abbreviations override
    /// built-in ones with the same key; extension units are literal,
    /// case-insensitive whole-token spellings applied after built-in units.
    pub fn with_extension(extension: &DictionaryExtension) -> Self {
        let mut abbreviations: HashMap<String, String> = ABBREVIATIONS
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect();
        for (k, v) in &extension.abbreviations {
            let key = k.trim();
            if key.is_empty() || v.trim().is_empty() {
                continue;
            }
            abbreviations.insert(key.to_lowercase(), v.trim().to_string());
        }

        let mut unit_rules = compile_rules(UNIT_RULES);
        for (variant, canonical) in &extension.units {
            if variant.trim().is_empty() {
                continue;
            }
            let pattern = format!(r"(?i)(?:^|\b){}(?:\b|$)", regex::escape(variant.trim()));
            let replacement = canonical.replace('$', "$$");
            unit_rules.extend(compile(&pattern, &replacement, false, variant));
        }

        let abbreviation_regex = build_abbreviation_regex(&abbreviations);

        tracing::debug!(
            ocr_rules = OCR_RULES.len(),
            abbreviations = abbreviations.len(),
            unit_rules = unit_rules.len(),
            "Normalizer tables compiled"
        );

        let digit_run = Regex::new(DIGIT_RUN)
            .map_err(|e| tracing::warn!(error = %e, "Digit run pattern failed to compile"))
            .ok();

        Self {
            ocr_rules: compile_rules(OCR_RULES),
            digit_run,
            abbreviation_regex,
            abbreviations,
            unit_rules,
        }
    }

    /// Normalize raw OCR text. Total and pure; empty input comes back as is.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }
        let corrected = self.correct_ocr_errors(raw);
        let expanded = self.expand_abbreviations(&corrected);
        self.normalize_units(&expanded)
    }

    /// Stage 1: OCR misread table, zeros inside numbers, then dictionary
    /// correction of mixed tokens.
    pub fn correct_ocr_errors(&self, text: &str) -> String {
        let rewritten = apply_all(&self.ocr_rules, text);
        let zeroed = self.restore_zeros(&rewritten);
        correct_medical_terms(&zeroed)
    }

    fn restore_zeros(&self, text: &str) -> String {
        let Some(re) = &self.digit_run else {
            return text.to_string();
        };
        re.replace_all(text, |caps: &Captures| caps[0].replace(['o', 'O'], "0"))
            .into_owned()
    }

    /// Stage 2: whole-word abbreviation expansion in a single pass.
    pub fn expand_abbreviations(&self, text: &str) -> String {
        match &self.abbreviation_regex {
            Some(re) => re
                .replace_all(text, |caps: &Captures| {
                    let word = &caps[0];
                    self.abbreviations
                        .get(&word.to_lowercase())
                        .cloned()
                        .unwrap_or_else(|| word.to_string())
                })
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// Stage 3: unit spelling variants to canonical units.
    pub fn normalize_units(&self, text: &str) -> String {
        apply_all(&self.unit_rules, text)
    }
}

fn apply_all(rules: &[CompiledRule], text: &str) -> String {
    let mut current = text.to_string();
    for rule in rules {
        let replaced = match rule.apply(&current) {
            Cow::Borrowed(_) => None,
            Cow::Owned(next) => Some(next),
        };
        if let Some(next) = replaced {
            current = next;
        }
    }
    current
}

fn build_abbreviation_regex(abbreviations: &HashMap<String, String>) -> Option<Regex> {
    if abbreviations.is_empty() {
        return None;
    }
    let mut keys: Vec<&String> = abbreviations.keys().collect();
    // Longest first so alternation prefers "ppbs" over a shorter key.
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternation = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = format!(r"(?i)\b(?:{alternation})\b");
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "Abbreviation table failed to compile, expansion disabled");
            None
        }
    }
}

static GLOBAL: OnceLock<Normalizer> = OnceLock::new();

/// Install the process-wide normalizer. Only the first call wins; later
/// calls hand their normalizer back as the error.
pub fn install(normalizer: Normalizer) -> Result<(), Normalizer> {
    GLOBAL.set(normalizer)
}

/// The process-wide normalizer, built-in tables unless `install` ran first.
pub fn global() -> &'static Normalizer {
    GLOBAL.get_or_init(Normalizer::builtin)
}

/// Normalize raw OCR text with the process-wide tables.
pub fn normalize(raw: &str) -> String {
    global().normalize(raw)
}
