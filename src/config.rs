use std::path::{Path, PathBuf};

use crate::pipeline::normalize::{DictionaryExtension, NormalizeError, Normalizer};
use crate::pipeline::rag::{
    EvidenceConfig, GroundedAnswerPipeline, LlmGenerate, DEFAULT_MAX_ITEMS,
    DEFAULT_SNIPPET_MAX_CHARS,
};

/// Application-level constants
pub const APP_NAME: &str = "medproof";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the optional dictionary extension inside the data dir.
pub const DICTIONARY_FILE: &str = "dictionaries.json";

pub const ENV_EVIDENCE_CAP: &str = "MEDPROOF_EVIDENCE_CAP";
pub const ENV_SNIPPET_CHARS: &str = "MEDPROOF_SNIPPET_CHARS";
pub const ENV_DICTIONARY: &str = "MEDPROOF_DICTIONARY";
pub const ENV_LOG: &str = "MEDPROOF_LOG";

/// Per-user data directory, `None` when the platform has no home.
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> String {
    std::env::var(ENV_LOG).unwrap_or_else(|_| format!("{APP_NAME}=info,warn"))
}

/// Runtime settings for extraction and grounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingConfig {
    pub evidence_cap: usize,
    pub snippet_chars: usize,
    pub dictionary_path: Option<PathBuf>,
    /// Set when the dictionary path came from the environment: a missing
    /// file is then an error instead of "no extension".
    pub dictionary_required: bool,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            evidence_cap: DEFAULT_MAX_ITEMS,
            snippet_chars: DEFAULT_SNIPPET_MAX_CHARS,
            dictionary_path: app_data_dir().map(|dir| dir.join(DICTIONARY_FILE)),
            dictionary_required: false,
        }
    }
}

impl GroundingConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable or zero numbers fall back to
    /// the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let (dictionary_path, dictionary_required) = match lookup(ENV_DICTIONARY) {
            Some(path) if !path.trim().is_empty() => (Some(PathBuf::from(path.trim())), true),
            _ => (defaults.dictionary_path, false),
        };

        Self {
            evidence_cap: positive_or(&lookup, ENV_EVIDENCE_CAP, defaults.evidence_cap),
            snippet_chars: positive_or(&lookup, ENV_SNIPPET_CHARS, defaults.snippet_chars),
            dictionary_path,
            dictionary_required,
        }
    }

    pub fn evidence_config(&self) -> EvidenceConfig {
        EvidenceConfig {
            max_items: self.evidence_cap,
            snippet_max_chars: self.snippet_chars,
            ..EvidenceConfig::default()
        }
    }

    /// Answer pipeline that cites at most `evidence_cap` lines of at most
    /// `snippet_chars` characters.
    pub fn answer_pipeline<'a, G: LlmGenerate>(
        &self,
        generator: &'a G,
    ) -> GroundedAnswerPipeline<'a, G> {
        GroundedAnswerPipeline::with_evidence_config(generator, self.evidence_config())
    }

    /// Built-in normalizer tables merged with the dictionary extension file,
    /// when one is configured and present.
    pub fn load_normalizer(&self) -> Result<Normalizer, NormalizeError> {
        match self.dictionary_path.as_deref() {
            Some(path) if self.dictionary_required || path.exists() => {
                let extension = DictionaryExtension::load(path)?;
                log_extension(path, &extension);
                Ok(Normalizer::with_extension(&extension))
            }
            _ => Ok(Normalizer::builtin()),
        }
    }
}

fn log_extension(path: &Path, extension: &DictionaryExtension) {
    tracing::info!(
        path = %path.display(),
        abbreviations = extension.abbreviations.len(),
        units = extension.units.len(),
        "Dictionary extension loaded"
    );
}

fn positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> usize {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => value,
            _ => {
                tracing::warn!(key, value = %raw, default, "Invalid setting, using default");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentType, SourceDocument};
    use crate::pipeline::rag::RagError;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GroundingConfig::from_lookup(lookup(&[]));
        assert_eq!(config.evidence_cap, 5);
        assert_eq!(config.snippet_chars, 200);
        assert!(!config.dictionary_required);
        if let Some(path) = &config.dictionary_path {
            assert!(path.ends_with(DICTIONARY_FILE));
        }
    }

    #[test]
    fn reads_overrides() {
        let config = GroundingConfig::from_lookup(lookup(&[
            (ENV_EVIDENCE_CAP, "3"),
            (ENV_SNIPPET_CHARS, " 120 "),
            (ENV_DICTIONARY, "/etc/medproof/dict.json"),
        ]));
        assert_eq!(config.evidence_cap, 3);
        assert_eq!(config.snippet_chars, 120);
        assert_eq!(config.dictionary_path, Some(PathBuf::from("/etc/medproof/dict.json")));
        assert!(config.dictionary_required);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = GroundingConfig::from_lookup(lookup(&[
            (ENV_EVIDENCE_CAP, "many"),
            (ENV_SNIPPET_CHARS, "0"),
        ]));
        assert_eq!(config.evidence_cap, 5);
        assert_eq!(config.snippet_chars, 200);
    }

    #[test]
    fn evidence_config_carries_limits() {
        let config = GroundingConfig::from_lookup(lookup(&[(ENV_EVIDENCE_CAP, "3")]));
        let evidence = config.evidence_config();
        assert_eq!(evidence.max_items, 3);
        assert_eq!(evidence.snippet_max_chars, 200);
        assert_eq!(evidence.min_line_len, EvidenceConfig::default().min_line_len);
    }

    struct Echo;

    impl LlmGenerate for Echo {
        fn generate(&self, _system: &str, _prompt: &str) -> Result<String, RagError> {
            Ok("glucose readings listed".to_string())
        }
    }

    #[test]
    fn answer_pipeline_applies_configured_limits() {
        let config = GroundingConfig::from_lookup(lookup(&[
            (ENV_EVIDENCE_CAP, "1"),
            (ENV_SNIPPET_CHARS, "12"),
        ]));
        let corpus = vec![SourceDocument {
            id: Uuid::new_v4(),
            filename: Some("sugar.pdf".into()),
            document_type: DocumentType::BloodReport,
            report_date: None,
            raw_text: "Glucose reading one: 110 mg/dL\nGlucose reading two: 98 mg/dL".into(),
            corrected_text: None,
        }];

        let answer = config.answer_pipeline(&Echo).answer("glucose?", &corpus).unwrap();
        assert_eq!(answer.evidence.len(), 1);
        assert_eq!(answer.evidence[0].snippet, "Glucose read");
        assert!(answer.evidence[0].truncated);
    }

    #[test]
    fn missing_default_dictionary_is_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let config = GroundingConfig {
            dictionary_path: Some(dir.path().join(DICTIONARY_FILE)),
            dictionary_required: false,
            ..GroundingConfig::default()
        };
        let normalizer = config.load_normalizer().unwrap();
        assert_eq!(normalizer.normalize("Hb 12"), "Hemoglobin 12");
    }

    #[test]
    fn missing_required_dictionary_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = GroundingConfig {
            dictionary_path: Some(dir.path().join("absent.json")),
            dictionary_required: true,
            ..GroundingConfig::default()
        };
        assert!(matches!(
            config.load_normalizer(),
            Err(NormalizeError::Io { .. })
        ));
    }

    #[test]
    fn dictionary_file_extends_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DICTIONARY_FILE);
        std::fs::write(&path, r#"{"abbreviations": {"CRP": "C-Reactive Protein"}}"#).unwrap();
        let config = GroundingConfig {
            dictionary_path: Some(path),
            dictionary_required: false,
            ..GroundingConfig::default()
        };
        let normalizer = config.load_normalizer().unwrap();
        assert_eq!(normalizer.normalize("CRP: 4"), "C-Reactive Protein: 4");
    }

    #[test]
    fn app_name_and_version() {
        assert_eq!(APP_NAME, "medproof");
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        if let Some(dir) = app_data_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
