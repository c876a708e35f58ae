use serde::{Deserialize, Serialize};

use super::context::build_context;
use super::evidence::{locate_evidence_with, verify_evidence, EvidenceConfig};
use super::prompt::{build_prompt, no_documents_response, GROUNDED_SYSTEM_PROMPT};
use super::RagError;
use crate::models::{EvidenceItem, SourceDocument};

/// Trait for LLM text generation within the grounded answer pipeline.
pub trait LlmGenerate {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, RagError>;
}

/// An LLM answer with the verbatim source lines that support it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundedAnswer {
    pub text: String,
    pub evidence: Vec<EvidenceItem>,
}

/// Grounded answer pipeline.
///
/// Coordinates: context → prompt → generate → locate evidence → verify.
pub struct GroundedAnswerPipeline<'a, G: LlmGenerate> {
    generator: &'a G,
    evidence: EvidenceConfig,
}

impl<'a, G: LlmGenerate> GroundedAnswerPipeline<'a, G> {
    pub fn new(generator: &'a G) -> Self {
        Self::with_evidence_config(generator, EvidenceConfig::default())
    }

    pub fn with_evidence_config(generator: &'a G, evidence: EvidenceConfig) -> Self {
        Self {
            generator,
            evidence,
        }
    }

    /// Answer `question` from `corpus` and attach citations.
    ///
    /// An empty corpus short-circuits to a fixed reply without calling the
    /// LLM. No supporting lines is not an error: the answer is returned
    /// without evidence.
    pub fn answer(
        &self,
        question: &str,
        corpus: &[SourceDocument],
    ) -> Result<GroundedAnswer, RagError> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuestion);
        }
        if corpus.is_empty() {
            tracing::info!("No documents in corpus, answering without LLM");
            return Ok(GroundedAnswer {
                text: no_documents_response(),
                evidence: vec![],
            });
        }

        let context = build_context(corpus);
        let prompt = build_prompt(question, &context);
        let text = self.generator.generate(GROUNDED_SYSTEM_PROMPT, &prompt)?;

        let located = locate_evidence_with(question, &text, corpus, &self.evidence);
        let evidence = verify_evidence(located, corpus);

        tracing::info!(
            documents = corpus.len(),
            evidence = evidence.len(),
            "Grounded answer generated"
        );

        Ok(GroundedAnswer { text, evidence })
    }
}
