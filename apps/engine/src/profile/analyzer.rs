//! Profiling capability — "analyze text → profile fragment payload".
//!
//! The orchestrator only knows `ProfileAnalyzer`. Two backends ship here:
//! - `LlmExtractor`: one parametrized extractor, configured per kind by an `ExtractorSpec`.
//! - `StaticAnalyzer`: deterministic canned payloads (offline mode, tests).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AnalyzerError;
use crate::llm_client::prompts::{render_template, EVIDENCE_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::profile::models::ProfileKind;
use crate::profile::prompts::{
    ANALYSIS_SYSTEM, GOALS_PROMPT, GOALS_SCHEMA, PASSIONS_PROMPT, PASSIONS_SCHEMA,
    PERSONALITY_PROMPT, PERSONALITY_SCHEMA, SKILLS_PROMPT, SKILLS_SCHEMA, VALUES_PROMPT,
    VALUES_SCHEMA,
};

/// Shared read-only input handed to every branch of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisInput {
    pub transcript: String,
    pub resume_text: Option<String>,
}

impl AnalysisInput {
    /// Blank résumé text is treated as absent.
    pub fn new(transcript: &str, resume_text: Option<&str>) -> Self {
        Self {
            transcript: transcript.trim().to_string(),
            resume_text: resume_text
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// A profiling analyzer bound to one `ProfileKind`.
///
/// Implementations may fail, hang or panic; the orchestrator isolates all of it.
/// The returned payload is untrusted and may use any field naming — the
/// aggregator resolves aliases.
#[async_trait]
pub trait ProfileAnalyzer: Send + Sync {
    fn kind(&self) -> ProfileKind;

    async fn analyze(&self, input: &AnalysisInput) -> Result<Value, AnalyzerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmExtractor — one extractor type for all five kinds
// ────────────────────────────────────────────────────────────────────────────

/// Static configuration of one extractor: which kind, which output schema, which prompt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorSpec {
    pub kind: ProfileKind,
    pub schema: &'static str,
    pub prompt_template: &'static str,
    /// Only the skills extractor reads the résumé.
    pub uses_resume: bool,
}

impl ExtractorSpec {
    pub fn for_kind(kind: ProfileKind) -> Self {
        let (schema, prompt_template, uses_resume) = match kind {
            ProfileKind::Skills => (SKILLS_SCHEMA, SKILLS_PROMPT, true),
            ProfileKind::Personality => (PERSONALITY_SCHEMA, PERSONALITY_PROMPT, false),
            ProfileKind::Passions => (PASSIONS_SCHEMA, PASSIONS_PROMPT, false),
            ProfileKind::Goals => (GOALS_SCHEMA, GOALS_PROMPT, false),
            ProfileKind::Values => (VALUES_SCHEMA, VALUES_PROMPT, false),
        };
        Self {
            kind,
            schema,
            prompt_template,
            uses_resume,
        }
    }

    pub fn render(&self, input: &AnalysisInput) -> String {
        let resume = match (&input.resume_text, self.uses_resume) {
            (Some(resume), true) => resume.as_str(),
            _ => "Not provided",
        };
        render_template(
            self.prompt_template,
            &[
                ("evidence_instruction", EVIDENCE_INSTRUCTION),
                ("schema", self.schema),
                ("resume", resume),
                ("transcript", input.transcript.as_str()),
            ],
        )
    }
}

pub struct LlmExtractor {
    llm: LlmClient,
    spec: ExtractorSpec,
}

impl LlmExtractor {
    pub fn new(llm: LlmClient, spec: ExtractorSpec) -> Self {
        Self { llm, spec }
    }

    /// One extractor per kind, all sharing the same client.
    pub fn standard_set(llm: &LlmClient) -> Vec<Arc<dyn ProfileAnalyzer>> {
        ProfileKind::ALL
            .into_iter()
            .map(|kind| {
                Arc::new(LlmExtractor::new(llm.clone(), ExtractorSpec::for_kind(kind)))
                    as Arc<dyn ProfileAnalyzer>
            })
            .collect()
    }
}

#[async_trait]
impl ProfileAnalyzer for LlmExtractor {
    fn kind(&self) -> ProfileKind {
        self.spec.kind
    }

    async fn analyze(&self, input: &AnalysisInput) -> Result<Value, AnalyzerError> {
        let prompt = self.spec.render(input);
        let payload: Value = self.llm.call_json(&prompt, ANALYSIS_SYSTEM).await?;
        if !(payload.is_object() || payload.is_array()) {
            return Err(AnalyzerError::InvalidOutput(format!(
                "{} extractor returned a bare {}",
                self.spec.kind,
                json_type_name(&payload)
            )));
        }
        debug!(kind = %self.spec.kind, "extractor produced payload");
        Ok(payload)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// StaticAnalyzer — deterministic fake backend
// ────────────────────────────────────────────────────────────────────────────

/// Serves a fixed payload for its kind. Used when no LLM key is configured.
///
/// The canned payloads intentionally use the loose field names older backends
/// emitted (`work_style`, `income_target`, a trait→fraction map), so offline
/// runs exercise the same alias resolution as live ones.
pub struct StaticAnalyzer {
    kind: ProfileKind,
    payload: Value,
}

impl StaticAnalyzer {
    pub fn new(kind: ProfileKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    pub fn canned(kind: ProfileKind) -> Self {
        Self::new(kind, canned_payload(kind))
    }

    pub fn standard_set() -> Vec<Arc<dyn ProfileAnalyzer>> {
        ProfileKind::ALL
            .into_iter()
            .map(|kind| Arc::new(StaticAnalyzer::canned(kind)) as Arc<dyn ProfileAnalyzer>)
            .collect()
    }
}

#[async_trait]
impl ProfileAnalyzer for StaticAnalyzer {
    fn kind(&self) -> ProfileKind {
        self.kind
    }

    async fn analyze(&self, _input: &AnalysisInput) -> Result<Value, AnalyzerError> {
        Ok(self.payload.clone())
    }
}

fn canned_payload(kind: ProfileKind) -> Value {
    match kind {
        ProfileKind::Skills => json!({
            "skills": [
                "Python", "JavaScript", "React", "Node.js", "SQL",
                "Problem Solving", "Communication", "Team Leadership"
            ],
            "confidence": 0.85
        }),
        ProfileKind::Personality => json!({
            "personality": {
                "openness": 0.75,
                "conscientiousness": 0.82,
                "extraversion": 0.65,
                "agreeableness": 0.78,
                "neuroticism": 0.35
            },
            "confidence": 0.80
        }),
        ProfileKind::Passions => json!({
            "passions": [
                "Technology Innovation", "Sustainable Solutions", "Mentoring Others",
                "Creative Problem Solving", "Continuous Learning"
            ]
        }),
        ProfileKind::Goals => json!({
            "goals": {
                "income_target": 95000,
                "location": "Remote",
                "work_style": "hybrid",
                "schedule_preference": "flexible"
            }
        }),
        ProfileKind::Values => json!({
            "values": ["Impact", "Growth", "Autonomy", "Collaboration", "Work-Life Balance"]
        }),
    }
}
