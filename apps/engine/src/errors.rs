use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Fatal input problems detected before any analyzer runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Transcript is empty")]
    EmptyTranscript,

    #[error("Transcript too short: {len} characters (minimum {min})")]
    TranscriptTooShort { len: usize, min: usize },
}

/// The only errors that cross the pipeline boundary.
/// Everything else is absorbed and reported through run status metadata.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Run cancelled before fan-out")]
    Cancelled,
}

impl PipelineError {
    /// Stable machine-readable code for surrounding layers.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Input(_) => "INPUT_ERROR",
            PipelineError::Cancelled => "CANCELLED",
        }
    }
}

/// Failure of a single profiling branch. Always recovered by the orchestrator.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Analyzer returned unusable output: {0}")]
    InvalidOutput(String),

    #[error("Analyzer failed: {0}")]
    Failed(String),
}

/// Failure of the generation capability call. Recovered by the engine with a sentinel.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Generation timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Generation output that cannot be decoded into candidates. Recovered with a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationParseError {
    #[error("Generation output is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Generation output has no recommendations list")]
    MissingList,

    #[error("Generation output holds no usable candidates")]
    NoCandidates,
}
