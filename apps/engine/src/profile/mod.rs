// Profiling: fan-out over the five analyzers, fan-in into one CareerProfile.
// All LLM calls go through llm_client; analyzers are swappable behind ProfileAnalyzer.

pub mod aggregator;
pub mod analyzer;
pub mod models;
pub mod orchestrator;
pub mod prompts;

pub use aggregator::aggregate;
pub use analyzer::{AnalysisInput, ExtractorSpec, LlmExtractor, ProfileAnalyzer, StaticAnalyzer};
pub use models::{CareerProfile, ProfileFragment, ProfileKind};
pub use orchestrator::{FanOutReport, ProfileOrchestrator};
