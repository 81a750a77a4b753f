//! Career profiling engine: fans an interview transcript out to five profile
//! analyzers, merges their fragments into one `CareerProfile`, and turns that
//! profile into a ranked, realistically distributed list of career recommendations.

pub mod cancel;
pub mod config;
pub mod errors;
pub mod fields;
pub mod llm_client;
pub mod pipeline;
pub mod profile;
pub mod recommendation;

pub use cancel::{CancelHandle, CancellationSignal};
pub use config::{Config, PipelineSettings};
pub use errors::{InputError, PipelineError};
pub use pipeline::{CareerPipeline, PipelineOutcome, RunStatus};
