//! Career Pipeline — transcript in, profile and ranked recommendations out.
//!
//! Stages: fan-out (orchestrator) → aggregate → generate → normalize.
//! Only input errors and pre-fan-out cancellation fail a run; every later
//! problem is absorbed and reported as `DegradedCompleted`.

pub mod state;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cancel::CancellationSignal;
use crate::config::{Config, PipelineSettings};
use crate::errors::PipelineError;
use crate::llm_client::{self, LlmClient, LlmError};
use crate::profile::{
    aggregate, CareerProfile, LlmExtractor, ProfileAnalyzer, ProfileKind, ProfileOrchestrator,
    StaticAnalyzer,
};
use crate::recommendation::{
    LlmRecommendationGenerator, RecommendationEngine, RecommendationGenerator, RecommendationSet,
    StaticGenerator,
};

pub use state::{RunState, RunStatus, RunTracker};

/// Per-analyzer summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRun {
    pub kind: ProfileKind,
    pub succeeded: bool,
    pub failure_reason: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub career_profile: CareerProfile,
    pub recommendations: RecommendationSet,
    pub agent_runs: Vec<AgentRun>,
    pub states: Vec<RunState>,
    pub completed_at: DateTime<Utc>,
}

pub struct CareerPipeline {
    orchestrator: ProfileOrchestrator,
    engine: RecommendationEngine,
}

impl CareerPipeline {
    pub fn new(
        analyzers: Vec<Arc<dyn ProfileAnalyzer>>,
        generator: Arc<dyn RecommendationGenerator>,
        settings: &PipelineSettings,
    ) -> Self {
        Self {
            orchestrator: ProfileOrchestrator::new(analyzers, settings),
            engine: RecommendationEngine::new(generator, settings),
        }
    }

    /// LLM-backed pipeline when an API key is configured, canned fixtures otherwise.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let settings = &config.pipeline;
        match &config.anthropic_api_key {
            Some(key) => {
                let llm = LlmClient::new(key.clone())?;
                info!("LLM client initialized (model: {})", llm_client::MODEL);
                let generator = LlmRecommendationGenerator::new(
                    llm.clone(),
                    settings.min_recommendations,
                    settings.max_recommendations,
                );
                Ok(Self::new(
                    LlmExtractor::standard_set(&llm),
                    Arc::new(generator),
                    settings,
                ))
            }
            None => {
                warn!("ANTHROPIC_API_KEY not set; using offline fixtures");
                Ok(Self::new(
                    StaticAnalyzer::standard_set(),
                    Arc::new(StaticGenerator::canned()),
                    settings,
                ))
            }
        }
    }

    pub async fn run(
        &self,
        transcript: &str,
        resume_text: Option<&str>,
    ) -> Result<PipelineOutcome, PipelineError> {
        self.run_with_cancel(transcript, resume_text, &CancellationSignal::never())
            .await
    }

    pub async fn run_with_cancel(
        &self,
        transcript: &str,
        resume_text: Option<&str>,
        cancel: &CancellationSignal,
    ) -> Result<PipelineOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let mut tracker = RunTracker::new(run_id);
        info!(%run_id, "pipeline run received");

        let fan_out = match self.orchestrator.run(transcript, resume_text, cancel).await {
            Ok(report) => report,
            Err(e) => {
                step(&mut tracker, RunState::Failed);
                warn!(%run_id, code = e.code(), error = %e, "pipeline run failed");
                return Err(e);
            }
        };
        step(&mut tracker, RunState::FannedOut);

        let career_profile = aggregate(&fan_out.fragments);
        step(&mut tracker, RunState::Aggregated);

        let recommendations = self
            .engine
            .recommend(&career_profile, Some(transcript), cancel)
            .await;
        step(&mut tracker, RunState::Generated);
        step(&mut tracker, RunState::Normalized);

        let status = if fan_out.status == RunStatus::Completed
            && !recommendations.fallback
            && recommendations.distribution_healthy
        {
            RunStatus::Completed
        } else {
            RunStatus::DegradedCompleted
        };
        step(&mut tracker, RunState::Returned);

        let agent_runs: Vec<AgentRun> = fan_out
            .fragments
            .iter()
            .map(|f| AgentRun {
                kind: f.kind,
                succeeded: f.succeeded,
                failure_reason: f.failure_reason.clone(),
                duration_ms: f.duration_ms,
            })
            .collect();

        info!(
            %run_id,
            ?status,
            failed_agents = fan_out.failed_kinds().len(),
            recommendations = recommendations.len(),
            fallback = recommendations.fallback,
            "pipeline run finished"
        );

        Ok(PipelineOutcome {
            run_id,
            status,
            career_profile,
            recommendations,
            agent_runs,
            states: tracker.into_history(),
            completed_at: Utc::now(),
        })
    }
}

fn step(tracker: &mut RunTracker, next: RunState) {
    if let Err(e) = tracker.advance(next) {
        error!(error = %e, "run state machine violated");
    }
}
