use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Overall outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    /// Every analyzer succeeded, generation decoded and the score spread was healthy.
    Completed,
    /// A usable result was produced, but something upstream was defaulted or corrected.
    DegradedCompleted,
    /// Not carried by an outcome: a failed run surfaces as `Err(PipelineError)`.
    /// Kept so surrounding layers can record failures in the same vocabulary.
    Failed,
}

/// Stages of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    Received,
    FannedOut,
    Aggregated,
    Generated,
    Normalized,
    Returned,
    Failed,
}

impl RunState {
    /// Forward-only: Received → FannedOut → Aggregated → Generated → Normalized
    /// → Returned, or Received → Failed.
    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Received, RunState::FannedOut)
                | (RunState::Received, RunState::Failed)
                | (RunState::FannedOut, RunState::Aggregated)
                | (RunState::Aggregated, RunState::Generated)
                | (RunState::Generated, RunState::Normalized)
                | (RunState::Normalized, RunState::Returned)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Returned | RunState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunState::Received => "received",
            RunState::FannedOut => "fannedOut",
            RunState::Aggregated => "aggregated",
            RunState::Generated => "generated",
            RunState::Normalized => "normalized",
            RunState::Returned => "returned",
            RunState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid run transition: {} -> {}", .from.as_str(), .to.as_str())]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: RunState,
}

/// Records the states a run passes through, rejecting out-of-order moves.
#[derive(Debug, Clone)]
pub struct RunTracker {
    run_id: Uuid,
    history: Vec<RunState>,
}

impl RunTracker {
    pub fn new(run_id: Uuid) -> Self {
        debug!(%run_id, state = RunState::Received.as_str(), "run state");
        Self {
            run_id,
            history: vec![RunState::Received],
        }
    }

    pub fn current(&self) -> RunState {
        // history always starts with Received
        self.history.last().copied().unwrap_or(RunState::Received)
    }

    pub fn advance(&mut self, next: RunState) -> Result<(), InvalidTransition> {
        let from = self.current();
        if !from.can_transition_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        debug!(run_id = %self.run_id, from = from.as_str(), to = next.as_str(), "run state");
        self.history.push(next);
        Ok(())
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn into_history(self) -> Vec<RunState> {
        self.history
    }
}
