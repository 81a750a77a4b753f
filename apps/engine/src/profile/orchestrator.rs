//! Profile Orchestrator — fans the transcript out to every analyzer and fans the
//! fragments back in.
//!
//! Branches run concurrently on the caller's task. Each branch is wrapped in its
//! own timeout, panic guard and cancellation arm, so a branch can only ever
//! produce a fragment; it cannot fail the run or hold up its siblings.

use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::cancel::CancellationSignal;
use crate::config::PipelineSettings;
use crate::errors::{InputError, PipelineError};
use crate::pipeline::state::RunStatus;
use crate::profile::analyzer::{AnalysisInput, ProfileAnalyzer};
use crate::profile::models::{ProfileFragment, ProfileKind};

/// Result of one fan-out: one fragment per kind, in `ProfileKind::ALL` order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FanOutReport {
    pub fragments: Vec<ProfileFragment>,
    pub status: RunStatus,
}

impl FanOutReport {
    pub fn failed_kinds(&self) -> Vec<ProfileKind> {
        self.fragments
            .iter()
            .filter(|f| !f.succeeded)
            .map(|f| f.kind)
            .collect()
    }
}

pub struct ProfileOrchestrator {
    analyzers: Vec<Arc<dyn ProfileAnalyzer>>,
    branch_timeout: Duration,
    min_transcript_chars: usize,
}

impl ProfileOrchestrator {
    /// Registers analyzers. A second analyzer for an already-registered kind is ignored.
    pub fn new(analyzers: Vec<Arc<dyn ProfileAnalyzer>>, settings: &PipelineSettings) -> Self {
        let mut seen = HashSet::new();
        let analyzers = analyzers
            .into_iter()
            .filter(|a| {
                let fresh = seen.insert(a.kind());
                if !fresh {
                    warn!(kind = %a.kind(), "duplicate analyzer registration ignored");
                }
                fresh
            })
            .collect();

        Self {
            analyzers,
            branch_timeout: settings.analyzer_timeout,
            min_transcript_chars: settings.min_transcript_chars,
        }
    }

    pub fn validate_input(&self, transcript: &str) -> Result<(), InputError> {
        let len = transcript.trim().chars().count();
        if len == 0 {
            return Err(InputError::EmptyTranscript);
        }
        if len < self.min_transcript_chars {
            return Err(InputError::TranscriptTooShort {
                len,
                min: self.min_transcript_chars,
            });
        }
        Ok(())
    }

    /// Runs every analyzer against the same input and waits for all of them.
    ///
    /// Errors only on invalid input or when cancelled before fan-out; in both
    /// cases no analyzer has been invoked.
    pub async fn run(
        &self,
        transcript: &str,
        resume_text: Option<&str>,
        cancel: &CancellationSignal,
    ) -> Result<FanOutReport, PipelineError> {
        self.validate_input(transcript)?;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let input = AnalysisInput::new(transcript, resume_text);
        info!(
            branches = self.analyzers.len(),
            transcript_chars = input.transcript.chars().count(),
            has_resume = input.resume_text.is_some(),
            "fanning out profile analysis"
        );

        let branches = self
            .analyzers
            .iter()
            .map(|analyzer| run_branch(analyzer.as_ref(), &input, self.branch_timeout, cancel));
        let mut settled = join_all(branches).await;

        let fragments: Vec<ProfileFragment> = ProfileKind::ALL
            .into_iter()
            .map(|kind| match settled.iter().position(|f| f.kind == kind) {
                Some(idx) => settled.swap_remove(idx),
                None => {
                    warn!(%kind, "no analyzer registered; using default payload");
                    ProfileFragment::defaulted(kind, "no analyzer registered", 0)
                }
            })
            .collect();

        let status = if fragments.iter().all(|f| f.succeeded) {
            RunStatus::Completed
        } else {
            RunStatus::DegradedCompleted
        };

        Ok(FanOutReport { fragments, status })
    }
}

async fn run_branch(
    analyzer: &dyn ProfileAnalyzer,
    input: &AnalysisInput,
    budget: Duration,
    cancel: &CancellationSignal,
) -> ProfileFragment {
    let kind = analyzer.kind();
    let started = Instant::now();
    let guarded = AssertUnwindSafe(analyzer.analyze(input)).catch_unwind();

    let outcome = tokio::select! {
        settled = tokio::time::timeout(budget, guarded) => match settled {
            Ok(Ok(Ok(payload))) => Ok(payload),
            Ok(Ok(Err(e))) => Err(e.to_string()),
            Ok(Err(panic)) => Err(format!("analyzer panicked: {}", panic_message(panic.as_ref()))),
            Err(_) => Err(format!("timed out after {}ms", budget.as_millis())),
        },
        _ = cancel.cancelled() => Err("cancelled".to_string()),
    };

    let duration_ms = started.elapsed().as_millis() as u64;
    match outcome {
        Ok(payload) => {
            info!(%kind, duration_ms, "analyzer succeeded");
            ProfileFragment::success(kind, payload, duration_ms)
        }
        Err(reason) => {
            warn!(%kind, duration_ms, %reason, "analyzer failed; substituting default payload");
            ProfileFragment::defaulted(kind, reason, duration_ms)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use super::*;
    use crate::errors::AnalyzerError;
    use crate::profile::analyzer::StaticAnalyzer;

    const TRANSCRIPT: &str = "I have taught high school physics for eight years and I want to move \
        into software, ideally something remote where I can keep mentoring people.";

    enum Behavior {
        Respond(Value),
        Fail(&'static str),
        Sleep(Duration),
        Panic,
    }

    struct ScriptedAnalyzer {
        kind: ProfileKind,
        behavior: Behavior,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedAnalyzer {
        fn new(
            kind: ProfileKind,
            behavior: Behavior,
            calls: &Arc<AtomicUsize>,
        ) -> Arc<dyn ProfileAnalyzer> {
            Arc::new(Self {
                kind,
                behavior,
                calls: calls.clone(),
            })
        }
    }

    #[async_trait]
    impl ProfileAnalyzer for ScriptedAnalyzer {
        fn kind(&self) -> ProfileKind {
            self.kind
        }

        async fn analyze(&self, _input: &AnalysisInput) -> Result<Value, AnalyzerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behavior {
                Behavior::Respond(v) => Ok(v.clone()),
                Behavior::Fail(msg) => Err(AnalyzerError::Failed(msg.to_string())),
                Behavior::Sleep(d) => {
                    tokio::time::sleep(*d).await;
                    Ok(json!({"slept": d.as_secs()}))
                }
                Behavior::Panic => panic!("analyzer exploded"),
            }
        }
    }

    fn settings(timeout: Duration) -> PipelineSettings {
        PipelineSettings {
            analyzer_timeout: timeout,
            ..PipelineSettings::default()
        }
    }

    fn all_respond(calls: &Arc<AtomicUsize>) -> Vec<Arc<dyn ProfileAnalyzer>> {
        ProfileKind::ALL
            .into_iter()
            .map(|k| ScriptedAnalyzer::new(k, Behavior::Respond(json!({"ok": k.as_str()})), calls))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_transcript_invokes_no_analyzer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator =
            ProfileOrchestrator::new(all_respond(&calls), &settings(Duration::from_secs(5)));

        let err = orchestrator
            .run("   ", None, &CancellationSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Input(InputError::EmptyTranscript)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_short_transcript_invokes_no_analyzer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator =
            ProfileOrchestrator::new(all_respond(&calls), &settings(Duration::from_secs(5)));

        let err = orchestrator
            .run("hi there", None, &CancellationSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Input(InputError::TranscriptTooShort { len: 8, min: 20 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_succeed_is_completed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator =
            ProfileOrchestrator::new(all_respond(&calls), &settings(Duration::from_secs(5)));

        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        let kinds: Vec<ProfileKind> = report.fragments.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, ProfileKind::ALL.to_vec());
        assert!(report.failed_kinds().is_empty());
    }

    #[tokio::test]
    async fn test_single_failure_is_isolated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut analyzers = all_respond(&calls);
        analyzers[1] = ScriptedAnalyzer::new(
            ProfileKind::Personality,
            Behavior::Fail("model refused"),
            &calls,
        );
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(5)));

        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(report.status, RunStatus::DegradedCompleted);
        assert_eq!(report.failed_kinds(), vec![ProfileKind::Personality]);
        let failed = &report.fragments[1];
        assert_eq!(failed.payload, ProfileKind::Personality.default_payload());
        assert!(failed.failure_reason.as_deref().unwrap().contains("model refused"));
        assert!(report.fragments.iter().filter(|f| f.succeeded).count() == 4);
    }

    #[tokio::test]
    async fn test_panicking_branch_becomes_failed_fragment() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut analyzers = all_respond(&calls);
        analyzers[3] = ScriptedAnalyzer::new(ProfileKind::Goals, Behavior::Panic, &calls);
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(5)));

        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        let goals = &report.fragments[3];
        assert!(!goals.succeeded);
        assert!(goals.failure_reason.as_deref().unwrap().contains("analyzer exploded"));
        assert_eq!(report.failed_kinds(), vec![ProfileKind::Goals]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_defaults_only_the_slow_branch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut analyzers = all_respond(&calls);
        analyzers[2] = ScriptedAnalyzer::new(
            ProfileKind::Passions,
            Behavior::Sleep(Duration::from_secs(600)),
            &calls,
        );
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(30)));

        let started = Instant::now();
        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(30) && elapsed < Duration::from_secs(31));
        assert_eq!(report.failed_kinds(), vec![ProfileKind::Passions]);
        assert!(report.fragments[2]
            .failure_reason
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_branches_share_a_parallel_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzers: Vec<Arc<dyn ProfileAnalyzer>> = ProfileKind::ALL
            .into_iter()
            .enumerate()
            .map(|(i, k)| {
                let delay = Duration::from_secs(10 * (i as u64 + 1));
                ScriptedAnalyzer::new(k, Behavior::Sleep(delay), &calls)
            })
            .collect();
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(60)));

        let started = Instant::now();
        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        // Slowest branch is 50s; sequential execution would take 150s.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(50) && elapsed < Duration::from_secs(51));
        assert_eq!(report.status, RunStatus::Completed);
        assert!((50_000..51_000).contains(&report.fragments[4].duration_ms));
    }

    #[tokio::test]
    async fn test_missing_kind_is_defaulted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzers: Vec<Arc<dyn ProfileAnalyzer>> = all_respond(&calls)
            .into_iter()
            .filter(|a| a.kind() != ProfileKind::Values)
            .collect();
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(5)));

        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(report.fragments.len(), 5);
        assert_eq!(report.failed_kinds(), vec![ProfileKind::Values]);
        assert_eq!(
            report.fragments[4].failure_reason.as_deref(),
            Some("no analyzer registered")
        );
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut analyzers = all_respond(&calls);
        analyzers.push(ScriptedAnalyzer::new(
            ProfileKind::Skills,
            Behavior::Fail("second"),
            &calls,
        ));
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(5)));

        let report = orchestrator
            .run(TRANSCRIPT, None, &CancellationSignal::never())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(report.status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn test_cancelled_before_fan_out_fails_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator =
            ProfileOrchestrator::new(all_respond(&calls), &settings(Duration::from_secs(5)));
        let (handle, signal) = CancellationSignal::pair();
        handle.cancel();

        let err = orchestrator.run(TRANSCRIPT, None, &signal).await.unwrap_err();

        assert!(matches!(err, PipelineError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_fan_out_defaults_outstanding_branches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut analyzers = all_respond(&calls);
        analyzers[0] = ScriptedAnalyzer::new(
            ProfileKind::Skills,
            Behavior::Sleep(Duration::from_secs(40)),
            &calls,
        );
        let orchestrator = ProfileOrchestrator::new(analyzers, &settings(Duration::from_secs(60)));
        let (handle, signal) = CancellationSignal::pair();

        let canceller = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            handle.cancel();
        };
        let (report, ()) = tokio::join!(orchestrator.run(TRANSCRIPT, None, &signal), canceller);
        let report = report.unwrap();

        assert_eq!(report.failed_kinds(), vec![ProfileKind::Skills]);
        assert_eq!(report.fragments[0].failure_reason.as_deref(), Some("cancelled"));
        assert_eq!(report.status, RunStatus::DegradedCompleted);
    }

    #[tokio::test]
    async fn test_static_backend_completes() {
        let orchestrator =
            ProfileOrchestrator::new(StaticAnalyzer::standard_set(), &PipelineSettings::default());
        let report = orchestrator
            .run(TRANSCRIPT, Some("resume"), &CancellationSignal::never())
            .await
            .unwrap();
        assert_eq!(report.status, RunStatus::Completed);
    }
}
