//! Recommendation Engine — one generation call, defensive decoding, normalization.
//!
//! The engine never returns an error. Anything that prevents a usable list
//! (capability error, timeout, cancellation, undecodable output) collapses into
//! a single zero-score sentinel candidate so callers always get a well-formed set.

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::cancel::CancellationSignal;
use crate::config::PipelineSettings;
use crate::errors::{GenerationError, GenerationParseError};
use crate::fields::{pick_array, pick_number, pick_string, slugify};
use crate::llm_client::decode_json;
use crate::profile::CareerProfile;
use crate::recommendation::generator::RecommendationGenerator;
use crate::recommendation::models::{Candidate, RecommendationSet};
use crate::recommendation::normalizer::normalize_scores;

const LIST_ALIASES: &[&str] = &["recommendations", "careerRecommendations", "careers"];

const ID_ALIASES: &[&str] = &["careerId", "career_id", "id"];
const NAME_ALIASES: &[&str] = &["name", "careerName", "career_name", "role", "title"];
const INDUSTRY_ALIASES: &[&str] = &["industry", "sector", "field"];
const SCORE_ALIASES: &[&str] = &["fitScore", "fit_score", "matchScore", "match_score", "score"];
const SUMMARY_ALIASES: &[&str] = &["summary", "description", "overview"];
const SALARY_ALIASES: &[&str] = &[
    "salaryRange",
    "salary_range",
    "medianSalary",
    "median_salary",
    "salary",
];
const GROWTH_ALIASES: &[&str] = &["growthOutlook", "growth_outlook", "outlook", "growth"];
const TRANSITION_ALIASES: &[&str] = &[
    "estimatedTransitionTime",
    "estimated_transition_time",
    "estimatedTime",
    "estimated_time",
    "transitionTime",
    "transition_time",
];
const RATIONALE_ALIASES: &[&str] = &[
    "rationale",
    "whyGoodFit",
    "why_good_fit",
    "matchExplanation",
    "match_explanation",
    "explanation",
    "reasoning",
];

pub struct RecommendationEngine {
    generator: Arc<dyn RecommendationGenerator>,
    settings: PipelineSettings,
}

impl RecommendationEngine {
    pub fn new(generator: Arc<dyn RecommendationGenerator>, settings: &PipelineSettings) -> Self {
        Self {
            generator,
            settings: settings.clone(),
        }
    }

    pub async fn recommend(
        &self,
        profile: &CareerProfile,
        transcript: Option<&str>,
        cancel: &CancellationSignal,
    ) -> RecommendationSet {
        let window = transcript.map(|t| {
            transcript_window(
                t,
                self.settings.context_threshold_chars,
                self.settings.context_edge_chars,
            )
        });

        let raw = match self.generate(profile, window.as_deref(), cancel).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "generation failed; returning fallback recommendation");
                return RecommendationSet::fallback(format!(
                    "Recommendation generation failed: {e}"
                ));
            }
        };

        let mut candidates = match parse_candidates(&raw) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    error = %e,
                    "could not decode generation output; returning fallback recommendation"
                );
                return RecommendationSet::fallback(format!(
                    "Recommendations could not be read: {e}"
                ));
            }
        };

        self.enforce_count(&mut candidates);

        let normalized = normalize_scores(candidates);
        info!(
            count = normalized.candidates.len(),
            healthy = normalized.healthy,
            "recommendations ready"
        );
        RecommendationSet {
            recommendations: normalized.candidates,
            distribution_healthy: normalized.healthy,
            observed_distribution: normalized.observed,
            fallback: false,
        }
    }

    async fn generate(
        &self,
        profile: &CareerProfile,
        transcript: Option<&str>,
        cancel: &CancellationSignal,
    ) -> Result<String, GenerationError> {
        if cancel.is_cancelled() {
            return Err(GenerationError::Failed("cancelled".to_string()));
        }
        let budget = self.settings.generation_timeout;
        let call = self.generator.generate(profile, transcript);
        tokio::select! {
            settled = tokio::time::timeout(budget, call) => {
                match settled {
                    Ok(result) => result,
                    Err(_) => Err(GenerationError::Timeout(budget)),
                }
            }
            _ = cancel.cancelled() => Err(GenerationError::Failed("cancelled".to_string())),
        }
    }

    /// Under-generation only warns. Over-generation keeps the best `max` by score.
    fn enforce_count(&self, candidates: &mut Vec<Candidate>) {
        let (min, max) = (
            self.settings.min_recommendations,
            self.settings.max_recommendations,
        );
        let count = candidates.len();
        if count < min {
            warn!(count, min, "generation returned fewer recommendations than requested");
        } else if count > max {
            warn!(count, max, "generation returned too many recommendations; keeping the top ones");
            candidates.sort_by(|a, b| {
                b.fit_score
                    .partial_cmp(&a.fit_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            candidates.truncate(max);
        }
    }
}

/// Bounded view of a long transcript: head and tail kept, middle elided with a marker.
///
/// Lengths are counted in chars, and slicing always lands on char boundaries.
pub fn transcript_window(transcript: &str, threshold: usize, edge: usize) -> Cow<'_, str> {
    let total = transcript.chars().count();
    if total <= threshold || edge * 2 >= total {
        return Cow::Borrowed(transcript);
    }

    let head_end = byte_offset(transcript, edge);
    let tail_start = byte_offset(transcript, total - edge);
    let omitted = total - 2 * edge;
    Cow::Owned(format!(
        "{}\n\n[... {omitted} characters omitted ...]\n\n{}",
        &transcript[..head_end],
        &transcript[tail_start..]
    ))
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Decodes raw generation text into candidates in generation order.
pub fn parse_candidates(raw: &str) -> Result<Vec<Candidate>, GenerationParseError> {
    let value: Value =
        decode_json(raw).map_err(|e| GenerationParseError::InvalidJson(e.to_string()))?;
    let items = value
        .as_object()
        .and_then(|obj| pick_array(obj, LIST_ALIASES))
        .ok_or(GenerationParseError::MissingList)?;

    let mut used_ids = HashSet::new();
    let mut candidates = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            warn!(position, "skipping non-object recommendation item");
            continue;
        };
        let rank = candidates.len() + 1;
        let mut candidate = read_candidate(obj, rank);
        candidate.career_id = unique_id(candidate.career_id, rank, &mut used_ids);
        candidates.push(candidate);
    }

    if candidates.is_empty() {
        return Err(GenerationParseError::NoCandidates);
    }
    Ok(candidates)
}

fn read_candidate(obj: &Map<String, Value>, rank: usize) -> Candidate {
    let name = pick_string(obj, NAME_ALIASES).unwrap_or_else(|| format!("Career option {rank}"));
    let career_id = pick_string(obj, ID_ALIASES)
        .map(|id| slugify(&id))
        .filter(|id| !id.is_empty())
        .or_else(|| Some(slugify(&name)).filter(|id| !id.is_empty()))
        .unwrap_or_else(|| format!("career-{rank}"));
    let fit_score = pick_number(obj, SCORE_ALIASES)
        .map(|s| s.clamp(0.0, 100.0))
        .unwrap_or(0.0);
    let text = |aliases: &[&str], default: &str| {
        pick_string(obj, aliases).unwrap_or_else(|| default.to_string())
    };

    Candidate {
        career_id,
        industry: text(INDUSTRY_ALIASES, "Unspecified"),
        fit_score,
        summary: text(SUMMARY_ALIASES, ""),
        salary_range: text(SALARY_ALIASES, "Not available"),
        growth_outlook: text(GROWTH_ALIASES, "Not available"),
        estimated_transition_time: text(TRANSITION_ALIASES, "Not available"),
        rationale: text(RATIONALE_ALIASES, ""),
        name,
    }
}

/// Appends `-{rank}` until the id is unused. Deterministic for a given generation order.
fn unique_id(mut id: String, rank: usize, used: &mut HashSet<String>) -> String {
    while used.contains(&id) {
        id = format!("{id}-{rank}");
    }
    used.insert(id.clone());
    id
}
