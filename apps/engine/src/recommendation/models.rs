use serde::{Deserialize, Serialize};

use crate::recommendation::normalizer::ScoreDistribution;

/// One generated career recommendation.
///
/// `fit_score` is 0 – 100. Values read from the generation backend are clamped
/// into that range on decode; the normalizer may later rescale them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub career_id: String,
    pub name: String,
    pub industry: String,
    pub fit_score: f64,
    pub summary: String,
    pub salary_range: String,
    pub growth_outlook: String,
    pub estimated_transition_time: String,
    /// Must tie the career back to the user's own profile.
    pub rationale: String,
}

impl Candidate {
    pub const FALLBACK_ID: &'static str = "error-fallback";

    /// Sentinel returned instead of a list when generation cannot be used.
    pub fn fallback(rationale: impl Into<String>) -> Self {
        Self {
            career_id: Self::FALLBACK_ID.to_string(),
            name: "Career Recommendations Temporarily Unavailable".to_string(),
            industry: "System".to_string(),
            fit_score: 0.0,
            summary: "Unable to generate recommendations at this time. Please try again."
                .to_string(),
            salary_range: "N/A".to_string(),
            growth_outlook: "N/A".to_string(),
            estimated_transition_time: "N/A".to_string(),
            rationale: rationale.into(),
        }
    }
}

/// Final ranked output of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    /// Non-increasing by `fit_score`.
    pub recommendations: Vec<Candidate>,
    /// Health of the distribution as generated, before any rescaling.
    pub distribution_healthy: bool,
    pub observed_distribution: ScoreDistribution,
    /// True when the sentinel candidate replaced the generated list.
    pub fallback: bool,
}

impl RecommendationSet {
    pub fn fallback(rationale: impl Into<String>) -> Self {
        let sentinel = Candidate::fallback(rationale);
        let observed = ScoreDistribution::observe(std::slice::from_ref(&sentinel));
        Self {
            recommendations: vec![sentinel],
            distribution_healthy: false,
            observed_distribution: observed,
            fallback: true,
        }
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
