//! Score Normalizer — enforces a realistic spread of fit scores.
//!
//! Generation backends inflate scores: asked for 20 careers they tend to rate
//! 18 of them above 85. The normalizer detects an unhealthy spread and rescales
//! scores into fixed tiers by rank. It never reorders candidates, so consumers
//! that trust sort order stay correct when absolute scores change.
//!
//! Algorithm:
//! 1. Stable sort descending by `fit_score` (ties keep generation order).
//! 2. Bands: high ≥85, mid 70–84, low 60–69. Below 60 counts as low.
//! 3. Healthy iff high ≤ 60%, mid ≥ 20%, low ≥ 15% of the total.
//!    Healthy input is returned sorted but otherwise untouched.
//! 4. Otherwise targets: high = ⌊0.5·n⌋, mid = ⌊0.3·n⌋, low = the remainder.
//! 5. Rank i in a tier of size t at offset k gets
//!    ⌊top − k·(span / max(t−1, 1))⌋, clamped to the tier floor:
//!    high 95/10/85, mid 84/14/70, low 69/9/60.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::recommendation::models::Candidate;

pub const HIGH_BAND_MIN: f64 = 85.0;
pub const MID_BAND_MIN: f64 = 70.0;
pub const LOW_BAND_MIN: f64 = 60.0;

const MAX_HIGH_SHARE: f64 = 0.6;
const MIN_MID_SHARE: f64 = 0.2;
const MIN_LOW_SHARE: f64 = 0.15;

const TARGET_HIGH_SHARE: f64 = 0.5;
const TARGET_MID_SHARE: f64 = 0.3;

/// (top score, span, floor) of each rescaling tier.
const HIGH_TIER: Tier = Tier { top: 95.0, span: 10.0, floor: 85.0 };
const MID_TIER: Tier = Tier { top: 84.0, span: 14.0, floor: 70.0 };
const LOW_TIER: Tier = Tier { top: 69.0, span: 9.0, floor: 60.0 };

#[derive(Debug, Clone, Copy)]
struct Tier {
    top: f64,
    span: f64,
    floor: f64,
}

impl Tier {
    /// Score for offset `k` within a tier holding `size` candidates.
    fn score_at(self, k: usize, size: usize) -> f64 {
        let denominator = size.saturating_sub(1).max(1) as f64;
        (self.top - k as f64 * (self.span / denominator))
            .floor()
            .max(self.floor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    High,
    Mid,
    Low,
    /// Below 60. Counted as low for health purposes.
    VeryLow,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score >= HIGH_BAND_MIN {
            ScoreBand::High
        } else if score >= MID_BAND_MIN {
            ScoreBand::Mid
        } else if score >= LOW_BAND_MIN {
            ScoreBand::Low
        } else {
            ScoreBand::VeryLow
        }
    }
}

/// Band counts of a candidate list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDistribution {
    pub total: usize,
    pub high: usize,
    pub mid: usize,
    pub low: usize,
    pub very_low: usize,
}

impl ScoreDistribution {
    pub fn observe(candidates: &[Candidate]) -> Self {
        candidates
            .iter()
            .fold(Self::default(), |mut dist, candidate| {
                dist.total += 1;
                match ScoreBand::of(candidate.fit_score) {
                    ScoreBand::High => dist.high += 1,
                    ScoreBand::Mid => dist.mid += 1,
                    ScoreBand::Low => dist.low += 1,
                    ScoreBand::VeryLow => dist.very_low += 1,
                }
                dist
            })
    }

    pub fn is_healthy(&self) -> bool {
        let total = self.total as f64;
        let low = (self.low + self.very_low) as f64;
        self.high as f64 <= MAX_HIGH_SHARE * total
            && self.mid as f64 >= MIN_MID_SHARE * total
            && low >= MIN_LOW_SHARE * total
    }
}

/// Tier sizes used when rescaling `total` candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTargets {
    pub high: usize,
    pub mid: usize,
    pub low: usize,
}

impl TierTargets {
    pub fn for_total(total: usize) -> Self {
        let high = (TARGET_HIGH_SHARE * total as f64).floor() as usize;
        let mid = (TARGET_MID_SHARE * total as f64).floor() as usize;
        Self {
            high,
            mid,
            low: total - high - mid,
        }
    }

    /// Rescaled score for 0-based `rank`.
    pub fn score_for_rank(&self, rank: usize) -> f64 {
        if rank < self.high {
            HIGH_TIER.score_at(rank, self.high)
        } else if rank < self.high + self.mid {
            MID_TIER.score_at(rank - self.high, self.mid)
        } else {
            LOW_TIER.score_at(rank - self.high - self.mid, self.low)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedScores {
    /// Non-increasing by score; same length and relative order as the sorted input.
    pub candidates: Vec<Candidate>,
    /// Distribution before any rescaling.
    pub observed: ScoreDistribution,
    pub healthy: bool,
}

/// Sorts by score and, if the spread is unhealthy, rescales scores by rank.
pub fn normalize_scores(mut candidates: Vec<Candidate>) -> NormalizedScores {
    // Vec::sort_by is stable: ties keep generation order.
    candidates.sort_by(|a, b| {
        b.fit_score
            .partial_cmp(&a.fit_score)
            .unwrap_or(Ordering::Equal)
    });

    let observed = ScoreDistribution::observe(&candidates);
    let healthy = observed.is_healthy();

    if healthy {
        debug!(?observed, "score distribution healthy; leaving scores untouched");
        return NormalizedScores {
            candidates,
            observed,
            healthy,
        };
    }

    let targets = TierTargets::for_total(candidates.len());
    info!(
        ?observed,
        target_high = targets.high,
        target_mid = targets.mid,
        target_low = targets.low,
        "score distribution unhealthy; rescaling by rank"
    );

    for (rank, candidate) in candidates.iter_mut().enumerate() {
        candidate.fit_score = targets.score_for_rank(rank);
    }

    NormalizedScores {
        candidates,
        observed,
        healthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, score: f64) -> Candidate {
        Candidate {
            career_id: id.to_string(),
            name: id.to_string(),
            industry: "Technology".to_string(),
            fit_score: score,
            summary: String::new(),
            salary_range: String::new(),
            growth_outlook: String::new(),
            estimated_transition_time: String::new(),
            rationale: String::new(),
        }
    }

    fn from_scores(scores: &[f64]) -> Vec<Candidate> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| candidate(&format!("c{i}"), *s))
            .collect()
    }

    fn ids(candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(|c| c.career_id.clone()).collect()
    }

    fn assert_non_increasing(candidates: &[Candidate]) {
        for pair in candidates.windows(2) {
            assert!(
                pair[0].fit_score >= pair[1].fit_score,
                "{} ({}) before {} ({})",
                pair[0].career_id,
                pair[0].fit_score,
                pair[1].career_id,
                pair[1].fit_score
            );
        }
    }

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ScoreBand::of(85.0), ScoreBand::High);
        assert_eq!(ScoreBand::of(84.9), ScoreBand::Mid);
        assert_eq!(ScoreBand::of(70.0), ScoreBand::Mid);
        assert_eq!(ScoreBand::of(69.0), ScoreBand::Low);
        assert_eq!(ScoreBand::of(60.0), ScoreBand::Low);
        assert_eq!(ScoreBand::of(59.9), ScoreBand::VeryLow);
    }

    #[test]
    fn test_healthy_distribution_is_returned_unchanged() {
        let mut scores = vec![90.0; 10];
        scores.extend(vec![75.0; 7]);
        scores.extend(vec![62.0; 5]);
        let input = from_scores(&scores);

        let result = normalize_scores(input.clone());

        assert!(result.healthy);
        assert_eq!(result.candidates, input);
        assert_eq!(
            result.observed,
            ScoreDistribution { total: 22, high: 10, mid: 7, low: 5, very_low: 0 }
        );
    }

    #[test]
    fn test_healthy_unsorted_input_is_only_sorted() {
        let input = from_scores(&[62.0, 90.0, 75.0, 88.0, 71.0]);
        let result = normalize_scores(input);

        assert!(result.healthy);
        assert_eq!(ids(&result.candidates), vec!["c1", "c3", "c2", "c4", "c0"]);
        let scores: Vec<f64> = result.candidates.iter().map(|c| c.fit_score).collect();
        assert_eq!(scores, vec![90.0, 88.0, 75.0, 71.0, 62.0]);
    }

    #[test]
    fn test_inflated_twenty_is_spread_into_tiers() {
        let mut scores: Vec<f64> = (0..18).map(|i| 98.0 - i as f64 * 0.5).collect();
        scores.extend([55.0, 40.0]);
        let input = from_scores(&scores);

        let result = normalize_scores(input.clone());

        assert!(!result.healthy);
        assert_eq!(result.observed.high, 18);
        assert_eq!(result.observed.very_low, 2);
        let out = &result.candidates;
        assert_eq!(out.len(), 20);
        assert_eq!(ids(out), ids(&input), "rank order must be preserved");
        assert_non_increasing(out);

        let in_range = |lo: f64, hi: f64| {
            out.iter()
                .filter(|c| c.fit_score >= lo && c.fit_score <= hi)
                .count()
        };
        assert_eq!(in_range(85.0, 95.0), 10);
        assert_eq!(in_range(70.0, 84.0), 6);
        assert_eq!(in_range(60.0, 69.0), 4);

        assert_eq!(out[0].fit_score, 95.0);
        assert_eq!(out[9].fit_score, 85.0);
        assert_eq!(out[10].fit_score, 84.0);
        assert_eq!(out[15].fit_score, 70.0);
        let low: Vec<f64> = out[16..].iter().map(|c| c.fit_score).collect();
        assert_eq!(low, vec![69.0, 66.0, 63.0, 60.0]);
    }

    #[test]
    fn test_single_candidate_high_tier_scores_95() {
        // total = 2 → targets high 1, mid 0, low 1.
        let result = normalize_scores(from_scores(&[99.0, 97.0]));
        assert!(!result.healthy);
        let scores: Vec<f64> = result.candidates.iter().map(|c| c.fit_score).collect();
        assert_eq!(scores, vec![95.0, 69.0]);
    }

    #[test]
    fn test_tier_of_size_one_does_not_divide_by_zero() {
        assert_eq!(HIGH_TIER.score_at(0, 1), 95.0);
        assert_eq!(MID_TIER.score_at(0, 1), 84.0);
        assert_eq!(LOW_TIER.score_at(0, 1), 69.0);
        assert_eq!(LOW_TIER.score_at(0, 0), 69.0);
    }

    #[test]
    fn test_targets_absorb_rounding_into_low() {
        assert_eq!(TierTargets::for_total(20), TierTargets { high: 10, mid: 6, low: 4 });
        assert_eq!(TierTargets::for_total(23), TierTargets { high: 11, mid: 6, low: 6 });
        assert_eq!(TierTargets::for_total(1), TierTargets { high: 0, mid: 0, low: 1 });
        assert_eq!(TierTargets::for_total(0), TierTargets { high: 0, mid: 0, low: 0 });
    }

    #[test]
    fn test_long_tier_clamps_at_floor() {
        // 30 low-tier ranks squeezed into 9 points: later ranks must sit on the floor.
        let targets = TierTargets { high: 0, mid: 0, low: 30 };
        assert_eq!(targets.score_for_rank(0), 69.0);
        assert_eq!(targets.score_for_rank(29), 60.0);
        for rank in 0..30 {
            assert!(targets.score_for_rank(rank) >= 60.0);
        }
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let input = from_scores(&[90.0, 90.0, 90.0, 90.0]);
        let result = normalize_scores(input.clone());
        assert_eq!(ids(&result.candidates), ids(&input));
        assert_non_increasing(&result.candidates);
    }

    #[test]
    fn test_empty_input_is_healthy_and_empty() {
        let result = normalize_scores(Vec::new());
        assert!(result.healthy);
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_length_and_order_preserved_across_sizes() {
        for total in 1..=30 {
            let scores: Vec<f64> = (0..total).map(|i| 100.0 - (i % 7) as f64).collect();
            let input = from_scores(&scores);
            let mut expected = input.clone();
            expected.sort_by(|a, b| b.fit_score.partial_cmp(&a.fit_score).unwrap());

            let result = normalize_scores(input);

            assert_eq!(result.candidates.len(), total, "total={total}");
            assert_eq!(ids(&result.candidates), ids(&expected), "total={total}");
            assert_non_increasing(&result.candidates);
        }
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        let mut scores = vec![97.0; 12];
        scores.extend(vec![50.0; 3]);
        let once = normalize_scores(from_scores(&scores));
        let twice = normalize_scores(once.candidates.clone());
        assert!(twice.healthy);
        assert_eq!(twice.candidates, once.candidates);
    }
}
