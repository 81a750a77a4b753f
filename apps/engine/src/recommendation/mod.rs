// Recommendation: generation, defensive decoding and score normalization.

pub mod engine;
pub mod generator;
pub mod models;
pub mod normalizer;
pub mod prompts;

pub use engine::{parse_candidates, transcript_window, RecommendationEngine};
pub use generator::{LlmRecommendationGenerator, RecommendationGenerator, StaticGenerator};
pub use models::{Candidate, RecommendationSet};
pub use normalizer::{normalize_scores, NormalizedScores, ScoreBand, ScoreDistribution};
