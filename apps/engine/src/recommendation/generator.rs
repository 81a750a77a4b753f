//! Generation capability — "profile (+ transcript window) → raw text".
//!
//! Backends return the unparsed response text. All decoding, alias resolution
//! and recovery happen in the engine, so a backend never decides what a
//! malformed answer means.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::GenerationError;
use crate::llm_client::prompts::render_template;
use crate::llm_client::LlmClient;
use crate::profile::CareerProfile;
use crate::recommendation::prompts::{GENERATION_PROMPT, GENERATION_SYSTEM, TRANSCRIPT_SECTION};

#[async_trait]
pub trait RecommendationGenerator: Send + Sync {
    /// `transcript` is already windowed by the caller.
    async fn generate(
        &self,
        profile: &CareerProfile,
        transcript: Option<&str>,
    ) -> Result<String, GenerationError>;
}

pub struct LlmRecommendationGenerator {
    llm: LlmClient,
    min_count: usize,
    max_count: usize,
}

impl LlmRecommendationGenerator {
    pub fn new(llm: LlmClient, min_count: usize, max_count: usize) -> Self {
        Self {
            llm,
            min_count,
            max_count,
        }
    }

    pub fn render(
        &self,
        profile: &CareerProfile,
        transcript: Option<&str>,
    ) -> Result<String, GenerationError> {
        let profile_json = serde_json::to_string_pretty(profile)
            .map_err(|e| GenerationError::Failed(format!("profile serialization: {e}")))?;
        let transcript_section = transcript
            .map(|t| render_template(TRANSCRIPT_SECTION, &[("transcript", t)]))
            .unwrap_or_default();
        let (min, max) = (self.min_count.to_string(), self.max_count.to_string());
        Ok(render_template(
            GENERATION_PROMPT,
            &[
                ("min", min.as_str()),
                ("max", max.as_str()),
                ("profile", profile_json.as_str()),
                ("transcript_section", transcript_section.as_str()),
            ],
        ))
    }
}

#[async_trait]
impl RecommendationGenerator for LlmRecommendationGenerator {
    async fn generate(
        &self,
        profile: &CareerProfile,
        transcript: Option<&str>,
    ) -> Result<String, GenerationError> {
        let prompt = self.render(profile, transcript)?;
        let text = self.llm.complete(&prompt, GENERATION_SYSTEM).await?;
        debug!(chars = text.len(), "generation backend responded");
        Ok(text)
    }
}

/// Serves a fixed response. Used when no LLM key is configured.
///
/// The default response mimics an over-optimistic backend: legacy field names
/// (`role`, `matchScore`, `medianSalary`) and inflated scores, so offline runs
/// go through alias resolution and rescaling.
pub struct StaticGenerator {
    response: String,
}

impl StaticGenerator {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    pub fn canned() -> Self {
        let body = json!({ "recommendations": canned_careers() });
        Self::new(format!("```json\n{body:#}\n```"))
    }
}

impl Default for StaticGenerator {
    fn default() -> Self {
        Self::canned()
    }
}

#[async_trait]
impl RecommendationGenerator for StaticGenerator {
    async fn generate(
        &self,
        _profile: &CareerProfile,
        _transcript: Option<&str>,
    ) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }
}

// (id, title, industry, salary, growth, transition time, score)
#[rustfmt::skip]
const CAREER_LIBRARY: &[(&str, &str, &str, &str, &str, &str, u32)] = &[
    ("data-scientist", "Data Scientist", "Data & Analytics", "$100,000 - $150,000", "36% (Much faster than average)", "10-18 months", 96),
    ("fullstack-dev", "Full Stack Developer", "Technology", "$95,000 - $130,000", "22% (Much faster than average)", "8-12 months", 95),
    ("product-manager", "Product Manager", "Product & Strategy", "$110,000 - $160,000", "10% (As fast as average)", "12-24 months", 94),
    ("devops-engineer", "DevOps Engineer", "Technology", "$100,000 - $140,000", "25% (Much faster than average)", "10-14 months", 93),
    ("ux-researcher", "UX Researcher", "Design & UX", "$80,000 - $120,000", "13% (Faster than average)", "8-12 months", 92),
    ("product-designer", "Product Designer", "Design & UX", "$85,000 - $120,000", "16% (Faster than average)", "6-10 months", 92),
    ("learning-engineer", "Learning Experience Engineer", "Education Technology", "$80,000 - $115,000", "12% (Faster than average)", "6-12 months", 91),
    ("solutions-architect", "Solutions Architect", "Technology", "$120,000 - $170,000", "11% (Faster than average)", "12-18 months", 90),
    ("ml-engineer", "Machine Learning Engineer", "Data & Analytics", "$120,000 - $175,000", "40% (Much faster than average)", "12-20 months", 90),
    ("developer-advocate", "Developer Advocate", "Technology", "$100,000 - $145,000", "15% (Faster than average)", "6-12 months", 89),
    ("edtech-specialist", "Educational Technology Specialist", "Education Technology", "$60,000 - $110,000", "10% (As fast as average)", "4-8 months", 88),
    ("technical-pm", "Technical Program Manager", "Product & Strategy", "$115,000 - $165,000", "9% (As fast as average)", "12-18 months", 88),
    ("marketing-manager", "Digital Marketing Manager", "Marketing", "$75,000 - $115,000", "10% (As fast as average)", "6-12 months", 87),
    ("sustainability-analyst", "Sustainability Data Analyst", "Climate & Energy", "$70,000 - $105,000", "20% (Much faster than average)", "6-10 months", 86),
    ("content-writer", "Content Strategist", "Marketing & Content", "$60,000 - $90,000", "9% (As fast as average)", "4-8 months", 85),
    ("analytics-consultant", "Analytics Consultant", "Consulting", "$85,000 - $130,000", "11% (Faster than average)", "6-12 months", 84),
    ("nonprofit-tech-lead", "Nonprofit Technology Lead", "Social Impact", "$70,000 - $100,000", "8% (As fast as average)", "8-14 months", 72),
];

fn canned_careers() -> Vec<Value> {
    CAREER_LIBRARY
        .iter()
        .map(|(id, title, industry, salary, growth, time, score)| {
            json!({
                "careerId": id,
                "role": title,
                "industry": industry,
                "matchScore": score,
                "summary": format!("Work as a {title} in {industry}."),
                "medianSalary": salary,
                "growthOutlook": growth,
                "estimatedTime": time,
                "matchExplanation": format!(
                    "Your analytical skills and passion for continuous learning carry directly into {title} work."
                ),
            })
        })
        .collect()
}
