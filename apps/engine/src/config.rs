use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Tunables for one pipeline run. `Default` holds the system defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Minimum trimmed transcript length, in chars, before fan-out is attempted.
    pub min_transcript_chars: usize,
    /// Independent budget for each profiling branch.
    pub analyzer_timeout: Duration,
    /// Budget for the single generation call.
    pub generation_timeout: Duration,
    pub min_recommendations: usize,
    pub max_recommendations: usize,
    /// Transcripts longer than this are windowed before generation.
    pub context_threshold_chars: usize,
    /// Size of the kept prefix and of the kept suffix when windowing.
    pub context_edge_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_transcript_chars: 20,
            analyzer_timeout: Duration::from_secs(60),
            generation_timeout: Duration::from_secs(120),
            min_recommendations: 15,
            max_recommendations: 25,
            context_threshold_chars: 6000,
            context_edge_chars: 2500,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent key selects the offline fixtures backend.
    pub anthropic_api_key: Option<String>,
    pub rust_log: String,
    pub pipeline: PipelineSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = PipelineSettings::default();
        let pipeline = PipelineSettings {
            min_transcript_chars: parse_env("MIN_TRANSCRIPT_CHARS", defaults.min_transcript_chars)?,
            analyzer_timeout: Duration::from_secs(parse_env(
                "ANALYZER_TIMEOUT_SECS",
                defaults.analyzer_timeout.as_secs(),
            )?),
            generation_timeout: Duration::from_secs(parse_env(
                "GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )?),
            min_recommendations: parse_env("MIN_RECOMMENDATIONS", defaults.min_recommendations)?,
            max_recommendations: parse_env("MAX_RECOMMENDATIONS", defaults.max_recommendations)?,
            context_threshold_chars: parse_env(
                "CONTEXT_THRESHOLD_CHARS",
                defaults.context_threshold_chars,
            )?,
            context_edge_chars: parse_env("CONTEXT_EDGE_CHARS", defaults.context_edge_chars)?,
        };
        validate(&pipeline)?;

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pipeline,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn validate(settings: &PipelineSettings) -> Result<()> {
    if settings.min_recommendations > settings.max_recommendations {
        bail!(
            "MIN_RECOMMENDATIONS ({}) must not exceed MAX_RECOMMENDATIONS ({})",
            settings.min_recommendations,
            settings.max_recommendations
        );
    }
    if settings.max_recommendations == 0 {
        bail!("MAX_RECOMMENDATIONS must be at least 1");
    }
    if settings.context_edge_chars * 2 >= settings.context_threshold_chars {
        bail!(
            "CONTEXT_EDGE_CHARS ({}) must be less than half of CONTEXT_THRESHOLD_CHARS ({})",
            settings.context_edge_chars,
            settings.context_threshold_chars
        );
    }
    Ok(())
}
