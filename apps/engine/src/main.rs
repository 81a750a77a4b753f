use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_engine::{CareerPipeline, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging. Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("career_engine={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting career engine v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let Some(transcript_path) = args.next().map(PathBuf::from) else {
        bail!("usage: career-engine <transcript-file> [resume-file]");
    };
    let resume_path = args.next().map(PathBuf::from);

    let transcript = tokio::fs::read_to_string(&transcript_path)
        .await
        .with_context(|| format!("Failed to read transcript '{}'", transcript_path.display()))?;
    let resume = match &resume_path {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read resume '{}'", path.display()))?,
        ),
        None => None,
    };

    let pipeline = CareerPipeline::from_config(&config)?;

    // Cancel the run on Ctrl-C; branches still in flight become failed fragments.
    let (handle, signal) = career_engine::CancellationSignal::pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let outcome = pipeline
        .run_with_cancel(&transcript, resume.as_deref(), &signal)
        .await
        .context("Pipeline run failed")?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
