mod batch;
mod config;
mod documents;
mod errors;
mod extraction;
mod llm_client;
mod models;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::jobs::{BatchJob, JobKind};
use crate::batch::runner::BatchRunner;
use crate::config::Config;
use crate::documents::DocxLoader;
use crate::extraction::{FileDiagnosticLog, ResponseExtractor};
use crate::llm_client::prompts::SystemContext;
use crate::llm_client::LlmClient;

#[derive(Parser)]
#[command(name = "assistant", version, about = "LLM job-search and reading assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarise every job description waiting for review
    Shortlist(JobArgs),
    /// Compare the CV against every job description waiting for review
    Compare(JobArgs),
    /// Summarise every saved article for the skills toolbox
    Toolbox(JobArgs),
    /// Extract the answer object from a saved model response (file or stdin)
    Extract {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct JobArgs {
    /// System context (persona) to answer in
    #[arg(long, value_enum)]
    context: Option<SystemContext>,
    /// Sampling temperature between 0 and 1
    #[arg(long)]
    temperature: Option<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting assistant v{}", env!("CARGO_PKG_VERSION"));

    let diagnostic_log = FileDiagnosticLog::new(&config.llm_log_path);
    info!("Unparseable responses go to {}", diagnostic_log.path().display());
    let extractor = ResponseExtractor::new(Arc::new(diagnostic_log));

    match cli.command {
        Command::Shortlist(args) => run_job(JobKind::Shortlist, args, &config, &extractor).await,
        Command::Compare(args) => run_job(JobKind::Compare, args, &config, &extractor).await,
        Command::Toolbox(args) => run_job(JobKind::Toolbox, args, &config, &extractor).await,
        Command::Extract { file } => {
            let raw = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?,
                None => {
                    let mut raw = String::new();
                    std::io::stdin()
                        .read_to_string(&mut raw)
                        .context("cannot read stdin")?;
                    raw
                }
            };
            let record = extractor.extract(&raw)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
    }
}

async fn run_job(
    kind: JobKind,
    args: JobArgs,
    config: &Config,
    extractor: &ResponseExtractor,
) -> Result<()> {
    let llm = LlmClient::new(config.require_api_key()?.to_string())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let mut job = BatchJob::new(kind, &config.data_dir);
    if let Some(context) = args.context {
        job = job.with_context(context);
    }
    if let Some(temperature) = args.temperature {
        job = job.with_temperature(temperature);
    }

    let summary = BatchRunner::new(&llm, &DocxLoader, extractor)
        .run(&job)
        .await
        .inspect_err(|e| error!(code = e.code(), "{} run failed: {e}", kind.name()))?;

    info!(
        "{} run complete: {} processed, {} fallbacks",
        kind.name(),
        summary.processed,
        summary.fallbacks
    );
    Ok(())
}
