use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only the batch jobs need it; `extract` runs offline.
    pub anthropic_api_key: Option<String>,
    /// Root of the per-job input/output folders.
    pub data_dir: PathBuf,
    /// Append-only file receiving model output that could not be parsed.
    pub llm_log_path: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            data_dir: env_or("DATA_DIR", "../data").into(),
            llm_log_path: env_or("LLM_LOG_PATH", "../logs/log_llm.txt").into(),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
