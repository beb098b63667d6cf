use anyhow::Context;
use dotenv::dotenv;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use centimo_suggest::DEFAULT_CONFIDENCE_THRESHOLD;

/// Raw environment, all optional so a bare invocation still starts.
/// Variables are prefixed `CENTIMO_` (e.g. `CENTIMO_DATABASE_PATH`).
#[derive(Deserialize)]
struct EnvironmentVariables {
    database_path: Option<PathBuf>,
    port: Option<u16>,
    openai_api_key: Option<String>,
    openai_model: Option<String>,
    openai_timeout_secs: Option<u64>,
    confidence_threshold: Option<f64>,
}

pub struct Config {
    pub database_path: PathBuf,
    pub port: u16,
    /// No key means the AI categorization endpoint reports itself unavailable.
    pub openai_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub suggest_timeout: Duration,
    pub confidence_threshold: f64,
}

impl Config {
    pub fn new() -> Result<Self, anyhow::Error> {
        let _ = dotenv().map_err(|err| warn!("error loading .env: {err:?}"));

        let envs = envy::prefixed("CENTIMO_")
            .from_env::<EnvironmentVariables>()
            .context("invalid environment variables")?;

        Ok(Config {
            database_path: envs
                .database_path
                .unwrap_or_else(|| PathBuf::from("centimo.db")),
            port: envs.port.unwrap_or(3000),
            openai_api_key: envs.openai_api_key,
            openai_model: envs.openai_model,
            suggest_timeout: Duration::from_secs(envs.openai_timeout_secs.unwrap_or(30)),
            confidence_threshold: envs
                .confidence_threshold
                .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD),
        })
    }
}
