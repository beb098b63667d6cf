use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use centimo_server::{routes, AppState, Config};
use centimo_storage::create_db;
use centimo_suggest::OpenAiClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::new().context("error creating config")?;

    let db = create_db(&config.database_path)
        .await
        .with_context(|| format!("error opening {}", config.database_path.display()))?;

    let suggester = match &config.openai_api_key {
        Some(key) => {
            let model = config
                .openai_model
                .clone()
                .unwrap_or_else(|| "gpt-4.1-nano".to_string());
            Some(
                OpenAiClient::with_options(key, model, config.suggest_timeout)
                    .context("error creating suggestion client")?,
            )
        }
        None => {
            info!("no API key configured, AI categorization disabled");
            None
        }
    };

    let state = Arc::new(AppState {
        db,
        suggester,
        confidence_threshold: config.confidence_threshold,
    });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("error binding {addr}"))?;
    info!("listening on {addr}");

    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}
