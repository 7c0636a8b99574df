use std::sync::Arc;

use anyhow::Context;

use idea_api::config::AppConfig;
use idea_api::database::{self, repository::PgIdeaRepository};
use idea_api::services::IdeaService;
use idea_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "idea_api=info,tower_http=info".into()),
        )
        .init();

    let config = Arc::new(AppConfig::from_env());
    tracing::info!("Starting Idea API in {:?} mode", config.environment);

    let pool = database::connect(&config.database)
        .await
        .context("failed to connect to record store")?;
    database::ensure_schema(&pool)
        .await
        .context("failed to prepare ideas table")?;

    let store = Arc::new(PgIdeaRepository::new(pool.clone()));
    let state = AppState {
        ideas: IdeaService::new(store),
        config: config.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Idea API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database::close(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}
