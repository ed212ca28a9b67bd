mod app;
mod auth;
mod config;
mod db;
mod errors;
mod follows;
mod memory;
mod state;
mod timeline;
mod tweets;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "minitweet=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        storage = ?config.storage,
        include_own = config.timeline_include_own,
        "configuration loaded"
    );

    let app_state = AppState::init(config).await?;
    app::serve(app::build_app(app_state)).await
}
