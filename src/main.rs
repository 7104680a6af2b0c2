use tracing::warn;

mod app;
mod auth;
mod config;
mod error;
mod events;
mod services;
mod state;

use crate::services::event_loader;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skywatch=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;

    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }

    // One-time import so first visitors see data; never blocks startup on the
    // external feed being down.
    event_loader::ensure_events_available(&app_state).await;

    let app = app::build_app(app_state);
    app::serve(app).await
}
