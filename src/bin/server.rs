use std::sync::Arc;

use anyhow::Context;
use trivia_api::db::{self, SqliteStore};
use trivia_api::server::app::{run_server, AppState};
use trivia_api::settings::Settings;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load().context("Failed to load settings")?;

    let pool = db::establish_connection(&settings.db_path)
        .await
        .with_context(|| format!("Cannot open database {}", settings.db_path.display()))?;
    tracing::info!("Running db migrations...");
    db::run_migrations(&pool).await?;

    let state = AppState::new(Arc::new(SqliteStore::new(pool)));
    run_server(&settings, state).await
}
