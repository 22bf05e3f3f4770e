use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use gated_items::config::Config;
use gated_items::flags::{FlagClient, HttpTransport};
use gated_items::items::PgItemStore;
use gated_items::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let db = PgPool::connect(&config.database_url)
        .await
        .context("Error connecting DB")?;

    sqlx::migrate!()
        .run(&db)
        .await
        .context("Error running migrations")?;

    let transport = HttpTransport::new(
        &config.flag_service_url,
        &config.flag_namespace,
        config.flag_timeout,
    )
    .context("Error building flag service client")?;

    let state = AppState {
        store: Arc::new(PgItemStore::new(db)),
        flags: FlagClient::new(Arc::new(transport)),
    };

    let app = gated_items::build_router(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    tracing::info!(
        addr = %config.addr(),
        flag_service = %config.flag_service_url,
        "server is chilling"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
