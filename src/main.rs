use std::sync::Arc;

use anyhow::Context;
use privy::{
    AppState,
    auth::{Blacklist, TokenIssuer},
    config::Config,
    db::SqliteStore,
};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::CorsLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,privy=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("connecting to {}", config.database_url))?;
    let store = SqliteStore::new(db_pool).await?;

    let blacklist = Arc::new(Blacklist::default());
    blacklist.clone().spawn_sweeper(config.blacklist_sweep);

    let app_state = AppState {
        store: Arc::new(store),
        tokens: TokenIssuer::new(config.pkey.as_bytes(), blacklist),
    };

    let app = privy::app(app_state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
