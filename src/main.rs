use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use magpie_api::api::{create_router, AppState};
use magpie_api::config::Config;
use magpie_api::services::explain::{Augmenter, GeminiClient};
use magpie_api::services::identity::IdentityResolver;
use magpie_api::store::{CatalogStore, InteractionLog};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Both tables must load, or the process refuses to serve traffic
    let catalog = CatalogStore::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;
    let interactions = InteractionLog::load(&config.interactions_path).with_context(|| {
        format!(
            "Failed to load interaction log from {}",
            config.interactions_path
        )
    })?;

    tracing::info!(
        products = catalog.len(),
        interactions = interactions.len(),
        profiles = config.profile_count,
        "Loaded recommendation data"
    );

    let generation_client = GeminiClient::new(
        config.generation_api_key.clone(),
        config.generation_api_url.clone(),
        config.generation_model.clone(),
        Duration::from_secs(config.explain_timeout_secs),
    )
    .context("Failed to build generation client")?;

    let state = AppState::new(
        catalog,
        interactions,
        IdentityResolver::new(config.profile_count, config.profile_id_start),
        Augmenter::new(Arc::new(generation_client), config.explanation_mode),
        config.cookie_secure,
    );

    // The frontend sends the identity cookie cross-origin
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .frontend_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid frontend origin {}", config.frontend_origin))?,
        )
        .allow_methods([Method::GET])
        .allow_credentials(true);

    let app = create_router(state).layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
