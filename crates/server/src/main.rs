//! HTTP server for content-based movie recommendations.
//!
//! Loads the offline artifacts once, then serves JSON endpoints until
//! interrupted.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use data_loader::Catalog;
use metadata_client::{PosterResolver, TmdbClient};
use pipeline::CategoryTable;
use server::api::{create_router, AppState};
use server::{Config, OrchestratorSettings, RecommendationOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    info!("Starting ReelRecs server on {}", config.bind_addr());

    info!("Loading catalog from {:?}...", config.artifacts_dir);
    let artifacts_dir = config.artifacts_dir.clone();
    let catalog = tokio::task::spawn_blocking(move || Catalog::load_from_dir(&artifacts_dir))
        .await
        .context("Catalog loading task panicked")?
        .with_context(|| format!("Failed to load artifacts from {:?}", config.artifacts_dir))?;
    info!("Catalog loaded: {} movies", catalog.len());

    let categories = match &config.category_table_path {
        Some(path) => CategoryTable::from_json_file(path)
            .with_context(|| format!("Failed to load category table {:?}", path))?,
        None => CategoryTable::default(),
    };

    let tmdb = TmdbClient::new(config.tmdb_api_key.clone(), config.tmdb_api_url.clone());
    let posters = PosterResolver::new(Arc::new(tmdb))
        .with_image_base_url(config.image_base_url.clone())
        .with_placeholder_url(config.placeholder_poster_url.clone());

    let orchestrator = RecommendationOrchestrator::new(
        Arc::new(catalog),
        posters,
        categories,
        OrchestratorSettings {
            page_size: config.page_size,
            recommend_limit: config.recommend_limit,
            suggestion_limit: config.suggestion_limit,
        },
    );
    let app = create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr()))?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
