mod app_state;
mod error;
mod query_payload;
mod rag_response;
mod routes;

use anime_recommender::{load_or_build_store, AnimeRecommender, Settings};
use anyhow::Result;
use app_state::AppState;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        log::error!("Server failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let settings = Settings::load()?;

    let data_path = settings.data_path.clone();
    let store_path = settings.vector_store_path.clone();
    let store = tokio::task::spawn_blocking(move || {
        load_or_build_store(&data_path, store_path.as_deref())
    })
    .await??;

    let recommender = AnimeRecommender::new(Arc::new(store), &settings)?;
    let app = routes::router(AppState::new(recommender, settings.rate_limit_per_minute));

    let listener = tokio::net::TcpListener::bind(&settings.api_address).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
