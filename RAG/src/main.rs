//! Builds the vector store from the anime CSV and writes it to disk so the
//! API server can start without re-embedding the dataset.

use anime_recommender::{load_or_build_store, settings::DEFAULT_DATA_PATH};
use anyhow::Result;
use std::path::PathBuf;

const DEFAULT_STORE_PATH: &str = "data/vector_store.json";

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let data_path = std::env::var("ANIME_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));
    let store_path = std::env::var("VECTOR_STORE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORE_PATH));

    if store_path.exists() {
        std::fs::remove_file(&store_path)?;
        log::info!("Removed stale store at {}", store_path.display());
    }

    let store = load_or_build_store(&data_path, Some(store_path.as_path()))?;
    println!(
        "Indexed {} anime into {}",
        store.len(),
        store_path.display()
    );
    Ok(())
}
