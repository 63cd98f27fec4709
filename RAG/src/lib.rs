pub mod data_loader;
pub mod embedding_service;
pub mod error;
pub mod groq_service;
pub mod models;
pub mod prompt_template;
pub mod recommender;
pub mod retriever;
pub mod settings;
pub mod vector_store;

pub use data_loader::AnimeDataLoader;
pub use embedding_service::EmbeddingService;
pub use error::{ConfigError, LlmError, RecommenderError};
pub use groq_service::{GroqService, LlmClient};
pub use models::*;
pub use prompt_template::{PromptRenderer, PromptTemplate};
pub use recommender::AnimeRecommender;
pub use retriever::{Retriever, SimilarityRetriever};
pub use settings::Settings;
pub use vector_store::{InMemoryVectorStore, VectorStore};

use anyhow::Result;
use std::path::Path;

/// Loads the persisted store at `store_path` when it exists, otherwise builds
/// one from the CSV at `data_path` and persists it if a store path was given.
pub fn load_or_build_store(data_path: &Path, store_path: Option<&Path>) -> Result<InMemoryVectorStore> {
    if let Some(path) = store_path {
        if path.exists() {
            return InMemoryVectorStore::load(path);
        }
    }

    let documents = AnimeDataLoader::new().load(data_path)?;
    let store = InMemoryVectorStore::from_documents(documents);

    if let Some(path) = store_path {
        store.save(path)?;
    }
    Ok(store)
}
