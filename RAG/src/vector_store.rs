use crate::embedding_service::{cosine_similarity, EmbeddingService};
use crate::models::{AnimeDocument, RetrievedDocument};
use crate::retriever::SimilarityRetriever;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Document index that supports similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Up to `k` documents, most similar first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreEntry {
    document: AnimeDocument,
    embedding: Vec<f32>,
}

/// Vector store kept entirely in memory, optionally persisted as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryVectorStore {
    embedder: EmbeddingService,
    entries: Vec<StoreEntry>,
}

impl InMemoryVectorStore {
    pub fn from_documents(documents: Vec<AnimeDocument>) -> Self {
        let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
        let embedder = EmbeddingService::fit(&texts);
        let embeddings = embedder.embed_batch(&texts);

        let entries = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| StoreEntry {
                document,
                embedding,
            })
            .collect::<Vec<_>>();

        log::info!("Vector store built with {} documents", entries.len());
        Self { embedder, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, query: &str, k: usize) -> Vec<RetrievedDocument> {
        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<(&StoreEntry, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();

        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(entry, score)| RetrievedDocument {
                title: entry.document.title.clone(),
                content: entry.document.content.clone(),
                score,
            })
            .collect()
    }

    /// Wraps the store as a retriever returning the top `k` matches.
    pub fn as_retriever(self: Arc<Self>, k: usize) -> SimilarityRetriever {
        SimilarityRetriever::new(self, k)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_vec(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write vector store to {}", path.display()))?;
        log::info!("Vector store persisted to {}", path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read vector store from {}", path.display()))?;
        let store: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("corrupt vector store at {}", path.display()))?;
        log::info!("Loaded vector store with {} documents from {}", store.len(), path.display());
        Ok(store)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<RetrievedDocument>> {
        Ok(self.search(query, k))
    }
}
