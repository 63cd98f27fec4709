use crate::models::RetrievedDocument;
use crate::vector_store::VectorStore;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// First pipeline stage: query in, ranked documents out.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>>;
}

/// Retriever backed by a vector store's similarity search.
#[derive(Clone)]
pub struct SimilarityRetriever {
    store: Arc<dyn VectorStore>,
    k: usize,
}

impl SimilarityRetriever {
    pub fn new(store: Arc<dyn VectorStore>, k: usize) -> Self {
        Self { store, k }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

#[async_trait]
impl Retriever for SimilarityRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        let documents = self.store.similarity_search(query, self.k).await?;
        log::info!("Retrieved {} documents", documents.len());
        Ok(documents)
    }
}
