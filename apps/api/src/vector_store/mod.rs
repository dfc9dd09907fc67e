//! Vector Store — one contract, two backends.
//!
//! `add` embeds and stores texts with their metadata; `similarity_search`
//! embeds the query and returns the `k` nearest documents, best first. The
//! similarity metric belongs to the backend. No dedup, re-ranking or caching
//! is layered on top.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::{Config, VectorBackend};
use crate::embeddings::Embedder;

pub mod local;
pub mod pinecone;

pub use local::LocalVectorStore;
pub use pinecone::PineconeStore;

/// Free-form document metadata (`source`, `filename`, `names`, `skills`, ...).
pub type Metadata = Map<String, Value>;

/// A stored text and its metadata as returned by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub metadata: Metadata,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Adds one document per text. `metadatas` pairs with `texts` by position.
    async fn add(&self, texts: &[String], metadatas: &[Metadata]) -> Result<()>;

    /// Returns up to `k` documents ordered from most to least similar.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

/// Opens the backend selected by configuration.
pub async fn connect(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Arc<dyn VectorStore>> {
    match &config.vector_backend {
        VectorBackend::Local { path } => {
            let store = LocalVectorStore::open(path.clone(), embedder).await?;
            info!(
                "Local vector store opened at {} ({} documents)",
                path.display(),
                store.len().await
            );
            Ok(Arc::new(store))
        }
        VectorBackend::Pinecone {
            api_key,
            index_name,
            host,
        } => {
            let store = PineconeStore::connect(
                api_key,
                index_name,
                host.as_deref(),
                embedder,
                std::time::Duration::from_secs(config.llm_timeout_secs),
            )
            .await?;
            info!("Pinecone index '{index_name}' connected");
            Ok(Arc::new(store))
        }
    }
}

fn check_lengths(texts: &[String], metadatas: &[Metadata]) -> Result<()> {
    anyhow::ensure!(
        texts.len() == metadatas.len(),
        "got {} texts but {} metadata entries",
        texts.len(),
        metadatas.len()
    );
    Ok(())
}
