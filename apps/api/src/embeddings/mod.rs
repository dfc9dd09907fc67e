//! Embedding seam. Every `add` and every `similarity_search` re-embeds its
//! text through an `Embedder`; nothing is cached.

use anyhow::Result;
use async_trait::async_trait;

pub mod openai;

pub use openai::OpenAiEmbedder;

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Returns one vector per input, in input order.
    async fn embed(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>>;

    async fn embed_one(&self, input: &str) -> Result<Vec<f32>> {
        self.embed(&[input])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}
