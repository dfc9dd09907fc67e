use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::vector_store::{Metadata, VectorStore};

/// Number of indexed documents returned for a job description.
pub const RANKING_TOP_K: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct RankedResume {
    /// `metadata.filename`, or null for documents indexed without one.
    pub filename: Value,
    pub metadata: Metadata,
}

/// Ranks indexed documents by similarity to `jd_text`, best match first.
pub async fn rank_resumes(store: &dyn VectorStore, jd_text: &str) -> Result<Vec<RankedResume>> {
    let results = store
        .similarity_search(jd_text, RANKING_TOP_K)
        .await
        .context("resume similarity search failed")?;
    debug!("ranking returned {} documents", results.len());

    Ok(results
        .into_iter()
        .map(|doc| RankedResume {
            filename: doc.metadata.get("filename").cloned().unwrap_or(Value::Null),
            metadata: doc.metadata,
        })
        .collect())
}
