//! Policy seeding: indexes every `*.txt` file in a directory as one document
//! tagged with its file name.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

use crate::vector_store::{Metadata, VectorStore};

/// Returns the number of documents added. A missing or empty directory adds
/// nothing and is not an error.
pub async fn seed_policies(store: &dyn VectorStore, dir: &Path) -> Result<usize> {
    let mut paths = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No policy directory at {}", dir.display());
            return Ok(0);
        }
        Err(e) => return Err(e).with_context(|| format!("failed to list {}", dir.display())),
    };
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("txt")
            && entry.file_type().await?.is_file()
        {
            paths.push(path);
        }
    }
    paths.sort();

    let mut texts = Vec::with_capacity(paths.len());
    let mut metadatas = Vec::with_capacity(paths.len());
    for path in &paths {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::String(name));
        texts.push(text);
        metadatas.push(metadata);
    }

    if texts.is_empty() {
        info!("No policy docs found in {}", dir.display());
        return Ok(0);
    }

    store.add(&texts, &metadatas).await?;
    info!("Seeded {} policies into the vector store", texts.len());
    Ok(texts.len())
}
