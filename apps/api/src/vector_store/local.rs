//! File-backed vector store. The whole index is a JSON file on disk, which
//! stays authoritative: other processes (`seed-policies`) may append to the
//! same file while the server runs. `add` reloads the file under the write
//! lock before appending, and searches reload it whenever its modification
//! time moves.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{check_lengths, Document, Metadata, VectorStore};
use crate::embeddings::Embedder;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEntry {
    id: Uuid,
    text: String,
    metadata: Metadata,
    embedding: Vec<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: Vec<StoredEntry>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    entries: &'a [StoredEntry],
}

/// In-memory copy of the file and the modification time it was read at.
#[derive(Default)]
struct Snapshot {
    entries: Vec<StoredEntry>,
    modified: Option<SystemTime>,
}

pub struct LocalVectorStore {
    path: PathBuf,
    embedder: Arc<dyn Embedder>,
    snapshot: RwLock<Snapshot>,
}

impl LocalVectorStore {
    /// Loads the store at `path`, starting empty when the file does not exist yet.
    pub async fn open(path: PathBuf, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let snapshot = load(&path).await?;
        Ok(Self {
            path,
            embedder,
            snapshot: RwLock::new(snapshot),
        })
    }

    pub async fn len(&self) -> usize {
        self.snapshot.read().await.entries.len()
    }

    /// Re-reads the file if another writer has replaced it since the last load.
    async fn refresh(&self) -> Result<()> {
        let on_disk = modified_at(&self.path).await?;
        if self.snapshot.read().await.modified == on_disk {
            return Ok(());
        }
        let mut snapshot = self.snapshot.write().await;
        if snapshot.modified != on_disk {
            *snapshot = load(&self.path).await?;
            debug!(
                "reloaded {} ({} documents)",
                self.path.display(),
                snapshot.entries.len()
            );
        }
        Ok(())
    }

    async fn persist(&self, entries: &[StoredEntry]) -> Result<Option<SystemTime>> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let body = serde_json::to_vec(&StoreFileRef { entries })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        modified_at(&self.path).await
    }
}

async fn modified_at(path: &Path) -> Result<Option<SystemTime>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta.modified()?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to stat {}", path.display())),
    }
}

async fn load(path: &Path) -> Result<Snapshot> {
    let modified = modified_at(path).await?;
    let entries = match tokio::fs::read(path).await {
        Ok(bytes) => {
            let file: StoreFile = serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt vector store {}", path.display()))?;
            file.entries
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    Ok(Snapshot { entries, modified })
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn add(&self, texts: &[String], metadatas: &[Metadata]) -> Result<()> {
        check_lengths(texts, metadatas)?;
        if texts.is_empty() {
            return Ok(());
        }

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.embedder.embed(&inputs).await?;

        let mut snapshot = self.snapshot.write().await;
        let mut entries = load(&self.path).await?.entries;
        entries.extend(
            texts
                .iter()
                .zip(metadatas)
                .zip(embeddings)
                .map(|((text, metadata), embedding)| StoredEntry {
                    id: Uuid::new_v4(),
                    text: text.clone(),
                    metadata: metadata.clone(),
                    embedding,
                }),
        );
        // Memory only changes once the file has been replaced.
        let modified = self.persist(&entries).await?;
        *snapshot = Snapshot { entries, modified };
        debug!("local store now holds {} documents", snapshot.entries.len());
        Ok(())
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        let query_vec = self.embedder.embed_one(query).await?;
        self.refresh().await?;
        let snapshot = self.snapshot.read().await;

        let mut scored: Vec<(f32, &StoredEntry)> = snapshot
            .entries
            .iter()
            .map(|e| (cosine_similarity(&query_vec, &e.embedding), e))
            .collect();
        // Stable sort keeps insertion order among equal scores.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, e)| Document {
                text: e.text.clone(),
                metadata: e.metadata.clone(),
            })
            .collect())
    }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude or the
/// lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::KeywordEmbedder;
    use serde_json::json;

    fn meta(value: serde_json::Value) -> Metadata {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(
            dir.path().join("store.json"),
            Arc::new(KeywordEmbedder::new(&["leave", "benefits", "security"])),
        )
        .await
        .unwrap();

        store
            .add(
                &[
                    "Annual leave is 20 days".to_string(),
                    "Benefits enrollment closes in March".to_string(),
                    "Security training is mandatory".to_string(),
                ],
                &[
                    meta(json!({"source": "leave.txt"})),
                    meta(json!({"source": "benefits.txt"})),
                    meta(json!({"source": "security.txt"})),
                ],
            )
            .await
            .unwrap();

        let results = store.similarity_search("how much leave", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].metadata["source"], "leave.txt");
    }

    #[tokio::test]
    async fn test_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors").join("store.json");
        let embedder = Arc::new(KeywordEmbedder::new(&["python"]));

        let store = LocalVectorStore::open(path.clone(), embedder.clone())
            .await
            .unwrap();
        store
            .add(
                &["python developer".to_string()],
                &[meta(json!({"filename": "a.txt"}))],
            )
            .await
            .unwrap();

        let reopened = LocalVectorStore::open(path, embedder).await.unwrap();
        assert_eq!(reopened.len().await, 1);
        let results = reopened.similarity_search("python", 5).await.unwrap();
        assert_eq!(results[0].text, "python developer");
    }

    #[tokio::test]
    async fn test_duplicate_adds_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(
            dir.path().join("store.json"),
            Arc::new(KeywordEmbedder::new(&["java"])),
        )
        .await
        .unwrap();
        let texts = ["java".to_string()];
        let metas = [meta(json!({"filename": "cv.txt"}))];
        store.add(&texts, &metas).await.unwrap();
        store.add(&texts, &metas).await.unwrap();
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_mismatched_metadata_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalVectorStore::open(
            dir.path().join("store.json"),
            Arc::new(KeywordEmbedder::new(&["java"])),
        )
        .await
        .unwrap();
        let err = store.add(&["java".to_string()], &[]).await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn test_two_handles_on_one_file_keep_each_others_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let embedder = Arc::new(KeywordEmbedder::new(&["leave", "java"]));

        let server = LocalVectorStore::open(path.clone(), embedder.clone())
            .await
            .unwrap();
        let seeder = LocalVectorStore::open(path.clone(), embedder.clone())
            .await
            .unwrap();

        seeder
            .add(
                &["Annual leave is 20 days".to_string()],
                &[meta(json!({"source": "leave.txt"}))],
            )
            .await
            .unwrap();

        let seen = server.similarity_search("leave", 5).await.unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].metadata["source"], "leave.txt");

        server
            .add(
                &["java developer".to_string()],
                &[meta(json!({"filename": "cv.txt"}))],
            )
            .await
            .unwrap();

        let reopened = LocalVectorStore::open(path, embedder).await.unwrap();
        assert_eq!(reopened.len().await, 2);
        let texts: Vec<_> = reopened
            .similarity_search("leave", 5)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.text)
            .collect();
        assert!(texts.contains(&"Annual leave is 20 days".to_string()));
        assert!(texts.contains(&"java developer".to_string()));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = LocalVectorStore::open(
            path.clone(),
            Arc::new(KeywordEmbedder::new(&["java", "python"])),
        )
        .await
        .unwrap();
        store
            .add(
                &["java developer".to_string()],
                &[meta(json!({"filename": "a.txt"}))],
            )
            .await
            .unwrap();

        // A directory squatting on the temp file name makes the write fail.
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();
        let result = store
            .add(
                &["python developer".to_string()],
                &[meta(json!({"filename": "b.txt"}))],
            )
            .await;
        assert!(result.is_err());

        assert_eq!(store.len().await, 1);
        let results = store.similarity_search("python", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].text, "java developer");
    }
}
