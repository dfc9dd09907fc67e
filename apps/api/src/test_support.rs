//! Test doubles for the hosted-service seams.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::embeddings::Embedder;
use crate::llm_client::{ChatModel, LlmError, ResponseFormat};
use crate::rag::QaChain;
use crate::resumes::names::HeuristicNameRecognizer;
use crate::state::AppState;
use crate::vector_store::{Document, Metadata, VectorStore};

/// Replies with a fixed text (or a fixed failure) and records every prompt.
pub struct ScriptedChat {
    reply: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedChat {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, prompt: &str, _format: ResponseFormat) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone().map_err(|message| LlmError::Api {
            status: 503,
            message,
        })
    }
}

/// Embeds text as keyword-presence counts over a fixed vocabulary, so
/// similarity is predictable without a hosted model.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, inputs: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(inputs
            .iter()
            .map(|input| {
                let lower = input.to_lowercase();
                self.vocabulary
                    .iter()
                    .map(|word| lower.matches(word.as_str()).count() as f32)
                    .collect()
            })
            .collect())
    }
}

/// In-memory store that records adds and counts searches. Searches return
/// stored documents in insertion order.
#[derive(Default)]
pub struct RecordingStore {
    documents: Mutex<Vec<Document>>,
    searches: AtomicUsize,
    fail_searches: bool,
}

impl RecordingStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Mutex::new(documents),
            ..Default::default()
        }
    }

    pub fn failing_searches() -> Self {
        Self {
            fail_searches: true,
            ..Default::default()
        }
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VectorStore for RecordingStore {
    async fn add(&self, texts: &[String], metadatas: &[Metadata]) -> Result<()> {
        let mut docs = self.documents.lock().unwrap();
        docs.extend(texts.iter().zip(metadatas).map(|(text, metadata)| Document {
            text: text.clone(),
            metadata: metadata.clone(),
        }));
        Ok(())
    }

    async fn similarity_search(&self, _query: &str, k: usize) -> Result<Vec<Document>> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        if self.fail_searches {
            anyhow::bail!("vector index unreachable");
        }
        Ok(self.documents.lock().unwrap().iter().take(k).cloned().collect())
    }
}

/// State wired to an in-memory database and the given doubles.
pub fn test_state(
    db: SqlitePool,
    llm: Arc<ScriptedChat>,
    store: Arc<RecordingStore>,
    data_dir: std::path::PathBuf,
) -> AppState {
    AppState {
        db,
        llm: llm.clone(),
        vector_store: store.clone(),
        qa_chain: Arc::new(QaChain::new(store, llm)),
        name_recognizer: Arc::new(HeuristicNameRecognizer),
        config: Config::for_tests(data_dir),
    }
}
