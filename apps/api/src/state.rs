use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::llm_client::ChatModel;
use crate::rag::QaChain;
use crate::resumes::names::NameRecognizer;
use crate::vector_store::VectorStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every hosted-service dependency is built once in `main` and shared by `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub llm: Arc<dyn ChatModel>,
    pub vector_store: Arc<dyn VectorStore>,
    /// Built at startup; handlers only read it.
    pub qa_chain: Arc<QaChain>,
    /// Pluggable person-name recognizer. Default: heuristic. Swap via NER_BACKEND.
    pub name_recognizer: Arc<dyn NameRecognizer>,
    pub config: Config,
}
