//! Question-Answering Chain — retrieve the top policy documents for a
//! question, stuff them into one prompt, return the model's answer.
//!
//! Built once in `main` and shared through `AppState`. Any failure inside the
//! chain degrades to `FALLBACK_ANSWER`; sources are not returned.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::llm_client::{ChatModel, ResponseFormat};
use crate::vector_store::{Document, VectorStore};

pub mod handlers;
pub mod prompts;

use prompts::STUFF_QA_PROMPT;

/// Documents retrieved per question.
pub const QA_TOP_K: usize = 3;

pub const FALLBACK_ANSWER: &str = "Sorry, I couldn't find any HR information.";

pub struct QaChain {
    retriever: Arc<dyn VectorStore>,
    llm: Arc<dyn ChatModel>,
    top_k: usize,
}

impl QaChain {
    pub fn new(retriever: Arc<dyn VectorStore>, llm: Arc<dyn ChatModel>) -> Self {
        Self {
            retriever,
            llm,
            top_k: QA_TOP_K,
        }
    }

    /// Answers `question` from the indexed documents. Never fails.
    pub async fn answer(&self, question: &str) -> String {
        match self.run(question).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("QA chain failed, returning fallback: {e:#}");
                FALLBACK_ANSWER.to_string()
            }
        }
    }

    async fn run(&self, question: &str) -> Result<String> {
        let documents = self
            .retriever
            .similarity_search(question, self.top_k)
            .await
            .context("retrieval failed")?;
        debug!("QA retrieved {} documents", documents.len());

        let prompt = build_stuff_prompt(&documents, question);
        let answer = self
            .llm
            .complete(&prompt, ResponseFormat::Text)
            .await
            .context("completion failed")?;
        Ok(answer.trim().to_string())
    }
}

fn build_stuff_prompt(documents: &[Document], question: &str) -> String {
    let context = documents
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    STUFF_QA_PROMPT
        .replace("{context}", &context)
        .replace("{question}", question)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingStore, ScriptedChat};
    use crate::vector_store::Metadata;

    fn policy(text: &str) -> Document {
        Document {
            text: text.to_string(),
            metadata: Metadata::new(),
        }
    }

    #[test]
    fn test_prompt_stuffs_all_documents() {
        let prompt = build_stuff_prompt(
            &[policy("Leave: 20 days"), policy("Remote: 2 days a week")],
            "How much leave do I get?",
        );
        assert!(prompt.contains("Leave: 20 days\n\nRemote: 2 days a week"));
        assert!(prompt.contains("Question: How much leave do I get?"));
    }

    #[tokio::test]
    async fn test_answer_uses_top_three_documents() {
        let store = Arc::new(RecordingStore::with_documents(vec![
            policy("doc one"),
            policy("doc two"),
            policy("doc three"),
            policy("doc four"),
        ]));
        let chat = Arc::new(ScriptedChat::replying("  You get 20 days.  "));
        let chain = QaChain::new(store.clone(), chat.clone());

        let answer = chain.answer("How much leave?").await;
        assert_eq!(answer, "You get 20 days.");

        let prompt = &chat.prompts()[0];
        assert!(prompt.contains("doc three"));
        assert!(!prompt.contains("doc four"));
        assert_eq!(store.search_count(), 1);
    }

    #[tokio::test]
    async fn test_retrieval_failure_falls_back() {
        let store = Arc::new(RecordingStore::failing_searches());
        let chat = Arc::new(ScriptedChat::replying("unused"));
        let chain = QaChain::new(store, chat.clone());

        assert_eq!(chain.answer("anything").await, FALLBACK_ANSWER);
        assert!(chat.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_falls_back() {
        let store = Arc::new(RecordingStore::with_documents(vec![policy("doc")]));
        let chat = Arc::new(ScriptedChat::failing("quota exceeded"));
        let chain = QaChain::new(store, chat);

        assert_eq!(chain.answer("anything").await, FALLBACK_ANSWER);
    }
}
