use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_INDEX_NAME: &str = "hr-index";

/// Which vector index backs resume and policy retrieval.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorBackend {
    /// JSON file under `DATA_DIR/vectors`.
    Local { path: PathBuf },
    /// Hosted Pinecone index. `host` is resolved through the control plane when unset.
    Pinecone {
        api_key: String,
        index_name: String,
        host: Option<String>,
    },
}

/// Person-name recognizer used by the field extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NerBackend {
    Heuristic,
    Llm,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub vector_backend: VectorBackend,
    pub ner_backend: NerBackend,
    pub data_dir: PathBuf,
    pub llm_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = PathBuf::from(env_or("DATA_DIR", "./data"));

        let use_pinecone = env_or("USE_PINECONE", "false").eq_ignore_ascii_case("true");
        let pinecone_key = std::env::var("PINECONE_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let vector_backend = match (use_pinecone, pinecone_key) {
            (true, Some(api_key)) => VectorBackend::Pinecone {
                api_key,
                index_name: env_or("VECTOR_INDEX_NAME", DEFAULT_INDEX_NAME),
                host: std::env::var("PINECONE_INDEX_HOST").ok(),
            },
            _ => VectorBackend::Local {
                path: data_dir.join("vectors").join("store.json"),
            },
        };

        let ner_backend = match env_or("NER_BACKEND", "heuristic").to_lowercase().as_str() {
            "heuristic" => NerBackend::Heuristic,
            "llm" => NerBackend::Llm,
            other => anyhow::bail!("NER_BACKEND must be 'heuristic' or 'llm', got '{other}'"),
        };

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://hr_agents.db"),
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            chat_model: env_or("CHAT_MODEL", DEFAULT_CHAT_MODEL),
            embedding_model: env_or("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            vector_backend,
            ner_backend,
            data_dir,
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// Directory uploaded resume files are written to.
    pub fn resume_dir(&self) -> PathBuf {
        self.data_dir.join("resumes")
    }

    /// Directory `seed-policies` reads `*.txt` files from.
    pub fn policies_dir(&self) -> PathBuf {
        self.data_dir.join("policies")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
impl Config {
    /// Config rooted at `data_dir` with no real credentials.
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            openai_api_key: "test-key".to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            vector_backend: VectorBackend::Local {
                path: data_dir.join("vectors").join("store.json"),
            },
            ner_backend: NerBackend::Heuristic,
            data_dir,
            llm_timeout_secs: 5,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_subdirectories() {
        let config = Config::for_tests(PathBuf::from("/srv/hr"));
        assert_eq!(config.resume_dir(), PathBuf::from("/srv/hr/resumes"));
        assert_eq!(config.policies_dir(), PathBuf::from("/srv/hr/policies"));
    }
}
