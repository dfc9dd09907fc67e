mod config;
mod db;
mod embeddings;
mod errors;
mod interview;
mod jobs;
mod llm_client;
mod models;
mod onboarding;
mod rag;
mod resumes;
mod routes;
mod seed;
mod state;
mod vector_store;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::embeddings::{Embedder, OpenAiEmbedder};
use crate::llm_client::{ChatModel, LlmClient};
use crate::rag::QaChain;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(
    name = "hr-agents-api",
    version,
    about = "HR assistant API: policy Q&A, resume screening, interview tooling"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Index every *.txt policy document into the vector store.
    SeedPolicies {
        /// Directory to read; defaults to DATA_DIR/policies.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let timeout = Duration::from_secs(config.llm_timeout_secs);
    let embedder: Arc<dyn Embedder> = Arc::new(OpenAiEmbedder::new(
        &config.openai_api_key,
        &config.openai_base_url,
        config.embedding_model.clone(),
        timeout,
    )?);
    let vector_store = vector_store::connect(&config, embedder).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::SeedPolicies { dir } => {
            let dir = dir.unwrap_or_else(|| config.policies_dir());
            let count = seed::seed_policies(vector_store.as_ref(), &dir).await?;
            info!("Seeding finished: {count} documents");
            Ok(())
        }
        Command::Serve => serve(config, vector_store).await,
    }
}

async fn serve(config: Config, vector_store: Arc<dyn vector_store::VectorStore>) -> Result<()> {
    info!("Starting HR Agents API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    tokio::fs::create_dir_all(config.resume_dir()).await?;

    let client = LlmClient::new(
        config.openai_api_key.clone(),
        &config.openai_base_url,
        config.chat_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("LLM client initialized (model: {})", client.model());
    let llm: Arc<dyn ChatModel> = Arc::new(client);

    let qa_chain = Arc::new(QaChain::new(vector_store.clone(), llm.clone()));
    let name_recognizer = resumes::names::from_config(config.ner_backend, llm.clone());
    info!("Name recognizer: {:?}", config.ner_backend);

    let state = AppState {
        db,
        llm,
        vector_store,
        qa_chain,
        name_recognizer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
