// Resume screening: text extraction, field extraction, indexing and ranking.
// Hosted calls go through the ChatModel / VectorStore seams in AppState.

pub mod document;
pub mod fields;
pub mod handlers;
pub mod ingest;
pub mod names;
pub mod prompts;
pub mod ranking;
