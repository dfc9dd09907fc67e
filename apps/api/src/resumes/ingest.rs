use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::resume::ResumeRow;
use crate::resumes::document::extract_text;
use crate::resumes::fields::{extract_fields, ExtractionResult};
use crate::resumes::names::NameRecognizer;
use crate::vector_store::{Metadata, VectorStore};

/// Extracts text and fields from a saved resume and indexes it as one
/// document whose metadata carries the filename, names and skills.
pub async fn parse_and_index(
    path: &Path,
    filename: &str,
    recognizer: &dyn NameRecognizer,
    store: &dyn VectorStore,
) -> Result<ExtractionResult> {
    let text = extract_text(path).await?;
    let names = recognizer.recognize(&text).await?;
    let parsed = extract_fields(&text, names);

    store
        .add(&[parsed.raw.clone()], &[index_metadata(filename, &parsed)])
        .await
        .context("failed to index resume")?;

    info!(
        "Indexed resume {filename}: {} names, {} skills",
        parsed.names.len(),
        parsed.skills.len()
    );
    Ok(parsed)
}

fn index_metadata(filename: &str, parsed: &ExtractionResult) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("filename".to_string(), Value::String(filename.to_string()));
    metadata.insert("names".to_string(), json!(parsed.names));
    metadata.insert("skills".to_string(), json!(parsed.skills));
    metadata
}

/// Inserts a resume row and returns it as stored. Rows are never deduplicated.
pub async fn insert_resume(
    pool: &SqlitePool,
    filename: &str,
    parsed: &ExtractionResult,
) -> Result<ResumeRow> {
    let parsed_json = serde_json::to_string(parsed)?;
    let row = sqlx::query_as::<_, ResumeRow>(
        "INSERT INTO resumes (filename, parsed_json, uploaded_at) VALUES (?, ?, ?) \
         RETURNING id, filename, parsed_json, uploaded_at",
    )
    .bind(filename)
    .bind(parsed_json)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(row)
}
