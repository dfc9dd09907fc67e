//! Axum route handlers for resume screening.

use std::path::Path;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::jobs::{create_job, find_job};
use crate::resumes::fields::ExtractionResult;
use crate::resumes::ingest::{insert_resume, parse_and_index};
use crate::resumes::ranking::{rank_resumes, RankedResume};
use crate::routes::extract::{AppForm, AppPath};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub resume_id: i64,
    pub parsed: ExtractionResult,
}

#[derive(Debug, Deserialize)]
pub struct CreateJobForm {
    pub title: String,
    pub jd_text: String,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: i64,
}

#[derive(Debug, Serialize)]
pub struct RankedResponse {
    pub job_id: i64,
    pub ranked: Vec<RankedResume>,
}

struct Upload {
    filename: String,
    data: Bytes,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resumes/upload
///
/// Saves the `file` part under the resume directory, extracts fields, indexes
/// the text and records a row. Uploading the same file twice yields two rows.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_file_part(multipart?).await?;

    let dir = state.config.resume_dir();
    tokio::fs::create_dir_all(&dir).await?;
    let save_path = dir.join(&upload.filename);
    tokio::fs::write(&save_path, &upload.data).await?;

    let parsed = parse_and_index(
        &save_path,
        &upload.filename,
        state.name_recognizer.as_ref(),
        state.vector_store.as_ref(),
    )
    .await?;

    let row = insert_resume(&state.db, &upload.filename, &parsed).await?;
    info!(
        "Stored resume #{} ({}, {} bytes parsed) at {}",
        row.id,
        row.filename,
        row.parsed_json.as_deref().map_or(0, str::len),
        row.uploaded_at
    );

    Ok(Json(UploadResponse {
        status: "ok",
        resume_id: row.id,
        parsed,
    }))
}

/// POST /api/job/create
pub async fn handle_create_job(
    State(state): State<AppState>,
    AppForm(form): AppForm<CreateJobForm>,
) -> Result<Json<CreateJobResponse>, AppError> {
    let job_id = create_job(&state.db, &form.title, &form.jd_text).await?;
    Ok(Json(CreateJobResponse { job_id }))
}

/// GET /api/resumes/:job_id/ranked
///
/// Unknown job ids fail before any embedding or index call.
pub async fn handle_ranked(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<i64>,
) -> Result<Json<RankedResponse>, AppError> {
    let job = find_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("job not found".to_string()))?;

    let ranked = rank_resumes(state.vector_store.as_ref(), &job.jd_text).await?;

    Ok(Json(RankedResponse { job_id, ranked }))
}

async fn read_file_part(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .and_then(safe_filename)
            .ok_or_else(|| AppError::Validation("file has no usable filename".to_string()))?;
        let data = field.bytes().await?;
        return Ok(Upload { filename, data });
    }
    Err(AppError::Validation("file is required".to_string()))
}

/// Keeps only the final path component so uploads cannot escape the resume
/// directory.
fn safe_filename(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
        .map(str::to_string)
}
