use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::{evaluate_answer, generate_questions, Evaluation, DEFAULT_QUESTION_COUNT};
use crate::routes::extract::AppForm;
use crate::state::AppState;

const DEFAULT_COMPETENCIES: &[&str] = &["problem solving", "communication"];

fn default_level() -> String {
    "mid".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub title: String,
    #[serde(default = "default_level")]
    pub level: String,
    /// Comma-separated.
    #[serde(default)]
    pub competencies: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateForm {
    pub answer_text: String,
    /// Pipe-separated.
    pub reference_points: String,
}

/// POST /api/interview/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    AppForm(form): AppForm<GenerateForm>,
) -> Result<Json<GenerateResponse>, AppError> {
    let competencies = split_competencies(&form.competencies);
    let questions = generate_questions(
        state.llm.as_ref(),
        &form.title,
        &form.level,
        &competencies,
        DEFAULT_QUESTION_COUNT,
    )
    .await?;
    Ok(Json(GenerateResponse { questions }))
}

/// POST /api/interview/evaluate
pub async fn handle_evaluate(
    State(state): State<AppState>,
    AppForm(form): AppForm<EvaluateForm>,
) -> Result<Json<Evaluation>, AppError> {
    let references: Vec<String> = form
        .reference_points
        .split('|')
        .map(|r| r.trim().to_string())
        .collect();
    let evaluation = evaluate_answer(state.llm.as_ref(), &form.answer_text, &references).await?;
    Ok(Json(evaluation))
}

fn split_competencies(raw: &str) -> Vec<String> {
    let parsed: Vec<String> = raw
        .split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();
    if parsed.is_empty() {
        DEFAULT_COMPETENCIES.iter().map(|c| c.to_string()).collect()
    } else {
        parsed
    }
}
