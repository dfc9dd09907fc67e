use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::routes::extract::AppForm;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

/// POST /api/hr/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    AppForm(form): AppForm<AskForm>,
) -> Result<Json<AskResponse>, AppError> {
    let answer = state.qa_chain.answer(&form.question).await;
    Ok(Json(AskResponse { answer }))
}
