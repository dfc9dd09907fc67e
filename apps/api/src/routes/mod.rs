pub mod extract;
pub mod health;
pub mod ui;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{interview, onboarding, rag, resumes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::home_handler))
        .route("/health", get(health::health_handler))
        .route("/ui", get(ui::ui_handler))
        // HR assistant
        .route("/api/hr/ask", post(rag::handlers::handle_ask))
        // Resume screening
        .route("/api/resumes/upload", post(resumes::handlers::handle_upload))
        .route("/api/job/create", post(resumes::handlers::handle_create_job))
        .route(
            "/api/resumes/:job_id/ranked",
            get(resumes::handlers::handle_ranked),
        )
        // Interview
        .route(
            "/api/interview/generate",
            post(interview::handlers::handle_generate),
        )
        .route(
            "/api/interview/evaluate",
            post(interview::handlers::handle_evaluate),
        )
        // Onboarding
        .route("/api/onboarding/start", post(onboarding::handle_start))
        .with_state(state)
}
