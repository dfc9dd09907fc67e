//! Onboarding kickoff. The plan is a fixed checklist, not computed per role.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::routes::extract::AppForm;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingTask {
    pub task: &'static str,
    pub due: &'static str,
}

pub const STANDARD_PLAN: [OnboardingTask; 3] = [
    OnboardingTask {
        task: "Submit ID proof",
        due: "Day 1",
    },
    OnboardingTask {
        task: "Complete benefits enrollment",
        due: "Day 3",
    },
    OnboardingTask {
        task: "Complete security training",
        due: "Day 7",
    },
];

#[derive(Debug, Deserialize)]
pub struct OnboardingForm {
    pub newhire_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub newhire: String,
    pub role: String,
    pub plan: Vec<OnboardingTask>,
}

/// POST /api/onboarding/start
pub async fn handle_start(
    AppForm(form): AppForm<OnboardingForm>,
) -> Result<Json<OnboardingResponse>, AppError> {
    Ok(Json(OnboardingResponse {
        newhire: form.newhire_name,
        role: form.role,
        plan: STANDARD_PLAN.to_vec(),
    }))
}
