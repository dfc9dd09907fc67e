use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An uploaded resume. `parsed_json` holds the serialized extraction result.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub filename: String,
    pub parsed_json: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
