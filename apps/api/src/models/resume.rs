#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A stored resume, written by the resume-builder flow. The matching pipeline
/// only ever reads the latest `raw_text` per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Returns the user's most recently updated resume text, if any.
pub async fn fetch_latest_resume_text(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT raw_text FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| r.0))
}
