use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Employment type carried on every posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Freelance,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Freelance => "freelance",
        }
    }
}

/// A job advertisement, as submitted by the scraping trigger and stored in
/// `job_postings`. Postings are never hard-deleted — `is_active = false`
/// retires them from re-indexing. View/application counters live on the row
/// but are mutated by the listing endpoints, not by this pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPosting {
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub url: String,
    pub is_remote: bool,
    pub job_type: JobType,
    pub salary_range: Option<String>,
    pub skills: Option<Vec<String>>,
    pub posted_at: DateTime<Utc>,
}

impl JobPosting {
    /// Concatenates the posting's textual fields into the single document the
    /// chunker consumes. Optional fields collapse to nothing rather than
    /// rendering null placeholders.
    pub fn to_document(&self) -> String {
        let skills = self.skills.as_deref().unwrap_or_default().join(", ");
        let mut parts: Vec<&str> = Vec::new();
        for part in [
            self.title.as_str(),
            self.company.as_str(),
            self.location.as_str(),
            self.description.as_str(),
            self.salary_range.as_deref().unwrap_or_default(),
            skills.as_str(),
        ] {
            if !part.trim().is_empty() {
                parts.push(part);
            }
        }
        parts.join("\n")
    }
}

/// Inserts new postings and refreshes already-known ones, keyed by
/// `external_id`. Existing rows keep their counters and active flag.
pub async fn upsert_postings(pool: &PgPool, postings: &[JobPosting]) -> Result<(), sqlx::Error> {
    for posting in postings {
        sqlx::query(
            r#"
            INSERT INTO job_postings
                (external_id, title, company, location, description, url,
                 is_remote, job_type, salary_range, skills, posted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (external_id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                description = EXCLUDED.description,
                url = EXCLUDED.url,
                is_remote = EXCLUDED.is_remote,
                job_type = EXCLUDED.job_type,
                salary_range = EXCLUDED.salary_range,
                skills = EXCLUDED.skills,
                posted_at = EXCLUDED.posted_at,
                updated_at = now()
            "#,
        )
        .bind(&posting.external_id)
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.description)
        .bind(&posting.url)
        .bind(posting.is_remote)
        .bind(posting.job_type)
        .bind(&posting.salary_range)
        .bind(&posting.skills)
        .bind(posting.posted_at)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Loads every active posting for re-indexing.
pub async fn fetch_active_postings(pool: &PgPool) -> Result<Vec<JobPosting>, sqlx::Error> {
    sqlx::query_as::<_, JobPosting>(
        r#"
        SELECT external_id, title, company, location, description, url,
               is_remote, job_type, salary_range, skills, posted_at
        FROM job_postings
        WHERE is_active
        ORDER BY posted_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}
