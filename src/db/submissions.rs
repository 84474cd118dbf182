//! Repository for the `contact_submissions` table.

use chrono::Utc;
use sqlx::Row;

use crate::db::client::{Database, DbError};
use crate::i18n::Lang;

/// Workflow status of a submission. New rows always start as `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionStatus {
    #[default]
    New,
    InProgress,
    Closed,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::New => "new",
            SubmissionStatus::InProgress => "in_progress",
            SubmissionStatus::Closed => "closed",
        }
    }
}

/// Handling priority. New rows always start as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPriority {
    #[default]
    Normal,
    High,
}

impl SubmissionPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionPriority::Normal => "normal",
            SubmissionPriority::High => "high",
        }
    }
}

/// A contact form submission ready to persist.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub name: String,
    pub email: String,
    pub company: String,
    pub phone: String,
    pub service: String,
    pub other_service: Option<String>,
    pub quantity: String,
    pub message: String,
    pub language: Lang,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub status: SubmissionStatus,
    pub priority: SubmissionPriority,
}

/// A persisted submission, as read back for tests and admin tooling.
#[derive(Debug, Clone)]
pub struct SubmissionRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub company: String,
    pub status: String,
    pub priority: String,
    pub created_at: String,
}

/// Insert a submission and return its row id.
pub async fn insert_submission(db: &Database, submission: &NewSubmission) -> Result<i64, DbError> {
    let created_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let result = db
        .execute(
            sqlx::query(
                "INSERT INTO contact_submissions
                    (name, email, company, phone, service, other_service, quantity,
                     message, language, ip_address, user_agent, status, priority, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&submission.name)
            .bind(&submission.email)
            .bind(&submission.company)
            .bind(&submission.phone)
            .bind(&submission.service)
            .bind(submission.other_service.as_deref())
            .bind(&submission.quantity)
            .bind(&submission.message)
            .bind(submission.language.code())
            .bind(&submission.ip_address)
            .bind(submission.user_agent.as_deref())
            .bind(submission.status.as_str())
            .bind(submission.priority.as_str())
            .bind(&created_at),
        )
        .await?;

    // Both MySQL and SQLite report the generated id through the Any driver.
    result
        .last_insert_id()
        .ok_or(sqlx::Error::RowNotFound)
        .map_err(DbError::from)
}

/// Total number of stored submissions.
pub async fn count_submissions(db: &Database) -> Result<i64, DbError> {
    let row = db
        .fetch_optional(sqlx::query("SELECT COUNT(*) FROM contact_submissions"))
        .await?;
    Ok(row.map(|r| r.get::<i64, _>(0)).unwrap_or(0))
}

/// Most recent submissions, newest first.
pub async fn fetch_recent(db: &Database, limit: i64) -> Result<Vec<SubmissionRow>, DbError> {
    let rows = db
        .fetch_all(
            sqlx::query(
                "SELECT id, name, email, company, status, priority, created_at
                 FROM contact_submissions ORDER BY id DESC LIMIT ?",
            )
            .bind(limit),
        )
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| SubmissionRow {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            company: row.get("company"),
            status: row.get("status"),
            priority: row.get("priority"),
            created_at: row.get("created_at"),
        })
        .collect())
}
