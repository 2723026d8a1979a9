//! Work submission model and DTO.

use bridgelane_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `submissions` table.
///
/// Exactly one of `by_student_id` / `by_group_id` is set (enforced by a
/// CHECK constraint). `files` is a JSON array of pre-uploaded file
/// references; upload itself happens outside this system.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Submission {
    pub id: DbId,
    pub milestone_id: DbId,
    pub by_student_id: Option<DbId>,
    pub by_group_id: Option<DbId>,
    pub notes: String,
    pub files: serde_json::Value,
    pub submitted_at: Timestamp,
}

/// DTO for `POST /milestones/{id}/submissions`.
#[derive(Debug, Deserialize)]
pub struct CreateSubmission {
    pub by_student_id: Option<DbId>,
    pub by_group_id: Option<DbId>,
    pub notes: String,
    pub files: Vec<String>,
}
