//! Repository for the `submissions` table.
//!
//! Submissions are inserted by [`MilestoneRepo::submit`] inside the
//! submission transaction; this repository only reads.
//!
//! [`MilestoneRepo::submit`]: crate::repositories::MilestoneRepo::submit

use bridgelane_core::types::DbId;
use sqlx::PgPool;

use crate::models::submission::Submission;

/// Column list for submission queries.
pub(crate) const SUBMISSION_COLUMNS: &str =
    "id, milestone_id, by_student_id, by_group_id, notes, files, submitted_at";

/// Read access to work submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// List a milestone's submissions, newest first.
    pub async fn list_by_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE milestone_id = $1
             ORDER BY submitted_at DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// The latest submission for a milestone, if any.
    pub async fn find_latest(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions
             WHERE milestone_id = $1
             ORDER BY submitted_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(milestone_id)
            .fetch_optional(pool)
            .await
    }
}
