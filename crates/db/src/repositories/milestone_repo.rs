//! Repository for the `milestones` table.
//!
//! Every lifecycle transition is a compare-and-set UPDATE keyed on the
//! current status (and, for submission, the escrow gate). Submission and
//! completion are multi-table operations and run inside a transaction.

use bridgelane_core::milestone::{
    ESCROW_FUNDED, ESCROW_RELEASED, STATUS_CHANGES_REQUESTED, STATUS_COMPLETED,
    STATUS_FINALIZED, STATUS_IN_PROGRESS, STATUS_RELEASED, STATUS_SUBMITTED,
    STATUS_SUPERVISOR_REVIEW,
};
use bridgelane_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bridgelane_core::types::DbId;
use sqlx::PgPool;

use crate::models::milestone::{CompleteMilestone, Milestone, MilestoneListQuery};
use crate::models::submission::{CreateSubmission, Submission};
use crate::repositories::submission_repo::SUBMISSION_COLUMNS;

/// Column list for milestone queries. Shared with the finalize transaction
/// in the proposal repository.
pub(crate) const MILESTONE_COLUMNS: &str =
    "id, proposal_id, project_id, finalized_by, title, scope, acceptance_criteria, \
     due_date, amount, escrow_status, supervisor_gate, status, readiness, review_notes, \
     completed_at, created_at, updated_at";

/// Provides read and lifecycle operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Find a milestone by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {MILESTONE_COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List milestones, optionally filtered by project and status, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &MilestoneListQuery,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {MILESTONE_COLUMNS} FROM milestones
             WHERE ($1::bigint IS NULL OR project_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(params.project_id)
            .bind(params.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Begin work: compare-and-set `finalized -> in_progress`.
    pub async fn start(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET status = '{STATUS_IN_PROGRESS}', updated_at = now()
             WHERE id = $1 AND status = '{STATUS_FINALIZED}'
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record a submission and advance the milestone to `submitted`, in one
    /// transaction.
    ///
    /// The UPDATE requires a submittable status with funded escrow, so a
    /// stale caller (or one racing the escrow signal) observes `None` and
    /// nothing is written.
    pub async fn submit(
        pool: &PgPool,
        id: DbId,
        input: &CreateSubmission,
    ) -> Result<Option<(Milestone, Submission)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE milestones SET status = '{STATUS_SUBMITTED}', updated_at = now()
             WHERE id = $1
               AND status IN ('{STATUS_IN_PROGRESS}', '{STATUS_CHANGES_REQUESTED}')
               AND escrow_status = '{ESCROW_FUNDED}'
             RETURNING {MILESTONE_COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&update)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(milestone) = milestone else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO submissions (milestone_id, by_student_id, by_group_id, notes, files)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {SUBMISSION_COLUMNS}"
        );
        let submission = sqlx::query_as::<_, Submission>(&insert)
            .bind(id)
            .bind(input.by_student_id)
            .bind(input.by_group_id)
            .bind(input.notes.trim())
            .bind(serde_json::json!(input.files))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((milestone, submission)))
    }

    /// Supervisor approval: compare-and-set `submitted -> supervisor_review`,
    /// setting the gate, readiness, and optional notes.
    pub async fn approve(
        pool: &PgPool,
        id: DbId,
        readiness: i16,
        notes: Option<&str>,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = '{STATUS_SUPERVISOR_REVIEW}',
                supervisor_gate = TRUE,
                readiness = $2,
                review_notes = $3,
                updated_at = now()
             WHERE id = $1 AND status = '{STATUS_SUBMITTED}'
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(readiness)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Supervisor change request: compare-and-set
    /// `submitted -> changes_requested`. The gate stays down.
    pub async fn request_changes(
        pool: &PgPool,
        id: DbId,
        notes: &str,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = '{STATUS_CHANGES_REQUESTED}',
                supervisor_gate = FALSE,
                review_notes = $2,
                updated_at = now()
             WHERE id = $1 AND status = '{STATUS_SUBMITTED}'
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(notes)
            .fetch_optional(pool)
            .await
    }

    /// Complete a milestone and mint portfolio items, in one transaction.
    ///
    /// Compare-and-sets `supervisor_review -> completed` (the gate must be
    /// up), then inserts one portfolio item per credited worker with the
    /// payout split equally. An item is on time when completion happened on
    /// or before the due date.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        input: &CompleteMilestone,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE milestones SET
                status = '{STATUS_COMPLETED}',
                completed_at = now(),
                updated_at = now()
             WHERE id = $1 AND status = '{STATUS_SUPERVISOR_REVIEW}' AND supervisor_gate = TRUE
             RETURNING {MILESTONE_COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&update)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(milestone) = milestone else {
            tx.rollback().await?;
            return Ok(None);
        };

        let share = milestone.amount / input.workers.len() as f64;
        let on_time = milestone
            .completed_at
            .is_some_and(|done| done <= milestone.due_date);

        for worker in &input.workers {
            sqlx::query(
                "INSERT INTO portfolio_items
                    (user_id, project_id, milestone_id, role, scope, complexity,
                     amount_delivered, on_time, rating)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            )
            .bind(worker.user_id)
            .bind(milestone.project_id)
            .bind(milestone.id)
            .bind(&worker.role)
            .bind(&milestone.scope)
            .bind(&input.complexity)
            .bind(share)
            .bind(on_time)
            .bind(input.rating)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(milestone))
    }

    /// Mark the payout released: compare-and-set `completed -> released`,
    /// moving the escrow status along with it.
    pub async fn release(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                status = '{STATUS_RELEASED}',
                escrow_status = '{ESCROW_RELEASED}',
                updated_at = now()
             WHERE id = $1 AND status = '{STATUS_COMPLETED}'
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the external escrow collaborator's status signal.
    pub async fn set_escrow_status(
        pool: &PgPool,
        id: DbId,
        escrow_status: &str,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET escrow_status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {MILESTONE_COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(escrow_status)
            .fetch_optional(pool)
            .await
    }
}
