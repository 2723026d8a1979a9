//! Milestone model and lifecycle DTOs.

use bridgelane_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `milestones` table.
///
/// Term fields (`title`, `scope`, `acceptance_criteria`, `due_date`,
/// `amount`) are copied verbatim from the finalized proposal and never
/// change afterwards.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Milestone {
    pub id: DbId,
    pub proposal_id: DbId,
    pub project_id: DbId,
    pub finalized_by: DbId,
    pub title: String,
    pub scope: String,
    pub acceptance_criteria: String,
    pub due_date: Timestamp,
    pub amount: f64,
    pub escrow_status: String,
    pub supervisor_gate: bool,
    pub status: String,
    /// Supervisor's 0-100 progress-readiness estimate from the last review.
    pub readiness: Option<i16>,
    pub review_notes: Option<String>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for a supervisor approval via `POST /milestones/{id}/review/approve`.
#[derive(Debug, Deserialize)]
pub struct ApproveReview {
    /// 0-100 progress-readiness estimate.
    pub readiness: i16,
    pub notes: Option<String>,
}

/// DTO for `POST /milestones/{id}/review/request-changes`.
#[derive(Debug, Deserialize)]
pub struct RequestChanges {
    pub notes: String,
}

/// One worker credited when a milestone completes.
#[derive(Debug, Deserialize)]
pub struct CompletionWorker {
    pub user_id: DbId,
    pub role: String,
}

/// DTO for `POST /milestones/{id}/complete`.
///
/// The caller (who knows group membership) names the workers; the payout
/// amount is split equally among them and one portfolio item is minted per
/// worker inside the completion transaction.
#[derive(Debug, Deserialize)]
pub struct CompleteMilestone {
    pub workers: Vec<CompletionWorker>,
    /// Complexity of the delivered work, judged at completion.
    pub complexity: String,
    /// Optional 1-5 partner rating.
    pub rating: Option<f64>,
}

/// DTO for the external escrow collaborator's status signal.
#[derive(Debug, Deserialize)]
pub struct UpdateEscrow {
    pub escrow_status: String,
}

/// Query parameters for `GET /milestones`.
#[derive(Debug, Deserialize)]
pub struct MilestoneListQuery {
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
