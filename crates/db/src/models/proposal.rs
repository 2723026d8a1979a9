//! Milestone proposal model and DTOs.

use bridgelane_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `proposals` table.
///
/// `status` is one of the values in
/// [`bridgelane_core::proposal::VALID_PROPOSAL_STATUSES`]; `amount` is
/// optional until finalization commits the payout.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Proposal {
    pub id: DbId,
    pub project_id: DbId,
    pub proposer_id: DbId,
    pub title: String,
    pub scope: String,
    pub acceptance_criteria: String,
    pub due_date: Timestamp,
    pub amount: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new proposal via `POST /proposals`.
#[derive(Debug, Deserialize)]
pub struct CreateProposal {
    pub project_id: DbId,
    pub proposer_id: DbId,
    pub title: String,
    pub scope: String,
    pub acceptance_criteria: String,
    pub due_date: Timestamp,
    pub amount: Option<f64>,
}

/// DTO for setting or renegotiating the payout amount.
#[derive(Debug, Deserialize)]
pub struct SetProposalAmount {
    pub amount: f64,
}

/// Query parameters for `GET /proposals`.
#[derive(Debug, Deserialize)]
pub struct ProposalListQuery {
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
