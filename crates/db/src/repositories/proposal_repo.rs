//! Repository for the `proposals` table.
//!
//! Status transitions are compare-and-set: the expected current status is
//! part of the UPDATE's WHERE clause, so of two concurrent writers exactly
//! one succeeds and the loser observes `None` and re-reads. Finalization
//! spans `proposals` and `milestones` inside a single transaction.

use bridgelane_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use bridgelane_core::proposal::{STATUS_ACCEPTED, STATUS_FINALIZED, STATUS_PROPOSED};
use bridgelane_core::types::DbId;
use sqlx::PgPool;

use crate::models::milestone::Milestone;
use crate::models::proposal::{CreateProposal, Proposal, ProposalListQuery};
use crate::repositories::milestone_repo::MILESTONE_COLUMNS;

/// Column list for proposal queries.
const COLUMNS: &str = "id, project_id, proposer_id, title, scope, acceptance_criteria, \
    due_date, amount, status, created_at, updated_at";

/// Provides CRUD and lifecycle operations for milestone proposals.
pub struct ProposalRepo;

impl ProposalRepo {
    /// Create a new proposal with `status = 'proposed'`, returning the row.
    ///
    /// Text fields are stored trimmed.
    pub async fn create(pool: &PgPool, input: &CreateProposal) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals
                (project_id, proposer_id, title, scope, acceptance_criteria, due_date, amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(input.project_id)
            .bind(input.proposer_id)
            .bind(input.title.trim())
            .bind(input.scope.trim())
            .bind(input.acceptance_criteria.trim())
            .bind(input.due_date)
            .bind(input.amount)
            .fetch_one(pool)
            .await
    }

    /// Find a proposal by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List proposals, optionally filtered by project and status, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ProposalListQuery,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
        let offset = clamp_offset(params.offset);
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE ($1::bigint IS NULL OR project_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(params.project_id)
            .bind(params.status.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set or renegotiate the payout amount.
    ///
    /// Guarded against finalized proposals; returns `None` if the proposal
    /// does not exist or is already finalized.
    pub async fn set_amount(
        pool: &PgPool,
        id: DbId,
        amount: f64,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET amount = $2, updated_at = now()
             WHERE id = $1 AND status <> '{STATUS_FINALIZED}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(amount)
            .fetch_optional(pool)
            .await
    }

    /// Accept a proposal: compare-and-set `proposed -> accepted`.
    ///
    /// Returns `None` when the proposal is missing or no longer `proposed`
    /// (a concurrent accept won); the caller re-reads and reports the
    /// current status.
    pub async fn accept(pool: &PgPool, id: DbId) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status = '{STATUS_ACCEPTED}', updated_at = now()
             WHERE id = $1 AND status = '{STATUS_PROPOSED}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finalize a proposal, materializing its milestone.
    ///
    /// Both writes happen in one transaction:
    ///
    /// 1. compare-and-set the proposal `accepted -> finalized` (the WHERE
    ///    clause also re-checks the positive amount);
    /// 2. insert the milestone copying the proposal's term fields, with
    ///    `escrow_status = 'pending'`, `supervisor_gate = false`,
    ///    `status = 'finalized'`.
    ///
    /// They commit together or not at all, and the `uq_milestones_proposal`
    /// unique constraint makes double-materialization impossible even
    /// across crashed retries. Returns `None` when the compare-and-set
    /// finds no eligible row.
    pub async fn finalize(
        pool: &PgPool,
        id: DbId,
        finalizer_id: DbId,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update = format!(
            "UPDATE proposals SET status = '{STATUS_FINALIZED}', updated_at = now()
             WHERE id = $1 AND status = '{STATUS_ACCEPTED}' AND amount > 0
             RETURNING {COLUMNS}"
        );
        let proposal = sqlx::query_as::<_, Proposal>(&update)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(proposal) = proposal else {
            tx.rollback().await?;
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO milestones
                (proposal_id, project_id, finalized_by, title, scope,
                 acceptance_criteria, due_date, amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {MILESTONE_COLUMNS}"
        );
        let milestone = sqlx::query_as::<_, Milestone>(&insert)
            .bind(proposal.id)
            .bind(proposal.project_id)
            .bind(finalizer_id)
            .bind(&proposal.title)
            .bind(&proposal.scope)
            .bind(&proposal.acceptance_criteria)
            .bind(proposal.due_date)
            .bind(proposal.amount)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(milestone))
    }

    /// Withdraw (delete) a proposal while still `proposed`.
    ///
    /// Returns `false` if nothing was deleted.
    pub async fn delete_if_proposed(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(&format!(
            "DELETE FROM proposals WHERE id = $1 AND status = '{STATUS_PROPOSED}'"
        ))
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
