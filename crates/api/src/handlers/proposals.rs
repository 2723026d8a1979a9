//! Handlers for milestone proposal negotiation.
//!
//! Endpoints for creating, listing, accepting, finalizing, renegotiating,
//! and withdrawing proposals. Lifecycle transitions go through
//! compare-and-set repository calls; when a stale transition loses the
//! race the handler re-reads and reports the proposal's current status.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bridgelane_core::error::CoreError;
use bridgelane_core::proposal::{
    ensure_amount_mutable, ensure_can_accept, ensure_can_finalize, ensure_can_withdraw,
    ensure_finalizable_amount, validate_acceptance_criteria, validate_amount, validate_due_date,
    validate_scope, validate_title,
};
use bridgelane_core::types::DbId;
use bridgelane_db::models::proposal::{
    CreateProposal, Proposal, ProposalListQuery, SetProposalAmount,
};
use bridgelane_db::repositories::ProposalRepo;
use bridgelane_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a proposal or produce the standard 404.
async fn fetch_proposal(state: &AppState, id: DbId) -> AppResult<Proposal> {
    ProposalRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Proposal",
                id,
            })
        })
}

/// GET /proposals?project_id=&status=&limit=&offset=
///
/// List proposals, newest first.
pub async fn list_proposals(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProposalListQuery>,
) -> AppResult<impl IntoResponse> {
    let proposals = ProposalRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: proposals }))
}

/// POST /proposals
///
/// Create a new proposal in `proposed` status.
pub async fn create_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProposal>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title)?;
    validate_scope(&input.scope)?;
    validate_acceptance_criteria(&input.acceptance_criteria)?;
    validate_due_date(input.due_date)?;
    if let Some(amount) = input.amount {
        validate_amount(amount)?;
    }

    let proposal = ProposalRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = auth.user_id,
        proposal_id = proposal.id,
        project_id = proposal.project_id,
        "Proposal created"
    );

    state.event_bus.publish(
        PlatformEvent::new("proposal.created")
            .with_source("proposal", proposal.id)
            .with_actor(auth.user_id),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: proposal })))
}

/// GET /proposals/{id}
///
/// Get a single proposal by ID.
pub async fn get_proposal(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let proposal = fetch_proposal(&state, id).await?;
    Ok(Json(DataResponse { data: proposal }))
}

/// PATCH /proposals/{id}/amount
///
/// Set or renegotiate the payout amount. Allowed until finalization.
pub async fn set_amount(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetProposalAmount>,
) -> AppResult<impl IntoResponse> {
    validate_amount(input.amount)?;

    let current = fetch_proposal(&state, id).await?;
    ensure_amount_mutable(&current.status)?;

    let Some(proposal) = ProposalRepo::set_amount(&state.pool, id, input.amount).await? else {
        // Lost a race against finalize; report the fresh status.
        let fresh = fetch_proposal(&state, id).await?;
        ensure_amount_mutable(&fresh.status)?;
        return Err(AppError::InternalError(
            "proposal amount update failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        proposal_id = id,
        amount = input.amount,
        "Proposal amount set"
    );

    Ok(Json(DataResponse { data: proposal }))
}

/// POST /proposals/{id}/accept
///
/// Accept a proposal: `proposed -> accepted`.
pub async fn accept_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_proposal(&state, id).await?;
    ensure_can_accept(&current.status)?;

    let Some(proposal) = ProposalRepo::accept(&state.pool, id).await? else {
        let fresh = fetch_proposal(&state, id).await?;
        ensure_can_accept(&fresh.status)?;
        return Err(AppError::InternalError(
            "proposal accept failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        proposal_id = id,
        "Proposal accepted"
    );

    state.event_bus.publish(
        PlatformEvent::new("proposal.accepted")
            .with_source("proposal", id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: proposal }))
}

/// POST /proposals/{id}/finalize
///
/// Finalize an accepted proposal, materializing its milestone. The
/// proposal flip and the milestone insert commit in one transaction, and
/// the milestone carries the proposal's terms verbatim.
pub async fn finalize_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_proposal(&state, id).await?;
    ensure_can_finalize(&current.status)?;
    ensure_finalizable_amount(current.amount)?;

    let Some(milestone) = ProposalRepo::finalize(&state.pool, id, auth.user_id).await? else {
        let fresh = fetch_proposal(&state, id).await?;
        ensure_can_finalize(&fresh.status)?;
        ensure_finalizable_amount(fresh.amount)?;
        return Err(AppError::InternalError(
            "proposal finalize failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        proposal_id = id,
        milestone_id = milestone.id,
        amount = milestone.amount,
        "Proposal finalized into milestone"
    );

    state.event_bus.publish(
        PlatformEvent::new("proposal.finalized")
            .with_source("proposal", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "milestone_id": milestone.id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: milestone })))
}

/// DELETE /proposals/{id}
///
/// Withdraw a proposal. Only allowed while still `proposed`.
pub async fn withdraw_proposal(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_proposal(&state, id).await?;
    ensure_can_withdraw(&current.status)?;

    let deleted = ProposalRepo::delete_if_proposed(&state.pool, id).await?;
    if !deleted {
        let fresh = fetch_proposal(&state, id).await?;
        ensure_can_withdraw(&fresh.status)?;
        return Err(AppError::InternalError(
            "proposal withdraw failed unexpectedly".into(),
        ));
    }

    tracing::info!(
        user_id = auth.user_id,
        proposal_id = id,
        "Proposal withdrawn"
    );

    Ok(StatusCode::NO_CONTENT)
}
