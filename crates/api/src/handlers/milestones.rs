//! Handlers for the milestone lifecycle.
//!
//! Endpoints for starting work, submitting deliverables, supervisor
//! review, completion, payout release, and the external escrow signal.
//! Every transition goes through a compare-and-set repository call; when
//! a stale transition loses the race the handler re-reads and reports the
//! milestone's current status.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bridgelane_core::error::CoreError;
use bridgelane_core::milestone::{
    ensure_can_complete, ensure_can_release, ensure_can_start, ensure_reviewable,
    ensure_submittable, validate_escrow_status, validate_readiness, validate_review_notes,
};
use bridgelane_core::reputation::{validate_complexity, validate_rating};
use bridgelane_core::submission::{validate_files, validate_identity, validate_notes};
use bridgelane_core::types::DbId;
use bridgelane_db::models::milestone::{
    ApproveReview, CompleteMilestone, Milestone, MilestoneListQuery, RequestChanges, UpdateEscrow,
};
use bridgelane_db::models::submission::{CreateSubmission, Submission};
use bridgelane_db::repositories::{MilestoneRepo, SubmissionRepo};
use bridgelane_events::PlatformEvent;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a milestone or produce the standard 404.
async fn fetch_milestone(state: &AppState, id: DbId) -> AppResult<Milestone> {
    MilestoneRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Milestone",
                id,
            })
        })
}

/// GET /milestones?project_id=&status=&limit=&offset=
///
/// List milestones, newest first.
pub async fn list_milestones(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MilestoneListQuery>,
) -> AppResult<impl IntoResponse> {
    let milestones = MilestoneRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: milestones }))
}

/// A milestone with its most recent submission, if any.
#[derive(Debug, Serialize)]
pub struct MilestoneDetail {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub latest_submission: Option<Submission>,
}

/// GET /milestones/{id}
///
/// Get a single milestone by ID, with its latest submission attached.
pub async fn get_milestone(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let milestone = fetch_milestone(&state, id).await?;
    let latest_submission = SubmissionRepo::find_latest(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: MilestoneDetail {
            milestone,
            latest_submission,
        },
    }))
}

/// POST /milestones/{id}/start
///
/// Begin work: `finalized -> in_progress`.
pub async fn start_milestone(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_milestone(&state, id).await?;
    ensure_can_start(&current.status)?;

    let Some(milestone) = MilestoneRepo::start(&state.pool, id).await? else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_can_start(&fresh.status)?;
        return Err(AppError::InternalError(
            "milestone start failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        "Milestone work started"
    );

    Ok(Json(DataResponse { data: milestone }))
}

/// GET /milestones/{id}/submissions
///
/// List a milestone's submission history, newest first.
pub async fn list_submissions(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // 404 on a missing milestone rather than an empty list.
    fetch_milestone(&state, id).await?;

    let submissions = SubmissionRepo::list_by_milestone(&state.pool, id).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// POST /milestones/{id}/submissions
///
/// Submit work for review. Requires an in-progress (or changes-requested)
/// milestone with funded escrow; records the submission and advances the
/// milestone to `submitted` in one transaction.
pub async fn submit_work(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSubmission>,
) -> AppResult<impl IntoResponse> {
    validate_identity(input.by_student_id, input.by_group_id)?;
    validate_notes(&input.notes)?;
    validate_files(&input.files)?;

    let current = fetch_milestone(&state, id).await?;
    ensure_submittable(&current.status, &current.escrow_status)?;

    let Some((milestone, submission)) = MilestoneRepo::submit(&state.pool, id, &input).await?
    else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_submittable(&fresh.status, &fresh.escrow_status)?;
        return Err(AppError::InternalError(
            "milestone submission failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        submission_id = submission.id,
        "Work submitted for review"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.submitted")
            .with_source("milestone", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "submission_id": submission.id })),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: serde_json::json!({
                "milestone": milestone,
                "submission": submission,
            }),
        }),
    ))
}

/// POST /milestones/{id}/review/approve
///
/// Supervisor approval: `submitted -> supervisor_review`, raising the
/// completion gate and recording the readiness estimate.
pub async fn approve_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ApproveReview>,
) -> AppResult<impl IntoResponse> {
    validate_readiness(input.readiness)?;

    let current = fetch_milestone(&state, id).await?;
    ensure_reviewable(&current.status)?;

    let Some(milestone) =
        MilestoneRepo::approve(&state.pool, id, input.readiness, input.notes.as_deref()).await?
    else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_reviewable(&fresh.status)?;
        return Err(AppError::InternalError(
            "milestone approval failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        readiness = input.readiness,
        "Milestone review approved"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.review.approved")
            .with_source("milestone", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "readiness": input.readiness })),
    );

    Ok(Json(DataResponse { data: milestone }))
}

/// POST /milestones/{id}/review/request-changes
///
/// Supervisor change request: `submitted -> changes_requested`. Notes are
/// mandatory so the workers know what to fix; the milestone becomes
/// re-submittable.
pub async fn request_changes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RequestChanges>,
) -> AppResult<impl IntoResponse> {
    validate_review_notes(&input.notes)?;

    let current = fetch_milestone(&state, id).await?;
    ensure_reviewable(&current.status)?;

    let Some(milestone) = MilestoneRepo::request_changes(&state.pool, id, &input.notes).await?
    else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_reviewable(&fresh.status)?;
        return Err(AppError::InternalError(
            "milestone change request failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        "Milestone changes requested"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.review.changes_requested")
            .with_source("milestone", id)
            .with_actor(auth.user_id),
    );

    Ok(Json(DataResponse { data: milestone }))
}

/// POST /milestones/{id}/complete
///
/// Complete a supervisor-approved milestone, minting one verified
/// portfolio item per credited worker (payout split equally) inside the
/// completion transaction.
pub async fn complete_milestone(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CompleteMilestone>,
) -> AppResult<impl IntoResponse> {
    if input.workers.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "completion requires at least one credited worker".to_string(),
        )));
    }
    validate_complexity(&input.complexity)?;
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }

    let current = fetch_milestone(&state, id).await?;
    ensure_can_complete(&current.status, current.supervisor_gate)?;

    let Some(milestone) = MilestoneRepo::complete(&state.pool, id, &input).await? else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_can_complete(&fresh.status, fresh.supervisor_gate)?;
        return Err(AppError::InternalError(
            "milestone completion failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        workers = input.workers.len(),
        "Milestone completed"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.completed")
            .with_source("milestone", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({
                "workers": input.workers.len(),
                "amount": milestone.amount,
            })),
    );

    Ok(Json(DataResponse { data: milestone }))
}

/// POST /milestones/{id}/release
///
/// Mark the escrow payout released: `completed -> released`. Terminal.
pub async fn release_milestone(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = fetch_milestone(&state, id).await?;
    ensure_can_release(&current.status)?;

    let Some(milestone) = MilestoneRepo::release(&state.pool, id).await? else {
        let fresh = fetch_milestone(&state, id).await?;
        ensure_can_release(&fresh.status)?;
        return Err(AppError::InternalError(
            "milestone release failed unexpectedly".into(),
        ));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        amount = milestone.amount,
        "Milestone payout released"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.released")
            .with_source("milestone", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "amount": milestone.amount })),
    );

    Ok(Json(DataResponse { data: milestone }))
}

/// PATCH /milestones/{id}/escrow
///
/// Record the external escrow collaborator's funding signal. Submission
/// stays blocked until this reports `funded`.
pub async fn update_escrow(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEscrow>,
) -> AppResult<impl IntoResponse> {
    validate_escrow_status(&input.escrow_status)?;

    let Some(milestone) =
        MilestoneRepo::set_escrow_status(&state.pool, id, &input.escrow_status).await?
    else {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Milestone",
            id,
        }));
    };

    tracing::info!(
        user_id = auth.user_id,
        milestone_id = id,
        escrow_status = %input.escrow_status,
        "Milestone escrow status updated"
    );

    state.event_bus.publish(
        PlatformEvent::new("milestone.escrow.updated")
            .with_source("milestone", id)
            .with_actor(auth.user_id)
            .with_payload(serde_json::json!({ "escrow_status": input.escrow_status })),
    );

    Ok(Json(DataResponse { data: milestone }))
}
