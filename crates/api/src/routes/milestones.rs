//! Route definitions for the milestone lifecycle.
//!
//! Mounted at `/milestones` by `api_routes()`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::milestones;
use crate::state::AppState;

/// Milestone routes.
///
/// ```text
/// GET    /                           -> list_milestones (?project_id, status, limit, offset)
/// GET    /{id}                       -> get_milestone
/// POST   /{id}/start                 -> start_milestone
/// GET    /{id}/submissions           -> list_submissions
/// POST   /{id}/submissions           -> submit_work
/// POST   /{id}/review/approve        -> approve_review
/// POST   /{id}/review/request-changes -> request_changes
/// POST   /{id}/complete              -> complete_milestone
/// POST   /{id}/release               -> release_milestone
/// PATCH  /{id}/escrow                -> update_escrow
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(milestones::list_milestones))
        .route("/{id}", get(milestones::get_milestone))
        .route("/{id}/start", post(milestones::start_milestone))
        .route(
            "/{id}/submissions",
            get(milestones::list_submissions).post(milestones::submit_work),
        )
        .route("/{id}/review/approve", post(milestones::approve_review))
        .route(
            "/{id}/review/request-changes",
            post(milestones::request_changes),
        )
        .route("/{id}/complete", post(milestones::complete_milestone))
        .route("/{id}/release", post(milestones::release_milestone))
        .route("/{id}/escrow", patch(milestones::update_escrow))
}
