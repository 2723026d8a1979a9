//! Route definitions for milestone proposal negotiation.
//!
//! Mounted at `/proposals` by `api_routes()`.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::proposals;
use crate::state::AppState;

/// Proposal routes.
///
/// ```text
/// GET    /                   -> list_proposals (?project_id, status, limit, offset)
/// POST   /                   -> create_proposal
/// GET    /{id}               -> get_proposal
/// DELETE /{id}               -> withdraw_proposal
/// PATCH  /{id}/amount        -> set_amount
/// POST   /{id}/accept        -> accept_proposal
/// POST   /{id}/finalize      -> finalize_proposal
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(proposals::list_proposals).post(proposals::create_proposal),
        )
        .route(
            "/{id}",
            get(proposals::get_proposal).delete(proposals::withdraw_proposal),
        )
        .route("/{id}/amount", patch(proposals::set_amount))
        .route("/{id}/accept", post(proposals::accept_proposal))
        .route("/{id}/finalize", post(proposals::finalize_proposal))
}
