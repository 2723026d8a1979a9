pub mod health;
pub mod milestones;
pub mod proposals;
pub mod reputation;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /proposals                                 list, create
/// /proposals/{id}                            get, withdraw (DELETE)
/// /proposals/{id}/amount                     set/renegotiate amount (PATCH)
/// /proposals/{id}/accept                     accept (POST)
/// /proposals/{id}/finalize                   finalize into milestone (POST)
///
/// /milestones                                list
/// /milestones/{id}                           get
/// /milestones/{id}/start                     begin work (POST)
/// /milestones/{id}/submissions               list, submit work
/// /milestones/{id}/review/approve            supervisor approve (POST)
/// /milestones/{id}/review/request-changes    supervisor request changes (POST)
/// /milestones/{id}/complete                  complete, mint portfolio items (POST)
/// /milestones/{id}/release                   release escrow payout (POST)
/// /milestones/{id}/escrow                    external escrow signal (PATCH)
///
/// /users/{id}/portfolio                      verified portfolio items
/// /users/{id}/reputation                     recomputed reputation score
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/proposals", proposals::router())
        .nest("/milestones", milestones::router())
        .nest("/users", reputation::router())
}
