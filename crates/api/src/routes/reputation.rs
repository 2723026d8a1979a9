//! Route definitions for user portfolio and reputation reads.
//!
//! Mounted at `/users` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::reputation;
use crate::state::AppState;

/// User portfolio and reputation routes.
///
/// ```text
/// GET /{id}/portfolio   -> get_portfolio
/// GET /{id}/reputation  -> get_reputation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/portfolio", get(reputation::get_portfolio))
        .route("/{id}/reputation", get(reputation::get_reputation))
}
