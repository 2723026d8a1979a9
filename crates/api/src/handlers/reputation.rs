//! Handlers for user portfolio and reputation reads.
//!
//! Reputation is never stored authoritatively: every read recomputes the
//! score from the user's verified portfolio items, so a score can always
//! be traced back to the underlying records.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use bridgelane_core::reputation::{calculate_factors, calculate_score, ReputationFactors};
use bridgelane_core::types::{DbId, Timestamp};
use bridgelane_db::repositories::PortfolioRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A freshly recomputed reputation score with its contributing factors.
#[derive(Debug, Serialize)]
pub struct ReputationResponse {
    pub user_id: DbId,
    /// Score on a 0-100 display scale.
    pub score: f64,
    pub factors: ReputationFactors,
    pub last_calculated_at: Timestamp,
}

/// GET /users/{id}/portfolio
///
/// List a user's verified portfolio items, newest first. An unknown user
/// simply has an empty portfolio.
pub async fn get_portfolio(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let items = PortfolioRepo::list_by_user(&state.pool, id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /users/{id}/reputation
///
/// Recompute the user's reputation score from their portfolio. A user
/// with no completed work scores 0.
pub async fn get_reputation(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let items = PortfolioRepo::list_by_user(&state.pool, id).await?;
    let history: Vec<_> = items.iter().map(|i| i.to_completed_work()).collect();

    let factors = calculate_factors(&history);
    let score = calculate_score(&factors) * 100.0;

    Ok(Json(DataResponse {
        data: ReputationResponse {
            user_id: id,
            score,
            factors,
            last_calculated_at: chrono::Utc::now(),
        },
    }))
}
