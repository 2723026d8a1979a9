//! Portfolio read model for reputation scoring.

use bridgelane_core::reputation::CompletedWork;
use bridgelane_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `portfolio_items` table.
///
/// Minted inside the milestone-completion transaction, one per credited
/// worker, with the payout split equally.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PortfolioItem {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub milestone_id: DbId,
    pub role: String,
    pub scope: String,
    pub complexity: String,
    pub amount_delivered: f64,
    pub on_time: bool,
    pub rating: Option<f64>,
    pub created_at: Timestamp,
}

impl PortfolioItem {
    /// Project the row into the core scoring input.
    pub fn to_completed_work(&self) -> CompletedWork {
        CompletedWork {
            project_id: self.project_id,
            complexity: self.complexity.clone(),
            amount_delivered: self.amount_delivered,
            on_time: self.on_time,
            rating: self.rating,
        }
    }
}
