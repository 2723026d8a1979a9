//! Repository for the `portfolio_items` table.
//!
//! Items are minted by [`MilestoneRepo::complete`] inside the completion
//! transaction; this repository serves the reputation read path.
//!
//! [`MilestoneRepo::complete`]: crate::repositories::MilestoneRepo::complete

use bridgelane_core::types::DbId;
use sqlx::PgPool;

use crate::models::portfolio::PortfolioItem;

/// Column list for portfolio queries.
const COLUMNS: &str = "id, user_id, project_id, milestone_id, role, scope, complexity, \
    amount_delivered, on_time, rating, created_at";

/// Read access to verified portfolio items.
pub struct PortfolioRepo;

impl PortfolioRepo {
    /// List a user's portfolio items, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PortfolioItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM portfolio_items
             WHERE user_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, PortfolioItem>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
