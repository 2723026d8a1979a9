//! Reputation scoring over a user's verified portfolio history.
//!
//! The score is a pure, deterministic function of completed-work records:
//! no side effects, nothing persisted authoritatively. The API layer
//! recomputes it on demand and scales the [0,1] result by 100 for display.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Low-complexity work.
pub const COMPLEXITY_LOW: &str = "low";

/// Medium-complexity work.
pub const COMPLEXITY_MEDIUM: &str = "medium";

/// High-complexity work.
pub const COMPLEXITY_HIGH: &str = "high";

/// All valid complexity values.
pub const VALID_COMPLEXITIES: &[&str] = &[COMPLEXITY_LOW, COMPLEXITY_MEDIUM, COMPLEXITY_HIGH];

/// Completed-project count that saturates the project factor.
pub const PROJECT_SATURATION: f64 = 10.0;

/// Factor weights of the final score.
pub const WEIGHT_PROJECTS: f64 = 0.2;
pub const WEIGHT_RATING: f64 = 0.3;
pub const WEIGHT_ON_TIME: f64 = 0.25;
pub const WEIGHT_COMPLEXITY: f64 = 0.1;
pub const PENALTY_DISPUTES: f64 = 0.15;
pub const PENALTY_REWORK: f64 = 0.1;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// One verified record of completed work, as read from the portfolio store.
#[derive(Debug, Clone)]
pub struct CompletedWork {
    pub project_id: DbId,
    /// One of [`VALID_COMPLEXITIES`].
    pub complexity: String,
    pub amount_delivered: f64,
    pub on_time: bool,
    /// Optional 1-5 partner rating.
    pub rating: Option<f64>,
}

/// The intermediate factors a score is derived from.
///
/// `dispute_rate` and `rework_rate` are always 0: no dispute or
/// resubmission data source is wired in yet, so they contribute no penalty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReputationFactors {
    pub completed_projects: i64,
    pub average_rating: f64,
    pub on_time_rate: f64,
    pub dispute_rate: f64,
    pub rework_rate: f64,
    pub complexity_bonus: f64,
}

impl ReputationFactors {
    /// The all-zero factors of an empty portfolio.
    pub fn zero() -> Self {
        Self {
            completed_projects: 0,
            average_rating: 0.0,
            on_time_rate: 0.0,
            dispute_rate: 0.0,
            rework_rate: 0.0,
            complexity_bonus: 0.0,
        }
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate a complexity value at the boundary.
pub fn validate_complexity(complexity: &str) -> Result<(), CoreError> {
    if VALID_COMPLEXITIES.contains(&complexity) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid complexity '{complexity}'. Must be one of: {}",
            VALID_COMPLEXITIES.join(", ")
        )))
    }
}

/// Validate an optional 1-5 partner rating.
pub fn validate_rating(rating: f64) -> Result<(), CoreError> {
    if !(1.0..=5.0).contains(&rating) {
        return Err(CoreError::Validation(
            "rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// Numeric weight of a complexity value (low 1, medium 2, high 3).
///
/// Unknown values weigh as low; the boundary validates on write so this
/// only matters for legacy rows.
pub fn complexity_weight(complexity: &str) -> f64 {
    match complexity {
        COMPLEXITY_HIGH => 3.0,
        COMPLEXITY_MEDIUM => 2.0,
        _ => 1.0,
    }
}

/* --------------------------------------------------------------------------
Scoring
-------------------------------------------------------------------------- */

/// Derive reputation factors from a portfolio.
///
/// - `completed_projects`: count of distinct project ids.
/// - `average_rating`: amount-weighted mean over rated items, 0 if none.
/// - `on_time_rate`: on-time fraction over all items, 0 if empty.
/// - `complexity_bonus`: plain mean of complexity weights.
pub fn calculate_factors(items: &[CompletedWork]) -> ReputationFactors {
    if items.is_empty() {
        return ReputationFactors::zero();
    }

    let completed_projects = items
        .iter()
        .map(|i| i.project_id)
        .collect::<HashSet<_>>()
        .len() as i64;

    let (rated_amount, weighted_rating) = items
        .iter()
        .filter_map(|i| i.rating.map(|r| (i.amount_delivered, r)))
        .fold((0.0, 0.0), |(amt, sum), (a, r)| (amt + a, sum + r * a));
    let average_rating = if rated_amount > 0.0 {
        weighted_rating / rated_amount
    } else {
        0.0
    };

    let on_time = items.iter().filter(|i| i.on_time).count() as f64;
    let on_time_rate = on_time / items.len() as f64;

    let complexity_bonus = items
        .iter()
        .map(|i| complexity_weight(&i.complexity))
        .sum::<f64>()
        / items.len() as f64;

    ReputationFactors {
        completed_projects,
        average_rating,
        on_time_rate,
        dispute_rate: 0.0,
        rework_rate: 0.0,
        complexity_bonus,
    }
}

/// Combine factors into a score in [0, 1].
///
/// Each factor is first normalized to [0, 1]:
/// project count saturates at [`PROJECT_SATURATION`], ratings map 1..5 to
/// 0..1, complexity maps 1..3 to 0..1. The weighted sum is clamped.
pub fn calculate_score(factors: &ReputationFactors) -> f64 {
    let project_score = (factors.completed_projects as f64 / PROJECT_SATURATION).min(1.0);
    let rating_score = ((factors.average_rating - 1.0) / 4.0).clamp(0.0, 1.0);
    let complexity_score = ((factors.complexity_bonus - 1.0) / 2.0).clamp(0.0, 1.0);

    let score = WEIGHT_PROJECTS * project_score
        + WEIGHT_RATING * rating_score
        + WEIGHT_ON_TIME * factors.on_time_rate
        + WEIGHT_COMPLEXITY * complexity_score
        - PENALTY_DISPUTES * factors.dispute_rate
        - PENALTY_REWORK * factors.rework_rate;

    score.clamp(0.0, 1.0)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
