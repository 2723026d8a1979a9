//! Proposal status constants, validation, and transition rules.
//!
//! A proposal is a draft milestone term sheet exchanged between a project
//! party and a proposer. Its status only ever advances forward along
//! proposed -> accepted -> finalized; no transition skips a state and none
//! reverses. The DB layer enforces each transition with a compare-and-set
//! UPDATE, these functions are the single source of truth for which
//! transitions exist.

use chrono::Utc;

use crate::error::CoreError;
use crate::types::Timestamp;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Proposal is awaiting a decision from the recipient.
pub const STATUS_PROPOSED: &str = "proposed";

/// Proposal terms were accepted; amount negotiation may continue.
pub const STATUS_ACCEPTED: &str = "accepted";

/// Proposal was materialized into a milestone. Terminal.
pub const STATUS_FINALIZED: &str = "finalized";

/// All valid proposal status values, in lifecycle order.
pub const VALID_PROPOSAL_STATUSES: &[&str] =
    &[STATUS_PROPOSED, STATUS_ACCEPTED, STATUS_FINALIZED];

/// Minimum title length after trimming.
pub const MIN_TITLE_LENGTH: usize = 3;

/// Minimum scope length after trimming.
pub const MIN_SCOPE_LENGTH: usize = 10;

/// Minimum acceptance criteria length after trimming.
pub const MIN_CRITERIA_LENGTH: usize = 10;

/* --------------------------------------------------------------------------
Input validation
-------------------------------------------------------------------------- */

/// Validate a proposal title: at least [`MIN_TITLE_LENGTH`] chars after trim.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().chars().count() < MIN_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "title must be at least {MIN_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a proposal scope: at least [`MIN_SCOPE_LENGTH`] chars after trim.
pub fn validate_scope(scope: &str) -> Result<(), CoreError> {
    if scope.trim().chars().count() < MIN_SCOPE_LENGTH {
        return Err(CoreError::Validation(format!(
            "scope must be at least {MIN_SCOPE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate acceptance criteria: at least [`MIN_CRITERIA_LENGTH`] chars after trim.
pub fn validate_acceptance_criteria(criteria: &str) -> Result<(), CoreError> {
    if criteria.trim().chars().count() < MIN_CRITERIA_LENGTH {
        return Err(CoreError::Validation(format!(
            "acceptance criteria must be at least {MIN_CRITERIA_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a due date against the current time.
///
/// Same-day due dates are accepted: the cutoff is today at UTC midnight,
/// so only strictly-past calendar days are rejected.
pub fn validate_due_date(due_date: Timestamp) -> Result<(), CoreError> {
    validate_due_date_at(due_date, Utc::now())
}

/// Validate a due date against an explicit "now" (testable variant).
pub fn validate_due_date_at(due_date: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if due_date.date_naive() < now.date_naive() {
        return Err(CoreError::Validation(
            "due date must not be in the past".to_string(),
        ));
    }
    Ok(())
}

/// Validate a payout amount: finite and strictly positive.
pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Transition rules
-------------------------------------------------------------------------- */

/// A proposal can only be accepted while it is `proposed`.
pub fn ensure_can_accept(status: &str) -> Result<(), CoreError> {
    if status != STATUS_PROPOSED {
        return Err(CoreError::InvalidState {
            action: "accept",
            entity: "proposal",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// A proposal can only be finalized while it is `accepted`.
pub fn ensure_can_finalize(status: &str) -> Result<(), CoreError> {
    if status != STATUS_ACCEPTED {
        return Err(CoreError::InvalidState {
            action: "finalize",
            entity: "proposal",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Finalization additionally requires a committed, positive amount.
pub fn ensure_finalizable_amount(amount: Option<f64>) -> Result<f64, CoreError> {
    match amount {
        Some(a) if a.is_finite() && a > 0.0 => Ok(a),
        _ => Err(CoreError::Validation(
            "Proposal must have a valid amount to be finalized".to_string(),
        )),
    }
}

/// The amount may be set or renegotiated until the proposal is finalized.
pub fn ensure_amount_mutable(status: &str) -> Result<(), CoreError> {
    if status == STATUS_FINALIZED {
        return Err(CoreError::InvalidState {
            action: "set amount on",
            entity: "proposal",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// A proposal may only be withdrawn (deleted) while still `proposed`.
pub fn ensure_can_withdraw(status: &str) -> Result<(), CoreError> {
    if status != STATUS_PROPOSED {
        return Err(CoreError::InvalidState {
            action: "withdraw",
            entity: "proposal",
            status: status.to_string(),
        });
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
