//! Milestone status constants, escrow gating, and transition rules.
//!
//! A milestone is a committed, escrow-backed unit of work materialized from
//! an accepted proposal. Its lifecycle is:
//!
//! ```text
//! finalized -> in_progress -> submitted -> supervisor_review -> completed -> released
//!                  ^                |
//!                  |                v
//!                  +---- changes_requested (re-submittable)
//! ```
//!
//! Submission is additionally gated on the external escrow-funding signal:
//! work cannot be submitted until the payout is funded. The core never funds
//! escrow itself.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Status constants
-------------------------------------------------------------------------- */

/// Freshly materialized from a finalized proposal; work not yet started.
pub const STATUS_FINALIZED: &str = "finalized";

/// Work is underway.
pub const STATUS_IN_PROGRESS: &str = "in_progress";

/// Work was submitted and awaits supervisor review.
pub const STATUS_SUBMITTED: &str = "submitted";

/// Supervisor approved; ready for the paying party.
pub const STATUS_SUPERVISOR_REVIEW: &str = "supervisor_review";

/// Supervisor requested changes; awaiting re-submission.
pub const STATUS_CHANGES_REQUESTED: &str = "changes_requested";

/// Work accepted and counted toward the workers' portfolios. Terminal.
pub const STATUS_COMPLETED: &str = "completed";

/// Escrow payout released to the workers. Terminal.
pub const STATUS_RELEASED: &str = "released";

/// All valid milestone status values.
pub const VALID_MILESTONE_STATUSES: &[&str] = &[
    STATUS_FINALIZED,
    STATUS_IN_PROGRESS,
    STATUS_SUBMITTED,
    STATUS_SUPERVISOR_REVIEW,
    STATUS_CHANGES_REQUESTED,
    STATUS_COMPLETED,
    STATUS_RELEASED,
];

/// Escrow payout has not been funded yet.
pub const ESCROW_PENDING: &str = "pending";

/// Escrow payout is funded; work may be submitted.
pub const ESCROW_FUNDED: &str = "funded";

/// Escrow payout was released to the workers.
pub const ESCROW_RELEASED: &str = "released";

/// Escrow payout was refunded to the paying party.
pub const ESCROW_REFUNDED: &str = "refunded";

/// All valid escrow status values.
pub const VALID_ESCROW_STATUSES: &[&str] =
    &[ESCROW_PENDING, ESCROW_FUNDED, ESCROW_RELEASED, ESCROW_REFUNDED];

/// Statuses from which a submission is allowed (escrow permitting).
pub const SUBMITTABLE_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_CHANGES_REQUESTED];

/// Maximum value for the supervisor's progress-readiness estimate.
pub const MAX_READINESS: i16 = 100;

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate an escrow status pushed by the external funding collaborator.
pub fn validate_escrow_status(status: &str) -> Result<(), CoreError> {
    if VALID_ESCROW_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid escrow status '{status}'. Must be one of: {}",
            VALID_ESCROW_STATUSES.join(", ")
        )))
    }
}

/// Validate a supervisor's 0-100 progress-readiness value.
pub fn validate_readiness(readiness: i16) -> Result<(), CoreError> {
    if !(0..=MAX_READINESS).contains(&readiness) {
        return Err(CoreError::Validation(format!(
            "readiness must be between 0 and {MAX_READINESS}"
        )));
    }
    Ok(())
}

/// Review notes accompanying a change request must carry actual content.
pub fn validate_review_notes(notes: &str) -> Result<(), CoreError> {
    if notes.trim().is_empty() {
        return Err(CoreError::Validation(
            "review notes are required when requesting changes".to_string(),
        ));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Transition rules
-------------------------------------------------------------------------- */

/// True when work on the milestone may be submitted right now.
pub fn can_submit(status: &str, escrow_status: &str) -> bool {
    SUBMITTABLE_STATUSES.contains(&status) && escrow_status == ESCROW_FUNDED
}

/// Work may only begin on a freshly finalized milestone.
pub fn ensure_can_start(status: &str) -> Result<(), CoreError> {
    if status != STATUS_FINALIZED {
        return Err(CoreError::InvalidState {
            action: "start",
            entity: "milestone",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Submission requires an in-progress (or changes-requested) milestone with
/// funded escrow.
pub fn ensure_submittable(status: &str, escrow_status: &str) -> Result<(), CoreError> {
    if !SUBMITTABLE_STATUSES.contains(&status) {
        return Err(CoreError::InvalidState {
            action: "submit work for",
            entity: "milestone",
            status: status.to_string(),
        });
    }
    if escrow_status != ESCROW_FUNDED {
        return Err(CoreError::InvalidState {
            action: "submit work for",
            entity: "milestone escrow",
            status: escrow_status.to_string(),
        });
    }
    Ok(())
}

/// Supervisor review (approve or request changes) acts on submitted work.
pub fn ensure_reviewable(status: &str) -> Result<(), CoreError> {
    if status != STATUS_SUBMITTED {
        return Err(CoreError::InvalidState {
            action: "review",
            entity: "milestone",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Completion requires supervisor approval (gate set) on reviewed work.
pub fn ensure_can_complete(status: &str, supervisor_gate: bool) -> Result<(), CoreError> {
    if status != STATUS_SUPERVISOR_REVIEW {
        return Err(CoreError::InvalidState {
            action: "complete",
            entity: "milestone",
            status: status.to_string(),
        });
    }
    if !supervisor_gate {
        return Err(CoreError::Validation(
            "milestone cannot be completed before supervisor approval".to_string(),
        ));
    }
    Ok(())
}

/// Payout release only applies to completed milestones.
pub fn ensure_can_release(status: &str) -> Result<(), CoreError> {
    if status != STATUS_COMPLETED {
        return Err(CoreError::InvalidState {
            action: "release",
            entity: "milestone",
            status: status.to_string(),
        });
    }
    Ok(())
}

/// Portfolio items may only be minted from completed or released milestones.
pub fn counts_toward_portfolio(status: &str) -> bool {
    status == STATUS_COMPLETED || status == STATUS_RELEASED
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_submit_requires_funded_escrow() {
        assert!(can_submit(STATUS_IN_PROGRESS, ESCROW_FUNDED));
        assert!(!can_submit(STATUS_IN_PROGRESS, ESCROW_PENDING));
        assert!(!can_submit(STATUS_IN_PROGRESS, ESCROW_RELEASED));
    }

    #[test]
    fn test_can_submit_requires_submittable_status() {
        assert!(can_submit(STATUS_CHANGES_REQUESTED, ESCROW_FUNDED));
        assert!(!can_submit(STATUS_FINALIZED, ESCROW_FUNDED));
        assert!(!can_submit(STATUS_SUBMITTED, ESCROW_FUNDED));
        assert!(!can_submit(STATUS_COMPLETED, ESCROW_FUNDED));
    }

    #[test]
    fn test_ensure_submittable_names_the_blocker() {
        let err = ensure_submittable(STATUS_FINALIZED, ESCROW_FUNDED).unwrap_err();
        assert!(err.to_string().contains("status finalized"));

        let err = ensure_submittable(STATUS_IN_PROGRESS, ESCROW_PENDING).unwrap_err();
        assert!(err.to_string().contains("escrow"));
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_start_only_from_finalized() {
        assert!(ensure_can_start(STATUS_FINALIZED).is_ok());
        assert!(ensure_can_start(STATUS_IN_PROGRESS).is_err());
        assert!(ensure_can_start(STATUS_COMPLETED).is_err());
    }

    #[test]
    fn test_review_only_on_submitted_work() {
        assert!(ensure_reviewable(STATUS_SUBMITTED).is_ok());
        assert!(ensure_reviewable(STATUS_IN_PROGRESS).is_err());
        assert!(ensure_reviewable(STATUS_SUPERVISOR_REVIEW).is_err());
    }

    #[test]
    fn test_complete_requires_gate() {
        assert!(ensure_can_complete(STATUS_SUPERVISOR_REVIEW, true).is_ok());

        let err = ensure_can_complete(STATUS_SUPERVISOR_REVIEW, false).unwrap_err();
        assert!(err.to_string().contains("supervisor approval"));

        assert!(ensure_can_complete(STATUS_SUBMITTED, true).is_err());
    }

    #[test]
    fn test_release_only_from_completed() {
        assert!(ensure_can_release(STATUS_COMPLETED).is_ok());
        assert!(ensure_can_release(STATUS_SUPERVISOR_REVIEW).is_err());
        assert!(ensure_can_release(STATUS_RELEASED).is_err());
    }

    #[test]
    fn test_escrow_status_values() {
        for status in VALID_ESCROW_STATUSES {
            assert!(validate_escrow_status(status).is_ok());
        }
        assert!(validate_escrow_status("unknown").is_err());
        assert!(validate_escrow_status("").is_err());
    }

    #[test]
    fn test_readiness_range() {
        assert!(validate_readiness(0).is_ok());
        assert!(validate_readiness(50).is_ok());
        assert!(validate_readiness(100).is_ok());
        assert!(validate_readiness(-1).is_err());
        assert!(validate_readiness(101).is_err());
    }

    #[test]
    fn test_review_notes_required() {
        assert!(validate_review_notes("Please tighten the error handling").is_ok());
        assert!(validate_review_notes("").is_err());
        assert!(validate_review_notes("   ").is_err());
    }

    #[test]
    fn test_portfolio_eligibility() {
        assert!(counts_toward_portfolio(STATUS_COMPLETED));
        assert!(counts_toward_portfolio(STATUS_RELEASED));
        assert!(!counts_toward_portfolio(STATUS_SUPERVISOR_REVIEW));
        assert!(!counts_toward_portfolio(STATUS_SUBMITTED));
    }
}
