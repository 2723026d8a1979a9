//! Integration tests for the milestone lifecycle: escrow-gated submission,
//! supervisor review, completion with portfolio fan-out, and release.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use bridgelane_db::models::milestone::{CompleteMilestone, CompletionWorker};
use bridgelane_db::models::proposal::CreateProposal;
use bridgelane_db::models::submission::CreateSubmission;
use bridgelane_db::repositories::{MilestoneRepo, PortfolioRepo, ProposalRepo, SubmissionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create, accept, and finalize a proposal; returns the milestone id.
async fn finalized_milestone(pool: &PgPool, project_id: i64, amount: f64, due_in_days: i64) -> i64 {
    let p = ProposalRepo::create(
        pool,
        &CreateProposal {
            project_id,
            proposer_id: 100,
            title: "API redesign".to_string(),
            scope: "Redesign the public API surface".to_string(),
            acceptance_criteria: "All endpoints documented and tested".to_string(),
            due_date: Utc::now() + Duration::days(due_in_days),
            amount: Some(amount),
        },
    )
    .await
    .unwrap();
    ProposalRepo::accept(pool, p.id).await.unwrap().unwrap();
    ProposalRepo::finalize(pool, p.id, 200)
        .await
        .unwrap()
        .unwrap()
        .id
}

fn student_submission(notes: &str) -> CreateSubmission {
    CreateSubmission {
        by_student_id: Some(300),
        by_group_id: None,
        notes: notes.to_string(),
        files: vec!["s3://bridgelane/report.pdf".to_string()],
    }
}

fn solo_completion() -> CompleteMilestone {
    CompleteMilestone {
        workers: vec![CompletionWorker {
            user_id: 300,
            role: "developer".to_string(),
        }],
        complexity: "medium".to_string(),
        rating: Some(4.0),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_blocked_until_escrow_funded(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();

    // Escrow is still pending: the submission transaction writes nothing.
    let result = MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(SubmissionRepo::list_by_milestone(&pool, id)
        .await
        .unwrap()
        .is_empty());

    MilestoneRepo::set_escrow_status(&pool, id, "funded")
        .await
        .unwrap()
        .unwrap();

    let (milestone, submission) =
        MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
            .await
            .unwrap()
            .unwrap();
    assert_eq!(milestone.status, "submitted");
    assert_eq!(submission.by_student_id, Some(300));
    assert_eq!(submission.notes, "Implemented all endpoints");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_submit_requires_started_milestone(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::set_escrow_status(&pool, id, "funded")
        .await
        .unwrap()
        .unwrap();

    // Still finalized, not in progress.
    let result = MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_start_is_compare_and_set(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;

    assert!(MilestoneRepo::start(&pool, id).await.unwrap().is_some());
    assert!(MilestoneRepo::start(&pool, id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_approve_sets_gate_and_readiness(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();
    MilestoneRepo::set_escrow_status(&pool, id, "funded").await.unwrap().unwrap();
    MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap()
        .unwrap();

    let m = MilestoneRepo::approve(&pool, id, 90, Some("Looks solid"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(m.status, "supervisor_review");
    assert!(m.supervisor_gate);
    assert_eq!(m.readiness, Some(90));
    assert_eq!(m.review_notes.as_deref(), Some("Looks solid"));

    // Review is single-shot on a given submission.
    assert!(MilestoneRepo::approve(&pool, id, 95, None).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_request_changes_allows_resubmission(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();
    MilestoneRepo::set_escrow_status(&pool, id, "funded").await.unwrap().unwrap();
    MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap()
        .unwrap();

    let m = MilestoneRepo::request_changes(&pool, id, "Error handling is missing")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(m.status, "changes_requested");
    assert!(!m.supervisor_gate);

    // Re-submission from changes_requested is allowed while escrow is funded.
    let (m, _) = MilestoneRepo::submit(&pool, id, &student_submission("Added the error handling"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(m.status, "submitted");

    let history = SubmissionRepo::list_by_milestone(&pool, id).await.unwrap();
    assert_eq!(history.len(), 2);
    let latest = SubmissionRepo::find_latest(&pool, id).await.unwrap().unwrap();
    assert_eq!(latest.notes, "Added the error handling");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_complete_mints_portfolio_items_with_split_amount(pool: PgPool) {
    let id = finalized_milestone(&pool, 5, 3000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();
    MilestoneRepo::set_escrow_status(&pool, id, "funded").await.unwrap().unwrap();
    MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap()
        .unwrap();
    MilestoneRepo::approve(&pool, id, 100, None).await.unwrap().unwrap();

    let input = CompleteMilestone {
        workers: vec![
            CompletionWorker {
                user_id: 300,
                role: "developer".to_string(),
            },
            CompletionWorker {
                user_id: 301,
                role: "designer".to_string(),
            },
        ],
        complexity: "high".to_string(),
        rating: Some(5.0),
    };
    let m = MilestoneRepo::complete(&pool, id, &input).await.unwrap().unwrap();
    assert_eq!(m.status, "completed");
    assert!(m.completed_at.is_some());

    // One item per worker, amount split equally, due date in the future
    // so the work counts as on time.
    for user_id in [300, 301] {
        let items = PortfolioRepo::list_by_user(&pool, user_id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].milestone_id, id);
        assert_eq!(items[0].project_id, 5);
        assert_eq!(items[0].amount_delivered, 1500.0);
        assert!(items[0].on_time);
        assert_eq!(items[0].rating, Some(5.0));
        assert_eq!(items[0].complexity, "high");
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_complete_requires_supervisor_gate(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();
    MilestoneRepo::set_escrow_status(&pool, id, "funded").await.unwrap().unwrap();
    MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap()
        .unwrap();

    // Not yet reviewed: completion writes nothing.
    assert!(MilestoneRepo::complete(&pool, id, &solo_completion())
        .await
        .unwrap()
        .is_none());
    assert!(PortfolioRepo::list_by_user(&pool, 300).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_release_moves_escrow_along(pool: PgPool) {
    let id = finalized_milestone(&pool, 1, 1000.0, 14).await;
    MilestoneRepo::start(&pool, id).await.unwrap().unwrap();
    MilestoneRepo::set_escrow_status(&pool, id, "funded").await.unwrap().unwrap();
    MilestoneRepo::submit(&pool, id, &student_submission("Implemented all endpoints"))
        .await
        .unwrap()
        .unwrap();
    MilestoneRepo::approve(&pool, id, 100, None).await.unwrap().unwrap();
    MilestoneRepo::complete(&pool, id, &solo_completion()).await.unwrap().unwrap();

    let m = MilestoneRepo::release(&pool, id).await.unwrap().unwrap();
    assert_eq!(m.status, "released");
    assert_eq!(m.escrow_status, "released");

    // Terminal: a second release finds nothing to update.
    assert!(MilestoneRepo::release(&pool, id).await.unwrap().is_none());
}
