//! Integration tests for the proposal lifecycle against a real database:
//! creation, compare-and-set accept, transactional finalize, amount
//! renegotiation, and withdrawal.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use bridgelane_db::models::proposal::{CreateProposal, ProposalListQuery};
use bridgelane_db::repositories::{MilestoneRepo, ProposalRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_proposal(project_id: i64, title: &str, amount: Option<f64>) -> CreateProposal {
    CreateProposal {
        project_id,
        proposer_id: 100,
        title: title.to_string(),
        scope: "Redesign the public API surface".to_string(),
        acceptance_criteria: "All endpoints documented and tested".to_string(),
        due_date: Utc::now() + Duration::days(14),
        amount,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn test_create_seeds_proposed_status(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "  API redesign  ", None))
        .await
        .unwrap();

    assert_eq!(p.status, "proposed");
    assert_eq!(p.title, "API redesign"); // stored trimmed
    assert_eq!(p.amount, None);
    assert_eq!(p.created_at, p.updated_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_accept_is_compare_and_set(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", None))
        .await
        .unwrap();

    let accepted = ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();
    assert_eq!(accepted.status, "accepted");

    // A second accept loses the compare-and-set and returns None.
    let second = ProposalRepo::accept(&pool, p.id).await.unwrap();
    assert!(second.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_accept_missing_proposal_returns_none(pool: PgPool) {
    assert!(ProposalRepo::accept(&pool, 9999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalize_copies_terms_and_flips_proposal(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(7, "API redesign", Some(1000.0)))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();

    let m = ProposalRepo::finalize(&pool, p.id, 200)
        .await
        .unwrap()
        .expect("finalize should succeed on an accepted, amounted proposal");

    assert_eq!(m.proposal_id, p.id);
    assert_eq!(m.project_id, 7);
    assert_eq!(m.finalized_by, 200);
    assert_eq!(m.title, p.title);
    assert_eq!(m.scope, p.scope);
    assert_eq!(m.acceptance_criteria, p.acceptance_criteria);
    assert_eq!(m.due_date, p.due_date);
    assert_eq!(m.amount, 1000.0);
    assert_eq!(m.escrow_status, "pending");
    assert!(!m.supervisor_gate);
    assert_eq!(m.status, "finalized");

    // The source proposal flipped in the same transaction.
    let p = ProposalRepo::find_by_id(&pool, p.id).await.unwrap().unwrap();
    assert_eq!(p.status, "finalized");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalize_requires_accepted_status(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", Some(1000.0)))
        .await
        .unwrap();

    // Still proposed: the compare-and-set finds no row and nothing is created.
    let result = ProposalRepo::finalize(&pool, p.id, 200).await.unwrap();
    assert!(result.is_none());

    let p = ProposalRepo::find_by_id(&pool, p.id).await.unwrap().unwrap();
    assert_eq!(p.status, "proposed");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_finalize_requires_positive_amount(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", None))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();

    assert!(ProposalRepo::finalize(&pool, p.id, 200).await.unwrap().is_none());

    // Setting an amount unblocks finalization; no second accept is needed.
    ProposalRepo::set_amount(&pool, p.id, 1000.0).await.unwrap().unwrap();
    let m = ProposalRepo::finalize(&pool, p.id, 200).await.unwrap().unwrap();
    assert_eq!(m.amount, 1000.0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_double_finalize_cannot_double_materialize(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", Some(500.0)))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();

    assert!(ProposalRepo::finalize(&pool, p.id, 200).await.unwrap().is_some());
    assert!(ProposalRepo::finalize(&pool, p.id, 200).await.unwrap().is_none());

    let milestones = MilestoneRepo::list(
        &pool,
        &bridgelane_db::models::milestone::MilestoneListQuery {
            project_id: Some(1),
            status: None,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(milestones.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_amount_not_mutable_after_finalize(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", Some(500.0)))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();
    ProposalRepo::finalize(&pool, p.id, 200).await.unwrap().unwrap();

    assert!(ProposalRepo::set_amount(&pool, p.id, 900.0).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_withdraw_only_while_proposed(pool: PgPool) {
    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", None))
        .await
        .unwrap();
    assert!(ProposalRepo::delete_if_proposed(&pool, p.id).await.unwrap());
    assert!(ProposalRepo::find_by_id(&pool, p.id).await.unwrap().is_none());

    let p = ProposalRepo::create(&pool, &new_proposal(1, "API redesign", None))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p.id).await.unwrap().unwrap();
    assert!(!ProposalRepo::delete_if_proposed(&pool, p.id).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_filters_by_project_and_status(pool: PgPool) {
    ProposalRepo::create(&pool, &new_proposal(1, "First proposal", None))
        .await
        .unwrap();
    let p2 = ProposalRepo::create(&pool, &new_proposal(2, "Second proposal", None))
        .await
        .unwrap();
    ProposalRepo::accept(&pool, p2.id).await.unwrap().unwrap();

    let project_one = ProposalRepo::list(
        &pool,
        &ProposalListQuery {
            project_id: Some(1),
            status: None,
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(project_one.len(), 1);

    let accepted = ProposalRepo::list(
        &pool,
        &ProposalListQuery {
            project_id: None,
            status: Some("accepted".to_string()),
            limit: None,
            offset: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, p2.id);
}
