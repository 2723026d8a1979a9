//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. State transitions are
//! guarded with compare-and-set UPDATEs so a stale writer loses instead
//! of clobbering a concurrent transition.

pub mod event_repo;
pub mod milestone_repo;
pub mod portfolio_repo;
pub mod proposal_repo;
pub mod submission_repo;

pub use event_repo::EventRepo;
pub use milestone_repo::MilestoneRepo;
pub use portfolio_repo::PortfolioRepo;
pub use proposal_repo::ProposalRepo;
pub use submission_repo::SubmissionRepo;
