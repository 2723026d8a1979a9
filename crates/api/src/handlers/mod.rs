pub mod milestones;
pub mod proposals;
pub mod reputation;
