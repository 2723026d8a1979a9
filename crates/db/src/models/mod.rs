//! Entity models and DTOs.

pub mod event;
pub mod milestone;
pub mod portfolio;
pub mod proposal;
pub mod submission;
