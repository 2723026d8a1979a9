//! Bridgelane domain core.
//!
//! Pure domain logic for the milestone negotiation platform: status
//! constants, transition rules, input validation, and reputation scoring.
//! This crate performs no I/O -- persistence lives in `bridgelane-db` and
//! the HTTP boundary in `bridgelane-api`.

pub mod error;
pub mod milestone;
pub mod pagination;
pub mod proposal;
pub mod reputation;
pub mod submission;
pub mod types;
