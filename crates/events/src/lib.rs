//! Bridgelane event bus and notification infrastructure.
//!
//! Lifecycle handlers publish a [`PlatformEvent`] after every successful
//! mutation; downstream consumers (notification and chat delivery, audit
//! tooling) subscribe independently. The core lifecycle crates never
//! publish -- delivery is strictly a caller-side concern.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the canonical domain event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `events` table.

pub mod bus;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use persistence::EventPersistence;
