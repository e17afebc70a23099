//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`]: Builders for orders, store documents, and fixed instants.
//! - [`clock`]: A [`Clock`](crate::port::Clock) that only moves when told to.
//! - [`notifier`]: A [`Notifier`](crate::port::Notifier) that records events.

pub mod clock;
pub mod domain;
pub mod notifier;
