//! Kitchenline - real-time kitchen order queues.
//!
//! Mirrors a remote collection of food orders into immutable snapshots,
//! projects them into the three kitchen work queues, and moves orders
//! through `pending -> preparing -> ready_for_pickup`.
//!
//! # Architecture
//!
//! - **`domain`** - Pure types and rules: orders, snapshots, the projection
//!   engine, the overdue classifier, the status state machine, and the
//!   new-order detector. No I/O.
//! - **`port`** - Traits for the order store, the clock, and alert sinks.
//! - **`adapter`** - The in-memory order store, the terminal bell, and
//!   seed-file loading.
//! - **`app`** - The stream subscriber, the command controllers, and the
//!   [`app::KitchenEngine`] facade.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`cli`] - Command-line handlers for the `kitchenline` binary
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use kitchenline::adapter::MemoryOrderStore;
//! use kitchenline::app::{EngineConfig, KitchenEngine};
//! use kitchenline::domain::SortMode;
//! use kitchenline::port::{LogNotifier, SystemClock};
//!
//! # async fn demo() -> kitchenline::error::Result<()> {
//! let store = MemoryOrderStore::new();
//! let engine = KitchenEngine::start(
//!     Arc::new(store),
//!     Arc::new(LogNotifier),
//!     Arc::new(SystemClock),
//!     EngineConfig::default(),
//! )
//! .await?;
//! let queues = engine.project(false, SortMode::PlacedDesc);
//! println!("{} new orders", queues.new_orders.len());
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
