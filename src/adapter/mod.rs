//! Adapters: concrete implementations of the ports.

mod memory;
mod notifier;
mod seed;

pub use memory::MemoryOrderStore;
pub use notifier::BellNotifier;
pub use seed::{load_seed_file, parse_seed};
