//! Kitchen board, store, and alert settings.

use std::path::PathBuf;

use serde::Deserialize;

use crate::adapter::BellNotifier;
use crate::domain::{OrderKind, OverdueClassifier, SortMode, DEFAULT_OVERDUE_MINUTES};
use crate::port::{LogNotifier, NotifierRegistry};

const fn default_true() -> bool {
    true
}

const fn default_overdue_minutes() -> i64 {
    DEFAULT_OVERDUE_MINUTES
}

/// Board behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct KitchenConfig {
    /// Minutes after placement before an active order counts as overdue.
    #[serde(default = "default_overdue_minutes")]
    pub overdue_threshold_minutes: i64,
    #[serde(default)]
    pub default_sort: SortMode,
    /// Start the board with only overdue orders shown.
    #[serde(default)]
    pub overdue_only: bool,
}

impl KitchenConfig {
    #[must_use]
    pub fn overdue(&self) -> OverdueClassifier {
        OverdueClassifier::from_minutes(self.overdue_threshold_minutes)
    }
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            overdue_threshold_minutes: default_overdue_minutes(),
            default_sort: SortMode::default(),
            overdue_only: false,
        }
    }
}

/// Order store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    /// JSON array of order documents loaded into the in-memory store.
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
    /// Which `type` of order the kitchen mirrors.
    #[serde(default)]
    pub order_type: OrderKind,
}

/// New-order alert sinks.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Ring the terminal bell when new orders arrive.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Log alerts and feed errors.
    #[serde(default = "default_true")]
    pub log: bool,
}

impl NotificationConfig {
    /// Registry with every enabled sink. An empty registry is valid.
    #[must_use]
    pub fn build_registry(&self) -> NotifierRegistry {
        let mut registry = NotifierRegistry::new();
        if self.log {
            registry.register(Box::new(LogNotifier));
        }
        if self.bell {
            registry.register(Box::new(BellNotifier));
        }
        registry
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            bell: default_true(),
            log: default_true(),
        }
    }
}
