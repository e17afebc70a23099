//! Application configuration loading and validation.
//!
//! Configuration is read from a TOML file. Every section is optional and
//! falls back to its defaults.
//!
//! # Example
//!
//! ```no_run
//! use kitchenline::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

mod kitchen;
mod logging;

use std::path::Path;

use serde::Deserialize;

use crate::app::EngineConfig;
use crate::domain::{OrderKind, MAX_OVERDUE_MINUTES};
use crate::error::{ConfigError, Result};

pub use kitchen::{KitchenConfig, NotificationConfig, StoreConfig};
pub use logging::LoggingConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub kitchen: KitchenConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.kitchen.overdue_threshold_minutes < 1 {
            return Err(ConfigError::InvalidValue {
                field: "overdue_threshold_minutes",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if self.kitchen.overdue_threshold_minutes > MAX_OVERDUE_MINUTES {
            return Err(ConfigError::InvalidValue {
                field: "overdue_threshold_minutes",
                reason: format!("must be at most {MAX_OVERDUE_MINUTES}"),
            }
            .into());
        }
        if self.store.order_type == OrderKind::Other {
            return Err(ConfigError::InvalidValue {
                field: "order_type",
                reason: "must be food or drink".to_string(),
            }
            .into());
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Engine settings derived from the kitchen and store sections.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            order_kind: self.store.order_type,
            overdue: self.kitchen.overdue(),
        }
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortMode;
    use crate::error::Error;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.kitchen.overdue_threshold_minutes, 15);
        assert_eq!(config.kitchen.default_sort, SortMode::PlacedDesc);
        assert_eq!(config.store.order_type, OrderKind::Food);
        assert!(config.notifications.bell);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn reads_every_section() {
        let config = Config::parse_toml(
            r#"
            [logging]
            level = "debug"
            format = "json"

            [kitchen]
            overdue_threshold_minutes = 20
            default_sort = "eta_asc"
            overdue_only = true

            [store]
            seed_file = "demo/orders.json"

            [notifications]
            bell = false
            "#,
        )
        .unwrap();
        assert_eq!(config.kitchen.default_sort, SortMode::EtaAsc);
        assert!(config.kitchen.overdue_only);
        assert_eq!(config.engine_config().overdue.threshold().num_minutes(), 20);
        assert_eq!(
            config.store.seed_file.as_deref(),
            Some(Path::new("demo/orders.json"))
        );
        assert_eq!(config.notifications.build_registry().len(), 1);
    }

    #[test]
    fn rejects_zero_threshold() {
        let err = Config::parse_toml("[kitchen]\noverdue_threshold_minutes = 0\n").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidValue {
                field: "overdue_threshold_minutes",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_sort_mode() {
        let err = Config::parse_toml("[kitchen]\ndefault_sort = \"random\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }
}
