//! Configuration management for the Store Fulfillment server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with SFW_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{NotificationConfig, DEFAULT_BILLED_TO};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Fulfillment notification configuration
    pub fulfillment: FulfillmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FulfillmentConfig {
    /// Times the notification is shown before it becomes mandatory
    pub max_displays: u32,

    /// Seconds a skipped notification stays hidden
    pub popup_interval_seconds: f64,

    /// Whether the associate may skip at all
    pub skippable: bool,

    /// Default party for short-line invoices
    pub billed_to: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SFW_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("fulfillment.max_displays", 3)?
            .set_default("fulfillment.popup_interval_seconds", 2.0)?
            .set_default("fulfillment.skippable", true)?
            .set_default("fulfillment.billed_to", DEFAULT_BILLED_TO)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SFW_ prefix)
            .add_source(
                Environment::with_prefix("SFW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl FulfillmentConfig {
    /// Validated notification limits for the workflow
    pub fn notification(&self) -> Result<NotificationConfig, shared::ConfigError> {
        NotificationConfig::new(self.max_displays, self.popup_interval_seconds, self.skippable)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            fulfillment: FulfillmentConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        let notification = NotificationConfig::default();
        Self {
            max_displays: notification.max_displays,
            popup_interval_seconds: notification.popup_interval_seconds,
            skippable: notification.skippable,
            billed_to: DEFAULT_BILLED_TO.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fulfillment_config_is_valid() {
        let notification = FulfillmentConfig::default().notification().unwrap();
        assert_eq!(notification.max_displays, 3);
        assert!(notification.skippable);
    }

    #[test]
    fn test_zero_max_displays_rejected() {
        let config = FulfillmentConfig {
            max_displays: 0,
            ..Default::default()
        };
        assert!(config.notification().is_err());
    }
}
