//! Configuration management for the back office server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BO_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::Language;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Business rules that vary per shop
    pub business: BusinessConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Apply pending migrations at start-up
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessConfig {
    /// VAT applied to order subtotals
    pub tax_rate: Decimal,

    pub currency: String,

    /// Open orders due within this many days raise a dashboard alert
    pub deadline_alert_days: i64,

    /// Leads younger than this many days count as new
    pub new_lead_window_days: i64,

    pub palette_results_per_kind: usize,

    /// Language code used for labels in exports and notices
    pub default_language: String,
}

impl BusinessConfig {
    pub fn language(&self) -> Language {
        Language::from_code(&self.default_language).unwrap_or_default()
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            tax_rate: shared::default_tax_rate(),
            currency: "ILS".to_string(),
            deadline_alert_days: 3,
            new_lead_window_days: 7,
            palette_results_per_kind: 5,
            default_language: "he".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BO_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let run_migrations = environment == "development";

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            // An empty URL runs the server on in-memory stores
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.run_migrations", run_migrations)?
            .set_default("business.tax_rate", "0.17")?
            .set_default("business.currency", "ILS")?
            .set_default("business.deadline_alert_days", 3)?
            .set_default("business.new_lead_window_days", 7)?
            .set_default("business.palette_results_per_kind", 5)?
            .set_default("business.default_language", "he")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BO_ prefix)
            .add_source(
                Environment::with_prefix("BO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// In-process configuration with no database, used by tests and demo mode
    pub fn in_memory() -> Self {
        Self {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
                min_connections: 0,
                run_migrations: false,
            },
            business: BusinessConfig::default(),
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
