//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::error::{ConfigError, LedgerResult};
use crate::core::trip::MAX_RATE_PER_UNIT;
use crate::core::validation::validators;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:3000`
    pub bind: String,

    /// Per-request timeout applied at the HTTP boundary
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Pricing defaults applied at trip creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// RWF per shipment unit when the input gives no rate
    pub default_rate_per_unit: u64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_rate_per_unit: 500,
        }
    }
}

/// Contact used on trips synchronised from orders that carry none
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderContact {
    pub name: String,
    pub phone: String,
}

impl Default for PlaceholderContact {
    fn default() -> Self {
        Self {
            name: "Contact pending".to_string(),
            phone: "+250700000000".to_string(),
        }
    }
}

/// Complete configuration for the trip ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub server: ServerConfig,

    pub pricing: PricingConfig,

    /// Prefix of human-readable trip ids (`TRIP-20240315-001`)
    pub display_id_prefix: String,

    /// Re-reads allowed when a write loses an optimistic-concurrency race
    pub max_write_retries: u32,

    /// Buffer size of the trip event bus
    pub event_capacity: usize,

    pub placeholder_contact: PlaceholderContact,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            pricing: PricingConfig::default(),
            display_id_prefix: "TRIP".to_string(),
            max_write_retries: 8,
            event_capacity: 1024,
            placeholder_contact: PlaceholderContact::default(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            },
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;

        tracing::debug!(path, "loaded ledger configuration");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> LedgerResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the ledger cannot operate with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_RATE_PER_UNIT).contains(&self.pricing.default_rate_per_unit) {
            return Err(invalid(
                "pricing.default_rate_per_unit",
                &format!("must be between 1 and {}", MAX_RATE_PER_UNIT),
            ));
        }
        if let Err(message) = validators::phone(&self.placeholder_contact.phone) {
            return Err(invalid("placeholder_contact.phone", &message));
        }
        if self.placeholder_contact.name.trim().is_empty() {
            return Err(invalid("placeholder_contact.name", "must not be blank"));
        }
        if self.display_id_prefix.trim().is_empty() {
            return Err(invalid("display_id_prefix", "must not be blank"));
        }
        if self.event_capacity == 0 {
            return Err(invalid("event_capacity", "must be at least 1"));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(invalid("server.request_timeout_secs", "must be at least 1"));
        }
        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(invalid(
                "server.bind",
                &format!("'{}' is not a socket address", self.server.bind),
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
