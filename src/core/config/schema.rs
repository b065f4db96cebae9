//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing: URLs must be `http://` or
//! `https://`, the page size must be accepted by the catalog, and names
//! cannot be empty.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Largest page size the catalog accepts for listings.
pub const MAX_PAGE_SIZE: u32 = 100;

/// User configuration.
///
/// # Example
///
/// ```toml
/// catalog_url = "https://solace.cloud"
/// page_size = 100
///
/// [import]
/// domain = "Petstore"
/// application = "PetService"
///
/// [broker]
/// host = "http://localhost:8080"
/// vpn = "default"
/// admin_user = "admin"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Base URL of the event catalog API
    pub catalog_url: Option<String>,

    /// Page size for catalog listings
    pub page_size: Option<u32>,

    /// Import defaults
    pub import: Option<ImportDefaults>,

    /// Broker management defaults
    pub broker: Option<BrokerDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.catalog_url {
            validate_url("catalog_url", url)?;
        }

        if let Some(size) = self.page_size {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(ConfigError::InvalidValue(format!(
                    "page_size must be between 1 and {}, got {}",
                    MAX_PAGE_SIZE, size
                )));
            }
        }

        if let Some(import) = &self.import {
            import.validate()?;
        }

        if let Some(broker) = &self.broker {
            broker.validate()?;
        }

        Ok(())
    }
}

/// Defaults for `import-openapi`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ImportDefaults {
    /// Application domain to import into
    pub domain: Option<String>,
    /// Application to create or update
    pub application: Option<String>,
}

impl ImportDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_name("import.domain", self.domain.as_deref())?;
        validate_name("import.application", self.application.as_deref())
    }
}

/// Defaults for `create-queue`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BrokerDefaults {
    /// Management endpoint of the broker
    pub host: Option<String>,
    /// Message VPN name
    pub vpn: Option<String>,
    /// Management user name
    pub admin_user: Option<String>,
}

impl BrokerDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.host {
            validate_url("broker.host", host)?;
        }
        validate_name("broker.vpn", self.vpn.as_deref())?;
        validate_name("broker.admin_user", self.admin_user.as_deref())
    }
}

fn validate_url(key: &str, url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "{} must be an http:// or https:// URL, got '{}'",
            key, url
        )))
    }
}

fn validate_name(key: &str, value: Option<&str>) -> Result<(), ConfigError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(ConfigError::InvalidValue(format!(
            "{} cannot be empty",
            key
        ))),
        _ => Ok(()),
    }
}
