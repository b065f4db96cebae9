//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags and their environment variables (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. Explicit `--config <path>` (must exist)
//! 2. `$SEP_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/sep/config.toml`
//! 4. `~/.sep/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use sep_tools::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Catalog: {}", config.catalog_url());
//! println!("Page size: {}", config.page_size());
//! ```

pub mod schema;

pub use schema::{BrokerDefaults, GlobalConfig, ImportDefaults};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default event catalog base URL.
pub const DEFAULT_CATALOG_URL: &str = "https://solace.cloud";

/// Default page size for catalog listings.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file '{0}' does not exist")]
    Missing(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with accessors that apply built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file
    pub global: GlobalConfig,
    /// Path the config was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is given it must point at an existing file. Otherwise
    /// the standard locations are searched and a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) if !path.exists() => return Err(ConfigError::Missing(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(),
        };

        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        global.validate()?;

        Ok(Config {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the standard locations.
    fn discover() -> Option<PathBuf> {
        // 1. Check $SEP_CONFIG
        if let Ok(path) = std::env::var("SEP_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/sep/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("sep/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.sep/config.toml
        dirs::home_dir()
            .map(|home| home.join(".sep/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path of the loaded config file, if one was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the catalog base URL, without a trailing slash.
    ///
    /// Defaults to `https://solace.cloud`.
    pub fn catalog_url(&self) -> &str {
        self.global
            .catalog_url
            .as_deref()
            .unwrap_or(DEFAULT_CATALOG_URL)
            .trim_end_matches('/')
    }

    /// Get the listing page size.
    ///
    /// Defaults to 100.
    pub fn page_size(&self) -> u32 {
        self.global.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Get the default domain for imports.
    pub fn import_domain(&self) -> &str {
        self.global
            .import
            .as_ref()
            .and_then(|i| i.domain.as_deref())
            .unwrap_or("TestDomain")
    }

    /// Get the default application for imports.
    pub fn import_application(&self) -> &str {
        self.global
            .import
            .as_ref()
            .and_then(|i| i.application.as_deref())
            .unwrap_or("TestApp")
    }

    /// Get the broker management endpoint.
    pub fn broker_host(&self) -> &str {
        self.global
            .broker
            .as_ref()
            .and_then(|b| b.host.as_deref())
            .unwrap_or("http://localhost:8080")
    }

    /// Get the message VPN name.
    pub fn broker_vpn(&self) -> &str {
        self.global
            .broker
            .as_ref()
            .and_then(|b| b.vpn.as_deref())
            .unwrap_or("default")
    }

    /// Get the broker management user.
    pub fn broker_admin_user(&self) -> &str {
        self.global
            .broker
            .as_ref()
            .and_then(|b| b.admin_user.as_deref())
            .unwrap_or("admin")
    }
}
