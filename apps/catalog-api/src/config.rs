//! Catalog API configuration module.
//!
//! Configuration is layered: built-in defaults, then a TOML file, then
//! `CATALOG__*` environment variables (`__` separates nested keys).
//!
//! ```text
//! CATALOG_CONFIG=/etc/catalog.toml      file location (see default_config_path)
//! CATALOG__SERVER__PORT=9090            → server.port
//! CATALOG__DATABASE__PATH=/data/c.db    → database.path
//! ```

use catalog_core::discount::DiscountRuleConfig;
use catalog_db::DEFAULT_DATABASE_PATH;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/catalog.toml";

/// The configuration shipped with this crate.
const SHIPPED_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/catalog.toml");

const ENV_PREFIX: &str = "CATALOG";

/// Catalog API configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub discount: DiscountConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// Upper bound on one catalog query, in milliseconds
    pub query_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            query_timeout_ms: 5_000,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file path
    pub path: PathBuf,

    /// Pool size
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from(DEFAULT_DATABASE_PATH),
            max_connections: 5,
        }
    }
}

/// Discount rules in declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscountConfig {
    pub rules: Vec<DiscountRuleConfig>,
}

impl AppConfig {
    /// Loads configuration from the file named by `CATALOG_CONFIG`, or from
    /// [`default_config_path`], with environment overrides on top.
    ///
    /// The file must exist either way.
    pub fn load() -> Result<Self, ConfigError> {
        let path = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_config_path(),
        };
        Self::load_from(&path, true)
    }

    /// Loads configuration from `path`, with environment overrides on top.
    pub fn load_from(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(required));
        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// `config/catalog.toml` under the working directory when it exists,
/// otherwise the file shipped in this crate's source tree.
pub fn default_config_path() -> PathBuf {
    let local = PathBuf::from(DEFAULT_CONFIG_PATH);
    if local.is_file() {
        local
    } else {
        PathBuf::from(SHIPPED_CONFIG_PATH)
    }
}
