//! Configuration types for the sqlgate command gateway.
//!
//! Configuration is loaded from a single YAML file (`sqlgate.yaml` by default)
//! into a [`GatewayConfig`]. Every section is optional; missing values fall back
//! to the defaults documented on each field.
//!
//! # Sections
//!
//! - **upstream**: SQL Server connection settings and pool sizing
//! - **mcp**: transport selection (stdio or HTTP)
//! - **catalog**: defaults applied to operation arguments (e.g. the default schema)
//! - **execution**: per-call execution limits
//! - **logging**: tracing filter used when `RUST_LOG` is not set

pub mod mcp;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use mcp::{McpConfig, Transport};
pub use upstream::{ConnectionPoolConfig, UpstreamConfig};

/// Complete gateway configuration loaded from a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Upstream SQL Server connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Operation catalog defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Execution limits.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults applied by the validator when optional arguments are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Schema used by schema-scoped operations when `schemaName` is omitted.
    #[serde(default = "default_schema")]
    pub default_schema: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_schema: default_schema(),
        }
    }
}

/// Limits applied to each database round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum time a single statement may run before the call fails.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl ExecutionConfig {
    /// The statement timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

// Default value functions
fn default_schema() -> String {
    "dbo".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.default_schema.trim().is_empty() {
            return Err(ConfigError::Config(
                "catalog.default_schema must not be empty".to_string(),
            ));
        }
        if self.execution.timeout_seconds == 0 {
            return Err(ConfigError::Config(
                "execution.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if let Some(pool) = &self.upstream.pool
            && pool.max_connections == 0
        {
            return Err(ConfigError::Config(
                "upstream.pool.max_connections must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
