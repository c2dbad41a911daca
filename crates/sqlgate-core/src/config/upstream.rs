//! Upstream database configuration types.
//!
//! This module defines configuration for the upstream SQL Server connection.
//! Three configuration methods are supported:
//! 1. `connection_string_env` - reference an environment variable
//! 2. `connection_string` - provide an ADO.NET connection string directly
//! 3. Individual fields (host, port, database, username, password)

use serde::{Deserialize, Serialize};

/// Configuration for the upstream SQL Server connection.
///
/// Supports three configuration methods (in order of precedence):
/// 1. Environment variable containing the full connection string
/// 2. Direct connection string
/// 3. Individual connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Environment variable name containing an ADO.NET connection string.
    /// Highest precedence.
    #[serde(default = "default_connection_string_env")]
    pub connection_string_env: String,

    /// Full ADO.NET connection string.
    /// Second precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,

    /// Hostname of the SQL Server instance.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the SQL Server instance.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name to connect to.
    #[serde(default = "default_database")]
    pub database: String,

    /// SQL login name.
    #[serde(default = "default_username")]
    pub username: String,

    /// SQL login password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Accept the server certificate without validation.
    #[serde(default)]
    pub trust_server_certificate: bool,

    /// Connection pool configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<ConnectionPoolConfig>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connection_string_env: default_connection_string_env(),
            connection_string: None,
            host: default_host(),
            port: default_port(),
            database: default_database(),
            username: default_username(),
            password: None,
            password_env: None,
            trust_server_certificate: false,
            pool: None,
        }
    }
}

/// Connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionPoolConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout in seconds when acquiring a connection.
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connection_timeout_seconds: default_connection_timeout(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    30
}

impl UpstreamConfig {
    /// Build an ADO.NET connection string from this configuration.
    ///
    /// Precedence:
    /// 1. connection_string_env (environment variable)
    /// 2. connection_string (direct string)
    /// 3. Individual fields
    pub fn connection_string(&self) -> String {
        if let Ok(value) = std::env::var(&self.connection_string_env)
            && !value.trim().is_empty()
        {
            return value;
        }

        if let Some(value) = &self.connection_string {
            return value.clone();
        }

        let mut parts = vec![
            format!("server=tcp:{},{}", self.host, self.port),
            format!("database={}", ado_value(&self.database)),
            format!("user id={}", ado_value(&self.username)),
        ];
        if let Some(password) = self.get_password() {
            parts.push(format!("password={}", ado_value(&password)));
        }
        if self.trust_server_certificate {
            parts.push("TrustServerCertificate=true".to_string());
        }
        parts.join(";")
    }

    /// Get the password, checking password_env first.
    fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }

    /// Effective pool settings.
    pub fn pool_config(&self) -> ConnectionPoolConfig {
        self.pool.clone().unwrap_or_default()
    }
}

/// Wrap a connection-string value in braces when it contains a separator.
fn ado_value(value: &str) -> String {
    if value.contains(';') || value.contains('=') || value.starts_with('{') {
        format!("{{{}}}", value.replace('}', "}}"))
    } else {
        value.to_string()
    }
}

// Default value functions
fn default_connection_string_env() -> String {
    "SQL_CONNECTION_STRING".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    1433
}

fn default_database() -> String {
    "master".to_string()
}

fn default_username() -> String {
    "sa".to_string()
}
