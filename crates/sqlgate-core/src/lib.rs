//! # sqlgate-core
//!
//! Configuration types shared by every sqlgate crate. The gateway is configured
//! from a single YAML file (`sqlgate.yaml`) whose sections map onto the structs
//! in [`config`].

// Configuration types shared across all sqlgate crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{
    CatalogConfig, ConfigError, ConnectionPoolConfig, ExecutionConfig, GatewayConfig,
    LoggingConfig, McpConfig, Transport, UpstreamConfig,
};
