//! CLI command implementations for the sqlgate gateway.

pub mod render;
pub mod serve;
pub mod tools;

use sqlgate_core::GatewayConfig;
use sqlgate_mcp::{Catalog, StatementPlanner};
use std::sync::Arc;

/// Planner over the built-in catalog, using the configured default schema.
pub fn planner(config: &GatewayConfig) -> StatementPlanner {
    StatementPlanner::new(
        Arc::new(Catalog::builtin()),
        config.catalog.default_schema.clone(),
    )
}
