//! Render command.
//!
//! `sqlgate render <operation> --args '<json>'` - Offline dry run: validate the
//! arguments and print the T-SQL and bound parameters without connecting.

use anyhow::{Context, Result};
use clap::Args;
use sqlgate_core::GatewayConfig;
use sqlgate_mcp::{PlannedCall, ResponseEnvelope, StatementPlanner};

/// Arguments for `sqlgate render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Operation name, e.g. get_table_data.
    pub name: String,

    /// Arguments as a JSON object.
    #[arg(long, default_value = "{}")]
    pub args: String,
}

pub fn run(config: &GatewayConfig, args: RenderArgs) -> Result<()> {
    let planner = super::planner(config);
    let planned = plan(&planner, &args.name, &args.args)?;
    print!("{}", render(&planned)?);
    Ok(())
}

/// Parse the JSON arguments and plan the call; failures use envelope text.
pub fn plan(planner: &StatementPlanner, name: &str, raw_args: &str) -> Result<PlannedCall> {
    let arguments: serde_json::Value =
        serde_json::from_str(raw_args).context("--args is not valid JSON")?;
    planner
        .plan(name, &arguments)
        .map_err(|e| anyhow::anyhow!("{}", ResponseEnvelope::failure(name, &e).render()))
}

/// Statement text followed by its parameters, if any.
pub fn render(planned: &PlannedCall) -> Result<String> {
    let mut out = format!("-- {}\n{}\n", planned.operation.name, planned.statement.text);
    if planned.statement.has_parameters() {
        out.push_str("\n-- parameters\n");
        out.push_str(&serde_json::to_string_pretty(&planned.statement.parameters)?);
        out.push('\n');
    }
    Ok(out)
}
