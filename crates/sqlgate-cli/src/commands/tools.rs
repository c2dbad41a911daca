//! Tools introspection commands.
//!
//! `sqlgate tools list` - List the operation catalog.
//! `sqlgate tools describe` - Show the input schema for one operation.

use anyhow::Result;
use sqlgate_core::GatewayConfig;

/// List every operation in catalog order.
pub fn list(config: &GatewayConfig, verbose: bool) -> Result<()> {
    let planner = super::planner(config);
    let tools = planner.catalog().tool_definitions(planner.default_schema());

    println!("\nAvailable Tools ({}):", tools.len());

    for tool in &tools {
        let annotations = tool.annotations.as_ref();
        let read_only = annotations.is_some_and(|a| a.read_only == Some(true));
        let category = annotations
            .and_then(|a| a.category.as_deref())
            .unwrap_or("-");

        let access = if read_only { "read" } else { "write" };
        println!("   • {} ({}, {})", tool.name, category, access);

        if let Some(desc) = &tool.description {
            println!("     {}", desc);
        }

        if verbose {
            println!(
                "     Schema: {}",
                serde_json::to_string_pretty(&tool.input_schema)?
            );
        }
    }

    println!();
    Ok(())
}

/// Show detailed schema for a specific operation.
pub fn describe(config: &GatewayConfig, tool_name: &str) -> Result<()> {
    let planner = super::planner(config);
    let operation = planner
        .catalog()
        .lookup(tool_name)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let tool = operation.tool_definition(planner.default_schema());

    println!("\nTool: {}", tool.name);

    if let Some(desc) = &tool.description {
        println!("\nDescription: {}", desc);
    }

    println!("\nInput Schema:");
    println!("{}", serde_json::to_string_pretty(&tool.input_schema)?);

    if let Some(annotations) = &tool.annotations {
        println!("\nAnnotations:");
        if let Some(category) = &annotations.category {
            println!("  • category: {}", category);
        }
        if let Some(read_only) = annotations.read_only {
            println!("  • readOnly: {}", read_only);
        }
        if let Some(true) = annotations.dry_run_supported {
            println!("  • dryRunSupported: true");
        }
    }

    println!();
    Ok(())
}
