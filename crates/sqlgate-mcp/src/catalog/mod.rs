//! The operation catalog.
//!
//! Every operation the gateway exposes is an [`OperationDefinition`] in a
//! static list. The catalog is built once at startup and shared read-only; it
//! answers name lookups and renders MCP tool definitions for `tools/list`.

mod definitions;
pub mod schema;

pub use definitions::OPERATIONS;
pub use schema::{FieldDefault, FieldKind, FieldSpec, Format, object_schema};

use crate::generators::Generator;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use std::collections::HashMap;
use std::fmt;

/// Grouping used in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ddl,
    Query,
    Metadata,
    Data,
    Diagnostics,
    Maintenance,
    Security,
    Agent,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ddl => "ddl",
            Category::Query => "query",
            Category::Metadata => "metadata",
            Category::Data => "data",
            Category::Diagnostics => "diagnostics",
            Category::Maintenance => "maintenance",
            Category::Security => "security",
            Category::Agent => "agent",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a raw execution result becomes the response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultMode {
    /// Primary row set as a JSON array.
    Rows,
    /// Fixed confirmation: `"<kind> <name> <verb> successfully."`, where the
    /// name is read from `name_field` (schema-qualified when `schemaName` is
    /// present).
    Acknowledge {
        kind: &'static str,
        name_field: &'static str,
        verb: &'static str,
    },
    /// `{recordset, rowsAffected, recordsets}`.
    QueryResult,
    /// `{recordsets, returnValue, rowsAffected}`.
    ProcedureResult,
}

/// One catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct OperationDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub arguments: &'static [FieldSpec],
    pub generator: Generator,
    pub result: ResultMode,
}

impl OperationDefinition {
    /// Whether the operation leaves data and schema untouched.
    pub fn is_read_only(&self) -> bool {
        !matches!(
            self.category,
            Category::Ddl | Category::Query | Category::Maintenance
        )
    }

    /// JSON Schema describing the arguments.
    pub fn input_schema(&self, default_schema: &str) -> serde_json::Value {
        object_schema(self.arguments, default_schema)
    }

    /// MCP tool definition for `tools/list`.
    pub fn tool_definition(&self, default_schema: &str) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            input_schema: self.input_schema(default_schema),
            annotations: Some(ToolAnnotations {
                read_only: Some(self.is_read_only()),
                dry_run_supported: Some(true),
                category: Some(self.category.as_str().to_string()),
            }),
        }
    }
}

/// Lookup of a name the catalog does not define.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown tool: {0}")]
pub struct UnknownOperation(pub String);

/// Immutable registry of operations, in definition order.
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: Vec<&'static OperationDefinition>,
    by_name: HashMap<&'static str, &'static OperationDefinition>,
}

impl Catalog {
    /// Catalog of every built-in operation.
    pub fn builtin() -> Self {
        let operations: Vec<_> = OPERATIONS.iter().collect();
        let by_name = operations.iter().map(|op| (op.name, *op)).collect();
        Self {
            operations,
            by_name,
        }
    }

    pub fn lookup(&self, name: &str) -> Result<&'static OperationDefinition, UnknownOperation> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| UnknownOperation(name.to_string()))
    }

    /// Operations in catalog order.
    pub fn operations(&self) -> impl Iterator<Item = &'static OperationDefinition> + '_ {
        self.operations.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Tool definitions for `tools/list`, in catalog order.
    pub fn tool_definitions(&self, default_schema: &str) -> Vec<ToolDefinition> {
        self.operations()
            .map(|op| op.tool_definition(default_schema))
            .collect()
    }
}
