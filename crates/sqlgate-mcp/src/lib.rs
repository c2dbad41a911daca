//! # sqlgate-mcp
//!
//! MCP (Model Context Protocol) gateway exposing a fixed catalog of SQL Server
//! administration and query operations as typed tools for AI agents.
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP protocol (tools/list, tools/call)
//!       ▼
//! ┌────────────────────────┐
//! │  sqlgate MCP server    │
//! │  1. Look up operation  │  ← catalog
//! │  2. Validate arguments │  ← validator
//! │  3. Generate T-SQL     │  ← generators + sql quoting
//! │  4. Dry-run or execute │  ← SqlExecutor (sqlgate-runtime)
//! │  5. Envelope result    │  ← envelope
//! └───────────┬────────────┘
//!             │
//!             ▼
//!       SQL Server
//! ```
//!
//! Identifiers are always bracket-quoted and data values are bound as named
//! parameters. A handful of arguments (`whereClause`, `orderBy`, view and
//! function bodies, ad-hoc queries) are spliced verbatim; every such site
//! goes through [`sql::splice_raw`].

pub mod catalog;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod generators;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod sql;
pub mod validator;

// Re-export main types
pub use catalog::{Catalog, Category, OperationDefinition, ResultMode, UnknownOperation};
pub use dispatcher::{Dispatcher, PlannedCall, StatementPlanner};
pub use envelope::{DispatchError, FailureKind, Payload, ResponseEnvelope};
pub use error::McpError;
pub use protocol::{
    CallToolOptions, CallToolParams, DryRunResult, JsonRpcRequest, JsonRpcResponse,
    ToolAnnotations, ToolContent, ToolDefinition,
};
pub use server::McpServer;
pub use validator::{ArgumentValidator, ValidatedArguments, ValidationError, ValidationErrorKind};
