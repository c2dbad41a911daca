use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

/// A single result row keyed by column name, in column order.
pub type Row = Map<String, Value>;

/// SQL text plus the named parameters bound to it.
///
/// Parameter names are stored without the leading `@`; the text refers to them
/// as `@name`. Only data values are ever bound; identifiers are quoted into the
/// text by the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SqlStatement {
    pub text: String,
    pub parameters: BTreeMap<String, Value>,
}

impl SqlStatement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Bind a named parameter, returning the statement for chaining.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bind(name, value);
        self
    }

    /// Bind a named parameter. A leading `@` on the name is stripped.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let name = name.strip_prefix('@').map(str::to_string).unwrap_or(name);
        self.parameters.insert(name, value.into());
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// Raw outcome of running one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutionResult {
    /// Every result set produced, in order.
    pub result_sets: Vec<Vec<Row>>,
    /// Rows affected as reported by the server.
    pub rows_affected: u64,
}

impl ExecutionResult {
    /// Result with a single row set.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self {
            result_sets: vec![rows],
            rows_affected: 0,
        }
    }

    /// Result of a statement that produced no row set.
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            result_sets: Vec::new(),
            rows_affected,
        }
    }

    /// The primary (first) row set, empty when the statement returned none.
    pub fn rows(&self) -> &[Row] {
        self.result_sets.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn result_set_count(&self) -> usize {
        self.result_sets.len()
    }
}

/// Failure reported by an executor.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    /// The server rejected or failed to run the statement.
    #[error("{message}")]
    Database { message: String, code: Option<u32> },

    /// No connection could be obtained.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A bound parameter could not be converted to a SQL value.
    #[error("invalid parameter @{name}: {reason}")]
    Parameter { name: String, reason: String },

    /// The statement exceeded the configured timeout.
    #[error("statement timed out after {0:?}")]
    Timeout(Duration),

    /// The call was cancelled before the statement completed.
    #[error("statement execution was cancelled")]
    Cancelled,
}

impl ExecutionError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            code: None,
        }
    }
}

/// Anything able to run SQL text with named parameters.
///
/// Implementations own their connections; callers borrow the executor for the
/// duration of one statement.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, statement: &SqlStatement) -> Result<ExecutionResult, ExecutionError>;
}
