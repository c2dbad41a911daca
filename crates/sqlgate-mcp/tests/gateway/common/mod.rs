//! Shared test infrastructure for sqlgate gateway tests.
//!
//! This module provides:
//! - A recording executor that captures every statement it is handed
//! - Dispatcher construction against the built-in catalog
//! - Small helpers for building rows and reading envelopes

use serde_json::{Value, json};
use sqlgate_mcp::{
    CallToolOptions, Catalog, Dispatcher, Payload, ResponseEnvelope, StatementPlanner,
};
use sqlgate_runtime::{ExecutionError, ExecutionResult, Row, SqlExecutor, SqlStatement};
use std::sync::{Arc, Mutex};

// =============================================================================
// RECORDING EXECUTOR
// =============================================================================

enum Canned {
    Result(ExecutionResult),
    Failure { message: String, code: Option<u32> },
}

/// Executor that records statements and answers with a canned response.
pub struct RecordingExecutor {
    statements: Mutex<Vec<SqlStatement>>,
    response: Canned,
}

impl RecordingExecutor {
    pub fn returning(result: ExecutionResult) -> Arc<Self> {
        Arc::new(Self {
            statements: Mutex::new(Vec::new()),
            response: Canned::Result(result),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::returning(ExecutionResult::default())
    }

    pub fn failing(message: &str, code: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            statements: Mutex::new(Vec::new()),
            response: Canned::Failure {
                message: message.to_string(),
                code,
            },
        })
    }

    pub fn statements(&self) -> Vec<SqlStatement> {
        self.statements.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    pub fn last(&self) -> SqlStatement {
        self.statements
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("executor was never called")
    }
}

#[async_trait::async_trait]
impl SqlExecutor for RecordingExecutor {
    async fn execute(&self, statement: &SqlStatement) -> Result<ExecutionResult, ExecutionError> {
        self.statements.lock().unwrap().push(statement.clone());
        match &self.response {
            Canned::Result(result) => Ok(result.clone()),
            Canned::Failure { message, code } => Err(ExecutionError::Database {
                message: message.clone(),
                code: *code,
            }),
        }
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn dispatcher(executor: Arc<RecordingExecutor>) -> Dispatcher {
    let planner = StatementPlanner::new(Arc::new(Catalog::builtin()), "dbo");
    Dispatcher::new(planner, executor)
}

/// Rows from a JSON array of objects.
pub fn rows(value: Value) -> Vec<Row> {
    value
        .as_array()
        .expect("rows must be an array")
        .iter()
        .map(|row| row.as_object().expect("row must be an object").clone())
        .collect()
}

/// Dispatch a call against a fresh recording executor.
pub async fn call(
    executor: &Arc<RecordingExecutor>,
    operation: &str,
    arguments: Value,
) -> ResponseEnvelope {
    dispatcher(executor.clone())
        .dispatch(operation, &arguments, CallToolOptions::default())
        .await
}

/// SQL text the dispatcher would run for a call, via dry run.
pub async fn dry_run_sql(operation: &str, arguments: Value) -> String {
    let envelope = dispatcher(RecordingExecutor::empty())
        .dispatch(operation, &arguments, CallToolOptions { dry_run: true })
        .await;
    assert!(envelope.ok, "dry run failed: {}", envelope.render());
    json_payload(&envelope)["sql"]
        .as_str()
        .expect("dry run carries sql")
        .to_string()
}

pub fn json_payload(envelope: &ResponseEnvelope) -> Value {
    match &envelope.payload {
        Payload::Json(value) => value.clone(),
        Payload::Text(text) => json!(text),
    }
}

/// Collapse all whitespace runs to single spaces.
pub fn normalize(sql: &str) -> String {
    sql.split_whitespace().collect::<Vec<_>>().join(" ")
}
