//! Call dispatch: lookup, validate, generate, execute, format.
//!
//! [`StatementPlanner`] covers the synchronous half (lookup, validation and
//! generation) and is usable without a database. [`Dispatcher`] adds execution
//! through a [`SqlExecutor`] and turns every outcome into a
//! [`ResponseEnvelope`].

use crate::catalog::{Catalog, OperationDefinition, ResultMode};
use crate::envelope::{DispatchError, ResponseEnvelope};
use crate::generators::query::RETURN_VALUE_COLUMN;
use crate::protocol::{CallToolOptions, DryRunResult};
use crate::sql;
use crate::validator::{ArgumentValidator, ValidatedArguments};
use serde_json::{Value, json};
use sqlgate_runtime::{ExecutionError, ExecutionResult, Row, SqlExecutor, SqlStatement};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Default per-statement execution timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// A call that passed validation and generation.
#[derive(Debug, Clone)]
pub struct PlannedCall {
    pub operation: &'static OperationDefinition,
    pub arguments: ValidatedArguments,
    pub statement: SqlStatement,
}

/// Lookup, validation and statement generation.
#[derive(Debug, Clone)]
pub struct StatementPlanner {
    catalog: Arc<Catalog>,
    default_schema: String,
}

impl StatementPlanner {
    pub fn new(catalog: Arc<Catalog>, default_schema: impl Into<String>) -> Self {
        Self {
            catalog,
            default_schema: default_schema.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    /// Resolve `name`, validate `arguments` and generate the statement.
    pub fn plan(&self, name: &str, arguments: &Value) -> Result<PlannedCall, DispatchError> {
        let operation = self.catalog.lookup(name)?;
        let arguments = ArgumentValidator::new(&self.default_schema).validate(operation, arguments)?;
        let statement = (operation.generator)(&arguments)?;
        Ok(PlannedCall {
            operation,
            arguments,
            statement,
        })
    }
}

/// Runs calls end to end. Holds no per-call state; safe to share.
pub struct Dispatcher {
    planner: StatementPlanner,
    executor: Arc<dyn SqlExecutor>,
    timeout: Duration,
    cancellation: CancellationToken,
}

impl Dispatcher {
    pub fn new(planner: StatementPlanner, executor: Arc<dyn SqlExecutor>) -> Self {
        Self {
            planner,
            executor,
            timeout: DEFAULT_TIMEOUT,
            cancellation: CancellationToken::new(),
        }
    }

    /// Set the per-statement execution timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Abandon in-flight statements once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn planner(&self) -> &StatementPlanner {
        &self.planner
    }

    pub fn catalog(&self) -> &Catalog {
        self.planner.catalog()
    }

    /// Dispatch one call. Never fails; errors become failure envelopes.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &Value,
        options: CallToolOptions,
    ) -> ResponseEnvelope {
        let call_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("call", tool = %name, call_id = %call_id);

        async {
            let started = Instant::now();
            match self.run(name, arguments, options).await {
                Ok(envelope) => {
                    tracing::info!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        dry_run = options.dry_run,
                        "Call completed"
                    );
                    envelope
                }
                Err(error) => {
                    tracing::warn!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        classification = %error.kind(),
                        error = %error,
                        "Call failed"
                    );
                    ResponseEnvelope::failure(name, &error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        name: &str,
        arguments: &Value,
        options: CallToolOptions,
    ) -> Result<ResponseEnvelope, DispatchError> {
        let planned = self.planner.plan(name, arguments)?;
        tracing::debug!(
            sql = %planned.statement.text,
            parameters = planned.statement.parameters.len(),
            "Generated statement"
        );

        if options.dry_run {
            return Ok(dry_run(&planned));
        }

        let result = self.execute(&planned.statement).await?;
        Ok(format_result(planned.operation, &planned.arguments, result))
    }

    async fn execute(&self, statement: &SqlStatement) -> Result<ExecutionResult, ExecutionError> {
        tokio::select! {
            _ = self.cancellation.cancelled() => Err(ExecutionError::Cancelled),
            outcome = tokio::time::timeout(self.timeout, self.executor.execute(statement)) => {
                match outcome {
                    Ok(result) => result,
                    Err(_) => Err(ExecutionError::Timeout(self.timeout)),
                }
            }
        }
    }
}

/// Envelope describing the statement without running it.
pub fn dry_run(planned: &PlannedCall) -> ResponseEnvelope {
    let result = DryRunResult {
        dry_run: true,
        operation: planned.operation.name.to_string(),
        sql: planned.statement.text.clone(),
        parameters: json!(planned.statement.parameters),
    };
    ResponseEnvelope::json(json!(result))
}

/// Map a raw execution result to the operation's response shape.
pub fn format_result(
    operation: &OperationDefinition,
    arguments: &ValidatedArguments,
    result: ExecutionResult,
) -> ResponseEnvelope {
    match operation.result {
        ResultMode::Rows => ResponseEnvelope::json(json!(result.rows())),
        ResultMode::Acknowledge {
            kind,
            name_field,
            verb,
        } => ResponseEnvelope::text(format!(
            "{} {} {} successfully.",
            kind,
            display_name(arguments, name_field),
            verb
        )),
        ResultMode::QueryResult => ResponseEnvelope::json(json!({
            "recordset": result.rows(),
            "rowsAffected": result.rows_affected,
            "recordsets": result.result_set_count().max(1),
        })),
        ResultMode::ProcedureResult => {
            let rows_affected = result.rows_affected;
            let (recordsets, return_value) = split_return_value(result.result_sets);
            ResponseEnvelope::json(json!({
                "recordsets": recordsets,
                "returnValue": return_value,
                "rowsAffected": rows_affected,
            }))
        }
    }
}

/// Separate the trailing return-status row emitted after `EXEC`.
fn split_return_value(mut result_sets: Vec<Vec<Row>>) -> (Vec<Vec<Row>>, Value) {
    let is_status = result_sets.last().is_some_and(|set| {
        set.len() == 1 && set[0].len() == 1 && set[0].contains_key(RETURN_VALUE_COLUMN)
    });
    if !is_status {
        return (result_sets, Value::Null);
    }
    let return_value = result_sets
        .pop()
        .and_then(|set| set.into_iter().next())
        .and_then(|row| row.get(RETURN_VALUE_COLUMN).cloned())
        .unwrap_or(Value::Null);
    (result_sets, return_value)
}

fn display_name(arguments: &ValidatedArguments, name_field: &str) -> String {
    let Some(name) = arguments.text(name_field) else {
        return "(current)".to_string();
    };
    let quoted = match arguments.text("schemaName") {
        Some(schema) => sql::qualified_name(schema, name),
        None => sql::quote_identifier(name),
    };
    quoted.unwrap_or_else(|_| name.to_string())
}
