//! Statement execution against a pooled SQL Server connection.

use crate::config::{MssqlClient, MssqlConnection, MssqlPool, build_pool};
use crate::params::{self, Bound};
use crate::query::{execution_error, is_modification, row_to_json, split_showplan};
use async_trait::async_trait;
use sqlgate_core::config::UpstreamConfig;
use sqlgate_runtime::{ExecutionError, ExecutionResult, Row, SqlExecutor, SqlStatement};
use std::time::Instant;

/// [`SqlExecutor`] backed by a bb8 pool of tiberius clients.
#[derive(Clone)]
pub struct MssqlExecutor {
    pool: MssqlPool,
}

impl MssqlExecutor {
    /// Build the pool and verify connectivity.
    pub async fn connect(upstream: &UpstreamConfig) -> anyhow::Result<Self> {
        Ok(Self::from_pool(build_pool(upstream).await?))
    }

    pub fn from_pool(pool: MssqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SqlExecutor for MssqlExecutor {
    async fn execute(&self, statement: &SqlStatement) -> Result<ExecutionResult, ExecutionError> {
        let bound = params::bind(statement)?;
        let started = Instant::now();

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ExecutionError::Connection(e.to_string()))?;
        let acquired_ms = started.elapsed().as_millis() as u64;

        let showplan = if bound.is_parameterized() {
            None
        } else {
            split_showplan(&bound.text)
        };

        let result = if is_modification(&statement.text) {
            run_modification(&mut conn, bound).await
        } else if let Some((on, body, off)) = showplan {
            run_showplan(&mut conn, &on, &body, &off).await
        } else {
            run_query(&mut conn, bound).await
        };

        match &result {
            Ok(result) => tracing::debug!(
                acquired_ms,
                elapsed_ms = started.elapsed().as_millis() as u64,
                result_sets = result.result_set_count(),
                rows_affected = result.rows_affected,
                "Statement executed"
            ),
            Err(error) => tracing::debug!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %error,
                "Statement failed"
            ),
        }
        result
    }
}

async fn run_modification(
    conn: &mut MssqlClient,
    bound: Bound,
) -> Result<ExecutionResult, ExecutionError> {
    let outcome = bound.into_query().execute(conn).await.map_err(execution_error)?;
    Ok(ExecutionResult::affected(outcome.total()))
}

async fn run_query(conn: &mut MssqlClient, bound: Bound) -> Result<ExecutionResult, ExecutionError> {
    let result_sets = if bound.is_parameterized() {
        bound
            .into_query()
            .query(conn)
            .await
            .map_err(execution_error)?
            .into_results()
            .await
            .map_err(execution_error)?
    } else {
        conn.simple_query(bound.text)
            .await
            .map_err(execution_error)?
            .into_results()
            .await
            .map_err(execution_error)?
    };

    Ok(ExecutionResult {
        result_sets: result_sets.into_iter().map(into_rows).collect(),
        rows_affected: 0,
    })
}

// Plan options only take effect as the sole statement of a batch. The session
// stays marked until the reset completes, so a dropped or failed call gets the
// connection discarded by the pool.
async fn run_showplan(
    conn: &mut MssqlConnection,
    on: &str,
    body: &str,
    off: &str,
) -> Result<ExecutionResult, ExecutionError> {
    conn.session.enter_plan_mode();
    conn.simple_query(on)
        .await
        .map_err(execution_error)?
        .into_results()
        .await
        .map_err(execution_error)?;

    let plan = match conn.simple_query(body).await {
        Ok(stream) => stream.into_results().await.map_err(execution_error),
        Err(e) => Err(execution_error(e)),
    };

    let reset = match conn.simple_query(off).await {
        Ok(stream) => stream.into_results().await.map(|_| ()),
        Err(e) => Err(e),
    };
    match reset {
        Ok(()) => conn.session.leave_plan_mode(),
        Err(e) => tracing::warn!(
            error = %e,
            "Failed to reset plan option; connection will be discarded"
        ),
    }

    Ok(ExecutionResult {
        result_sets: plan?.into_iter().map(into_rows).collect(),
        rows_affected: 0,
    })
}

fn into_rows(rows: Vec<tiberius::Row>) -> Vec<Row> {
    rows.into_iter().map(row_to_json).collect()
}
