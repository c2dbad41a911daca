//! Dispatch pipeline tests.
//!
//! Local failures (unknown operation, bad arguments, unbuildable statements)
//! must be reported without touching the executor; executor failures must
//! still come back as envelopes.

use super::common::*;
use serde_json::json;
use sqlgate_mcp::{FailureKind, Payload, ValidationErrorKind};
use sqlgate_runtime::ExecutionResult;

// =============================================================================
// LOCAL FAILURES
// =============================================================================

#[tokio::test]
async fn test_unknown_operation_never_executes() {
    let executor = RecordingExecutor::empty();
    let envelope = call(&executor, "drop_database", json!({ "databaseName": "x" })).await;

    assert!(!envelope.ok);
    assert_eq!(envelope.failure, Some(FailureKind::NotFound));
    assert!(envelope.render().contains("Unknown tool"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_missing_required_field_never_executes() {
    let executor = RecordingExecutor::empty();
    let envelope = call(&executor, "describe_table", json!({ "schemaName": "sales" })).await;

    assert!(!envelope.ok);
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::MissingField))
    );
    assert!(envelope.render().contains("tableName"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_missing_field_in_nested_column() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({ "tableName": "T", "columns": [{ "name": "Id" }] }),
    )
    .await;

    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::MissingField))
    );
    assert!(envelope.render().contains("columns[0].dataType"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_type_mismatch_and_enum_and_range() {
    let executor = RecordingExecutor::empty();

    let envelope = call(&executor, "get_table_data", json!({ "tableName": 5 })).await;
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::TypeMismatch))
    );

    let envelope = call(
        &executor,
        "backup_database",
        json!({ "backupPath": "/b/x.bak", "backupType": "INCREMENTAL" }),
    )
    .await;
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::InvalidEnum))
    );

    let envelope = call(&executor, "get_table_data", json!({ "tableName": "T", "limit": 0 })).await;
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::OutOfRange))
    );

    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_already_quoted_identifier_rejected() {
    let executor = RecordingExecutor::empty();
    let envelope = call(&executor, "drop_table", json!({ "tableName": "[Orders]" })).await;

    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::InvalidIdentifier))
    );
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_generation_failure_never_executes() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({
            "tableName": "T",
            "columns": [
                { "name": "Id", "dataType": "INT" },
                { "name": "id", "dataType": "INT" }
            ]
        }),
    )
    .await;

    assert_eq!(envelope.failure, Some(FailureKind::Generation));
    assert_eq!(executor.call_count(), 0);
}

// =============================================================================
// EXECUTION
// =============================================================================

#[tokio::test]
async fn test_database_error_becomes_envelope() {
    let executor = RecordingExecutor::failing("Invalid object name 'dbo.Nope'.", Some(208));
    let envelope = call(&executor, "get_table_count", json!({ "tableName": "Nope" })).await;

    assert!(!envelope.ok);
    assert_eq!(envelope.failure, Some(FailureKind::Execution));
    let text = envelope.render();
    assert!(text.starts_with("Error executing get_table_count: Invalid object name 'dbo.Nope'."));
    assert!(text.contains("server error: 208"));
    assert_eq!(executor.call_count(), 1);
}

#[tokio::test]
async fn test_rows_are_returned_as_json_array() {
    let executor = RecordingExecutor::returning(ExecutionResult::from_rows(rows(json!([
        { "name": "Sales", "database_id": 5 },
        { "name": "Stage", "database_id": 6 }
    ]))));
    let envelope = call(&executor, "list_databases", json!({})).await;

    assert!(envelope.ok);
    assert_eq!(
        envelope.payload,
        Payload::Json(json!([
            { "name": "Sales", "database_id": 5 },
            { "name": "Stage", "database_id": 6 }
        ]))
    );
    assert_eq!(executor.last().parameters.len(), 0);
}

#[tokio::test]
async fn test_ddl_acknowledgement() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({
            "tableName": "T",
            "columns": [{ "name": "Id", "dataType": "INT" }]
        }),
    )
    .await;
    assert_eq!(envelope.render(), "Table [dbo].[T] created successfully.");

    let envelope = call(&executor, "drop_table", json!({ "tableName": "T", "schemaName": "stage" })).await;
    assert_eq!(envelope.render(), "Table [stage].[T] dropped successfully.");

    let envelope = call(
        &executor,
        "create_function",
        json!({
            "functionName": "fn_One",
            "returnType": "INT",
            "functionBody": "RETURN 1"
        }),
    )
    .await;
    assert_eq!(envelope.render(), "Function [dbo].[fn_One] created successfully.");
    assert_eq!(executor.call_count(), 3);
}

#[tokio::test]
async fn test_execute_query_shape() {
    let executor = RecordingExecutor::returning(ExecutionResult::from_rows(rows(json!([
        { "x": 1 }
    ]))));
    let envelope = call(
        &executor,
        "execute_query",
        json!({ "query": "SELECT @n AS x", "parameters": { "n": 1 } }),
    )
    .await;

    assert_eq!(
        json_payload(&envelope),
        json!({ "recordset": [{ "x": 1 }], "rowsAffected": 0, "recordsets": 1 })
    );
    let statement = executor.last();
    assert_eq!(statement.text, "SELECT @n AS x");
    assert_eq!(statement.parameters.get("n"), Some(&json!(1)));
}

#[tokio::test]
async fn test_tool_response_flags() {
    let executor = RecordingExecutor::empty();
    let ok = call(&executor, "list_users", json!({})).await.into_tool_response();
    assert_eq!(ok.is_error, None);

    let failed = call(&executor, "nope", json!({})).await.into_tool_response();
    assert_eq!(failed.is_error, Some(true));
}

#[tokio::test]
async fn test_dry_run_never_executes() {
    let executor = RecordingExecutor::empty();
    let envelope = dispatcher(executor.clone())
        .dispatch(
            "get_job_history",
            &json!({ "jobName": "Nightly" }),
            sqlgate_mcp::CallToolOptions { dry_run: true },
        )
        .await;

    assert!(envelope.ok);
    let payload = json_payload(&envelope);
    assert_eq!(payload["operation"], "get_job_history");
    assert_eq!(payload["parameters"], json!({ "days": 7, "jobName": "Nightly" }));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let executor = RecordingExecutor::empty();
    let dispatcher = std::sync::Arc::new(dispatcher(executor.clone()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                dispatcher
                    .dispatch(
                        "get_table_count",
                        &json!({ "tableName": format!("T{}", i) }),
                        sqlgate_mcp::CallToolOptions::default(),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().ok);
    }
    let mut texts: Vec<_> = executor.statements().into_iter().map(|s| s.text).collect();
    texts.sort();
    texts.dedup();
    assert_eq!(texts.len(), 8);
}
