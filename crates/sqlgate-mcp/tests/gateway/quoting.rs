//! Hostile names and values must stay inside their quotes or parameters.

use super::common::*;
use serde_json::json;
use sqlgate_mcp::{FailureKind, ValidationErrorKind};

#[tokio::test]
async fn test_closing_bracket_in_table_name_is_doubled() {
    let sql = dry_run_sql("drop_table", json!({ "tableName": "x]; DROP TABLE y--" })).await;
    assert_eq!(sql, "DROP TABLE [dbo].[x]]; DROP TABLE y--]");
}

#[tokio::test]
async fn test_filter_values_are_bound_not_spliced() {
    let executor = RecordingExecutor::empty();
    call(
        &executor,
        "get_user_permissions",
        json!({ "userName": "bob' OR 1=1 --" }),
    )
    .await;

    let statement = executor.last();
    assert!(!statement.text.contains("bob"));
    assert_eq!(statement.parameters.get("userName"), Some(&json!("bob' OR 1=1 --")));
}

#[tokio::test]
async fn test_backup_path_is_escaped_literal() {
    let sql = dry_run_sql(
        "backup_database",
        json!({ "backupPath": "C:\\b\\it's.bak", "databaseName": "Sales" }),
    )
    .await;
    assert!(sql.contains("TO DISK = N'C:\\b\\it''s.bak'"));
}

#[tokio::test]
async fn test_integrity_check_database_literal() {
    let sql = dry_run_sql(
        "check_database_integrity",
        json!({ "databaseName": "O'Brien", "repairOption": "REPAIR_REBUILD" }),
    )
    .await;
    assert_eq!(sql, "DBCC CHECKDB(N'O''Brien', REPAIR_REBUILD) WITH TABLERESULTS");

    let current = dry_run_sql("check_database_integrity", json!({})).await;
    assert_eq!(current, "DBCC CHECKDB(0) WITH TABLERESULTS");
}

#[tokio::test]
async fn test_bad_data_type_rejected_before_execution() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({
            "tableName": "T",
            "columns": [{ "name": "Id", "dataType": "INT; DROP TABLE users" }]
        }),
    )
    .await;

    assert!(!envelope.ok);
    assert!(envelope.render().contains("columns[0].dataType"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_bad_parameter_name_rejected_before_execution() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "execute_query",
        json!({ "query": "SELECT 1", "parameters": { "a b": 1 } }),
    )
    .await;

    assert!(!envelope.ok);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_overlong_identifier_rejected() {
    let executor = RecordingExecutor::empty();
    let name = "t".repeat(129);
    let envelope = call(&executor, "describe_table", json!({ "tableName": name })).await;

    assert!(!envelope.ok);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_column_modifiers_in_data_type_rejected() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({
            "tableName": "T",
            "columns": [
                { "name": "Id", "dataType": "INT PRIMARY KEY", "isPrimaryKey": true },
                { "name": "N", "dataType": "INT IDENTITY(1,1)", "identity": true }
            ]
        }),
    )
    .await;

    assert!(!envelope.ok);
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::InvalidIdentifier))
    );
    assert!(envelope.render().contains("columns[0].dataType"));
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test]
async fn test_multi_word_data_type_accepted() {
    let sql = dry_run_sql(
        "create_table",
        json!({
            "tableName": "Rates",
            "columns": [{ "name": "Rate", "dataType": "DOUBLE PRECISION", "isPrimaryKey": true }]
        }),
    )
    .await;
    assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    assert!(sql.contains("[Rate] DOUBLE PRECISION NOT NULL"));
}

#[tokio::test]
async fn test_repair_option_limited_to_known_values() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "check_database_integrity",
        json!({ "databaseName": "Sales", "repairOption": "REPAIR_FAST); DROP DATABASE Sales; --" }),
    )
    .await;
    assert_eq!(
        envelope.failure,
        Some(FailureKind::Validation(ValidationErrorKind::InvalidEnum))
    );
    assert_eq!(executor.call_count(), 0);

    let sql = dry_run_sql(
        "check_database_integrity",
        json!({ "repairOption": "REPAIR_ALLOW_DATA_LOSS" }),
    )
    .await;
    assert_eq!(sql, "DBCC CHECKDB(0, REPAIR_ALLOW_DATA_LOSS) WITH TABLERESULTS");
}
