//! End-to-end statement shapes.
//!
//! Each test drives a call through the dispatcher and inspects the statement
//! the executor actually received.

use super::common::*;
use serde_json::json;

#[tokio::test]
async fn test_create_table_example() {
    let executor = RecordingExecutor::empty();
    let envelope = call(
        &executor,
        "create_table",
        json!({
            "tableName": "T",
            "columns": [
                { "name": "Id", "dataType": "INT", "isPrimaryKey": true, "identity": true }
            ]
        }),
    )
    .await;

    assert!(envelope.ok, "{}", envelope.render());
    assert_eq!(
        normalize(&executor.last().text),
        "CREATE TABLE [dbo].[T] ( [Id] INT IDENTITY(1,1) NOT NULL, CONSTRAINT [PK_T] PRIMARY KEY ([Id]) )"
    );
}

#[tokio::test]
async fn test_composite_primary_key_in_declaration_order() {
    let sql = dry_run_sql(
        "create_table",
        json!({
            "tableName": "OrderLines",
            "schemaName": "sales",
            "columns": [
                { "name": "OrderId", "dataType": "INT", "isPrimaryKey": true },
                { "name": "Note", "dataType": "NVARCHAR(200)", "nullable": true },
                { "name": "LineNo", "dataType": "SMALLINT", "isPrimaryKey": true },
                { "name": "Qty", "dataType": "INT", "defaultValue": "1" }
            ]
        }),
    )
    .await;

    assert_eq!(sql.matches("PRIMARY KEY").count(), 1);
    assert!(sql.contains("CONSTRAINT [PK_OrderLines] PRIMARY KEY ([OrderId], [LineNo])"));
    assert!(sql.contains("[Note] NVARCHAR(200),"));
    assert!(sql.contains("[Qty] INT NOT NULL DEFAULT 1"));
    assert!(sql.starts_with("CREATE TABLE [sales].[OrderLines]"));
}

#[tokio::test]
async fn test_table_without_primary_key_has_no_constraint() {
    let sql = dry_run_sql(
        "create_table",
        json!({ "tableName": "Log", "columns": [{ "name": "Line", "dataType": "NVARCHAR(MAX)" }] }),
    )
    .await;
    assert!(!sql.contains("PRIMARY KEY"));
}

#[tokio::test]
async fn test_get_table_count_example() {
    let executor = RecordingExecutor::empty();
    call(
        &executor,
        "get_table_count",
        json!({ "tableName": "Orders", "whereClause": "Status='Open'" }),
    )
    .await;

    assert_eq!(
        executor.last().text,
        "SELECT COUNT(*) as RowCount FROM [dbo].[Orders] WHERE Status='Open'"
    );
}

#[tokio::test]
async fn test_get_table_data_without_optional_clauses() {
    let executor = RecordingExecutor::empty();
    call(&executor, "get_table_data", json!({ "tableName": "Orders" })).await;

    let statement = executor.last();
    let upper = statement.text.to_uppercase();
    assert!(!upper.contains("WHERE"));
    assert!(!upper.contains("ORDER BY"));
    assert!(!upper.contains("TOP"));
    assert!(statement.parameters.is_empty());
}

#[tokio::test]
async fn test_get_table_data_with_every_clause() {
    let executor = RecordingExecutor::empty();
    call(
        &executor,
        "get_table_data",
        json!({
            "tableName": "Orders",
            "columns": "Id, Status",
            "whereClause": "Total > 100",
            "orderBy": "Id DESC",
            "limit": 25
        }),
    )
    .await;

    let statement = executor.last();
    assert_eq!(
        statement.text,
        "SELECT TOP (@limit) [Id], [Status] FROM [dbo].[Orders] WHERE Total > 100 ORDER BY Id DESC"
    );
    assert_eq!(statement.parameters.get("limit"), Some(&json!(25)));
}

#[tokio::test]
async fn test_schema_scoped_operations_default_to_dbo() {
    let executor = RecordingExecutor::empty();
    for operation in [
        "describe_table",
        "get_table_indexes",
        "get_table_constraints",
        "get_foreign_keys",
    ] {
        call(&executor, operation, json!({ "tableName": "Orders" })).await;
        let statement = executor.last();
        assert_eq!(statement.parameters.get("schemaName"), Some(&json!("dbo")), "{operation}");
        assert_eq!(statement.parameters.get("tableName"), Some(&json!("Orders")), "{operation}");
    }

    let sql = dry_run_sql("drop_table", json!({ "tableName": "Orders" })).await;
    assert_eq!(sql, "DROP TABLE [dbo].[Orders]");
}

#[tokio::test]
async fn test_list_filters_are_optional() {
    let executor = RecordingExecutor::empty();
    call(&executor, "list_tables", json!({})).await;
    let unfiltered = executor.last();
    assert!(!unfiltered.text.contains("@schemaName"));
    assert!(unfiltered.parameters.is_empty());

    call(&executor, "list_tables", json!({ "schemaName": "sales" })).await;
    let filtered = executor.last();
    assert!(filtered.text.contains("t.TABLE_SCHEMA = @schemaName"));
    assert_eq!(filtered.parameters.get("schemaName"), Some(&json!("sales")));
}

#[tokio::test]
async fn test_stored_procedure_call() {
    let executor = RecordingExecutor::empty();
    call(
        &executor,
        "execute_stored_procedure",
        json!({ "procedureName": "sales.usp_Close", "parameters": { "@id": 7 } }),
    )
    .await;

    let statement = executor.last();
    assert_eq!(
        statement.text,
        "DECLARE @return_value int;\nEXEC @return_value = [sales].[usp_Close] @id = @id;\nSELECT @return_value AS returnValue;"
    );
    assert_eq!(statement.parameters.get("id"), Some(&json!(7)));
}

#[tokio::test]
async fn test_query_plan_wraps_showplan() {
    let sql = dry_run_sql("analyze_query_plan", json!({ "query": "SELECT * FROM T;" })).await;
    assert_eq!(sql, "SET SHOWPLAN_ALL ON;\nSELECT * FROM T;\nSET SHOWPLAN_ALL OFF;");
}

#[tokio::test]
async fn test_backup_variants() {
    let full = dry_run_sql(
        "backup_database",
        json!({ "backupPath": "/var/opt/mssql/Sales.bak", "databaseName": "Sales" }),
    )
    .await;
    assert!(full.starts_with("BACKUP DATABASE [Sales]\nTO DISK = N'/var/opt/mssql/Sales.bak'"));
    assert!(full.contains("NAME = N'Sales FULL Backup'"));

    let log = dry_run_sql(
        "backup_database",
        json!({ "backupPath": "/b/s.trn", "databaseName": "Sales", "backupType": "LOG" }),
    )
    .await;
    assert!(log.starts_with("BACKUP LOG [Sales]"));

    let differential = dry_run_sql(
        "backup_database",
        json!({ "backupPath": "/b/s.dif", "backupType": "DIFFERENTIAL" }),
    )
    .await;
    assert!(differential.starts_with("DECLARE @database_name sysname = DB_NAME();"));
    assert!(differential.contains("WITH DIFFERENTIAL, FORMAT, INIT"));
}

#[tokio::test]
async fn test_job_history_binds_days() {
    let executor = RecordingExecutor::empty();
    call(&executor, "get_job_history", json!({ "days": 0 })).await;

    let statement = executor.last();
    assert_eq!(statement.parameters.get("days"), Some(&json!(0)));
    assert!(!statement.text.contains("@jobName"));
}
