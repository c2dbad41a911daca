//! Published tool schemas must be valid JSON Schema and agree with the
//! validator on documented example arguments.

use serde_json::{Value, json};
use sqlgate_mcp::{ArgumentValidator, Catalog};

fn examples() -> Vec<(&'static str, Value)> {
    vec![
        (
            "create_table",
            json!({
                "tableName": "Customers",
                "columns": [
                    { "name": "Id", "dataType": "INT", "isPrimaryKey": true, "identity": true },
                    { "name": "Email", "dataType": "NVARCHAR(320)", "nullable": false }
                ]
            }),
        ),
        ("drop_table", json!({ "tableName": "Customers", "ifExists": true })),
        (
            "create_view",
            json!({ "viewName": "ActiveCustomers", "query": "SELECT * FROM Customers" }),
        ),
        (
            "create_function",
            json!({
                "functionName": "fn_Double",
                "parameters": [{ "name": "@x", "dataType": "INT" }],
                "returnType": "INT",
                "functionBody": "RETURN @x * 2"
            }),
        ),
        ("execute_query", json!({ "query": "SELECT @a", "parameters": { "a": 1 } })),
        ("execute_stored_procedure", json!({ "procedureName": "dbo.usp_Refresh" })),
        ("list_tables", json!({ "schemaName": "sales" })),
        ("describe_table", json!({ "tableName": "Orders" })),
        (
            "get_table_data",
            json!({ "tableName": "Orders", "columns": "Id, Total", "limit": 10 }),
        ),
        ("get_table_count", json!({ "tableName": "Orders", "whereClause": "Total > 0" })),
        ("get_table_sizes", json!({ "topN": 5 })),
        ("get_query_statistics", json!({})),
        ("analyze_query_plan", json!({ "query": "SELECT 1" })),
        (
            "backup_database",
            json!({ "backupPath": "/b/x.bak", "backupType": "DIFFERENTIAL" }),
        ),
        ("check_database_integrity", json!({ "repairOption": "REPAIR_FAST" })),
        ("get_user_permissions", json!({ "userName": "reporting" })),
        ("list_sql_agent_jobs", json!({ "status": "enabled" })),
        ("get_job_history", json!({ "jobName": "Nightly", "days": 3 })),
        ("list_databases", json!({})),
    ]
}

#[test]
fn test_every_schema_compiles() {
    for tool in Catalog::builtin().tool_definitions("dbo") {
        assert!(
            jsonschema::validator_for(&tool.input_schema).is_ok(),
            "schema for {} does not compile",
            tool.name
        );
    }
}

#[test]
fn test_examples_satisfy_schema_and_validator() {
    let catalog = Catalog::builtin();
    let validator = ArgumentValidator::new("dbo");

    for (name, arguments) in examples() {
        let operation = catalog.lookup(name).unwrap();
        let schema = jsonschema::validator_for(&operation.input_schema("dbo")).unwrap();
        assert!(schema.is_valid(&arguments), "{name}: schema rejected example");
        assert!(
            validator.validate(operation, &arguments).is_ok(),
            "{name}: validator rejected example"
        );
    }
}

#[test]
fn test_schema_and_validator_agree_on_rejections() {
    let catalog = Catalog::builtin();
    let validator = ArgumentValidator::new("dbo");

    let rejected = [
        ("drop_table", json!({})),
        ("get_table_data", json!({ "tableName": "T", "limit": 0 })),
        ("backup_database", json!({ "backupPath": "/b", "backupType": "COPY" })),
        ("get_job_history", json!({ "days": -1 })),
        ("create_table", json!({ "tableName": "T", "columns": [{ "name": "Id" }] })),
    ];

    for (name, arguments) in rejected {
        let operation = catalog.lookup(name).unwrap();
        let schema = jsonschema::validator_for(&operation.input_schema("dbo")).unwrap();
        assert!(!schema.is_valid(&arguments), "{name}: schema accepted {arguments}");
        assert!(
            validator.validate(operation, &arguments).is_err(),
            "{name}: validator accepted {arguments}"
        );
    }
}
