//! Built-in operation definitions, in catalog order.

use super::schema::{FieldSpec, Format};
use super::{Category, OperationDefinition, ResultMode};
use crate::generators::{
    agent, data, ddl, diagnostics, maintenance, metadata, query, security,
};

// =============================================================================
// SHARED FIELDS
// =============================================================================

const SCHEMA: FieldSpec = FieldSpec::string("schemaName", "Schema name (optional, defaults to dbo)")
    .identifier()
    .default_schema();

const SCHEMA_FILTER: FieldSpec =
    FieldSpec::string("schemaName", "Filter by schema name (optional)").identifier();

const TABLE: FieldSpec = FieldSpec::string("tableName", "Name of the table")
    .required()
    .identifier();

const REPLACE: FieldSpec = FieldSpec::boolean(
    "replaceIfExists",
    "Use CREATE OR ALTER so an existing object is replaced",
);

const WHERE: FieldSpec =
    FieldSpec::string("whereClause", "WHERE clause without WHERE keyword (optional)");

const PARAMETER_MAP: FieldSpec = FieldSpec::object(
    "parameters",
    "Named parameter values; keys are parameter names with or without '@'",
)
.format(Format::ParameterMap);

const DATABASE: FieldSpec =
    FieldSpec::string("databaseName", "Database name (optional, uses current)").identifier();

// =============================================================================
// ARGUMENT SCHEMAS
// =============================================================================

const COLUMN_ITEM: &[FieldSpec] = &[
    FieldSpec::string("name", "Column name").required().identifier(),
    FieldSpec::string("dataType", "SQL Server data type")
        .required()
        .format(Format::DataType),
    FieldSpec::boolean("nullable", "Whether the column is nullable"),
    FieldSpec::boolean("isPrimaryKey", "Whether this column is part of primary key"),
    FieldSpec::string("defaultValue", "Default value expression for the column"),
    FieldSpec::boolean("identity", "Whether this is an identity column"),
];

const FUNCTION_PARAMETER_ITEM: &[FieldSpec] = &[
    FieldSpec::string("name", "Parameter name")
        .required()
        .format(Format::ParameterName),
    FieldSpec::string("dataType", "Parameter data type")
        .required()
        .format(Format::DataType),
];

const CREATE_TABLE_ARGS: &[FieldSpec] = &[
    FieldSpec::string("tableName", "Name of the table to create")
        .required()
        .identifier(),
    SCHEMA,
    FieldSpec::object_array("columns", "Array of column definitions", COLUMN_ITEM).required(),
];

const DROP_TABLE_ARGS: &[FieldSpec] = &[
    FieldSpec::string("tableName", "Name of the table to drop")
        .required()
        .identifier(),
    SCHEMA,
    FieldSpec::boolean("ifExists", "Add IF EXISTS clause"),
];

const CREATE_VIEW_ARGS: &[FieldSpec] = &[
    FieldSpec::string("viewName", "Name of the view to create")
        .required()
        .identifier(),
    SCHEMA,
    FieldSpec::string("query", "SELECT query that defines the view").required(),
    REPLACE,
];

const CREATE_FUNCTION_ARGS: &[FieldSpec] = &[
    FieldSpec::string("functionName", "Name of the function to create")
        .required()
        .identifier(),
    SCHEMA,
    FieldSpec::object_array("parameters", "Function parameters", FUNCTION_PARAMETER_ITEM),
    FieldSpec::string("returnType", "Return data type of the function")
        .required()
        .format(Format::DataType),
    FieldSpec::string("functionBody", "Body of the function").required(),
    REPLACE,
];

const EXECUTE_QUERY_ARGS: &[FieldSpec] = &[
    FieldSpec::string("query", "SQL query to execute").required(),
    PARAMETER_MAP,
];

const EXECUTE_PROCEDURE_ARGS: &[FieldSpec] = &[
    FieldSpec::string(
        "procedureName",
        "Name of the stored procedure, optionally schema-qualified",
    )
    .required()
    .format(Format::ObjectName),
    PARAMETER_MAP,
];

const SCHEMA_FILTER_ARGS: &[FieldSpec] = &[SCHEMA_FILTER];

const TABLE_ARGS: &[FieldSpec] = &[TABLE, SCHEMA];

const TABLE_DATA_ARGS: &[FieldSpec] = &[
    TABLE,
    SCHEMA,
    FieldSpec::string("columns", "Comma-separated column names (optional, * for all)"),
    WHERE,
    FieldSpec::string(
        "orderBy",
        "ORDER BY clause without ORDER BY keywords (optional)",
    ),
    FieldSpec::integer("limit", "Number of rows to return (optional)").minimum(1),
];

const TABLE_COUNT_ARGS: &[FieldSpec] = &[TABLE, SCHEMA, WHERE];

const TABLE_SIZES_ARGS: &[FieldSpec] =
    &[FieldSpec::integer("topN", "Return top N largest tables (optional)").minimum(1)];

const QUERY_PLAN_ARGS: &[FieldSpec] =
    &[FieldSpec::string("query", "SQL query to analyze").required()];

const QUERY_STATISTICS_ARGS: &[FieldSpec] = &[FieldSpec::integer(
    "topN",
    "Return top N queries by duration (optional, default 10)",
)
.minimum(1)
.default_integer(10)];

const BACKUP_ARGS: &[FieldSpec] = &[
    FieldSpec::string("backupPath", "Full path for the backup file").required(),
    DATABASE,
    FieldSpec::string("backupType", "Backup type: FULL, DIFFERENTIAL, or LOG")
        .one_of(&["FULL", "DIFFERENTIAL", "LOG"])
        .default_text("FULL"),
];

const INTEGRITY_ARGS: &[FieldSpec] = &[
    DATABASE,
    FieldSpec::string("repairOption", "Repair option if issues found").one_of(&[
        "REPAIR_ALLOW_DATA_LOSS",
        "REPAIR_FAST",
        "REPAIR_REBUILD",
    ]),
];

const USER_PERMISSION_ARGS: &[FieldSpec] =
    &[FieldSpec::string("userName", "Database user name").required()];

const AGENT_JOB_ARGS: &[FieldSpec] = &[FieldSpec::string(
    "status",
    "Filter by job status (optional)",
)
.one_of(&["enabled", "disabled"])];

const JOB_HISTORY_ARGS: &[FieldSpec] = &[
    FieldSpec::string("jobName", "Specific job name (optional)"),
    FieldSpec::integer("days", "Number of days to look back (optional, default 7)")
        .minimum(0)
        .default_integer(7),
];

// =============================================================================
// OPERATIONS
// =============================================================================

pub static OPERATIONS: &[OperationDefinition] = &[
    // DDL
    OperationDefinition {
        name: "create_table",
        description: "Create a new table in the database",
        category: Category::Ddl,
        arguments: CREATE_TABLE_ARGS,
        generator: ddl::create_table,
        result: ResultMode::Acknowledge {
            kind: "Table",
            name_field: "tableName",
            verb: "created",
        },
    },
    OperationDefinition {
        name: "drop_table",
        description: "Drop an existing table from the database",
        category: Category::Ddl,
        arguments: DROP_TABLE_ARGS,
        generator: ddl::drop_table,
        result: ResultMode::Acknowledge {
            kind: "Table",
            name_field: "tableName",
            verb: "dropped",
        },
    },
    OperationDefinition {
        name: "create_view",
        description: "Create a new view in the database",
        category: Category::Ddl,
        arguments: CREATE_VIEW_ARGS,
        generator: ddl::create_view,
        result: ResultMode::Acknowledge {
            kind: "View",
            name_field: "viewName",
            verb: "created",
        },
    },
    OperationDefinition {
        name: "create_function",
        description: "Create a new scalar function in the database",
        category: Category::Ddl,
        arguments: CREATE_FUNCTION_ARGS,
        generator: ddl::create_function,
        result: ResultMode::Acknowledge {
            kind: "Function",
            name_field: "functionName",
            verb: "created",
        },
    },
    // Query
    OperationDefinition {
        name: "execute_query",
        description: "Execute any SQL query (SELECT, INSERT, UPDATE, DELETE, etc.)",
        category: Category::Query,
        arguments: EXECUTE_QUERY_ARGS,
        generator: query::execute_query,
        result: ResultMode::QueryResult,
    },
    OperationDefinition {
        name: "execute_stored_procedure",
        description: "Execute a stored procedure",
        category: Category::Query,
        arguments: EXECUTE_PROCEDURE_ARGS,
        generator: query::execute_stored_procedure,
        result: ResultMode::ProcedureResult,
    },
    // Metadata
    OperationDefinition {
        name: "list_databases",
        description: "List all user databases on the SQL Server instance",
        category: Category::Metadata,
        arguments: &[],
        generator: metadata::list_databases,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_tables",
        description: "List all tables in the current database",
        category: Category::Metadata,
        arguments: SCHEMA_FILTER_ARGS,
        generator: metadata::list_tables,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_views",
        description: "List all views in the current database",
        category: Category::Metadata,
        arguments: SCHEMA_FILTER_ARGS,
        generator: metadata::list_views,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_stored_procedures",
        description: "List all stored procedures in the current database",
        category: Category::Metadata,
        arguments: SCHEMA_FILTER_ARGS,
        generator: metadata::list_stored_procedures,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_functions",
        description: "List all user-defined functions in the current database",
        category: Category::Metadata,
        arguments: SCHEMA_FILTER_ARGS,
        generator: metadata::list_functions,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_schemas",
        description: "List all schemas in the current database",
        category: Category::Metadata,
        arguments: &[],
        generator: metadata::list_schemas,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "describe_table",
        description: "Get detailed information about a table structure",
        category: Category::Metadata,
        arguments: TABLE_ARGS,
        generator: metadata::describe_table,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_table_indexes",
        description: "Get all indexes for a specific table",
        category: Category::Metadata,
        arguments: TABLE_ARGS,
        generator: metadata::get_table_indexes,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_table_constraints",
        description: "Get all constraints (PK, FK, CHECK, etc.) for a specific table",
        category: Category::Metadata,
        arguments: TABLE_ARGS,
        generator: metadata::get_table_constraints,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_foreign_keys",
        description: "Get foreign key relationships for a table",
        category: Category::Metadata,
        arguments: TABLE_ARGS,
        generator: metadata::get_foreign_keys,
        result: ResultMode::Rows,
    },
    // Data
    OperationDefinition {
        name: "get_table_data",
        description: "Get data from a table with optional filtering and row limit",
        category: Category::Data,
        arguments: TABLE_DATA_ARGS,
        generator: data::get_table_data,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_table_count",
        description: "Get row count for a table with optional WHERE clause",
        category: Category::Data,
        arguments: TABLE_COUNT_ARGS,
        generator: data::get_table_count,
        result: ResultMode::Rows,
    },
    // Diagnostics
    OperationDefinition {
        name: "get_database_info",
        description: "Get general information about the current database",
        category: Category::Diagnostics,
        arguments: &[],
        generator: diagnostics::get_database_info,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_table_sizes",
        description: "Get size information for all tables in the database",
        category: Category::Diagnostics,
        arguments: TABLE_SIZES_ARGS,
        generator: diagnostics::get_table_sizes,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_active_connections",
        description: "Get information about active database connections",
        category: Category::Diagnostics,
        arguments: &[],
        generator: diagnostics::get_active_connections,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_database_files",
        description: "Get information about database files (.mdf, .ldf)",
        category: Category::Diagnostics,
        arguments: &[],
        generator: diagnostics::get_database_files,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "analyze_query_plan",
        description: "Get the estimated execution plan for a query",
        category: Category::Diagnostics,
        arguments: QUERY_PLAN_ARGS,
        generator: diagnostics::analyze_query_plan,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_query_statistics",
        description: "Get statistics for recently executed queries",
        category: Category::Diagnostics,
        arguments: QUERY_STATISTICS_ARGS,
        generator: diagnostics::get_query_statistics,
        result: ResultMode::Rows,
    },
    // Maintenance
    OperationDefinition {
        name: "backup_database",
        description: "Create a database backup",
        category: Category::Maintenance,
        arguments: BACKUP_ARGS,
        generator: maintenance::backup_database,
        result: ResultMode::Acknowledge {
            kind: "Backup of database",
            name_field: "databaseName",
            verb: "completed",
        },
    },
    OperationDefinition {
        name: "check_database_integrity",
        description: "Run DBCC CHECKDB to verify database integrity",
        category: Category::Maintenance,
        arguments: INTEGRITY_ARGS,
        generator: maintenance::check_database_integrity,
        result: ResultMode::Rows,
    },
    // Security
    OperationDefinition {
        name: "list_users",
        description: "List all database users",
        category: Category::Security,
        arguments: &[],
        generator: security::list_users,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "list_roles",
        description: "List all database roles",
        category: Category::Security,
        arguments: &[],
        generator: security::list_roles,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_user_permissions",
        description: "Get permissions for a specific user",
        category: Category::Security,
        arguments: USER_PERMISSION_ARGS,
        generator: security::get_user_permissions,
        result: ResultMode::Rows,
    },
    // SQL Server Agent
    OperationDefinition {
        name: "list_sql_agent_jobs",
        description: "List SQL Server Agent jobs",
        category: Category::Agent,
        arguments: AGENT_JOB_ARGS,
        generator: agent::list_sql_agent_jobs,
        result: ResultMode::Rows,
    },
    OperationDefinition {
        name: "get_job_history",
        description: "Get execution history for SQL Agent jobs",
        category: Category::Agent,
        arguments: JOB_HISTORY_ARGS,
        generator: agent::get_job_history,
        result: ResultMode::Rows,
    },
];
