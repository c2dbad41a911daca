//! Catalog views: databases, schemas, tables, views, routines, keys and indexes.
//!
//! Names used as filters here are data, not identifiers, so they are bound as
//! `@schemaName` / `@tableName` rather than quoted.

use super::{GenerationError, bind_text};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

const LIST_DATABASES: &str = "\
SELECT name, database_id, create_date, collation_name,
       state_desc, recovery_model_desc, compatibility_level
FROM sys.databases
WHERE database_id > 4
ORDER BY name";

const LIST_SCHEMAS: &str = "\
SELECT SCHEMA_NAME AS schema_name, SCHEMA_ID(SCHEMA_NAME) AS schema_id
FROM INFORMATION_SCHEMA.SCHEMATA
ORDER BY SCHEMA_NAME";

const DESCRIBE_TABLE: &str = "\
SELECT
  c.COLUMN_NAME,
  c.DATA_TYPE,
  c.IS_NULLABLE,
  c.COLUMN_DEFAULT,
  c.CHARACTER_MAXIMUM_LENGTH,
  c.NUMERIC_PRECISION,
  c.NUMERIC_SCALE,
  c.ORDINAL_POSITION,
  CASE WHEN pk.COLUMN_NAME IS NOT NULL THEN 'YES' ELSE 'NO' END AS IS_PRIMARY_KEY
FROM INFORMATION_SCHEMA.COLUMNS c
LEFT JOIN (
  SELECT ku.COLUMN_NAME
  FROM INFORMATION_SCHEMA.KEY_COLUMN_USAGE ku
  JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc ON ku.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
  WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
    AND ku.TABLE_NAME = @tableName
    AND ku.TABLE_SCHEMA = @schemaName
) pk ON c.COLUMN_NAME = pk.COLUMN_NAME
WHERE c.TABLE_NAME = @tableName
  AND c.TABLE_SCHEMA = @schemaName
ORDER BY c.ORDINAL_POSITION";

const TABLE_INDEXES: &str = "\
SELECT
  i.name AS IndexName,
  i.type_desc AS IndexType,
  i.is_unique AS IsUnique,
  i.is_primary_key AS IsPrimaryKey,
  STRING_AGG(c.name, ', ') AS IndexColumns
FROM sys.indexes i
JOIN sys.index_columns ic ON i.object_id = ic.object_id AND i.index_id = ic.index_id
JOIN sys.columns c ON ic.object_id = c.object_id AND ic.column_id = c.column_id
JOIN sys.objects o ON i.object_id = o.object_id
JOIN sys.schemas s ON o.schema_id = s.schema_id
WHERE o.name = @tableName
  AND s.name = @schemaName
  AND i.type > 0
GROUP BY i.name, i.type_desc, i.is_unique, i.is_primary_key
ORDER BY i.name";

const TABLE_CONSTRAINTS: &str = "\
SELECT
  tc.CONSTRAINT_NAME,
  tc.CONSTRAINT_TYPE,
  STRING_AGG(kcu.COLUMN_NAME, ', ') AS Columns,
  rc.UNIQUE_CONSTRAINT_NAME AS ReferencedConstraint,
  ccu.TABLE_NAME AS ReferencedTable,
  STRING_AGG(ccu.COLUMN_NAME, ', ') AS ReferencedColumns
FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
LEFT JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu
  ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc
  ON tc.CONSTRAINT_NAME = rc.CONSTRAINT_NAME
LEFT JOIN INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE ccu
  ON rc.UNIQUE_CONSTRAINT_NAME = ccu.CONSTRAINT_NAME
WHERE tc.TABLE_NAME = @tableName
  AND tc.TABLE_SCHEMA = @schemaName
GROUP BY tc.CONSTRAINT_NAME, tc.CONSTRAINT_TYPE, rc.UNIQUE_CONSTRAINT_NAME, ccu.TABLE_NAME
ORDER BY tc.CONSTRAINT_TYPE, tc.CONSTRAINT_NAME";

const FOREIGN_KEYS: &str = "\
SELECT
  f.name AS ForeignKeyName,
  OBJECT_SCHEMA_NAME(f.parent_object_id) AS SchemaName,
  OBJECT_NAME(f.parent_object_id) AS TableName,
  COL_NAME(fc.parent_object_id, fc.parent_column_id) AS ColumnName,
  OBJECT_SCHEMA_NAME(f.referenced_object_id) AS ReferencedSchemaName,
  OBJECT_NAME(f.referenced_object_id) AS ReferencedTableName,
  COL_NAME(fc.referenced_object_id, fc.referenced_column_id) AS ReferencedColumnName,
  f.delete_referential_action_desc AS DeleteAction,
  f.update_referential_action_desc AS UpdateAction
FROM sys.foreign_keys AS f
INNER JOIN sys.foreign_key_columns AS fc ON f.object_id = fc.constraint_object_id
WHERE OBJECT_SCHEMA_NAME(f.parent_object_id) = @schemaName
  AND OBJECT_NAME(f.parent_object_id) = @tableName
ORDER BY f.name, fc.constraint_column_id";

/// Base query plus an optional `<connector> <column> = @schemaName` filter.
fn schema_filtered(
    args: &ValidatedArguments,
    select: &str,
    connector: &str,
    column: &str,
    order_by: &str,
) -> SqlStatement {
    let mut text = select.to_string();
    if args.contains("schemaName") {
        text.push_str(&format!("\n{} {} = @schemaName", connector, column));
    }
    text.push_str("\nORDER BY ");
    text.push_str(order_by);

    let mut statement = SqlStatement::new(text);
    bind_text(&mut statement, args, "schemaName");
    statement
}

/// Fixed query bound to `@tableName` and `@schemaName`.
fn table_scoped(args: &ValidatedArguments, text: &str) -> Result<SqlStatement, GenerationError> {
    let mut statement = SqlStatement::new(text);
    for name in ["tableName", "schemaName"] {
        let value = args
            .text(name)
            .ok_or(GenerationError::MissingArgument(name))?;
        statement.bind(name, value);
    }
    Ok(statement)
}

pub fn list_databases(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(LIST_DATABASES))
}

pub fn list_tables(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(schema_filtered(
        args,
        "SELECT t.TABLE_SCHEMA, t.TABLE_NAME, t.TABLE_TYPE\n\
         FROM INFORMATION_SCHEMA.TABLES t\n\
         WHERE t.TABLE_TYPE = 'BASE TABLE'",
        "  AND",
        "t.TABLE_SCHEMA",
        "t.TABLE_SCHEMA, t.TABLE_NAME",
    ))
}

pub fn list_views(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(schema_filtered(
        args,
        "SELECT TABLE_SCHEMA, TABLE_NAME, VIEW_DEFINITION\n\
         FROM INFORMATION_SCHEMA.VIEWS",
        "WHERE",
        "TABLE_SCHEMA",
        "TABLE_SCHEMA, TABLE_NAME",
    ))
}

pub fn list_stored_procedures(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(schema_filtered(
        args,
        "SELECT ROUTINE_SCHEMA, ROUTINE_NAME, ROUTINE_TYPE, CREATED, LAST_ALTERED\n\
         FROM INFORMATION_SCHEMA.ROUTINES\n\
         WHERE ROUTINE_TYPE = 'PROCEDURE'",
        "  AND",
        "ROUTINE_SCHEMA",
        "ROUTINE_SCHEMA, ROUTINE_NAME",
    ))
}

pub fn list_functions(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(schema_filtered(
        args,
        "SELECT ROUTINE_SCHEMA, ROUTINE_NAME, ROUTINE_TYPE, DATA_TYPE, CREATED, LAST_ALTERED\n\
         FROM INFORMATION_SCHEMA.ROUTINES\n\
         WHERE ROUTINE_TYPE = 'FUNCTION'",
        "  AND",
        "ROUTINE_SCHEMA",
        "ROUTINE_SCHEMA, ROUTINE_NAME",
    ))
}

pub fn list_schemas(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(LIST_SCHEMAS))
}

pub fn describe_table(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    table_scoped(args, DESCRIBE_TABLE)
}

pub fn get_table_indexes(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    table_scoped(args, TABLE_INDEXES)
}

pub fn get_table_constraints(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    table_scoped(args, TABLE_CONSTRAINTS)
}

pub fn get_foreign_keys(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    table_scoped(args, FOREIGN_KEYS)
}
