//! Table, view and function definition statements.

use super::{GenerationError, qualified, required};
use crate::sql::{self, splice_raw};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;
use std::collections::HashSet;

/// `CREATE TABLE` with one trailing primary key constraint.
pub fn create_table(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let table = required(args, "tableName")?;
    let columns = args.items("columns");
    if columns.is_empty() {
        return Err(GenerationError::Inconsistent(
            "create_table requires at least one column".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    let mut definitions = Vec::with_capacity(columns.len() + 1);
    let mut primary_key = Vec::new();

    for (index, column) in columns.iter().enumerate() {
        let name = required(column, "name")?;
        if !seen.insert(name.to_lowercase()) {
            return Err(GenerationError::Inconsistent(format!(
                "column '{}' is declared more than once",
                name
            )));
        }
        let quoted = sql::quote_identifier(name)
            .map_err(|e| GenerationError::identifier(format!("columns[{}].name", index), e))?;
        definitions.push(column_definition(&quoted, column)?);
        if column.flag("isPrimaryKey") {
            primary_key.push(quoted);
        }
    }

    if !primary_key.is_empty() {
        let constraint = sql::quote_identifier(&format!("PK_{}", table))
            .map_err(|e| GenerationError::identifier("tableName", e))?;
        definitions.push(format!(
            "CONSTRAINT {} PRIMARY KEY ({})",
            constraint,
            primary_key.join(", ")
        ));
    }

    Ok(SqlStatement::new(format!(
        "CREATE TABLE {} (\n  {}\n)",
        qualified(args, "tableName")?,
        definitions.join(",\n  ")
    )))
}

// Modifier order: identity, nullability, default.
fn column_definition(
    quoted_name: &str,
    column: &ValidatedArguments,
) -> Result<String, GenerationError> {
    let data_type = required(column, "dataType")?;
    let mut definition = format!("{} {}", quoted_name, splice_raw("dataType", data_type));

    if column.flag("identity") {
        definition.push_str(" IDENTITY(1,1)");
    }
    if !column.flag("nullable") {
        definition.push_str(" NOT NULL");
    }
    if let Some(default) = column.text("defaultValue").filter(|d| !d.is_empty()) {
        definition.push_str(&format!(" DEFAULT {}", splice_raw("defaultValue", default)));
    }

    Ok(definition)
}

/// `DROP TABLE [IF EXISTS ]`.
pub fn drop_table(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let if_exists = if args.flag("ifExists") { "IF EXISTS " } else { "" };
    Ok(SqlStatement::new(format!(
        "DROP TABLE {}{}",
        if_exists,
        qualified(args, "tableName")?
    )))
}

fn create_verb(args: &ValidatedArguments) -> &'static str {
    if args.flag("replaceIfExists") {
        "CREATE OR ALTER"
    } else {
        "CREATE"
    }
}

pub fn create_view(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let query = required(args, "query")?;
    Ok(SqlStatement::new(format!(
        "{} VIEW {} AS\n{}",
        create_verb(args),
        qualified(args, "viewName")?,
        splice_raw("query", query)
    )))
}

/// Scalar function with an optional parameter list.
pub fn create_function(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let return_type = required(args, "returnType")?;
    let body = required(args, "functionBody")?;

    let mut seen = HashSet::new();
    let mut parameters = Vec::new();
    for (index, parameter) in args.items("parameters").iter().enumerate() {
        let name = sql::parameter_name(required(parameter, "name")?)
            .map_err(|e| GenerationError::identifier(format!("parameters[{}].name", index), e))?;
        if !seen.insert(name.to_lowercase()) {
            return Err(GenerationError::Inconsistent(format!(
                "parameter '@{}' is declared more than once",
                name
            )));
        }
        let data_type = required(parameter, "dataType")?;
        parameters.push(format!("@{} {}", name, splice_raw("dataType", data_type)));
    }

    Ok(SqlStatement::new(format!(
        "{} FUNCTION {} ({})\nRETURNS {}\nAS\nBEGIN\n{}\nEND",
        create_verb(args),
        qualified(args, "functionName")?,
        parameters.join(", "),
        splice_raw("returnType", return_type),
        splice_raw("functionBody", body)
    )))
}
