//! Caller-authored queries and stored procedure calls.

use super::{GenerationError, required};
use crate::sql::{self, splice_raw};
use crate::validator::ValidatedArguments;
use serde_json::{Map, Value};
use sqlgate_runtime::SqlStatement;

fn bind_all(
    statement: &mut SqlStatement,
    parameters: Option<&Map<String, Value>>,
) -> Result<Vec<String>, GenerationError> {
    let mut names = Vec::new();
    for (key, value) in parameters.into_iter().flatten() {
        let name = sql::parameter_name(key)
            .map_err(|e| GenerationError::identifier(format!("parameters.{}", key), e))?;
        if statement.parameters.contains_key(name) {
            return Err(GenerationError::Inconsistent(format!(
                "parameter '@{}' is supplied more than once",
                name
            )));
        }
        statement.bind(name, value.clone());
        names.push(name.to_string());
    }
    Ok(names)
}

/// The caller's query text, with its parameter map bound.
pub fn execute_query(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let query = required(args, "query")?;
    let mut statement = SqlStatement::new(splice_raw("query", query).to_string());
    bind_all(&mut statement, args.object("parameters"))?;
    Ok(statement)
}

/// Column carrying the procedure's return status in the final result set.
pub const RETURN_VALUE_COLUMN: &str = "returnValue";

const RETURN_VALUE_VARIABLE: &str = "return_value";

/// `EXEC @return_value = <proc> @a = @a, ...` with every parameter bound,
/// followed by a one-row result set holding the return status.
pub fn execute_stored_procedure(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let procedure = sql::quote_multipart(required(args, "procedureName")?)
        .map_err(|e| GenerationError::identifier("procedureName", e))?;

    let mut statement = SqlStatement::default();
    let names = bind_all(&mut statement, args.object("parameters"))?;
    if names
        .iter()
        .any(|name| name.eq_ignore_ascii_case(RETURN_VALUE_VARIABLE))
    {
        return Err(GenerationError::Inconsistent(format!(
            "parameter '@{}' is reserved for the procedure return status",
            RETURN_VALUE_VARIABLE
        )));
    }

    let call = if names.is_empty() {
        procedure
    } else {
        let assignments: Vec<String> = names.iter().map(|n| format!("@{n} = @{n}")).collect();
        format!("{} {}", procedure, assignments.join(", "))
    };
    statement.text = format!(
        "DECLARE @{var} int;\nEXEC @{var} = {call};\nSELECT @{var} AS {column};",
        var = RETURN_VALUE_VARIABLE,
        call = call,
        column = RETURN_VALUE_COLUMN,
    );
    Ok(statement)
}
