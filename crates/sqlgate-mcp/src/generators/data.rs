//! Row reads and counts against a single table.

use super::{GenerationError, bind_integer, qualified};
use crate::sql::{self, order_by_clause, top_clause, where_clause};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

pub fn get_table_data(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let columns = sql::select_list(args.text("columns"))
        .map_err(|e| GenerationError::identifier("columns", e))?;

    let mut statement = SqlStatement::new(format!(
        "SELECT {}{} FROM {}{}{}",
        top_clause(args.integer("limit"), "limit"),
        columns,
        qualified(args, "tableName")?,
        where_clause(args.text("whereClause")),
        order_by_clause(args.text("orderBy")),
    ));
    bind_integer(&mut statement, args, "limit");
    Ok(statement)
}

pub fn get_table_count(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(format!(
        "SELECT COUNT(*) as RowCount FROM {}{}",
        qualified(args, "tableName")?,
        where_clause(args.text("whereClause")),
    )))
}
