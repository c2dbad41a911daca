//! Optional-clause builders and the raw splice point.
//!
//! Every piece of caller text that ends up in SQL without quoting or binding
//! passes through [`splice_raw`]. Its callers are:
//!
//! - `whereClause` and `orderBy` on `get_table_data` / `get_table_count`
//! - column `dataType` and `defaultValue` in `create_table`
//! - view query text in `create_view`
//! - parameter types, return type and body in `create_function`
//! - query text in `execute_query` and `analyze_query_plan`
//! - `repairOption` in `check_database_integrity`

use std::fmt;

use super::quote::{IdentifierError, quote_identifier};

/// Caller text placed into a statement verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spliced<'a>(&'a str);

impl Spliced<'_> {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

impl fmt::Display for Spliced<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Mark caller text for verbatim inclusion in SQL.
pub fn splice_raw<'a>(origin: &'static str, fragment: &'a str) -> Spliced<'a> {
    tracing::trace!(origin, len = fragment.len(), "Splicing caller text into statement");
    Spliced(fragment)
}

/// ` WHERE <condition>`, or nothing when absent or blank.
pub fn where_clause(condition: Option<&str>) -> String {
    match condition.filter(|c| !c.trim().is_empty()) {
        Some(condition) => format!(" WHERE {}", splice_raw("whereClause", condition)),
        None => String::new(),
    }
}

/// ` ORDER BY <ordering>`, or nothing when absent or blank.
pub fn order_by_clause(ordering: Option<&str>) -> String {
    match ordering.filter(|o| !o.trim().is_empty()) {
        Some(ordering) => format!(" ORDER BY {}", splice_raw("orderBy", ordering)),
        None => String::new(),
    }
}

/// `TOP (@<parameter>) ` when a row limit applies.
pub fn top_clause(limit: Option<i64>, parameter: &str) -> String {
    match limit {
        Some(_) => format!("TOP (@{parameter}) "),
        None => String::new(),
    }
}

/// Select list from a comma separated column string; `*` or nothing selects all.
pub fn select_list(columns: Option<&str>) -> Result<String, IdentifierError> {
    let columns = match columns.map(str::trim) {
        None | Some("") | Some("*") => return Ok("*".to_string()),
        Some(columns) => columns,
    };
    let quoted: Vec<String> = columns
        .split(',')
        .map(|column| quote_identifier(column.trim()))
        .collect::<Result<_, _>>()?;
    Ok(quoted.join(", "))
}
