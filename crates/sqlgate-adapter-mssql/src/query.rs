//! Result extraction: rows to JSON, driver errors to execution errors, and
//! statement classification.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::{Number, Value};
use sqlgate_runtime::{ExecutionError, Row};
use tiberius::{ColumnData, FromSql};

/// Leading keywords of statements that report affected rows instead of rows.
const MODIFYING_KEYWORDS: &[&str] = &[
    "INSERT", "UPDATE", "DELETE", "MERGE", "CREATE", "ALTER", "DROP", "TRUNCATE", "GRANT",
    "REVOKE", "DENY", "BACKUP", "RESTORE",
];

/// Plan options that must be toggled in their own batch.
const SHOWPLAN_OPTIONS: &[&str] = &["SHOWPLAN_ALL", "SHOWPLAN_TEXT", "SHOWPLAN_XML"];

/// Whether the statement is run for its affected-row count.
///
/// Decided on the first keyword only; an `INSERT ... OUTPUT` loses its rows
/// and an `EXEC` that modifies data reports zero affected rows.
pub(crate) fn is_modification(text: &str) -> bool {
    let first = text
        .split(|c: char| c.is_whitespace() || c == '(' || c == ';')
        .find(|word| !word.is_empty())
        .unwrap_or_default();
    MODIFYING_KEYWORDS
        .iter()
        .any(|keyword| first.eq_ignore_ascii_case(keyword))
}

/// Split `SET <plan option> ON; <body>; SET <plan option> OFF;` into its three
/// batches.
pub(crate) fn split_showplan(text: &str) -> Option<(String, String, String)> {
    let trimmed = text.trim();
    SHOWPLAN_OPTIONS.iter().find_map(|option| {
        let on = format!("SET {} ON;", option);
        let off = format!("SET {} OFF;", option);
        let body = trimmed.strip_prefix(on.as_str())?.strip_suffix(off.as_str())?;
        Some((on, body.trim().to_string(), off))
    })
}

/// Convert an owned driver row into a JSON object keyed by column name.
pub(crate) fn row_to_json(row: tiberius::Row) -> Row {
    let names: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
    names
        .into_iter()
        .zip(row)
        .map(|(name, data)| (name, column_value(data)))
        .collect()
}

pub(crate) fn column_value(data: ColumnData<'static>) -> Value {
    match data {
        ColumnData::U8(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I16(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I32(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::I64(v) => v.map(Value::from).unwrap_or(Value::Null),
        ColumnData::F32(v) => v.map(|f| float(f64::from(f))).unwrap_or(Value::Null),
        ColumnData::F64(v) => v.map(float).unwrap_or(Value::Null),
        ColumnData::Bit(v) => v.map(Value::Bool).unwrap_or(Value::Null),
        ColumnData::String(v) => v.map(|s| Value::String(s.into_owned())).unwrap_or(Value::Null),
        ColumnData::Guid(v) => v.map(|g| Value::String(g.to_string())).unwrap_or(Value::Null),
        ColumnData::Binary(v) => v.map(|b| Value::String(hex(&b))).unwrap_or(Value::Null),
        ColumnData::Numeric(v) => v.map(|n| decimal(&n.to_string())).unwrap_or(Value::Null),
        ColumnData::Xml(v) => v
            .map(|x| Value::String(x.into_owned().into_string()))
            .unwrap_or(Value::Null),
        temporal => temporal_value(&temporal).unwrap_or(Value::Null),
    }
}

fn temporal_value(data: &ColumnData<'static>) -> tiberius::Result<Value> {
    let text = match data {
        ColumnData::Date(_) => NaiveDate::from_sql(data)?.map(|d| d.to_string()),
        ColumnData::Time(_) => NaiveTime::from_sql(data)?.map(|t| t.to_string()),
        ColumnData::DateTimeOffset(_) => {
            DateTime::<FixedOffset>::from_sql(data)?.map(|d| d.to_rfc3339())
        }
        _ => NaiveDateTime::from_sql(data)?.map(|d| d.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
    };
    Ok(text.map(Value::String).unwrap_or(Value::Null))
}

fn float(value: f64) -> Value {
    Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
}

// Decimals with more digits than an f64 carries keep their exact text.
fn decimal(text: &str) -> Value {
    let digits = text.chars().filter(char::is_ascii_digit).count();
    match text.parse::<f64>() {
        Ok(value) if digits <= 15 => float(value),
        _ => Value::String(text.to_string()),
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("0x");
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Map a driver error onto the executor contract.
pub(crate) fn execution_error(error: tiberius::error::Error) -> ExecutionError {
    use tiberius::error::Error;

    match error {
        Error::Server(token) => ExecutionError::Database {
            message: token.message().to_string(),
            code: Some(token.code()),
        },
        Error::Io { .. } | Error::Tls(_) | Error::Routing { .. } => {
            ExecutionError::Connection(error.to_string())
        }
        other => ExecutionError::database(other.to_string()),
    }
}
