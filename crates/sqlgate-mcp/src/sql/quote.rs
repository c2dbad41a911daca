//! Identifier and literal quoting for T-SQL.

use regex::Regex;
use std::sync::LazyLock;

/// Longest identifier SQL Server accepts (`sysname`).
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

static PARAMETER_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@?([A-Za-z_][A-Za-z0-9_]*)$").expect("parameter name pattern is valid")
});

// `INT`, `NVARCHAR(50)`, `DECIMAL(10, 2)`, `VARBINARY(MAX)`, `DOUBLE PRECISION`, `dbo.MyType`
static DATA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<schema>[A-Za-z_][A-Za-z0-9_]*)\.)?(?P<name>[A-Za-z_][A-Za-z0-9_]*(?:\s+[A-Za-z_][A-Za-z0-9_]*)*)\s*(?:\(\s*(?:max|\d+(?:\s*,\s*\d+)?)\s*\))?$",
    )
    .expect("data type pattern is valid")
});

/// Type names spelled with more than one word.
const MULTI_WORD_TYPES: &[&str] = &[
    "DOUBLE PRECISION",
    "CHAR VARYING",
    "CHARACTER VARYING",
    "BINARY VARYING",
    "NATIONAL CHAR",
    "NATIONAL CHARACTER",
    "NATIONAL CHAR VARYING",
    "NATIONAL CHARACTER VARYING",
    "NATIONAL TEXT",
];

/// Column modifiers and constraint keywords the generator emits itself.
const MODIFIER_KEYWORDS: &[&str] = &[
    "PRIMARY",
    "KEY",
    "IDENTITY",
    "NULL",
    "NOT",
    "DEFAULT",
    "CONSTRAINT",
    "REFERENCES",
    "CHECK",
    "UNIQUE",
    "COLLATE",
];

/// Why a name cannot be placed into SQL text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier must not be empty")]
    Empty,

    #[error("identifier is longer than {MAX_IDENTIFIER_LENGTH} characters")]
    TooLong,

    #[error("identifier contains a NUL character")]
    Nul,

    #[error("identifier '{0}' is already quoted")]
    AlreadyQuoted(String),

    #[error("'{0}' is not a valid parameter name")]
    ParameterName(String),

    #[error("'{0}' is not a valid data type")]
    DataType(String),

    #[error("'{0}' is not a valid object name")]
    ObjectName(String),
}

/// Check that `name` can be bracket-quoted.
pub fn check_identifier(name: &str) -> Result<(), IdentifierError> {
    if name.is_empty() {
        return Err(IdentifierError::Empty);
    }
    if name.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(IdentifierError::TooLong);
    }
    if name.contains('\0') {
        return Err(IdentifierError::Nul);
    }
    if is_delimited(name) {
        return Err(IdentifierError::AlreadyQuoted(name.to_string()));
    }
    Ok(())
}

fn is_delimited(name: &str) -> bool {
    name.len() >= 2
        && ((name.starts_with('[') && name.ends_with(']'))
            || (name.starts_with('"') && name.ends_with('"')))
}

/// Bracket-quote a single identifier, doubling any `]`.
pub fn quote_identifier(name: &str) -> Result<String, IdentifierError> {
    check_identifier(name)?;
    Ok(format!("[{}]", name.replace(']', "]]")))
}

/// `[schema].[object]`
pub fn qualified_name(schema: &str, object: &str) -> Result<String, IdentifierError> {
    Ok(format!(
        "{}.{}",
        quote_identifier(schema)?,
        quote_identifier(object)?
    ))
}

/// Check a dotted object name of one to three parts (`proc`, `schema.proc`,
/// `database.schema.proc`).
pub fn check_multipart_name(name: &str) -> Result<(), IdentifierError> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 3 {
        return Err(IdentifierError::ObjectName(name.to_string()));
    }
    for part in parts {
        check_identifier(part).map_err(|_| IdentifierError::ObjectName(name.to_string()))?;
    }
    Ok(())
}

/// Quote every part of a dotted object name: `a.b` becomes `[a].[b]`.
pub fn quote_multipart(name: &str) -> Result<String, IdentifierError> {
    check_multipart_name(name)?;
    let quoted: Vec<String> = name
        .split('.')
        .map(quote_identifier)
        .collect::<Result<_, _>>()?;
    Ok(quoted.join("."))
}

/// Validate a routine parameter name and return it without the leading `@`.
pub fn parameter_name(name: &str) -> Result<&str, IdentifierError> {
    PARAMETER_NAME
        .captures(name)
        .and_then(|captures| captures.get(1))
        .map(|bare| bare.as_str())
        .ok_or_else(|| IdentifierError::ParameterName(name.to_string()))
}

/// Check a column or return type name against the type-name grammar.
///
/// A type is one name (optionally schema-qualified) or one of the standard
/// multi-word spellings, followed by an optional length or precision.
pub fn check_data_type(data_type: &str) -> Result<(), IdentifierError> {
    let invalid = || IdentifierError::DataType(data_type.to_string());
    let captures = DATA_TYPE.captures(data_type.trim()).ok_or_else(invalid)?;
    let words: Vec<String> = captures["name"]
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect();

    if words.iter().any(|word| MODIFIER_KEYWORDS.contains(&word.as_str())) {
        return Err(invalid());
    }
    if words.len() > 1 {
        let spelled = words.join(" ");
        if captures.name("schema").is_some() || !MULTI_WORD_TYPES.contains(&spelled.as_str()) {
            return Err(invalid());
        }
    }
    Ok(())
}

/// Unicode string literal: `N'...'` with embedded quotes doubled.
pub fn quote_literal(value: &str) -> String {
    format!("N'{}'", value.replace('\'', "''"))
}
