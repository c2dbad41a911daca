//! Statement generators, one per catalog operation.
//!
//! A generator is a pure function from [`ValidatedArguments`] to a
//! [`SqlStatement`]. Identifiers are quoted through [`crate::sql`]; data values
//! are bound as named parameters.

pub mod agent;
pub mod data;
pub mod ddl;
pub mod diagnostics;
pub mod maintenance;
pub mod metadata;
pub mod query;
pub mod security;

use crate::sql::{self, IdentifierError};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

/// Signature shared by every generator.
pub type Generator = fn(&ValidatedArguments) -> Result<SqlStatement, GenerationError>;

/// Arguments passed validation but cannot form a statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("argument '{0}' is missing")]
    MissingArgument(&'static str),

    #[error("'{field}' cannot be quoted: {source}")]
    Identifier {
        field: String,
        #[source]
        source: IdentifierError,
    },

    #[error("{0}")]
    Inconsistent(String),
}

impl GenerationError {
    pub fn identifier(field: impl Into<String>, source: IdentifierError) -> Self {
        Self::Identifier {
            field: field.into(),
            source,
        }
    }
}

/// Required text argument.
pub(crate) fn required<'a>(
    args: &'a ValidatedArguments,
    name: &'static str,
) -> Result<&'a str, GenerationError> {
    args.text(name).ok_or(GenerationError::MissingArgument(name))
}

/// Bracket-quoted single identifier taken from `field`.
pub(crate) fn quoted(args: &ValidatedArguments, field: &'static str) -> Result<String, GenerationError> {
    sql::quote_identifier(required(args, field)?)
        .map_err(|e| GenerationError::identifier(field, e))
}

/// `[schemaName].[<object_field>]`.
pub(crate) fn qualified(
    args: &ValidatedArguments,
    object_field: &'static str,
) -> Result<String, GenerationError> {
    Ok(format!(
        "{}.{}",
        quoted(args, "schemaName")?,
        quoted(args, object_field)?
    ))
}

/// Copy a text argument into a bound parameter of the same name, if present.
pub(crate) fn bind_text(statement: &mut SqlStatement, args: &ValidatedArguments, name: &str) {
    if let Some(value) = args.text(name) {
        statement.bind(name, value);
    }
}

/// Copy an integer argument into a bound parameter of the same name, if present.
pub(crate) fn bind_integer(statement: &mut SqlStatement, args: &ValidatedArguments, name: &str) {
    if let Some(value) = args.integer(name) {
        statement.bind(name, value);
    }
}
