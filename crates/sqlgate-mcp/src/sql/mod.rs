//! SQL fragment builders.
//!
//! Identifiers are always bracket-quoted; values are bound as parameters
//! wherever the statement shape allows; the remaining caller text goes through
//! [`splice_raw`].

pub mod clause;
pub mod quote;

pub use clause::{Spliced, order_by_clause, select_list, splice_raw, top_clause, where_clause};
pub use quote::{
    IdentifierError, MAX_IDENTIFIER_LENGTH, check_data_type, check_identifier,
    check_multipart_name, parameter_name, qualified_name, quote_identifier, quote_literal,
    quote_multipart,
};
