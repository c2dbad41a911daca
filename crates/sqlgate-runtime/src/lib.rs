//! # sqlgate-runtime
//!
//! The contract between the statement-generation engine and whatever actually
//! talks to the database. The engine produces [`SqlStatement`] values and hands
//! them to a [`SqlExecutor`]; adapters (see `sqlgate-adapter-mssql`) own
//! connections and pooling.

pub mod adapter;

pub use adapter::{ExecutionError, ExecutionResult, Row, SqlExecutor, SqlStatement};
