//! # sqlgate-adapter-mssql
//!
//! SQL Server implementation of [`sqlgate_runtime::SqlExecutor`].
//!
//! Submodules:
//! - `config`: connection configuration and bb8 pool setup
//! - `params`: named parameters to positional tiberius binds
//! - `query`: row extraction, error mapping and statement classification
//! - `executor`: the executor itself

mod config;
mod executor;
mod params;
mod query;

pub use config::{
    ConnectionManager, MssqlClient, MssqlConnection, MssqlPool, SessionState, build_pool,
};
pub use executor::MssqlExecutor;
