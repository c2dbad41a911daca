//! Backup and integrity checks.

use super::{GenerationError, required};
use crate::sql;
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

/// `BACKUP DATABASE|LOG ... TO DISK`.
///
/// The target database is bracket-quoted; without one the statement resolves
/// `DB_NAME()` into a variable first. The path and media name are escaped
/// string literals.
pub fn backup_database(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let path = required(args, "backupPath")?;
    let backup_type = args.text("backupType").unwrap_or("FULL");

    let verb = if backup_type == "LOG" { "LOG" } else { "DATABASE" };
    let differential = if backup_type == "DIFFERENTIAL" {
        "DIFFERENTIAL, "
    } else {
        ""
    };

    let (prelude, target, media_name) = match args.text("databaseName") {
        Some(database) => (
            String::new(),
            sql::quote_identifier(database)
                .map_err(|e| GenerationError::identifier("databaseName", e))?,
            sql::quote_literal(&format!("{} {} Backup", database, backup_type)),
        ),
        None => (
            format!(
                "DECLARE @database_name sysname = DB_NAME();\n\
                 DECLARE @backup_name nvarchar(256) = @database_name + N' {} Backup';\n",
                backup_type
            ),
            "@database_name".to_string(),
            "@backup_name".to_string(),
        ),
    };

    Ok(SqlStatement::new(format!(
        "{}BACKUP {} {}\nTO DISK = {}\nWITH {}FORMAT, INIT,\nNAME = {},\nSKIP, NOREWIND, NOUNLOAD, STATS = 10",
        prelude,
        verb,
        target,
        sql::quote_literal(path),
        differential,
        media_name
    )))
}

/// `DBCC CHECKDB`, optionally with a repair option.
pub fn check_database_integrity(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let database = args
        .text("databaseName")
        .map(sql::quote_literal)
        .unwrap_or_else(|| "0".to_string());

    let text = match args.text("repairOption") {
        Some(repair) => format!(
            "DBCC CHECKDB({}, {})",
            database,
            sql::splice_raw("repairOption", repair)
        ),
        None => format!("DBCC CHECKDB({})", database),
    };
    Ok(SqlStatement::new(format!("{} WITH TABLERESULTS", text)))
}
