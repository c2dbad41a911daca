//! Server and database health queries.

use super::{GenerationError, bind_integer, required};
use crate::sql::{splice_raw, top_clause};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

const DATABASE_INFO: &str = "\
SELECT
  DB_NAME() AS DatabaseName,
  SUSER_SNAME() AS CurrentUser,
  @@VERSION AS SQLServerVersion,
  @@SERVERNAME AS ServerName,
  GETDATE() AS CurrentDateTime,
  (SELECT recovery_model_desc FROM sys.databases WHERE name = DB_NAME()) AS RecoveryModel,
  (SELECT collation_name FROM sys.databases WHERE name = DB_NAME()) AS Collation,
  (SELECT compatibility_level FROM sys.databases WHERE name = DB_NAME()) AS CompatibilityLevel";

const TABLE_SIZES_BODY: &str = "\
  t.NAME AS TableName,
  s.Name AS SchemaName,
  p.rows AS RowCounts,
  SUM(a.total_pages) * 8 AS TotalSpaceKB,
  SUM(a.used_pages) * 8 AS UsedSpaceKB,
  (SUM(a.total_pages) - SUM(a.used_pages)) * 8 AS UnusedSpaceKB
FROM sys.tables t
INNER JOIN sys.indexes i ON t.OBJECT_ID = i.object_id
INNER JOIN sys.partitions p ON i.object_id = p.OBJECT_ID AND i.index_id = p.index_id
INNER JOIN sys.allocation_units a ON p.partition_id = a.container_id
LEFT OUTER JOIN sys.schemas s ON t.schema_id = s.schema_id
WHERE t.NAME NOT LIKE 'dt%'
  AND t.is_ms_shipped = 0
  AND i.OBJECT_ID > 255
GROUP BY t.Name, s.Name, p.Rows
ORDER BY SUM(a.total_pages) DESC";

const ACTIVE_CONNECTIONS: &str = "\
SELECT
  session_id,
  login_name,
  host_name,
  program_name,
  status,
  cpu_time,
  memory_usage,
  total_scheduled_time,
  last_request_start_time,
  last_request_end_time,
  reads,
  writes,
  logical_reads
FROM sys.dm_exec_sessions
WHERE is_user_process = 1
ORDER BY last_request_start_time DESC";

const DATABASE_FILES: &str = "\
SELECT
  name AS FileName,
  physical_name AS PhysicalPath,
  type_desc AS FileType,
  size * 8 / 1024 AS SizeMB,
  max_size * 8 / 1024 AS MaxSizeMB,
  is_percent_growth,
  growth AS GrowthSetting,
  state_desc AS FileState
FROM sys.database_files
ORDER BY file_id";

const QUERY_STATISTICS_BODY: &str = "\
  qs.execution_count,
  qs.total_elapsed_time / 1000000.0 AS total_elapsed_time_sec,
  qs.total_worker_time / 1000000.0 AS total_cpu_time_sec,
  qs.total_logical_reads,
  qs.total_logical_writes,
  qs.creation_time,
  qs.last_execution_time,
  SUBSTRING(qt.text, (qs.statement_start_offset/2)+1,
    ((CASE qs.statement_end_offset
      WHEN -1 THEN DATALENGTH(qt.text)
      ELSE qs.statement_end_offset
      END - qs.statement_start_offset)/2)+1) AS statement_text
FROM sys.dm_exec_query_stats qs
CROSS APPLY sys.dm_exec_sql_text(qs.sql_handle) qt
ORDER BY qs.total_elapsed_time DESC";

pub fn get_database_info(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(DATABASE_INFO))
}

/// Largest tables first, optionally limited to `topN`.
pub fn get_table_sizes(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let mut statement = SqlStatement::new(format!(
        "SELECT {}\n{}",
        top_clause(args.integer("topN"), "topN"),
        TABLE_SIZES_BODY
    ));
    bind_integer(&mut statement, args, "topN");
    Ok(statement)
}

pub fn get_active_connections(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(ACTIVE_CONNECTIONS))
}

pub fn get_database_files(_: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    Ok(SqlStatement::new(DATABASE_FILES))
}

/// Estimated plan for the caller's query. Must run as its own batch.
pub fn analyze_query_plan(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let query = required(args, "query")?;
    Ok(SqlStatement::new(format!(
        "SET SHOWPLAN_ALL ON;\n{};\nSET SHOWPLAN_ALL OFF;",
        splice_raw("query", query.trim_end().trim_end_matches(';'))
    )))
}

/// Most expensive cached statements by elapsed time.
pub fn get_query_statistics(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let top_n = args
        .integer("topN")
        .ok_or(GenerationError::MissingArgument("topN"))?;
    Ok(SqlStatement::new(format!("SELECT TOP (@topN)\n{}", QUERY_STATISTICS_BODY))
        .with_parameter("topN", top_n))
}
