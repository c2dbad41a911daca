//! SQL Server Agent job metadata from `msdb`.

use super::{GenerationError, bind_text};
use crate::validator::ValidatedArguments;
use sqlgate_runtime::SqlStatement;

const JOBS: &str = "\
SELECT
  job_id,
  name AS JobName,
  enabled,
  description,
  date_created,
  date_modified,
  CASE
    WHEN enabled = 1 THEN 'Enabled'
    ELSE 'Disabled'
  END AS Status
FROM msdb.dbo.sysjobs";

const JOB_HISTORY: &str = "\
SELECT
  j.name AS JobName,
  jh.step_name AS StepName,
  jh.run_date,
  jh.run_time,
  jh.run_duration,
  CASE jh.run_status
    WHEN 0 THEN 'Failed'
    WHEN 1 THEN 'Succeeded'
    WHEN 2 THEN 'Retry'
    WHEN 3 THEN 'Canceled'
    WHEN 4 THEN 'In Progress'
  END AS RunStatus,
  jh.message
FROM msdb.dbo.sysjobhistory jh
INNER JOIN msdb.dbo.sysjobs j ON jh.job_id = j.job_id
WHERE jh.run_date >= CONVERT(int, CONVERT(varchar(8), DATEADD(day, -CAST(@days AS int), GETDATE()), 112))";

pub fn list_sql_agent_jobs(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let filter = match args.text("status") {
        Some("enabled") => "\nWHERE enabled = 1",
        Some("disabled") => "\nWHERE enabled = 0",
        _ => "",
    };
    Ok(SqlStatement::new(format!("{}{}\nORDER BY name", JOBS, filter)))
}

/// History rows from the last `days` days, newest first.
pub fn get_job_history(args: &ValidatedArguments) -> Result<SqlStatement, GenerationError> {
    let days = args
        .integer("days")
        .ok_or(GenerationError::MissingArgument("days"))?;

    let mut text = JOB_HISTORY.to_string();
    if args.contains("jobName") {
        text.push_str("\n  AND j.name = @jobName");
    }
    text.push_str("\nORDER BY jh.run_date DESC, jh.run_time DESC");

    let mut statement = SqlStatement::new(text).with_parameter("days", days);
    bind_text(&mut statement, args, "jobName");
    Ok(statement)
}
