//! Command handlers: each runs one API call and returns the JSON to print.

use crate::cli::{
    AuditLogAction, Command, JobAction, MigrateAction, RegisteredJobAction, SeedAction,
};
use cron_types::{next_run_time, CronApi, CronApiError};
use serde::Serialize;
use serde_json::{json, Value};

fn to_json<T: Serialize>(value: T) -> Result<Value, CronApiError> {
    serde_json::to_value(value).map_err(|e| CronApiError::Decode(e.to_string()))
}

/// Runs `command` against `api`. Deletes print `{"deleted": "<id>"}`; `next-run` is
/// evaluated locally and never touches `api`.
pub async fn run(api: &dyn CronApi, command: Command) -> Result<Value, CronApiError> {
    match command {
        Command::AuditLogs { action } => audit_logs(api, action).await,
        Command::Jobs { action } => jobs(api, action).await,
        Command::RegisteredJobs { action } => registered_jobs(api, action).await,
        Command::Migrate { action } => match action {
            MigrateAction::Up => api.migrate_up().await,
            MigrateAction::Down => api.migrate_down().await,
        },
        Command::Seed { action } => match action {
            SeedAction::Reference => api.seed_reference_data().await,
            SeedAction::Sample => api.seed_sample_data().await,
        },
        Command::NextRun { expr } => {
            let next = next_run_time(&expr).map_err(|e| CronApiError::InvalidRequest(e.to_string()))?;
            Ok(json!({ "expression": expr, "next_run_time": next }))
        }
    }
}

async fn audit_logs(api: &dyn CronApi, action: AuditLogAction) -> Result<Value, CronApiError> {
    match action {
        AuditLogAction::List {
            paging,
            sort,
            detail,
        } => {
            let query = AuditLogAction::list_query(paging, sort, detail);
            to_json(api.list_job_audit_logs(&query).await?)
        }
        AuditLogAction::Get { id } => to_json(api.get_job_audit_log(&id).await?),
        AuditLogAction::Delete { id } => {
            api.delete_job_audit_log(&id).await?;
            tracing::info!(%id, "job audit log deleted");
            Ok(json!({ "deleted": id }))
        }
    }
}

async fn jobs(api: &dyn CronApi, action: JobAction) -> Result<Value, CronApiError> {
    match action {
        JobAction::List {
            paging,
            sort,
            detail,
            lang,
        } => {
            let query = JobAction::list_query(paging, sort, detail, lang);
            to_json(api.list_jobs(&query).await?)
        }
        JobAction::Get { id, lang } => to_json(api.get_job(&id, lang).await?),
        JobAction::Delete { id } => {
            api.delete_job(&id).await?;
            tracing::info!(%id, "job deleted");
            Ok(json!({ "deleted": id }))
        }
    }
}

async fn registered_jobs(
    api: &dyn CronApi,
    action: RegisteredJobAction,
) -> Result<Value, CronApiError> {
    match action {
        RegisteredJobAction::List {
            paging,
            sort_by,
            order,
        } => {
            let query = RegisteredJobAction::list_query(paging, sort_by, order);
            to_json(api.list_registered_jobs(&query).await?)
        }
        RegisteredJobAction::Get { id } => to_json(api.get_registered_job(&id).await?),
        RegisteredJobAction::Enable { id } => {
            to_json(api.set_registered_job_enabled(&id, true).await?)
        }
        RegisteredJobAction::Disable { id } => {
            to_json(api.set_registered_job_enabled(&id, false).await?)
        }
        RegisteredJobAction::AuditLogs { id, paging, sort } => {
            let query = RegisteredJobAction::audit_log_query(paging, sort);
            to_json(api.list_registered_job_audit_logs(&id, &query).await?)
        }
    }
}
