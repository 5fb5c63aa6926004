//! The CronApi service trait and its error types.

use crate::{
    AuditLogPageQuery, Job, JobAuditLog, JobAuditLogQuery, JobQuery, Listing, Locale,
    RegisteredJob, RegisteredJobQuery, UpdateRegisteredJobRequest,
};
use async_trait::async_trait;
use std::fmt;

/// One method per endpoint under `/api/v1/cron`.
///
/// Every call maps to exactly one HTTP request. Implementations never retry and never
/// cache; a failed call is returned to the caller as is.
#[async_trait]
pub trait CronApi: Send + Sync {
    /// All job audit logs visible to the caller.
    async fn list_job_audit_logs(
        &self,
        query: &JobAuditLogQuery,
    ) -> Result<Vec<Listing<JobAuditLog>>, CronApiError>;

    async fn get_job_audit_log(&self, id: &str) -> Result<JobAuditLog, CronApiError>;

    async fn delete_job_audit_log(&self, id: &str) -> Result<(), CronApiError>;

    /// All jobs visible to the caller, localized per `query.lang`.
    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Listing<Job>>, CronApiError>;

    async fn get_job(&self, id: &str, lang: Locale) -> Result<Job, CronApiError>;

    async fn delete_job(&self, id: &str) -> Result<(), CronApiError>;

    async fn list_registered_jobs(
        &self,
        query: &RegisteredJobQuery,
    ) -> Result<Vec<RegisteredJob>, CronApiError>;

    async fn get_registered_job(&self, id: &str) -> Result<RegisteredJob, CronApiError>;

    /// Update a registered job. Only `is_enabled` can change; returns the updated job.
    async fn update_registered_job(
        &self,
        id: &str,
        update: &UpdateRegisteredJobRequest,
    ) -> Result<RegisteredJob, CronApiError>;

    /// Audit logs of one registered job.
    async fn list_registered_job_audit_logs(
        &self,
        id: &str,
        query: &AuditLogPageQuery,
    ) -> Result<Vec<JobAuditLog>, CronApiError>;

    /// Apply pending migrations.
    async fn migrate_up(&self) -> Result<serde_json::Value, CronApiError>;

    /// Revert the last migration.
    async fn migrate_down(&self) -> Result<serde_json::Value, CronApiError>;

    /// Admin only.
    async fn seed_reference_data(&self) -> Result<serde_json::Value, CronApiError>;

    /// Admin only.
    async fn seed_sample_data(&self) -> Result<serde_json::Value, CronApiError>;

    /// Enable or disable a registered job.
    async fn set_registered_job_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<RegisteredJob, CronApiError> {
        self.update_registered_job(id, &UpdateRegisteredJobRequest::enabled(enabled))
            .await
    }
}

/// Non-success HTTP response, carrying the status and what the server said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub status_text: String,
    /// Contract description of the status for this endpoint.
    pub message: String,
    /// Response body; JSON when the server sent JSON, a string otherwise, `null` if empty.
    pub body: serde_json::Value,
}

impl ApiError {
    /// Message supplied by the server, if any: the `error` or `message` field of a JSON
    /// body, or the body text itself.
    pub fn server_message(&self) -> Option<&str> {
        match &self.body {
            serde_json::Value::String(s) if !s.is_empty() => Some(s),
            serde_json::Value::Object(map) => map
                .get("error")
                .or_else(|| map.get("message"))
                .and_then(|v| v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}: {}", self.method, self.url, self.status, self.message)?;
        if let Some(msg) = self.server_message() {
            write!(f, " ({msg})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, thiserror::Error)]
pub enum CronApiError {
    #[error("api error: {0}")]
    Api(#[from] ApiError),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("request cancelled")]
    Cancelled,
}

impl CronApiError {
    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            CronApiError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_error(status: u16, body: serde_json::Value) -> ApiError {
        ApiError {
            method: "GET".to_string(),
            url: "http://localhost/api/v1/cron/jobs/x".to_string(),
            status,
            status_text: "Not Found".to_string(),
            message: "Job not found".to_string(),
            body,
        }
    }

    #[test]
    fn server_message_prefers_error_field() {
        let e = api_error(404, json!({ "error": "job not found", "message": "other" }));
        assert_eq!(e.server_message(), Some("job not found"));
        let e = api_error(500, json!("boom"));
        assert_eq!(e.server_message(), Some("boom"));
        let e = api_error(401, serde_json::Value::Null);
        assert_eq!(e.server_message(), None);
    }

    #[test]
    fn status_is_preserved_through_wrapper() {
        let err = CronApiError::from(api_error(404, serde_json::Value::Null));
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert_eq!(CronApiError::Cancelled.status(), None);
        assert!(err.to_string().contains("404: Job not found"));
    }
}
