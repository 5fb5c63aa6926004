//! reqwest implementation of `CronApi`.

use crate::request::{send, ApiRequest, ErrorTable};
use crate::ClientConfig;
use async_trait::async_trait;
use cron_types::{
    AuditLogPageQuery, CronApi, CronApiError, Job, JobAuditLog, JobAuditLogQuery, JobQuery,
    Listing, Locale, QueryParams, RegisteredJob, RegisteredJobQuery, UpdateRegisteredJobRequest,
};
use reqwest::Method;
use std::fmt;

const JOB_AUDIT_LOGS: &str = "/api/v1/cron/job-audit-logs";
const JOB_AUDIT_LOG: &str = "/api/v1/cron/job-audit-logs/{id}";
const JOBS: &str = "/api/v1/cron/jobs";
const JOB: &str = "/api/v1/cron/jobs/{id}";
const REGISTERED_JOBS: &str = "/api/v1/cron/registered-jobs";
const REGISTERED_JOB: &str = "/api/v1/cron/registered-jobs/{id}";
const REGISTERED_JOB_AUDIT_LOGS: &str = "/api/v1/cron/registered-jobs/{id}/audit-logs";
const MIGRATE_UP: &str = "/api/v1/cron/migrate/up";
const MIGRATE_DOWN: &str = "/api/v1/cron/migrate/down";
const SEED_REFERENCE: &str = "/api/v1/cron/seed/reference";
const SEED_SAMPLE: &str = "/api/v1/cron/seed/sample";

const LIST_ERRORS: ErrorTable = &[(401, "Unauthorized"), (403, "Forbidden")];
const AUDIT_LOG_ERRORS: ErrorTable = &[
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "job audit log not found"),
];
const JOB_ERRORS: ErrorTable = &[
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (404, "Job not found"),
];
const LIST_REGISTERED_ERRORS: ErrorTable = &[
    (400, "Bad request"),
    (401, "Unauthorized"),
    (500, "Internal server error"),
];
const GET_REGISTERED_ERRORS: ErrorTable = &[
    (401, "Unauthorized"),
    (404, "Job not found"),
    (500, "Internal server error"),
];
const UPDATE_REGISTERED_ERRORS: ErrorTable = &[
    (400, "Bad request"),
    (401, "Unauthorized"),
    (404, "Job not found"),
    (500, "Internal server error"),
];
const MIGRATE_ERRORS: ErrorTable = &[
    (401, "Unauthorized"),
    (403, "Forbidden"),
    (500, "Internal server error"),
];
const SEED_ERRORS: ErrorTable = &[
    (401, "Unauthorized"),
    (403, "Forbidden - requires admin privileges"),
    (500, "Internal server error"),
];

/// Client that calls the cron API over HTTP. Cheap to clone; clones share the
/// connection pool.
#[derive(Clone)]
pub struct HttpCronClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpCronClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Use a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, CronApiError> {
        send(&self.client, &self.config, request).await
    }

    /// List endpoints answer `null` (or nothing) when there are no rows.
    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<T>, CronApiError> {
        self.call::<Option<Vec<T>>>(request)
            .await
            .map(Option::unwrap_or_default)
    }
}

impl fmt::Debug for HttpCronClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCronClient")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl CronApi for HttpCronClient {
    async fn list_job_audit_logs(
        &self,
        query: &JobAuditLogQuery,
    ) -> Result<Vec<Listing<JobAuditLog>>, CronApiError> {
        let req = ApiRequest::new(Method::GET, JOB_AUDIT_LOGS)
            .query(query.query_pairs())
            .errors(LIST_ERRORS);
        self.list(req).await
    }

    async fn get_job_audit_log(&self, id: &str) -> Result<JobAuditLog, CronApiError> {
        let req = ApiRequest::new(Method::GET, JOB_AUDIT_LOG)
            .path_param("id", id)
            .errors(AUDIT_LOG_ERRORS);
        self.call(req).await
    }

    async fn delete_job_audit_log(&self, id: &str) -> Result<(), CronApiError> {
        let req = ApiRequest::new(Method::DELETE, JOB_AUDIT_LOG)
            .path_param("id", id)
            .errors(AUDIT_LOG_ERRORS);
        self.call::<serde_json::Value>(req).await.map(|_| ())
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Listing<Job>>, CronApiError> {
        let req = ApiRequest::new(Method::GET, JOBS)
            .query(query.query_pairs())
            .errors(LIST_ERRORS);
        self.list(req).await
    }

    async fn get_job(&self, id: &str, lang: Locale) -> Result<Job, CronApiError> {
        let req = ApiRequest::new(Method::GET, JOB)
            .path_param("id", id)
            .query(vec![("lang", lang.to_string())])
            .errors(JOB_ERRORS);
        self.call(req).await
    }

    async fn delete_job(&self, id: &str) -> Result<(), CronApiError> {
        let req = ApiRequest::new(Method::DELETE, JOB)
            .path_param("id", id)
            .errors(JOB_ERRORS);
        self.call::<serde_json::Value>(req).await.map(|_| ())
    }

    async fn list_registered_jobs(
        &self,
        query: &RegisteredJobQuery,
    ) -> Result<Vec<RegisteredJob>, CronApiError> {
        let req = ApiRequest::new(Method::GET, REGISTERED_JOBS)
            .query(query.query_pairs())
            .errors(LIST_REGISTERED_ERRORS);
        self.list(req).await
    }

    async fn get_registered_job(&self, id: &str) -> Result<RegisteredJob, CronApiError> {
        let req = ApiRequest::new(Method::GET, REGISTERED_JOB)
            .path_param("id", id)
            .errors(GET_REGISTERED_ERRORS);
        self.call(req).await
    }

    async fn update_registered_job(
        &self,
        id: &str,
        update: &UpdateRegisteredJobRequest,
    ) -> Result<RegisteredJob, CronApiError> {
        let req = ApiRequest::new(Method::PATCH, REGISTERED_JOB)
            .path_param("id", id)
            .json_body(update)?
            .errors(UPDATE_REGISTERED_ERRORS);
        self.call(req).await
    }

    async fn list_registered_job_audit_logs(
        &self,
        id: &str,
        query: &AuditLogPageQuery,
    ) -> Result<Vec<JobAuditLog>, CronApiError> {
        let req = ApiRequest::new(Method::GET, REGISTERED_JOB_AUDIT_LOGS)
            .path_param("id", id)
            .query(query.query_pairs())
            .errors(LIST_ERRORS);
        self.list(req).await
    }

    async fn migrate_up(&self) -> Result<serde_json::Value, CronApiError> {
        let req = ApiRequest::new(Method::POST, MIGRATE_UP).errors(MIGRATE_ERRORS);
        self.call(req).await
    }

    async fn migrate_down(&self) -> Result<serde_json::Value, CronApiError> {
        let req = ApiRequest::new(Method::POST, MIGRATE_DOWN).errors(MIGRATE_ERRORS);
        self.call(req).await
    }

    async fn seed_reference_data(&self) -> Result<serde_json::Value, CronApiError> {
        let req = ApiRequest::new(Method::POST, SEED_REFERENCE).errors(SEED_ERRORS);
        self.call(req).await
    }

    async fn seed_sample_data(&self) -> Result<serde_json::Value, CronApiError> {
        let req = ApiRequest::new(Method::POST, SEED_SAMPLE).errors(SEED_ERRORS);
        self.call(req).await
    }
}
