//! In-memory CronApi for tests: seeded records, no network.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use cron_types::{
    ApiError, AuditLogPageQuery, BasicEntity, CronApi, CronApiError, Detail, Job, JobAuditLog,
    JobAuditLogQuery, JobQuery, JobRunStatus, JobStatus, Listing, Locale, RegisteredJob,
    RegisteredJobQuery, RegisteredJobSortBy, SortOrder, UpdateRegisteredJobRequest,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct MockState {
    jobs: Vec<Job>,
    registered_jobs: Vec<RegisteredJob>,
    audit_logs: Vec<JobAuditLog>,
    calls: Vec<String>,
}

/// Mock API backed by plain vectors. Supports paging, prefix search, basic detail,
/// 404s for unknown ids and enable/disable updates.
pub struct MockCronApi {
    state: RwLock<MockState>,
}

impl MockCronApi {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState::default()),
        }
    }

    /// Mock preloaded with two registered jobs, their job rows and one audit log each.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut state = MockState::default();
        for (name, schedule, long_running) in [
            ("cleanup", "0 */5 * * * *", false),
            ("reindex", "0 0 3 * * *", true),
        ] {
            let registered = RegisteredJob {
                id: Uuid::new_v4(),
                job_name: name.to_string(),
                description: None,
                schedule: schedule.to_string(),
                is_long_running: long_running,
                is_enabled: true,
                last_registered_at: now,
                instance_id: "instance-a".to_string(),
                tenant_id: "tenant-1".to_string(),
                created_at: now - Duration::days(1),
                updated_at: now,
            };
            state.jobs.push(Job {
                id: Uuid::new_v4(),
                job_name: name.to_string(),
                schedule: Some(schedule.to_string()),
                status: Some(JobStatus::Completed),
                description: None,
                lock: Some(name.to_string()),
                instance_id: Some("instance-a".to_string()),
                tenant_id: Some("tenant-1".to_string()),
                next_run_time: None,
                last_heartbeat: None,
                created_at: Some(now),
                updated_at: Some(now),
            });
            state.audit_logs.push(JobAuditLog {
                id: Uuid::new_v4(),
                app_id: "instance-a".to_string(),
                request_id: Uuid::new_v4().to_string(),
                job_name: name.to_string(),
                scheduled_time: now - Duration::minutes(5),
                start_time: Some(now - Duration::minutes(5)),
                end_time: Some(now - Duration::minutes(4)),
                status: JobRunStatus::Completed,
                output: Some("Job completed successfully".to_string()),
                error: None,
                tenant_id: "tenant-1".to_string(),
                created_at: now - Duration::minutes(5),
                updated_at: None,
            });
            state.registered_jobs.push(registered);
        }
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn with_jobs(mut self, jobs: Vec<Job>) -> Self {
        self.state.get_mut().jobs = jobs;
        self
    }

    pub fn with_registered_jobs(mut self, jobs: Vec<RegisteredJob>) -> Self {
        self.state.get_mut().registered_jobs = jobs;
        self
    }

    pub fn with_audit_logs(mut self, logs: Vec<JobAuditLog>) -> Self {
        self.state.get_mut().audit_logs = logs;
        self
    }

    pub async fn jobs(&self) -> Vec<Job> {
        self.state.read().await.jobs.clone()
    }

    pub async fn registered_jobs(&self) -> Vec<RegisteredJob> {
        self.state.read().await.registered_jobs.clone()
    }

    pub async fn audit_logs(&self) -> Vec<JobAuditLog> {
        self.state.read().await.audit_logs.clone()
    }

    /// Operations invoked so far, e.g. `"PATCH registered-jobs/<id>"`.
    pub async fn calls(&self) -> Vec<String> {
        self.state.read().await.calls.clone()
    }

    async fn record(&self, call: String) {
        self.state.write().await.calls.push(call);
    }
}

impl Default for MockCronApi {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(method: &str, path: String, message: &str) -> CronApiError {
    ApiError {
        method: method.to_string(),
        url: path,
        status: 404,
        status_text: "Not Found".to_string(),
        message: message.to_string(),
        body: serde_json::json!({ "error": "not found" }),
    }
    .into()
}

fn page<T>(items: Vec<T>, page: u32, page_size: u32) -> Vec<T> {
    let offset = page.saturating_sub(1) as usize * page_size as usize;
    items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect()
}

fn matches_prefix(name: &str, q: &Option<String>) -> bool {
    q.as_deref().map_or(true, |q| name.starts_with(q))
}

/// Audit logs default to newest `scheduled_time` first; unknown columns sort by it too.
fn sort_audit_logs(logs: &mut [JobAuditLog], sort_by: Option<&str>, order: Option<SortOrder>) {
    match sort_by {
        Some("job_name") => logs.sort_by(|a, b| a.job_name.cmp(&b.job_name)),
        Some("start_time") => logs.sort_by_key(|l| l.start_time),
        Some("end_time") => logs.sort_by_key(|l| l.end_time),
        Some("created_at") => logs.sort_by_key(|l| l.created_at),
        _ => logs.sort_by_key(|l| l.scheduled_time),
    }
    if order.unwrap_or(SortOrder::Desc) == SortOrder::Desc {
        logs.reverse();
    }
}

#[async_trait]
impl CronApi for MockCronApi {
    async fn list_job_audit_logs(
        &self,
        query: &JobAuditLogQuery,
    ) -> Result<Vec<Listing<JobAuditLog>>, CronApiError> {
        self.record("GET job-audit-logs".to_string()).await;
        let mut logs: Vec<JobAuditLog> = self
            .audit_logs()
            .await
            .into_iter()
            .filter(|l| matches_prefix(&l.job_name, &query.q))
            .collect();
        sort_audit_logs(&mut logs, query.sort_by.as_deref(), query.order);
        let logs = page(logs, query.page, query.page_size);
        Ok(logs
            .into_iter()
            .map(|l| match query.detail {
                Some(Detail::Basic) => Listing::Basic(BasicEntity {
                    id: l.id.to_string(),
                    name: l.job_name,
                }),
                _ => Listing::Full(l),
            })
            .collect())
    }

    async fn get_job_audit_log(&self, id: &str) -> Result<JobAuditLog, CronApiError> {
        self.record(format!("GET job-audit-logs/{id}")).await;
        self.audit_logs()
            .await
            .into_iter()
            .find(|l| l.id.to_string() == id)
            .ok_or_else(|| {
                not_found("GET", format!("job-audit-logs/{id}"), "job audit log not found")
            })
    }

    async fn delete_job_audit_log(&self, id: &str) -> Result<(), CronApiError> {
        self.record(format!("DELETE job-audit-logs/{id}")).await;
        let mut state = self.state.write().await;
        let before = state.audit_logs.len();
        state.audit_logs.retain(|l| l.id.to_string() != id);
        if state.audit_logs.len() == before {
            return Err(not_found(
                "DELETE",
                format!("job-audit-logs/{id}"),
                "job audit log not found",
            ));
        }
        Ok(())
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Listing<Job>>, CronApiError> {
        self.record(format!("GET jobs?lang={}", query.lang)).await;
        let jobs: Vec<Job> = self
            .jobs()
            .await
            .into_iter()
            .filter(|j| matches_prefix(&j.job_name, &query.q))
            .collect();
        let jobs = page(jobs, query.page, query.page_size);
        Ok(jobs
            .into_iter()
            .map(|j| match query.detail {
                Some(Detail::Basic) => Listing::Basic(BasicEntity {
                    id: j.id.to_string(),
                    name: j.job_name,
                }),
                _ => Listing::Full(j),
            })
            .collect())
    }

    async fn get_job(&self, id: &str, lang: Locale) -> Result<Job, CronApiError> {
        self.record(format!("GET jobs/{id}?lang={lang}")).await;
        self.jobs()
            .await
            .into_iter()
            .find(|j| j.id.to_string() == id)
            .ok_or_else(|| not_found("GET", format!("jobs/{id}"), "Job not found"))
    }

    async fn delete_job(&self, id: &str) -> Result<(), CronApiError> {
        self.record(format!("DELETE jobs/{id}")).await;
        let mut state = self.state.write().await;
        let before = state.jobs.len();
        state.jobs.retain(|j| j.id.to_string() != id);
        if state.jobs.len() == before {
            return Err(not_found("DELETE", format!("jobs/{id}"), "Job not found"));
        }
        Ok(())
    }

    async fn list_registered_jobs(
        &self,
        query: &RegisteredJobQuery,
    ) -> Result<Vec<RegisteredJob>, CronApiError> {
        self.record("GET registered-jobs".to_string()).await;
        let mut jobs: Vec<RegisteredJob> = self
            .registered_jobs()
            .await
            .into_iter()
            .filter(|j| matches_prefix(&j.job_name, &query.q))
            .collect();
        jobs.sort_by(|a, b| match query.sort_by {
            RegisteredJobSortBy::JobName => a.job_name.cmp(&b.job_name),
            RegisteredJobSortBy::Schedule => a.schedule.cmp(&b.schedule),
            RegisteredJobSortBy::LastRegisteredAt => a.last_registered_at.cmp(&b.last_registered_at),
            RegisteredJobSortBy::IsEnabled => a.is_enabled.cmp(&b.is_enabled),
        });
        if query.order == SortOrder::Desc {
            jobs.reverse();
        }
        Ok(page(jobs, query.page, query.page_size))
    }

    async fn get_registered_job(&self, id: &str) -> Result<RegisteredJob, CronApiError> {
        self.record(format!("GET registered-jobs/{id}")).await;
        self.registered_jobs()
            .await
            .into_iter()
            .find(|j| j.id.to_string() == id)
            .ok_or_else(|| not_found("GET", format!("registered-jobs/{id}"), "Job not found"))
    }

    async fn update_registered_job(
        &self,
        id: &str,
        update: &UpdateRegisteredJobRequest,
    ) -> Result<RegisteredJob, CronApiError> {
        self.record(format!("PATCH registered-jobs/{id}")).await;
        let mut state = self.state.write().await;
        let job = state
            .registered_jobs
            .iter_mut()
            .find(|j| j.id.to_string() == id)
            .ok_or_else(|| not_found("PATCH", format!("registered-jobs/{id}"), "Job not found"))?;
        if let Some(enabled) = update.is_enabled {
            job.is_enabled = enabled;
            job.updated_at = Utc::now();
        }
        Ok(job.clone())
    }

    async fn list_registered_job_audit_logs(
        &self,
        id: &str,
        query: &AuditLogPageQuery,
    ) -> Result<Vec<JobAuditLog>, CronApiError> {
        self.record(format!("GET registered-jobs/{id}/audit-logs")).await;
        let state = self.state.read().await;
        let job = state
            .registered_jobs
            .iter()
            .find(|j| j.id.to_string() == id)
            .ok_or_else(|| not_found("GET", format!("registered-jobs/{id}"), "Job not found"))?;
        let mut logs: Vec<JobAuditLog> = state
            .audit_logs
            .iter()
            .filter(|l| l.job_name == job.job_name)
            .filter(|l| matches_prefix(&l.job_name, &query.q))
            .cloned()
            .collect();
        sort_audit_logs(&mut logs, query.sort_by.as_deref(), query.order);
        Ok(page(logs, query.page, query.page_size))
    }

    async fn migrate_up(&self) -> Result<serde_json::Value, CronApiError> {
        self.record("POST migrate/up".to_string()).await;
        Ok(serde_json::json!({ "status": "ok" }))
    }

    async fn migrate_down(&self) -> Result<serde_json::Value, CronApiError> {
        self.record("POST migrate/down".to_string()).await;
        Ok(serde_json::json!({ "status": "ok" }))
    }

    async fn seed_reference_data(&self) -> Result<serde_json::Value, CronApiError> {
        self.record("POST seed/reference".to_string()).await;
        Ok(serde_json::json!({ "status": "ok" }))
    }

    async fn seed_sample_data(&self) -> Result<serde_json::Value, CronApiError> {
        self.record("POST seed/sample".to_string()).await;
        Ok(serde_json::json!({ "status": "ok" }))
    }
}
