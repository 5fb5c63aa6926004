//! Job and registered-job DTOs as returned by the cron API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::{self, ScheduleError};

/// Execution state of a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A scheduled job as tracked by the backend (one row per lock/tenant).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub job_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    /// Localized according to the `lang` the job was fetched with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_run_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_heartbeat: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A job definition recorded by the instance that executes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredJob {
    pub id: Uuid,
    pub job_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Six-field cron expression (seconds first).
    pub schedule: String,
    /// Long-running jobs send heartbeats while they execute.
    pub is_long_running: bool,
    pub is_enabled: bool,
    pub last_registered_at: DateTime<Utc>,
    pub instance_id: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegisteredJob {
    /// Next fire time of this job's schedule, computed locally.
    pub fn next_run_time(&self) -> Result<DateTime<Utc>, ScheduleError> {
        schedule::next_run_time(&self.schedule)
    }
}

/// Reduced `{id, name}` projection returned by list endpoints with `detail=basic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicEntity {
    pub id: String,
    pub name: String,
}

/// One element of a list endpoint that accepts `detail`: either the full record or
/// the basic projection, depending on what the server sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Full(T),
    Basic(BasicEntity),
}

impl<T> Listing<T> {
    pub fn into_full(self) -> Option<T> {
        match self {
            Listing::Full(t) => Some(t),
            Listing::Basic(_) => None,
        }
    }

    pub fn as_full(&self) -> Option<&T> {
        match self {
            Listing::Full(t) => Some(t),
            Listing::Basic(_) => None,
        }
    }
}

impl Listing<Job> {
    pub fn name(&self) -> &str {
        match self {
            Listing::Full(job) => &job.job_name,
            Listing::Basic(b) => &b.name,
        }
    }
}

/// Body of `PATCH /registered-jobs/{id}`. Only fields that are `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateRegisteredJobRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

impl UpdateRegisteredJobRequest {
    pub fn enabled(is_enabled: bool) -> Self {
        Self {
            is_enabled: Some(is_enabled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registered_job_json() -> serde_json::Value {
        json!({
            "id": "6f1c1d2e-4a8b-4c39-9d5e-0b7a3f2e1c44",
            "job_name": "cleanup",
            "schedule": "0 */5 * * * *",
            "is_long_running": false,
            "is_enabled": true,
            "last_registered_at": "2024-05-01T10:00:00Z",
            "instance_id": "instance-a",
            "tenant_id": "tenant-1",
            "created_at": "2024-04-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn registered_job_decodes_without_description() {
        let job: RegisteredJob = serde_json::from_value(registered_job_json()).unwrap();
        assert_eq!(job.job_name, "cleanup");
        assert!(job.description.is_none());
        assert!(job.is_enabled);
    }

    #[test]
    fn update_request_omits_unset_field() {
        let empty = serde_json::to_value(UpdateRegisteredJobRequest::default()).unwrap();
        assert_eq!(empty, json!({}));
        let set = serde_json::to_value(UpdateRegisteredJobRequest::enabled(false)).unwrap();
        assert_eq!(set, json!({ "is_enabled": false }));
    }

    #[test]
    fn listing_decodes_full_and_basic_shapes() {
        let items: Vec<Listing<Job>> = serde_json::from_value(json!([
            {
                "id": "0b0f4a53-8f5e-4f64-a0b6-a3c2b0c1d2e3",
                "job_name": "report",
                "status": "running"
            },
            { "id": "0b0f4a53-8f5e-4f64-a0b6-a3c2b0c1d2e4", "name": "digest" }
        ]))
        .unwrap();
        assert_eq!(items[0].name(), "report");
        assert_eq!(
            items[0].as_full().and_then(|j| j.status),
            Some(JobStatus::Running)
        );
        assert!(matches!(items[1], Listing::Basic(_)));
        assert_eq!(items[1].name(), "digest");
    }

    #[test]
    fn unknown_job_status_is_tolerated() {
        let job: Job = serde_json::from_value(json!({
            "id": "0b0f4a53-8f5e-4f64-a0b6-a3c2b0c1d2e3",
            "job_name": "report",
            "status": "paused"
        }))
        .unwrap();
        assert_eq!(job.status, Some(JobStatus::Unknown));
    }
}
