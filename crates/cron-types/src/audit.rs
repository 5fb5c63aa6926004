//! Audit trail types: one JobAuditLog per job execution attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Listing;

/// Outcome recorded for one execution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobRunStatus {
    Started,
    Completed,
    Failed,
    /// Another instance held the lock.
    Skipped,
    #[serde(other)]
    Unknown,
}

impl JobRunStatus {
    /// True once the attempt can no longer change.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobRunStatus::Completed | JobRunStatus::Failed | JobRunStatus::Skipped
        )
    }
}

/// Immutable record of one execution attempt of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAuditLog {
    pub id: Uuid,
    /// Instance that ran the attempt.
    pub app_id: String,
    pub request_id: String,
    pub job_name: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: JobRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobAuditLog {
    /// Wall time between start and end, when both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

impl Listing<JobAuditLog> {
    pub fn name(&self) -> &str {
        match self {
            Listing::Full(log) => &log.job_name,
            Listing::Basic(b) => &b.name,
        }
    }
}
