//! Core types and traits for the cron job-scheduling API.
//!
//! Models mirror the JSON shapes served under `/api/v1/cron`; field names stay snake_case
//! so payloads round-trip unchanged.

mod audit;
mod dto;
mod params;
mod schedule;
mod traits;

pub use audit::*;
pub use dto::*;
pub use params::*;
pub use schedule::{next_run_after, next_run_time, ScheduleError};
pub use traits::*;
