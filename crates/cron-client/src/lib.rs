//! HTTP client for the cron job-scheduling API.
//!
//! ```no_run
//! use cron_client::{CancelableExt, ClientConfig, CronApi, HttpCronClient};
//! use cron_types::RegisteredJobQuery;
//!
//! # async fn example() -> Result<(), cron_types::CronApiError> {
//! let client = HttpCronClient::new(ClientConfig::new("http://localhost:8080").with_token("t"));
//! let query = RegisteredJobQuery::default();
//! let call = client.list_registered_jobs(&query).cancelable();
//! let handle = call.handle();
//! # let _ = handle;
//! let jobs = call.await?;
//! # let _ = jobs;
//! # Ok(())
//! # }
//! ```

mod cancel;
mod config;
mod http;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod request;

pub use cancel::{CancelHandle, Cancelable, CancelableExt};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use cron_types::{ApiError, CronApi, CronApiError};
pub use http::HttpCronClient;

#[cfg(feature = "test-util")]
pub use mock::MockCronApi;
