//! CLI definitions for cronctl.

use clap::{Args, Parser, Subcommand};
use cron_client::{ClientConfig, DEFAULT_BASE_URL};
use cron_types::{
    AuditLogPageQuery, Detail, JobAuditLogQuery, JobQuery, Locale, RegisteredJobQuery,
    RegisteredJobSortBy, SortOrder, DEFAULT_PAGE, DEFAULT_PAGE_SIZE,
};

/// Command-line access to the cron job-scheduling API.
#[derive(Parser, Debug)]
#[command(name = "cronctl")]
#[command(version)]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "CRON_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Bearer token
    #[arg(long, env = "CRON_API_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Basic auth username, used when no token is given
    #[arg(long, env = "CRON_API_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "CRON_API_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.base_url.clone());
        if let Some(token) = &self.token {
            config = config.with_token(token.clone());
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            config = config.with_basic_auth(username.clone(), password.clone());
        }
        config
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Job audit logs
    AuditLogs {
        #[command(subcommand)]
        action: AuditLogAction,
    },

    /// Job rows
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },

    /// Jobs registered by running instances
    RegisteredJobs {
        #[command(subcommand)]
        action: RegisteredJobAction,
    },

    /// Schema migrations (admin)
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },

    /// Seed data (admin)
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },

    /// Print the next run time of a 6-field cron expression (no network)
    NextRun {
        /// Expression with seconds, e.g. "0 */5 * * * *"
        expr: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuditLogAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[command(flatten)]
        sort: SortArgs,
        /// basic or full
        #[arg(long)]
        detail: Option<Detail>,
    },
    Get {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum JobAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
        #[command(flatten)]
        sort: SortArgs,
        /// basic or full
        #[arg(long)]
        detail: Option<Detail>,
        /// en or fr
        #[arg(long, default_value = "en")]
        lang: Locale,
    },
    Get {
        id: String,
        #[arg(long, default_value = "en")]
        lang: Locale,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegisteredJobAction {
    List {
        #[command(flatten)]
        paging: PageArgs,
        /// job_name, schedule, last_registered_at or is_enabled
        #[arg(long, default_value = "job_name")]
        sort_by: RegisteredJobSortBy,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
    },
    Get {
        id: String,
    },
    Enable {
        id: String,
    },
    Disable {
        id: String,
    },
    /// Audit logs of one registered job
    AuditLogs {
        id: String,
        #[command(flatten)]
        paging: PageArgs,
        #[command(flatten)]
        sort: SortArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    Up,
    Down,
}

#[derive(Subcommand, Debug)]
pub enum SeedAction {
    Reference,
    Sample,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: u32,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Job name prefix
    #[arg(short)]
    pub q: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SortArgs {
    #[arg(long)]
    pub sort_by: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<SortOrder>,
}

impl AuditLogAction {
    pub(crate) fn list_query(paging: PageArgs, sort: SortArgs, detail: Option<Detail>) -> JobAuditLogQuery {
        JobAuditLogQuery {
            page: paging.page,
            page_size: paging.page_size,
            sort_by: sort.sort_by,
            order: sort.order,
            q: paging.q,
            detail,
        }
    }
}

impl JobAction {
    pub(crate) fn list_query(
        paging: PageArgs,
        sort: SortArgs,
        detail: Option<Detail>,
        lang: Locale,
    ) -> JobQuery {
        JobQuery {
            page: paging.page,
            page_size: paging.page_size,
            sort_by: sort.sort_by,
            order: sort.order,
            q: paging.q,
            detail,
            lang,
        }
    }
}

impl RegisteredJobAction {
    pub(crate) fn list_query(
        paging: PageArgs,
        sort_by: RegisteredJobSortBy,
        order: SortOrder,
    ) -> RegisteredJobQuery {
        RegisteredJobQuery {
            page: paging.page,
            page_size: paging.page_size,
            sort_by,
            order,
            q: paging.q,
        }
    }

    pub(crate) fn audit_log_query(paging: PageArgs, sort: SortArgs) -> AuditLogPageQuery {
        AuditLogPageQuery {
            page: paging.page,
            page_size: paging.page_size,
            sort_by: sort.sort_by,
            order: sort.order,
            q: paging.q,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_flags_map_to_query() {
        let cli = Cli::try_parse_from([
            "cronctl",
            "jobs",
            "list",
            "--page",
            "2",
            "--page-size",
            "50",
            "-q",
            "clean",
            "--detail",
            "basic",
            "--lang",
            "fr",
        ])
        .unwrap();
        let Command::Jobs {
            action:
                JobAction::List {
                    paging,
                    sort,
                    detail,
                    lang,
                },
        } = cli.command
        else {
            panic!("expected jobs list");
        };
        let query = JobAction::list_query(paging, sort, detail, lang);
        assert_eq!(query.page, 2);
        assert_eq!(query.page_size, 50);
        assert_eq!(query.q.as_deref(), Some("clean"));
        assert_eq!(query.detail, Some(Detail::Basic));
        assert_eq!(query.lang, Locale::Fr);
        assert_eq!(query.sort_by, None);
    }

    #[test]
    fn registered_list_defaults() {
        let cli = Cli::try_parse_from(["cronctl", "registered-jobs", "list"]).unwrap();
        let Command::RegisteredJobs {
            action: RegisteredJobAction::List {
                paging,
                sort_by,
                order,
            },
        } = cli.command
        else {
            panic!("expected registered-jobs list");
        };
        assert_eq!(
            RegisteredJobAction::list_query(paging, sort_by, order),
            RegisteredJobQuery::default()
        );
    }

    #[test]
    fn rejects_unknown_sort_column() {
        let err = Cli::try_parse_from([
            "cronctl",
            "registered-jobs",
            "list",
            "--sort-by",
            "tenant_id",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn token_wins_but_basic_auth_is_kept() {
        let cli = Cli::try_parse_from([
            "cronctl",
            "--base-url",
            "http://cron.internal:9000",
            "--token",
            "t",
            "--username",
            "admin",
            "--password",
            "pw",
            "migrate",
            "up",
        ])
        .unwrap();
        let config = cli.client_config();
        assert_eq!(config.base_url, "http://cron.internal:9000");
        assert_eq!(config.token.as_deref(), Some("t"));
        assert_eq!(config.username.as_deref(), Some("admin"));
    }
}
