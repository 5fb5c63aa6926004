//! Query parameters for the list endpoints.
//!
//! Each query type knows its own defaults and renders only the parameters that carry a
//! value; an unset optional is left out of the URL entirely instead of being sent empty.

use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Language for localized job fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Fr,
}

/// Level of detail for list results: `Basic` yields `{id, name}` entries only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detail {
    Basic,
    Full,
}

/// Sortable columns of the registered-jobs listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegisteredJobSortBy {
    #[default]
    JobName,
    Schedule,
    LastRegisteredAt,
    IsEnabled,
}

macro_rules! wire_enum {
    ($ty:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($ty::$variant),)+
                    other => Err(format!(
                        "invalid {}: {other} (expected one of: {})",
                        stringify!($ty),
                        [$($wire),+].join(", ")
                    )),
                }
            }
        }
    };
}

wire_enum!(SortOrder { Asc => "asc", Desc => "desc" });
wire_enum!(Locale { En => "en", Fr => "fr" });
wire_enum!(Detail { Basic => "basic", Full => "full" });
wire_enum!(RegisteredJobSortBy {
    JobName => "job_name",
    Schedule => "schedule",
    LastRegisteredAt => "last_registered_at",
    IsEnabled => "is_enabled",
});

/// Anything that renders as URL query pairs.
pub trait QueryParams {
    /// Pairs to send, in declaration order. Unset optionals are not included.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

fn push_opt<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, v: &Option<T>) {
    if let Some(v) = v {
        pairs.push((key, v.to_string()));
    }
}

fn paging(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("pageSize", page_size.to_string())]
}

/// Parameters for `GET /job-audit-logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobAuditLogQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    /// Prefix match on the job name.
    pub q: Option<String>,
    pub detail: Option<Detail>,
}

impl Default for JobAuditLogQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            order: None,
            q: None,
            detail: None,
        }
    }
}

impl JobAuditLogQuery {
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.order = Some(order);
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }
}

impl QueryParams for JobAuditLogQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = paging(self.page, self.page_size);
        push_opt(&mut pairs, "sortBy", &self.sort_by);
        push_opt(&mut pairs, "order", &self.order);
        push_opt(&mut pairs, "q", &self.q);
        push_opt(&mut pairs, "detail", &self.detail);
        pairs
    }
}

/// Parameters for `GET /jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub q: Option<String>,
    pub detail: Option<Detail>,
    pub lang: Locale,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            order: None,
            q: None,
            detail: None,
            lang: Locale::default(),
        }
    }
}

impl JobQuery {
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.order = Some(order);
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    pub fn detail(mut self, detail: Detail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn lang(mut self, lang: Locale) -> Self {
        self.lang = lang;
        self
    }
}

impl QueryParams for JobQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = paging(self.page, self.page_size);
        push_opt(&mut pairs, "sortBy", &self.sort_by);
        push_opt(&mut pairs, "order", &self.order);
        push_opt(&mut pairs, "q", &self.q);
        push_opt(&mut pairs, "detail", &self.detail);
        pairs.push(("lang", self.lang.to_string()));
        pairs
    }
}

/// Parameters for `GET /registered-jobs`. Sort column and order always have a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredJobQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: RegisteredJobSortBy,
    pub order: SortOrder,
    pub q: Option<String>,
}

impl Default for RegisteredJobQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: RegisteredJobSortBy::JobName,
            order: SortOrder::Asc,
            q: None,
        }
    }
}

impl RegisteredJobQuery {
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort_by: RegisteredJobSortBy, order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.order = order;
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

impl QueryParams for RegisteredJobQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = paging(self.page, self.page_size);
        pairs.push(("sortBy", self.sort_by.to_string()));
        pairs.push(("order", self.order.to_string()));
        push_opt(&mut pairs, "q", &self.q);
        pairs
    }
}

/// Parameters for `GET /registered-jobs/{id}/audit-logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditLogPageQuery {
    pub page: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub order: Option<SortOrder>,
    pub q: Option<String>,
}

impl Default for AuditLogPageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            order: None,
            q: None,
        }
    }
}

impl AuditLogPageQuery {
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.order = Some(order);
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }
}

impl QueryParams for AuditLogPageQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = paging(self.page, self.page_size);
        push_opt(&mut pairs, "sortBy", &self.sort_by);
        push_opt(&mut pairs, "order", &self.order);
        push_opt(&mut pairs, "q", &self.q);
        pairs
    }
}
