//! The task view query and its URL representation.
//!
//! The query string is the source of truth. [`ViewQueryController`] re-derives the
//! resolved [`ViewQuery`] from it on every external URL change and turns user edits
//! into URL writes, reporting when a new fetch is due.
//!
//! | param   | type                                  | default      |
//! |---------|---------------------------------------|--------------|
//! | `status`| `todo` \| `inprogress` \| `done`      | all statuses |
//! | `sort`  | `[-]createdAt` \| `[-]priority` \| `[-]dueDate` | `-createdAt` |
//! | `page`  | integer ≥ 1                           | `1`          |
//! | `limit` | integer ≥ 1                           | `10`         |
//! | `new`   | `1` opens the create-task modal       | closed       |

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use url::form_urlencoded;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::models::{Status, UnknownVariant};

const STATUS_PARAM: &str = "status";
const SORT_PARAM: &str = "sort";
const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";
const NEW_TASK_PARAM: &str = "new";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    CreatedAtDesc,
    CreatedAtAsc,
    PriorityDesc,
    PriorityAsc,
    DueDateDesc,
    DueDateAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::CreatedAtDesc,
        SortKey::CreatedAtAsc,
        SortKey::PriorityDesc,
        SortKey::PriorityAsc,
        SortKey::DueDateDesc,
        SortKey::DueDateAsc,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::CreatedAtDesc => "-createdAt",
            SortKey::CreatedAtAsc => "createdAt",
            SortKey::PriorityDesc => "-priority",
            SortKey::PriorityAsc => "priority",
            SortKey::DueDateDesc => "-dueDate",
            SortKey::DueDateAsc => "dueDate",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SortKey::CreatedAtDesc => "Newest",
            SortKey::CreatedAtAsc => "Oldest",
            SortKey::PriorityDesc => "Priority ↓",
            SortKey::PriorityAsc => "Priority ↑",
            SortKey::DueDateDesc => "Due date ↓",
            SortKey::DueDateAsc => "Due date ↑",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which task page is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewQuery {
    /// `None` shows every status.
    pub status: Option<Status>,
    pub sort: SortKey,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            status: None,
            sort: SortKey::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A user-driven edit of the view query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    Status(Option<Status>),
    Sort(SortKey),
    PageSize(u32),
    Page(u32),
}

/// How a URL write interacts with browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// `replaceState`: filter churn does not pile up history entries.
    Replace,
    /// `pushState`: back/forward steps through pages.
    Push,
}

impl ViewQuery {
    /// Applies a change; anything but a page change returns to page 1.
    #[must_use]
    pub fn apply(self, change: QueryChange) -> (ViewQuery, HistoryMode) {
        match change {
            QueryChange::Status(status) => (
                ViewQuery {
                    status,
                    page: 1,
                    ..self
                },
                HistoryMode::Replace,
            ),
            QueryChange::Sort(sort) => (
                ViewQuery {
                    sort,
                    page: 1,
                    ..self
                },
                HistoryMode::Replace,
            ),
            QueryChange::PageSize(limit) => (
                ViewQuery {
                    limit: limit.max(1),
                    page: 1,
                    ..self
                },
                HistoryMode::Replace,
            ),
            QueryChange::Page(page) => (
                ViewQuery {
                    page: page.max(1),
                    ..self
                },
                HistoryMode::Push,
            ),
        }
    }

    /// Path for `GET /tasks`; unlike the URL, every parameter is explicit.
    #[must_use]
    pub fn to_api_path(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(status) = self.status {
            params.append_pair(STATUS_PARAM, status.as_str());
        }
        params
            .append_pair(SORT_PARAM, self.sort.as_str())
            .append_pair(PAGE_PARAM, &self.page.to_string())
            .append_pair(LIMIT_PARAM, &self.limit.to_string());
        format!("/tasks?{}", params.finish())
    }
}

fn positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

/// Everything the dashboard keeps in its query string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardUrl {
    pub query: ViewQuery,
    pub new_task_open: bool,
    /// Unrecognized parameters, re-emitted untouched.
    pub extra: Vec<(String, String)>,
}

impl DashboardUrl {
    /// Parses `location.search` (leading `?` optional). Invalid values fall back to defaults.
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let search = search.strip_prefix('?').unwrap_or(search);
        let mut url = DashboardUrl::default();

        for (key, value) in form_urlencoded::parse(search.as_bytes()) {
            match key.as_ref() {
                STATUS_PARAM => url.query.status = value.parse().ok(),
                SORT_PARAM => url.query.sort = value.parse().unwrap_or_default(),
                PAGE_PARAM => url.query.page = positive(&value).unwrap_or(1),
                LIMIT_PARAM => {
                    url.query.limit = positive(&value).unwrap_or(DEFAULT_PAGE_SIZE);
                }
                NEW_TASK_PARAM => url.new_task_open = value == "1",
                _ => url.extra.push((key.into_owned(), value.into_owned())),
            }
        }
        url
    }

    /// Serializes to `?…`, or an empty string when everything is default.
    #[must_use]
    pub fn to_search(&self) -> String {
        let defaults = ViewQuery::default();
        let mut params = form_urlencoded::Serializer::new(String::new());

        if let Some(status) = self.query.status {
            params.append_pair(STATUS_PARAM, status.as_str());
        }
        if self.query.sort != defaults.sort {
            params.append_pair(SORT_PARAM, self.query.sort.as_str());
        }
        if self.query.page != defaults.page {
            params.append_pair(PAGE_PARAM, &self.query.page.to_string());
        }
        if self.query.limit != defaults.limit {
            params.append_pair(LIMIT_PARAM, &self.query.limit.to_string());
        }
        if self.new_task_open {
            params.append_pair(NEW_TASK_PARAM, "1");
        }
        for (key, value) in &self.extra {
            params.append_pair(key, value);
        }

        let encoded = params.finish();
        if encoded.is_empty() {
            encoded
        } else {
            format!("?{encoded}")
        }
    }
}

/// A URL write the view must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlUpdate {
    pub search: String,
    pub mode: HistoryMode,
}

/// Result of feeding an event to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    pub url: Option<UrlUpdate>,
    /// Set when the resolved query changed; exactly one fetch is due.
    pub fetch: Option<ViewQuery>,
}

#[derive(Debug, Clone, Default)]
pub struct ViewQueryController {
    url: DashboardUrl,
    fetched: Option<ViewQuery>,
}

impl ViewQueryController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn query(&self) -> ViewQuery {
        self.url.query
    }

    #[must_use]
    pub fn new_task_open(&self) -> bool {
        self.url.new_task_open
    }

    /// Re-derives state from the URL (mount, back/forward). Never writes the URL.
    pub fn sync_from_url(&mut self, search: &str) -> Transition {
        self.url = DashboardUrl::parse(search);
        Transition {
            url: None,
            fetch: self.fetch_if_changed(),
        }
    }

    pub fn change(&mut self, change: QueryChange) -> Transition {
        let (next, mode) = self.url.query.apply(change);
        if next == self.url.query {
            return Transition::default();
        }
        self.url.query = next;
        Transition {
            url: Some(UrlUpdate {
                search: self.url.to_search(),
                mode,
            }),
            fetch: self.fetch_if_changed(),
        }
    }

    /// Opens or closes the create-task modal without touching the query.
    pub fn set_new_task_open(&mut self, open: bool) -> Option<UrlUpdate> {
        if self.url.new_task_open == open {
            return None;
        }
        self.url.new_task_open = open;
        Some(UrlUpdate {
            search: self.url.to_search(),
            mode: HistoryMode::Replace,
        })
    }

    /// Closes the new-task dialog when `key` is Escape and it is open.
    pub fn dismiss_on_key(&mut self, key: &str) -> Option<UrlUpdate> {
        if key == "Escape" {
            self.set_new_task_open(false)
        } else {
            None
        }
    }

    /// Forces a fetch of the current query, e.g. after signing in again.
    pub fn reload(&mut self) -> ViewQuery {
        self.fetched = Some(self.url.query);
        self.url.query
    }

    fn fetch_if_changed(&mut self) -> Option<ViewQuery> {
        let query = self.url.query;
        if self.fetched == Some(query) {
            return None;
        }
        debug!(query = %query.to_api_path(), "view query changed");
        self.fetched = Some(query);
        Some(query)
    }
}
