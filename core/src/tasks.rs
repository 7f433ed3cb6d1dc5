//! The in-memory task page and the `/tasks` calls that feed it.
//!
//! State changes only through the `apply_*` methods, called with the outcome of
//! a request once it resolves. Fetches are ticketed: only the newest ticket may
//! commit, so a slow earlier response can never overwrite a later one.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{path_segment, HttpClient, Method, Transport};
use crate::models::{NewTask, Task, TaskId, TaskPage, TaskPatch};
use crate::query::ViewQuery;

/// Issuance number of a list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was issued; the response was dropped.
    Superseded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    pub items: Vec<Task>,
    pub total: u64,
    pub loading: bool,
    pub error: Option<String>,
    busy: HashSet<TaskId>,
    latest: u64,
}

impl TaskState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the list as loading and invalidates every earlier ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        FetchTicket(self.latest)
    }

    /// Forgets any in-flight fetch, e.g. when leaving the view.
    pub fn cancel_fetches(&mut self) {
        self.latest += 1;
        self.loading = false;
    }

    #[must_use]
    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn apply_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<TaskPage, ApiError>,
    ) -> FetchOutcome {
        if !self.is_current(ticket) {
            debug!(ticket = ticket.0, latest = self.latest, "dropping superseded task page");
            return FetchOutcome::Superseded;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.data;
                self.total = page.total;
                self.error = None;
            }
            Err(e) => {
                warn!("task fetch failed: {e}");
                self.error = Some(e.user_message());
            }
        }
        FetchOutcome::Applied
    }

    /// Prepends regardless of the active sort; the next fetch restores order.
    pub fn apply_created(&mut self, task: Task) {
        self.items.insert(0, task);
        self.total += 1;
    }

    pub fn apply_updated(&mut self, task: Task) {
        self.busy.remove(&task.id);
        if let Some(slot) = self.items.iter_mut().find(|t| t.id == task.id) {
            *slot = task;
        } else {
            debug!(id = %task.id, "updated task is not on the current page");
        }
    }

    pub fn apply_deleted(&mut self, id: &TaskId) {
        self.busy.remove(id);
        let before = self.items.len();
        self.items.retain(|t| &t.id != id);
        if self.items.len() < before {
            self.total = self.total.saturating_sub(1);
        }
    }

    /// A failed mutation only releases the row.
    pub fn apply_failed(&mut self, id: &TaskId) {
        self.busy.remove(id);
    }

    pub fn mark_busy(&mut self, id: TaskId) {
        self.busy.insert(id);
    }

    #[must_use]
    pub fn is_busy(&self, id: &TaskId) -> bool {
        self.busy.contains(id)
    }

    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.items.iter().find(|t| &t.id == id)
    }
}

impl<T: Transport> HttpClient<T> {
    pub async fn fetch_tasks(&self, query: &ViewQuery) -> Result<TaskPage, ApiError> {
        self.get(&query.to_api_path()).await
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        self.post("/tasks", task).await
    }

    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.put(&format!("/tasks/{}", path_segment(&id.0)), patch).await
    }

    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        self.send_unit(Method::Delete, &format!("/tasks/{}", path_segment(&id.0)), None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Status, UserId};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn task(id: &str) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("Task {id}"),
            description: None,
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: None,
            owner: UserId::from("u1"),
            team_ids: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn page(ids: &[&str], total: u64) -> TaskPage {
        TaskPage {
            data: ids.iter().map(|id| task(id)).collect(),
            total,
            page: 1,
            limit: 10,
        }
    }

    fn ids(state: &TaskState) -> Vec<&str> {
        state.items.iter().map(|t| t.id.0.as_str()).collect()
    }

    #[test]
    fn test_fetch_replaces_in_server_order() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        assert!(state.loading);

        assert_eq!(
            state.apply_fetch(ticket, Ok(page(&["C", "A", "B"], 12))),
            FetchOutcome::Applied
        );
        assert_eq!(ids(&state), vec!["C", "A", "B"]);
        assert_eq!(state.total, 12);
        assert!(!state.loading);
    }

    #[test]
    fn test_late_response_of_superseded_fetch_is_dropped() {
        let mut state = TaskState::new();
        let first = state.begin_fetch();
        let second = state.begin_fetch();

        assert_eq!(
            state.apply_fetch(second, Ok(page(&["Q2"], 1))),
            FetchOutcome::Applied
        );
        assert_eq!(
            state.apply_fetch(first, Ok(page(&["Q1a", "Q1b"], 2))),
            FetchOutcome::Superseded
        );
        assert_eq!(ids(&state), vec!["Q2"]);
        assert_eq!(state.total, 1);
    }

    #[test]
    fn test_superseded_response_does_not_clear_loading() {
        let mut state = TaskState::new();
        let first = state.begin_fetch();
        let _second = state.begin_fetch();
        state.apply_fetch(first, Ok(page(&["Q1"], 1)));
        assert!(state.loading);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_page() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.apply_fetch(ticket, Ok(page(&["A", "B"], 2)));

        let ticket = state.begin_fetch();
        state.apply_fetch(
            ticket,
            Err(ApiError::Http {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(ids(&state), vec!["A", "B"]);
        assert_eq!(state.error.as_deref(), Some("boom"));
        assert!(!state.loading);
    }

    #[test]
    fn test_cancel_ignores_in_flight_fetch() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.cancel_fetches();
        assert_eq!(
            state.apply_fetch(ticket, Ok(page(&["A"], 1))),
            FetchOutcome::Superseded
        );
        assert!(!state.loading);
        assert_eq!(state.error, None);
    }

    #[test]
    fn test_create_prepends_and_counts() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.apply_fetch(ticket, Ok(page(&["B", "C"], 2)));

        state.apply_created(task("New"));
        assert_eq!(ids(&state), vec!["New", "B", "C"]);
        assert_eq!(state.total, 3);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.apply_fetch(ticket, Ok(page(&["A", "B", "C"], 3)));
        state.mark_busy(TaskId::from("B"));

        let mut done = task("B");
        done.status = Status::Done;
        state.apply_updated(done);

        assert_eq!(ids(&state), vec!["A", "B", "C"]);
        assert_eq!(state.total, 3);
        assert_eq!(state.get(&TaskId::from("B")).unwrap().status, Status::Done);
        assert!(!state.is_busy(&TaskId::from("B")));
    }

    #[test]
    fn test_delete_removes_and_decrements() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.apply_fetch(ticket, Ok(page(&["A", "B", "C"], 7)));

        state.apply_deleted(&TaskId::from("C"));
        assert_eq!(ids(&state), vec!["A", "B"]);
        assert_eq!(state.total, 6);
    }

    #[test]
    fn test_failed_mutation_only_releases_row() {
        let mut state = TaskState::new();
        let ticket = state.begin_fetch();
        state.apply_fetch(ticket, Ok(page(&["A"], 1)));
        let before = state.items.clone();

        state.mark_busy(TaskId::from("A"));
        assert!(state.is_busy(&TaskId::from("A")));
        state.apply_failed(&TaskId::from("A"));

        assert!(!state.is_busy(&TaskId::from("A")));
        assert_eq!(state.items, before);
        assert_eq!(state.total, 1);
    }
}
