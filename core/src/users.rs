//! Lightweight user records for assignee pickers and role administration.

use crate::error::ApiError;
use crate::http::{path_segment, HttpClient, Transport};
use crate::models::{Role, RoleChange, User, UserId};

pub const CURRENT_ASSIGNEE_LABEL: &str = "Current assignee";

impl<T: Transport> HttpClient<T> {
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/users").await
    }

    pub async fn update_user_role(&self, id: &UserId, role: Role) -> Result<User, ApiError> {
        self.put(&format!("/users/{}/role", path_segment(&id.0)), &RoleChange { role })
            .await
    }
}

/// An entry of an assignee `<select>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeOption {
    pub id: UserId,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDirectory {
    users: Vec<User>,
    pub loading: bool,
}

impl UserDirectory {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users,
            loading: false,
        }
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn replace_all(&mut self, users: Vec<User>) {
        self.users = users;
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.users.clear();
        self.loading = false;
    }

    #[must_use]
    pub fn name_of(&self, id: &UserId) -> Option<&str> {
        self.users
            .iter()
            .find(|user| &user.id == id)
            .map(|user| user.name.as_str())
    }

    /// How an owner is shown in a read-only cell.
    #[must_use]
    pub fn owner_label(&self, owner: &UserId, me: Option<&UserId>) -> String {
        if me == Some(owner) {
            return "Me".to_string();
        }
        self.name_of(owner)
            .map_or_else(|| owner.to_string(), str::to_string)
    }

    /// Options for reassigning a task; the current owner is always selectable.
    #[must_use]
    pub fn assignee_options(&self, current: &UserId) -> Vec<AssigneeOption> {
        let mut options = Vec::with_capacity(self.users.len() + 1);
        if self.name_of(current).is_none() {
            options.push(AssigneeOption {
                id: current.clone(),
                label: format!("{CURRENT_ASSIGNEE_LABEL} — {current}"),
            });
        }
        options.extend(self.users.iter().map(|user| AssigneeOption {
            id: user.id.clone(),
            label: format!("{} — {}", user.name, user.email),
        }));
        options
    }

    /// Options for a new task; the creator is listed even before the directory loads.
    #[must_use]
    pub fn creation_options(&self, me: &User) -> Vec<AssigneeOption> {
        let mut options = Vec::with_capacity(self.users.len() + 1);
        if self.name_of(&me.id).is_none() {
            options.push(AssigneeOption {
                id: me.id.clone(),
                label: me.name.clone(),
            });
        }
        options.extend(self.users.iter().map(|user| AssigneeOption {
            id: user.id.clone(),
            label: user.name.clone(),
        }));
        options
    }

    /// Case-insensitive match on name or email; a blank term matches everyone.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&User> {
        let term = term.trim().to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                term.is_empty()
                    || user.name.to_lowercase().contains(&term)
                    || user.email.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Swaps in the record returned by a role change.
    pub fn apply_updated(&mut self, updated: User) {
        if let Some(slot) = self.users.iter_mut().find(|user| user.id == updated.id) {
            *slot = updated;
        }
    }
}
