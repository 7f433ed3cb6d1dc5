//! Which controls a role gets. These only shape the UI; the backend re-checks
//! every request and wins any disagreement.

use crate::models::{Role, Task, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    EditTitle,
    EditPriority,
    EditDueDate,
    EditStatus,
    ReassignOwner,
    Delete,
}

/// Whether `role` may perform `action` on `task`; `me` is the signed-in user.
#[must_use]
pub fn can(role: Role, action: Action, task: &Task, me: &UserId) -> bool {
    match (action, role) {
        (_, Role::Admin) => true,
        (Action::EditPriority | Action::EditDueDate | Action::EditStatus, Role::Manager) => true,
        (Action::EditStatus, Role::User) => task.is_owned_by(me),
        _ => false,
    }
}

/// A column of the task table that can be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Title,
    Priority,
    Status,
    DueDate,
    Owner,
}

/// The per-row result of [`can`], computed once per render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowPermissions {
    pub edit_title: bool,
    pub edit_priority: bool,
    pub edit_due_date: bool,
    pub edit_status: bool,
    pub reassign_owner: bool,
    pub delete: bool,
}

impl RowPermissions {
    #[must_use]
    pub fn for_task(role: Role, task: &Task, me: &UserId) -> Self {
        Self {
            edit_title: can(role, Action::EditTitle, task, me),
            edit_priority: can(role, Action::EditPriority, task, me),
            edit_due_date: can(role, Action::EditDueDate, task, me),
            edit_status: can(role, Action::EditStatus, task, me),
            reassign_owner: can(role, Action::ReassignOwner, task, me),
            delete: can(role, Action::Delete, task, me),
        }
    }

    #[must_use]
    pub fn allows(&self, field: TaskField) -> bool {
        match field {
            TaskField::Title => self.edit_title,
            TaskField::Priority => self.edit_priority,
            TaskField::Status => self.edit_status,
            TaskField::DueDate => self.edit_due_date,
            TaskField::Owner => self.reassign_owner,
        }
    }
}

/// The admin page and the full user directory.
#[must_use]
pub fn can_manage_users(role: Role) -> bool {
    role == Role::Admin
}

/// Choosing someone other than yourself as owner when creating a task.
#[must_use]
pub fn can_pick_assignee(role: Role) -> bool {
    role == Role::Admin
}

/// Sharing a new task with team members.
#[must_use]
pub fn can_assign_team(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}
