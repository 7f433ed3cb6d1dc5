//! Form buffers and the light checks run before submitting. The server
//! validates again; these only save a round trip.

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::models::{
    Credentials, NewTask, Priority, Registration, Status, Task, TaskPatch, User, UserId,
};
use crate::permissions::{can_assign_team, can_pick_assignee, TaskField};

pub const MIN_PASSWORD_LEN: usize = 6;

fn check_email(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<Registration, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        check_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
        }
        Ok(Registration {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    #[must_use]
    pub fn is_submittable(&self) -> bool {
        !self.name.is_empty()
            && !self.email.is_empty()
            && self.password.chars().count() >= MIN_PASSWORD_LEN
    }
}

/// The create-task modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Raw `YYYY-MM-DD` from a date input; empty means no due date.
    pub due_date: String,
    /// Selected owner id; empty means "myself".
    pub assignee: String,
    pub team_ids: Vec<UserId>,
    pub team_search: String,
}

impl TaskForm {
    /// A blank form pre-assigned to the creator.
    #[must_use]
    pub fn for_creator(me: &User) -> Self {
        Self {
            assignee: me.id.to_string(),
            ..Self::default()
        }
    }

    pub fn toggle_team_member(&mut self, id: &UserId) {
        if let Some(pos) = self.team_ids.iter().position(|member| member == id) {
            self.team_ids.remove(pos);
        } else {
            self.team_ids.push(id.clone());
        }
    }

    /// Builds the request body; owner and team are only sent when the creator may set them.
    pub fn validate(&self, creator: &User) -> Result<NewTask, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        let due_date = parse_due_date(&self.due_date)?;

        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let owner = can_pick_assignee(creator.role).then(|| {
            let chosen = self.assignee.trim();
            if chosen.is_empty() {
                creator.id.clone()
            } else {
                UserId::from(chosen)
            }
        });

        let team_ids = can_assign_team(creator.role)
            .then(|| self.team_ids.clone())
            .filter(|ids| !ids.is_empty());

        Ok(NewTask {
            title: self.title.trim().to_string(),
            description,
            priority: self.priority,
            due_date,
            owner,
            team_ids,
        })
    }
}

/// `YYYY-MM-DD` from a date input; blank clears.
pub fn parse_due_date(raw: &str) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.trim() {
        "" => Ok(None),
        raw => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ValidationError::InvalidDueDate),
    }
}

/// Turns a value committed in a table cell into a patch. `Ok(None)` means the
/// value did not change and nothing should be sent.
pub fn cell_patch(
    task: &Task,
    field: TaskField,
    raw: &str,
) -> Result<Option<TaskPatch>, ValidationError> {
    let patch = match field {
        TaskField::Title => {
            let title = raw.trim();
            if title.is_empty() {
                return Err(ValidationError::MissingTitle);
            }
            (title != task.title).then(|| TaskPatch::title(title))
        }
        TaskField::Priority => raw
            .parse::<Priority>()
            .ok()
            .filter(|priority| *priority != task.priority)
            .map(TaskPatch::priority),
        TaskField::Status => raw
            .parse::<Status>()
            .ok()
            .filter(|status| *status != task.status)
            .map(TaskPatch::status),
        TaskField::DueDate => {
            let due = parse_due_date(raw)?;
            (due != task.due_date.map(|d| d.date_naive())).then(|| TaskPatch::due_date(due))
        }
        TaskField::Owner => {
            let owner = UserId::from(raw.trim());
            (!owner.0.is_empty() && owner != task.owner).then(|| TaskPatch::owner(owner))
        }
    };
    Ok(patch)
}
