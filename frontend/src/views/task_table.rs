use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use taskdesk_core::config::PAGE_SIZE_OPTIONS;
use taskdesk_core::{
    Pagination, Priority, QueryChange, RowPermissions, SortKey, Status, Task, TaskField,
};

use super::ui::{select_box, spinner, CELL_INPUT, DANGER_BUTTON, INPUT, SECONDARY_BUTTON};
use crate::{Model, Msg};

const COLUMNS: [&str; 8] = ["#", "Title", "Priority", "Status", "Due", "Owner", "Created", ""];

fn status_options() -> Vec<(String, String)> {
    Status::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), s.label().to_string()))
        .collect()
}

fn priority_options() -> Vec<(String, String)> {
    Priority::ALL
        .iter()
        .map(|p| (p.as_str().to_string(), p.label().to_string()))
        .collect()
}

impl Model {
    pub(super) fn view_task_table(&self) -> Node<Msg> {
        let query = self.view.query();
        let pages = Pagination::new(query.page, query.limit, self.tasks.total);

        div(
            [class("bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1 space-y-4")],
            [
                self.view_toolbar(&pages),
                div(
                    [class("overflow-x-auto")],
                    [table(
                        [class("w-full text-sm")],
                        [
                            thead(
                                [],
                                [tr(
                                    [class("text-left text-ctp-subtext0 border-b border-ctp-surface2")],
                                    COLUMNS
                                        .iter()
                                        .map(|heading| th([class("px-2 py-2 font-medium")], [text(heading)]))
                                        .collect::<Vec<_>>(),
                                )],
                            ),
                            tbody([], self.view_rows(&pages)),
                        ],
                    )],
                ),
                self.view_pagination(&pages),
            ],
        )
    }

    fn view_toolbar(&self, pages: &Pagination) -> Node<Msg> {
        let query = self.view.query();

        let mut status_choices = vec![(String::new(), "All statuses".to_string())];
        status_choices.extend(status_options());
        let sort_choices = SortKey::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), s.label().to_string()))
            .collect();
        let size_choices = PAGE_SIZE_OPTIONS
            .iter()
            .map(|n| (n.to_string(), format!("{n} / page")))
            .collect();

        div(
            [class("flex flex-wrap items-center justify-between gap-4")],
            [
                div(
                    [class("flex flex-wrap items-center gap-3")],
                    [
                        select_box(
                            INPUT,
                            status_choices,
                            query.status.map(Status::as_str).unwrap_or_default(),
                            true,
                            |raw| Msg::ChangeQuery(QueryChange::Status(raw.parse().ok())),
                        ),
                        select_box(INPUT, sort_choices, query.sort.as_str(), true, |raw| {
                            Msg::ChangeQuery(QueryChange::Sort(raw.parse().unwrap_or_default()))
                        }),
                        select_box(
                            INPUT,
                            size_choices,
                            &query.limit.to_string(),
                            true,
                            |raw| match raw.parse() {
                                Ok(limit) => Msg::ChangeQuery(QueryChange::PageSize(limit)),
                                Err(_) => Msg::Noop,
                            },
                        ),
                    ],
                ),
                div(
                    [class("flex items-center gap-2 text-ctp-subtext0")],
                    [
                        if self.tasks.loading {
                            spinner()
                        } else {
                            span([], [])
                        },
                        text(format!(
                            "Showing {}–{} of {}",
                            pages.start(),
                            pages.end(),
                            pages.total
                        )),
                    ],
                ),
            ],
        )
    }

    fn view_rows(&self, pages: &Pagination) -> Vec<Node<Msg>> {
        if self.tasks.items.is_empty() {
            let message = if self.tasks.loading {
                "Loading…"
            } else if let Some(error) = &self.tasks.error {
                error.as_str()
            } else {
                "No tasks found."
            };
            return vec![tr(
                [],
                [td(
                    [
                        attr("colspan", COLUMNS.len().to_string()),
                        class("px-2 py-10 text-center text-ctp-subtext0 italic"),
                    ],
                    [text(message)],
                )],
            )];
        }

        self.tasks
            .items
            .iter()
            .enumerate()
            .map(|(index, task)| self.view_row(task, pages.row_number(index)))
            .collect()
    }

    fn view_row(&self, task: &Task, ordinal: u64) -> Node<Msg> {
        let Some(me) = &self.auth.user else {
            return span([], []);
        };
        let perms = RowPermissions::for_task(me.role, task, &me.id);
        let busy = self.tasks.is_busy(&task.id);
        let editable = |field: TaskField| perms.allows(field) && !busy;

        let commit = |field: TaskField| {
            let id = task.id.clone();
            move |raw: String| Msg::EditCell(id.clone(), field, raw)
        };

        let title_cell = if perms.allows(TaskField::Title) {
            let id = task.id.clone();
            input(
                [
                    r#type("text"),
                    class(CELL_INPUT),
                    value(&task.title),
                    disabled(busy),
                    on_change(move |event| Msg::EditCell(id.clone(), TaskField::Title, event.value())),
                ],
                [],
            )
        } else {
            span([class("font-medium")], [text(&task.title)])
        };

        let priority_cell = if perms.allows(TaskField::Priority) {
            select_box(
                CELL_INPUT,
                priority_options(),
                task.priority.as_str(),
                editable(TaskField::Priority),
                commit(TaskField::Priority),
            )
        } else {
            text(task.priority.label())
        };

        let status_cell = if perms.allows(TaskField::Status) {
            select_box(
                CELL_INPUT,
                status_options(),
                task.status.as_str(),
                editable(TaskField::Status),
                commit(TaskField::Status),
            )
        } else {
            text(task.status.label())
        };

        let due_cell = if perms.allows(TaskField::DueDate) {
            let id = task.id.clone();
            input(
                [
                    r#type("date"),
                    class(CELL_INPUT),
                    value(task.due_date_input()),
                    disabled(busy),
                    on_change(move |event| Msg::EditCell(id.clone(), TaskField::DueDate, event.value())),
                ],
                [],
            )
        } else {
            let due = task.due_date_input();
            text(if due.is_empty() { "—".to_string() } else { due })
        };

        let owner_cell = if perms.allows(TaskField::Owner) {
            let options = self
                .users
                .assignee_options(&task.owner)
                .into_iter()
                .map(|option| (option.id.to_string(), option.label))
                .collect();
            select_box(
                CELL_INPUT,
                options,
                &task.owner.to_string(),
                editable(TaskField::Owner),
                commit(TaskField::Owner),
            )
        } else {
            text(self.users.owner_label(&task.owner, Some(&me.id)))
        };

        let actions = if busy {
            spinner()
        } else if perms.delete {
            let id = task.id.clone();
            button(
                [
                    r#type("button"),
                    class(DANGER_BUTTON),
                    on_click(move |_| Msg::DeleteTask(id.clone())),
                ],
                [text("Delete")],
            )
        } else {
            span([], [])
        };

        tr(
            [
                key(task.id.to_string()),
                class(&format!(
                    "border-b border-ctp-surface1 {}",
                    if busy { "opacity-60" } else { "hover:bg-ctp-surface1/50" }
                )),
            ],
            [
                td([class("px-2 py-2 text-ctp-subtext0")], [text(ordinal.to_string())]),
                td([class("px-2 py-2 min-w-48")], [title_cell]),
                td([class("px-2 py-2")], [priority_cell]),
                td([class("px-2 py-2")], [status_cell]),
                td([class("px-2 py-2")], [due_cell]),
                td([class("px-2 py-2")], [owner_cell]),
                td(
                    [class("px-2 py-2 text-ctp-subtext0")],
                    [text(task.created_at.format("%Y-%m-%d").to_string())],
                ),
                td([class("px-2 py-2 text-right")], [actions]),
            ],
        )
    }

    fn view_pagination(&self, pages: &Pagination) -> Node<Msg> {
        let page_button = |label_text: String, target: u32, enabled: bool, active: bool| {
            let target = pages.clamp(target);
            button(
                [
                    r#type("button"),
                    disabled(!enabled || self.tasks.loading),
                    on_click(move |_| Msg::ChangeQuery(QueryChange::Page(target))),
                    class(&format!(
                        "{SECONDARY_BUTTON} {}",
                        if active { "ring-2 ring-ctp-blue" } else { "" }
                    )),
                ],
                [text(label_text)],
            )
        };

        let mut buttons = vec![page_button(
            "Prev".to_string(),
            pages.page.saturating_sub(1),
            pages.has_prev(),
            false,
        )];
        buttons.extend(pages.window().map(|n| page_button(n.to_string(), n, n != pages.page, n == pages.page)));
        buttons.push(page_button(
            "Next".to_string(),
            pages.page.saturating_add(1),
            pages.has_next(),
            false,
        ));

        div(
            [class("flex items-center justify-between")],
            [
                span(
                    [class("text-sm text-ctp-subtext0")],
                    [text(format!("Page {} / {}", pages.page, pages.max_pages()))],
                ),
                div([class("flex gap-2")], buttons),
            ],
        )
    }
}
