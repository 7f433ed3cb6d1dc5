use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use taskdesk_core::permissions::{can_assign_team, can_pick_assignee};
use taskdesk_core::{Priority, User};

use super::ui::{field, modal, select_box, INPUT, PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::{Model, Msg};

impl Model {
    pub(super) fn view_task_modal(&self) -> Node<Msg> {
        let Some(me) = &self.auth.user else {
            return span([], []);
        };
        let form = &self.task_form;
        let priorities = Priority::ALL
            .iter()
            .map(|p| (p.as_str().to_string(), p.label().to_string()))
            .collect();

        let body = div(
            [class("space-y-4")],
            [
                field(
                    "Title",
                    input(
                        [
                            r#type("text"),
                            class(INPUT),
                            placeholder("What needs doing?"),
                            value(&form.title),
                            on_input(|event| Msg::SetTaskTitle(event.value())),
                        ],
                        [],
                    ),
                ),
                field(
                    "Description",
                    textarea(
                        [
                            class(&format!("{INPUT} h-20 resize-y")),
                            value(&form.description),
                            on_input(|event| Msg::SetTaskDescription(event.value())),
                        ],
                        [],
                    ),
                ),
                div(
                    [class("grid grid-cols-2 gap-4")],
                    [
                        field(
                            "Priority",
                            select_box(INPUT, priorities, form.priority.as_str(), true, Msg::SetTaskPriority),
                        ),
                        field(
                            "Due date",
                            input(
                                [
                                    r#type("date"),
                                    class(INPUT),
                                    value(&form.due_date),
                                    on_change(|event| Msg::SetTaskDueDate(event.value())),
                                ],
                                [],
                            ),
                        ),
                    ],
                ),
                if can_pick_assignee(me.role) {
                    let options = self
                        .users
                        .creation_options(me)
                        .into_iter()
                        .map(|option| (option.id.to_string(), option.label))
                        .collect();
                    field(
                        "Assignee",
                        select_box(INPUT, options, &form.assignee, !self.users.loading, Msg::SetTaskAssignee),
                    )
                } else {
                    span([], [])
                },
                if can_assign_team(me.role) {
                    self.view_team_picker()
                } else {
                    span([], [])
                },
                div(
                    [class("flex justify-end gap-2 pt-2")],
                    [
                        button(
                            [
                                r#type("button"),
                                class(SECONDARY_BUTTON),
                                on_click(|_| Msg::CloseNewTask),
                            ],
                            [text("Cancel")],
                        ),
                        button(
                            [
                                r#type("button"),
                                class(PRIMARY_BUTTON),
                                disabled(self.creating),
                                on_click(|_| Msg::SubmitNewTask),
                            ],
                            [text(if self.creating { "Creating…" } else { "Create" })],
                        ),
                    ],
                ),
            ],
        );

        modal("Add Task", body, Msg::CloseNewTask)
    }

    fn view_team_picker(&self) -> Node<Msg> {
        let form = &self.task_form;
        let matches = self.users.search(&form.team_search);

        let list = if self.users.loading {
            vec![div([class("p-2 text-sm text-ctp-subtext0")], [text("Loading users…")])]
        } else if matches.is_empty() {
            vec![div([class("p-2 text-sm text-ctp-subtext0")], [text("No matches")])]
        } else {
            matches.into_iter().map(|user| self.view_team_option(user)).collect()
        };

        div(
            [class("space-y-2")],
            [
                span([class("text-sm font-medium text-ctp-subtext1")], [text("Team")]),
                input(
                    [
                        r#type("text"),
                        class(INPUT),
                        placeholder("Search users by name or email"),
                        value(&form.team_search),
                        disabled(self.users.loading),
                        on_input(|event| Msg::SetTeamSearch(event.value())),
                    ],
                    [],
                ),
                div(
                    [class("max-h-40 overflow-auto border border-ctp-surface2 rounded")],
                    list,
                ),
                p(
                    [class("text-xs text-ctp-subtext0")],
                    [text("Selected users will also see this task. You always see your own tasks.")],
                ),
            ],
        )
    }

    fn view_team_option(&self, user: &User) -> Node<Msg> {
        let picked = self.task_form.team_ids.contains(&user.id);
        let id = user.id.clone();
        label(
            [
                key(user.id.to_string()),
                class("flex items-center gap-2 px-2 py-1 hover:bg-ctp-surface1 cursor-pointer"),
            ],
            [
                input(
                    [
                        r#type("checkbox"),
                        checked(picked),
                        on_click(move |_| Msg::ToggleTeamMember(id.clone())),
                    ],
                    [],
                ),
                span([class("text-sm")], [text(&user.name)]),
                span([class("text-xs text-ctp-subtext0")], [text(&user.email)]),
            ],
        )
    }
}
