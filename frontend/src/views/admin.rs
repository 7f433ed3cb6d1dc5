use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use taskdesk_core::{Role, User};

use super::ui::{select_box, spinner, CELL_INPUT};
use crate::{Model, Msg};

impl Model {
    pub(super) fn view_admin(&self) -> Node<Msg> {
        let users = self.users.users();
        let rows: Vec<Node<Msg>> = if users.is_empty() {
            let message = if self.users.loading { "Loading…" } else { "No users yet." };
            vec![tr(
                [],
                [td(
                    [
                        attr("colspan", "4"),
                        class("px-2 py-10 text-center text-ctp-subtext0 italic"),
                    ],
                    [text(message)],
                )],
            )]
        } else {
            users.iter().map(|user| self.view_user_row(user)).collect()
        };

        div(
            [class("bg-ctp-surface0 rounded-lg shadow-lg p-6 border border-ctp-surface1 space-y-4")],
            [
                div(
                    [class("flex items-center justify-between")],
                    [
                        h2([class("text-2xl font-bold text-ctp-text")], [text("Users & roles")]),
                        p(
                            [class("text-sm text-ctp-subtext0")],
                            [text(format!("{} total", users.len()))],
                        ),
                    ],
                ),
                table(
                    [class("w-full text-sm")],
                    [
                        thead(
                            [],
                            [tr(
                                [class("text-left text-ctp-subtext0 border-b border-ctp-surface2")],
                                ["Name", "Email", "Role", ""]
                                    .into_iter()
                                    .map(|heading| th([class("px-2 py-2 font-medium")], [text(heading)]))
                                    .collect::<Vec<_>>(),
                            )],
                        ),
                        tbody([], rows),
                    ],
                ),
            ],
        )
    }

    fn view_user_row(&self, user: &User) -> Node<Msg> {
        let busy = self.role_busy.contains(&user.id);
        let roles = Role::ALL
            .iter()
            .map(|role| (role.as_str().to_string(), role.label().to_string()))
            .collect();
        let id = user.id.clone();

        tr(
            [key(user.id.to_string()), class("border-b border-ctp-surface1")],
            [
                td([class("px-2 py-2 font-medium")], [text(&user.name)]),
                td([class("px-2 py-2 text-ctp-subtext1")], [text(&user.email)]),
                td(
                    [class("px-2 py-2")],
                    [select_box(CELL_INPUT, roles, user.role.as_str(), !busy, move |raw| {
                        Msg::ChangeRole(id.clone(), raw)
                    })],
                ),
                td(
                    [class("px-2 py-2 text-right")],
                    [if busy { spinner() } else { span([], []) }],
                ),
            ],
        )
    }
}
