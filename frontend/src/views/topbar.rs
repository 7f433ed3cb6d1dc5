use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use taskdesk_core::{Role, Theme};

use super::ui::{PRIMARY_BUTTON, SECONDARY_BUTTON};
use crate::{Model, Msg, Route};

fn role_badge(role: Role) -> Node<Msg> {
    let color = match role {
        Role::Admin => "bg-ctp-red/20 text-ctp-red",
        Role::Manager => "bg-ctp-peach/20 text-ctp-peach",
        Role::User => "bg-ctp-blue/20 text-ctp-blue",
    };
    span(
        [class(&format!("px-2 py-1 rounded-full text-xs font-medium {color}"))],
        [text(role.label())],
    )
}

impl Model {
    pub(super) fn view_topbar(&self) -> Node<Msg> {
        let Some(me) = &self.auth.user else {
            return span([], []);
        };
        header(
            [class("bg-ctp-mantle shadow-lg border-b border-ctp-surface0")],
            [div(
                [class("max-w-6xl mx-auto px-6 py-4 flex items-center justify-between")],
                [
                    div(
                        [class("flex items-center gap-6")],
                        [
                            h1([class("text-2xl font-bold text-ctp-text")], [text("Taskdesk")]),
                            nav(
                                [class("flex gap-2")],
                                [
                                    self.nav_link("Tasks", Route::Dashboard),
                                    if self.is_admin() {
                                        self.nav_link("Admin", Route::Admin)
                                    } else {
                                        span([], [])
                                    },
                                ],
                            ),
                        ],
                    ),
                    div(
                        [class("flex items-center gap-3")],
                        [
                            if self.route == Route::Dashboard {
                                button(
                                    [
                                        r#type("button"),
                                        on_click(|_| Msg::OpenNewTask),
                                        class(PRIMARY_BUTTON),
                                    ],
                                    [text("Add Task")],
                                )
                            } else {
                                span([], [])
                            },
                            button(
                                [
                                    r#type("button"),
                                    on_click(|_| Msg::ToggleTheme),
                                    class(SECONDARY_BUTTON),
                                ],
                                [text(match self.theme {
                                    Theme::Light => "🌙",
                                    Theme::Dark => "☀️",
                                })],
                            ),
                            span(
                                [class("w-9 h-9 rounded-full bg-ctp-surface1 flex items-center justify-center text-sm font-semibold")],
                                [text(me.initials())],
                            ),
                            role_badge(me.role),
                            button(
                                [
                                    r#type("button"),
                                    on_click(|_| Msg::Logout),
                                    class(SECONDARY_BUTTON),
                                ],
                                [text("Logout")],
                            ),
                        ],
                    ),
                ],
            )],
        )
    }

    fn nav_link(&self, label_text: &str, route: Route) -> Node<Msg> {
        let is_active = self.route == route;
        a(
            [
                href(route.to_path()),
                on_click(move |event| {
                    event.prevent_default();
                    Msg::NavigateTo(route)
                }),
                class(&format!(
                    "px-3 py-2 rounded-md text-sm font-medium transition-colors duration-200 {}",
                    if is_active {
                        "bg-ctp-blue text-ctp-base"
                    } else {
                        "text-ctp-subtext0 hover:text-ctp-text hover:bg-ctp-surface0"
                    }
                )),
            ],
            [text(label_text)],
        )
    }
}
