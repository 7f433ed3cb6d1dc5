use sauron::{
    html::{attributes::*, *},
    prelude::*,
};

use crate::{Model, Msg, Route};

mod admin;
mod auth;
mod task_modal;
mod task_table;
mod topbar;
mod ui;

impl Model {
    pub(crate) fn view_app(&self) -> Node<Msg> {
        let page = match self.route {
            Route::Dashboard => self.view_dashboard(),
            Route::Admin => self.view_admin(),
            Route::Login => self.view_login(),
            Route::Register => self.view_register(),
        };
        div(
            [class("min-h-screen bg-ctp-base text-ctp-text")],
            [
                if self.auth.is_authenticated() {
                    self.view_topbar()
                } else {
                    span([], [])
                },
                div([class("max-w-6xl mx-auto px-6 py-8")], [page]),
                self.view_toasts(),
            ],
        )
    }

    fn view_dashboard(&self) -> Node<Msg> {
        div(
            [class("space-y-6")],
            [
                self.view_task_table(),
                if self.view.new_task_open() {
                    self.view_task_modal()
                } else {
                    span([], [])
                },
            ],
        )
    }

    fn view_toasts(&self) -> Node<Msg> {
        div(
            [class("fixed bottom-6 right-6 z-50 space-y-2")],
            self.toasts
                .visible()
                .iter()
                .map(|toast| {
                    let id = toast.id;
                    div(
                        [
                            key(id.to_string()),
                            class("flex items-center gap-3 bg-ctp-surface1 text-ctp-text border border-ctp-surface2 rounded-lg shadow-lg px-4 py-3"),
                        ],
                        [
                            span([class("text-sm")], [text(&toast.message)]),
                            button(
                                [
                                    r#type("button"),
                                    on_click(move |_| Msg::DismissToast(id)),
                                    class("text-ctp-subtext0 hover:text-ctp-text"),
                                ],
                                [text("✕")],
                            ),
                        ],
                    )
                })
                .collect::<Vec<_>>(),
        )
    }
}
