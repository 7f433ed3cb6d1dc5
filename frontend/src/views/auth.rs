use sauron::{
    html::{attributes::*, *},
    prelude::*,
};

use super::ui::{field, INPUT, PRIMARY_BUTTON};
use crate::{Model, Msg, Route};

fn card(heading: &str, children: Vec<Node<Msg>>) -> Node<Msg> {
    div(
        [class("max-w-md mx-auto mt-16 bg-ctp-surface0 rounded-lg shadow-lg p-8 border border-ctp-surface1")],
        [
            h2([class("text-2xl font-bold text-ctp-text mb-6")], [text(heading)]),
            div([class("space-y-4")], children),
        ],
    )
}

fn switch_link(prompt: &str, link_text: &str, route: Route) -> Node<Msg> {
    p(
        [class("text-sm text-ctp-subtext0")],
        [
            text(prompt),
            text(" "),
            a(
                [
                    href(route.to_path()),
                    class("text-ctp-blue hover:underline"),
                    on_click(move |event| {
                        event.prevent_default();
                        Msg::NavigateTo(route)
                    }),
                ],
                [text(link_text)],
            ),
        ],
    )
}

impl Model {
    fn view_auth_error(&self) -> Node<Msg> {
        match &self.auth.error {
            Some(message) => div(
                [class("bg-ctp-red/20 text-ctp-red rounded-md px-3 py-2 text-sm")],
                [text(message)],
            ),
            None => span([], []),
        }
    }

    pub(super) fn view_login(&self) -> Node<Msg> {
        let busy = self.auth.is_loading();
        card(
            "Sign in",
            vec![
                self.view_auth_error(),
                field(
                    "Email",
                    input(
                        [
                            r#type("email"),
                            class(INPUT),
                            placeholder("you@example.com"),
                            value(&self.login_form.email),
                            on_input(|event| Msg::SetLoginEmail(event.value())),
                        ],
                        [],
                    ),
                ),
                field(
                    "Password",
                    input(
                        [
                            r#type("password"),
                            class(INPUT),
                            value(&self.login_form.password),
                            on_input(|event| Msg::SetLoginPassword(event.value())),
                        ],
                        [],
                    ),
                ),
                button(
                    [
                        r#type("button"),
                        class(&format!("{PRIMARY_BUTTON} w-full")),
                        disabled(busy || !self.login_form.is_submittable()),
                        on_click(|_| Msg::SubmitLogin),
                    ],
                    [text(if busy { "Signing in…" } else { "Sign in" })],
                ),
                switch_link("No account yet?", "Create one", Route::Register),
            ],
        )
    }

    pub(super) fn view_register(&self) -> Node<Msg> {
        let busy = self.auth.is_loading();
        card(
            "Create account",
            vec![
                self.view_auth_error(),
                field(
                    "Name",
                    input(
                        [
                            r#type("text"),
                            class(INPUT),
                            value(&self.register_form.name),
                            on_input(|event| Msg::SetRegisterName(event.value())),
                        ],
                        [],
                    ),
                ),
                field(
                    "Email",
                    input(
                        [
                            r#type("email"),
                            class(INPUT),
                            placeholder("you@example.com"),
                            value(&self.register_form.email),
                            on_input(|event| Msg::SetRegisterEmail(event.value())),
                        ],
                        [],
                    ),
                ),
                field(
                    "Password",
                    input(
                        [
                            r#type("password"),
                            class(INPUT),
                            placeholder("At least 6 characters"),
                            value(&self.register_form.password),
                            on_input(|event| Msg::SetRegisterPassword(event.value())),
                        ],
                        [],
                    ),
                ),
                button(
                    [
                        r#type("button"),
                        class(&format!("{PRIMARY_BUTTON} w-full")),
                        disabled(busy || !self.register_form.is_submittable()),
                        on_click(|_| Msg::SubmitRegister),
                    ],
                    [text(if busy { "Creating account…" } else { "Create account" })],
                ),
                switch_link("Already registered?", "Sign in", Route::Login),
            ],
        )
    }
}
