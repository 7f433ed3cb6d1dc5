//! Shared building blocks: labelled fields, selects, buttons, the modal shell.

use sauron::{
    html::{attributes::*, *},
    prelude::*,
};

use crate::Msg;

pub const INPUT: &str = "w-full px-3 py-2 bg-ctp-surface0 border border-ctp-surface2 rounded-md text-ctp-text placeholder-ctp-subtext0 focus:outline-none focus:ring-2 focus:ring-ctp-blue focus:border-transparent disabled:opacity-60";
pub const CELL_INPUT: &str = "w-full px-2 py-1 bg-transparent border border-transparent hover:border-ctp-surface2 rounded text-ctp-text focus:outline-none focus:ring-2 focus:ring-ctp-blue disabled:opacity-60";
pub const PRIMARY_BUTTON: &str = "bg-ctp-blue hover:bg-ctp-sapphire text-ctp-base font-medium px-4 py-2 rounded-md transition-colors duration-200 disabled:opacity-60";
pub const SECONDARY_BUTTON: &str = "bg-ctp-surface1 hover:bg-ctp-surface2 text-ctp-text font-medium px-4 py-2 rounded-md transition-colors duration-200 disabled:opacity-60";
pub const DANGER_BUTTON: &str = "bg-ctp-red/20 text-ctp-red hover:bg-ctp-red/30 px-3 py-1 rounded-md text-sm font-medium transition-colors duration-200 disabled:opacity-60";

pub fn field(label_text: &str, control: Node<Msg>) -> Node<Msg> {
    label(
        [class("block space-y-1")],
        [
            span([class("text-sm font-medium text-ctp-subtext1")], [text(label_text)]),
            control,
        ],
    )
}

pub fn spinner() -> Node<Msg> {
    span([class("animate-spin text-ctp-blue")], [text("◐")])
}

/// A `<select>` that reports the chosen value on change.
pub fn select_box<F>(
    style: &str,
    options: Vec<(String, String)>,
    current: &str,
    enabled: bool,
    on_commit: F,
) -> Node<Msg>
where
    F: Fn(String) -> Msg + 'static,
{
    select(
        [
            class(style.to_string()),
            value(current.to_string()),
            disabled(!enabled),
            on_change(move |event| on_commit(event.value())),
        ],
        options
            .into_iter()
            .map(|(option_value, option_label)| {
                let is_current = option_value == current;
                option(
                    [value(&option_value), selected(is_current)],
                    [text(option_label)],
                )
            })
            .collect::<Vec<_>>(),
    )
}

/// Centered dialog over a dimmed overlay; clicking the overlay closes it.
pub fn modal(heading: &str, body: Node<Msg>, close: Msg) -> Node<Msg> {
    let overlay_close = close.clone();
    div(
        [
            class("fixed inset-0 z-40 flex items-center justify-center bg-black/50 p-4"),
            on_click(move |_| overlay_close.clone()),
        ],
        [div(
            [
                class("w-full max-w-lg bg-ctp-mantle rounded-xl shadow-xl border border-ctp-surface1"),
                on_click(|event| {
                    event.stop_propagation();
                    Msg::Noop
                }),
            ],
            [
                div(
                    [class("flex items-center justify-between px-6 py-4 border-b border-ctp-surface1")],
                    [
                        h2([class("text-lg font-semibold text-ctp-text")], [text(heading)]),
                        button(
                            [
                                r#type("button"),
                                on_click(move |_| close.clone()),
                                class("text-ctp-subtext0 hover:text-ctp-text"),
                            ],
                            [text("Close")],
                        ),
                    ],
                ),
                div([class("px-6 py-4")], [body]),
            ],
        )],
    )
}
