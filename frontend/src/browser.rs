//! Thin wrappers over `window` used by the update loop.
//!
//! Browser events are turned into futures so they can be awaited inside a
//! `Cmd`: each one resolves once and is re-armed by whoever consumes it.

use js_sys::Promise;
use serde::Serialize;
use taskdesk_core::{HistoryMode, Theme};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AddEventListenerOptions, KeyboardEvent, Window};

fn window() -> Option<Window> {
    web_sys::window()
}

pub fn location_pathname() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

pub fn location_search() -> String {
    window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    path: &'a str,
    search: &'a str,
}

/// Writes `path` + `search` to the address bar without reloading.
pub fn write_url(path: &str, search: &str, mode: HistoryMode) {
    let Some(history) = window().and_then(|w| w.history().ok()) else {
        return;
    };
    let url = format!("{path}{search}");
    let state = serde_wasm_bindgen::to_value(&HistoryEntry { path, search })
        .unwrap_or(JsValue::NULL);
    let written = match mode {
        HistoryMode::Replace => history.replace_state_with_url(&state, "", Some(&url)),
        HistoryMode::Push => history.push_state_with_url(&state, "", Some(&url)),
    };
    if written.is_err() {
        warn!(%url, ?mode, "history update rejected");
    }
}

/// Resolves on the next back/forward navigation. `false` outside a browser.
pub async fn next_popstate() -> bool {
    let Some(window) = window() else {
        return false;
    };
    let promise = Promise::new(&mut |resolve, _reject| {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if window
            .add_event_listener_with_callback_and_add_event_listener_options(
                "popstate", &resolve, &options,
            )
            .is_err()
        {
            warn!("could not listen for popstate");
        }
    });
    JsFuture::from(promise).await.is_ok()
}

/// Resolves with the key of the next `keydown` on the document.
pub async fn next_keydown() -> Option<String> {
    let document = window()?.document()?;
    let promise = Promise::new(&mut |resolve, _reject| {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        if document
            .add_event_listener_with_callback_and_add_event_listener_options(
                "keydown", &resolve, &options,
            )
            .is_err()
        {
            warn!("could not listen for keydown");
        }
    });
    let event = JsFuture::from(promise).await.ok()?;
    event.dyn_into::<KeyboardEvent>().ok().map(|event| event.key())
}

pub async fn sleep(ms: u32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = window() {
            let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
        }
    });
    let _ = JsFuture::from(promise).await;
}

pub fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn prefers_dark() -> bool {
    window()
        .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
        .is_some_and(|query| query.matches())
}

/// Toggles the `dark` class on `<html>`.
pub fn apply_theme(theme: Theme) {
    let root = window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element());
    if let Some(root) = root {
        let _ = root
            .class_list()
            .toggle_with_force("dark", theme == Theme::Dark);
    }
}
