//! Platform event handlers
//!
//! Each handler converts one DOM event into a bridge call. Handlers
//! absorb their own failures: anything that goes wrong becomes a
//! console line, never an exception thrown back into the page.

use modhost_core::ProgressSample;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, MessageEvent, ProgressEvent};

use super::{with_bridge, SharedBridge};
use crate::module::ModuleHandle;
use crate::util::{log, log_error};

pub(super) fn on_load_start(bridge: &SharedBridge) {
    with_bridge(bridge, |b| {
        b.on_load_start();
    });
}

pub(super) fn on_progress(bridge: &SharedBridge, event: &Event) {
    let sample = match event.dyn_ref::<ProgressEvent>() {
        Some(progress) => ProgressSample::from_event(
            progress.length_computable(),
            progress.loaded(),
            progress.total(),
        ),
        // Untyped progress event: nothing measurable
        None => ProgressSample::default(),
    };
    with_bridge(bridge, |b| {
        b.on_progress(&sample);
    });
}

pub(super) fn on_load(bridge: &SharedBridge) {
    with_bridge(bridge, |b| {
        b.on_load();
    });
    log("[modhost] Module loaded");
}

pub(super) fn on_error(bridge: &SharedBridge, module: &ModuleHandle) {
    let last_error = module.last_error();
    report_error(bridge, &last_error);
}

pub(super) fn report_error(bridge: &SharedBridge, last_error: &str) {
    if let Some(Some(err)) = with_bridge(bridge, |b| b.on_error(last_error)) {
        log_error(&format!("[modhost] {}", err));
    }
}

pub(super) fn on_crash(bridge: &SharedBridge, exit_status: Option<i32>) {
    if let Some(Some(err)) = with_bridge(bridge, |b| b.on_crash()) {
        match exit_status {
            Some(status) => log_error(&format!("[modhost] {} (exit status {})", err, status)),
            None => log_error(&format!("[modhost] {}", err)),
        }
    }
}

pub(super) fn on_message_event(bridge: &SharedBridge, event: &Event) {
    match event.dyn_ref::<MessageEvent>() {
        Some(message) => on_message_data(bridge, &message.data()),
        None => log("[modhost] Ignoring 'message' event without data"),
    }
}

pub(super) fn on_message_data(bridge: &SharedBridge, data: &JsValue) {
    let Some(payload) = payload_text(data) else {
        log_error("[modhost] Message payload is neither text nor serializable");
        return;
    };
    if let Some(Err(err)) = with_bridge(bridge, |b| b.on_message(&payload)) {
        log(&format!("[modhost] {}", err));
    }
}

pub(super) fn on_fullscreen_change(bridge: &SharedBridge) {
    with_bridge(bridge, |b| {
        let is_fullscreen = b.surfaces().canvas_is_fullscreen();
        b.on_fullscreen_change(is_fullscreen);
    });
}

pub(super) fn on_window_resize(bridge: &SharedBridge) {
    with_bridge(bridge, |b| b.on_window_resize());
}

/// Message payloads arrive either as strings or as structured-cloned
/// objects; objects are re-serialized so both decode the same way.
pub(crate) fn payload_text(data: &JsValue) -> Option<String> {
    if let Some(text) = data.as_string() {
        return Some(text);
    }
    if data.is_undefined() {
        return None;
    }
    js_sys::JSON::stringify(data).ok().map(String::from)
}
