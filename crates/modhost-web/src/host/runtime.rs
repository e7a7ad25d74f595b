//! Hooks for binary-module runtimes
//!
//! Runtimes that load a module without a plugin element report their
//! lifecycle through callbacks on a JS object rather than DOM events.
//! The page forwards those callbacks here, e.g.
//!
//! ```js
//! const Module = {
//!   monitorRunDependencies: (left) => host.monitor_run_dependencies(left),
//!   setStatus: (text) => host.set_status(text),
//!   print: (text) => host.print(text),
//!   printErr: (text) => host.print_err(text),
//!   onRuntimeInitialized: () => host.notify_load(),
//!   onAbort: (what) => host.notify_error(String(what)),
//! };
//! ```

use wasm_bindgen::prelude::*;

use super::{events, with_bridge, ModuleHost};
use crate::util::log_error;

#[wasm_bindgen]
impl ModuleHost {
    /// Dependency counter callback; `0` means every dependency resolved.
    pub fn monitor_run_dependencies(&self, left: u32) {
        with_bridge(&self.bridge, |b| {
            b.on_dependencies(left);
        });
    }

    /// Free-text status line from the runtime.
    pub fn set_status(&self, text: &str) {
        with_bridge(&self.bridge, |b| b.on_runtime_status(text));
    }

    /// Runtime stdout line.
    pub fn print(&self, text: &str) {
        with_bridge(&self.bridge, |b| b.print(text));
    }

    /// Runtime stderr line; shown in the output panel and the console.
    pub fn print_err(&self, text: &str) {
        log_error(&format!("[modhost] {}", text));
        with_bridge(&self.bridge, |b| b.print(text));
    }

    /// Load started, for runtimes that fetch the module themselves.
    pub fn notify_load_start(&self) {
        events::on_load_start(&self.bridge);
    }

    /// Byte progress, for runtimes that fetch the module themselves.
    pub fn notify_progress(&self, length_computable: bool, loaded: f64, total: f64) {
        let sample = modhost_core::ProgressSample::from_event(length_computable, loaded, total);
        with_bridge(&self.bridge, |b| {
            b.on_progress(&sample);
        });
    }

    /// Runtime finished loading and initializing the module.
    pub fn notify_load(&self) {
        events::on_load(&self.bridge);
    }

    /// Runtime failed to load the module.
    pub fn notify_error(&self, last_error: &str) {
        events::report_error(&self.bridge, last_error);
    }

    /// Running module stopped unexpectedly.
    pub fn notify_crash(&self) {
        events::on_crash(&self.bridge, None);
    }
}
