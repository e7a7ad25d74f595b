//! ModuleBridge - one bridge instance per page session
//!
//! Owns the lifecycle machine, the viewport state and the injected
//! [`Surfaces`]. Each platform event kind has its own handler method.
//!
//! ## Failure policy
//!
//! No handler panics or leaves a failure unhandled. Load errors and
//! crashes become terminal state transitions, a bad message becomes a
//! diagnostic line in the output panel, and the bridge keeps going.

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::lifecycle::{Lifecycle, LifecycleState, Transition};
use crate::progress::{parse_status_progress, ProgressSample};
use crate::protocol::{self, InboundMessage};
use crate::surfaces::{Surface, Surfaces};
use crate::viewport::{PixelSize, ViewportState};

/// Message counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Messages decoded and applied (including unknown kinds)
    pub messages_handled: u64,
    pub unknown_messages: u64,
    pub decode_errors: u64,
}

pub struct ModuleBridge<S: Surfaces> {
    config: BridgeConfig,
    surfaces: S,
    lifecycle: Lifecycle,
    viewport: ViewportState,
    stats: BridgeStats,
}

impl<S: Surfaces> ModuleBridge<S> {
    pub fn new(config: BridgeConfig, surfaces: S) -> Self {
        Self {
            config,
            surfaces,
            lifecycle: Lifecycle::new(),
            viewport: ViewportState::new(),
            stats: BridgeStats::default(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn surfaces(&self) -> &S {
        &self.surfaces
    }

    pub fn surfaces_mut(&mut self) -> &mut S {
        &mut self.surfaces
    }

    pub fn state(&self) -> &LifecycleState {
        self.lifecycle.state()
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    // =========================================================================
    // Lifecycle events
    // =========================================================================

    pub fn on_load_start(&mut self) -> &LifecycleState {
        let t = self.lifecycle.on_load_start();
        self.apply(t);
        self.lifecycle.state()
    }

    pub fn on_progress(&mut self, sample: &ProgressSample) -> &LifecycleState {
        let t = self.lifecycle.on_progress(sample);
        self.apply(t);
        self.lifecycle.state()
    }

    pub fn on_load(&mut self) -> &LifecycleState {
        let t = self.lifecycle.on_load();
        self.apply(t);
        self.lifecycle.state()
    }

    /// Dependency counter callback; `0` means fully resolved.
    pub fn on_dependencies(&mut self, remaining: u32) -> &LifecycleState {
        let t = self.lifecycle.on_dependencies(remaining);
        self.apply(t);
        self.lifecycle.state()
    }

    /// Load failure carrying the module's last-error text.
    ///
    /// Returns the recorded error if this call moved the module to
    /// `Errored`, `None` if it was already terminal.
    pub fn on_error(&mut self, last_error: &str) -> Option<BridgeError> {
        let t = self.lifecycle.on_error(last_error);
        let changed = t.changed;
        self.apply(t);
        changed.then(|| BridgeError::Load(last_error.to_string()))
    }

    pub fn on_crash(&mut self) -> Option<BridgeError> {
        let t = self.lifecycle.on_crash();
        let changed = t.changed;
        self.apply(t);
        changed.then_some(BridgeError::Crash)
    }

    /// Free-text status line from a binary-module runtime.
    ///
    /// A trailing `(loaded/total)` group is treated as a progress tick.
    pub fn on_runtime_status(&mut self, text: &str) {
        if self.lifecycle.state().is_terminal() {
            return;
        }
        if let Some(sample) = parse_status_progress(text) {
            let t = self.lifecycle.on_progress(&sample);
            if let Some(percent) = t.progress {
                self.surfaces.set_progress(percent);
            }
        }
        if !text.is_empty() {
            self.surfaces.set_status(text);
        }
    }

    // =========================================================================
    // Messages
    // =========================================================================

    /// Decode and apply one payload from the module's message channel.
    ///
    /// A decode failure is returned to the caller and also written to the
    /// output panel; it never affects later messages.
    pub fn on_message(&mut self, payload: &str) -> Result<InboundMessage, BridgeError> {
        match protocol::decode(self.config.transport, payload) {
            Ok(message) => {
                self.dispatch(&message);
                Ok(message)
            }
            Err(err) => {
                self.stats.decode_errors += 1;
                self.surfaces
                    .append_output(&format!("malformed msg received: {}\n", err));
                Err(err.into())
            }
        }
    }

    /// Apply the DOM effect of an already-decoded message.
    pub fn dispatch(&mut self, message: &InboundMessage) {
        self.stats.messages_handled += 1;
        if let InboundMessage::Unknown { .. } = message {
            self.stats.unknown_messages += 1;
        }
        if let Some(text) = message.output_text() {
            self.surfaces.append_output(&text);
        }
        if let Some(size) = message.canvas_size() {
            self.surfaces.set_canvas_size(size);
        }
    }

    /// Runtime stdout line.
    pub fn print(&mut self, text: &str) {
        self.surfaces.append_output(&format!("{}\n", text));
    }

    // =========================================================================
    // Fullscreen / viewport
    // =========================================================================

    /// Capture the windowed canvas size, then ask the platform for fullscreen.
    pub fn request_fullscreen(&mut self) -> Result<(), BridgeError> {
        let current = self.surfaces.canvas_size();
        self.viewport.request_fullscreen(current);
        let result = self.surfaces.request_fullscreen();
        if result.is_err() {
            self.viewport.cancel_request();
        }
        result
    }

    /// Platform fullscreen-change notification.
    pub fn on_fullscreen_change(&mut self, is_fullscreen: bool) {
        let current = self.surfaces.canvas_size();
        let window = self.surfaces.window_size();
        if let Some(size) = self
            .viewport
            .on_fullscreen_change(is_fullscreen, current, window)
        {
            self.surfaces.set_canvas_size(size);
        }
    }

    pub fn enter_soft_fullscreen(&mut self) {
        let current = self.surfaces.canvas_size();
        let window = self.surfaces.window_size();
        if let Some(size) = self.viewport.enter_soft_fullscreen(current, window) {
            self.surfaces.set_canvas_size(size);
        }
    }

    pub fn leave_soft_fullscreen(&mut self) {
        if let Some(size) = self.viewport.leave_soft_fullscreen() {
            self.surfaces.set_canvas_size(size);
        }
    }

    pub fn is_soft_fullscreen_active(&self) -> bool {
        self.viewport.is_soft_fullscreen()
    }

    pub fn on_window_resize(&mut self) {
        if !self.config.track_window_size {
            return;
        }
        let window = self.surfaces.window_size();
        if let Some(size) = self.viewport.on_window_resize(window) {
            if size != self.surfaces.canvas_size() {
                self.surfaces.set_canvas_size(size);
            }
        }
    }

    /// Current canvas size as seen through the surfaces.
    pub fn canvas_size(&self) -> PixelSize {
        self.surfaces.canvas_size()
    }

    fn apply(&mut self, t: Transition) {
        if let Some(status) = &t.status {
            self.surfaces.set_status(status);
        }
        if let Some(percent) = t.progress {
            self.surfaces.set_progress(percent);
        }
        if t.reveal {
            self.surfaces.set_visible(Surface::Spinner, false);
            self.surfaces.set_visible(Surface::Canvas, true);
            self.surfaces.set_visible(Surface::Output, true);
        } else if t.hide_spinner {
            self.surfaces.set_visible(Surface::Spinner, false);
        }
    }
}
