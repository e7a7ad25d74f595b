//! DOM event subscriptions
//!
//! One [`Listener`] per (target, event kind). The closure is owned by the
//! listener so it is not garbage collected, and dropping the listener
//! unregisters it.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget};

use crate::util::{describe_js, log};

/// Event kinds fired by plugin-style module elements.
pub(crate) const EVENT_LOAD_START: &str = "loadstart";
pub(crate) const EVENT_PROGRESS: &str = "progress";
pub(crate) const EVENT_LOAD: &str = "load";
pub(crate) const EVENT_ERROR: &str = "error";
pub(crate) const EVENT_CRASH: &str = "crash";
pub(crate) const EVENT_MESSAGE: &str = "message";

/// Page-level event kinds.
pub(crate) const EVENT_FULLSCREEN_CHANGE: &str = "fullscreenchange";
pub(crate) const EVENT_RESIZE: &str = "resize";

pub(crate) struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub(crate) fn register<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    pub(crate) fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            log(&format!(
                "[modhost] failed to remove '{}' listener: {}",
                self.kind,
                describe_js(&e)
            ));
        }
    }
}
