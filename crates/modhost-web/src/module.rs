//! Handle to the embedded native module element

use modhost_core::BridgeError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

use crate::util::describe_js;

/// Opaque reference to the plugin-style `<embed>` hosting the module.
///
/// Plugin runtimes extend the element with `postMessage`, `lastError`
/// and `exitStatus`, none of which web-sys knows about, so they are
/// reached through `Reflect`.
#[derive(Clone, Debug)]
pub struct ModuleHandle {
    element: Element,
}

impl ModuleHandle {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn event_target(&self) -> &EventTarget {
        &self.element
    }

    /// The module's last-error text, read at the time of an `error` event.
    pub fn last_error(&self) -> String {
        self.string_property("lastError")
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| "unknown load error".to_string())
    }

    /// Exit status after a crash, if the runtime reports one.
    pub fn exit_status(&self) -> Option<i32> {
        js_sys::Reflect::get(&self.element, &"exitStatus".into())
            .ok()
            .and_then(|v| v.as_f64())
            .map(|v| v as i32)
    }

    /// Post a payload to the module's message channel.
    pub fn post_message(&self, payload: &JsValue) -> Result<(), BridgeError> {
        let post = js_sys::Reflect::get(&self.element, &"postMessage".into())
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| BridgeError::Platform("module has no postMessage".to_string()))?;
        post.call1(&self.element, payload)
            .map(|_| ())
            .map_err(|e| BridgeError::Platform(describe_js(&e)))
    }

    fn string_property(&self, name: &str) -> Option<String> {
        js_sys::Reflect::get(&self.element, &name.into())
            .ok()
            .and_then(|v| v.as_string())
    }
}
