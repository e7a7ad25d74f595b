//! ModuleHost - the JS-facing bridge object
//!
//! The page constructs exactly one `ModuleHost` per session. It owns the
//! [`ModuleBridge`] and every DOM listener feeding it.
//!
//! ## Transports
//!
//! - **Plugin element**: call `attach_embed(element)`; lifecycle and
//!   message events are subscribed on the element itself
//! - **Binary-module runtime**: wire the runtime's callbacks to the hooks
//!   in `runtime.rs` (`monitor_run_dependencies`, `set_status`, `print`,
//!   `notify_load`, ...)
//!
//! `fullscreenchange` (document) and `resize` (window) are subscribed on
//! construction for both transports.
//!
//! ## Threading
//!
//! Everything runs on the page's event loop. The bridge is shared with
//! the listener closures through `Rc<RefCell<..>>`; an event arriving
//! while the bridge is borrowed is logged and dropped.

mod events;
mod listeners;
mod runtime;

use std::cell::RefCell;
use std::rc::Rc;

use modhost_core::{BridgeConfig, BridgeError, ModuleBridge, OutboundMessage};
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::dom::DomSurfaces;
use crate::module::ModuleHandle;
use crate::util::log;
use listeners::Listener;

pub(crate) type SharedBridge = Rc<RefCell<ModuleBridge<DomSurfaces>>>;

/// Run `f` against the bridge unless it is already borrowed.
pub(crate) fn with_bridge<R>(
    bridge: &SharedBridge,
    f: impl FnOnce(&mut ModuleBridge<DomSurfaces>) -> R,
) -> Option<R> {
    match bridge.try_borrow_mut() {
        Ok(mut b) => Some(f(&mut b)),
        Err(_) => {
            log("[modhost] Bridge busy, dropping re-entrant event");
            None
        }
    }
}

/// Read-only counterpart of [`with_bridge`].
pub(crate) fn read_bridge<R>(
    bridge: &SharedBridge,
    f: impl FnOnce(&ModuleBridge<DomSurfaces>) -> R,
) -> Option<R> {
    match bridge.try_borrow() {
        Ok(b) => Some(f(&b)),
        Err(_) => {
            log("[modhost] Bridge busy, skipping read");
            None
        }
    }
}

pub(crate) fn to_js(err: BridgeError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ModuleHost {
    bridge: SharedBridge,
    /// Attached plugin element, if any
    module: Option<ModuleHandle>,
    /// Listeners on the plugin element
    module_listeners: Vec<Listener>,
    /// Listeners on the document and window
    #[allow(dead_code)]
    page_listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl ModuleHost {
    /// Create the host for this page.
    ///
    /// `config_json` may be empty for the defaults. Fails if the
    /// configuration is invalid or the canvas element does not exist.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<ModuleHost, JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = BridgeConfig::from_json(config_json).map_err(to_js)?;
        let surfaces = DomSurfaces::from_document(&config).map_err(to_js)?;
        let document = surfaces.document().clone();
        let transport = config.transport;
        let bridge: SharedBridge = Rc::new(RefCell::new(ModuleBridge::new(config, surfaces)));
        let page_listeners = register_page_listeners(&bridge, &document)?;

        log(&format!("[modhost] Host ready, {:?} transport", transport));

        Ok(Self {
            bridge,
            module: None,
            module_listeners: Vec::new(),
            page_listeners,
        })
    }

    /// Observe a plugin-style module element.
    ///
    /// Replaces any previously attached element.
    pub fn attach_embed(&mut self, element: Element) -> Result<(), JsValue> {
        self.detach();
        let module = ModuleHandle::new(element);
        let target = module.event_target().clone();
        let mut registered = Vec::with_capacity(6);

        let bridge = self.bridge.clone();
        registered.push(Listener::register(&target, listeners::EVENT_LOAD_START, move |_| {
            events::on_load_start(&bridge)
        })?);

        let bridge = self.bridge.clone();
        registered.push(Listener::register(&target, listeners::EVENT_PROGRESS, move |event| {
            events::on_progress(&bridge, &event)
        })?);

        let bridge = self.bridge.clone();
        registered.push(Listener::register(&target, listeners::EVENT_LOAD, move |_| {
            events::on_load(&bridge)
        })?);

        let bridge = self.bridge.clone();
        let handle = module.clone();
        registered.push(Listener::register(&target, listeners::EVENT_ERROR, move |_| {
            events::on_error(&bridge, &handle)
        })?);

        let bridge = self.bridge.clone();
        let handle = module.clone();
        registered.push(Listener::register(&target, listeners::EVENT_CRASH, move |_| {
            events::on_crash(&bridge, handle.exit_status())
        })?);

        let bridge = self.bridge.clone();
        registered.push(Listener::register(&target, listeners::EVENT_MESSAGE, move |event| {
            events::on_message_event(&bridge, &event)
        })?);

        log(&format!(
            "[modhost] Attached module element, {} listeners",
            registered.len()
        ));
        self.module = Some(module);
        self.module_listeners = registered;
        Ok(())
    }

    /// Look the module element up by id and attach it.
    pub fn attach_embed_by_id(&mut self, id: &str) -> Result<(), JsValue> {
        let element = read_bridge(&self.bridge, |b| b.surfaces().document().get_element_by_id(id))
            .ok_or_else(|| JsValue::from_str("bridge busy"))?
            .ok_or_else(|| JsValue::from_str(&format!("module element '{}' not found", id)))?;
        self.attach_embed(element)
    }

    /// Stop observing the module element.
    pub fn detach(&mut self) {
        if self.module.take().is_some() {
            let kinds: Vec<&str> = self.module_listeners.iter().map(|l| l.kind()).collect();
            log(&format!("[modhost] Detaching listeners: {}", kinds.join(", ")));
        }
        self.module_listeners.clear();
    }

    /// Deliver a message payload that did not arrive as a DOM event.
    pub fn handle_message(&self, data: JsValue) {
        events::on_message_data(&self.bridge, &data);
    }

    /// Post a raw payload to the attached module.
    pub fn post_message(&self, payload: JsValue) -> Result<(), JsValue> {
        let module = self
            .module
            .as_ref()
            .ok_or_else(|| JsValue::from_str("no module attached"))?;
        module.post_message(&payload).map_err(to_js)
    }

    /// Post a structured `{msg, val}` work request to the attached module.
    ///
    /// `val_json`, when given, must be valid JSON.
    pub fn post_command(&self, kind: &str, val_json: Option<String>) -> Result<(), JsValue> {
        let mut message = OutboundMessage::new(kind);
        if let Some(json) = val_json {
            let val = serde_json::from_str(&json)
                .map_err(|e| JsValue::from_str(&format!("invalid command value: {}", e)))?;
            message = message.with_val(val);
        }
        self.post_message(JsValue::from_str(&message.to_json()))
    }

    /// Ask for platform fullscreen on the canvas (user gesture required).
    pub fn request_fullscreen(&self) -> Result<(), JsValue> {
        with_bridge(&self.bridge, |b| b.request_fullscreen())
            .unwrap_or_else(|| Err(BridgeError::Platform("bridge busy".to_string())))
            .map_err(to_js)
    }

    pub fn enter_soft_fullscreen(&self) {
        with_bridge(&self.bridge, |b| b.enter_soft_fullscreen());
    }

    pub fn leave_soft_fullscreen(&self) {
        with_bridge(&self.bridge, |b| b.leave_soft_fullscreen());
    }

    pub fn is_soft_fullscreen_active(&self) -> bool {
        read_bridge(&self.bridge, |b| b.is_soft_fullscreen_active()).unwrap_or(false)
    }

    /// Lifecycle state as JSON, e.g. `{"state":"loading","percent":42.0}`.
    pub fn state_json(&self) -> String {
        read_bridge(&self.bridge, |b| serde_json::to_string(b.state()).ok())
            .flatten()
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Viewport state and message counters as JSON.
    pub fn stats_json(&self) -> String {
        read_bridge(&self.bridge, |bridge| {
            let stats = bridge.stats();
            serde_json::to_string(&serde_json::json!({
                "messagesHandled": stats.messages_handled,
                "unknownMessages": stats.unknown_messages,
                "decodeErrors": stats.decode_errors,
                "viewport": bridge.viewport(),
                "canvas": bridge.canvas_size(),
            }))
            .ok()
        })
        .flatten()
        .unwrap_or_else(|| "{}".to_string())
    }
}

fn register_page_listeners(
    bridge: &SharedBridge,
    document: &web_sys::Document,
) -> Result<Vec<Listener>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let on_fullscreen = bridge.clone();
    let fullscreen = Listener::register(document, listeners::EVENT_FULLSCREEN_CHANGE, move |_| {
        events::on_fullscreen_change(&on_fullscreen)
    })?;

    let on_resize = bridge.clone();
    let resize = Listener::register(&window, listeners::EVENT_RESIZE, move |_| {
        events::on_window_resize(&on_resize)
    })?;

    Ok(vec![fullscreen, resize])
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn host(prefix: &str) -> ModuleHost {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document.create_element("canvas").unwrap();
        canvas.set_id(&format!("{}-canvas", prefix));
        document.body().unwrap().append_child(&canvas).unwrap();
        let config = format!(r#"{{"elements":{{"canvas":"{}-canvas"}}}}"#, prefix);
        ModuleHost::new(&config).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_reads_while_bridge_is_borrowed_do_not_panic() {
        let mut host = host("busy");
        let bridge = host.bridge.clone();
        let _held = bridge.borrow_mut();

        assert_eq!(host.state_json(), "{}");
        assert_eq!(host.stats_json(), "{}");
        assert!(!host.is_soft_fullscreen_active());
        assert!(host.attach_embed_by_id("busy-canvas").is_err());
        assert!(host.request_fullscreen().is_err());
    }

    #[wasm_bindgen_test]
    fn test_reads_after_borrow_released() {
        let host = host("free");
        drop(host.bridge.borrow_mut());
        assert_eq!(host.state_json(), r#"{"state":"unloaded"}"#);
    }
}
