//! DOM implementation of the bridge surfaces
//!
//! Elements are looked up once, by the ids in the configuration, when the
//! host is constructed. Only the canvas is required; a missing optional
//! element is logged and its effects are skipped.

use modhost_core::{BridgeConfig, BridgeError, OutputBuffer, PixelSize, Surface, Surfaces};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCanvasElement, HtmlElement, HtmlProgressElement, HtmlTextAreaElement};

use crate::util::{describe_js, log};

/// Output panel: a `<textarea>` or any block element.
enum OutputElement {
    TextArea(HtmlTextAreaElement),
    Block(HtmlElement),
}

pub struct DomSurfaces {
    document: Document,
    canvas: HtmlCanvasElement,
    spinner: Option<HtmlElement>,
    output: Option<OutputElement>,
    status: Option<Element>,
    progress: Option<HtmlProgressElement>,
    buffer: OutputBuffer,
    echo_to_console: bool,
}

impl DomSurfaces {
    /// Resolve the configured elements in the current document.
    pub fn from_document(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| BridgeError::Platform("no document".to_string()))?;
        let ids = &config.elements;

        let canvas = document
            .get_element_by_id(&ids.canvas)
            .ok_or_else(|| BridgeError::Platform(format!("canvas '{}' not found", ids.canvas)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| BridgeError::Platform(format!("'{}' is not a canvas", ids.canvas)))?;

        let spinner = lookup(&document, ids.spinner.as_deref())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());

        let output = lookup(&document, ids.output.as_deref()).and_then(|el| {
            match el.dyn_into::<HtmlTextAreaElement>() {
                Ok(area) => Some(OutputElement::TextArea(area)),
                Err(el) => el.dyn_into::<HtmlElement>().ok().map(OutputElement::Block),
            }
        });

        let status = lookup(&document, ids.status.as_deref());

        let progress = lookup(&document, ids.progress.as_deref())
            .and_then(|el| el.dyn_into::<HtmlProgressElement>().ok());
        if let Some(bar) = &progress {
            bar.set_max(100.0);
        }

        Ok(Self {
            document,
            canvas,
            spinner,
            output,
            status,
            progress,
            buffer: OutputBuffer::new(config.scrollback_limit),
            echo_to_console: config.echo_to_console,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// True if the platform's current fullscreen element is our canvas.
    pub fn canvas_is_fullscreen(&self) -> bool {
        match self.document.fullscreen_element() {
            Some(el) => {
                let canvas: &Element = &self.canvas;
                &el == canvas
            }
            None => false,
        }
    }

    fn element_for(&self, surface: Surface) -> Option<&HtmlElement> {
        match surface {
            Surface::Spinner => self.spinner.as_ref(),
            Surface::Canvas => Some(&*self.canvas),
            Surface::Output => match &self.output {
                Some(OutputElement::TextArea(area)) => Some(&**area),
                Some(OutputElement::Block(block)) => Some(block),
                None => None,
            },
        }
    }
}

fn lookup(document: &Document, id: Option<&str>) -> Option<Element> {
    let id = id?;
    let el = document.get_element_by_id(id);
    if el.is_none() {
        log(&format!("[modhost] element '{}' not found, skipping", id));
    }
    el
}

impl Surfaces for DomSurfaces {
    fn append_output(&mut self, text: &str) {
        if self.echo_to_console {
            log(text.trim_end_matches('\n'));
        }
        self.buffer.append(text);
        match &self.output {
            Some(OutputElement::TextArea(area)) => {
                area.set_value(self.buffer.as_str());
                area.set_scroll_top(area.scroll_height());
            }
            Some(OutputElement::Block(block)) => {
                block.set_text_content(Some(self.buffer.as_str()));
                block.set_scroll_top(block.scroll_height());
            }
            None => {}
        }
    }

    fn set_visible(&mut self, surface: Surface, visible: bool) {
        let Some(el) = self.element_for(surface) else {
            return;
        };
        let style = el.style();
        let result = if visible {
            style.remove_property("display").map(|_| ())
        } else {
            style.set_property("display", "none")
        };
        if let Err(e) = result {
            log(&format!(
                "[modhost] failed to toggle {:?}: {}",
                surface,
                describe_js(&e)
            ));
        }
    }

    fn set_canvas_size(&mut self, size: PixelSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn canvas_size(&self) -> PixelSize {
        PixelSize::new(self.canvas.width(), self.canvas.height())
    }

    fn window_size(&self) -> PixelSize {
        let Some(window) = web_sys::window() else {
            return PixelSize::default();
        };
        let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            v.ok().and_then(|v| v.as_f64()).map(|v| v.max(0.0) as u32).unwrap_or(0)
        };
        PixelSize::new(dim(window.inner_width()), dim(window.inner_height()))
    }

    fn set_status(&mut self, text: &str) {
        if let Some(status) = &self.status {
            status.set_text_content(Some(text));
        }
    }

    fn set_progress(&mut self, percent: f64) {
        if let Some(bar) = &self.progress {
            bar.set_value(percent);
        }
    }

    fn request_fullscreen(&mut self) -> Result<(), BridgeError> {
        self.canvas
            .request_fullscreen()
            .map_err(|e| BridgeError::Platform(describe_js(&e)))
    }
}
