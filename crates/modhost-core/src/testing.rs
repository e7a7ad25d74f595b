//! In-memory surfaces for testing.
//!
//! Records every effect the bridge produces so tests can assert on
//! output text, visibility toggles and canvas sizes without a browser.

use std::collections::HashMap;

use crate::error::BridgeError;
use crate::output::OutputBuffer;
use crate::surfaces::{Surface, Surfaces};
use crate::viewport::PixelSize;

/// Recording [`Surfaces`] implementation.
#[derive(Debug)]
pub struct MemorySurfaces {
    pub output: OutputBuffer,
    pub canvas: PixelSize,
    pub window: PixelSize,
    pub status: String,
    pub progress: Option<f64>,
    visible: HashMap<Surface, bool>,
    /// Number of times each surface was toggled
    pub toggles: HashMap<Surface, usize>,
    pub canvas_assignments: usize,
    pub fullscreen_requests: usize,
    /// When set, `request_fullscreen` fails with this message
    pub fail_fullscreen: Option<String>,
}

impl MemorySurfaces {
    /// Spinner visible, canvas and output hidden, as a freshly loaded page.
    pub fn new(canvas: PixelSize, window: PixelSize) -> Self {
        let mut visible = HashMap::new();
        visible.insert(Surface::Spinner, true);
        visible.insert(Surface::Canvas, false);
        visible.insert(Surface::Output, false);
        Self {
            output: OutputBuffer::new(None),
            canvas,
            window,
            status: String::new(),
            progress: None,
            visible,
            toggles: HashMap::new(),
            canvas_assignments: 0,
            fullscreen_requests: 0,
            fail_fullscreen: None,
        }
    }

    pub fn is_visible(&self, surface: Surface) -> bool {
        self.visible.get(&surface).copied().unwrap_or(false)
    }

    pub fn toggle_count(&self, surface: Surface) -> usize {
        self.toggles.get(&surface).copied().unwrap_or(0)
    }

    pub fn output_text(&self) -> &str {
        self.output.as_str()
    }
}

impl Default for MemorySurfaces {
    fn default() -> Self {
        Self::new(PixelSize::new(800, 600), PixelSize::new(1920, 1080))
    }
}

impl Surfaces for MemorySurfaces {
    fn append_output(&mut self, text: &str) {
        self.output.append(text);
    }

    fn set_visible(&mut self, surface: Surface, visible: bool) {
        self.visible.insert(surface, visible);
        *self.toggles.entry(surface).or_insert(0) += 1;
    }

    fn set_canvas_size(&mut self, size: PixelSize) {
        self.canvas = size;
        self.canvas_assignments += 1;
    }

    fn canvas_size(&self) -> PixelSize {
        self.canvas
    }

    fn window_size(&self) -> PixelSize {
        self.window
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.to_string();
    }

    fn set_progress(&mut self, percent: f64) {
        self.progress = Some(percent);
    }

    fn request_fullscreen(&mut self) -> Result<(), BridgeError> {
        self.fullscreen_requests += 1;
        match &self.fail_fullscreen {
            Some(reason) => Err(BridgeError::Platform(reason.clone())),
            None => Ok(()),
        }
    }
}
