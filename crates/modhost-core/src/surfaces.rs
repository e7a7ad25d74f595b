//! The page surfaces the bridge drives.
//!
//! All DOM access goes through this one collaborator. The bridge never
//! looks elements up itself; the browser implementation lives in
//! `modhost-web` and tests use [`MemorySurfaces`](crate::testing::MemorySurfaces).

use crate::error::BridgeError;
use crate::viewport::PixelSize;

/// Visibility-toggled page elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Loading indicator, shown until the module is usable
    Spinner,
    /// Render canvas
    Canvas,
    /// Text output panel
    Output,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Spinner, Surface::Canvas, Surface::Output];
}

pub trait Surfaces {
    /// Append text to the output panel and keep it scrolled to the end.
    fn append_output(&mut self, text: &str);

    fn set_visible(&mut self, surface: Surface, visible: bool);

    /// Assign the render canvas pixel size.
    fn set_canvas_size(&mut self, size: PixelSize);

    fn canvas_size(&self) -> PixelSize;

    /// Current viewport (window) size.
    fn window_size(&self) -> PixelSize;

    /// Replace the status line text.
    fn set_status(&mut self, text: &str);

    /// Update the progress indicator, `percent` in `[0, 100]`.
    fn set_progress(&mut self, percent: f64);

    /// Ask the platform to make the render canvas fullscreen.
    ///
    /// Completion is reported later through a fullscreen-change event.
    fn request_fullscreen(&mut self) -> Result<(), BridgeError>;
}
