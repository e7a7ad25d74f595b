//! Fullscreen/Viewport Controller
//!
//! Switches the render surface between its windowed size and the window
//! size. The windowed size is saved before fullscreen is entered and is
//! never overwritten while fullscreen, so exiting restores it exactly.
//!
//! Platform fullscreen is asynchronous: [`ViewportState::request_fullscreen`]
//! only captures the size, and the resize happens when the platform
//! reports the change via [`ViewportState::on_fullscreen_change`].
//! Soft fullscreen needs no platform API and resizes immediately.

use serde::Serialize;

/// Pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How the render surface is currently presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Windowed,
    /// Platform fullscreen API
    Fullscreen,
    /// Canvas stretched over the window without the platform API
    SoftFullscreen,
}

/// Saved windowed size plus the current display mode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewportState {
    saved: Option<PixelSize>,
    mode: DisplayMode,
    /// A platform request captured `saved` and its notification is outstanding
    #[serde(skip)]
    pending_request: bool,
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn is_fullscreen(&self) -> bool {
        self.mode != DisplayMode::Windowed
    }

    pub fn is_soft_fullscreen(&self) -> bool {
        self.mode == DisplayMode::SoftFullscreen
    }

    /// Windowed size captured before the last fullscreen entry.
    pub fn saved(&self) -> Option<PixelSize> {
        self.saved
    }

    /// Capture the windowed size ahead of a platform fullscreen request.
    ///
    /// Must run before the request is issued: the change notification
    /// arrives later, after the canvas may already have been resized.
    pub fn request_fullscreen(&mut self, current: PixelSize) {
        if !self.is_fullscreen() {
            self.capture(current);
            self.pending_request = true;
        }
    }

    /// The platform refused the request; no notification will follow.
    pub fn cancel_request(&mut self) {
        self.pending_request = false;
    }

    /// Platform reported a fullscreen change.
    ///
    /// Returns the size the canvas should be set to, if any.
    pub fn on_fullscreen_change(
        &mut self,
        is_fullscreen: bool,
        current: PixelSize,
        window: PixelSize,
    ) -> Option<PixelSize> {
        if is_fullscreen {
            // Platform-initiated entry: first observation becomes the saved size
            if !self.pending_request {
                self.capture(current);
            }
            self.pending_request = false;
            self.mode = DisplayMode::Fullscreen;
            Self::fill(window)
        } else {
            if self.mode == DisplayMode::Windowed {
                // Stray exit notification: nothing to restore
                return None;
            }
            self.mode = DisplayMode::Windowed;
            self.saved.filter(|s| !s.is_empty())
        }
    }

    /// Stretch the canvas over the window without the platform API.
    pub fn enter_soft_fullscreen(&mut self, current: PixelSize, window: PixelSize) -> Option<PixelSize> {
        if self.mode == DisplayMode::Fullscreen {
            return None;
        }
        self.capture(current);
        self.mode = DisplayMode::SoftFullscreen;
        Self::fill(window)
    }

    /// Leave soft fullscreen, restoring the saved size.
    pub fn leave_soft_fullscreen(&mut self) -> Option<PixelSize> {
        if self.mode != DisplayMode::SoftFullscreen {
            return None;
        }
        self.mode = DisplayMode::Windowed;
        self.saved.filter(|s| !s.is_empty())
    }

    /// Window was resized; keep a fullscreen canvas at window size.
    pub fn on_window_resize(&self, window: PixelSize) -> Option<PixelSize> {
        if self.is_fullscreen() {
            Self::fill(window)
        } else {
            None
        }
    }

    fn capture(&mut self, current: PixelSize) {
        if !self.is_fullscreen() {
            self.saved = Some(current);
        }
    }

    fn fill(window: PixelSize) -> Option<PixelSize> {
        if window.is_empty() {
            None
        } else {
            Some(window)
        }
    }
}
