//! Host bridge core for natively-compiled page modules
//!
//! Platform-independent half of the module host: everything with state,
//! ordering or edge-case policy lives here and is testable without a
//! browser. The `modhost-web` crate binds it to the DOM.
//!
//! ## Module Structure
//!
//! - `lifecycle` - Unloaded → Loading → Ready / Errored / Crashed
//! - `progress` - Load percentage and dependency-counter status
//! - `protocol` - Plain-text and structured message decoding
//! - `viewport` - Fullscreen and soft-fullscreen canvas sizing
//! - `output` - Output panel text buffer
//! - `surfaces` - The page elements the bridge drives (trait)
//! - `bridge` - `ModuleBridge`, one instance per page session
//! - `config` - JSON configuration
//! - `testing` - In-memory surfaces for tests
//!
//! ## Event flow
//!
//! ```text
//! runtime lifecycle events ──► Lifecycle ──► status / progress / visibility
//! module messages ───────────► protocol ──► output text / canvas size
//! fullscreen request/change ─► ViewportState ──► canvas size
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod output;
pub mod progress;
pub mod protocol;
pub mod surfaces;
pub mod testing;
pub mod viewport;

pub use bridge::{BridgeStats, ModuleBridge};
pub use config::{BridgeConfig, ElementIds};
pub use error::{BridgeError, ProtocolError};
pub use lifecycle::{Lifecycle, LifecycleState, Transition};
pub use output::OutputBuffer;
pub use progress::{compute_percent, DependencyTracker, ProgressSample};
pub use protocol::{InboundMessage, OutboundMessage, Transport};
pub use surfaces::{Surface, Surfaces};
pub use viewport::{DisplayMode, PixelSize, ViewportState};
