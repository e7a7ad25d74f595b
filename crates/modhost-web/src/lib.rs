//! Browser host bridge for natively-compiled page modules
//!
//! This crate runs on the page's main thread. It observes an embedded
//! native module, shows its load/run lifecycle, and relays its messages
//! to the DOM. All state and policy live in `modhost-core`; this crate is
//! the DOM boundary.
//!
//! ## Module Structure
//!
//! - `host` - `ModuleHost`, the JS-facing object, and event wiring
//! - `dom` - `DomSurfaces`, web-sys implementation of the bridge surfaces
//! - `module` - `ModuleHandle`, the plugin-style module element
//! - `util` - Console bindings
//!
//! ## Usage
//!
//! ```js
//! import init, { ModuleHost } from "./modhost_web.js";
//! await init();
//! const host = new ModuleHost(JSON.stringify({ transport: "structured" }));
//! host.attach_embed_by_id("module");
//! fullscreenButton.onclick = () => host.request_fullscreen();
//! ```

// =============================================================================
// Module declarations
// =============================================================================

pub(crate) mod dom;
pub(crate) mod host;
pub(crate) mod module;
pub(crate) mod util;

// =============================================================================
// Public re-exports
// =============================================================================

pub use dom::DomSurfaces;
pub use host::ModuleHost;
pub use module::ModuleHandle;

// Re-export core types that appear in this crate's API
pub use modhost_core::{BridgeConfig, BridgeError, LifecycleState, PixelSize, Transport};
