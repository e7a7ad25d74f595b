//! Bridge configuration
//!
//! Supplied by the page as a JSON string. Every field has a default, so
//! `"{}"` is a valid configuration for the structured transport with
//! the conventional element ids.

use serde::Deserialize;

use crate::error::BridgeError;
use crate::protocol::Transport;

/// Default element ids, matching the bundled host page.
pub const DEFAULT_CANVAS_ID: &str = "canvas";
pub const DEFAULT_SPINNER_ID: &str = "spinner";
pub const DEFAULT_OUTPUT_ID: &str = "output";
pub const DEFAULT_STATUS_ID: &str = "status";
pub const DEFAULT_PROGRESS_ID: &str = "progress";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Encoding of the module's message channel
    pub transport: Transport,
    pub elements: ElementIds,
    /// Maximum bytes kept in the output panel; unbounded if absent
    pub scrollback_limit: Option<usize>,
    /// Keep a fullscreen canvas at window size across window resizes
    pub track_window_size: bool,
    /// Mirror output text to the browser console
    pub echo_to_console: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport: Transport::default(),
            elements: ElementIds::default(),
            scrollback_limit: None,
            track_window_size: true,
            echo_to_console: false,
        }
    }
}

impl BridgeConfig {
    /// Parse a configuration; an empty string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json).map_err(|e| BridgeError::Config(e.to_string()))
    }
}

/// Ids of the page elements the bridge drives.
///
/// Only the canvas is mandatory; the others are skipped when absent.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementIds {
    pub canvas: String,
    pub spinner: Option<String>,
    pub output: Option<String>,
    pub status: Option<String>,
    pub progress: Option<String>,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            canvas: DEFAULT_CANVAS_ID.to_string(),
            spinner: Some(DEFAULT_SPINNER_ID.to_string()),
            output: Some(DEFAULT_OUTPUT_ID.to_string()),
            status: Some(DEFAULT_STATUS_ID.to_string()),
            progress: Some(DEFAULT_PROGRESS_ID.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(BridgeConfig::from_json("").unwrap(), BridgeConfig::default());
        assert_eq!(BridgeConfig::from_json("{}").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let config = BridgeConfig::from_json(
            r#"{"transport":"plain","elements":{"canvas":"nacl","spinner":null},"scrollback_limit":4096}"#,
        )
        .unwrap();
        assert_eq!(config.transport, Transport::Plain);
        assert_eq!(config.elements.canvas, "nacl");
        assert_eq!(config.elements.spinner, None);
        assert_eq!(config.elements.output.as_deref(), Some("output"));
        assert_eq!(config.scrollback_limit, Some(4096));
        assert!(config.track_window_size);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            BridgeConfig::from_json(r#"{"transport":"binary"}"#),
            Err(BridgeError::Config(_))
        ));
        assert!(matches!(
            BridgeConfig::from_json(r#"{"transprot":"plain"}"#),
            Err(BridgeError::Config(_))
        ));
    }
}
