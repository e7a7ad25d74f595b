//! Error taxonomy for the host bridge.
//!
//! Every error kind is terminal only for the concern it describes:
//!
//! - [`BridgeError::Load`] ends the load attempt (state becomes `Errored`)
//! - [`BridgeError::Crash`] ends the run (state becomes `Crashed`)
//! - [`ProtocolError`] ends a single message; later messages still flow
//!
//! An unrecognized `msg` kind is NOT an error. It decodes to
//! [`InboundMessage::Unknown`](crate::InboundMessage::Unknown) and is
//! written to the output surface as a diagnostic.

use thiserror::Error;

/// A structured payload from the module could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Payload is not valid JSON
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// Payload parsed but is not a keyed record
    #[error("payload is not an object")]
    NotAnObject,
    /// Required `msg` field absent or not a string
    #[error("missing or non-string 'msg' field")]
    MissingKind,
    /// A known `msg` kind is missing a field or carries an invalid one
    #[error("invalid '{kind}' message: {reason}")]
    InvalidField { kind: String, reason: String },
}

/// Errors surfaced by the bridge to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The module failed to load; carries the module's last-error text
    #[error("module failed to load: {0}")]
    Load(String),
    /// The module stopped unexpectedly while running
    #[error("module crashed")]
    Crash,
    /// A single message could not be decoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// Bridge configuration was rejected
    #[error("invalid configuration: {0}")]
    Config(String),
    /// A platform (DOM) call failed
    #[error("platform call failed: {0}")]
    Platform(String),
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_wraps_transparently() {
        let err: BridgeError = ProtocolError::MissingKind.into();
        assert_eq!(err.to_string(), "missing or non-string 'msg' field");
    }

    #[test]
    fn test_invalid_field_message() {
        let err = ProtocolError::InvalidField {
            kind: "resize".to_string(),
            reason: "missing field `h`".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid 'resize' message: missing field `h`"
        );
    }
}
