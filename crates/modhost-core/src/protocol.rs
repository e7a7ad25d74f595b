//! Message Protocol Handler
//!
//! Decodes payloads arriving on the module's message channel into typed
//! [`InboundMessage`]s. Two transports are supported:
//!
//! - **Plain text**: the payload is output text, appended verbatim
//! - **Structured**: the payload is a JSON record with a required `msg`
//!   field selecting the message kind
//!
//! ## Structured kinds
//!
//! | `msg`      | Fields                 | Effect                               |
//! |------------|------------------------|--------------------------------------|
//! | `"log"`    | `val: string`          | append `val` and a newline           |
//! | `"resize"` | `w, h: positive ints`  | set canvas pixel size (no scaling)   |
//! | other      | -                      | append `unknown msg received: <msg>` |
//!
//! Decoding is stateless; ordering is the caller's arrival order.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;
use crate::viewport::PixelSize;

/// Message channel encoding used by the embedded module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Payloads are raw output text
    #[serde(alias = "text")]
    Plain,
    /// Payloads are JSON records keyed by `msg`
    #[default]
    Structured,
}

/// A decoded message from the module. One message, one DOM effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundMessage {
    /// Plain-text transport payload, appended verbatim
    Text(String),
    /// `msg: "log"`, appended followed by a newline
    Log { text: String },
    /// `msg: "resize"`, assigned to the canvas directly
    Resize { width: u32, height: u32 },
    /// Any other `msg` value
    Unknown { kind: String },
}

impl InboundMessage {
    /// Text this message appends to the output surface, if any.
    pub fn output_text(&self) -> Option<String> {
        match self {
            InboundMessage::Text(text) => Some(text.clone()),
            InboundMessage::Log { text } => Some(format!("{}\n", text)),
            InboundMessage::Resize { .. } => None,
            InboundMessage::Unknown { kind } => Some(format!("unknown msg received: {}\n", kind)),
        }
    }

    /// Canvas size this message assigns, if any.
    pub fn canvas_size(&self) -> Option<PixelSize> {
        match self {
            InboundMessage::Resize { width, height } => Some(PixelSize::new(*width, *height)),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct LogBody {
    val: String,
}

#[derive(Deserialize)]
struct ResizeBody {
    w: NonZeroU32,
    h: NonZeroU32,
}

/// Decode a raw payload according to the configured transport.
pub fn decode(transport: Transport, payload: &str) -> Result<InboundMessage, ProtocolError> {
    match transport {
        Transport::Plain => Ok(InboundMessage::Text(payload.to_string())),
        Transport::Structured => decode_structured(payload),
    }
}

/// Decode a structured (JSON) payload.
pub fn decode_structured(payload: &str) -> Result<InboundMessage, ProtocolError> {
    let value: Value = serde_json::from_str(payload)?;
    decode_value(value)
}

/// Decode an already-parsed structured record.
pub fn decode_value(value: Value) -> Result<InboundMessage, ProtocolError> {
    let record = match value {
        Value::Object(record) => record,
        _ => return Err(ProtocolError::NotAnObject),
    };

    let kind = match record.get("msg") {
        Some(Value::String(kind)) => kind.clone(),
        _ => return Err(ProtocolError::MissingKind),
    };

    match kind.as_str() {
        "log" => {
            let body: LogBody = body_of(&kind, record)?;
            Ok(InboundMessage::Log { text: body.val })
        }
        "resize" => {
            let body: ResizeBody = body_of(&kind, record)?;
            Ok(InboundMessage::Resize {
                width: body.w.get(),
                height: body.h.get(),
            })
        }
        _ => Ok(InboundMessage::Unknown { kind }),
    }
}

fn body_of<T: for<'de> Deserialize<'de>>(
    kind: &str,
    record: Map<String, Value>,
) -> Result<T, ProtocolError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| ProtocolError::InvalidField {
        kind: kind.to_string(),
        reason: e.to_string(),
    })
}

/// A work request posted from the page to the module (structured transport).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutboundMessage {
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<Value>,
}

impl OutboundMessage {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            msg: kind.into(),
            val: None,
        }
    }

    pub fn with_val(mut self, val: Value) -> Self {
        self.val = Some(val);
        self
    }

    /// Serialize to the wire form expected by the module.
    pub fn to_json(&self) -> String {
        // A struct of a String and a Value always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_log() {
        let msg = decode(Transport::Structured, r#"{"msg":"log","val":"hello"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Log { text: "hello".to_string() });
        assert_eq!(msg.output_text().as_deref(), Some("hello\n"));
        assert_eq!(msg.canvas_size(), None);
    }

    #[test]
    fn test_decode_resize() {
        let msg = decode(Transport::Structured, r#"{"msg":"resize","w":320,"h":240}"#).unwrap();
        assert_eq!(msg, InboundMessage::Resize { width: 320, height: 240 });
        assert_eq!(msg.output_text(), None);
        assert_eq!(msg.canvas_size(), Some(PixelSize::new(320, 240)));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let msg = decode(Transport::Structured, r#"{"msg":"frobnicate"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Unknown { kind: "frobnicate".to_string() });
        assert_eq!(
            msg.output_text().as_deref(),
            Some("unknown msg received: frobnicate\n")
        );
    }

    #[test]
    fn test_plain_transport_is_verbatim() {
        let msg = decode(Transport::Plain, "{\"msg\":\"log\"}").unwrap();
        assert_eq!(msg.output_text().as_deref(), Some("{\"msg\":\"log\"}"));
    }

    #[test]
    fn test_malformed_is_not_unknown() {
        assert!(matches!(
            decode(Transport::Structured, "{not json"),
            Err(ProtocolError::Malformed(_))
        ));
        assert_eq!(
            decode(Transport::Structured, "[1,2,3]"),
            Err(ProtocolError::NotAnObject)
        );
        assert_eq!(
            decode(Transport::Structured, r#"{"val":"x"}"#),
            Err(ProtocolError::MissingKind)
        );
        assert_eq!(
            decode(Transport::Structured, r#"{"msg":7}"#),
            Err(ProtocolError::MissingKind)
        );
    }

    #[test]
    fn test_known_kind_with_bad_fields() {
        for payload in [
            r#"{"msg":"log"}"#,
            r#"{"msg":"log","val":5}"#,
            r#"{"msg":"resize","w":320}"#,
            r#"{"msg":"resize","w":0,"h":240}"#,
            r#"{"msg":"resize","w":-4,"h":240}"#,
            r#"{"msg":"resize","w":1.5,"h":240}"#,
        ] {
            match decode(Transport::Structured, payload) {
                Err(ProtocolError::InvalidField { .. }) => {}
                other => panic!("{} decoded to {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_outbound_json() {
        assert_eq!(OutboundMessage::new("pause").to_json(), r#"{"msg":"pause"}"#);
        assert_eq!(
            OutboundMessage::new("seed").with_val(serde_json::json!(42)).to_json(),
            r#"{"msg":"seed","val":42}"#
        );
    }

    #[test]
    fn test_transport_names() {
        let t: Transport = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(t, Transport::Plain);
        let t: Transport = serde_json::from_str("\"structured\"").unwrap();
        assert_eq!(t, Transport::Structured);
        assert!(serde_json::from_str::<Transport>("\"binary\"").is_err());
    }
}
