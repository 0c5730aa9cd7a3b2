//! Messages exchanged over `postMessage` and the checks applied to them.
//!
//! Outbound messages are built as [`ProtocolMessage`] values and encoded to
//! the wire shape:
//!
//! ```text
//! { "type": "ghl-height" | "ghl-scroll-request", "embedId": "...", "height"?: number }
//! ```
//!
//! Inbound data is untrusted. The receiving side wraps whatever the transport
//! delivered in an [`Envelope`] (sender origin plus a loosely typed
//! [`RawMessage`]) and passes it through [`TrustBoundary::admit`], which is
//! the only way to obtain a [`ProtocolMessage`] from foreign input.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    EmbedId, HEIGHT_MESSAGE_TYPE, Origin, ProtocolError, Rejection, SCROLL_MESSAGE_TYPE,
};

/// A message of the embed protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ProtocolMessage {
    /// The embedded page's current content height
    #[serde(rename = "ghl-height")]
    HeightReport {
        /// Embed the report belongs to
        #[serde(rename = "embedId")]
        embed_id: EmbedId,
        /// Content height in CSS pixels
        height: f64,
    },

    /// A trigger was clicked inside the embedded page
    #[serde(rename = "ghl-scroll-request")]
    ScrollRequest {
        /// Embed the request belongs to
        #[serde(rename = "embedId")]
        embed_id: EmbedId,
    },
}

impl ProtocolMessage {
    /// The embed this message is addressed to.
    pub fn embed_id(&self) -> &EmbedId {
        match self {
            ProtocolMessage::HeightReport { embed_id, .. }
            | ProtocolMessage::ScrollRequest { embed_id } => embed_id,
        }
    }

    /// The wire `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolMessage::HeightReport { .. } => HEIGHT_MESSAGE_TYPE,
            ProtocolMessage::ScrollRequest { .. } => SCROLL_MESSAGE_TYPE,
        }
    }

    /// Encode to the JSON text handed to the transport.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|error| ProtocolError::EncodeFailed(format!("{error}")))
    }
}

/// A height as found on the wire, before coercion.
///
/// Browsers deliver whatever the sender posted, so a height may arrive as a
/// number or as text. [`RawHeight::coerce`] accepts decimal text only; hex
/// notation, booleans and `null` do not count as heights.
#[derive(Clone, Debug, PartialEq)]
pub enum RawHeight {
    /// A numeric height
    Number(f64),
    /// A textual height
    Text(String),
}

impl RawHeight {
    /// Convert to a number. Blank text is `0`, text that is not a decimal
    /// number yields `NaN`.
    pub fn coerce(&self) -> f64 {
        match self {
            RawHeight::Number(value) => *value,
            RawHeight::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    0.0
                } else {
                    text.parse().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

/// Loosely typed message payload as delivered by the transport.
///
/// Every field is optional and unknown fields are ignored; nothing in here is
/// trusted until it passes [`TrustBoundary::admit`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMessage {
    /// The `type` tag
    pub kind: Option<String>,
    /// The `embedId` field
    pub embed_id: Option<String>,
    /// The `height` field
    pub height: Option<RawHeight>,
}

impl RawMessage {
    /// Read a payload from JSON, field by field. Fields of an unexpected
    /// shape are left empty, and anything that is not an object yields an
    /// empty message, which the trust boundary then rejects.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_owned);

        Self {
            kind: text("type"),
            embed_id: text("embedId"),
            height: value.get("height").and_then(|height| match height {
                Value::Number(number) => number.as_f64().map(RawHeight::Number),
                Value::String(text) => Some(RawHeight::Text(text.clone())),
                _ => None,
            }),
        }
    }
}

/// An inbound message together with the sender origin reported by the
/// transport.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// `MessageEvent.origin`
    pub origin: String,
    /// `MessageEvent.data`
    pub data: RawMessage,
}

impl Envelope {
    /// Pair a payload with its reported origin.
    pub fn new(origin: impl Into<String>, data: RawMessage) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

/// The receiving side's expectations about inbound messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrustBoundary {
    origin: Origin,
    embed_id: EmbedId,
}

impl TrustBoundary {
    /// Accept only messages sent from `origin` and addressed to `embed_id`.
    pub fn new(origin: Origin, embed_id: EmbedId) -> Self {
        Self { origin, embed_id }
    }

    /// Validate an envelope and decode it into a [`ProtocolMessage`].
    ///
    /// The origin is checked before any part of the payload is read, then the
    /// embed id, then the `type` tag and the fields of the variant.
    pub fn admit(&self, envelope: &Envelope) -> Result<ProtocolMessage, Rejection> {
        if !self.origin.matches(&envelope.origin) {
            return Err(Rejection::ForeignOrigin {
                origin: envelope.origin.clone(),
            });
        }

        let data = &envelope.data;

        if data.embed_id.as_deref() != Some(self.embed_id.as_str()) {
            return Err(Rejection::ForeignEmbed {
                embed_id: data.embed_id.clone(),
            });
        }

        let embed_id = self.embed_id.clone();

        match data.kind.as_deref() {
            Some(HEIGHT_MESSAGE_TYPE) => {
                let height = data
                    .height
                    .as_ref()
                    .map(RawHeight::coerce)
                    .filter(|height| height.is_finite())
                    .ok_or(Rejection::NonFiniteHeight)?;

                Ok(ProtocolMessage::HeightReport { embed_id, height })
            }
            Some(SCROLL_MESSAGE_TYPE) => Ok(ProtocolMessage::ScrollRequest { embed_id }),
            other => Err(Rejection::UnknownType(other.map(str::to_owned))),
        }
    }
}
