use thiserror::Error;

/// Errors produced while constructing protocol values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The embed id cannot be used as a DOM id
    #[error("Invalid embed id: {0}")]
    InvalidEmbedId(String),

    /// The placement keyword is not one of `above` or `below`
    #[error("Invalid placement {0:?}, expected \"above\" or \"below\"")]
    InvalidPlacement(String),

    /// A message could not be encoded for the wire
    #[error("Failed to encode message: {0}")]
    EncodeFailed(String),
}

/// Reasons an inbound message is dropped at the trust boundary.
///
/// A rejection is never surfaced as a failure: receivers discard the message
/// and at most emit a debug trace.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    /// The transport reported a sender origin other than the trusted one
    #[error("Message from untrusted origin {origin:?}")]
    ForeignOrigin {
        /// Origin reported by the transport
        origin: String,
    },

    /// The message carries no embed id, or one belonging to another embed
    #[error("Message addressed to embed {embed_id:?}")]
    ForeignEmbed {
        /// Embed id carried by the message, if any
        embed_id: Option<String>,
    },

    /// The `type` tag is absent or not part of the protocol
    #[error("Unknown message type {0:?}")]
    UnknownType(Option<String>),

    /// A height report whose height is absent or not a finite number
    #[error("Height report without a finite height")]
    NonFiniteHeight,
}
