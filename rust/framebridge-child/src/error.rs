use framebridge_protocol::ProtocolError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChildError {
    /// A message could not be handed to the parent window
    #[error("Unable to post message: {0}")]
    PostFailed(String),

    /// A message could not be encoded
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The reporter's parameters could not be read
    #[error("Invalid reporter configuration: {0}")]
    InvalidConfig(String),
}
