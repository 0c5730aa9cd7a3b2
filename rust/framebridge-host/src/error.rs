use framebridge_protocol::EmbedId;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// A controller for this embed id is already installed on the page
    #[error("Embed {0} is already installed")]
    AlreadyInstalled(EmbedId),

    /// The serialized embed configuration could not be read
    #[error("Invalid embed configuration: {0}")]
    InvalidConfig(String),

    /// The page offers no document to mount into
    #[error("Document unavailable: {0}")]
    DocumentUnavailable(String),
}

/// The anchor selector could not be parsed by the document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid selector {selector:?}")]
pub struct InvalidSelector {
    /// The selector as configured
    pub selector: String,
}
