use framebridge_protocol::ProtocolError;
use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// No embedded page URL was given
    #[error("Please provide the embedded page URL")]
    MissingUrl,

    /// The URL could not be parsed as an absolute URL
    #[error("The page URL {url:?} must be a valid absolute URL (include https://): {reason}")]
    InvalidUrl {
        /// The URL as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// The URL does not use `https`
    #[error("Embeds require a secure (https://) page URL, got {scheme}://")]
    InsecureScheme {
        /// The scheme of the given URL
        scheme: String,
    },

    /// Nothing was left of the button classes after normalization
    #[error("Please provide at least one button class")]
    NoButtonClasses,

    /// A settings bundle could not be read
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// A value could not be serialized into a snippet
    #[error("Failed to serialize {what}: {reason}")]
    Serialize {
        /// What was being serialized
        what: &'static str,
        /// The serializer's complaint
        reason: String,
    },

    /// A snippet template refers to a value that is not provided
    #[error("Unknown template placeholder {0}")]
    UnknownPlaceholder(String),

    /// A protocol value could not be constructed
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
