use std::{fmt::Display, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EMBED_ID_PREFIX, ProtocolError};

/// Opaque token that ties a host payload to its embedded payload.
///
/// The id namespaces the DOM nodes the host controller creates (container,
/// iframe and style element) and keys the host install registry, so it is
/// restricted to characters that are valid in an HTML id and a CSS id
/// selector without escaping: ASCII alphanumerics, `_` and `-`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
#[repr(transparent)]
pub struct EmbedId(String);

impl EmbedId {
    /// Wrap a random token as a prefixed embed id (`ghlEmbed_<token>`).
    pub fn from_token(token: &str) -> Result<Self, ProtocolError> {
        format!("{EMBED_ID_PREFIX}{token}").parse()
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the container element the host mounts.
    pub fn container_id(&self) -> String {
        self.0.clone()
    }

    /// Id of the iframe element inside the container.
    pub fn frame_id(&self) -> String {
        format!("{}-frame", self.0)
    }

    /// Id of the style element the host injects.
    pub fn style_id(&self) -> String {
        format!("{}-style", self.0)
    }
}

impl FromStr for EmbedId {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(ProtocolError::InvalidEmbedId(
                "embed id must not be empty".into(),
            ));
        }

        if let Some(character) = value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(ProtocolError::InvalidEmbedId(format!(
                "unexpected character {character:?} in {value:?}"
            )));
        }

        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for EmbedId {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EmbedId> for String {
    fn from(value: EmbedId) -> Self {
        value.0
    }
}

impl Deref for EmbedId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for EmbedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for EmbedId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
