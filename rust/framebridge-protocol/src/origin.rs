use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

/// ASCII serialization of a web origin (`scheme://host[:port]`).
///
/// This is the only thing the host page trusts about an inbound message, and
/// it is compared verbatim with what the browser reports as the sender's
/// origin (`MessageEvent.origin`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// The origin of a URL, with default ports elided the way browsers do.
    pub fn of(url: &Url) -> Self {
        Self(url.origin().ascii_serialization())
    }

    /// Whether a transport-reported origin is this origin.
    pub fn matches(&self, reported: &str) -> bool {
        self.0 == reported
    }

    /// The serialized origin.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
