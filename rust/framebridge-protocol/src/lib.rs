#![warn(missing_docs)]

//! Shared vocabulary of a framebridge embed.
//!
//! A framebridge embed is made of two documents that never share memory: the
//! *host page*, which mounts an iframe next to an anchor element, and the
//! *embedded page* loaded inside that iframe. The two only talk through
//! `window.postMessage`, so everything they must agree on lives here:
//!
//! ```text
//! ┌──────────────────────────┐               ┌──────────────────────────┐
//! │ Host page                │               │ Embedded page            │
//! │  (framebridge-host)      │  ghl-height   │  (framebridge-child)     │
//! │                          │ ◂──────────── │                          │
//! │  TrustBoundary::admit    │  ghl-scroll-  │  ProtocolMessage::encode │
//! │    origin + embedId      │  request      │                          │
//! └──────────────────────────┘ ◂──────────── └──────────────────────────┘
//! ```
//!
//! - **[`EmbedConfig`]**: the parameters baked into both generated payloads.
//! - **[`ProtocolMessage`]**: the closed set of messages on the bus.
//! - **[`TrustBoundary`]**: turns an untrusted [`Envelope`] into a
//!   [`ProtocolMessage`] or a [`Rejection`].
//! - **[`ButtonClasses`]**: the class normalization both sides must apply
//!   identically.
//! - **[`Capabilities`]**: platform features sniffed once at startup.

use std::time::Duration;

mod capability;
pub use capability::*;

mod classes;
pub use classes::*;

mod config;
pub use config::*;

mod embed_id;
pub use embed_id::*;

mod error;
pub use error::*;

mod message;
pub use message::*;

mod origin;
pub use origin::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod console;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
mod probe;
#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub use probe::*;

/// Wire tag of a height report.
pub const HEIGHT_MESSAGE_TYPE: &str = "ghl-height";

/// Wire tag of a scroll request.
pub const SCROLL_MESSAGE_TYPE: &str = "ghl-scroll-request";

/// Query parameter carrying the embed id into the embedded page's URL.
pub const EMBED_ID_PARAM: &str = "ghlEmbedId";

/// Prefix of every generated embed id.
pub const EMBED_ID_PREFIX: &str = "ghlEmbed_";

/// Height changes at or below this many pixels are treated as layout noise.
pub const HYSTERESIS_PX: f64 = 2.0;

/// Floor for the iframe height when none is configured.
pub const DEFAULT_MIN_HEIGHT: u32 = 600;

/// Anchor selector used when none is configured.
pub const DEFAULT_FORM_SELECTOR: &str = "#content";

/// Delay between two attempts to attach the iframe to the host document.
pub const MOUNT_RETRY_DELAY: Duration = Duration::from_millis(750);

/// Number of mount attempts before the host controller gives up.
pub const DEFAULT_MAX_MOUNT_ATTEMPTS: u32 = 40;

/// Height polling interval used when size observation is unavailable.
pub const HEIGHT_POLL_INTERVAL: Duration = Duration::from_millis(600);

/// Delay after the embedded page's `load` event before a corrective report.
pub const LOAD_SETTLE_DELAY: Duration = Duration::from_millis(120);
