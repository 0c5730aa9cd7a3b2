#![warn(missing_docs)]

//! The embedded side of a framebridge embed.
//!
//! The reporter runs inside the iframe. It recovers the embed id it was
//! given, keeps the host informed of the content height and asks the host to
//! scroll when a configured trigger is clicked. It never learns anything
//! about the host: every message goes to `window.parent` with target origin
//! `*`, and the host is responsible for checking where it came from.
//!
//! ```text
//!  start ──▸ report ──▸ ┌─────────────┐
//!  load + 120ms ──────▸ │ ReportQueue │ ─ next frame ─▸ ghl-height
//!  resize / mutation ─▸ └─────────────┘
//!  poll (no ResizeObserver) ─────────────────────────▸ ghl-height
//!  click on trigger ─────────────────────────────────▸ ghl-scroll-request
//! ```

mod embed_id;
pub use embed_id::*;

mod error;
pub use error::*;

mod metrics;
pub use metrics::*;

mod queue;
pub use queue::*;

mod reporter;
pub use reporter::*;

mod trigger;
pub use trigger::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod web;
