#![warn(missing_docs)]

//! The host side of a framebridge embed.
//!
//! The host page includes one payload per embed. The payload installs a
//! [`Controller`] that mounts the embed container next to an anchor element,
//! sizes the iframe from the embedded page's height reports and scrolls the
//! page when the embedded page asks for it.
//!
//! # Lifecycle
//!
//! ```text
//!  install ──▸ UNMOUNTED ──▸ MOUNTING ──▸ MOUNTED
//!                              │  ▲
//!                              └──┘ retry after RetryPolicy::delay
//!                              │
//!                              └────▸ GAVE_UP (retry budget exhausted)
//! ```
//!
//! # Modules
//!
//! - **[`registry`]**: install-once guard keyed by embed id.
//! - **[`HostDocument`]**: the DOM operations the controller needs, so the
//!   state machine runs unchanged against the browser and against test
//!   doubles.
//! - **[`Controller`]**: mounting, height convergence and scroll handling.
//!   It never waits; it returns a [`MountStep`] saying when to call it again
//!   and leaves scheduling to the binding.
//! - **`web`** (wasm32 only): the browser binding exported as `install_host`.

mod controller;
pub use controller::*;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod height;
pub use height::*;

mod mount;
pub use mount::*;

pub mod registry;

mod style;
pub use style::*;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
pub mod web;
