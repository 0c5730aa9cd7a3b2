use std::time::Duration;

use crate::HEIGHT_POLL_INTERVAL;

/// How the embedded page notices that its content changed size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeObservation {
    /// A `ResizeObserver` on the content root
    Observer,
    /// Re-measure on a fixed interval
    Polling {
        /// Time between two measurements
        interval: Duration,
    },
}

/// Whether subtree mutations can be observed as a complementary signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationObservation {
    /// A `MutationObserver` on child list and attribute changes
    Observer,
    /// No mutation signal
    Unavailable,
}

/// How the host page scrolls to the embed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollStrategy {
    /// Animated scrolling (`behavior: "smooth"`)
    Smooth,
    /// Jump straight to the target
    Instant,
}

/// Feature probes a platform binding answers once at startup.
pub trait CapabilityProbe {
    /// `ResizeObserver` is available
    fn resize_observer(&self) -> bool;
    /// `MutationObserver` is available
    fn mutation_observer(&self) -> bool;
    /// `scroll-behavior: smooth` is supported
    fn smooth_scroll(&self) -> bool;
}

/// Strategies selected for the current environment.
///
/// Built once with [`Capabilities::detect`]; runtime code branches on these
/// values instead of probing the environment at each call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Size change signal
    pub size: SizeObservation,
    /// Mutation signal
    pub mutation: MutationObservation,
    /// Scroll behavior
    pub scroll: ScrollStrategy,
}

impl Capabilities {
    /// Pick a strategy for every capability from the platform's answers.
    pub fn detect<P: CapabilityProbe + ?Sized>(probe: &P) -> Self {
        let capabilities = Self {
            size: if probe.resize_observer() {
                SizeObservation::Observer
            } else {
                SizeObservation::Polling {
                    interval: HEIGHT_POLL_INTERVAL,
                }
            },
            mutation: if probe.mutation_observer() {
                MutationObservation::Observer
            } else {
                MutationObservation::Unavailable
            },
            scroll: if probe.smooth_scroll() {
                ScrollStrategy::Smooth
            } else {
                ScrollStrategy::Instant
            },
        };

        tracing::debug!(?capabilities, "Selected platform capabilities");

        capabilities
    }

    /// Everything a current browser offers.
    pub fn full() -> Self {
        Self {
            size: SizeObservation::Observer,
            mutation: MutationObservation::Observer,
            scroll: ScrollStrategy::Smooth,
        }
    }

    /// The fallback of every capability.
    pub fn minimal() -> Self {
        Self {
            size: SizeObservation::Polling {
                interval: HEIGHT_POLL_INTERVAL,
            },
            mutation: MutationObservation::Unavailable,
            scroll: ScrollStrategy::Instant,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::full()
    }
}
