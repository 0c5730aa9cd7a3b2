use std::time::Duration;

use framebridge_protocol::{
    Capabilities, HEIGHT_POLL_INTERVAL, LOAD_SETTLE_DELAY, MutationObservation, SizeObservation,
};

/// An occasion on which the reporter re-measures the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Once, as soon as the reporter starts
    Immediate,
    /// Once, this long after the `load` event
    AfterLoad(Duration),
    /// Whenever a `ResizeObserver` on `<body>` fires; coalesced
    SizeObserver,
    /// On a fixed interval; reports directly
    Poll(Duration),
    /// Whenever a `MutationObserver` on `<body>` fires; coalesced
    MutationObserver,
}

impl Trigger {
    /// Whether reports from this trigger go through the
    /// [`ReportQueue`](crate::ReportQueue).
    pub fn is_coalesced(&self) -> bool {
        matches!(self, Trigger::SizeObserver | Trigger::MutationObserver)
    }
}

/// The set of triggers a reporter installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPlan(Vec<Trigger>);

impl TriggerPlan {
    /// Triggers available with the given capabilities, for a document that
    /// has a `<body>`.
    pub fn for_capabilities(capabilities: &Capabilities) -> Self {
        Self::for_document(capabilities, true)
    }

    /// Triggers available with the given capabilities. Observers need a
    /// `<body>` to watch; without one the plan polls instead.
    pub fn for_document(capabilities: &Capabilities, has_body: bool) -> Self {
        let mut triggers = vec![Trigger::Immediate, Trigger::AfterLoad(LOAD_SETTLE_DELAY)];

        triggers.push(match capabilities.size {
            SizeObservation::Observer if has_body => Trigger::SizeObserver,
            SizeObservation::Observer => Trigger::Poll(HEIGHT_POLL_INTERVAL),
            SizeObservation::Polling { interval } => Trigger::Poll(interval),
        });

        if has_body && capabilities.mutation == MutationObservation::Observer {
            triggers.push(Trigger::MutationObserver);
        }

        Self(triggers)
    }

    /// The planned triggers.
    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.0.iter()
    }
}
