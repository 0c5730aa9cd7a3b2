use std::time::Duration;

use framebridge_protocol::{DEFAULT_MAX_MOUNT_ATTEMPTS, MOUNT_RETRY_DELAY};

/// How long the controller keeps trying to attach the embed.
///
/// Attempts are spaced by a fixed delay. Once `max_attempts` attempts have
/// failed the controller stops and logs a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay between attempts
    pub delay: Duration,
    /// Failed attempts tolerated before giving up; `None` retries forever
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Retry every `delay`, without limit.
    pub fn unbounded(delay: Duration) -> Self {
        Self {
            delay,
            max_attempts: None,
        }
    }

    /// Whether another attempt may follow `failed` failed attempts.
    pub fn allows(&self, failed: u32) -> bool {
        self.max_attempts.is_none_or(|max| failed < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: MOUNT_RETRY_DELAY,
            max_attempts: Some(DEFAULT_MAX_MOUNT_ATTEMPTS),
        }
    }
}

/// Where the controller stands in attaching the embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPhase {
    /// No attempt yet
    #[default]
    Unmounted,
    /// At least one attempt failed and another is scheduled
    Mounting {
        /// Failed attempts so far
        attempts: u32,
    },
    /// The container is in the document
    Mounted,
    /// The retry policy is exhausted
    GaveUp {
        /// Failed attempts in total
        attempts: u32,
    },
}

impl MountPhase {
    /// Whether no further attempt will be made.
    pub fn is_settled(&self) -> bool {
        matches!(self, MountPhase::Mounted | MountPhase::GaveUp { .. })
    }
}

/// What the caller of [`Controller::mount`](crate::Controller::mount) should
/// do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStep {
    /// The embed is attached; nothing left to schedule
    Mounted,
    /// Call `mount` again after this delay
    RetryAfter(Duration),
    /// Stop trying
    GaveUp,
}
