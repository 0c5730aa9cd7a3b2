use framebridge_protocol::HYSTERESIS_PX;

/// Tracks the iframe height applied so far.
///
/// A reported height is floored at the configured minimum and only applied
/// when it differs from the current height by more than [`HYSTERESIS_PX`].
/// Sub-pixel layout noise on the embedded side therefore never resizes the
/// iframe, and a resize cannot feed back into an endless report loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightTracker {
    min: f64,
    current: f64,
}

impl HeightTracker {
    /// Start at the minimum height.
    pub fn new(min: f64) -> Self {
        Self { min, current: min }
    }

    /// The height last applied.
    pub fn current(&self) -> f64 {
        self.current
    }

    /// The configured floor.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Fold a reported height in. Returns the height to apply, or `None` when
    /// the change stays within the hysteresis band.
    pub fn observe(&mut self, reported: f64) -> Option<f64> {
        if !reported.is_finite() {
            return None;
        }

        let next = reported.max(self.min);

        if (next - self.current).abs() > HYSTERESIS_PX {
            self.current = next;
            Some(next)
        } else {
            None
        }
    }
}
