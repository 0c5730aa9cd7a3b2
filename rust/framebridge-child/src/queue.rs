/// Coalesces bursts of change notifications into a single height report.
///
/// At most one report is pending at a time. Observers call
/// [`ReportQueue::request`] on every notification; only the first call of a
/// burst returns `true`, telling the caller to schedule a flush for the next
/// animation frame. The flush calls [`ReportQueue::take`] and reports.
#[derive(Debug, Default)]
pub struct ReportQueue {
    pending: bool,
}

impl ReportQueue {
    /// Record that the height may have changed. Returns `true` when a flush
    /// needs to be scheduled.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Clear the pending report. Returns whether one was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Whether a report is waiting for its flush.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
