/// Height metrics of the embedded document.
///
/// Depending on the box model, content may register in only some of these,
/// so the reported height is the largest of the four.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentMetrics {
    /// `document.body.scrollHeight`
    pub body_scroll: f64,
    /// `document.documentElement.scrollHeight`
    pub root_scroll: f64,
    /// `document.body.offsetHeight`
    pub body_offset: f64,
    /// `document.documentElement.offsetHeight`
    pub root_offset: f64,
}

impl ContentMetrics {
    /// The height to report.
    pub fn content_height(&self) -> f64 {
        [self.root_scroll, self.body_offset, self.root_offset]
            .into_iter()
            .fold(self.body_scroll, f64::max)
    }
}
