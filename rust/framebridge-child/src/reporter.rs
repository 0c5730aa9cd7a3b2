use framebridge_protocol::{ButtonClasses, EmbedId, ProtocolMessage, normalize_class};

use crate::{ChildError, ContentMetrics, ReportQueue};

/// The parts of the embedded document the reporter reads.
pub trait ChildDocument {
    /// A handle to an element of the document
    type Element: Clone;

    /// Current height metrics.
    fn metrics(&self) -> ContentMetrics;

    /// `element` or its closest ancestor carrying `class`.
    fn closest_with_class(&self, element: &Self::Element, class: &str) -> Option<Self::Element>;
}

/// Where outbound messages go. In the browser this is `window.parent`.
pub trait MessageSink {
    /// Hand a message to the transport.
    fn post(&self, message: &ProtocolMessage) -> Result<(), ChildError>;
}

/// The trigger element a click landed on, if any.
///
/// Classes are tried in configured order and the first one with a match wins,
/// even when a later class matches an element closer to the target. Classes
/// are normalized again and empty ones skipped.
pub fn find_trigger<D: ChildDocument>(
    document: &D,
    target: &D::Element,
    classes: &ButtonClasses,
) -> Option<D::Element> {
    classes
        .iter()
        .filter_map(normalize_class)
        .find_map(|class| document.closest_with_class(target, class))
}

/// The embedded half of an embed: reports heights and scroll requests for
/// one embed id.
pub struct Reporter<S> {
    embed_id: EmbedId,
    classes: ButtonClasses,
    sink: S,
    queue: ReportQueue,
}

impl<S: MessageSink> Reporter<S> {
    /// A reporter posting to `sink`.
    pub fn new(embed_id: EmbedId, classes: ButtonClasses, sink: S) -> Self {
        Self {
            embed_id,
            classes,
            sink,
            queue: ReportQueue::default(),
        }
    }

    /// The embed id stamped on every message.
    pub fn embed_id(&self) -> &EmbedId {
        &self.embed_id
    }

    /// The trigger classes.
    pub fn classes(&self) -> &ButtonClasses {
        &self.classes
    }

    /// The sink messages are posted to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Measure the document and report its height now.
    pub fn report_height<D: ChildDocument>(&self, document: &D) -> f64 {
        let height = document.metrics().content_height();

        self.send(ProtocolMessage::HeightReport {
            embed_id: self.embed_id.clone(),
            height,
        });

        height
    }

    /// Note that the height may have changed. Returns `true` when the caller
    /// must schedule [`Reporter::flush`] for the next animation frame.
    pub fn request_report(&mut self) -> bool {
        self.queue.request()
    }

    /// Send the pending report, if any.
    pub fn flush<D: ChildDocument>(&mut self, document: &D) -> Option<f64> {
        self.queue.take().then(|| self.report_height(document))
    }

    /// Handle a click on `target`. When it landed on a trigger, a scroll
    /// request is sent and the trigger is returned so the caller can
    /// suppress the default action and drop focus.
    pub fn click<D: ChildDocument>(&self, document: &D, target: &D::Element) -> Option<D::Element> {
        let trigger = find_trigger(document, target, &self.classes)?;

        self.send(ProtocolMessage::ScrollRequest {
            embed_id: self.embed_id.clone(),
        });

        Some(trigger)
    }

    fn send(&self, message: ProtocolMessage) {
        if let Err(error) = self.sink.post(&message) {
            tracing::warn!(
                embed_id = %self.embed_id,
                kind = message.kind(),
                %error,
                "Unable to post message"
            );
        }
    }
}
