use framebridge_protocol::{EmbedConfig, Placement, ScrollStrategy};

use crate::InvalidSelector;

/// What the host document needs to build the embed container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSpec {
    /// Id of the container element
    pub container_id: String,
    /// Id of the iframe element
    pub frame_id: String,
    /// Iframe `src`
    pub src: String,
    /// Iframe `title`, announced by assistive technology
    pub title: String,
    /// Initial inline height of the iframe, in pixels
    pub height: u32,
    /// Value of the container's `data-placement` attribute
    pub placement: Placement,
}

impl FrameSpec {
    /// The container for an embed configuration.
    pub fn for_config(config: &EmbedConfig) -> Self {
        Self {
            container_id: config.embed_id.container_id(),
            frame_id: config.embed_id.frame_id(),
            src: config.iframe_src.to_string(),
            title: "Embedded form".into(),
            height: config.min_height,
            placement: config.placement,
        }
    }
}

/// The DOM operations the host controller performs.
///
/// Implemented over `web_sys` for the browser and by in-memory documents in
/// tests. Methods take `&self`: a document is a handle onto shared, mutable
/// page state, the way DOM bindings are.
///
/// A newly created container is expected to look like:
///
/// ```html
/// <div id="{container_id}" data-placement="{placement}">
///   <iframe id="{frame_id}" src="{src}" title="{title}" loading="lazy"
///           scrolling="no" allowtransparency="true"
///           style="height: {height}px"></iframe>
/// </div>
/// ```
pub trait HostDocument {
    /// A handle to an element of the document
    type Node: Clone;

    /// First element matching `selector`.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>, InvalidSelector>;

    /// The `<body>` element, if the document has one yet.
    fn body(&self) -> Option<Self::Node>;

    /// Whether `node` is attached to this document.
    fn contains(&self, node: &Self::Node) -> bool;

    /// Whether `node` has a parent it can be inserted next to.
    fn has_parent(&self, node: &Self::Node) -> bool;

    /// Element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Append a `<style>` element with the given id and rules to `<head>`.
    fn append_style(&self, id: &str, css: &str);

    /// Create a detached container holding the iframe described by `frame`,
    /// or `None` when the document refuses to build it.
    fn create_container(&self, frame: &FrameSpec) -> Option<Self::Node>;

    /// The iframe inside an existing container.
    fn frame_in(&self, container: &Self::Node) -> Option<Self::Node>;

    /// Set the container's `data-placement` attribute.
    fn set_placement(&self, container: &Self::Node, placement: Placement);

    /// Insert `container` immediately before or after `anchor`.
    fn insert(&self, container: &Self::Node, anchor: &Self::Node, placement: Placement);

    /// Set the inline height of the iframe, in pixels.
    fn set_frame_height(&self, frame: &Self::Node, height: f64);

    /// Top edge of `node` relative to the viewport.
    fn viewport_top(&self, node: &Self::Node) -> f64;

    /// Current vertical scroll offset of the page.
    fn scroll_y(&self) -> f64;

    /// Scroll the page so that `top` is at the top of the viewport.
    fn scroll_to(&self, top: f64, strategy: ScrollStrategy);
}
