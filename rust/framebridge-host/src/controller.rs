use framebridge_protocol::{
    Capabilities, EmbedConfig, Envelope, ProtocolMessage, Rejection, TrustBoundary,
};

use crate::{
    FrameSpec, HeightTracker, HostDocument, MountPhase, MountStep, RetryPolicy, stylesheet,
};

/// DOM handles and height the controller keeps between callbacks.
#[derive(Debug, Clone)]
pub struct MountState<N> {
    /// The embed container, once created or adopted
    pub container: Option<N>,
    /// The iframe inside the container
    pub iframe: Option<N>,
    /// The element the container is positioned against
    pub anchor: Option<N>,
    /// Applied iframe height
    pub height: HeightTracker,
}

impl<N> MountState<N> {
    fn new(min_height: f64) -> Self {
        Self {
            container: None,
            iframe: None,
            anchor: None,
            height: HeightTracker::new(min_height),
        }
    }
}

/// What handling an inbound message amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// The message did not pass the trust boundary
    Rejected(Rejection),
    /// The iframe was resized to this height
    Resized(f64),
    /// The report fell within the hysteresis band
    Unchanged,
    /// The page was asked to scroll to this offset
    Scrolled(f64),
    /// A scroll was requested but the document has no anchor to scroll to
    NoAnchor,
}

/// The host-page half of an embed.
///
/// One controller exists per installed embed id (see
/// [`registry`](crate::registry)). It is driven entirely by its binding:
/// [`Controller::mount`] once the document is ready and again whenever it
/// returns [`MountStep::RetryAfter`], and [`Controller::handle`] for every
/// `message` event the window receives.
pub struct Controller<D: HostDocument> {
    config: EmbedConfig,
    boundary: TrustBoundary,
    capabilities: Capabilities,
    retry: RetryPolicy,
    phase: MountPhase,
    state: Option<MountState<D::Node>>,
}

impl<D: HostDocument> Controller<D> {
    /// A controller for `config`, retrying mounts per [`RetryPolicy::default`].
    pub fn new(config: EmbedConfig, capabilities: Capabilities) -> Self {
        Self::with_retry_policy(config, capabilities, RetryPolicy::default())
    }

    /// A controller with an explicit retry policy.
    pub fn with_retry_policy(
        config: EmbedConfig,
        capabilities: Capabilities,
        retry: RetryPolicy,
    ) -> Self {
        let boundary = TrustBoundary::new(config.iframe_origin.clone(), config.embed_id.clone());

        Self {
            config,
            boundary,
            capabilities,
            retry,
            phase: MountPhase::Unmounted,
            state: None,
        }
    }

    /// The configuration this controller was built from.
    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    /// Current mount phase.
    pub fn phase(&self) -> MountPhase {
        self.phase
    }

    /// DOM handles and height, once the first mount attempt or message has
    /// created them.
    pub fn state(&self) -> Option<&MountState<D::Node>> {
        self.state.as_ref()
    }

    /// Height currently applied to the iframe.
    pub fn current_height(&self) -> f64 {
        self.state
            .as_ref()
            .map(|state| state.height.current())
            .unwrap_or_else(|| self.config.min_height_px())
    }

    fn state_mut(&mut self) -> &mut MountState<D::Node> {
        let min_height = self.config.min_height_px();
        self.state.get_or_insert_with(|| MountState::new(min_height))
    }

    /// Try to attach the embed container next to the anchor element.
    ///
    /// Safe to call repeatedly: once mounted (or given up) it only reports
    /// the settled outcome.
    pub fn mount(&mut self, document: &D) -> MountStep {
        match self.phase {
            MountPhase::Mounted => return MountStep::Mounted,
            MountPhase::GaveUp { .. } => return MountStep::GaveUp,
            _ => (),
        }

        self.ensure_style(document);
        let container = self.ensure_container(document);
        let anchor = self
            .resolve_anchor(document)
            .filter(|anchor| document.has_parent(anchor));

        let Some((container, anchor)) = container.zip(anchor) else {
            let attempts = match self.phase {
                MountPhase::Mounting { attempts } => attempts + 1,
                _ => 1,
            };

            if self.retry.allows(attempts) {
                tracing::warn!(
                    embed_id = %self.config.embed_id,
                    attempts,
                    "Unable to mount embed, retrying in {}ms",
                    self.retry.delay.as_millis()
                );
                self.phase = MountPhase::Mounting { attempts };
                return MountStep::RetryAfter(self.retry.delay);
            }

            tracing::warn!(
                embed_id = %self.config.embed_id,
                attempts,
                "Unable to mount embed, giving up"
            );
            self.phase = MountPhase::GaveUp { attempts };
            return MountStep::GaveUp;
        };

        document.insert(&container, &anchor, self.config.placement);
        self.phase = MountPhase::Mounted;

        tracing::debug!(
            embed_id = %self.config.embed_id,
            placement = %self.config.placement,
            "Mounted embed"
        );

        MountStep::Mounted
    }

    /// Validate and act on an inbound message.
    pub fn handle(&mut self, document: &D, envelope: &Envelope) -> Handled {
        let message = match self.boundary.admit(envelope) {
            Ok(message) => message,
            Err(rejection) => {
                tracing::debug!(
                    embed_id = %self.config.embed_id,
                    %rejection,
                    "Dropped inbound message"
                );
                return Handled::Rejected(rejection);
            }
        };

        match message {
            ProtocolMessage::HeightReport { height, .. } => self.apply_height(document, height),
            ProtocolMessage::ScrollRequest { .. } => self.scroll_to_anchor(document),
        }
    }

    fn apply_height(&mut self, document: &D, reported: f64) -> Handled {
        let state = self.state_mut();

        let Some(height) = state.height.observe(reported) else {
            return Handled::Unchanged;
        };

        if let Some(iframe) = &state.iframe {
            document.set_frame_height(iframe, height);
        }

        tracing::debug!(embed_id = %self.config.embed_id, height, "Resized embed");

        Handled::Resized(height)
    }

    fn scroll_to_anchor(&mut self, document: &D) -> Handled {
        let Some(anchor) = self.resolve_anchor(document) else {
            return Handled::NoAnchor;
        };

        let mut top = document.viewport_top(&anchor) + document.scroll_y();
        top += f64::from(self.config.scroll_offset);

        document.scroll_to(top, self.capabilities.scroll);

        Handled::Scrolled(top)
    }

    fn ensure_style(&self, document: &D) {
        let style_id = self.config.embed_id.style_id();

        if document.element_by_id(&style_id).is_none() {
            document.append_style(&style_id, &stylesheet(&self.config));
        }
    }

    fn ensure_container(&mut self, document: &D) -> Option<D::Node> {
        if let Some(container) = self.state.as_ref().and_then(|state| state.container.clone()) {
            return Some(container);
        }

        let spec = FrameSpec::for_config(&self.config);

        let (container, iframe) = match document.element_by_id(&spec.container_id) {
            Some(existing) => {
                document.set_placement(&existing, self.config.placement);
                let iframe = document.frame_in(&existing);
                (existing, iframe)
            }
            None => {
                let created = document.create_container(&spec)?;
                let iframe = document.frame_in(&created);
                (created, iframe)
            }
        };

        let min_height = self.config.min_height_px();
        let state = self.state_mut();
        state.container = Some(container.clone());
        state.iframe = iframe.clone();

        // A report may have arrived before the iframe existed.
        if let Some(iframe) = iframe {
            let height = state.height.current();
            if height != min_height {
                document.set_frame_height(&iframe, height);
            }
        }

        Some(container)
    }

    /// The anchor element, re-resolved whenever the previous one left the
    /// document. Falls back to `<body>` when the selector is invalid or
    /// matches nothing.
    fn resolve_anchor(&mut self, document: &D) -> Option<D::Node> {
        if let Some(anchor) = self.state.as_ref().and_then(|state| state.anchor.clone()) {
            if document.contains(&anchor) {
                return Some(anchor);
            }
        }

        let selector = self.config.form_selector.as_str();

        let candidate = match document.query_selector(selector) {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                tracing::warn!(
                    embed_id = %self.config.embed_id,
                    selector,
                    "Form selector not found, defaulting to document.body"
                );
                None
            }
            Err(error) => {
                tracing::warn!(
                    embed_id = %self.config.embed_id,
                    %error,
                    "Invalid form selector, defaulting to document.body"
                );
                None
            }
        };

        let anchor = candidate.or_else(|| document.body());
        self.state_mut().anchor = anchor.clone();
        anchor
    }
}
