//! Browser binding of the host controller.
//!
//! Compiled to WASM and exported to JS as [`install_host`]. The binding owns
//! everything the [`Controller`] deliberately does not: reading the
//! configuration, registering the `message` listener, waiting for the
//! document to be parsed and scheduling mount retries with `setTimeout`.
//!
//! ```js
//! import init, { install_host } from "./framebridge_host.js";
//! await init();
//! install_host(JSON.stringify(config));
//! ```

use std::{cell::RefCell, rc::Rc, time::Duration};

use framebridge_protocol::{
    Capabilities, EmbedConfig, Envelope, Placement, RawHeight, RawMessage, ScrollStrategy,
    WindowProbe,
};
use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, MessageEvent, ScrollBehavior, ScrollToOptions, Window};

use crate::{
    Controller, FrameSpec, HostDocument, HostError, InvalidSelector, MountStep, registry,
};

type SharedController = Rc<RefCell<Controller<WebDocument>>>;

/// Install the host controller for a serialized [`EmbedConfig`].
///
/// Installing an embed id that is already installed on this page does
/// nothing and succeeds.
#[wasm_bindgen]
pub fn install_host(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    framebridge_protocol::console::init();

    let config: EmbedConfig = serde_json::from_str(config_json)
        .map_err(|error| HostError::InvalidConfig(format!("{error}")))
        .map_err(to_js)?;

    let embed_id = config.embed_id.clone();
    if registry::install_with(&embed_id, || start(config))?.is_none() {
        tracing::debug!(%embed_id, "Embed already installed, skipping");
    }

    Ok(())
}

fn start(config: EmbedConfig) -> Result<(), JsValue> {
    let document = WebDocument::current().map_err(to_js)?;
    let capabilities = Capabilities::detect(&WindowProbe::new(document.window.clone()));
    let controller: SharedController = Rc::new(RefCell::new(Controller::new(config, capabilities)));

    listen_for_messages(&document, controller.clone())?;
    when_ready(&document, move |document| mount(document, controller))?;

    Ok(())
}

fn to_js(error: HostError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn listen_for_messages(document: &WebDocument, controller: SharedController) -> Result<(), JsValue> {
    let target = document.clone();
    let callback = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let envelope = Envelope::new(event.origin(), raw_message(&event.data()));
        controller.borrow_mut().handle(&target, &envelope);
    });

    document
        .window
        .add_event_listener_with_callback("message", callback.as_ref().unchecked_ref())?;

    // The listener lives as long as the page.
    callback.forget();
    Ok(())
}

/// Read the protocol fields off whatever was posted. Non-object payloads
/// yield an empty message, which the trust boundary rejects.
fn raw_message(data: &JsValue) -> RawMessage {
    if !data.is_object() {
        return RawMessage::default();
    }

    let field = |name: &str| Reflect::get(data, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED);

    let height = field("height");
    let height = if let Some(number) = height.as_f64() {
        Some(RawHeight::Number(number))
    } else {
        height.as_string().map(RawHeight::Text)
    };

    RawMessage {
        kind: field("type").as_string(),
        embed_id: field("embedId").as_string(),
        height,
    }
}

fn when_ready<F>(document: &WebDocument, run: F) -> Result<(), JsValue>
where
    F: FnOnce(WebDocument) + 'static,
{
    if document.document.ready_state() != "loading" {
        run(document.clone());
        return Ok(());
    }

    let ready = document.clone();
    let callback = Closure::once_into_js(move || run(ready));
    document
        .document
        .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
}

fn mount(document: WebDocument, controller: SharedController) {
    let step = controller.borrow_mut().mount(&document);

    if let MountStep::RetryAfter(delay) = step {
        if let Err(error) = schedule(&document.window, delay, move || mount(document, controller)) {
            tracing::warn!(?error, "Unable to schedule mount retry");
        }
    }
}

fn schedule<F>(window: &Window, delay: Duration, task: F) -> Result<i32, JsValue>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(task);
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay.as_millis().min(i32::MAX as u128) as i32,
    )
}

/// [`HostDocument`] over the page's `window.document`.
#[derive(Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// The document of the current window.
    pub fn current() -> Result<Self, HostError> {
        let window = web_sys::window()
            .ok_or_else(|| HostError::DocumentUnavailable("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::DocumentUnavailable("no document".into()))?;

        Ok(Self { window, document })
    }
}

impl HostDocument for WebDocument {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Result<Option<Element>, InvalidSelector> {
        self.document
            .query_selector(selector)
            .map_err(|_| InvalidSelector {
                selector: selector.to_owned(),
            })
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn contains(&self, node: &Element) -> bool {
        self.document.contains(Some(node.as_ref()))
    }

    fn has_parent(&self, node: &Element) -> bool {
        node.parent_node().is_some()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn append_style(&self, id: &str, css: &str) {
        let appended = self.document.create_element("style").and_then(|style| {
            style.set_id(id);
            style.set_text_content(Some(css));
            match self.document.head() {
                Some(head) => head.append_child(&style).map(|_| ()),
                None => Err(JsValue::from_str("document has no <head>")),
            }
        });

        if let Err(error) = appended {
            tracing::warn!(?error, "Unable to inject embed styles");
        }
    }

    fn create_container(&self, frame: &FrameSpec) -> Option<Element> {
        build_container(&self.document, frame)
            .inspect_err(|error| tracing::warn!(?error, "Unable to build embed container"))
            .ok()
    }

    fn frame_in(&self, container: &Element) -> Option<Element> {
        container.query_selector("iframe").ok().flatten()
    }

    fn set_placement(&self, container: &Element, placement: Placement) {
        let _ = container.set_attribute("data-placement", placement.as_str());
    }

    fn insert(&self, container: &Element, anchor: &Element, placement: Placement) {
        let Some(parent) = anchor.parent_node() else {
            return;
        };

        let reference = match placement {
            Placement::Above => Some(anchor.clone().into()),
            Placement::Below => anchor.next_sibling(),
        };

        if let Err(error) = parent.insert_before(container, reference.as_ref()) {
            tracing::warn!(?error, "Unable to insert embed container");
        }
    }

    fn set_frame_height(&self, frame: &Element, height: f64) {
        if let Some(frame) = frame.dyn_ref::<HtmlElement>() {
            let _ = frame.style().set_property("height", &format!("{height}px"));
        }
    }

    fn viewport_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top()
    }

    fn scroll_y(&self) -> f64 {
        self.window
            .scroll_y()
            .ok()
            .or_else(|| {
                self.document
                    .document_element()
                    .map(|root| f64::from(root.scroll_top()))
            })
            .unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64, strategy: ScrollStrategy) {
        match strategy {
            ScrollStrategy::Smooth => {
                let options = ScrollToOptions::new();
                options.set_top(top);
                options.set_left(0.0);
                options.set_behavior(ScrollBehavior::Smooth);
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            ScrollStrategy::Instant => self.window.scroll_to_with_x_and_y(0.0, top),
        }
    }
}

fn build_container(document: &Document, frame: &FrameSpec) -> Result<Element, JsValue> {
    let container = document.create_element("div")?;
    container.set_id(&frame.container_id);
    container.set_attribute("data-placement", frame.placement.as_str())?;

    let iframe = document.create_element("iframe")?;
    iframe.set_id(&frame.frame_id);
    iframe.set_attribute("src", &frame.src)?;
    iframe.set_attribute("title", &frame.title)?;
    iframe.set_attribute("loading", "lazy")?;
    iframe.set_attribute("scrolling", "no")?;
    iframe.set_attribute("allowtransparency", "true")?;
    iframe.set_attribute("style", &format!("height:{}px", frame.height))?;

    container.append_child(&iframe)?;
    Ok(container)
}
