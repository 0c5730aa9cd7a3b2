//! Browser binding of the reporter, exported to JS as [`install_child`].

use std::{cell::RefCell, rc::Rc, time::Duration};

use framebridge_protocol::{
    ButtonClasses, Capabilities, EmbedId, HEIGHT_POLL_INTERVAL, ProtocolMessage, WindowProbe,
};
use js_sys::{Function, JSON};
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, Event, HtmlElement, MutationObserver, MutationObserverInit, ResizeObserver,
    Window,
};

use crate::{
    ChildDocument, ChildError, ContentMetrics, MessageSink, Reporter, Trigger, TriggerPlan,
    resolve_embed_id,
};

type SharedReporter = Rc<RefCell<Reporter<ParentSink>>>;

/// Start reporting to the parent window.
///
/// `baked_embed_id` is the id generated with the payload; a `ghlEmbedId`
/// query parameter on the page overrides it. `button_classes_json` is a JSON
/// array of trigger class names.
#[wasm_bindgen]
pub fn install_child(baked_embed_id: &str, button_classes_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    framebridge_protocol::console::init();

    let baked: EmbedId = baked_embed_id
        .parse()
        .map_err(|error| to_js(ChildError::Protocol(error)))?;
    let classes: ButtonClasses = serde_json::from_str(button_classes_json)
        .map_err(|error| to_js(ChildError::InvalidConfig(format!("{error}"))))?;

    let document = WebDocument::current().map_err(to_js)?;
    let search = document.window.location().search().unwrap_or_default();
    let embed_id = resolve_embed_id(&search, &baked);

    let capabilities = Capabilities::detect(&WindowProbe::new(document.window.clone()));
    let sink = ParentSink {
        window: document.window.clone(),
    };
    let reporter: SharedReporter = Rc::new(RefCell::new(Reporter::new(embed_id, classes, sink)));

    listen_for_clicks(&document, reporter.clone())?;

    let has_body = document.document.body().is_some();
    for trigger in TriggerPlan::for_document(&capabilities, has_body).iter() {
        install_trigger(&document, &reporter, *trigger)?;
    }

    Ok(())
}

fn to_js(error: ChildError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn listen_for_clicks(document: &WebDocument, reporter: SharedReporter) -> Result<(), JsValue> {
    let target_document = document.clone();
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event.target().and_then(|target| target.dyn_into::<Element>().ok()) else {
            return;
        };

        let Some(trigger) = reporter.borrow().click(&target_document, &target) else {
            return;
        };

        event.prevent_default();
        if let Some(trigger) = trigger.dyn_ref::<HtmlElement>() {
            let _ = trigger.blur();
        }
    });

    document
        .document
        .add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
    callback.forget();

    Ok(())
}

fn install_trigger(document: &WebDocument, reporter: &SharedReporter, trigger: Trigger) -> Result<(), JsValue> {
    match trigger {
        Trigger::Immediate => {
            reporter.borrow().report_height(document);
        }
        Trigger::AfterLoad(delay) => after_load(document, reporter.clone(), delay)?,
        Trigger::Poll(interval) => poll(document, reporter, interval)?,
        Trigger::SizeObserver => {
            let Some(body) = document.document.body() else {
                tracing::warn!("No <body> to observe, polling for size changes");
                return poll(document, reporter, HEIGHT_POLL_INTERVAL);
            };
            let callback = coalescing_callback(document, reporter);
            ResizeObserver::new(callback.as_ref().unchecked_ref())?.observe(&body);
            callback.forget();
        }
        Trigger::MutationObserver => {
            let Some(body) = document.document.body() else {
                tracing::debug!("No <body> to observe, skipping mutation observer");
                return Ok(());
            };
            let options = MutationObserverInit::new();
            options.set_child_list(true);
            options.set_subtree(true);
            options.set_attributes(true);

            let callback = coalescing_callback(document, reporter);
            MutationObserver::new(callback.as_ref().unchecked_ref())?
                .observe_with_options(&body, &options)?;
            callback.forget();
        }
    }

    Ok(())
}

fn poll(document: &WebDocument, reporter: &SharedReporter, interval: Duration) -> Result<(), JsValue> {
    let (polled, reporter) = (document.clone(), reporter.clone());
    let callback = Closure::<dyn FnMut()>::new(move || {
        reporter.borrow().report_height(&polled);
    });
    document.window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        millis(interval),
    )?;
    callback.forget();

    Ok(())
}

fn coalescing_callback(document: &WebDocument, reporter: &SharedReporter) -> Closure<dyn FnMut()> {
    let (document, reporter) = (document.clone(), reporter.clone());
    Closure::<dyn FnMut()>::new(move || request_report(&document, &reporter))
}

fn request_report(document: &WebDocument, reporter: &SharedReporter) {
    if !reporter.borrow_mut().request_report() {
        return;
    }

    let (frame_document, frame_reporter) = (document.clone(), reporter.clone());
    let flush = Closure::once_into_js(move || {
        frame_reporter.borrow_mut().flush(&frame_document);
    });

    if let Err(error) = document.window.request_animation_frame(flush.unchecked_ref::<Function>()) {
        tracing::warn!(?error, "Unable to schedule height report, reporting now");
        reporter.borrow_mut().flush(document);
    }
}

fn after_load(document: &WebDocument, reporter: SharedReporter, delay: Duration) -> Result<(), JsValue> {
    let window = document.window.clone();
    let loaded = document.clone();
    let settle = move || {
        let report = Closure::once_into_js(move || {
            reporter.borrow().report_height(&loaded);
        });
        if let Err(error) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            report.unchecked_ref(),
            millis(delay),
        ) {
            tracing::warn!(?error, "Unable to schedule post-load height report");
        }
    };

    if document.document.ready_state() == "complete" {
        settle();
        return Ok(());
    }

    let callback = Closure::once_into_js(settle);
    document
        .window
        .add_event_listener_with_callback("load", callback.unchecked_ref())
}

fn millis(duration: Duration) -> i32 {
    duration.as_millis().min(i32::MAX as u128) as i32
}

/// Posts to `window.parent` with target origin `*`.
pub struct ParentSink {
    window: Window,
}

impl MessageSink for ParentSink {
    fn post(&self, message: &ProtocolMessage) -> Result<(), ChildError> {
        let failed = |error: JsValue| ChildError::PostFailed(format!("{error:?}"));

        let payload = JSON::parse(&message.encode()?).map_err(failed)?;
        let parent = self
            .window
            .parent()
            .map_err(failed)?
            .ok_or_else(|| ChildError::PostFailed("no parent window".into()))?;

        parent.post_message(&payload, "*").map_err(failed)
    }
}

/// [`ChildDocument`] over the page's `window.document`.
#[derive(Clone)]
pub struct WebDocument {
    window: Window,
    document: Document,
}

impl WebDocument {
    /// The document of the current window.
    pub fn current() -> Result<Self, ChildError> {
        let window = web_sys::window()
            .ok_or_else(|| ChildError::InvalidConfig("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| ChildError::InvalidConfig("no document".into()))?;

        Ok(Self { window, document })
    }
}

impl ChildDocument for WebDocument {
    type Element = Element;

    fn metrics(&self) -> ContentMetrics {
        let body = self.document.body();
        let root = self
            .document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok());

        let scroll = |element: Option<&HtmlElement>| element.map_or(0.0, |e| f64::from(e.scroll_height()));
        let offset = |element: Option<&HtmlElement>| element.map_or(0.0, |e| f64::from(e.offset_height()));

        ContentMetrics {
            body_scroll: scroll(body.as_ref()),
            root_scroll: scroll(root.as_ref()),
            body_offset: offset(body.as_ref()),
            root_offset: offset(root.as_ref()),
        }
    }

    fn closest_with_class(&self, element: &Element, class: &str) -> Option<Element> {
        let mut current = Some(element.clone());
        while let Some(element) = current {
            if element.class_list().contains(class) {
                return Some(element);
            }
            current = element.parent_element();
        }
        None
    }
}
