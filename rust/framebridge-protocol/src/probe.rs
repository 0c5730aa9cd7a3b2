use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlElement, Window};

use crate::CapabilityProbe;

/// Answers [`CapabilityProbe`] questions by feature-testing a browser window.
#[derive(Clone)]
pub struct WindowProbe {
    window: Window,
}

impl WindowProbe {
    /// Probe `window`.
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn global(&self, name: &str) -> bool {
        Reflect::get(&self.window, &JsValue::from_str(name))
            .map(|value| value.is_function())
            .unwrap_or(false)
    }
}

impl CapabilityProbe for WindowProbe {
    fn resize_observer(&self) -> bool {
        self.global("ResizeObserver")
    }

    fn mutation_observer(&self) -> bool {
        self.global("MutationObserver")
    }

    fn smooth_scroll(&self) -> bool {
        self.window
            .document()
            .and_then(|document| document.document_element())
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
            .map(|root| Reflect::has(&root.style(), &JsValue::from_str("scrollBehavior")).unwrap_or(false))
            .unwrap_or(false)
    }
}
