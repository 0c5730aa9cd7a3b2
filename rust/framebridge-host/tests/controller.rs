use std::{
    cell::{Cell, RefCell},
    time::Duration,
};

use anyhow::Result;
use framebridge_host::{
    Controller, FrameSpec, Handled, HostDocument, InvalidSelector, MountPhase, MountStep,
    RetryPolicy,
};
use framebridge_protocol::{
    ButtonClasses, Capabilities, EmbedConfig, EmbedId, Envelope, Origin, Placement, RawHeight,
    RawMessage, Rejection, ScrollStrategy,
};
use pretty_assertions::assert_eq;
use url::Url;

#[cfg(all(target_arch = "wasm32", target_os = "unknown"))]
use wasm_bindgen_test::wasm_bindgen_test;

const ORIGIN: &str = "https://forms.example.com";

#[derive(Debug, Clone, Default)]
struct Node {
    tag: &'static str,
    id: Option<String>,
    placement: Option<Placement>,
    parent: Option<usize>,
    children: Vec<usize>,
    height: Option<f64>,
    top: f64,
}

/// A small DOM: `<html>` (node 0) holding `<body>` (node 1).
struct FakeDocument {
    nodes: RefCell<Vec<Node>>,
    styles: RefCell<Vec<(String, String)>>,
    scrolls: RefCell<Vec<(f64, ScrollStrategy)>>,
    scroll_y: Cell<f64>,
    has_body: bool,
}

impl FakeDocument {
    fn new() -> Self {
        let document = Self {
            nodes: RefCell::new(vec![Node {
                tag: "html",
                ..Node::default()
            }]),
            styles: RefCell::default(),
            scrolls: RefCell::default(),
            scroll_y: Cell::new(0.0),
            has_body: true,
        };
        document.append(0, "body", None);
        document
    }

    fn without_body() -> Self {
        Self {
            has_body: false,
            ..Self::new()
        }
    }

    fn push(&self, tag: &'static str, id: Option<&str>) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node {
            tag,
            id: id.map(str::to_owned),
            ..Node::default()
        });
        nodes.len() - 1
    }

    fn append(&self, parent: usize, tag: &'static str, id: Option<&str>) -> usize {
        let node = self.push(tag, id);
        let mut nodes = self.nodes.borrow_mut();
        nodes[node].parent = Some(parent);
        nodes[parent].children.push(node);
        node
    }

    fn detach(&self, node: usize) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node].parent.take() {
            nodes[parent].children.retain(|child| *child != node);
        }
    }

    fn set_top(&self, node: usize, top: f64) {
        self.nodes.borrow_mut()[node].top = top;
    }

    fn children(&self, node: usize) -> Vec<usize> {
        self.nodes.borrow()[node].children.clone()
    }

    fn node(&self, node: usize) -> Node {
        self.nodes.borrow()[node].clone()
    }

    fn attached(&self, mut node: usize) -> bool {
        let nodes = self.nodes.borrow();
        loop {
            if node == 0 {
                return true;
            }
            match nodes[node].parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    fn find(&self, predicate: impl Fn(&Node) -> bool) -> Option<usize> {
        let count = self.nodes.borrow().len();
        (0..count).find(|index| self.attached(*index) && predicate(&self.nodes.borrow()[*index]))
    }
}

impl HostDocument for FakeDocument {
    type Node = usize;

    fn query_selector(&self, selector: &str) -> Result<Option<usize>, InvalidSelector> {
        if let Some(id) = selector.strip_prefix('#') {
            return Ok(self.find(|node| node.id.as_deref() == Some(id)));
        }

        if !selector.is_empty() && selector.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Ok(self.find(|node| node.tag == selector));
        }

        Err(InvalidSelector {
            selector: selector.to_owned(),
        })
    }

    fn body(&self) -> Option<usize> {
        self.has_body.then_some(1)
    }

    fn contains(&self, node: &usize) -> bool {
        self.attached(*node)
    }

    fn has_parent(&self, node: &usize) -> bool {
        self.nodes.borrow()[*node].parent.is_some()
    }

    fn element_by_id(&self, id: &str) -> Option<usize> {
        if self.styles.borrow().iter().any(|(style, _)| style == id) {
            // Styles live outside the node tree; report them as present.
            return Some(0);
        }
        self.find(|node| node.id.as_deref() == Some(id))
    }

    fn append_style(&self, id: &str, css: &str) {
        self.styles.borrow_mut().push((id.to_owned(), css.to_owned()));
    }

    fn create_container(&self, frame: &FrameSpec) -> Option<usize> {
        let container = self.push("div", Some(&frame.container_id));
        self.nodes.borrow_mut()[container].placement = Some(frame.placement);
        let iframe = self.push("iframe", Some(&frame.frame_id));

        let mut nodes = self.nodes.borrow_mut();
        nodes[iframe].parent = Some(container);
        nodes[iframe].height = Some(f64::from(frame.height));
        nodes[container].children.push(iframe);
        Some(container)
    }

    fn frame_in(&self, container: &usize) -> Option<usize> {
        let nodes = self.nodes.borrow();
        nodes[*container]
            .children
            .iter()
            .copied()
            .find(|child| nodes[*child].tag == "iframe")
    }

    fn set_placement(&self, container: &usize, placement: Placement) {
        self.nodes.borrow_mut()[*container].placement = Some(placement);
    }

    fn insert(&self, container: &usize, anchor: &usize, placement: Placement) {
        self.detach(*container);

        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[*anchor].parent else {
            return;
        };
        let Some(position) = nodes[parent].children.iter().position(|c| c == anchor) else {
            return;
        };
        let position = match placement {
            Placement::Above => position,
            Placement::Below => position + 1,
        };

        nodes[parent].children.insert(position, *container);
        nodes[*container].parent = Some(parent);
    }

    fn set_frame_height(&self, frame: &usize, height: f64) {
        self.nodes.borrow_mut()[*frame].height = Some(height);
    }

    fn viewport_top(&self, node: &usize) -> f64 {
        self.nodes.borrow()[*node].top
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64, strategy: ScrollStrategy) {
        self.scrolls.borrow_mut().push((top, strategy));
    }
}

fn config(selector: &str, placement: Placement, min_height: u32, scroll_offset: i32) -> Result<EmbedConfig> {
    let embed_id = EmbedId::from_token("01TESTEMBED")?;
    let iframe_src = Url::parse(&format!("{ORIGIN}/form?ghlEmbedId={embed_id}"))?;

    Ok(EmbedConfig {
        embed_id,
        iframe_origin: Origin::of(&iframe_src),
        iframe_src,
        form_selector: selector.to_owned(),
        placement,
        min_height,
        scroll_offset,
        button_classes: ButtonClasses::parse("cta"),
    })
}

fn height(embed_id: &str, height: RawHeight) -> Envelope {
    Envelope::new(
        ORIGIN,
        RawMessage {
            kind: Some("ghl-height".into()),
            embed_id: Some(embed_id.into()),
            height: Some(height),
        },
    )
}

fn scroll(embed_id: &str) -> Envelope {
    Envelope::new(
        ORIGIN,
        RawMessage {
            kind: Some("ghl-scroll-request".into()),
            embed_id: Some(embed_id.into()),
            height: None,
        },
    )
}

fn frame_height(document: &FakeDocument, controller: &Controller<FakeDocument>) -> Option<f64> {
    let iframe = controller.state()?.iframe?;
    document.node(iframe).height
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_mounts_above_the_anchor() -> Result<()> {
    let document = FakeDocument::new();
    let form = document.append(1, "form", Some("signup"));

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());

    assert_eq!(controller.mount(&document), MountStep::Mounted);
    assert_eq!(controller.phase(), MountPhase::Mounted);

    let container = controller.state().and_then(|state| state.container).unwrap();
    assert_eq!(document.children(1), vec![container, form]);
    assert_eq!(document.node(container).id.as_deref(), Some("ghlEmbed_01TESTEMBED"));
    assert_eq!(document.node(container).placement, Some(Placement::Above));
    assert_eq!(frame_height(&document, &controller), Some(600.0));

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_mounts_below_the_anchor() -> Result<()> {
    let document = FakeDocument::new();
    let header = document.append(1, "header", None);
    let form = document.append(1, "form", Some("signup"));
    let footer = document.append(1, "footer", None);

    let mut controller = Controller::new(config("#signup", Placement::Below, 600, 0)?, Capabilities::full());

    assert_eq!(controller.mount(&document), MountStep::Mounted);

    let container = controller.state().and_then(|state| state.container).unwrap();
    assert_eq!(document.children(1), vec![header, form, container, footer]);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_injects_styles_once() -> Result<()> {
    let document = FakeDocument::new();
    let config = config("#signup", Placement::Above, 600, 0)?;

    let mut first = Controller::new(config.clone(), Capabilities::full());
    let mut second = Controller::new(config, Capabilities::full());
    first.mount(&document);
    second.mount(&document);

    let styles = document.styles.borrow();
    assert_eq!(styles.len(), 1);
    assert_eq!(styles[0].0, "ghlEmbed_01TESTEMBED-style");

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_falls_back_to_body_when_nothing_matches() -> Result<()> {
    let document = FakeDocument::new();

    let mut controller = Controller::new(config("#missing", Placement::Above, 600, 0)?, Capabilities::full());

    assert_eq!(controller.mount(&document), MountStep::Mounted);
    assert_eq!(controller.state().and_then(|state| state.anchor), Some(1));

    let container = controller.state().and_then(|state| state.container).unwrap();
    assert_eq!(document.children(0), vec![container, 1]);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_falls_back_to_body_on_an_invalid_selector() -> Result<()> {
    let document = FakeDocument::new();

    let mut controller = Controller::new(config("[[nope", Placement::Below, 600, 0)?, Capabilities::full());

    assert_eq!(controller.mount(&document), MountStep::Mounted);
    assert_eq!(controller.state().and_then(|state| state.anchor), Some(1));

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_retries_until_the_document_is_ready() -> Result<()> {
    let document = FakeDocument::without_body();

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());

    assert_eq!(
        controller.mount(&document),
        MountStep::RetryAfter(Duration::from_millis(750))
    );
    assert_eq!(controller.phase(), MountPhase::Mounting { attempts: 1 });

    assert_eq!(
        controller.mount(&document),
        MountStep::RetryAfter(Duration::from_millis(750))
    );
    assert_eq!(controller.phase(), MountPhase::Mounting { attempts: 2 });

    let form = document.append(1, "form", Some("signup"));
    // The form is now attached under a body the document does not report;
    // it still has a parent to insert next to.
    assert_eq!(controller.mount(&document), MountStep::Mounted);
    assert_eq!(controller.state().and_then(|state| state.anchor), Some(form));

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_gives_up_once_the_retry_policy_is_exhausted() -> Result<()> {
    let document = FakeDocument::without_body();
    let policy = RetryPolicy {
        delay: Duration::from_millis(10),
        max_attempts: Some(3),
    };

    let mut controller = Controller::with_retry_policy(
        config("#signup", Placement::Above, 600, 0)?,
        Capabilities::full(),
        policy,
    );

    assert_eq!(controller.mount(&document), MountStep::RetryAfter(policy.delay));
    assert_eq!(controller.mount(&document), MountStep::RetryAfter(policy.delay));
    assert_eq!(controller.mount(&document), MountStep::GaveUp);
    assert_eq!(controller.phase(), MountPhase::GaveUp { attempts: 3 });

    document.append(1, "form", Some("signup"));
    assert_eq!(controller.mount(&document), MountStep::GaveUp);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_reuses_an_existing_container() -> Result<()> {
    let document = FakeDocument::new();
    let form = document.append(1, "form", Some("signup"));
    let existing = document.append(1, "div", Some("ghlEmbed_01TESTEMBED"));
    let iframe = document.append(existing, "iframe", Some("ghlEmbed_01TESTEMBED-frame"));

    let mut controller = Controller::new(config("#signup", Placement::Below, 600, 0)?, Capabilities::full());

    assert_eq!(controller.mount(&document), MountStep::Mounted);

    let state = controller.state().unwrap();
    assert_eq!(state.container, Some(existing));
    assert_eq!(state.iframe, Some(iframe));
    assert_eq!(document.children(1), vec![form, existing]);
    assert_eq!(document.node(existing).placement, Some(Placement::Below));

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_converges_with_hysteresis() -> Result<()> {
    let document = FakeDocument::new();
    document.append(1, "form", Some("signup"));

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());
    controller.mount(&document);

    let embed_id = "ghlEmbed_01TESTEMBED";

    assert_eq!(controller.handle(&document, &height(embed_id, RawHeight::Number(600.0))), Handled::Unchanged);
    assert_eq!(controller.handle(&document, &height(embed_id, RawHeight::Number(601.0))), Handled::Unchanged);
    assert_eq!(controller.handle(&document, &height(embed_id, RawHeight::Number(602.0))), Handled::Unchanged);
    assert_eq!(frame_height(&document, &controller), Some(600.0));

    assert_eq!(
        controller.handle(&document, &height(embed_id, RawHeight::Number(750.0))),
        Handled::Resized(750.0)
    );
    assert_eq!(frame_height(&document, &controller), Some(750.0));

    assert_eq!(
        controller.handle(&document, &height(embed_id, RawHeight::Number(100.0))),
        Handled::Resized(600.0)
    );
    assert_eq!(controller.current_height(), 600.0);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_coerces_textual_heights() -> Result<()> {
    let document = FakeDocument::new();
    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());
    controller.mount(&document);

    let embed_id = "ghlEmbed_01TESTEMBED";

    assert_eq!(
        controller.handle(&document, &height(embed_id, RawHeight::Text(" 812 ".into()))),
        Handled::Resized(812.0)
    );
    assert_eq!(
        controller.handle(&document, &height(embed_id, RawHeight::Text("tall".into()))),
        Handled::Rejected(Rejection::NonFiniteHeight)
    );
    assert_eq!(controller.current_height(), 812.0);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_applies_reports_that_arrive_before_the_mount() -> Result<()> {
    let document = FakeDocument::new();
    document.append(1, "form", Some("signup"));

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());

    assert_eq!(
        controller.handle(&document, &height("ghlEmbed_01TESTEMBED", RawHeight::Number(900.0))),
        Handled::Resized(900.0)
    );

    controller.mount(&document);
    assert_eq!(frame_height(&document, &controller), Some(900.0));

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_ignores_foreign_messages() -> Result<()> {
    let document = FakeDocument::new();
    document.append(1, "form", Some("signup"));

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());
    controller.mount(&document);

    let mut foreign_origin = height("ghlEmbed_01TESTEMBED", RawHeight::Number(1200.0));
    foreign_origin.origin = "https://attacker.example".into();

    assert_eq!(
        controller.handle(&document, &foreign_origin),
        Handled::Rejected(Rejection::ForeignOrigin {
            origin: "https://attacker.example".into()
        })
    );

    let foreign_embed = height("ghlEmbed_SOMEONEELSE", RawHeight::Number(1200.0));
    assert_eq!(
        controller.handle(&document, &foreign_embed),
        Handled::Rejected(Rejection::ForeignEmbed {
            embed_id: Some("ghlEmbed_SOMEONEELSE".into())
        })
    );

    let mut foreign_scroll = scroll("ghlEmbed_01TESTEMBED");
    foreign_scroll.origin = "https://forms.example.com:8443".into();
    assert!(matches!(
        controller.handle(&document, &foreign_scroll),
        Handled::Rejected(Rejection::ForeignOrigin { .. })
    ));

    assert_eq!(controller.current_height(), 600.0);
    assert_eq!(frame_height(&document, &controller), Some(600.0));
    assert!(document.scrolls.borrow().is_empty());

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_resizes_and_scrolls_below_a_signup_form() -> Result<()> {
    let document = FakeDocument::new();
    let form = document.append(1, "form", Some("signup"));
    document.set_top(form, 150.0);
    document.scroll_y.set(400.0);

    let mut controller = Controller::new(config("#signup", Placement::Below, 600, 20)?, Capabilities::full());
    controller.mount(&document);

    let embed_id = "ghlEmbed_01TESTEMBED";

    assert_eq!(
        controller.handle(&document, &height(embed_id, RawHeight::Number(900.0))),
        Handled::Resized(900.0)
    );
    assert_eq!(frame_height(&document, &controller), Some(900.0));

    assert_eq!(controller.handle(&document, &scroll(embed_id)), Handled::Scrolled(570.0));
    assert_eq!(*document.scrolls.borrow(), vec![(570.0, ScrollStrategy::Smooth)]);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_scrolls_instantly_without_smooth_scrolling() -> Result<()> {
    let document = FakeDocument::new();
    let form = document.append(1, "form", Some("signup"));
    document.set_top(form, 80.0);

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, -10)?, Capabilities::minimal());
    controller.mount(&document);

    controller.handle(&document, &scroll("ghlEmbed_01TESTEMBED"));
    assert_eq!(*document.scrolls.borrow(), vec![(70.0, ScrollStrategy::Instant)]);

    Ok(())
}

#[cfg_attr(all(target_arch = "wasm32", target_os = "unknown"), wasm_bindgen_test)]
#[cfg_attr(not(all(target_arch = "wasm32", target_os = "unknown")), test_log::test)]
fn it_re_resolves_a_detached_anchor() -> Result<()> {
    let document = FakeDocument::new();
    let original = document.append(1, "form", Some("signup"));
    document.set_top(original, 100.0);

    let mut controller = Controller::new(config("#signup", Placement::Above, 600, 0)?, Capabilities::full());
    controller.mount(&document);

    document.detach(original);
    let replacement = document.append(1, "form", Some("signup"));
    document.set_top(replacement, 300.0);

    assert_eq!(
        controller.handle(&document, &scroll("ghlEmbed_01TESTEMBED")),
        Handled::Scrolled(300.0)
    );
    assert_eq!(controller.state().and_then(|state| state.anchor), Some(replacement));

    Ok(())
}
