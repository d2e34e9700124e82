//! The DOM capability interface behaviors are written against.
//!
//! Implementations wrap a real browser document (jQuery-style selection,
//! class and style mutation, event binding, `IntersectionObserver`, timers)
//! or, in tests, the in-memory `FakeDom`.

use std::cell::Cell;
use std::rc::Rc;

/// Opaque handle to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Element(pub u64);

/// Where a listener is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Element(Element),
    Window,
    /// Delegated: fires for events on any element matching the selector.
    Delegate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Click,
    Load,
    Scroll,
    Resize,
    /// Library-defined events such as a modal's `opening`.
    Custom(String),
}

/// An event delivered to a listener.
#[derive(Debug)]
pub struct DomEvent {
    pub kind: EventKind,
    /// The element the listener is bound to, or the delegate match.
    pub current: Option<Element>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    pub fn new(kind: EventKind, current: Option<Element>) -> Self {
        Self {
            kind,
            current,
            default_prevented: Cell::new(false),
        }
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Listener = Rc<dyn Fn(&DomEvent)>;

/// One observed element crossing the observer's root.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: Element,
    pub is_intersecting: bool,
    /// `boundingClientRect.top`
    pub bounding_top: f64,
}

pub type IntersectionCallback = Rc<dyn Fn(&[IntersectionEntry])>;

/// `IntersectionObserver` options; the root is always the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub threshold: f64,
}

/// Window scroll metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_top: f64,
    pub window_height: f64,
    pub document_height: f64,
}

/// jQuery easing names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Swing,
    Linear,
}

impl Easing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Easing::Swing => "swing",
            Easing::Linear => "linear",
        }
    }
}

/// Browser capabilities used by the behaviors.
///
/// All methods take `&self`: handles are shared through `Rc` and captured by
/// listeners, so implementations use interior mutability. Element lists are
/// returned in document order.
pub trait Dom {
    /// `document.querySelectorAll(selector)`
    fn query_all(&self, selector: &str) -> Vec<Element>;

    fn query(&self, selector: &str) -> Option<Element> {
        self.query_all(selector).into_iter().next()
    }

    /// Descendants of `scope` matching `selector`.
    fn find(&self, scope: Element, selector: &str) -> Vec<Element>;

    /// The immediately preceding sibling, if it matches `selector`
    /// (jQuery `.prev(selector)`).
    fn prev_sibling(&self, element: Element, selector: &str) -> Option<Element>;

    fn attr(&self, element: Element, name: &str) -> Option<String>;

    /// `element.dataset[key]`
    fn data(&self, element: Element, key: &str) -> Option<String> {
        self.attr(element, &format!("data-{}", key))
    }

    fn add_class(&self, element: Element, class: &str);

    fn remove_class(&self, element: Element, class: &str);

    fn has_class(&self, element: Element, class: &str) -> bool;

    fn set_style(&self, element: Element, property: &str, value: &str);

    /// Document-relative top edge (jQuery `.offset().top`).
    fn offset_top(&self, element: Element) -> f64;

    /// Height including padding (jQuery `.innerHeight()`).
    fn inner_height(&self, element: Element) -> f64;

    fn viewport(&self) -> Viewport;

    /// Bind a listener for the page's lifetime.
    fn on(&self, target: Target, kind: EventKind, listener: Listener);

    /// Start observing `targets` with a new observer.
    fn observe(
        &self,
        targets: &[Element],
        options: ObserverOptions,
        callback: IntersectionCallback,
    );

    /// One-shot timer; cannot be cancelled.
    fn set_timeout(&self, delay_ms: u64, task: Box<dyn FnOnce()>);

    /// Animate the window scroll position, then run `done`.
    fn animate_scroll(&self, to: f64, duration_ms: u64, easing: Easing, done: Box<dyn FnOnce()>);

    fn slide_down(&self, element: Element, duration_ms: u64);

    fn console_error(&self, message: &str);
}
