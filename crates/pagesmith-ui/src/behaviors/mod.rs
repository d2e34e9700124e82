//! Independent page behaviors.
//!
//! Each public function validates its options, resolves its target elements
//! and binds listeners for the page's lifetime. When a target is missing or
//! an option is invalid it reports one console error and binds nothing.
//! Listeners hold a weak handle to the document so bound closures do not
//! keep it alive.

use std::rc::{Rc, Weak};

use crate::dom::{Dom, DomEvent, Element, IntersectionCallback, IntersectionEntry, Listener};
use crate::error::UiError;

pub mod accordion;
pub mod background;
pub mod fade_in;
pub mod floating_nav;
pub mod go_top;
pub mod scroll_activation;
pub mod scroll_bottom;
pub mod smooth_scroll;
pub mod tabs;

/// Hook run before or after a scroll animation.
pub type Hook = Rc<dyn Fn()>;

/// Hook run with an element a behavior just changed.
pub type ElementHook = Rc<dyn Fn(Element)>;

pub(crate) fn report<D: Dom>(dom: &D, err: UiError) {
    tracing::debug!("behavior not bound: {}", err);
    dom.console_error(&err.to_string());
}

/// All elements matching `selector`, or a not-found error.
pub(crate) fn require_all<D: Dom>(
    dom: &D,
    selector: &str,
    what: &'static str,
) -> Result<Vec<Element>, UiError> {
    let elements = dom.query_all(selector);
    if elements.is_empty() {
        return Err(UiError::not_found(what, selector));
    }
    Ok(elements)
}

/// Wrap a handler as a listener that holds the document weakly.
pub(crate) fn listener<D, F>(dom: &Rc<D>, handler: F) -> Listener
where
    D: Dom + 'static,
    F: Fn(&Rc<D>, &DomEvent) + 'static,
{
    let weak: Weak<D> = Rc::downgrade(dom);
    Rc::new(move |event: &DomEvent| {
        if let Some(dom) = weak.upgrade() {
            handler(&dom, event);
        }
    })
}

pub(crate) fn observer<D, F>(dom: &Rc<D>, handler: F) -> IntersectionCallback
where
    D: Dom + 'static,
    F: Fn(&Rc<D>, &[IntersectionEntry]) + 'static,
{
    let weak: Weak<D> = Rc::downgrade(dom);
    Rc::new(move |entries: &[IntersectionEntry]| {
        if let Some(dom) = weak.upgrade() {
            handler(&dom, entries);
        }
    })
}

/// Schedule `task` on the document's timer queue.
pub(crate) fn later<D, F>(dom: &Rc<D>, delay_ms: u64, task: F)
where
    D: Dom + 'static,
    F: FnOnce(&D) + 'static,
{
    let weak: Weak<D> = Rc::downgrade(dom);
    dom.set_timeout(
        delay_ms,
        Box::new(move || {
            if let Some(dom) = weak.upgrade() {
                task(&dom);
            }
        }),
    );
}

pub(crate) fn px(value: f64) -> String {
    format!("{}px", value)
}
