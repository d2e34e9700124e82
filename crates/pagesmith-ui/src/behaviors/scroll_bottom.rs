//! Mark elements once the window is scrolled to (near) the bottom.

use std::rc::Rc;

use crate::behaviors::{listener, report, ElementHook};
use crate::dom::{Dom, EventKind, Target};
use crate::error::{require_non_empty, UiError};

#[derive(Clone)]
pub struct ScrollBottomOptions {
    /// Distance from the document end that still counts as the bottom.
    pub offset: f64,
    pub target_selector: String,
    /// Default `fix`.
    pub add_class: String,
    /// Runs for each target when the class is added.
    pub callback: Option<ElementHook>,
}

impl Default for ScrollBottomOptions {
    fn default() -> Self {
        Self {
            offset: 0.0,
            target_selector: String::new(),
            add_class: "fix".to_string(),
            callback: None,
        }
    }
}

impl ScrollBottomOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        require_non_empty("target_selector", &self.target_selector)?;
        require_non_empty("add_class", &self.add_class)?;
        if !self.offset.is_finite() {
            return Err(UiError::invalid("offset", "must be finite"));
        }
        Ok(())
    }
}

/// Targets are looked up on every scroll, so elements added later are
/// picked up.
pub fn detect_scroll_bottom<D: Dom + 'static>(dom: &Rc<D>, options: ScrollBottomOptions) {
    if let Err(e) = options.validate() {
        report(&**dom, e);
        return;
    }

    let on_scroll = listener(dom, move |dom, _| {
        let viewport = dom.viewport();
        let visible_bottom = viewport.scroll_top + viewport.window_height;
        let at_bottom = visible_bottom >= viewport.document_height - options.offset;

        for target in dom.query_all(&options.target_selector) {
            if at_bottom {
                dom.add_class(target, &options.add_class);
                if let Some(callback) = &options.callback {
                    callback(target);
                }
            } else {
                dom.remove_class(target, &options.add_class);
            }
        }
    });

    dom.on(Target::Window, EventKind::Scroll, on_scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Viewport};
    use crate::fake::FakeDom;
    use std::cell::RefCell;

    fn page() -> (Rc<FakeDom>, Element) {
        let dom = Rc::new(FakeDom::new());
        let bar = dom.add(None, "div", &[("class", "js-bottomBar")]);
        dom.set_viewport(Viewport {
            scroll_top: 0.0,
            window_height: 800.0,
            document_height: 3000.0,
        });
        (dom, bar)
    }

    #[test]
    fn toggles_class_at_the_bottom() {
        let (dom, bar) = page();
        detect_scroll_bottom(
            &dom,
            ScrollBottomOptions {
                offset: 100.0,
                target_selector: ".js-bottomBar".to_string(),
                ..Default::default()
            },
        );

        dom.scroll_to(2000.0);
        assert!(!dom.has_class(bar, "fix"));

        dom.scroll_to(2100.0);
        assert!(dom.has_class(bar, "fix"));

        dom.scroll_to(1500.0);
        assert!(!dom.has_class(bar, "fix"));
    }

    #[test]
    fn callback_receives_each_target() {
        let (dom, bar) = page();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = seen.clone();

        detect_scroll_bottom(
            &dom,
            ScrollBottomOptions {
                target_selector: ".js-bottomBar".to_string(),
                callback: Some(Rc::new(move |el: Element| log.borrow_mut().push(el))),
                ..Default::default()
            },
        );
        dom.scroll_to(2200.0);

        assert_eq!(*seen.borrow(), vec![bar]);
    }

    #[test]
    fn empty_selector_is_rejected() {
        let (dom, _) = page();
        detect_scroll_bottom(&dom, ScrollBottomOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert_eq!(dom.listener_count(), 0);
    }
}
