//! Animated in-page anchor navigation.

use std::rc::Rc;

use crate::behaviors::{listener, report, require_all, Hook};
use crate::dom::{Dom, DomEvent, Easing, EventKind, Target};
use crate::error::UiError;

#[derive(Clone)]
pub struct SmoothScrollOptions {
    /// Animation duration. Default `700` ms.
    pub speed_ms: u64,

    /// Pixels subtracted from the target's top, e.g. for a fixed header.
    pub offset: f64,

    pub easing: Easing,

    pub before_scroll: Option<Hook>,

    /// Runs once the animation completes.
    pub after_scroll: Option<Hook>,
}

impl Default for SmoothScrollOptions {
    fn default() -> Self {
        Self {
            speed_ms: 700,
            offset: 0.0,
            easing: Easing::Swing,
            before_scroll: None,
            after_scroll: None,
        }
    }
}

impl SmoothScrollOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        if !self.offset.is_finite() {
            return Err(UiError::invalid("offset", "must be finite"));
        }
        Ok(())
    }
}

/// Bind every link matching `selector` to scroll to the element its `href`
/// names. `#` or an empty `href` scrolls to the top of the document.
pub fn smooth_scroll<D: Dom + 'static>(dom: &Rc<D>, selector: &str, options: SmoothScrollOptions) {
    if let Err(e) = bind(dom, selector, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(
    dom: &Rc<D>,
    selector: &str,
    options: SmoothScrollOptions,
) -> Result<(), UiError> {
    options.validate()?;
    let links = require_all(&**dom, selector, "Smooth scroll link")?;
    let options = Rc::new(options);

    for link in &links {
        let options = Rc::clone(&options);
        let on_click = listener(dom, move |dom, event| scroll_to_anchor(&**dom, event, &options));
        dom.on(Target::Element(*link), EventKind::Click, on_click);
    }

    tracing::debug!("smooth scroll bound to {} link(s)", links.len());
    Ok(())
}

fn scroll_to_anchor<D: Dom>(dom: &D, event: &DomEvent, options: &SmoothScrollOptions) {
    event.prevent_default();

    let Some(link) = event.current else {
        return;
    };

    let href = dom.attr(link, "href").unwrap_or_default();
    let href = href.trim();

    let top = if href.is_empty() || href == "#" {
        0.0
    } else {
        match dom.query(href) {
            Some(target) => dom.offset_top(target),
            None => {
                report(dom, UiError::not_found("Scroll target", href));
                return;
            }
        }
    };

    if let Some(before) = &options.before_scroll {
        before();
    }

    let after = options.after_scroll.clone();
    dom.animate_scroll(
        top - options.offset,
        options.speed_ms,
        options.easing,
        Box::new(move || {
            if let Some(after) = after {
                after();
            }
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeDom, ScrollAnimation};
    use std::cell::RefCell;

    #[test]
    fn scrolls_to_the_linked_section() {
        let dom = Rc::new(FakeDom::new());
        let link = dom.add(None, "a", &[("class", "tab_item"), ("href", "#model2")]);
        let section = dom.add(None, "section", &[("id", "model2")]);
        dom.set_box(section, 1200.0, 600.0);

        smooth_scroll(
            &dom,
            ".tab_item",
            SmoothScrollOptions {
                offset: 80.0,
                ..Default::default()
            },
        );

        let event = dom.click(link);
        assert!(event.default_prevented());
        assert_eq!(
            dom.animations(),
            vec![ScrollAnimation {
                to: 1120.0,
                duration_ms: 700,
                easing: Easing::Swing,
            }]
        );
    }

    #[test]
    fn bare_hash_scrolls_to_top() {
        let dom = Rc::new(FakeDom::new());
        let link = dom.add(None, "a", &[("class", "js-scroll"), ("href", "#")]);

        smooth_scroll(&dom, ".js-scroll", SmoothScrollOptions::default());
        dom.click(link);

        assert_eq!(dom.animations()[0].to, 0.0);
    }

    #[test]
    fn hooks_run_around_the_animation() {
        let dom = Rc::new(FakeDom::new());
        let link = dom.add(None, "a", &[("class", "js-scroll"), ("href", "#top")]);
        dom.add(None, "div", &[("id", "top")]);

        let calls = Rc::new(RefCell::new(Vec::new()));
        let (before, after) = (calls.clone(), calls.clone());
        smooth_scroll(
            &dom,
            ".js-scroll",
            SmoothScrollOptions {
                before_scroll: Some(Rc::new(move || before.borrow_mut().push("before"))),
                after_scroll: Some(Rc::new(move || after.borrow_mut().push("after"))),
                ..Default::default()
            },
        );
        dom.click(link);

        assert_eq!(*calls.borrow(), vec!["before", "after"]);
    }

    #[test]
    fn missing_anchor_target_is_reported_on_click() {
        let dom = Rc::new(FakeDom::new());
        let link = dom.add(None, "a", &[("class", "js-scroll"), ("href", "#nowhere")]);

        smooth_scroll(&dom, ".js-scroll", SmoothScrollOptions::default());
        assert!(dom.errors().is_empty());

        dom.click(link);
        assert_eq!(dom.errors().len(), 1);
        assert!(dom.animations().is_empty());
    }

    #[test]
    fn no_links_binds_nothing() {
        let dom = Rc::new(FakeDom::new());
        smooth_scroll(&dom, ".js-scroll", SmoothScrollOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert_eq!(dom.listener_count(), 0);
    }
}
