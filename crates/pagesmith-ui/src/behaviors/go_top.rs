//! "Back to top" buttons.

use std::rc::Rc;

use crate::behaviors::{listener, report, require_all, Hook};
use crate::dom::{Dom, Easing, EventKind, Target};
use crate::error::UiError;

#[derive(Clone)]
pub struct GoTopOptions {
    /// Default `1000` ms.
    pub speed_ms: u64,
    pub easing: Easing,
    pub before_scroll: Option<Hook>,
    pub after_scroll: Option<Hook>,
}

impl Default for GoTopOptions {
    fn default() -> Self {
        Self {
            speed_ms: 1000,
            easing: Easing::Swing,
            before_scroll: None,
            after_scroll: None,
        }
    }
}

pub fn go_top<D: Dom + 'static>(dom: &Rc<D>, selector: &str, options: GoTopOptions) {
    if let Err(e) = bind(dom, selector, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(
    dom: &Rc<D>,
    selector: &str,
    options: GoTopOptions,
) -> Result<(), UiError> {
    let buttons = require_all(&**dom, selector, "Go-top button")?;
    let options = Rc::new(options);

    for button in buttons {
        let options = Rc::clone(&options);
        let on_click = listener(dom, move |dom, event| {
            event.prevent_default();

            if let Some(before) = &options.before_scroll {
                before();
            }

            let after = options.after_scroll.clone();
            dom.animate_scroll(
                0.0,
                options.speed_ms,
                options.easing,
                Box::new(move || {
                    if let Some(after) = after {
                        after();
                    }
                }),
            );
        });
        dom.on(Target::Element(button), EventKind::Click, on_click);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use crate::fake::{FakeDom, ScrollAnimation};
    use std::cell::Cell;

    #[test]
    fn scrolls_back_to_zero() {
        let dom = Rc::new(FakeDom::new());
        let button = dom.add(None, "a", &[("class", "js-goTop")]);
        dom.set_viewport(Viewport {
            scroll_top: 2200.0,
            ..Default::default()
        });

        let finished = Rc::new(Cell::new(false));
        let flag = finished.clone();
        go_top(
            &dom,
            ".js-goTop",
            GoTopOptions {
                easing: Easing::Linear,
                after_scroll: Some(Rc::new(move || flag.set(true))),
                ..Default::default()
            },
        );

        assert!(dom.click(button).default_prevented());
        assert_eq!(
            dom.animations(),
            vec![ScrollAnimation {
                to: 0.0,
                duration_ms: 1000,
                easing: Easing::Linear,
            }]
        );
        assert_eq!(dom.viewport().scroll_top, 0.0);
        assert!(finished.get());
    }

    #[test]
    fn zero_matches_reports_once_without_listeners() {
        let dom = Rc::new(FakeDom::new());
        go_top(&dom, ".js-goTop", GoTopOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert_eq!(dom.listener_count(), 0);
    }
}
