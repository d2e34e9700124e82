//! Activate the tab bar while the model section is at the top of the
//! viewport.

use std::rc::Rc;

use crate::behaviors::{observer, report};
use crate::dom::{Dom, ObserverOptions};
use crate::error::{require_non_empty, UiError};

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollActivationOptions {
    pub model_selector: String,
    pub tab_selector: String,
    pub active_class: String,
}

impl Default for ScrollActivationOptions {
    fn default() -> Self {
        Self {
            model_selector: ".model".to_string(),
            tab_selector: ".tab".to_string(),
            active_class: "active".to_string(),
        }
    }
}

/// The observer's root shrinks to the top edge of the viewport.
fn observer_options() -> ObserverOptions {
    ObserverOptions {
        root_margin: "0px 0px -100% 0px".to_string(),
        threshold: 0.0,
    }
}

pub fn handle_scroll_activation<D: Dom + 'static>(dom: &Rc<D>, options: ScrollActivationOptions) {
    if let Err(e) = bind(dom, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(dom: &Rc<D>, options: ScrollActivationOptions) -> Result<(), UiError> {
    require_non_empty("active_class", &options.active_class)?;
    let tab = dom
        .query(&options.tab_selector)
        .ok_or_else(|| UiError::not_found("Tab bar", &options.tab_selector))?;
    let model = dom
        .query(&options.model_selector)
        .ok_or_else(|| UiError::not_found("Model section", &options.model_selector))?;

    let class = options.active_class;
    let callback = observer(dom, move |dom, entries| {
        for entry in entries {
            if entry.is_intersecting && entry.bounding_top <= 0.0 {
                dom.add_class(tab, &class);
            } else if !entry.is_intersecting {
                dom.remove_class(tab, &class);
            }
        }
    });

    dom.observe(&[model], observer_options(), callback);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, IntersectionEntry};
    use crate::fake::FakeDom;

    fn page() -> (Rc<FakeDom>, Element, Element) {
        let dom = Rc::new(FakeDom::new());
        let tab = dom.add(None, "div", &[("class", "tab")]);
        let model = dom.add(None, "section", &[("class", "model")]);
        (dom, tab, model)
    }

    fn entry(target: Element, is_intersecting: bool, bounding_top: f64) -> IntersectionEntry {
        IntersectionEntry {
            target,
            is_intersecting,
            bounding_top,
        }
    }

    #[test]
    fn active_while_model_covers_the_top_edge() {
        let (dom, tab, model) = page();
        handle_scroll_activation(&dom, ScrollActivationOptions::default());

        assert_eq!(dom.observer_options(), vec![observer_options()]);

        dom.intersect(&[entry(model, true, 120.0)]);
        assert!(!dom.has_class(tab, "active"));

        dom.intersect(&[entry(model, true, -40.0)]);
        assert!(dom.has_class(tab, "active"));

        dom.intersect(&[entry(model, false, -900.0)]);
        assert!(!dom.has_class(tab, "active"));
    }

    #[test]
    fn missing_tab_reports_once() {
        let dom = Rc::new(FakeDom::new());
        dom.add(None, "section", &[("class", "model")]);

        handle_scroll_activation(&dom, ScrollActivationOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert!(dom.observer_options().is_empty());
    }
}
