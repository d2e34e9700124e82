//! Behaviors bound on every page of the collection site.

use std::rc::Rc;

use crate::behaviors::fade_in::{fade_in_on_scroll, FadeInOptions};
use crate::behaviors::scroll_activation::{handle_scroll_activation, ScrollActivationOptions};
use crate::behaviors::smooth_scroll::{smooth_scroll, SmoothScrollOptions};
use crate::behaviors::tabs::{handle_tab_click, TabOptions};
use crate::dom::Dom;

/// Page entry point. Each behavior binds independently; a missing target
/// only disables that behavior.
pub fn install_page_behaviors<D: Dom + 'static>(dom: &Rc<D>) {
    smooth_scroll(dom, ".tab_item", SmoothScrollOptions::default());
    fade_in_on_scroll(
        dom,
        ".fade-element",
        FadeInOptions {
            offset_percent: -40.0,
            delay_increment_ms: 150,
            active_class: "is-active".to_string(),
            on_intersect: None,
        },
    );
    handle_tab_click(dom, TabOptions::default());
    handle_scroll_activation(dom, ScrollActivationOptions::default());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDom;

    #[test]
    fn binds_against_a_full_page() {
        let dom = Rc::new(FakeDom::new());
        dom.add(None, "div", &[("class", "tab")]);
        let model = dom.add(None, "section", &[("class", "model"), ("id", "model")]);
        let tab = dom.add(Some(model), "a", &[("class", "tab_item"), ("href", "#model")]);
        dom.add(None, "div", &[("class", "movement_cont")]);
        dom.add(None, "div", &[("class", "fade-element")]);

        install_page_behaviors(&dom);

        assert!(dom.errors().is_empty());
        assert_eq!(
            dom.observer_options()
                .iter()
                .map(|o| o.root_margin.as_str())
                .collect::<Vec<_>>(),
            vec!["0px 0px -40%", "0px 0px -100% 0px"]
        );

        dom.click(tab);
        assert!(dom.has_class(tab, "active"));
        assert_eq!(dom.animations().len(), 1);
    }

    #[test]
    fn missing_sections_disable_only_their_behavior() {
        let dom = Rc::new(FakeDom::new());
        dom.add(None, "div", &[("class", "fade-element")]);

        install_page_behaviors(&dom);

        // smooth scroll, tabs, scroll activation
        assert_eq!(dom.errors().len(), 3);
        assert_eq!(dom.observer_options().len(), 1);
    }
}
