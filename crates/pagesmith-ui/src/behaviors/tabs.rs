//! Tab switching between model panels, with a second "mirror" tab strip
//! kept in sync.

use std::rc::Rc;

use crate::behaviors::{later, listener, report, require_all};
use crate::dom::{Dom, Element, EventKind, Target};
use crate::error::{require_non_empty, UiError};

#[derive(Debug, Clone, PartialEq)]
pub struct TabOptions {
    pub tab_selector: String,
    pub mirror_selector: String,
    /// Each selector is one panel group; panel `k` of every group belongs
    /// to tab `k`.
    pub panel_selectors: Vec<String>,
    pub active_class: String,
    /// Delay before the shown panel slides in. Default `10` ms.
    pub reveal_delay_ms: u64,
    pub transition: String,
}

impl Default for TabOptions {
    fn default() -> Self {
        Self {
            tab_selector: ".tab_item".to_string(),
            mirror_selector: ".movement_tab".to_string(),
            panel_selectors: vec![".movement_cont".to_string(), ".model_inner".to_string()],
            active_class: "active".to_string(),
            reveal_delay_ms: 10,
            transition: "transform 0.4s ease, opacity 0.4s ease".to_string(),
        }
    }
}

impl TabOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        require_non_empty("tab_selector", &self.tab_selector)?;
        require_non_empty("active_class", &self.active_class)?;
        for selector in &self.panel_selectors {
            require_non_empty("panel_selectors", selector)?;
        }
        Ok(())
    }
}

struct TabSet {
    tabs: Vec<Element>,
    mirrors: Vec<Element>,
    panels: Vec<Vec<Element>>,
    options: TabOptions,
}

impl TabSet {
    fn activate<D: Dom + 'static>(&self, dom: &Rc<D>, index: usize) {
        let class = &self.options.active_class;

        for &el in self.tabs.iter().chain(&self.mirrors) {
            dom.remove_class(el, class);
        }
        for &panel in self.panels.iter().flatten() {
            dom.remove_class(panel, class);
            dom.set_style(panel, "display", "none");
            dom.set_style(panel, "transform", "translateX(50px)");
            dom.set_style(panel, "opacity", "0");
        }

        for el in [self.tabs.get(index), self.mirrors.get(index)].into_iter().flatten() {
            dom.add_class(*el, class);
        }

        for group in &self.panels {
            let Some(&panel) = group.get(index) else {
                continue;
            };
            dom.add_class(panel, class);
            dom.set_style(panel, "display", "block");

            let transition = self.options.transition.clone();
            later(dom, self.options.reveal_delay_ms, move |dom| {
                dom.set_style(panel, "transform", "translateX(0)");
                dom.set_style(panel, "opacity", "1");
                dom.set_style(panel, "transition", &transition);
            });
        }
    }
}

pub fn handle_tab_click<D: Dom + 'static>(dom: &Rc<D>, options: TabOptions) {
    if let Err(e) = bind(dom, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(dom: &Rc<D>, options: TabOptions) -> Result<(), UiError> {
    options.validate()?;
    let tabs = require_all(&**dom, &options.tab_selector, "Tab")?;
    let mirrors = if options.mirror_selector.trim().is_empty() {
        Vec::new()
    } else {
        dom.query_all(&options.mirror_selector)
    };
    let panels = options
        .panel_selectors
        .iter()
        .map(|selector| dom.query_all(selector))
        .collect();

    let set = Rc::new(TabSet {
        tabs,
        mirrors,
        panels,
        options,
    });

    let strips = [set.tabs.clone(), set.mirrors.clone()];
    for strip in strips {
        for (index, el) in strip.into_iter().enumerate() {
            let set = Rc::clone(&set);
            let on_click = listener(dom, move |dom, _| set.activate(dom, index));
            dom.on(Target::Element(el), EventKind::Click, on_click);
        }
    }

    Ok(())
}
