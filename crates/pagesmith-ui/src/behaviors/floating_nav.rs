//! A navigation bar that appears after scrolling and stops above the footer.

use std::rc::Rc;

use crate::behaviors::{listener, px, report, require_all};
use crate::dom::{Dom, Element, EventKind, Target};
use crate::error::{require_non_empty, UiError};

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingNavOptions {
    pub nav_selector: String,
    pub footer_selector: String,
    /// Scroll position past which the nav is shown. Default `300`.
    pub show_at: f64,
    pub show_class: String,
    pub hide_class: String,
}

impl Default for FloatingNavOptions {
    fn default() -> Self {
        Self {
            nav_selector: ".js-floating".to_string(),
            footer_selector: ".l-footer".to_string(),
            show_at: 300.0,
            show_class: "is-show".to_string(),
            hide_class: "is-hide".to_string(),
        }
    }
}

impl FloatingNavOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        require_non_empty("nav_selector", &self.nav_selector)?;
        require_non_empty("footer_selector", &self.footer_selector)?;
        require_non_empty("show_class", &self.show_class)?;
        require_non_empty("hide_class", &self.hide_class)
    }
}

pub fn floating_nav<D: Dom + 'static>(dom: &Rc<D>, options: FloatingNavOptions) {
    if let Err(e) = bind(dom, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(dom: &Rc<D>, options: FloatingNavOptions) -> Result<(), UiError> {
    options.validate()?;
    let navs = require_all(&**dom, &options.nav_selector, "Floating nav")?;
    let footer = dom
        .query(&options.footer_selector)
        .ok_or_else(|| UiError::not_found("Footer", &options.footer_selector))?;

    let nav_height = dom.inner_height(navs[0]);
    let options = Rc::new(options);
    let navs = Rc::new(navs);

    for kind in [EventKind::Load, EventKind::Scroll, EventKind::Resize] {
        let options = Rc::clone(&options);
        let navs = Rc::clone(&navs);
        let update = listener(dom, move |dom, _| {
            position(&**dom, &navs, footer, nav_height, &options)
        });
        dom.on(Target::Window, kind, update);
    }

    Ok(())
}

fn position<D: Dom>(
    dom: &D,
    navs: &[Element],
    footer: Element,
    nav_height: f64,
    options: &FloatingNavOptions,
) {
    let viewport = dom.viewport();

    if viewport.scroll_top <= options.show_at {
        for &nav in navs {
            dom.remove_class(nav, &options.show_class);
            dom.add_class(nav, &options.hide_class);
        }
        return;
    }

    let visible_bottom = viewport.window_height + viewport.scroll_top;
    let footer_top = dom.offset_top(footer);
    let bottom = if visible_bottom > footer_top + nav_height {
        px(visible_bottom - footer_top)
    } else {
        px(0.0)
    };

    for &nav in navs {
        dom.remove_class(nav, &options.hide_class);
        dom.add_class(nav, &options.show_class);
        dom.set_style(nav, "bottom", &bottom);
    }
}
