//! "Read more" accordions: the button hides itself and reveals the content
//! placed just before it.

use std::rc::Rc;

use crate::behaviors::{listener, report, require_all};
use crate::dom::{Dom, EventKind, Target};
use crate::error::{require_non_empty, UiError};

#[derive(Debug, Clone, PartialEq)]
pub struct AccordionOptions {
    pub button_selector: String,
    pub content_selector: String,
    /// Slide duration. Default `200` ms.
    pub speed_ms: u64,
    /// Added to the button once clicked.
    pub hide_class: String,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        Self {
            button_selector: ".c-accordion__button".to_string(),
            content_selector: ".c-accordion".to_string(),
            speed_ms: 200,
            hide_class: "is-hide".to_string(),
        }
    }
}

impl AccordionOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        require_non_empty("button_selector", &self.button_selector)?;
        require_non_empty("content_selector", &self.content_selector)?;
        require_non_empty("hide_class", &self.hide_class)
    }
}

pub fn open_accordion<D: Dom + 'static>(dom: &Rc<D>, options: AccordionOptions) {
    if let Err(e) = bind(dom, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(dom: &Rc<D>, options: AccordionOptions) -> Result<(), UiError> {
    options.validate()?;
    let buttons = require_all(&**dom, &options.button_selector, "Accordion button")?;
    let options = Rc::new(options);

    for button in buttons {
        let options = Rc::clone(&options);
        let on_click = listener(dom, move |dom, _| {
            dom.add_class(button, &options.hide_class);
            match dom.prev_sibling(button, &options.content_selector) {
                Some(content) => dom.slide_down(content, options.speed_ms),
                None => report(
                    &**dom,
                    UiError::not_found("Accordion content", &options.content_selector),
                ),
            }
        });
        dom.on(Target::Element(button), EventKind::Click, on_click);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDom;

    #[test]
    fn click_hides_button_and_slides_content() {
        let dom = Rc::new(FakeDom::new());
        let wrapper = dom.add(None, "div", &[]);
        let content = dom.add(Some(wrapper), "div", &[("class", "c-accordion")]);
        let button = dom.add(Some(wrapper), "button", &[("class", "c-accordion__button")]);

        open_accordion(&dom, AccordionOptions::default());
        dom.click(button);

        assert!(dom.has_class(button, "is-hide"));
        assert_eq!(dom.slides(), vec![(content, 200)]);
        assert_eq!(dom.style(content, "display").as_deref(), Some("block"));
    }

    #[test]
    fn each_button_opens_its_own_content() {
        let dom = Rc::new(FakeDom::new());
        let first = dom.add(None, "section", &[]);
        dom.add(Some(first), "div", &[("class", "c-accordion")]);
        dom.add(Some(first), "button", &[("class", "c-accordion__button")]);
        let second = dom.add(None, "section", &[]);
        let content = dom.add(Some(second), "div", &[("class", "c-accordion")]);
        let button = dom.add(Some(second), "button", &[("class", "c-accordion__button")]);

        open_accordion(&dom, AccordionOptions::default());
        dom.click(button);

        assert_eq!(dom.slides(), vec![(content, 200)]);
    }

    #[test]
    fn no_buttons_reports_once() {
        let dom = Rc::new(FakeDom::new());
        open_accordion(&dom, AccordionOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert_eq!(dom.listener_count(), 0);
    }
}
