//! Promote a child image to the element's CSS background.

use std::rc::Rc;

use crate::behaviors::{report, require_all};
use crate::dom::Dom;
use crate::error::{require_non_empty, UiError};

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImageOptions {
    /// Default `img`.
    pub child_selector: String,
    /// Extra declarations applied to every element, e.g.
    /// `("background-size", "cover")`.
    pub bg_styles: Vec<(String, String)>,
}

impl Default for BackgroundImageOptions {
    fn default() -> Self {
        Self {
            child_selector: "img".to_string(),
            bg_styles: Vec::new(),
        }
    }
}

/// Elements without a usable child image are reported and left without a
/// background image; the extra styles are still applied.
pub fn bg_img_set<D: Dom>(dom: &Rc<D>, selector: &str, options: BackgroundImageOptions) {
    if let Err(e) = apply(&**dom, selector, &options) {
        report(&**dom, e);
    }
}

fn apply<D: Dom>(dom: &D, selector: &str, options: &BackgroundImageOptions) -> Result<(), UiError> {
    require_non_empty("child_selector", &options.child_selector)?;
    let elements = require_all(dom, selector, "Background image")?;

    for element in elements {
        let src = dom
            .find(element, &options.child_selector)
            .into_iter()
            .next()
            .and_then(|img| dom.attr(img, "src"))
            .filter(|src| !src.is_empty());

        match src {
            Some(src) => dom.set_style(element, "background-image", &format!("url(\"{}\")", src)),
            None => report(dom, UiError::not_found("Background source", &options.child_selector)),
        }

        for (property, value) in &options.bg_styles {
            dom.set_style(element, property, value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeDom;

    #[test]
    fn copies_child_src_and_extra_styles() {
        let dom = Rc::new(FakeDom::new());
        let card = dom.add(None, "div", &[("class", "js-bg")]);
        dom.add(Some(card), "img", &[("src", "asset/img/model01.jpg")]);

        bg_img_set(
            &dom,
            ".js-bg",
            BackgroundImageOptions {
                bg_styles: vec![("background-size".to_string(), "cover".to_string())],
                ..Default::default()
            },
        );

        assert_eq!(
            dom.style(card, "background-image").as_deref(),
            Some("url(\"asset/img/model01.jpg\")")
        );
        assert_eq!(dom.style(card, "background-size").as_deref(), Some("cover"));
        assert!(dom.errors().is_empty());
    }

    #[test]
    fn missing_child_is_skipped_with_an_error() {
        let dom = Rc::new(FakeDom::new());
        let empty = dom.add(None, "div", &[("class", "js-bg")]);
        let card = dom.add(None, "div", &[("class", "js-bg")]);
        dom.add(Some(card), "img", &[("src", "a.png")]);

        bg_img_set(&dom, ".js-bg", BackgroundImageOptions::default());

        assert_eq!(dom.style(empty, "background-image"), None);
        assert_eq!(dom.style(card, "background-image").as_deref(), Some("url(\"a.png\")"));
        assert_eq!(dom.errors().len(), 1);
    }
}
