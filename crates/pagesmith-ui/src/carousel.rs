//! Carousel construction over an external slider widget.
//!
//! The widget itself is reached through [`CarouselFactory`]; this module owns
//! the option objects handed to it and the lifecycle of the per-modal
//! instances, which are torn down and rebuilt every time a modal opens.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;

use crate::behaviors::{listener, report};
use crate::dom::{Dom, EventKind, Target};
use crate::error::{require_non_empty, UiError};

/// Option object passed to the widget constructor. Serialises with the
/// widget's own (camelCase) field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_slide: Option<usize>,
    pub direction: String,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub speed: u64,
    pub slides_per_view: f64,
    pub space_between: f64,
    pub centered_slides: bool,
    pub autoplay: bool,
    /// Keyed by minimum viewport width in pixels.
    pub breakpoints: BTreeMap<u32, Breakpoint>,
    pub pagination: Pagination,
    pub navigation: Navigation,
    pub scrollbar: Scrollbar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakpoint {
    pub slides_per_view: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub el: String,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub next_el: String,
    pub prev_el: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scrollbar {
    pub el: String,
}

impl CarouselOptions {
    /// The page's main showcase carousel.
    pub fn showcase() -> Self {
        Self::scoped(None, 1.15, 1.665)
    }

    /// A carousel inside a modal, with control selectors scoped to
    /// `scope` (e.g. `#carousel-3`).
    pub fn modal(scope: &str) -> Self {
        Self {
            initial_slide: Some(0),
            ..Self::scoped(Some(scope), 1.2, 1.2)
        }
    }

    fn scoped(scope: Option<&str>, slides_per_view: f64, wide_slides_per_view: f64) -> Self {
        let sel = |name: &str| match scope {
            Some(scope) => format!("{} .{}", scope, name),
            None => format!(".{}", name),
        };

        Self {
            initial_slide: None,
            direction: "horizontal".to_string(),
            looped: true,
            speed: 500,
            slides_per_view,
            space_between: 0.0,
            centered_slides: true,
            autoplay: false,
            breakpoints: BTreeMap::from([(
                768,
                Breakpoint {
                    slides_per_view: wide_slides_per_view,
                },
            )]),
            pagination: Pagination {
                el: sel("swiper-pagination"),
                clickable: true,
            },
            navigation: Navigation {
                next_el: sel("swiper-button-next"),
                prev_el: sel("swiper-button-prev"),
            },
            scrollbar: Scrollbar {
                el: sel("swiper-scrollbar"),
            },
        }
    }

    pub fn validate(&self) -> Result<(), UiError> {
        let per_view = std::iter::once(self.slides_per_view)
            .chain(self.breakpoints.values().map(|b| b.slides_per_view));
        for value in per_view {
            if !(value.is_finite() && value > 0.0) {
                return Err(UiError::invalid(
                    "slides_per_view",
                    format!("must be positive, got {}", value),
                ));
            }
        }
        if !(self.space_between.is_finite() && self.space_between >= 0.0) {
            return Err(UiError::invalid("space_between", "must be zero or positive"));
        }
        require_non_empty("direction", &self.direction)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// A constructed widget instance.
pub trait Carousel {
    fn slide_to_loop(&mut self, index: usize, speed_ms: u64, run_callbacks: bool);

    fn destroy(&mut self, delete_instance: bool, clean_styles: bool);
}

/// Constructs widget instances for a container selector.
pub trait CarouselFactory {
    fn create(&self, container: &str, options: &CarouselOptions) -> Box<dyn Carousel>;
}

/// Owns the instances built for the currently open modal.
#[derive(Default)]
pub struct CarouselRegistry {
    instances: Vec<Box<dyn Carousel>>,
}

impl CarouselRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, carousel: Box<dyn Carousel>) {
        self.instances.push(carousel);
    }

    /// Destroy every instance (removing the instance and its inline styles)
    /// and forget them.
    pub fn reset(&mut self) {
        for mut carousel in self.instances.drain(..) {
            carousel.destroy(true, true);
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModalCarouselOptions {
    /// Delegate selector for the modal whose event triggers a rebuild.
    pub modal_selector: String,
    pub open_event: String,
    /// Number of `#<id_prefix><i>` containers, numbered from 1.
    pub count: usize,
    pub id_prefix: String,
    /// Container selector inside each numbered scope.
    pub container_selector: String,
}

impl Default for ModalCarouselOptions {
    fn default() -> Self {
        Self {
            modal_selector: ".remodal".to_string(),
            open_event: "opening".to_string(),
            count: 8,
            id_prefix: "carousel-".to_string(),
            container_selector: ".swiper".to_string(),
        }
    }
}

impl ModalCarouselOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        require_non_empty("modal_selector", &self.modal_selector)?;
        require_non_empty("open_event", &self.open_event)?;
        require_non_empty("id_prefix", &self.id_prefix)?;
        require_non_empty("container_selector", &self.container_selector)
    }
}

/// Build the page showcase carousel in `selector`.
pub fn init_carousel(
    factory: &dyn CarouselFactory,
    selector: &str,
    options: &CarouselOptions,
) -> Result<Box<dyn Carousel>, UiError> {
    require_non_empty("selector", selector)?;
    options.validate()?;
    Ok(factory.create(selector, options))
}

/// Destroy the previous modal carousels, then build `count` fresh ones, each
/// jumped to its first slide without animation or callbacks.
pub fn rebuild_modal_carousels(
    registry: &mut CarouselRegistry,
    factory: &dyn CarouselFactory,
    options: &ModalCarouselOptions,
) {
    registry.reset();

    for i in 1..=options.count {
        let scope = format!("#{}{}", options.id_prefix, i);
        let container = format!("{} {}", scope, options.container_selector);

        let mut carousel = factory.create(&container, &CarouselOptions::modal(&scope));
        carousel.slide_to_loop(0, 0, false);
        registry.add(carousel);
    }

    tracing::debug!("rebuilt {} modal carousel(s)", registry.len());
}

/// Rebuild the modal carousels whenever a matching modal fires its open
/// event.
pub fn bind_modal_carousels<D, F>(
    dom: &Rc<D>,
    factory: Rc<F>,
    registry: Rc<RefCell<CarouselRegistry>>,
    options: ModalCarouselOptions,
) where
    D: Dom + 'static,
    F: CarouselFactory + 'static,
{
    if let Err(e) = options.validate() {
        report(&**dom, e);
        return;
    }

    let target = Target::Delegate(options.modal_selector.clone());
    let kind = EventKind::Custom(options.open_event.clone());
    let on_open = listener(dom, move |_, _| {
        rebuild_modal_carousels(&mut registry.borrow_mut(), &*factory, &options);
    });

    dom.on(target, kind, on_open);
}
