//! Browser behaviors for pagesmith pages.
//!
//! Everything here is written against the [`Dom`] trait. The `web` feature
//! implements it over the real document and exports the wasm entry point;
//! tests use `FakeDom` (enabled with the `testing` feature outside this
//! crate).

pub mod behaviors;
pub mod carousel;
pub mod dom;
pub mod error;
pub mod page;

#[cfg(any(test, feature = "testing"))]
pub mod fake;

#[cfg(feature = "web")]
pub mod web;

pub use behaviors::accordion::{open_accordion, AccordionOptions};
pub use behaviors::background::{bg_img_set, BackgroundImageOptions};
pub use behaviors::fade_in::{fade_in_on_scroll, FadeInOptions, IntersectHook};
pub use behaviors::floating_nav::{floating_nav, FloatingNavOptions};
pub use behaviors::go_top::{go_top, GoTopOptions};
pub use behaviors::scroll_activation::{handle_scroll_activation, ScrollActivationOptions};
pub use behaviors::scroll_bottom::{detect_scroll_bottom, ScrollBottomOptions};
pub use behaviors::smooth_scroll::{smooth_scroll, SmoothScrollOptions};
pub use behaviors::tabs::{handle_tab_click, TabOptions};
pub use behaviors::{ElementHook, Hook};
pub use carousel::{
    bind_modal_carousels, init_carousel, rebuild_modal_carousels, Carousel, CarouselFactory,
    CarouselOptions, CarouselRegistry, ModalCarouselOptions,
};
pub use dom::{
    Dom, DomEvent, Easing, Element, EventKind, IntersectionCallback, IntersectionEntry, Listener,
    ObserverOptions, Target, Viewport,
};
pub use error::UiError;
pub use page::install_page_behaviors;
