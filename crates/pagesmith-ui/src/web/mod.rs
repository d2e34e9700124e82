//! Browser entry point.
//!
//! Built with the `web` feature for `wasm32-unknown-unknown`. [`WebDom`]
//! implements [`Dom`](crate::Dom) over the live document; events and
//! animations go through the page's jQuery, carousels through its Swiper.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::carousel::{
    bind_modal_carousels, init_carousel, Carousel, CarouselOptions, CarouselRegistry,
    ModalCarouselOptions,
};
use crate::dom::Dom;
use crate::page::install_page_behaviors;

mod dom;
mod swiper;

pub use dom::WebDom;
pub use swiper::SwiperFactory;

/// Container of the page's showcase carousel.
pub const SHOWCASE_SELECTOR: &str = ".carousel .swiper";

/// Keeps the document binding and the showcase alive after `start`
/// returns. Listeners only hold weak handles.
struct Page {
    _dom: Rc<WebDom>,
    _showcase: Option<Box<dyn Carousel>>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

/// Bind every page behavior and build the carousels.
#[wasm_bindgen(start)]
pub fn start() {
    let Some(dom) = WebDom::new() else {
        web_sys::console::error_1(&JsValue::from_str("pagesmith-ui: no document"));
        return;
    };
    let dom = Rc::new(dom);

    install_page_behaviors(&dom);

    let factory = Rc::new(SwiperFactory);
    let options = CarouselOptions::showcase();
    let showcase = match init_carousel(&*factory, SHOWCASE_SELECTOR, &options) {
        Ok(carousel) => Some(carousel),
        Err(e) => {
            dom.console_error(&e.to_string());
            None
        }
    };

    bind_modal_carousels(
        &dom,
        factory,
        Rc::new(RefCell::new(CarouselRegistry::new())),
        ModalCarouselOptions::default(),
    );

    PAGE.with(|page| {
        *page.borrow_mut() = Some(Page {
            _dom: dom,
            _showcase: showcase,
        });
    });
}
