//! Carousels backed by the page's global `Swiper` constructor.

use wasm_bindgen::prelude::*;

use crate::carousel::{Carousel, CarouselFactory, CarouselOptions};

#[wasm_bindgen]
extern "C" {
    type Swiper;

    #[wasm_bindgen(constructor)]
    fn new(container: &str, options: &JsValue) -> Swiper;

    #[wasm_bindgen(method, js_name = slideToLoop)]
    fn slide_to_loop(this: &Swiper, index: u32, speed: f64, run_callbacks: bool);

    #[wasm_bindgen(method)]
    fn destroy(this: &Swiper, delete_instance: bool, clean_styles: bool);
}

struct SwiperCarousel(Swiper);

impl Carousel for SwiperCarousel {
    fn slide_to_loop(&mut self, index: usize, speed_ms: u64, run_callbacks: bool) {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.0.slide_to_loop(index, speed_ms as f64, run_callbacks);
    }

    fn destroy(&mut self, delete_instance: bool, clean_styles: bool) {
        self.0.destroy(delete_instance, clean_styles);
    }
}

/// Builds `new Swiper(container, options)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwiperFactory;

impl CarouselFactory for SwiperFactory {
    fn create(&self, container: &str, options: &CarouselOptions) -> Box<dyn Carousel> {
        Box::new(SwiperCarousel(Swiper::new(container, &options_value(options))))
    }
}

/// The option object as a plain JS object. Falls back to Swiper's defaults
/// when it cannot be converted.
fn options_value(options: &CarouselOptions) -> JsValue {
    let converted = serde_json::to_string(options)
        .map_err(|e| e.to_string())
        .and_then(|json| js_sys::JSON::parse(&json).map_err(|e| format!("{:?}", e)));

    match converted {
        Ok(value) => value,
        Err(e) => {
            let message = format!("Carousel options could not be converted: {}", e);
            web_sys::console::error_1(&JsValue::from_str(&message));
            JsValue::UNDEFINED
        }
    }
}
