//! [`Dom`] over `web_sys`, with jQuery for event binding and animation.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList, Window,
};

use crate::dom::{
    Dom, DomEvent, Easing, Element, EventKind, IntersectionCallback, IntersectionEntry, Listener,
    ObserverOptions, Target, Viewport,
};

#[wasm_bindgen]
extern "C" {
    type JQuery;

    #[wasm_bindgen(js_name = jQuery)]
    fn jquery(target: &JsValue) -> JQuery;

    #[wasm_bindgen(method)]
    fn on(this: &JQuery, events: &str, handler: &Function);

    #[wasm_bindgen(method, js_name = on)]
    fn on_delegate(this: &JQuery, events: &str, selector: &str, handler: &Function);

    #[wasm_bindgen(method)]
    fn animate(this: &JQuery, properties: &Object, duration: f64, easing: &str, done: &JsValue);

    #[wasm_bindgen(method, js_name = slideDown)]
    fn slide_down(this: &JQuery, duration: f64);

    type JQueryEvent;

    #[wasm_bindgen(method, getter, js_name = currentTarget)]
    fn current_target(this: &JQueryEvent) -> JsValue;

    #[wasm_bindgen(method, js_name = preventDefault)]
    fn prevent_default(this: &JQueryEvent);
}

/// Maps live elements to the opaque handles behaviors work with. The same
/// node always gets the same handle.
#[derive(Default)]
struct Handles {
    elements: RefCell<Vec<web_sys::Element>>,
}

impl Handles {
    fn handle(&self, element: &web_sys::Element) -> Element {
        let mut elements = self.elements.borrow_mut();
        let index = match elements.iter().position(|known| known == element) {
            Some(index) => index,
            None => {
                elements.push(element.clone());
                elements.len() - 1
            }
        };
        Element(index as u64)
    }

    fn get(&self, handle: Element) -> Option<web_sys::Element> {
        let index = usize::try_from(handle.0).ok()?;
        self.elements.borrow().get(index).cloned()
    }
}

/// The live document.
pub struct WebDom {
    window: Window,
    document: Document,
    handles: Rc<Handles>,
    listeners: RefCell<Vec<Closure<dyn FnMut(JQueryEvent)>>>,
    observers: RefCell<Vec<(IntersectionObserver, Closure<dyn FnMut(Array)>)>>,
}

impl WebDom {
    /// `None` outside a browser window.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;

        Some(Self {
            window,
            document,
            handles: Rc::new(Handles::default()),
            listeners: RefCell::new(Vec::new()),
            observers: RefCell::new(Vec::new()),
        })
    }

    fn collect(&self, list: Result<NodeList, JsValue>) -> Vec<Element> {
        // An invalid selector matches nothing.
        let Ok(list) = list else {
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(|el| self.handles.handle(&el))
            .collect()
    }

    fn element(&self, handle: Element) -> Option<web_sys::Element> {
        self.handles.get(handle)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl Dom for WebDom {
    fn query_all(&self, selector: &str) -> Vec<Element> {
        self.collect(self.document.query_selector_all(selector))
    }

    fn find(&self, scope: Element, selector: &str) -> Vec<Element> {
        match self.element(scope) {
            Some(scope) => self.collect(scope.query_selector_all(selector)),
            None => Vec::new(),
        }
    }

    fn prev_sibling(&self, element: Element, selector: &str) -> Option<Element> {
        let prev = self.element(element)?.previous_element_sibling()?;
        match prev.matches(selector) {
            Ok(true) => Some(self.handles.handle(&prev)),
            _ => None,
        }
    }

    fn attr(&self, element: Element, name: &str) -> Option<String> {
        self.element(element)?.get_attribute(name)
    }

    fn add_class(&self, element: Element, class: &str) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&self, element: Element, class: &str) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn has_class(&self, element: Element, class: &str) -> bool {
        self.element(element)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_style(&self, element: Element, property: &str, value: &str) {
        let Some(el) = self.element(element) else {
            return;
        };
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn offset_top(&self, element: Element) -> f64 {
        match self.element(element) {
            Some(el) => el.get_bounding_client_rect().top() + self.scroll_y(),
            None => 0.0,
        }
    }

    fn inner_height(&self, element: Element) -> f64 {
        self.element(element)
            .map(|el| f64::from(el.client_height()))
            .unwrap_or(0.0)
    }

    fn viewport(&self) -> Viewport {
        let window_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map(|root| f64::from(root.scroll_height()))
            .unwrap_or(0.0);

        Viewport {
            scroll_top: self.scroll_y(),
            window_height,
            document_height,
        }
    }

    fn on(&self, target: Target, kind: EventKind, listener: Listener) {
        let name = event_name(&kind).to_string();
        let handles = Rc::clone(&self.handles);

        let closure = Closure::<dyn FnMut(JQueryEvent)>::new(move |event: JQueryEvent| {
            let current = event
                .current_target()
                .dyn_into::<web_sys::Element>()
                .ok()
                .map(|el| handles.handle(&el));
            let dom_event = DomEvent::new(kind.clone(), current);

            listener(&dom_event);

            if dom_event.default_prevented() {
                event.prevent_default();
            }
        });
        let handler: &Function = closure.as_ref().unchecked_ref();

        match &target {
            Target::Window => jquery(self.window.as_ref()).on(&name, handler),
            Target::Element(handle) => match self.element(*handle) {
                Some(el) => jquery(el.as_ref()).on(&name, handler),
                None => return,
            },
            Target::Delegate(selector) => {
                jquery(self.document.as_ref()).on_delegate(&name, selector, handler)
            }
        }

        self.listeners.borrow_mut().push(closure);
    }

    fn observe(
        &self,
        targets: &[Element],
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) {
        let handles = Rc::clone(&self.handles);
        let closure = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
            let entries: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| IntersectionEntry {
                    target: handles.handle(&entry.target()),
                    is_intersecting: entry.is_intersecting(),
                    bounding_top: entry.bounding_client_rect().top(),
                })
                .collect();
            callback(&entries);
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));

        let observer =
            match IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init) {
                Ok(observer) => observer,
                Err(e) => {
                    self.console_error(&format!("IntersectionObserver rejected options: {:?}", e));
                    return;
                }
            };

        for target in targets {
            if let Some(el) = self.element(*target) {
                observer.observe(&el);
            }
        }

        self.observers.borrow_mut().push((observer, closure));
    }

    fn set_timeout(&self, delay_ms: u64, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);

        let scheduled = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay);
        if let Err(e) = scheduled {
            self.console_error(&format!("setTimeout failed: {:?}", e));
        }
    }

    fn animate_scroll(&self, to: f64, duration_ms: u64, easing: Easing, done: Box<dyn FnOnce()>) {
        let root = self
            .document
            .scrolling_element()
            .or_else(|| self.document.document_element());
        let Some(root) = root else {
            done();
            return;
        };

        let properties = Object::new();
        let _ = Reflect::set(&properties, &"scrollTop".into(), &JsValue::from_f64(to));
        let complete = Closure::once_into_js(move || done());

        jquery(root.as_ref()).animate(&properties, duration_ms as f64, easing.as_str(), &complete);
    }

    fn slide_down(&self, element: Element, duration_ms: u64) {
        if let Some(el) = self.element(element) {
            jquery(el.as_ref()).slide_down(duration_ms as f64);
        }
    }

    fn console_error(&self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
    }
}

/// jQuery event name for a kind.
fn event_name(kind: &EventKind) -> &str {
    match kind {
        EventKind::Click => "click",
        EventKind::Load => "load",
        EventKind::Scroll => "scroll",
        EventKind::Resize => "resize",
        EventKind::Custom(name) => name.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_match_jquery() {
        assert_eq!(event_name(&EventKind::Click), "click");
        assert_eq!(event_name(&EventKind::Resize), "resize");
        assert_eq!(event_name(&EventKind::Custom("opening".to_string())), "opening");
    }
}
