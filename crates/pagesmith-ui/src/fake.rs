//! In-memory [`Dom`] for exercising behaviors without a browser.
//!
//! Supports simple selectors (`tag`, `#id`, `.class`, compounds of those,
//! descendant combinators and comma lists), event dispatch including
//! delegated listeners, manual intersection delivery, and a virtual clock
//! for timers. Animations complete immediately.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::dom::{
    Dom, DomEvent, Easing, Element, EventKind, IntersectionCallback, IntersectionEntry, Listener,
    ObserverOptions, Target, Viewport,
};

#[derive(Debug, Default)]
struct Node {
    tag: String,
    parent: Option<Element>,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    offset_top: f64,
    inner_height: f64,
}

struct Observer {
    targets: Vec<Element>,
    options: ObserverOptions,
    callback: IntersectionCallback,
}

struct Timer {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

/// A recorded `animate_scroll` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    pub to: f64,
    pub duration_ms: u64,
    pub easing: Easing,
}

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    listeners: Vec<(Target, EventKind, Listener)>,
    observers: Vec<Observer>,
    timers: Vec<Timer>,
    now: u64,
    next_seq: u64,
    viewport: Viewport,
    errors: Vec<String>,
    animations: Vec<ScrollAnimation>,
    slides: Vec<(Element, u64)>,
}

/// Fake document.
#[derive(Default)]
pub struct FakeDom {
    state: RefCell<State>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element. `class` is split on whitespace; every other
    /// attribute (including `id`) is stored as given.
    pub fn add(&self, parent: Option<Element>, tag: &str, attrs: &[(&str, &str)]) -> Element {
        let mut node = Node {
            tag: tag.to_ascii_lowercase(),
            parent,
            ..Default::default()
        };

        for (name, value) in attrs {
            if *name == "class" {
                node.classes = value.split_whitespace().map(str::to_string).collect();
            } else {
                node.attrs.insert(name.to_string(), value.to_string());
            }
        }

        let mut state = self.state.borrow_mut();
        state.nodes.push(node);
        Element(state.nodes.len() as u64 - 1)
    }

    /// Set layout metrics for an element.
    pub fn set_box(&self, element: Element, offset_top: f64, inner_height: f64) {
        let mut state = self.state.borrow_mut();
        let node = &mut state.nodes[element.0 as usize];
        node.offset_top = offset_top;
        node.inner_height = inner_height;
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Click an element, running its own and delegated listeners.
    pub fn click(&self, element: Element) -> DomEvent {
        self.dispatch(Some(element), EventKind::Click)
    }

    /// Fire an arbitrary event on an element.
    pub fn trigger(&self, element: Element, kind: EventKind) -> DomEvent {
        self.dispatch(Some(element), kind)
    }

    pub fn trigger_window(&self, kind: EventKind) -> DomEvent {
        self.dispatch(None, kind)
    }

    /// Move the window scroll position and fire `scroll`.
    pub fn scroll_to(&self, scroll_top: f64) {
        self.state.borrow_mut().viewport.scroll_top = scroll_top;
        self.trigger_window(EventKind::Scroll);
    }

    /// Deliver one batch of entries to every observer watching their targets.
    pub fn intersect(&self, entries: &[IntersectionEntry]) {
        let deliveries: Vec<(IntersectionCallback, Vec<IntersectionEntry>)> = {
            let state = self.state.borrow();
            state
                .observers
                .iter()
                .map(|o| {
                    let batch = entries
                        .iter()
                        .filter(|e| o.targets.contains(&e.target))
                        .cloned()
                        .collect::<Vec<_>>();
                    (o.callback.clone(), batch)
                })
                .filter(|(_, batch)| !batch.is_empty())
                .collect()
        };

        for (callback, batch) in deliveries {
            callback(&batch);
        }
    }

    /// Advance the virtual clock, running due timers in order.
    pub fn advance(&self, ms: u64) {
        let until = self.state.borrow().now.saturating_add(ms);

        loop {
            let task = {
                let mut state = self.state.borrow_mut();
                let next = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= until)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);

                match next {
                    Some(i) => {
                        let timer = state.timers.remove(i);
                        state.now = timer.due;
                        timer.task
                    }
                    None => break,
                }
            };
            task();
        }

        self.state.borrow_mut().now = until;
    }

    /// Remaining delay of each pending timer, in scheduling order.
    pub fn pending_timers(&self) -> Vec<u64> {
        let state = self.state.borrow();
        let mut timers: Vec<&Timer> = state.timers.iter().collect();
        timers.sort_by_key(|t| t.seq);
        timers.iter().map(|t| t.due - state.now).collect()
    }

    pub fn style(&self, element: Element, property: &str) -> Option<String> {
        self.state.borrow().nodes[element.0 as usize]
            .styles
            .get(property)
            .cloned()
    }

    pub fn errors(&self) -> Vec<String> {
        self.state.borrow().errors.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    pub fn observer_options(&self) -> Vec<ObserverOptions> {
        self.state
            .borrow()
            .observers
            .iter()
            .map(|o| o.options.clone())
            .collect()
    }

    pub fn animations(&self) -> Vec<ScrollAnimation> {
        self.state.borrow().animations.clone()
    }

    pub fn slides(&self) -> Vec<(Element, u64)> {
        self.state.borrow().slides.clone()
    }

    fn dispatch(&self, target: Option<Element>, kind: EventKind) -> DomEvent {
        let listeners: Vec<Listener> = {
            let state = self.state.borrow();
            state
                .listeners
                .iter()
                .filter(|(_, k, _)| *k == kind)
                .filter(|(t, _, _)| match (t, target) {
                    (Target::Element(bound), Some(el)) => *bound == el,
                    (Target::Window, None) => true,
                    (Target::Delegate(selector), Some(el)) => state.matches(el, selector),
                    _ => false,
                })
                .map(|(_, _, l)| l.clone())
                .collect()
        };

        let event = DomEvent::new(kind, target);
        for listener in listeners {
            listener(&event);
        }
        event
    }
}

impl State {
    fn node(&self, element: Element) -> &Node {
        &self.nodes[element.0 as usize]
    }

    fn elements(&self) -> impl Iterator<Item = Element> + '_ {
        (0..self.nodes.len() as u64).map(Element)
    }

    fn is_descendant(&self, element: Element, ancestor: Element) -> bool {
        let mut current = self.node(element).parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.node(parent).parent;
        }
        false
    }

    fn matches(&self, element: Element, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|complex| self.matches_complex(element, complex))
    }

    /// Right-to-left descendant matching.
    fn matches_complex(&self, element: Element, selector: &str) -> bool {
        let mut parts: Vec<Compound> = selector.split_whitespace().map(Compound::parse).collect();

        let Some(last) = parts.pop() else {
            return false;
        };
        if !last.matches(self.node(element)) {
            return false;
        }

        let mut current = self.node(element).parent;
        while let Some(part) = parts.last() {
            match current {
                Some(ancestor) => {
                    if part.matches(self.node(ancestor)) {
                        parts.pop();
                    }
                    current = self.node(ancestor).parent;
                }
                None => return false,
            }
        }
        true
    }
}

/// `tag#id.class.class`
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(s: &str) -> Self {
        let mut compound = Compound::default();
        let mut kind = ' ';
        let mut buf = String::new();

        let flush = |kind: char, buf: &mut String, compound: &mut Compound| {
            if buf.is_empty() {
                return;
            }
            let value = std::mem::take(buf);
            match kind {
                '#' => compound.id = Some(value),
                '.' => compound.classes.push(value),
                _ => compound.tag = Some(value.to_ascii_lowercase()),
            }
        };

        for c in s.chars() {
            if c == '#' || c == '.' {
                flush(kind, &mut buf, &mut compound);
                kind = c;
            } else {
                buf.push(c);
            }
        }
        flush(kind, &mut buf, &mut compound);

        compound
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != node.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attrs.get("id") != Some(id) {
                return false;
            }
        }
        self.classes.iter().all(|c| node.classes.contains(c))
    }
}

impl Dom for FakeDom {
    fn query_all(&self, selector: &str) -> Vec<Element> {
        let state = self.state.borrow();
        state
            .elements()
            .filter(|el| state.matches(*el, selector))
            .collect()
    }

    fn find(&self, scope: Element, selector: &str) -> Vec<Element> {
        let state = self.state.borrow();
        state
            .elements()
            .filter(|el| state.is_descendant(*el, scope) && state.matches(*el, selector))
            .collect()
    }

    fn prev_sibling(&self, element: Element, selector: &str) -> Option<Element> {
        let state = self.state.borrow();
        let parent = state.node(element).parent;

        let previous = state
            .elements()
            .filter(|el| *el < element && state.node(*el).parent == parent)
            .last()?;

        state.matches(previous, selector).then_some(previous)
    }

    fn attr(&self, element: Element, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let node = state.node(element);
        if name == "class" {
            return Some(node.classes.join(" "));
        }
        node.attrs.get(name).cloned()
    }

    fn add_class(&self, element: Element, class: &str) {
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[element.0 as usize].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, element: Element, class: &str) {
        self.state.borrow_mut().nodes[element.0 as usize]
            .classes
            .retain(|c| c != class);
    }

    fn has_class(&self, element: Element, class: &str) -> bool {
        self.state.borrow().node(element).classes.iter().any(|c| c == class)
    }

    fn set_style(&self, element: Element, property: &str, value: &str) {
        self.state.borrow_mut().nodes[element.0 as usize]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn offset_top(&self, element: Element) -> f64 {
        self.state.borrow().node(element).offset_top
    }

    fn inner_height(&self, element: Element) -> f64 {
        self.state.borrow().node(element).inner_height
    }

    fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    fn on(&self, target: Target, kind: EventKind, listener: Listener) {
        self.state.borrow_mut().listeners.push((target, kind, listener));
    }

    fn observe(
        &self,
        targets: &[Element],
        options: ObserverOptions,
        callback: IntersectionCallback,
    ) {
        self.state.borrow_mut().observers.push(Observer {
            targets: targets.to_vec(),
            options,
            callback,
        });
    }

    fn set_timeout(&self, delay_ms: u64, task: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        let timer = Timer {
            due: state.now.saturating_add(delay_ms),
            seq: state.next_seq,
            task,
        };
        state.next_seq += 1;
        state.timers.push(timer);
    }

    fn animate_scroll(&self, to: f64, duration_ms: u64, easing: Easing, done: Box<dyn FnOnce()>) {
        {
            let mut state = self.state.borrow_mut();
            state.animations.push(ScrollAnimation {
                to,
                duration_ms,
                easing,
            });
            state.viewport.scroll_top = to;
        }
        done();
    }

    fn slide_down(&self, element: Element, duration_ms: u64) {
        let mut state = self.state.borrow_mut();
        state.slides.push((element, duration_ms));
        state.nodes[element.0 as usize]
            .styles
            .insert("display".to_string(), "block".to_string());
    }

    fn console_error(&self, message: &str) {
        self.state.borrow_mut().errors.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn matches_simple_and_descendant_selectors() {
        let dom = FakeDom::new();
        let wrap = dom.add(None, "div", &[("id", "carousel-1")]);
        let swiper = dom.add(Some(wrap), "div", &[("class", "swiper main")]);
        let other = dom.add(None, "div", &[("class", "swiper")]);

        assert_eq!(dom.query_all(".swiper"), vec![swiper, other]);
        assert_eq!(dom.query_all("#carousel-1 .swiper"), vec![swiper]);
        assert_eq!(dom.query_all("div.swiper.main"), vec![swiper]);
        assert_eq!(dom.query_all("#carousel-1, .main"), vec![wrap, swiper]);
        assert!(dom.query_all(".missing").is_empty());
        assert_eq!(dom.find(wrap, ".swiper"), vec![swiper]);
    }

    #[test]
    fn prev_sibling_requires_match() {
        let dom = FakeDom::new();
        let list = dom.add(None, "ul", &[]);
        let content = dom.add(Some(list), "div", &[("class", "c-accordion")]);
        let button = dom.add(Some(list), "button", &[("class", "c-accordion__button")]);

        assert_eq!(dom.prev_sibling(button, ".c-accordion"), Some(content));
        assert_eq!(dom.prev_sibling(button, ".other"), None);
        assert_eq!(dom.prev_sibling(content, "*"), None);
    }

    #[test]
    fn timers_run_in_due_order() {
        let dom = FakeDom::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for (delay, label) in [(30, "c"), (10, "a"), (20, "b")] {
            let log = log.clone();
            dom.set_timeout(delay, Box::new(move || log.borrow_mut().push(label)));
        }

        assert_eq!(dom.pending_timers(), vec![30, 10, 20]);
        dom.advance(20);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        dom.advance(10);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert!(dom.pending_timers().is_empty());
    }

    #[test]
    fn delegated_listeners_fire_for_matching_elements() {
        let dom = FakeDom::new();
        let modal = dom.add(None, "div", &[("class", "remodal")]);
        let plain = dom.add(None, "div", &[]);
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        dom.on(
            Target::Delegate(".remodal".to_string()),
            EventKind::Custom("opening".to_string()),
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        dom.trigger(modal, EventKind::Custom("opening".to_string()));
        dom.trigger(plain, EventKind::Custom("opening".to_string()));
        dom.trigger(modal, EventKind::Click);

        assert_eq!(hits.get(), 1);
    }
}
