//! Staggered class activation as elements scroll into view.

use std::rc::Rc;

use crate::behaviors::{later, observer, report, require_all};
use crate::dom::{Dom, IntersectionEntry, ObserverOptions};
use crate::error::{require_non_empty, UiError};

/// Hook replacing the default class activation; receives the entry and its
/// index within the delivered batch.
pub type IntersectHook = Rc<dyn Fn(&IntersectionEntry, usize)>;

/// Options for [`fade_in_on_scroll`].
#[derive(Clone)]
pub struct FadeInOptions {
    /// Bottom root margin in percent of the viewport height. Negative values
    /// trigger later. Default `-30`.
    pub offset_percent: f64,

    /// Extra delay per position in a batch. Default `100` ms.
    pub delay_increment_ms: u64,

    /// Default `is-active`.
    pub active_class: String,

    /// Runs instead of adding `active_class` when set.
    pub on_intersect: Option<IntersectHook>,
}

impl Default for FadeInOptions {
    fn default() -> Self {
        Self {
            offset_percent: -30.0,
            delay_increment_ms: 100,
            active_class: "is-active".to_string(),
            on_intersect: None,
        }
    }
}

impl FadeInOptions {
    pub fn validate(&self) -> Result<(), UiError> {
        if !self.offset_percent.is_finite() {
            return Err(UiError::invalid("offset_percent", "must be finite"));
        }
        require_non_empty("active_class", &self.active_class)
    }

    pub fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            root_margin: format!("0px 0px {}%", self.offset_percent),
            threshold: 0.0,
        }
    }
}

/// Observe every element matching `selector`. Each intersecting entry at
/// batch index `i` is activated after `data-delay + i * delay_increment_ms`
/// milliseconds (`data-delay` defaults to 0).
pub fn fade_in_on_scroll<D: Dom + 'static>(dom: &Rc<D>, selector: &str, options: FadeInOptions) {
    if let Err(e) = bind(dom, selector, options) {
        report(&**dom, e);
    }
}

fn bind<D: Dom + 'static>(
    dom: &Rc<D>,
    selector: &str,
    options: FadeInOptions,
) -> Result<(), UiError> {
    options.validate()?;
    let targets = require_all(&**dom, selector, "Fade-in target")?;
    let observer_options = options.observer_options();

    let callback = observer(dom, move |dom, entries| {
        for (index, entry) in entries.iter().enumerate() {
            if !entry.is_intersecting {
                continue;
            }

            let delay = dom
                .data(entry.target, "delay")
                .and_then(|d| d.trim().parse::<u64>().ok())
                .unwrap_or(0);
            let stagger = (index as u64).saturating_mul(options.delay_increment_ms);
            let timeout = delay.saturating_add(stagger);

            match &options.on_intersect {
                Some(hook) => {
                    let hook = Rc::clone(hook);
                    let entry = entry.clone();
                    later(dom, timeout, move |_| hook(&entry, index));
                }
                None => {
                    let class = options.active_class.clone();
                    let target = entry.target;
                    later(dom, timeout, move |dom| dom.add_class(target, &class));
                }
            }
        }
    });

    dom.observe(&targets, observer_options, callback);
    tracing::debug!("fade-in bound to {} element(s) for {:?}", targets.len(), selector);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;
    use crate::fake::FakeDom;
    use std::cell::RefCell;

    fn entry(target: Element) -> IntersectionEntry {
        IntersectionEntry {
            target,
            is_intersecting: true,
            bounding_top: 400.0,
        }
    }

    fn page(count: usize) -> (Rc<FakeDom>, Vec<Element>) {
        let dom = Rc::new(FakeDom::new());
        let elements = (0..count)
            .map(|_| dom.add(None, "div", &[("class", "fade-element")]))
            .collect();
        (dom, elements)
    }

    #[test]
    fn staggers_activation_within_a_batch() {
        let (dom, els) = page(3);
        fade_in_on_scroll(
            &dom,
            ".fade-element",
            FadeInOptions {
                offset_percent: -40.0,
                delay_increment_ms: 150,
                ..Default::default()
            },
        );

        assert_eq!(dom.observer_options()[0].root_margin, "0px 0px -40%");

        dom.intersect(&[entry(els[0]), entry(els[1]), entry(els[2])]);
        assert_eq!(dom.pending_timers(), vec![0, 150, 300]);

        dom.advance(0);
        assert!(dom.has_class(els[0], "is-active"));
        assert!(!dom.has_class(els[1], "is-active"));

        dom.advance(150);
        assert!(dom.has_class(els[1], "is-active"));
        assert!(!dom.has_class(els[2], "is-active"));

        dom.advance(150);
        assert!(dom.has_class(els[2], "is-active"));
    }

    #[test]
    fn data_delay_is_added_as_milliseconds() {
        let dom = Rc::new(FakeDom::new());
        let el = dom.add(None, "div", &[("class", "fade-element"), ("data-delay", "250")]);

        fade_in_on_scroll(&dom, ".fade-element", FadeInOptions::default());
        dom.intersect(&[entry(el)]);

        assert_eq!(dom.pending_timers(), vec![250]);
    }

    #[test]
    fn huge_data_delay_saturates() {
        let (dom, els) = page(1);
        let late = dom.add(
            None,
            "div",
            &[("class", "fade-element"), ("data-delay", "18446744073709551615")],
        );

        fade_in_on_scroll(&dom, ".fade-element", FadeInOptions::default());
        dom.intersect(&[entry(els[0]), entry(late)]);

        assert_eq!(dom.pending_timers(), vec![0, u64::MAX]);
        dom.advance(0);
        assert!(dom.has_class(els[0], "is-active"));
        assert!(!dom.has_class(late, "is-active"));
    }

    #[test]
    fn ignores_entries_leaving_view() {
        let (dom, els) = page(1);
        fade_in_on_scroll(&dom, ".fade-element", FadeInOptions::default());

        dom.intersect(&[IntersectionEntry {
            is_intersecting: false,
            ..entry(els[0])
        }]);

        assert!(dom.pending_timers().is_empty());
    }

    #[test]
    fn hook_replaces_class_activation() {
        let (dom, els) = page(2);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = seen.clone();
        fade_in_on_scroll(
            &dom,
            ".fade-element",
            FadeInOptions {
                on_intersect: Some(Rc::new(move |entry: &IntersectionEntry, index: usize| {
                    log.borrow_mut().push((entry.target, index))
                })),
                ..Default::default()
            },
        );

        dom.intersect(&[entry(els[0]), entry(els[1])]);
        dom.advance(100);

        assert_eq!(*seen.borrow(), vec![(els[0], 0), (els[1], 1)]);
        assert!(!dom.has_class(els[0], "is-active"));
    }

    #[test]
    fn missing_targets_report_once() {
        let dom = Rc::new(FakeDom::new());
        fade_in_on_scroll(&dom, ".fade-element", FadeInOptions::default());

        assert_eq!(dom.errors().len(), 1);
        assert!(dom.observer_options().is_empty());
    }
}
