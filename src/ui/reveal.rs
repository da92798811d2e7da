use crate::ui::dom::{Dom, Element, ObserverOptions};
use std::collections::BTreeSet;

/// Class that starts the reveal transition.
const REVEALED_CLASS: &str = "active";

/// 15% visible, bottom edge pulled up by 50px.
pub const REVEAL_OPTIONS: ObserverOptions = ObserverOptions {
    threshold: 0.15,
    root_margin_bottom: -50.0,
};

/// One intersection observer record.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    pub target: Element,
    pub is_intersecting: bool,
}

impl ObserverOptions {
    /// Intersection decision for an element at `top` (viewport coordinates)
    /// with the given height, in a viewport `viewport_height` px tall.
    pub fn evaluate(&self, top: f64, height: f64, viewport_height: f64) -> bool {
        let root_bottom = viewport_height + self.root_margin_bottom;
        let visible_top = top.max(0.0);
        let visible_bottom = (top + height).min(root_bottom);

        if height <= 0.0 {
            return top >= 0.0 && top <= root_bottom;
        }

        let visible = (visible_bottom - visible_top).max(0.0);
        visible > 0.0 && visible / height >= self.threshold
    }
}

/// One-shot reveal of elements as they scroll into view.
#[derive(Debug, Clone, Default)]
pub struct RevealObserver {
    observed: BTreeSet<Element>,
}

impl RevealObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts watching every reveal target of the document.
    pub fn observe_all<D: Dom>(&mut self, dom: &mut D) {
        for target in dom.reveal_targets() {
            dom.observe(&target, &REVEAL_OPTIONS);
            self.observed.insert(target);
        }
        tracing::debug!("Observing {} reveal elements", self.observed.len());
    }

    /// Reveals intersecting targets and stops watching them for good.
    pub fn handle<D: Dom>(&mut self, dom: &mut D, entries: &[IntersectionEntry]) {
        for entry in entries.iter().filter(|entry| entry.is_intersecting) {
            if self.observed.remove(&entry.target) {
                dom.set_class(&entry.target, REVEALED_CLASS, true);
                dom.unobserve(&entry.target);
            }
        }
    }

    pub fn is_observing(&self, target: &Element) -> bool {
        self.observed.contains(target)
    }

    pub fn pending(&self) -> usize {
        self.observed.len()
    }
}
