//! Test doubles for driving a [`crate::Coordinator`] without a browser.

use std::collections::{HashMap, HashSet};

use scroll_fx_protocol::{ElementId, Rect, Viewport};

use crate::layout::Layout;
use crate::observer::{ObserveOptions, ObserverBackend};

/// A page frozen at one scroll position.
#[derive(Debug, Clone)]
pub struct StaticLayout {
    viewport: Viewport,
    rects: HashMap<ElementId, Rect>,
}

impl StaticLayout {
    pub fn new(scroll_y: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            viewport: Viewport {
                scroll_y,
                width: 1280.0,
                height: viewport_height,
                document_height,
            },
            rects: HashMap::new(),
        }
    }

    pub fn with_rect(mut self, id: ElementId, rect: Rect) -> Self {
        self.rects.insert(id, rect);
        self
    }

    /// Place an element by its document offset; its viewport rect follows
    /// the current scroll position.
    pub fn with_document_box(self, id: ElementId, top: f64, height: f64) -> Self {
        let y = top - self.viewport.scroll_y;
        let width = self.viewport.width;
        self.with_rect(id, Rect::new(0.0, y, width, height))
    }
}

impl Layout for StaticLayout {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn rect(&self, id: ElementId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }
}

/// Records what the coordinator asked of its observer.
#[derive(Debug, Default)]
pub struct FakeObserver {
    observing: HashMap<ElementId, ObserveOptions>,
    observe_calls: usize,
    unobserved: HashSet<ElementId>,
    disconnects: usize,
    /// Pretend the platform has no intersection observer.
    pub unsupported: bool,
}

impl FakeObserver {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }

    pub fn is_observing(&self, id: ElementId) -> bool {
        self.observing.contains_key(&id)
    }

    pub fn options(&self, id: ElementId) -> Option<&ObserveOptions> {
        self.observing.get(&id)
    }

    pub fn observed_count(&self) -> usize {
        self.observing.len()
    }

    pub fn observe_calls(&self) -> usize {
        self.observe_calls
    }

    pub fn was_unobserved(&self, id: ElementId) -> bool {
        self.unobserved.contains(&id)
    }

    pub fn disconnects(&self) -> usize {
        self.disconnects
    }
}

impl ObserverBackend for FakeObserver {
    fn observe(&mut self, id: ElementId, options: &ObserveOptions) {
        self.observe_calls += 1;
        self.observing.insert(id, *options);
    }

    fn unobserve(&mut self, id: ElementId) {
        self.observing.remove(&id);
        self.unobserved.insert(id);
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.observing.clear();
    }

    fn is_native(&self) -> bool {
        !self.unsupported
    }
}
