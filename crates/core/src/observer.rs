use scroll_fx_protocol::ElementId;

use crate::config::RootMargin;

/// Options an element is observed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// One intersection change reported by the observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// The single visibility observer shared by every reveal target.
///
/// The browser implementation wraps `IntersectionObserver`; tests use
/// [`crate::testing::FakeObserver`]. Implementations may group elements by
/// their options internally, but the coordinator only ever speaks in
/// element ids.
pub trait ObserverBackend {
    fn observe(&mut self, id: ElementId, options: &ObserveOptions);

    fn unobserve(&mut self, id: ElementId);

    fn disconnect(&mut self);

    /// Whether the backend delivers intersection entries at all. When it
    /// does not, the coordinator tests visibility geometrically on every
    /// frame instead.
    fn is_native(&self) -> bool {
        true
    }
}
