use serde::{Deserialize, Serialize};

/// Opaque handle for a DOM element registered by the host.
///
/// The core never owns elements; it only refers to them by the handle the
/// host assigned when it discovered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A bounding rectangle relative to the viewport, as returned by
/// `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Whether any part of the rect lies inside a viewport of the given
    /// height. Edges touching the viewport count as visible.
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.bottom() >= 0.0 && self.top() <= viewport_height
    }

    /// Whether the horizontal line `y` passes through this rect, edges
    /// included.
    pub fn straddles(&self, y: f64) -> bool {
        self.top() <= y && self.bottom() >= y
    }
}

/// Scroll state of the window at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// `window.pageYOffset`.
    pub scroll_y: f64,
    /// `window.innerWidth`.
    pub width: f64,
    /// `window.innerHeight`.
    pub height: f64,
    /// `document.documentElement.scrollHeight`.
    pub document_height: f64,
}

impl Viewport {
    /// How far the page can scroll before hitting the bottom.
    pub fn scrollable_height(&self) -> f64 {
        (self.document_height - self.height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partially_visible_rect_intersects() {
        let above = Rect::new(0.0, -300.0, 100.0, 301.0);
        assert!(above.intersects_viewport(800.0));
        let below = Rect::new(0.0, 800.0, 100.0, 50.0);
        assert!(below.intersects_viewport(800.0));
        let gone = Rect::new(0.0, 801.0, 100.0, 50.0);
        assert!(!gone.intersects_viewport(800.0));
    }

    #[test]
    fn straddle_includes_edges() {
        let r = Rect::new(0.0, 100.0, 10.0, 100.0);
        assert!(r.straddles(100.0));
        assert!(r.straddles(200.0));
        assert!(!r.straddles(200.5));
    }

    #[test]
    fn short_page_does_not_scroll() {
        let vp = Viewport {
            scroll_y: 0.0,
            width: 1024.0,
            height: 900.0,
            document_height: 600.0,
        };
        assert_eq!(vp.scrollable_height(), 0.0);
    }
}
