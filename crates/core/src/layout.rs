use scroll_fx_protocol::{ElementId, Rect, Viewport};

/// Read access to the page geometry at the moment an event is handled.
///
/// The browser host answers from `window` and `getBoundingClientRect()`;
/// tests answer from a fixed table.
pub trait Layout {
    fn viewport(&self) -> Viewport;

    /// Bounding rect of a registered element relative to the viewport, or
    /// `None` when the element is gone from the document.
    fn rect(&self, id: ElementId) -> Option<Rect>;

    /// Offset of an element's top edge from the top of the document.
    fn document_top(&self, id: ElementId) -> Option<f64> {
        let scroll_y = self.viewport().scroll_y;
        self.rect(id).map(|r| r.top() + scroll_y)
    }
}
