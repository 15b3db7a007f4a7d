//! Click-driven effects: in-page anchor scrolling, ripples, and image
//! load marking.

use std::collections::HashSet;

use scroll_fx_protocol::{ClassToken, DomCommand, ElementId, Fragment, Rect};

/// Resolve a click on an in-page link.
///
/// Returns the scroll command when the default navigation should be
/// prevented. Placeholder hrefs (`#`, `#!`) and links to missing targets
/// are left to the browser. `target_top` is the target's document offset,
/// looked up by the host from the fragment.
pub fn anchor_scroll(
    href: &str,
    target_top: impl FnOnce(&Fragment) -> Option<f64>,
    offset: f64,
) -> Option<DomCommand> {
    let fragment = Fragment::from_href(href)?;
    let top = target_top(&fragment)?;
    Some(DomCommand::ScrollTo {
        top: (top - offset).max(0.0),
        smooth: true,
    })
}

/// Ripple centred on the click point, sized to cover the host element.
pub fn ripple(
    host: ElementId,
    rect: &Rect,
    client_x: f64,
    client_y: f64,
    lifetime_ms: u32,
) -> DomCommand {
    let size = rect.w.max(rect.h);
    DomCommand::SpawnRipple {
        host,
        size,
        x: client_x - rect.left() - size / 2.0,
        y: client_y - rect.top() - size / 2.0,
        lifetime_ms,
    }
}

/// Images that already received `loaded`.
#[derive(Debug, Clone, Default)]
pub struct ImageTracker {
    loaded: HashSet<ElementId>,
}

impl ImageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an image loaded. Emits the class once per image.
    pub fn mark_loaded(&mut self, id: ElementId) -> Option<DomCommand> {
        self.loaded.insert(id).then_some(DomCommand::AddClass {
            target: id,
            class: ClassToken::Loaded,
        })
    }

    pub fn is_loaded(&self, id: ElementId) -> bool {
        self.loaded.contains(&id)
    }
}
