use serde::{Deserialize, Serialize};

use crate::classes::ClassToken;
use crate::types::ElementId;

/// A single DOM mutation.
///
/// The core emits a `Vec<DomCommand>` for each event it handles. Hosts
/// apply the list in order; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomCommand {
    /// Add a class to an element. Adding a class it already has is harmless.
    AddClass { target: ElementId, class: ClassToken },

    /// Remove a class from an element.
    RemoveClass { target: ElementId, class: ClassToken },

    /// Set `transform: translateY(<offset>px)` on an element.
    SetTranslateY { target: ElementId, offset: f64 },

    /// Set `transition-delay` on an element.
    SetTransitionDelay { target: ElementId, delay_ms: u32 },

    /// Set `transition-delay` on the `child`-th direct child of `container`.
    SetChildTransitionDelay {
        container: ElementId,
        child: usize,
        delay_ms: u32,
    },

    /// Set `document.body.style.overflow`. An empty value clears it.
    SetBodyOverflow { value: String },

    /// Set the width of the scroll progress bar, in percent.
    SetProgress { percent: f64 },

    /// Scroll the window to a document offset.
    ScrollTo { top: f64, smooth: bool },

    /// Append a ripple span to `host` and remove it after `lifetime_ms`.
    SpawnRipple {
        host: ElementId,
        size: f64,
        x: f64,
        y: f64,
        lifetime_ms: u32,
    },
}

impl DomCommand {
    /// The element this command writes to, if it targets one.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            DomCommand::AddClass { target, .. }
            | DomCommand::RemoveClass { target, .. }
            | DomCommand::SetTranslateY { target, .. }
            | DomCommand::SetTransitionDelay { target, .. } => Some(*target),
            DomCommand::SetChildTransitionDelay { container, .. } => Some(*container),
            DomCommand::SpawnRipple { host, .. } => Some(*host),
            DomCommand::SetBodyOverflow { .. }
            | DomCommand::SetProgress { .. }
            | DomCommand::ScrollTo { .. } => None,
        }
    }

    /// CSS value for a `SetTranslateY` offset, e.g. `translateY(-100px)`.
    pub fn translate_y_css(offset: f64) -> String {
        // Avoid rendering `-0px` for a zero offset with a negative rate.
        let offset = if offset == 0.0 { 0.0 } else { offset };
        format!("translateY({offset}px)")
    }
}
