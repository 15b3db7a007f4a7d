use scroll_fx_protocol::{DomCommand, ElementId};

use crate::layout::Layout;

/// An element displaced vertically in proportion to the scroll offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxTarget {
    pub id: ElementId,
    pub rate: f64,
    /// Element whose document top is subtracted from the scroll offset
    /// before scaling. Plain targets have none.
    pub anchor: Option<ElementId>,
    pub max_scroll: Option<f64>,
}

impl ParallaxTarget {
    pub fn plain(id: ElementId, rate: f64) -> Self {
        Self {
            id,
            rate,
            anchor: None,
            max_scroll: None,
        }
    }

    /// The `index`-th background layer of `container`: deeper layers move
    /// faster.
    pub fn layer(id: ElementId, container: ElementId, index: usize, base_rate: f64) -> Self {
        Self {
            id,
            rate: base_rate * (index + 1) as f64,
            anchor: Some(container),
            max_scroll: None,
        }
    }
}

/// Vertical offset for a target at `scroll_y`, relative to `anchor_top`.
pub fn parallax_offset(scroll_y: f64, anchor_top: f64, rate: f64) -> f64 {
    (scroll_y - anchor_top) * rate
}

#[derive(Debug, Clone, Default)]
pub struct ParallaxApplier {
    targets: Vec<ParallaxTarget>,
}

impl ParallaxApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: ParallaxTarget) {
        if self.targets.iter().any(|t| t.id == target.id) {
            return;
        }
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Transforms for every target currently intersecting the viewport.
    ///
    /// Off-screen targets keep whatever transform they had; targets whose
    /// element (or anchor) is gone are skipped.
    pub fn update(&self, layout: &dyn Layout) -> Vec<DomCommand> {
        let viewport = layout.viewport();
        let mut commands = Vec::new();
        for target in &self.targets {
            if target
                .max_scroll
                .is_some_and(|max| viewport.scroll_y >= max)
            {
                continue;
            }
            let Some(rect) = layout.rect(target.id) else {
                continue;
            };
            if !rect.intersects_viewport(viewport.height) {
                continue;
            }
            let anchor_top = match target.anchor {
                Some(anchor) => match layout.document_top(anchor) {
                    Some(top) => top,
                    None => continue,
                },
                None => 0.0,
            };
            commands.push(DomCommand::SetTranslateY {
                target: target.id,
                offset: parallax_offset(viewport.scroll_y, anchor_top, target.rate),
            });
        }
        commands
    }
}
