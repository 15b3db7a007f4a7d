//! One-shot reveal animations.
//!
//! Each registered element starts `Pending`. The first intersection change
//! that shows at least `threshold` of it moves it to `InView` and emits its
//! terminal class; nothing ever moves it back.

use std::collections::HashMap;

use scroll_fx_protocol::{ClassToken, DomCommand, ElementId, Rect};
use tracing::debug;

use crate::config::RootMargin;
use crate::layout::Layout;
use crate::observer::{IntersectionEntry, ObserveOptions, ObserverBackend};

/// Ratios reported by browsers at exactly the threshold carry rounding
/// error.
const RATIO_EPSILON: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    InView,
}

/// What the host knows about an element when it registers it.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSpec {
    pub id: ElementId,
    pub class: ClassToken,
    pub options: ObserveOptions,
    /// Number of direct children to stagger, if the element is a stagger
    /// container.
    pub stagger_children: Option<usize>,
    /// Per-position delay for elements revealed in the same batch.
    pub batch_stagger_ms: Option<u32>,
}

#[derive(Debug, Clone)]
struct RevealTarget {
    spec: RevealSpec,
    state: RevealState,
    observed: bool,
}

/// Registry of reveal targets keyed by element.
#[derive(Debug, Clone)]
pub struct RevealRegistry {
    targets: HashMap<ElementId, RevealTarget>,
    /// Registration order, so batches are applied in document order.
    order: Vec<ElementId>,
    stagger_step_ms: u32,
}

impl RevealRegistry {
    pub fn new(stagger_step_ms: u32) -> Self {
        Self {
            targets: HashMap::new(),
            order: Vec::new(),
            stagger_step_ms,
        }
    }

    /// Register an element. Returns `false` if it was already registered,
    /// in which case the existing registration is kept untouched.
    pub fn register(&mut self, spec: RevealSpec) -> bool {
        if self.targets.contains_key(&spec.id) {
            return false;
        }
        let id = spec.id;
        self.targets.insert(
            id,
            RevealTarget {
                spec,
                state: RevealState::Pending,
                observed: false,
            },
        );
        self.order.push(id);
        true
    }

    pub fn state(&self, id: ElementId) -> Option<RevealState> {
        self.targets.get(&id).map(|t| t.state)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.targets
            .values()
            .filter(|t| t.state == RevealState::Pending)
            .count()
    }

    /// Hand every pending, not yet observed target to the backend.
    pub fn observe_pending(&mut self, backend: &mut dyn ObserverBackend) {
        for id in &self.order {
            if let Some(target) = self.targets.get_mut(id)
                && target.state == RevealState::Pending
                && !target.observed
            {
                backend.observe(*id, &target.spec.options);
                target.observed = true;
            }
        }
    }

    /// Forget which targets the backend knows about (after a disconnect).
    pub fn mark_unobserved(&mut self) {
        for target in self.targets.values_mut() {
            target.observed = false;
        }
    }

    /// Apply a batch of intersection changes. Revealed targets are removed
    /// from the backend. A target's position in `entries` is its batch index.
    pub fn apply(
        &mut self,
        entries: &[IntersectionEntry],
        backend: &mut dyn ObserverBackend,
    ) -> Vec<DomCommand> {
        let mut commands = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            if self.reveal(entry, index, &mut commands) {
                backend.unobserve(entry.target);
                if let Some(target) = self.targets.get_mut(&entry.target) {
                    target.observed = false;
                }
            }
        }
        commands
    }

    /// Test every pending target against the current layout, for hosts
    /// without a native observer.
    pub fn scan(&mut self, layout: &dyn Layout) -> Vec<DomCommand> {
        let viewport = layout.viewport();
        let entries: Vec<IntersectionEntry> = self
            .order
            .iter()
            .filter_map(|id| {
                let target = self.targets.get(id)?;
                if target.state != RevealState::Pending {
                    return None;
                }
                let rect = layout.rect(*id)?;
                let (is_intersecting, ratio) = visible_ratio(
                    &rect,
                    viewport.width,
                    viewport.height,
                    &target.spec.options.root_margin,
                );
                Some(IntersectionEntry {
                    target: *id,
                    is_intersecting,
                    ratio,
                })
            })
            .collect();

        let mut commands = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            self.reveal(entry, index, &mut commands);
        }
        commands
    }

    fn reveal(
        &mut self,
        entry: &IntersectionEntry,
        index: usize,
        commands: &mut Vec<DomCommand>,
    ) -> bool {
        let Some(target) = self.targets.get_mut(&entry.target) else {
            return false;
        };
        if target.state == RevealState::InView || !entry.is_intersecting {
            return false;
        }
        if entry.ratio + RATIO_EPSILON < target.spec.options.threshold {
            return false;
        }

        target.state = RevealState::InView;
        debug!(
            element = %entry.target,
            class = %target.spec.class,
            ratio = entry.ratio,
            "revealed"
        );
        if let Some(step) = target.spec.batch_stagger_ms {
            // The delay has to be in place before the class starts the
            // transition.
            commands.push(DomCommand::SetTransitionDelay {
                target: entry.target,
                delay_ms: (index as u32).saturating_mul(step),
            });
        }
        commands.push(DomCommand::AddClass {
            target: entry.target,
            class: target.spec.class,
        });
        if let Some(children) = target.spec.stagger_children {
            commands.extend(stagger(entry.target, children, self.stagger_step_ms));
        }
        true
    }
}

/// Per-child transition delays for a stagger container: child `i` waits
/// `i × step_ms`.
pub fn stagger(container: ElementId, children: usize, step_ms: u32) -> Vec<DomCommand> {
    (0..children)
        .map(|child| DomCommand::SetChildTransitionDelay {
            container,
            child,
            delay_ms: (child as u32).saturating_mul(step_ms),
        })
        .collect()
}

/// Intersection of `rect` with the viewport grown (or shrunk) by `margin`,
/// computed the way `IntersectionObserver` does.
///
/// Returns `(is_intersecting, ratio)`. Edge-adjacent rects intersect with a
/// ratio of zero; a zero-area rect that intersects has a ratio of one.
pub fn visible_ratio(
    rect: &Rect,
    viewport_width: f64,
    viewport_height: f64,
    margin: &RootMargin,
) -> (bool, f64) {
    let root_top = -margin.top;
    let root_bottom = viewport_height + margin.bottom;
    let root_left = -margin.left;
    let root_right = viewport_width + margin.right;

    let top = rect.top().max(root_top);
    let bottom = rect.bottom().min(root_bottom);
    let left = rect.left().max(root_left);
    let right = (rect.left() + rect.w).min(root_right);

    if bottom < top || right < left {
        return (false, 0.0);
    }

    let area = rect.w * rect.h;
    if area <= 0.0 {
        return (true, 1.0);
    }
    (true, ((bottom - top) * (right - left)) / area)
}
