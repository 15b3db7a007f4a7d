use scroll_fx_protocol::{ClassToken, DomCommand, ElementId, Fragment};
use tracing::trace;

use crate::config::NavConfig;
use crate::layout::Layout;

#[derive(Debug, Clone)]
struct NavLink {
    id: ElementId,
    fragment: Fragment,
    active: bool,
}

#[derive(Debug, Clone)]
struct Section {
    id: ElementId,
    fragment: Fragment,
}

/// Scroll-driven navigation state: the bar's `scrolled` flag and the
/// `active` highlight on the link of the current section.
#[derive(Debug, Clone)]
pub struct NavState {
    bar: Option<ElementId>,
    scrolled: bool,
    links: Vec<NavLink>,
    /// Document order.
    sections: Vec<Section>,
    scrolled_threshold: f64,
    scan_line: f64,
}

impl NavState {
    pub fn new(config: &NavConfig) -> Self {
        Self {
            bar: None,
            scrolled: false,
            links: Vec::new(),
            sections: Vec::new(),
            scrolled_threshold: config.scrolled_threshold,
            scan_line: config.scan_line,
        }
    }

    pub fn set_bar(&mut self, id: ElementId) {
        self.bar = Some(id);
    }

    pub fn add_link(&mut self, id: ElementId, fragment: Fragment) {
        if self.links.iter().any(|l| l.id == id) {
            return;
        }
        self.links.push(NavLink {
            id,
            fragment,
            active: false,
        });
    }

    /// Sections must be added in document order.
    pub fn add_section(&mut self, id: ElementId, fragment: Fragment) {
        if self.sections.iter().any(|s| s.id == id) {
            return;
        }
        self.sections.push(Section { id, fragment });
    }

    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    /// Fragment of the highlighted section, if any.
    pub fn active(&self) -> Option<&Fragment> {
        self.links.iter().find(|l| l.active).map(|l| &l.fragment)
    }

    /// Recompute both flags. Only changes are emitted.
    pub fn update(&mut self, layout: &dyn Layout) -> Vec<DomCommand> {
        let mut commands = Vec::new();
        self.update_scrolled(layout.viewport().scroll_y, &mut commands);
        self.update_active(layout, &mut commands);
        commands
    }

    fn update_scrolled(&mut self, scroll_y: f64, commands: &mut Vec<DomCommand>) {
        let Some(bar) = self.bar else {
            return;
        };
        let scrolled = scroll_y >= self.scrolled_threshold;
        if scrolled == self.scrolled {
            return;
        }
        self.scrolled = scrolled;
        commands.push(if scrolled {
            DomCommand::AddClass {
                target: bar,
                class: ClassToken::Scrolled,
            }
        } else {
            DomCommand::RemoveClass {
                target: bar,
                class: ClassToken::Scrolled,
            }
        });
    }

    fn update_active(&mut self, layout: &dyn Layout, commands: &mut Vec<DomCommand>) {
        // Overlapping sections both straddle the line; the later one wins.
        let current = self
            .sections
            .iter()
            .rev()
            .find(|s| layout.rect(s.id).is_some_and(|r| r.straddles(self.scan_line)))
            .map(|s| s.fragment.clone());

        let Some(current) = current else {
            return;
        };
        trace!(section = %current, "current section");

        for link in &mut self.links {
            let active = link.fragment == current;
            if active == link.active {
                continue;
            }
            link.active = active;
            commands.push(if active {
                DomCommand::AddClass {
                    target: link.id,
                    class: ClassToken::Active,
                }
            } else {
                DomCommand::RemoveClass {
                    target: link.id,
                    class: ClassToken::Active,
                }
            });
        }
    }
}
