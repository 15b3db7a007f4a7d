use scroll_fx_protocol::{DomCommand, ElementId, Fragment};
use tracing::{debug, trace, warn};

use crate::config::{EffectsConfig, RevealGroup};
use crate::interaction::{self, ImageTracker};
use crate::layout::Layout;
use crate::menu::{MenuEvent, MenuState, MobileMenu};
use crate::nav::NavState;
use crate::observer::{IntersectionEntry, ObserveOptions, ObserverBackend};
use crate::parallax::{ParallaxApplier, ParallaxTarget};
use crate::progress::ProgressBar;
use crate::reveal::{RevealRegistry, RevealSpec, RevealState};
use crate::schedule::{Debounce, FrameThrottle, ResizeTicket};

/// Per-page owner of every scroll effect.
///
/// The host registers the elements it found, calls [`attach`] once, and
/// then forwards browser events. Every handler returns the DOM mutations to
/// apply; a detached coordinator returns none.
///
/// [`attach`]: Coordinator::attach
#[derive(Debug)]
pub struct Coordinator {
    config: EffectsConfig,
    reveal: RevealRegistry,
    parallax: ParallaxApplier,
    nav: NavState,
    menu: MobileMenu,
    progress: Option<ProgressBar>,
    images: ImageTracker,
    frame: FrameThrottle,
    resize: Debounce,
    attached: bool,
    native_observer: bool,
}

impl Coordinator {
    pub fn new(config: EffectsConfig) -> Self {
        Self {
            reveal: RevealRegistry::new(config.reveal.stagger_step_ms),
            parallax: ParallaxApplier::new(),
            nav: NavState::new(&config.nav),
            menu: MobileMenu::default(),
            progress: config.progress_bar.then(ProgressBar::new),
            images: ImageTracker::new(),
            frame: FrameThrottle::new(),
            resize: Debounce::new(config.resize_debounce_ms),
            attached: false,
            native_observer: true,
            config,
        }
    }

    pub fn config(&self) -> &EffectsConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // --- Registration ---

    /// Register an element matched by `group`. Returns `false` for an
    /// element that is already registered.
    pub fn register_reveal(
        &mut self,
        id: ElementId,
        group: &RevealGroup,
        stagger_children: Option<usize>,
    ) -> bool {
        self.reveal.register(RevealSpec {
            id,
            class: group.class,
            options: ObserveOptions {
                threshold: group.threshold,
                root_margin: group.root_margin,
            },
            stagger_children,
            batch_stagger_ms: group.batch_stagger_ms,
        })
    }

    pub fn register_parallax(&mut self, target: ParallaxTarget) {
        self.parallax.add(target);
    }

    pub fn set_nav_bar(&mut self, id: ElementId) {
        self.nav.set_bar(id);
    }

    /// Register a navigation link by its `href`. Links that do not point
    /// into the page are skipped.
    pub fn add_nav_link(&mut self, id: ElementId, href: &str) {
        match Fragment::from_href(href) {
            Some(fragment) => self.nav.add_link(id, fragment),
            None => warn!(href, "navigation link without a section fragment"),
        }
    }

    /// Register a section by its `id` attribute. Call in document order.
    pub fn add_section(&mut self, id: ElementId, section_id: &str) {
        if section_id.is_empty() {
            return;
        }
        self.nav.add_section(id, Fragment::new(section_id));
    }

    pub fn set_menu(&mut self, menu: Option<ElementId>, overlay: Option<ElementId>) {
        self.menu = MobileMenu::new(menu, overlay);
    }

    /// Observe reveal targets registered since the last call. Hosts call
    /// this after injecting new markup into an attached page.
    pub fn sync_observer(&mut self, observer: &mut dyn ObserverBackend) {
        if self.attached && self.native_observer {
            self.reveal.observe_pending(observer);
        }
    }

    // --- Lifecycle ---

    /// Start reacting to events. Returns `true` when the host should
    /// request an animation frame to paint the initial state.
    pub fn attach(&mut self, observer: &mut dyn ObserverBackend) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        self.native_observer = observer.is_native();
        if self.native_observer {
            self.reveal.observe_pending(observer);
        }
        debug!(
            reveal = self.reveal.len(),
            parallax = self.parallax.len(),
            native_observer = self.native_observer,
            "coordinator attached"
        );
        self.frame.request()
    }

    /// Stop reacting to events and drop pending frame and resize work.
    pub fn detach(&mut self, observer: &mut dyn ObserverBackend) {
        if !self.attached {
            return;
        }
        observer.disconnect();
        self.reveal.mark_unobserved();
        self.frame.complete();
        self.resize.cancel();
        self.attached = false;
        debug!("coordinator detached");
    }

    // --- Events ---

    /// A scroll event. Returns `true` when the host must request a frame.
    pub fn on_scroll(&mut self) -> bool {
        self.attached && self.frame.request()
    }

    /// The animation frame requested after [`on_scroll`].
    ///
    /// [`on_scroll`]: Coordinator::on_scroll
    pub fn on_frame(&mut self, layout: &dyn Layout) -> Vec<DomCommand> {
        self.frame.complete();
        if !self.attached {
            return Vec::new();
        }
        self.recompute(layout)
    }

    /// A resize event. The host arms a timer for the returned ticket.
    pub fn on_resize(&mut self) -> Option<ResizeTicket> {
        self.attached.then(|| self.resize.trigger())
    }

    /// A resize timer fired. Only the most recent ticket recomputes.
    pub fn on_resize_timeout(
        &mut self,
        ticket: ResizeTicket,
        layout: &dyn Layout,
    ) -> Vec<DomCommand> {
        if !self.attached || !self.resize.fire(ticket) {
            return Vec::new();
        }
        debug!("resize settled");
        self.recompute(layout)
    }

    pub fn on_intersection(
        &mut self,
        entries: &[IntersectionEntry],
        observer: &mut dyn ObserverBackend,
    ) -> Vec<DomCommand> {
        if !self.attached {
            return Vec::new();
        }
        self.reveal.apply(entries, observer)
    }

    pub fn on_menu(&mut self, event: MenuEvent, body_overflow: &str) -> Vec<DomCommand> {
        if !self.attached {
            return Vec::new();
        }
        self.menu.handle(event, body_overflow)
    }

    /// A click on an in-page link. `Some` means: prevent the default and
    /// apply the command.
    pub fn on_anchor_click(
        &self,
        href: &str,
        target_top: impl FnOnce(&Fragment) -> Option<f64>,
    ) -> Option<DomCommand> {
        if !self.attached {
            return None;
        }
        interaction::anchor_scroll(href, target_top, self.config.anchor_offset)
    }

    pub fn on_card_click(
        &self,
        card: ElementId,
        client_x: f64,
        client_y: f64,
        layout: &dyn Layout,
    ) -> Option<DomCommand> {
        if !self.attached {
            return None;
        }
        let rect = layout.rect(card)?;
        Some(interaction::ripple(
            card,
            &rect,
            client_x,
            client_y,
            self.config.ripple_lifetime_ms,
        ))
    }

    /// An image finished loading. Images that loaded while detached are
    /// picked up by the host's scan on the next attach.
    pub fn on_image_loaded(&mut self, image: ElementId) -> Option<DomCommand> {
        if !self.attached {
            return None;
        }
        self.images.mark_loaded(image)
    }

    // --- Queries ---

    pub fn reveal_state(&self, id: ElementId) -> Option<RevealState> {
        self.reveal.state(id)
    }

    pub fn active_section(&self) -> Option<&Fragment> {
        self.nav.active()
    }

    pub fn is_scrolled(&self) -> bool {
        self.nav.is_scrolled()
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu.state()
    }

    fn recompute(&mut self, layout: &dyn Layout) -> Vec<DomCommand> {
        let viewport = layout.viewport();
        trace!(scroll_y = viewport.scroll_y, "recompute");
        let mut commands = self.parallax.update(layout);
        commands.extend(self.nav.update(layout));
        if let Some(progress) = &mut self.progress {
            commands.extend(progress.update(&viewport));
        }
        if !self.native_observer {
            commands.extend(self.reveal.scan(layout));
        }
        commands
    }
}
