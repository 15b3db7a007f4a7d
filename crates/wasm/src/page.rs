use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use js_sys::Array;
use scroll_fx_core::config::{EffectsConfig, MenuConfig};
use scroll_fx_core::parallax::ParallaxTarget;
use scroll_fx_core::{Coordinator, MenuEvent};
use scroll_fx_protocol::ElementId;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget,
    HtmlElement, HtmlImageElement, MouseEvent,
};

use crate::apply::apply;
use crate::dom::{Dom, select_within};
use crate::observer::DomObserver;

const STYLE_ID: &str = "scroll-fx-styles";

const STYLES: &str = "
.scroll-progress {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 3px;
    background: rgba(255, 255, 255, 0.1);
    z-index: 9999;
    pointer-events: none;
}
.scroll-progress-bar {
    height: 100%;
    background: linear-gradient(90deg, #FF3621, #e02d18);
    width: 0%;
    transition: width 0.1s ease-out;
    box-shadow: 0 0 10px rgba(255, 54, 33, 0.5);
}
.ripple-effect {
    position: absolute;
    border-radius: 50%;
    background: rgba(255, 54, 33, 0.4);
    transform: scale(0);
    animation: ripple-animation 0.6s ease-out;
    pointer-events: none;
}
@keyframes ripple-animation {
    to {
        transform: scale(4);
        opacity: 0;
    }
}
";

pub type Shared = Rc<RefCell<PageState>>;

struct Binding {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Event listeners owned by the page, removable as a group.
struct Listeners {
    bindings: Vec<Binding>,
    /// (element, role) pairs already bound, so rescans don't double up.
    claimed: HashSet<(ElementId, &'static str)>,
    frame: Closure<dyn FnMut()>,
}

impl Listeners {
    fn claim(&mut self, id: ElementId, role: &'static str) -> bool {
        self.claimed.insert((id, role))
    }

    fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        callback: Closure<dyn FnMut(Event)>,
    ) {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        let added = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            callback.as_ref().unchecked_ref(),
            &options,
        );
        if let Err(e) = added {
            warn!(event, error = ?e, "addEventListener failed");
            return;
        }
        self.bindings.push(Binding {
            target: target.clone(),
            event,
            callback,
        });
    }

    fn remove_all(&mut self) {
        for binding in self.bindings.drain(..) {
            binding
                .target
                .remove_event_listener_with_callback(
                    binding.event,
                    binding.callback.as_ref().unchecked_ref(),
                )
                .ok();
        }
        self.claimed.clear();
    }
}

pub struct PageState {
    pub coordinator: Coordinator,
    pub observer: DomObserver,
    pub dom: Dom,
    listeners: Listeners,
    overlay: Option<Element>,
    menu_ids: Option<(Option<ElementId>, Option<ElementId>)>,
    this: Weak<RefCell<PageState>>,
}

/// Build the page state. Nothing is bound until [`attach`].
pub fn create(config: EffectsConfig) -> Result<Shared, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let native = js_sys::Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
        .unwrap_or(false);
    let dom = Dom::new(window, document);

    Ok(Rc::new_cyclic(|this: &Weak<RefCell<PageState>>| {
        let callback = native.then(|| intersection_callback(this.clone()));
        RefCell::new(PageState {
            coordinator: Coordinator::new(config),
            observer: DomObserver::new(dom.table.clone(), callback),
            listeners: Listeners {
                bindings: Vec::new(),
                claimed: HashSet::new(),
                frame: frame_callback(this.clone()),
            },
            dom,
            overlay: None,
            menu_ids: None,
            this: this.clone(),
        })
    }))
}

pub fn document_loading(document: &Document) -> bool {
    document.ready_state() == "loading"
}

/// Run `f` against the page if it is still alive and not already borrowed.
fn with_page(this: &Weak<RefCell<PageState>>, f: impl FnOnce(&mut PageState)) {
    let Some(state) = this.upgrade() else {
        return;
    };
    let Ok(mut page) = state.try_borrow_mut() else {
        return;
    };
    f(&mut *page);
}

fn intersection_callback(this: Weak<RefCell<PageState>>) -> Closure<dyn FnMut(Array)> {
    Closure::new(move |batch: Array| {
        with_page(&this, |page| {
            let entries = page.observer.entries(&batch);
            let commands = page.coordinator.on_intersection(&entries, &mut page.observer);
            apply(&page.dom, &commands);
        });
    })
}

fn frame_callback(this: Weak<RefCell<PageState>>) -> Closure<dyn FnMut()> {
    Closure::new(move || {
        with_page(&this, run_frame);
    })
}

fn run_frame(page: &mut PageState) {
    let commands = page.coordinator.on_frame(&page.dom);
    apply(&page.dom, &commands);
}

fn request_frame(page: &mut PageState) {
    let frame: &js_sys::Function = page.listeners.frame.as_ref().unchecked_ref();
    if let Err(e) = page.dom.window.request_animation_frame(frame) {
        warn!(error = ?e, "requestAnimationFrame failed; running frame inline");
        run_frame(page);
    }
}

/// Wrap a page handler as a DOM event listener.
fn handler(
    this: &Weak<RefCell<PageState>>,
    f: impl Fn(&mut PageState, &Event) + 'static,
) -> Closure<dyn FnMut(Event)> {
    let this = this.clone();
    Closure::new(move |event: Event| with_page(&this, |page| f(page, &event)))
}

/// Bind window listeners, discover elements, and start observing.
pub fn attach(page: &mut PageState) {
    if page.coordinator.is_attached() {
        return;
    }
    install_styles(page);

    let window: EventTarget = page.dom.window.clone().into();
    let on_scroll = handler(&page.this, |page, _| {
        if page.coordinator.on_scroll() {
            request_frame(page);
        }
    });
    page.listeners.add(&window, "scroll", true, on_scroll);

    let on_resize = handler(&page.this, |page, _| {
        let Some(ticket) = page.coordinator.on_resize() else {
            return;
        };
        let this = page.this.clone();
        let settle = Closure::once_into_js(move || {
            with_page(&this, |page| {
                let commands = page.coordinator.on_resize_timeout(ticket, &page.dom);
                apply(&page.dom, &commands);
            });
        });
        let armed = page
            .dom
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                settle.unchecked_ref(),
                i32::try_from(ticket.wait_ms).unwrap_or(i32::MAX),
            );
        if let Err(e) = armed {
            warn!(error = ?e, "setTimeout failed");
        }
    });
    page.listeners.add(&window, "resize", true, on_resize);

    let first_frame = page.coordinator.attach(&mut page.observer);
    discover(page);
    if first_frame {
        request_frame(page);
    }
}

/// Remove every listener and disconnect the observer.
pub fn detach(page: &mut PageState) {
    page.coordinator.detach(&mut page.observer);
    page.listeners.remove_all();
}

/// Pick up elements added since the last scan (e.g. injected sections).
pub fn refresh(page: &mut PageState) {
    discover(page);
    if page.coordinator.is_attached() && page.coordinator.on_scroll() {
        request_frame(page);
    }
}

fn install_styles(page: &mut PageState) {
    let document = &page.dom.document;
    if document.get_element_by_id(STYLE_ID).is_none()
        && let Ok(style) = document.create_element("style")
    {
        style.set_id(STYLE_ID);
        style.set_text_content(Some(STYLES));
        if let Some(head) = document.head() {
            head.append_child(&style).ok();
        }
    }

    if !page.coordinator.config().progress_bar || page.dom.progress_bar.is_some() {
        return;
    }
    let Some(body) = document.body() else {
        return;
    };
    let created = create_progress_bar(document, &body);
    match created {
        Ok(bar) => page.dom.progress_bar = Some(bar),
        Err(e) => warn!(error = ?e, "could not create progress bar"),
    }
}

fn create_progress_bar(document: &Document, body: &HtmlElement) -> Result<HtmlElement, JsValue> {
    let track = document.create_element("div")?;
    track.set_class_name("scroll-progress");
    let bar: HtmlElement = document.create_element("div")?.dyn_into()?;
    bar.set_class_name("scroll-progress-bar");
    track.append_child(&bar)?;
    body.append_child(&track)?;
    Ok(bar)
}

/// Register every configured element with the coordinator and, while
/// attached, bind the click and load listeners that feed it.
fn discover(page: &mut PageState) {
    let config = page.coordinator.config().clone();
    let dom = page.dom.clone();
    let table = &dom.table;

    if let Some(bar) = dom.select_first(&config.nav.bar_selector) {
        page.coordinator.set_nav_bar(table.register(&bar));
    }
    for link in dom.select_all(&config.nav.link_selector) {
        if let Some(href) = link.get_attribute("href") {
            page.coordinator.add_nav_link(table.register(&link), &href);
        }
    }
    for section in dom.select_all(&config.nav.section_selector) {
        page.coordinator
            .add_section(table.register(&section), &section.id());
    }

    for group in &config.reveal.groups {
        for element in dom.select_all(&group.selector_list()) {
            let stagger = element
                .class_list()
                .contains(&config.reveal.stagger_class)
                .then(|| element.child_element_count() as usize);
            page.coordinator
                .register_reveal(table.register(&element), group, stagger);
        }
    }

    for rule in &config.parallax {
        match &rule.within {
            Some(container_selector) => {
                for container in dom.select_all(container_selector) {
                    let container_id = table.register(&container);
                    for (index, layer) in select_within(&container, &rule.selector)
                        .iter()
                        .enumerate()
                    {
                        let mut target = ParallaxTarget::layer(
                            table.register(layer),
                            container_id,
                            index,
                            rule.rate,
                        );
                        target.max_scroll = rule.max_scroll;
                        page.coordinator.register_parallax(target);
                    }
                }
            }
            None => {
                for element in dom.select_all(&rule.selector) {
                    let mut target = ParallaxTarget::plain(table.register(&element), rule.rate);
                    target.max_scroll = rule.max_scroll;
                    page.coordinator.register_parallax(target);
                }
            }
        }
    }

    // Listeners are owned by an attached page; a detached rescan only
    // records elements for the next attach.
    if page.coordinator.is_attached() {
        bind_menu(page, &dom, &config.menu);
        bind_clicks(page, &dom, &config);
        bind_images(page, &dom);
    }
    page.coordinator.sync_observer(&mut page.observer);
}

fn bind_menu(page: &mut PageState, dom: &Dom, config: &MenuConfig) {
    if page.overlay.is_none() {
        page.overlay = dom
            .select_first(&format!(".{}", config.overlay_class))
            .or_else(|| {
                let overlay = dom.document.create_element("div").ok()?;
                overlay.set_class_name(&config.overlay_class);
                dom.document.body()?.append_child(&overlay).ok()?;
                Some(overlay)
            });
    }

    let menu = dom.select_first(&config.menu_selector);
    let ids = (
        menu.as_ref().map(|m| dom.table.register(m)),
        page.overlay.as_ref().map(|o| dom.table.register(o)),
    );
    if page.menu_ids != Some(ids) {
        page.coordinator.set_menu(ids.0, ids.1);
        page.menu_ids = Some(ids);
    }

    let mut targets: Vec<(Element, MenuEvent, &'static str)> = Vec::new();
    targets.extend(
        dom.select_all(&config.open_selector)
            .into_iter()
            .map(|e| (e, MenuEvent::ButtonClick, "menu-open")),
    );
    targets.extend(
        dom.select_all(&config.close_selector)
            .into_iter()
            .map(|e| (e, MenuEvent::CloseClick, "menu-close")),
    );
    if let Some(overlay) = &page.overlay {
        targets.push((overlay.clone(), MenuEvent::OverlayClick, "menu-overlay"));
    }
    if let Some(menu) = &menu {
        targets.extend(
            select_within(menu, "a")
                .into_iter()
                .map(|e| (e, MenuEvent::LinkClick, "menu-link")),
        );
    }

    for (element, event, role) in targets {
        let id = dom.table.register(&element);
        if !page.listeners.claim(id, role) {
            continue;
        }
        let callback = handler(&page.this, move |page, _| {
            let overflow = page.dom.body_overflow();
            let commands = page.coordinator.on_menu(event, &overflow);
            apply(&page.dom, &commands);
        });
        page.listeners.add(&element, "click", false, callback);
    }
}

fn bind_clicks(page: &mut PageState, dom: &Dom, config: &EffectsConfig) {
    for anchor in dom.select_all("a[href^=\"#\"]") {
        let id = dom.table.register(&anchor);
        if !page.listeners.claim(id, "anchor") {
            continue;
        }
        let link = anchor.clone();
        let callback = handler(&page.this, move |page, event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let document = page.dom.document.clone();
            let scroll_y = page.dom.window.page_y_offset().unwrap_or(0.0);
            let command = page.coordinator.on_anchor_click(&href, |fragment| {
                let target = document.get_element_by_id(fragment.as_str())?;
                Some(target.get_bounding_client_rect().top() + scroll_y)
            });
            if let Some(command) = command {
                event.prevent_default();
                apply(&page.dom, &[command]);
            }
        });
        page.listeners.add(&anchor, "click", false, callback);
    }

    for card in dom.select_all(&config.ripple_selector) {
        let id = dom.table.register(&card);
        if !page.listeners.claim(id, "ripple") {
            continue;
        }
        let callback = handler(&page.this, move |page, event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let command = page.coordinator.on_card_click(
                id,
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
                &page.dom,
            );
            if let Some(command) = command {
                apply(&page.dom, &[command]);
            }
        });
        page.listeners.add(&card, "click", false, callback);
    }
}

fn bind_images(page: &mut PageState, dom: &Dom) {
    for image in dom.select_all("img") {
        let id = dom.table.register(&image);
        let ready = image
            .dyn_ref::<HtmlImageElement>()
            .is_some_and(|img| img.complete() && img.natural_height() != 0);
        if ready {
            if let Some(command) = page.coordinator.on_image_loaded(id) {
                apply(&page.dom, &[command]);
            }
            continue;
        }
        if !page.listeners.claim(id, "image-load") {
            continue;
        }
        let callback = handler(&page.this, move |page, _| {
            if let Some(command) = page.coordinator.on_image_loaded(id) {
                apply(&page.dom, &[command]);
            }
        });
        page.listeners.add(&image, "load", false, callback);
    }
    debug!("page scan complete");
}
