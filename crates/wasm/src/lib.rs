//! Browser entry point: binds the scroll-fx coordinator to the live DOM.

mod apply;
mod dom;
mod fragments;
mod observer;
mod page;

use std::rc::Rc;

use scroll_fx_core::{EffectsConfig, MenuState};
use scroll_fx_protocol::Fragment;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// What the page currently shows, as seen by the coordinator.
#[derive(Serialize)]
struct Snapshot<'a> {
    attached: bool,
    scrolled: bool,
    active_section: Option<&'a Fragment>,
    menu_open: bool,
}

/// Handle to the running effects of one page.
#[wasm_bindgen]
pub struct ScrollEffects {
    state: page::Shared,
}

#[wasm_bindgen]
impl ScrollEffects {
    /// Re-bind listeners after [`detach`](Self::detach).
    pub fn attach(&self) {
        if let Ok(mut page) = self.state.try_borrow_mut() {
            page::attach(&mut page);
        }
    }

    /// Remove every listener and stop observing. Classes already applied
    /// stay on the page.
    pub fn detach(&self) {
        if let Ok(mut page) = self.state.try_borrow_mut() {
            page::detach(&mut page);
        }
    }

    /// Rescan the document for elements inserted after start-up.
    pub fn refresh(&self) {
        if let Ok(mut page) = self.state.try_borrow_mut() {
            page::refresh(&mut page);
        }
    }

    /// Current coordinator state as JSON.
    pub fn snapshot(&self) -> Result<String, JsError> {
        let page = self
            .state
            .try_borrow()
            .map_err(|_| JsError::new("page state is busy"))?;
        let coordinator = &page.coordinator;
        let snapshot = Snapshot {
            attached: coordinator.is_attached(),
            scrolled: coordinator.is_scrolled(),
            active_section: coordinator.active_section(),
            menu_open: coordinator.menu_state() == MenuState::Open,
        };
        serde_json::to_string(&snapshot).map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn attached(&self) -> bool {
        self.state
            .try_borrow()
            .is_ok_and(|page| page.coordinator.is_attached())
    }
}

/// The built-in configuration as JSON, a starting point for
/// [`start_with_config`].
#[wasm_bindgen]
pub fn default_config() -> Result<String, JsError> {
    serde_json::to_string_pretty(&EffectsConfig::default())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Start with the built-in configuration.
#[wasm_bindgen]
pub fn start() -> Result<ScrollEffects, JsError> {
    start_with(EffectsConfig::default())
}

/// Start with a JSON configuration. Missing fields take their defaults.
#[wasm_bindgen]
pub fn start_with_config(json: &str) -> Result<ScrollEffects, JsError> {
    let config = EffectsConfig::from_json(json).map_err(|e| JsError::new(&e.to_string()))?;
    start_with(config)
}

fn start_with(config: EffectsConfig) -> Result<ScrollEffects, JsError> {
    console_error_panic_hook::set_once();

    let slots = config.sections.clone();
    let state = page::create(config).map_err(|e| JsError::new(&format!("{e:?}")))?;
    let document = state.borrow().dom.document.clone();

    let weak = Rc::downgrade(&state);
    let boot = move || {
        let Some(state) = weak.upgrade() else {
            return;
        };
        if let Ok(mut page) = state.try_borrow_mut() {
            page::attach(&mut page);
        }
        if !slots.is_empty() {
            wasm_bindgen_futures::spawn_local(fragments::load_all(weak, slots));
        }
    };

    if page::document_loading(&document) {
        let ready = Closure::once_into_js(boot);
        document
            .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref())
            .map_err(|e| JsError::new(&format!("{e:?}")))?;
    } else {
        boot();
    }

    Ok(ScrollEffects { state })
}
