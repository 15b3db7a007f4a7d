use js_sys::Array;
use scroll_fx_core::{IntersectionEntry, ObserveOptions, ObserverBackend};
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::ElementTable;

/// `IntersectionObserver` behind the coordinator's single observer.
///
/// The browser fixes threshold and margin per observer instance, so one
/// instance is created per distinct option set. All of them share the same
/// callback.
pub struct DomObserver {
    table: ElementTable,
    callback: Option<Closure<dyn FnMut(Array)>>,
    groups: Vec<(ObserveOptions, IntersectionObserver)>,
}

impl DomObserver {
    /// `callback` is `None` when the platform has no `IntersectionObserver`.
    pub fn new(table: ElementTable, callback: Option<Closure<dyn FnMut(Array)>>) -> Self {
        Self {
            table,
            callback,
            groups: Vec::new(),
        }
    }

    fn group(&mut self, options: &ObserveOptions) -> Option<&IntersectionObserver> {
        if let Some(i) = self.groups.iter().position(|(o, _)| o == options) {
            return Some(&self.groups[i].1);
        }
        let callback = self.callback.as_ref()?;
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => {
                self.groups.push((*options, observer));
                self.groups.last().map(|(_, o)| o)
            }
            Err(e) => {
                warn!(error = ?e, "IntersectionObserver rejected options");
                None
            }
        }
    }

    /// Convert a callback batch, dropping entries for unknown elements.
    pub fn entries(&self, batch: &Array) -> Vec<IntersectionEntry> {
        batch
            .iter()
            .filter_map(|value| {
                let entry: IntersectionObserverEntry = value.dyn_into().ok()?;
                let target = self.table.id_of(&entry.target())?;
                Some(IntersectionEntry {
                    target,
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                })
            })
            .collect()
    }
}

impl ObserverBackend for DomObserver {
    fn observe(&mut self, id: scroll_fx_protocol::ElementId, options: &ObserveOptions) {
        let Some(element) = self.table.get(id) else {
            return;
        };
        if let Some(observer) = self.group(options) {
            observer.observe(&element);
        }
    }

    fn unobserve(&mut self, id: scroll_fx_protocol::ElementId) {
        let Some(element) = self.table.get(id) else {
            return;
        };
        for (_, observer) in &self.groups {
            observer.unobserve(&element);
        }
    }

    fn disconnect(&mut self) {
        for (_, observer) in self.groups.drain(..) {
            observer.disconnect();
        }
    }

    fn is_native(&self) -> bool {
        self.callback.is_some()
    }
}
