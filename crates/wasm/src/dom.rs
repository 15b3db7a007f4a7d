use std::cell::RefCell;
use std::rc::Rc;

use scroll_fx_core::Layout;
use scroll_fx_protocol::{ElementId, Rect, Viewport};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

/// Attribute carrying an element's handle, so observer entries and event
/// targets map back to ids without a scan.
const ID_ATTR: &str = "data-scroll-fx";

/// Every element the host has handed to the coordinator, indexed by id.
#[derive(Clone, Default)]
pub struct ElementTable(Rc<RefCell<Vec<Element>>>);

impl ElementTable {
    /// The element's existing handle, or a fresh one.
    pub fn register(&self, element: &Element) -> ElementId {
        if let Some(id) = self.id_of(element) {
            return id;
        }
        let mut elements = self.0.borrow_mut();
        let id = ElementId(elements.len() as u32);
        element.set_attribute(ID_ATTR, &id.0.to_string()).ok();
        elements.push(element.clone());
        id
    }

    pub fn get(&self, id: ElementId) -> Option<Element> {
        self.0.borrow().get(id.0 as usize).cloned()
    }

    pub fn id_of(&self, element: &Element) -> Option<ElementId> {
        let raw: u32 = element.get_attribute(ID_ATTR)?.parse().ok()?;
        // Cloned markup carries the attribute too; only the registered node counts.
        self.0
            .borrow()
            .get(raw as usize)
            .filter(|known| *known == element)?;
        Some(ElementId(raw))
    }
}

/// The live page: the coordinator's view of layout and the target of its
/// commands.
#[derive(Clone)]
pub struct Dom {
    pub window: Window,
    pub document: Document,
    pub table: ElementTable,
    pub progress_bar: Option<HtmlElement>,
}

impl Dom {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            table: ElementTable::default(),
            progress_bar: None,
        }
    }

    pub fn select_all(&self, selector: &str) -> Vec<Element> {
        elements(selector, self.document.query_selector_all(selector))
    }

    pub fn select_first(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Current inline `overflow` of the body; empty when unset.
    pub fn body_overflow(&self) -> String {
        self.document
            .body()
            .and_then(|body| body.style().get_property_value("overflow").ok())
            .unwrap_or_default()
    }
}

pub fn select_within(root: &Element, selector: &str) -> Vec<Element> {
    elements(selector, root.query_selector_all(selector))
}

fn elements(selector: &str, list: Result<NodeList, JsValue>) -> Vec<Element> {
    let list = match list {
        Ok(list) => list,
        Err(e) => {
            warn!(selector, error = ?e, "invalid selector");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn number(value: Result<JsValue, JsValue>) -> f64 {
    value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
}

impl Layout for Dom {
    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.window.page_y_offset().unwrap_or(0.0),
            width: number(self.window.inner_width()),
            height: number(self.window.inner_height()),
            document_height: self
                .document
                .document_element()
                .map(|root| f64::from(root.scroll_height()))
                .unwrap_or(0.0),
        }
    }

    fn rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.table.get(id)?;
        if !element.is_connected() {
            return None;
        }
        let r = element.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }
}
