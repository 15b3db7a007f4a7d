use std::cell::RefCell;
use std::rc::Weak;

use anyhow::{Context, Result, anyhow};
use scroll_fx_core::config::SectionSlot;
use scroll_fx_core::sections::{FragmentError, LoadReport};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Response, Window};

use crate::page::{self, PageState};

/// Fetch every section fragment into its placeholder, then rescan the page
/// so the new markup joins the coordinator. Failures are logged and the
/// placeholder is left empty.
pub async fn load_all(this: Weak<RefCell<PageState>>, slots: Vec<SectionSlot>) {
    let Some((window, document)) = this.upgrade().and_then(|state| {
        let page = state.try_borrow().ok()?;
        Some((page.dom.window.clone(), page.dom.document.clone()))
    }) else {
        return;
    };

    let mut report = LoadReport::default();
    for slot in &slots {
        let result = load_one(&window, &document, slot).await;
        if let Err(e) = &result {
            web_sys::console::error_1(
                &format!("scroll-fx: error loading section {}: {e:#}", slot.placeholder).into(),
            );
        }
        report.record(slot, result);
    }
    debug!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "section fragments settled"
    );

    if !report.loaded.is_empty()
        && let Some(state) = this.upgrade()
        && let Ok(mut page) = state.try_borrow_mut()
    {
        page::refresh(&mut page);
    }
}

async fn load_one(window: &Window, document: &Document, slot: &SectionSlot) -> Result<()> {
    let html = fetch_text(window, &slot.path).await?;
    let placeholder = document
        .get_element_by_id(&slot.placeholder)
        .ok_or_else(|| FragmentError::MissingPlaceholder(slot.placeholder.clone()))?;
    placeholder.set_inner_html(&html);
    Ok(())
}

async fn fetch_text(window: &Window, path: &str) -> Result<String> {
    let transport = |e: JsValue| FragmentError::Transport {
        path: path.to_string(),
        message: format!("{e:?}"),
    };
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(transport)?
        .dyn_into()
        .map_err(|_| anyhow!("fetch of {path} did not produce a Response"))?;
    FragmentError::check_status(path, response.status())?;
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    text.as_string()
        .with_context(|| format!("body of {path} is not text"))
}
