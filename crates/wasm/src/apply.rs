use scroll_fx_protocol::DomCommand;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, Element, HtmlElement, ScrollBehavior, ScrollToOptions};

use crate::dom::Dom;

/// Apply commands in order. A failing command is logged and skipped; the
/// rest still run.
pub fn apply(dom: &Dom, commands: &[DomCommand]) {
    for command in commands {
        if let Err(e) = apply_one(dom, command) {
            warn!(?command, error = ?e, "DOM command failed");
        }
    }
}

fn style_of(element: &Element) -> Option<CssStyleDeclaration> {
    element.dyn_ref::<HtmlElement>().map(HtmlElement::style)
}

fn apply_one(dom: &Dom, command: &DomCommand) -> Result<(), JsValue> {
    match command {
        DomCommand::AddClass { target, class } => {
            if let Some(element) = dom.table.get(*target) {
                element.class_list().add_1(class.as_str())?;
            }
        }
        DomCommand::RemoveClass { target, class } => {
            if let Some(element) = dom.table.get(*target) {
                element.class_list().remove_1(class.as_str())?;
            }
        }
        DomCommand::SetTranslateY { target, offset } => {
            if let Some(style) = dom.table.get(*target).as_ref().and_then(style_of) {
                style.set_property("transform", &DomCommand::translate_y_css(*offset))?;
            }
        }
        DomCommand::SetTransitionDelay { target, delay_ms } => {
            if let Some(style) = dom.table.get(*target).as_ref().and_then(style_of) {
                style.set_property("transition-delay", &format!("{delay_ms}ms"))?;
            }
        }
        DomCommand::SetChildTransitionDelay {
            container,
            child,
            delay_ms,
        } => {
            let child = dom
                .table
                .get(*container)
                .and_then(|c| c.children().item(*child as u32));
            if let Some(style) = child.as_ref().and_then(style_of) {
                style.set_property("transition-delay", &format!("{delay_ms}ms"))?;
            }
        }
        DomCommand::SetBodyOverflow { value } => {
            if let Some(body) = dom.document.body() {
                body.style().set_property("overflow", value)?;
            }
        }
        DomCommand::SetProgress { percent } => {
            if let Some(bar) = &dom.progress_bar {
                bar.style().set_property("width", &format!("{percent}%"))?;
            }
        }
        DomCommand::ScrollTo { top, smooth } => {
            let options = ScrollToOptions::new();
            options.set_top(*top);
            options.set_behavior(if *smooth {
                ScrollBehavior::Smooth
            } else {
                ScrollBehavior::Auto
            });
            dom.window.scroll_to_with_scroll_to_options(&options);
        }
        DomCommand::SpawnRipple {
            host,
            size,
            x,
            y,
            lifetime_ms,
        } => spawn_ripple(dom, *host, *size, *x, *y, *lifetime_ms)?,
    }
    Ok(())
}

fn spawn_ripple(
    dom: &Dom,
    host: scroll_fx_protocol::ElementId,
    size: f64,
    x: f64,
    y: f64,
    lifetime_ms: u32,
) -> Result<(), JsValue> {
    let Some(host) = dom.table.get(host) else {
        return Ok(());
    };
    let ripple: HtmlElement = dom.document.create_element("span")?.dyn_into()?;
    let style = ripple.style();
    style.set_property("width", &format!("{size}px"))?;
    style.set_property("height", &format!("{size}px"))?;
    style.set_property("left", &format!("{x}px"))?;
    style.set_property("top", &format!("{y}px"))?;
    ripple
        .class_list()
        .add_1(scroll_fx_protocol::ClassToken::RippleEffect.as_str())?;
    host.append_child(&ripple)?;

    let expire = Closure::once_into_js(move || ripple.remove());
    dom.window
        .set_timeout_with_callback_and_timeout_and_arguments_0(
            expire.unchecked_ref(),
            i32::try_from(lifetime_ms).unwrap_or(i32::MAX),
        )?;
    Ok(())
}
