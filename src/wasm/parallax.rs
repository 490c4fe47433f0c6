use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, HtmlElement};

use super::{dom, timer::RepeatingTimer};
use crate::parallax::{self, ScrollState};
use crate::spin::SpinAccumulator;

/// Wire the scroll-driven parallax: a scroll listener that records the
/// target offset, and a fixed-delay timer that eases toward it and rescales
/// the text layers and the canvas.
pub fn start(document: &Document, spin: Rc<RefCell<SpinAccumulator>>) -> Result<(), JsValue> {
    let text_behind: HtmlElement = dom::require_id(document, "text-behind")?.dyn_into()?;
    let text_front: HtmlElement = dom::require_id(document, "text-front")?.dyn_into()?;
    let text_behind_blur: HtmlElement = dom::require_id(document, "text-behind-blur")?.dyn_into()?;
    let canvas: HtmlElement = dom::require_id(document, "canvas")?.dyn_into()?;

    let scroll = Rc::new(RefCell::new(ScrollState::new(parallax::EASE)));

    // The listener only records where the page scrolled to; all easing and
    // style work happens on the timer below.
    {
        let scroll = scroll.clone();
        let listener = Closure::wrap(Box::new(move || {
            if let Some(window) = web_sys::window() {
                let offset = window.page_y_offset().unwrap_or(0.0);
                scroll.borrow_mut().set_target(offset);
            }
        }) as Box<dyn FnMut()>);
        web_sys::window()
            .ok_or("no window")?
            .add_event_listener_with_callback("scroll", listener.as_ref().unchecked_ref())?;
        listener.forget();
    }

    RepeatingTimer::start(parallax::TICK_MS, move || {
        let Some(window) = web_sys::window() else { return };
        let viewport_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let page_y = window.page_y_offset().unwrap_or(0.0);

        // Document-relative bounds of the tracked canvas.
        let rect = canvas.get_bounding_client_rect();
        let elem_top = page_y + rect.top();
        let elem_bottom = page_y + rect.bottom();

        let mut scroll = scroll.borrow_mut();
        // The band test runs against the scroll target, not the eased
        // value. Skipped ticks change nothing at all: no easing step, no
        // style writes, no rotation contribution.
        if !parallax::band_in_view(scroll.target, viewport_h, elem_top, elem_bottom) {
            return;
        }

        let current = scroll.ease_step();
        let text_scale = parallax::text_scale(current);
        let canvas_scale = parallax::canvas_scale(current);

        for layer in [&text_behind, &text_front, &text_behind_blur] {
            let _ = layer
                .style()
                .set_property("transform", &format!("scale({text_scale})"));
        }
        let _ = canvas
            .style()
            .set_property("transform", &format!("scale({canvas_scale})"));

        spin.borrow_mut()
            .add_scroll_contribution(parallax::spin_contribution(current));
    })
}
