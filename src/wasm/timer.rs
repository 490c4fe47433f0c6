use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::window;

/// Self-rescheduling `setTimeout` loop with a fixed delay.
///
/// Deliberately not built on `requestAnimationFrame`: callers that want a
/// steady polling cadence independent of the display refresh (and of tab
/// visibility throttling semantics) use this instead of the render loop's
/// scheduling primitive.
pub struct RepeatingTimer;

impl RepeatingTimer {
    /// Run `tick` roughly every `interval_ms` for the page's lifetime.
    ///
    /// The closure reschedules itself, so it is stored in an `Rc<RefCell>`
    /// it also captures. The resulting cycle keeps the loop alive for the
    /// page's lifetime; it is never cancelled.
    pub fn start(interval_ms: i32, mut tick: impl FnMut() + 'static) -> Result<(), JsValue> {
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            tick();
            let Some(w) = window() else { return };
            let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(
                f.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                interval_ms,
            );
        }) as Box<dyn FnMut()>));

        window()
            .ok_or("no window")?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                g.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                interval_ms,
            )?;
        Ok(())
    }
}
