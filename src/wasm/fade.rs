use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use super::dom;
use crate::fade::{self, FadeRule};

/// Observe every configured section with its own threshold, toggling the
/// marker class as it crosses in and out of view.
pub fn start(document: &Document) -> Result<(), JsValue> {
    for rule in fade::SECTIONS {
        observe(document, rule)?;
    }
    Ok(())
}

fn observe(document: &Document, rule: &'static FadeRule) -> Result<(), JsValue> {
    let section = dom::require(document, rule.selector)?;
    let threshold = rule.threshold;

    let callback = Closure::wrap(Box::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let class_list = entry.target().class_list();
                if fade::reveals(threshold, entry.intersection_ratio()) {
                    let _ = class_list.add_1(fade::MARKER_CLASS);
                } else {
                    let _ = class_list.remove_1(fade::MARKER_CLASS);
                }
            }
        },
    )
        as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(&section);
    callback.forget();
    Ok(())
}
