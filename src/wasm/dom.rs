use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

/// Look up a required element by selector. Absence is a startup error for
/// the calling component, not something to paper over with a no-op.
pub fn require(document: &Document, selector: &str) -> Result<Element, JsValue> {
    document
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("required element `{selector}` not found")))
}

/// Look up a required element by id.
pub fn require_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("required element `#{id}` not found")))
}
