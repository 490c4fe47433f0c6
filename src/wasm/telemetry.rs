use js_sys::{Function, Object, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlAnchorElement, HtmlImageElement};

use super::dom;
use crate::telemetry::{self, EventRecord};

/// Attach the engagement listeners: contact form, social links, certificate
/// links, the resume download and the custom link. Every handler emits one
/// record and forgets about it.
pub fn start(document: &Document) -> Result<(), JsValue> {
    let form = dom::require_id(document, "contact-form")?;
    attach(&form, "submit", || {
        forward(telemetry::contact_form_submitted());
    })?;

    for link in anchors(document, ".socials a")? {
        let subject = link.clone();
        attach(&link, "click", move || {
            forward(telemetry::social_link_clicked(&subject.href()));
        })?;
    }

    for link in anchors(document, ".certificate a")? {
        let subject = link.clone();
        attach(&link, "click", move || {
            forward(telemetry::certificate_viewed(
                &subject.href(),
                certificate_name(&subject),
            ));
        })?;
    }

    let resume: HtmlAnchorElement = dom::require(document, ".resume a")?.dyn_into()?;
    let subject = resume.clone();
    attach(&resume, "click", move || {
        let file_name = subject
            .get_attribute("download")
            .filter(|name| !name.is_empty());
        forward(telemetry::resume_downloaded(file_name));
    })?;

    let custom: HtmlAnchorElement = dom::require_id(document, "custom-link")?.dyn_into()?;
    let subject = custom.clone();
    attach(&custom, "click", move || {
        let text = subject.text_content().unwrap_or_default().trim().to_owned();
        push_to_data_layer(telemetry::custom_link_clicked(&text, &subject.href()));
    })?;

    Ok(())
}

fn anchors(document: &Document, selector: &str) -> Result<Vec<HtmlAnchorElement>, JsValue> {
    let nodes = document.query_selector_all(selector)?;
    let mut links = Vec::with_capacity(nodes.length() as usize);
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            links.push(node.dyn_into::<HtmlAnchorElement>()?);
        }
    }
    Ok(links)
}

fn certificate_name(link: &HtmlAnchorElement) -> Option<String> {
    let image = link.query_selector("img").ok().flatten()?;
    let image: HtmlImageElement = image.dyn_into().ok()?;
    let alt = image.alt();
    (!alt.is_empty()).then_some(alt)
}

fn attach<T: AsRef<EventTarget>>(
    target: &T,
    event: &str,
    mut handler: impl FnMut() + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
    target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Forward a record to the page's global `gtag` sink. Fire-and-forget: an
/// absent or throwing sink is silently ignored.
fn forward(record: EventRecord) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(sink) = Reflect::get(&window, &JsValue::from_str("gtag")) else {
        return;
    };
    let Ok(sink) = sink.dyn_into::<Function>() else {
        return;
    };
    let _ = sink.call3(
        &JsValue::NULL,
        &JsValue::from_str("event"),
        &JsValue::from_str(record.name),
        &params_object(&record),
    );
}

/// The custom link reports through the tag manager's data layer instead.
fn push_to_data_layer(record: EventRecord) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(layer) = Reflect::get(&window, &JsValue::from_str("dataLayer")) else {
        return;
    };
    let Ok(layer) = layer.dyn_into::<js_sys::Array>() else {
        return;
    };
    let entry = params_object(&record);
    let _ = Reflect::set(
        &entry,
        &JsValue::from_str("event"),
        &JsValue::from_str(record.name),
    );
    layer.push(&entry);
}

fn params_object(record: &EventRecord) -> Object {
    let params = Object::new();
    for (key, value) in &record.params {
        let _ = Reflect::set(
            &params,
            &JsValue::from_str(key),
            &JsValue::from_str(value),
        );
    }
    params
}
