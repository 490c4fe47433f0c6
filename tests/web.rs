#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use portfolio_wasm::{fade, telemetry};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn marker_class_follows_the_ratio_policy() {
    let document = web_sys::window().unwrap().document().unwrap();
    let section = document.create_element("section").unwrap();
    section.set_class_name("about-section");
    document.body().unwrap().append_child(&section).unwrap();

    // Synthetic ratio sequence crossing the 0.4 threshold both ways.
    for (ratio, expected) in [
        (0.0, false),
        (0.39, false),
        (0.41, true),
        (1.0, true),
        (0.39, false),
    ] {
        let class_list = section.class_list();
        if fade::reveals(0.4, ratio) {
            class_list.add_1(fade::MARKER_CLASS).unwrap();
        } else {
            class_list.remove_1(fade::MARKER_CLASS).unwrap();
        }
        assert_eq!(class_list.contains(fade::MARKER_CLASS), expected, "ratio {ratio}");
    }
}

#[wasm_bindgen_test]
fn social_platform_attribute_matches_the_href() {
    let record = telemetry::social_link_clicked("https://github.com/someone");
    assert!(record
        .params
        .iter()
        .any(|(key, value)| *key == "platform" && value == "GitHub"));

    let record = telemetry::social_link_clicked("https://example.com/profile");
    assert!(record
        .params
        .iter()
        .any(|(key, value)| *key == "platform" && value == "Other"));
}
