#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

use portfolio_wasm::orbit::{self, Camera};

wasm_bindgen_test_configure!(run_in_browser);

const SAMPLES: [f64; 5] = [0.0, 0.7, 2.9, 31.4, 512.0];

#[wasm_bindgen_test]
fn camera_track_radius_is_constant() {
    for theta in SAMPLES {
        let p = orbit::camera_position(theta);
        let r2 = p.x * p.x + p.z * p.z;
        assert!((r2 - orbit::CAMERA_RADIUS * orbit::CAMERA_RADIUS).abs() < 1e-9);
    }
}

#[wasm_bindgen_test]
fn fill_light_is_the_key_light_mirrored() {
    for theta in SAMPLES {
        let key = orbit::key_light_position(theta);
        let fill = orbit::fill_light_position(theta);
        assert!((fill.x + key.x).abs() < 1e-12);
        assert!((fill.z + key.z).abs() < 1e-12);
        assert!((fill.y - (-key.y - 3.0)).abs() < 1e-12);
    }
}

#[wasm_bindgen_test]
fn resize_sets_aspect_to_width_over_height() {
    let mut camera = Camera::new(1920.0 / 1080.0);
    camera.set_aspect(800.0 / 600.0);
    assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
}
