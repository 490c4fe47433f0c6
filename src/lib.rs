#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

pub mod fade;
pub mod mesh;
pub mod orbit;
pub mod parallax;
pub mod particles;
pub mod spin;
pub mod telemetry;

// Only compile DOM/WebGL glue when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    mod dom;
    mod fade;
    mod parallax;
    mod particles;
    mod post;
    mod render;
    mod scene;
    mod shaders;
    mod telemetry;
    mod timer;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Rotation angle shared between the parallax driver and the render
        // loop; both add to it, only the render loop reads it.
        let spin = Rc::new(RefCell::new(crate::spin::SpinAccumulator::default()));

        // Each block below owns an independent loop or listener set. A
        // missing DOM node disables that block alone; the rest of the page
        // keeps running.
        if let Err(err) = parallax::start(&document, spin.clone()) {
            log::error!("parallax driver disabled: {err:?}");
        }
        if let Err(err) = render::start(&document, spin) {
            log::error!("scene renderer disabled: {err:?}");
        }
        if let Err(err) = fade::start(&document) {
            log::error!("section fade-in disabled: {err:?}");
        }
        if let Err(err) = particles::start(&document) {
            log::error!("particle background disabled: {err:?}");
        }
        if let Err(err) = telemetry::start(&document) {
            log::error!("analytics wiring disabled: {err:?}");
        }
        Ok(())
    }
}

// When compiling for non-wasm targets (e.g., `cargo test` on host),
// provide an empty stub so the crate still builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn main() {}
