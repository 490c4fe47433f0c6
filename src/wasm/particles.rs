use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::dom;
use crate::particles::{self, ParticleField};

/// Run the drifting particle background on a 2D canvas created inside the
/// `#particles-js` container.
pub fn start(document: &Document) -> Result<(), JsValue> {
    let container = dom::require_id(document, "particles-js")?;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.style().set_property("width", "100%")?;
    canvas.style().set_property("height", "100%")?;
    canvas.style().set_property("display", "block")?;
    container.append_child(&canvas)?;

    let width = container.client_width().max(1) as u32;
    let height = container.client_height().max(1) as u32;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("2d context unavailable")?
        .dyn_into()?;

    let mut field = ParticleField::new(width as f64, height as f64);
    field.seed(particles::COUNT, js_sys::Math::random);

    // Animation loop, same self-referential closure shape as the scene's
    // render loop.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let current_w = container.client_width().max(1) as u32;
        let current_h = container.client_height().max(1) as u32;
        if current_w != canvas.width() || current_h != canvas.height() {
            canvas.set_width(current_w);
            canvas.set_height(current_h);
            field.resize(current_w as f64, current_h as f64);
        }

        field.step();

        context.clear_rect(0.0, 0.0, current_w as f64, current_h as f64);
        context.set_global_alpha(particles::OPACITY);
        context.set_fill_style_str(particles::COLOR);
        for particle in field.particles() {
            context.begin_path();
            let _ = context.arc(
                particle.x,
                particle.y,
                particles::RADIUS,
                0.0,
                std::f64::consts::TAU,
            );
            context.fill();
        }

        web_sys::window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    web_sys::window()
        .ok_or("no window")?
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;
    Ok(())
}
