use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Document, HtmlCanvasElement, WebGl2RenderingContext as GL};

use super::{dom, post::PostChain, scene::Scene};
use crate::orbit::{self, Camera};
use crate::spin::SpinAccumulator;

/// Build the scene and start the continuous render loop on the `#canvas`
/// element.
pub fn start(document: &Document, spin: Rc<RefCell<SpinAccumulator>>) -> Result<(), JsValue> {
    let canvas: HtmlCanvasElement = dom::require_id(document, "canvas")?.dyn_into()?;
    let win = window().ok_or("no window")?;

    let (css_w, css_h) = viewport_size()?;
    let dpr = win.device_pixel_ratio();
    canvas.set_width((css_w * dpr) as u32);
    canvas.set_height((css_h * dpr) as u32);

    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;
    let gl = Rc::new(gl);

    let scene = Scene::build(gl.clone())?;
    let post = Rc::new(RefCell::new(PostChain::new(
        &gl,
        canvas.width() as i32,
        canvas.height() as i32,
    )?));
    let camera = Rc::new(RefCell::new(Camera::new(css_w / css_h)));

    // Resize is the only externally triggered mutation outside the frame
    // loop: aspect, projection, canvas and every render target follow the
    // new viewport.
    {
        let canvas = canvas.clone();
        let gl = gl.clone();
        let post = post.clone();
        let camera = camera.clone();
        let resize = Closure::wrap(Box::new(move || {
            let Ok((css_w, css_h)) = viewport_size() else {
                return;
            };
            let Some(win) = window() else { return };
            let dpr = win.device_pixel_ratio();
            let device_w = (css_w * dpr) as u32;
            let device_h = (css_h * dpr) as u32;
            canvas.set_width(device_w);
            canvas.set_height(device_h);
            camera.borrow_mut().set_aspect(css_w / css_h);
            if let Err(err) = post.borrow_mut().resize(&gl, device_w as i32, device_h as i32) {
                log::error!("render target resize failed: {err:?}");
            }
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
        resize.forget();
    }

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let mut group_angle: f64 = 0.0;
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        // Inherent rotation, present even when the page never scrolls; the
        // scroll-derived share arrives through the same accumulator on the
        // parallax driver's own timer.
        spin.borrow_mut().add_frame_contribution(orbit::FRAME_SPIN);
        let theta = spin.borrow().angle();
        group_angle += orbit::GROUP_SPIN;

        scene.draw(
            &camera.borrow(),
            &orbit::pose(theta),
            group_angle,
            &mut post.borrow_mut(),
        );

        // schedule next
        window()
            .unwrap()
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    win.request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())?;
    Ok(())
}

fn viewport_size() -> Result<(f64, f64), JsValue> {
    let win = window().ok_or("no window")?;
    let width = win
        .inner_width()?
        .as_f64()
        .ok_or("viewport width is not a number")?;
    let height = win
        .inner_height()?
        .as_f64()
        .ok_or("viewport height is not a number")?;
    Ok((width.max(1.0), height.max(1.0)))
}
