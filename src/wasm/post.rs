use wasm_bindgen::JsValue;
use web_sys::{
    WebGl2RenderingContext as GL, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders;

/// Afterimage damping: how much of the previous frame survives into this one.
pub const TRAIL_DAMP: f32 = 0.85;
/// Luminance below this contributes nothing to the glow.
pub const BLOOM_THRESHOLD: f32 = 0.1;
/// Glow contribution in the final composite.
pub const BLOOM_STRENGTH: f32 = 1.0;
/// Blur kernel scale.
pub const BLOOM_RADIUS: f32 = 1.0;

const BLUR_ITERATIONS: usize = 2;

pub(super) fn bind_texture(gl: &GL, unit: u32, texture: &WebGlTexture) {
    gl.active_texture(GL::TEXTURE0 + unit);
    gl.bind_texture(GL::TEXTURE_2D, Some(texture));
}

/// Offscreen color target, optionally with a depth attachment.
struct RenderTarget {
    framebuffer: WebGlFramebuffer,
    texture: WebGlTexture,
    depth: Option<WebGlRenderbuffer>,
    width: i32,
    height: i32,
}

impl RenderTarget {
    fn new(gl: &GL, width: i32, height: i32, with_depth: bool) -> Result<Self, JsValue> {
        let texture = gl.create_texture().ok_or("create_texture failed")?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
        alloc_color(gl, width, height)?;
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);

        let framebuffer = gl.create_framebuffer().ok_or("create_framebuffer failed")?;
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            GL::FRAMEBUFFER,
            GL::COLOR_ATTACHMENT0,
            GL::TEXTURE_2D,
            Some(&texture),
            0,
        );

        let depth = if with_depth {
            let buffer = gl.create_renderbuffer().ok_or("create_renderbuffer failed")?;
            gl.bind_renderbuffer(GL::RENDERBUFFER, Some(&buffer));
            gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT16, width, height);
            gl.framebuffer_renderbuffer(
                GL::FRAMEBUFFER,
                GL::DEPTH_ATTACHMENT,
                GL::RENDERBUFFER,
                Some(&buffer),
            );
            Some(buffer)
        } else {
            None
        };

        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        Ok(Self {
            framebuffer,
            texture,
            depth,
            width,
            height,
        })
    }

    fn resize(&mut self, gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
        self.width = width;
        self.height = height;
        gl.bind_texture(GL::TEXTURE_2D, Some(&self.texture));
        alloc_color(gl, width, height)?;
        if let Some(buffer) = &self.depth {
            gl.bind_renderbuffer(GL::RENDERBUFFER, Some(buffer));
            gl.renderbuffer_storage(GL::RENDERBUFFER, GL::DEPTH_COMPONENT16, width, height);
        }
        Ok(())
    }
}

fn alloc_color(gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_u32_and_u32_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        width,
        height,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        None,
    )
}

/// Post-processing chain: scene target → afterimage trail → thresholded,
/// blurred glow → composite onto the canvas. Pass order is fixed; only the
/// coefficients above tune it.
pub struct PostChain {
    scene: RenderTarget,
    trail_front: RenderTarget,
    trail_back: RenderTarget,
    bright: RenderTarget,
    blur_a: RenderTarget,
    blur_b: RenderTarget,

    quad_vao: WebGlVertexArrayObject,
    _quad_buffer: WebGlBuffer,

    trail_program: WebGlProgram,
    trail_current: Option<WebGlUniformLocation>,
    trail_previous: Option<WebGlUniformLocation>,
    trail_damp: Option<WebGlUniformLocation>,

    bright_program: WebGlProgram,
    bright_input: Option<WebGlUniformLocation>,
    bright_threshold: Option<WebGlUniformLocation>,

    blur_program: WebGlProgram,
    blur_input: Option<WebGlUniformLocation>,
    blur_step: Option<WebGlUniformLocation>,

    composite_program: WebGlProgram,
    composite_base: Option<WebGlUniformLocation>,
    composite_bloom: Option<WebGlUniformLocation>,
    composite_strength: Option<WebGlUniformLocation>,
}

impl PostChain {
    pub fn new(gl: &GL, width: i32, height: i32) -> Result<Self, JsValue> {
        let (half_w, half_h) = half_extent(width, height);

        let scene = RenderTarget::new(gl, width, height, true)?;
        let trail_front = RenderTarget::new(gl, width, height, false)?;
        let trail_back = RenderTarget::new(gl, width, height, false)?;
        let bright = RenderTarget::new(gl, half_w, half_h, false)?;
        let blur_a = RenderTarget::new(gl, half_w, half_h, false)?;
        let blur_b = RenderTarget::new(gl, half_w, half_h, false)?;

        // Fullscreen triangle; uv derives from position in the vertex stage.
        let quad_buffer = gl.create_buffer().ok_or("create_buffer failed")?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad_buffer));
        let corners: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];
        let data = js_sys::Float32Array::from(corners.as_slice());
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &data, GL::STATIC_DRAW);

        let quad_vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
        gl.bind_vertex_array(Some(&quad_vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad_buffer));
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 2, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let trail_program = shaders::link_program(gl, shaders::QUAD_VERT, shaders::TRAIL_FRAG)?;
        let bright_program = shaders::link_program(gl, shaders::QUAD_VERT, shaders::BRIGHT_FRAG)?;
        let blur_program = shaders::link_program(gl, shaders::QUAD_VERT, shaders::BLUR_FRAG)?;
        let composite_program =
            shaders::link_program(gl, shaders::QUAD_VERT, shaders::COMPOSITE_FRAG)?;

        Ok(Self {
            trail_current: gl.get_uniform_location(&trail_program, "u_current"),
            trail_previous: gl.get_uniform_location(&trail_program, "u_previous"),
            trail_damp: gl.get_uniform_location(&trail_program, "u_damp"),
            bright_input: gl.get_uniform_location(&bright_program, "u_input"),
            bright_threshold: gl.get_uniform_location(&bright_program, "u_threshold"),
            blur_input: gl.get_uniform_location(&blur_program, "u_input"),
            blur_step: gl.get_uniform_location(&blur_program, "u_step"),
            composite_base: gl.get_uniform_location(&composite_program, "u_base"),
            composite_bloom: gl.get_uniform_location(&composite_program, "u_bloom"),
            composite_strength: gl.get_uniform_location(&composite_program, "u_strength"),
            scene,
            trail_front,
            trail_back,
            bright,
            blur_a,
            blur_b,
            quad_vao,
            _quad_buffer: quad_buffer,
            trail_program,
            bright_program,
            blur_program,
            composite_program,
        })
    }

    /// Bind the scene target and clear it; the caller then draws the scene.
    pub fn begin_scene(&self, gl: &GL) {
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.scene.framebuffer));
        gl.viewport(0, 0, self.scene.width, self.scene.height);
        gl.enable(GL::DEPTH_TEST);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.clear(GL::COLOR_BUFFER_BIT | GL::DEPTH_BUFFER_BIT);
    }

    /// Run the trail, glow and composite passes; the composite lands on the
    /// canvas itself.
    pub fn finish(&mut self, gl: &GL) {
        gl.disable(GL::DEPTH_TEST);
        gl.bind_vertex_array(Some(&self.quad_vao));

        // Afterimage: the new frame against the damped previous trail.
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.trail_front.framebuffer));
        gl.viewport(0, 0, self.trail_front.width, self.trail_front.height);
        gl.use_program(Some(&self.trail_program));
        bind_texture(gl, 0, &self.scene.texture);
        bind_texture(gl, 1, &self.trail_back.texture);
        gl.uniform1i(self.trail_current.as_ref(), 0);
        gl.uniform1i(self.trail_previous.as_ref(), 1);
        gl.uniform1f(self.trail_damp.as_ref(), TRAIL_DAMP);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        // Bright extract at half resolution.
        gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.bright.framebuffer));
        gl.viewport(0, 0, self.bright.width, self.bright.height);
        gl.use_program(Some(&self.bright_program));
        bind_texture(gl, 0, &self.trail_front.texture);
        gl.uniform1i(self.bright_input.as_ref(), 0);
        gl.uniform1f(self.bright_threshold.as_ref(), BLOOM_THRESHOLD);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        // Separable blur, ping-ponging between the two half-res targets.
        gl.use_program(Some(&self.blur_program));
        gl.uniform1i(self.blur_input.as_ref(), 0);
        let texel_x = BLOOM_RADIUS / self.bright.width as f32;
        let texel_y = BLOOM_RADIUS / self.bright.height as f32;
        for iteration in 0..BLUR_ITERATIONS {
            let horizontal_input = if iteration == 0 {
                &self.bright
            } else {
                &self.blur_b
            };
            gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.blur_a.framebuffer));
            gl.viewport(0, 0, self.blur_a.width, self.blur_a.height);
            bind_texture(gl, 0, &horizontal_input.texture);
            gl.uniform2f(self.blur_step.as_ref(), texel_x, 0.0);
            gl.draw_arrays(GL::TRIANGLES, 0, 3);

            gl.bind_framebuffer(GL::FRAMEBUFFER, Some(&self.blur_b.framebuffer));
            gl.viewport(0, 0, self.blur_b.width, self.blur_b.height);
            bind_texture(gl, 0, &self.blur_a.texture);
            gl.uniform2f(self.blur_step.as_ref(), 0.0, texel_y);
            gl.draw_arrays(GL::TRIANGLES, 0, 3);
        }

        // Composite onto the canvas.
        gl.bind_framebuffer(GL::FRAMEBUFFER, None);
        gl.viewport(0, 0, self.scene.width, self.scene.height);
        gl.use_program(Some(&self.composite_program));
        bind_texture(gl, 0, &self.trail_front.texture);
        bind_texture(gl, 1, &self.blur_b.texture);
        gl.uniform1i(self.composite_base.as_ref(), 0);
        gl.uniform1i(self.composite_bloom.as_ref(), 1);
        gl.uniform1f(self.composite_strength.as_ref(), BLOOM_STRENGTH);
        gl.draw_arrays(GL::TRIANGLES, 0, 3);

        gl.bind_vertex_array(None);

        // This frame's trail is the next frame's history.
        std::mem::swap(&mut self.trail_front, &mut self.trail_back);
    }

    /// Track a new canvas size. Every intermediate target follows the
    /// viewport; the trail history restarts empty at the new size.
    pub fn resize(&mut self, gl: &GL, width: i32, height: i32) -> Result<(), JsValue> {
        let (half_w, half_h) = half_extent(width, height);
        self.scene.resize(gl, width, height)?;
        self.trail_front.resize(gl, width, height)?;
        self.trail_back.resize(gl, width, height)?;
        self.bright.resize(gl, half_w, half_h)?;
        self.blur_a.resize(gl, half_w, half_h)?;
        self.blur_b.resize(gl, half_w, half_h)?;
        Ok(())
    }

}

fn half_extent(width: i32, height: i32) -> (i32, i32) {
    ((width / 2).max(1), (height / 2).max(1))
}
