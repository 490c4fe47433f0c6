use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat3, Mat4, Vec3};
use gloo_net::http::Request;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    HtmlImageElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram, WebGlTexture,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::post::{bind_texture, PostChain};
use super::shaders;
use crate::mesh::{self, MeshGroup};
use crate::orbit::{self, Camera, FramePose};

const ENV_URL: &str = "https://raw.githubusercontent.com/miroleon/gradient_hdr_freebie/main/Gradient_HDR_Freebies/ml_gradient_freebie_01.hdr";
const MESH_URL: &str = "https://raw.githubusercontent.com/miroleon/daily-assets/main/porcelain/source/Porcelain_Pose.obj";
const TEXTURE_BASE: &str = "https://miroleon.github.io/daily-assets/porcelain/textures/";
const MAP_SUFFIXES: [&str; 5] = ["BaseColor", "Metallic", "Normal", "Roughness", "ao"];

const MESH_SCALE: f32 = 0.025;
const MESH_OFFSET: Vec3 = Vec3::new(0.0, -2.5, 0.0);
const FOG_COLOR: [f32; 3] = rgb(0x11151c);
const FOG_DENSITY: f32 = 0.15;
const LIGHT_COLORS: [[f32; 3]; 2] = [rgb(0x85ccb8), rgb(0x9f85cc)];
const LIGHT_INTENSITY: f32 = 7.5;
const LIGHT_RANGE: f32 = 20.0;
const ENV_INTENSITY: f32 = 10.0;

const fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Five texture maps of one surface, in shader unit order: base color,
/// metallic, normal, roughness, ambient occlusion.
struct Material {
    maps: [WebGlTexture; 5],
}

impl Material {
    /// Neutral stand-in maps used until the remote images arrive.
    fn placeholder(gl: &GL) -> Result<Self, JsValue> {
        Ok(Self {
            maps: [
                solid_texture(gl, [255, 255, 255, 255])?, // base color
                solid_texture(gl, [0, 0, 0, 255])?,       // metallic
                solid_texture(gl, [128, 128, 255, 255])?, // flat normal
                solid_texture(gl, [128, 128, 128, 255])?, // roughness
                solid_texture(gl, [255, 255, 255, 255])?, // ao
            ],
        })
    }
}

struct Uniforms {
    proj: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    normal_matrix: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    light_pos: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    light_intensity: Option<WebGlUniformLocation>,
    light_range: Option<WebGlUniformLocation>,
    fog_color: Option<WebGlUniformLocation>,
    fog_density: Option<WebGlUniformLocation>,
    env_intensity: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        Self {
            proj: gl.get_uniform_location(program, "u_proj"),
            view: gl.get_uniform_location(program, "u_view"),
            model: gl.get_uniform_location(program, "u_model"),
            normal_matrix: gl.get_uniform_location(program, "u_normal_matrix"),
            camera_pos: gl.get_uniform_location(program, "u_camera_pos"),
            light_pos: gl.get_uniform_location(program, "u_light_pos"),
            light_color: gl.get_uniform_location(program, "u_light_color"),
            light_intensity: gl.get_uniform_location(program, "u_light_intensity"),
            light_range: gl.get_uniform_location(program, "u_light_range"),
            fog_color: gl.get_uniform_location(program, "u_fog_color"),
            fog_density: gl.get_uniform_location(program, "u_fog_density"),
            env_intensity: gl.get_uniform_location(program, "u_env_intensity"),
        }
    }
}

/// The 3D scene: one environment-lit mesh with two materials, two orbiting
/// point lights and fog. Construction wires the asynchronous asset loads;
/// drawing is driven by the render loop with a pose computed elsewhere.
pub struct Scene {
    gl: Rc<GL>,
    program: WebGlProgram,
    vao: WebGlVertexArrayObject,
    vertex_buffer: WebGlBuffer,
    uniforms: Uniforms,
    materials: [Material; 2],
    env_map: WebGlTexture,
    /// Element groups of the loaded mesh; empty until the OBJ arrives.
    groups: Rc<RefCell<Vec<MeshGroup>>>,
}

impl Scene {
    pub fn build(gl: Rc<GL>) -> Result<Self, JsValue> {
        let program = shaders::link_program(&gl, shaders::MESH_VERT, shaders::MESH_FRAG)?;

        let vertex_buffer = gl.create_buffer().ok_or("create_buffer failed")?;
        let vao = gl.create_vertex_array().ok_or("create_vertex_array failed")?;
        gl.bind_vertex_array(Some(&vao));
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&vertex_buffer));
        let stride = (mesh::VERTEX_STRIDE * 4) as i32;
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_with_i32(0, 3, GL::FLOAT, false, stride, 0);
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_with_i32(1, 3, GL::FLOAT, false, stride, 12);
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_with_i32(2, 2, GL::FLOAT, false, stride, 24);
        gl.bind_vertex_array(None);

        let materials = [Material::placeholder(&gl)?, Material::placeholder(&gl)?];

        // Until the equirectangular image lands, reflections sample black.
        let env_map = solid_texture(&gl, [0, 0, 0, 255])?;
        gl.bind_texture(GL::TEXTURE_2D, Some(&env_map));
        gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::REPEAT as i32);

        let uniforms = Uniforms::locate(&gl, &program);

        // Sampler units never change; set them once.
        gl.use_program(Some(&program));
        let sampler_names = [
            "u_base_color_map",
            "u_metallic_map",
            "u_normal_map",
            "u_roughness_map",
            "u_ao_map",
            "u_env_map",
        ];
        for (unit, name) in sampler_names.into_iter().enumerate() {
            gl.uniform1i(gl.get_uniform_location(&program, name).as_ref(), unit as i32);
        }

        let scene = Self {
            gl,
            program,
            vao,
            vertex_buffer,
            uniforms,
            materials,
            env_map,
            groups: Rc::new(RefCell::new(Vec::new())),
        };
        scene.spawn_asset_loads();
        Ok(scene)
    }

    /// Kick off every remote load. Failures are recoverable: the scene keeps
    /// rendering with whatever defaults are still in place.
    fn spawn_asset_loads(&self) {
        for (index, material) in self.materials.iter().enumerate() {
            for (map, suffix) in material.maps.iter().zip(MAP_SUFFIXES) {
                let url = format!("{TEXTURE_BASE}Porcelain_Map{}_{suffix}.png", index + 1);
                load_image_map(self.gl.clone(), map.clone(), url);
            }
        }

        {
            let gl = self.gl.clone();
            let env_map = self.env_map.clone();
            spawn_local(async move {
                match load_environment(&gl, &env_map).await {
                    Ok(()) => log::info!("environment map ready"),
                    Err(err) => {
                        log::warn!("environment map unavailable ({ENV_URL}): {err:?}")
                    }
                }
            });
        }

        {
            let gl = self.gl.clone();
            let buffer = self.vertex_buffer.clone();
            let groups = self.groups.clone();
            spawn_local(async move {
                match fetch_text(MESH_URL).await {
                    Ok(text) => {
                        let parsed = mesh::parse_obj(&text);
                        if parsed.vertices.is_empty() {
                            log::warn!("mesh at {MESH_URL} contained no triangles");
                            return;
                        }
                        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
                        let data = js_sys::Float32Array::from(parsed.vertices.as_slice());
                        gl.buffer_data_with_array_buffer_view(
                            GL::ARRAY_BUFFER,
                            &data,
                            GL::STATIC_DRAW,
                        );
                        log::info!(
                            "mesh ready: {} vertices in {} groups",
                            parsed.vertex_count(),
                            parsed.groups.len()
                        );
                        *groups.borrow_mut() = parsed.groups;
                    }
                    Err(err) => log::warn!("mesh load failed ({MESH_URL}): {err:?}"),
                }
            });
        }
    }

    /// Render one frame into the post chain and run it to the canvas.
    pub fn draw(
        &self,
        camera: &Camera,
        pose: &FramePose,
        group_angle: f64,
        post: &mut PostChain,
    ) {
        let gl = &*self.gl;
        post.begin_scene(gl);

        // The enclosing group carries camera, lights and mesh; rotating all
        // of them against the fixed environment reads as the environment
        // itself turning.
        let eye = orbit::rotate_y(pose.camera, group_angle);
        let key_light = orbit::rotate_y(pose.key_light, group_angle);
        let fill_light = orbit::rotate_y(pose.fill_light, group_angle);

        let groups = self.groups.borrow();
        if !groups.is_empty() {
            let proj = camera.projection();
            let view = Camera::view(eye);
            let model = Mat4::from_rotation_y(group_angle as f32)
                * Mat4::from_translation(MESH_OFFSET)
                * Mat4::from_scale(Vec3::splat(MESH_SCALE));
            let normal_matrix = Mat3::from_mat4(model.inverse().transpose());

            gl.use_program(Some(&self.program));
            let u = &self.uniforms;
            gl.uniform_matrix4fv_with_f32_array(u.proj.as_ref(), false, &proj.to_cols_array());
            gl.uniform_matrix4fv_with_f32_array(u.view.as_ref(), false, &view.to_cols_array());
            gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, &model.to_cols_array());
            gl.uniform_matrix3fv_with_f32_array(
                u.normal_matrix.as_ref(),
                false,
                &normal_matrix.to_cols_array(),
            );
            gl.uniform3f(
                u.camera_pos.as_ref(),
                eye.x as f32,
                eye.y as f32,
                eye.z as f32,
            );
            let light_positions: [f32; 6] = [
                key_light.x as f32,
                key_light.y as f32,
                key_light.z as f32,
                fill_light.x as f32,
                fill_light.y as f32,
                fill_light.z as f32,
            ];
            gl.uniform3fv_with_f32_array(u.light_pos.as_ref(), &light_positions);
            let light_colors: [f32; 6] = [
                LIGHT_COLORS[0][0],
                LIGHT_COLORS[0][1],
                LIGHT_COLORS[0][2],
                LIGHT_COLORS[1][0],
                LIGHT_COLORS[1][1],
                LIGHT_COLORS[1][2],
            ];
            gl.uniform3fv_with_f32_array(u.light_color.as_ref(), &light_colors);
            gl.uniform1f(u.light_intensity.as_ref(), LIGHT_INTENSITY);
            gl.uniform1f(u.light_range.as_ref(), LIGHT_RANGE);
            gl.uniform3fv_with_f32_array(u.fog_color.as_ref(), &FOG_COLOR);
            gl.uniform1f(u.fog_density.as_ref(), FOG_DENSITY);
            gl.uniform1f(u.env_intensity.as_ref(), ENV_INTENSITY);

            gl.bind_vertex_array(Some(&self.vao));
            bind_texture(gl, 5, &self.env_map);
            for (index, group) in groups.iter().enumerate() {
                // First two element groups carry the two materials; any
                // extra groups reuse the last one.
                let material = &self.materials[index.min(self.materials.len() - 1)];
                for (unit, map) in material.maps.iter().enumerate() {
                    bind_texture(gl, unit as u32, map);
                }
                gl.draw_arrays(GL::TRIANGLES, group.start, group.count);
            }
            gl.bind_vertex_array(None);
        }
        drop(groups);

        post.finish(gl);
    }
}

fn solid_texture(gl: &GL, rgba: [u8; 4]) -> Result<WebGlTexture, JsValue> {
    let texture = gl.create_texture().ok_or("create_texture failed")?;
    gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_u32_and_u32_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        1,
        1,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(rgba.as_slice()),
    )?;
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::CLAMP_TO_EDGE as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(texture)
}

/// Replace a placeholder map with a remote image once it decodes. Load and
/// decode errors leave the placeholder in place.
fn load_image_map(gl: Rc<GL>, texture: WebGlTexture, url: String) {
    let image = match HtmlImageElement::new() {
        Ok(image) => image,
        Err(err) => {
            log::error!("image element creation failed: {err:?}");
            return;
        }
    };
    image.set_cross_origin(Some("anonymous"));

    let onload = {
        let image = image.clone();
        let url = url.clone();
        Closure::wrap(Box::new(move || {
            gl.bind_texture(GL::TEXTURE_2D, Some(&texture));
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 1);
            let uploaded = gl.tex_image_2d_with_u32_and_u32_and_html_image_element(
                GL::TEXTURE_2D,
                0,
                GL::RGBA as i32,
                GL::RGBA,
                GL::UNSIGNED_BYTE,
                &image,
            );
            gl.pixel_storei(GL::UNPACK_FLIP_Y_WEBGL, 0);
            match uploaded {
                Ok(()) => {
                    gl.generate_mipmap(GL::TEXTURE_2D);
                    gl.tex_parameteri(
                        GL::TEXTURE_2D,
                        GL::TEXTURE_MIN_FILTER,
                        GL::LINEAR_MIPMAP_LINEAR as i32,
                    );
                }
                Err(err) => log::warn!("texture upload failed ({url}): {err:?}"),
            }
        }) as Box<dyn FnMut()>)
    };
    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    onload.forget();

    let onerror = {
        let url = url.clone();
        Closure::wrap(Box::new(move || {
            log::warn!("texture failed to load ({url}); keeping the default");
        }) as Box<dyn FnMut()>)
    };
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onerror.forget();

    image.set_src(&url);
}

/// Fetch and decode the equirectangular environment image, then upload it.
async fn load_environment(gl: &GL, texture: &WebGlTexture) -> Result<(), JsValue> {
    let bytes = fetch_bytes(ENV_URL).await?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| JsValue::from_str(&format!("decode failed: {err}")))?;
    let pixels = decoded.to_rgba8();
    let (width, height) = pixels.dimensions();

    gl.bind_texture(GL::TEXTURE_2D, Some(texture));
    gl.tex_image_2d_with_i32_and_i32_and_i32_and_u32_and_u32_and_opt_u8_array(
        GL::TEXTURE_2D,
        0,
        GL::RGBA as i32,
        width as i32,
        height as i32,
        0,
        GL::RGBA,
        GL::UNSIGNED_BYTE,
        Some(pixels.as_raw().as_slice()),
    )?;
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MIN_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_MAG_FILTER, GL::LINEAR as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_S, GL::REPEAT as i32);
    gl.tex_parameteri(GL::TEXTURE_2D, GL::TEXTURE_WRAP_T, GL::CLAMP_TO_EDGE as i32);
    Ok(())
}

async fn fetch_text(url: &str) -> Result<String, JsValue> {
    let response = Request::get(url).send().await.map_err(net_err)?;
    response.text().await.map_err(net_err)
}

async fn fetch_bytes(url: &str) -> Result<Vec<u8>, JsValue> {
    let response = Request::get(url).send().await.map_err(net_err)?;
    response.binary().await.map_err(net_err)
}

fn net_err(err: gloo_net::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
