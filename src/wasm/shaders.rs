use wasm_bindgen::JsValue;
use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader};

pub fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl.create_shader(kind).ok_or("create_shader failed")?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);
    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| "unknown shader error".into());
        Err(JsValue::from_str(&info))
    }
}

pub fn link_program(gl: &GL, vert: &str, frag: &str) -> Result<WebGlProgram, JsValue> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vert)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, frag)?;
    let program = gl.create_program().ok_or("create_program failed")?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.link_program(&program);
    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl
            .get_program_info_log(&program)
            .unwrap_or_else(|| "unknown link error".into());
        Err(JsValue::from_str(&info))
    }
}

pub const MESH_VERT: &str = r#"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_proj;
uniform mat4 u_view;
uniform mat4 u_model;
uniform mat3 u_normal_matrix;

out vec3 v_world_pos;
out vec3 v_normal;
out vec2 v_uv;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    v_world_pos = world.xyz;
    v_normal = u_normal_matrix * a_normal;
    v_uv = a_uv;
    gl_Position = u_proj * u_view * world;
}
"#;

pub const MESH_FRAG: &str = r#"#version 300 es
precision highp float;

in vec3 v_world_pos;
in vec3 v_normal;
in vec2 v_uv;

uniform sampler2D u_base_color_map;
uniform sampler2D u_metallic_map;
uniform sampler2D u_normal_map;
uniform sampler2D u_roughness_map;
uniform sampler2D u_ao_map;
uniform sampler2D u_env_map;

uniform vec3 u_camera_pos;
uniform vec3 u_light_pos[2];
uniform vec3 u_light_color[2];
uniform float u_light_intensity;
uniform float u_light_range;
uniform vec3 u_fog_color;
uniform float u_fog_density;
uniform float u_env_intensity;

out vec4 frag_color;

const float PI = 3.14159265358979;

// Tangent frame from screen-space derivatives; the mesh carries no tangents.
mat3 cotangent_frame(vec3 n, vec3 p, vec2 uv) {
    vec3 dp1 = dFdx(p);
    vec3 dp2 = dFdy(p);
    vec2 duv1 = dFdx(uv);
    vec2 duv2 = dFdy(uv);
    vec3 dp2perp = cross(dp2, n);
    vec3 dp1perp = cross(n, dp1);
    vec3 t = dp2perp * duv1.x + dp1perp * duv2.x;
    vec3 b = dp2perp * duv1.y + dp1perp * duv2.y;
    float invmax = inversesqrt(max(dot(t, t), dot(b, b)));
    return mat3(t * invmax, b * invmax, n);
}

vec2 equirect_uv(vec3 dir) {
    float u = atan(dir.z, dir.x) / (2.0 * PI) + 0.5;
    float v = acos(clamp(dir.y, -1.0, 1.0)) / PI;
    return vec2(u, 1.0 - v);
}

void main() {
    vec3 base_color = texture(u_base_color_map, v_uv).rgb;
    float metallic = texture(u_metallic_map, v_uv).r;
    float roughness = clamp(texture(u_roughness_map, v_uv).r, 0.04, 1.0);
    float ao = texture(u_ao_map, v_uv).r;

    vec3 view_dir = normalize(u_camera_pos - v_world_pos);
    vec3 n = normalize(v_normal);
    vec3 bump = texture(u_normal_map, v_uv).xyz * 2.0 - 1.0;
    n = normalize(cotangent_frame(n, -view_dir, v_uv) * bump);

    vec3 f0 = mix(vec3(0.04), base_color, metallic);
    vec3 diffuse_albedo = base_color * (1.0 - metallic);

    vec3 color = vec3(0.0);
    for (int i = 0; i < 2; ++i) {
        vec3 to_light = u_light_pos[i] - v_world_pos;
        float dist = length(to_light);
        vec3 l = to_light / dist;
        float attenuation = u_light_intensity * max(1.0 - dist / u_light_range, 0.0);
        float n_dot_l = max(dot(n, l), 0.0);
        vec3 h = normalize(l + view_dir);
        float shininess = mix(256.0, 4.0, roughness);
        float spec = pow(max(dot(n, h), 0.0), shininess) * (1.0 - 0.5 * roughness);
        color += (diffuse_albedo / PI + f0 * spec) * u_light_color[i] * attenuation * n_dot_l;
    }

    vec3 reflected = reflect(-view_dir, n);
    vec3 env = texture(u_env_map, equirect_uv(reflected)).rgb;
    color += env * u_env_intensity * f0 * (1.0 - 0.8 * roughness);
    color *= ao;

    float depth = length(u_camera_pos - v_world_pos);
    float fog = 1.0 - exp(-u_fog_density * u_fog_density * depth * depth);
    color = mix(color, u_fog_color, fog);

    frag_color = vec4(color, 1.0);
}
"#;

// Post passes all share one fullscreen-triangle vertex stage.
pub const QUAD_VERT: &str = r#"#version 300 es
layout(location = 0) in vec2 a_position;
out vec2 v_uv;
void main() {
    v_uv = a_position * 0.5 + 0.5;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

pub const TRAIL_FRAG: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_current;
uniform sampler2D u_previous;
uniform float u_damp;
out vec4 frag_color;
void main() {
    vec4 current = texture(u_current, v_uv);
    vec4 previous = texture(u_previous, v_uv) * u_damp;
    frag_color = max(current, previous);
}
"#;

pub const BRIGHT_FRAG: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_input;
uniform float u_threshold;
out vec4 frag_color;
void main() {
    vec4 color = texture(u_input, v_uv);
    float luma = dot(color.rgb, vec3(0.2126, 0.7152, 0.0722));
    float keep = smoothstep(u_threshold, u_threshold + 0.1, luma);
    frag_color = color * keep;
}
"#;

pub const BLUR_FRAG: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_input;
// One texel along the blur axis, pre-scaled by the bloom radius.
uniform vec2 u_step;
out vec4 frag_color;
void main() {
    const float w[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    vec4 sum = texture(u_input, v_uv) * w[0];
    for (int i = 1; i < 5; ++i) {
        vec2 offset = u_step * float(i);
        sum += texture(u_input, v_uv + offset) * w[i];
        sum += texture(u_input, v_uv - offset) * w[i];
    }
    frag_color = sum;
}
"#;

pub const COMPOSITE_FRAG: &str = r#"#version 300 es
precision highp float;
in vec2 v_uv;
uniform sampler2D u_base;
uniform sampler2D u_bloom;
uniform float u_strength;
out vec4 frag_color;
void main() {
    frag_color = texture(u_base, v_uv) + texture(u_bloom, v_uv) * u_strength;
}
"#;
