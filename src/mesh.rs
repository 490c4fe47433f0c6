//! Minimal Wavefront OBJ parsing.
//!
//! Produces an unindexed, interleaved triangle list (position, normal, uv;
//! 8 floats per vertex) split into element groups in declaration order so
//! the renderer can assign one material per group. Faces with more than
//! three vertices are fan-triangulated; missing normals fall back to the
//! flat face normal.

/// Floats per interleaved vertex: 3 position + 3 normal + 2 uv.
pub const VERTEX_STRIDE: usize = 8;

/// Contiguous vertex range drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshGroup {
    /// First vertex of the range.
    pub start: i32,
    /// Number of vertices in the range.
    pub count: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    /// Interleaved vertex data, [`VERTEX_STRIDE`] floats per vertex.
    pub vertices: Vec<f32>,
    pub groups: Vec<MeshGroup>,
}

impl ObjMesh {
    pub fn vertex_count(&self) -> i32 {
        (self.vertices.len() / VERTEX_STRIDE) as i32
    }
}

pub fn parse_obj(text: &str) -> ObjMesh {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut mesh = ObjMesh::default();
    let mut group_start = 0i32;

    for line in text.lines() {
        let line = line.trim();
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => positions.push(read_vec3(&mut fields)),
            Some("vt") => {
                let mut uv = [0.0f32; 2];
                for slot in &mut uv {
                    *slot = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0.0);
                }
                uvs.push(uv);
            }
            Some("vn") => normals.push(read_vec3(&mut fields)),
            Some("g") | Some("o") => {
                // A new element group; close the previous one if it emitted
                // any triangles.
                let here = mesh.vertex_count();
                if here > group_start {
                    mesh.groups.push(MeshGroup {
                        start: group_start,
                        count: here - group_start,
                    });
                    group_start = here;
                }
            }
            Some("f") => {
                let corners: Vec<(usize, Option<usize>, Option<usize>)> =
                    fields.filter_map(parse_face_corner).collect();
                if corners.len() < 3 {
                    continue;
                }
                for i in 1..corners.len() - 1 {
                    emit_triangle(
                        &mut mesh.vertices,
                        [corners[0], corners[i], corners[i + 1]],
                        &positions,
                        &uvs,
                        &normals,
                    );
                }
            }
            _ => {}
        }
    }

    let here = mesh.vertex_count();
    if here > group_start {
        mesh.groups.push(MeshGroup {
            start: group_start,
            count: here - group_start,
        });
    }
    mesh
}

fn read_vec3<'a>(fields: &mut impl Iterator<Item = &'a str>) -> [f32; 3] {
    let mut v = [0.0f32; 3];
    for slot in &mut v {
        *slot = fields.next().and_then(|f| f.parse().ok()).unwrap_or(0.0);
    }
    v
}

/// One `f`-line corner: `v`, `v/t`, `v//n` or `v/t/n`, 1-based.
fn parse_face_corner(field: &str) -> Option<(usize, Option<usize>, Option<usize>)> {
    let mut parts = field.split('/');
    let position: usize = parts.next()?.parse().ok()?;
    let uv = parts.next().and_then(|p| p.parse().ok());
    let normal = parts.next().and_then(|p| p.parse().ok());
    Some((position - 1, uv.map(|i: usize| i - 1), normal.map(|i: usize| i - 1)))
}

fn emit_triangle(
    out: &mut Vec<f32>,
    corners: [(usize, Option<usize>, Option<usize>); 3],
    positions: &[[f32; 3]],
    uvs: &[[f32; 2]],
    normals: &[[f32; 3]],
) {
    let p: Vec<[f32; 3]> = corners
        .iter()
        .map(|(pi, _, _)| positions.get(*pi).copied().unwrap_or([0.0; 3]))
        .collect();
    let flat = face_normal(&p[0], &p[1], &p[2]);

    for (corner, position) in corners.iter().zip(&p) {
        let (_, uv_index, normal_index) = corner;
        let normal = normal_index
            .and_then(|i| normals.get(i).copied())
            .unwrap_or(flat);
        let uv = uv_index.and_then(|i| uvs.get(i).copied()).unwrap_or([0.0; 2]);
        out.extend_from_slice(position);
        out.extend_from_slice(&normal);
        out.extend_from_slice(&uv);
    }
}

fn face_normal(a: &[f32; 3], b: &[f32; 3], c: &[f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 0.0 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn quads_are_fan_triangulated() {
        let mesh = parse_obj(QUAD);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.groups, vec![MeshGroup { start: 0, count: 6 }]);
    }

    #[test]
    fn missing_normals_get_the_flat_face_normal() {
        let mesh = parse_obj(QUAD);
        // Quad in the XY plane faces +Z.
        let normal = &mesh.vertices[3..6];
        assert!((normal[0]).abs() < 1e-6);
        assert!((normal[1]).abs() < 1e-6);
        assert!((normal[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn groups_split_in_declaration_order() {
        let two_groups = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
g first
f 1 2 3
g second
f 1 2 4
f 2 3 4
";
        let mesh = parse_obj(two_groups);
        assert_eq!(
            mesh.groups,
            vec![
                MeshGroup { start: 0, count: 3 },
                MeshGroup { start: 3, count: 6 },
            ]
        );
    }

    #[test]
    fn slash_formats_parse() {
        assert_eq!(parse_face_corner("7"), Some((6, None, None)));
        assert_eq!(parse_face_corner("7/2"), Some((6, Some(1), None)));
        assert_eq!(parse_face_corner("7//3"), Some((6, None, Some(2))));
        assert_eq!(parse_face_corner("7/2/3"), Some((6, Some(1), Some(2))));
    }

    #[test]
    fn explicit_normals_and_uvs_are_used() {
        let obj = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 -1
vt 0.5 0.25
f 1/1/1 2/1/1 3/1/1
";
        let mesh = parse_obj(obj);
        let first = &mesh.vertices[0..VERTEX_STRIDE];
        assert_eq!(&first[3..6], &[0.0, 0.0, -1.0]);
        assert_eq!(&first[6..8], &[0.5, 0.25]);
    }
}
