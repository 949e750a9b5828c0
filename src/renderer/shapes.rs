//! Mesh generation for the cube and billboard primitives

use glam::Vec3;

use super::vertex::{BillboardVertex, CubeVertex};

/// Outward normal and two in-face axes with `u x v = normal`
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

/// Unit cube centered at the origin, 36 vertices, counter-clockwise when
/// seen from outside.
pub fn cube_vertices() -> Vec<CubeVertex> {
    let mut vertices = Vec::with_capacity(36);
    for (n, u, v) in CUBE_FACES {
        let c = n * 0.5;
        let corners = [
            c - u * 0.5 - v * 0.5,
            c + u * 0.5 - v * 0.5,
            c + u * 0.5 + v * 0.5,
            c - u * 0.5 + v * 0.5,
        ];
        for i in [0, 1, 2, 0, 2, 3] {
            vertices.push(CubeVertex::new(corners[i].to_array(), n.to_array()));
        }
    }
    vertices
}

/// Quad of `size` (width, height) at `center`, turned to face `eye`.
/// Texture v grows downward like the raster rows.
pub fn billboard_quad(center: Vec3, size: (f32, f32), eye: Vec3) -> [BillboardVertex; 6] {
    let forward = (eye - center).normalize_or(Vec3::Z);
    let right = Vec3::Y.cross(forward).normalize_or(Vec3::X);
    let up = forward.cross(right);

    let hw = right * (size.0 * 0.5);
    let hh = up * (size.1 * 0.5);
    let bl = BillboardVertex {
        position: (center - hw - hh).to_array(),
        uv: [0.0, 1.0],
    };
    let br = BillboardVertex {
        position: (center + hw - hh).to_array(),
        uv: [1.0, 1.0],
    };
    let tr = BillboardVertex {
        position: (center + hw + hh).to_array(),
        uv: [1.0, 0.0],
    };
    let tl = BillboardVertex {
        position: (center - hw + hh).to_array(),
        uv: [0.0, 0.0],
    };
    [bl, br, tr, bl, tr, tl]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(a: [f32; 3]) -> Vec3 {
        Vec3::from_array(a)
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let verts = cube_vertices();
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            let (a, b, c) = (v(tri[0].position), v(tri[1].position), v(tri[2].position));
            let n = v(tri[0].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
            // Every corner sits on the face plane
            for p in [a, b, c] {
                assert!((p.dot(n) - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_cube_is_unit_sized() {
        for vert in cube_vertices() {
            assert!(vert.position.iter().all(|c| c.abs() == 0.5));
        }
    }

    #[test]
    fn test_billboard_faces_eye() {
        let center = Vec3::new(0.0, 5.0, 0.0);
        let eye = Vec3::new(0.0, 10.0, 20.0);
        let quad = billboard_quad(center, (30.0, 15.0), eye);

        let (a, b, c) = (v(quad[0].position), v(quad[1].position), v(quad[2].position));
        let normal = (b - a).cross(c - a).normalize();
        assert!(normal.dot((eye - center).normalize()) > 0.999);

        // Width along right, height along up
        assert!(((b - a).length() - 30.0).abs() < 1e-4);
        assert!(((c - b).length() - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_billboard_top_left_is_texture_origin() {
        let quad = billboard_quad(Vec3::ZERO, (2.0, 1.0), Vec3::new(0.0, 0.0, 10.0));
        let tl = quad[5];
        assert_eq!(tl.uv, [0.0, 0.0]);
        assert_eq!(tl.position, [-1.0, 0.5, 0.0]);
    }
}
