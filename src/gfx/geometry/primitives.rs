//! # Primitive Shape Generation
//!
//! Cube, stacked-cube pyramid and ground quad. Everything here is pure data
//! construction; nothing touches the GPU.

use cgmath::Vector3;
use rand::Rng;

use crate::gfx::scene::{Material, MeshData, Vertex};

pub const CUBE_VERTEX_COUNT: usize = 14;
pub const CUBE_INDEX_COUNT: usize = 36;

// Position offset, uv, normal. Some corners are duplicated so each face can
// carry its own UVs on the cross-shaped texture layout.
#[rustfmt::skip]
const CUBE_VERTICES: [([f32; 3], [f32; 2], [f32; 3]); CUBE_VERTEX_COUNT] = [
    ([0.0, 1.0, 0.0], [0.0, 0.66],  [-1.0, 2.0, -1.0]),
    ([0.0, 0.0, 0.0], [0.25, 0.66], [-1.0, -1.0, -1.0]),
    ([1.0, 1.0, 0.0], [0.0, 0.33],  [2.0, 2.0, -1.0]),
    ([1.0, 0.0, 0.0], [0.25, 0.33], [2.0, -1.0, -1.0]),

    ([0.0, 0.0, 1.0], [0.5, 0.66],  [-1.0, -1.0, 2.0]),
    ([1.0, 0.0, 1.0], [0.5, 0.33],  [2.0, -1.0, 2.0]),
    ([0.0, 1.0, 1.0], [0.75, 0.66], [-1.0, 2.0, -1.0]),
    ([1.0, 1.0, 1.0], [0.75, 0.33], [2.0, 2.0, 2.0]),

    ([0.0, 1.0, 0.0], [1.0, 0.66],  [-1.0, 2.0, -1.0]),
    ([1.0, 1.0, 0.0], [1.0, 0.33],  [2.0, 2.0, -1.0]),

    ([0.0, 1.0, 0.0], [0.25, 1.0],  [-1.0, 2.0, -1.0]),
    ([0.0, 1.0, 1.0], [0.5, 1.0],   [-1.0, 2.0, 2.0]),

    ([1.0, 1.0, 0.0], [0.25, 0.0],  [2.0, 2.0, -1.0]),
    ([1.0, 1.0, 1.0], [0.5, 0.0],   [2.0, 2.0, 2.0]),
];

// Counter-clockwise seen from outside the cube
#[rustfmt::skip]
const CUBE_INDICES: [u32; CUBE_INDEX_COUNT] = [
    0, 2, 1,    1, 2, 3,    // Front
    4, 5, 6,    5, 7, 6,    // Back
    6, 7, 8,    7, 9, 8,    // Top
    1, 3, 4,    3, 5, 4,    // Bottom
    1, 11, 10,  1, 4, 11,   // Left
    3, 12, 5,   5, 12, 13,  // Right
];

/// Generate a unit cube with its minimum corner at `origin`
///
/// Returns 14 vertices and 36 indices (12 triangles), each index offset by
/// `base_index` so the cube can be merged into a larger vertex list.
pub fn make_cube(origin: Vector3<f32>, base_index: u32) -> MeshData {
    let vertices = CUBE_VERTICES
        .iter()
        .map(|(offset, uv, normal)| {
            Vertex::new(
                [origin.x + offset[0], origin.y + offset[1], origin.z + offset[2]],
                *uv,
                *normal,
            )
        })
        .collect();

    let indices = CUBE_INDICES.iter().map(|i| base_index + i).collect();

    MeshData::new(vertices, indices)
}

/// Unit cube at the origin with zero index base
pub fn make_cube_at_origin() -> MeshData {
    make_cube(Vector3::new(0.0, 0.0, 0.0), 0)
}

/// Stack unit cubes into a square pyramid with `rows` layers
///
/// Layer `r` is a `(rows - r) x (rows - r)` grid at height `r`, shifted by
/// `0.5 * r` on x and z so it sits centered on the layer below. All cubes are
/// merged into one mesh; seam normals are left as generated.
pub fn make_pyramid(rows: u32) -> MeshData {
    let mut pyramid = MeshData::default();

    let mut offset = 0.0f32;
    for row in 0..rows {
        let span = rows - row;
        for i in 0..span {
            for j in 0..span {
                let origin = Vector3::new(offset + i as f32, row as f32, offset + j as f32);
                let cube = make_cube(origin, pyramid.vertices.len() as u32);
                pyramid.vertices.extend(cube.vertices);
                pyramid.indices.extend(cube.indices);
            }
        }

        offset += 0.5;
    }

    pyramid
}

/// Number of unit cubes `make_pyramid(rows)` stacks
pub fn pyramid_cube_count(rows: u32) -> usize {
    (1..=rows as usize).map(|n| n * n).sum()
}

/// Flat square on the XZ plane, normal +Y, from `-half_extent` to `half_extent`
pub fn make_ground(half_extent: f32) -> MeshData {
    let h = half_extent;
    let up = [0.0, 1.0, 0.0];
    let vertices = vec![
        Vertex::new([-h, 0.0, -h], [1.0, 1.0], up),
        Vertex::new([h, 0.0, -h], [1.0, 0.0], up),
        Vertex::new([h, 0.0, h], [0.0, 0.0], up),
        Vertex::new([-h, 0.0, h], [0.0, 1.0], up),
    ];

    MeshData::new(vertices, vec![0, 1, 2, 2, 3, 0])
}

/// Default material with a random diffuse tint drawn from `rng`
pub fn procedural_material<R: Rng + ?Sized>(rng: &mut R) -> Material {
    let tint = [
        rng.random_range(0.2..1.0),
        rng.random_range(0.2..1.0),
        rng.random_range(0.2..1.0),
    ];
    Material::default().with_diffuse(tint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_cube_generation() {
        let cube = make_cube_at_origin();
        assert_eq!(cube.vertex_count(), 14);
        assert_eq!(cube.index_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertex_count()));
        assert!(cube.validate().is_ok());
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = make_cube_at_origin();
        let center = Vector3::new(0.5f32, 0.5, 0.5);

        for triangle in cube.indices.chunks(3) {
            let p = |i: u32| Vector3::from(cube.vertices[i as usize].position);
            let (a, b, c) = (p(triangle[0]), p(triangle[1]), p(triangle[2]));
            let face_normal = (b - a).cross(c - a);
            let outward = (a + b + c) / 3.0 - center;
            assert!(
                cgmath::dot(face_normal, outward) > 0.0,
                "triangle {:?} winds inward",
                triangle
            );
        }
    }

    #[test]
    fn test_cube_base_index_offsets_every_index() {
        let cube = make_cube(Vector3::new(2.0, 0.0, 0.0), 100);
        assert!(cube.indices.iter().all(|&i| (100..114).contains(&i)));
        assert_eq!(cube.vertices[1].position, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pyramid_generation() {
        let pyramid = make_pyramid(3);
        assert_eq!(pyramid_cube_count(3), 14);
        assert_eq!(pyramid.index_count(), 504);
        assert_eq!(pyramid.vertex_count(), 196);
        assert!(pyramid.validate().is_ok());

        // Second layer starts half a unit in
        let layer_one_min = pyramid
            .vertices
            .iter()
            .filter(|v| v.position[1] == 1.0 && v.uv == [0.25, 0.66])
            .map(|v| v.position[0])
            .fold(f32::INFINITY, f32::min);
        assert_eq!(layer_one_min, 0.5);
    }

    #[test]
    fn test_empty_pyramid() {
        let pyramid = make_pyramid(0);
        assert!(pyramid.vertices.is_empty());
        assert!(pyramid.validate().is_err());
    }

    #[test]
    fn test_ground_generation() {
        let ground = make_ground(5.0);
        assert_eq!(ground.vertex_count(), 4);
        assert_eq!(ground.indices, vec![0, 1, 2, 2, 3, 0]);
    }

    #[test]
    fn test_procedural_material_is_seed_deterministic() {
        let a = procedural_material(&mut StdRng::seed_from_u64(7));
        let b = procedural_material(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.diffuse_color.iter().all(|c| (0.2..1.0).contains(c)));
    }
}
