//! Triangulated surface generated from a heightmap
//!
//! Layout is row-major with `z` outer and `x` inner, so vertex `(x, z)` lives
//! at index `z * (grid_size + 1) + x`. Each cell emits two triangles:
//!
//! ```text
//!   topLeft (x, z) ---- topRight (x+1, z)
//!        |          /        |
//!        |        /          |
//!   bottomLeft (x, z+1) -- bottomRight (x+1, z+1)
//! ```
//!
//! wound `(topLeft, bottomLeft, topRight)` and `(topRight, bottomLeft, bottomRight)`,
//! which faces +Y on a flat grid.

use crate::math::{Vec2, Vec3, Vec4};
use super::config::DeformerConfig;
use super::heightmap::Heightmap;
use super::tangents::compute_tangents;

/// One complete, immutable mesh state. Never patched in place: every edit
/// produces a fresh `SurfaceMesh`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMesh {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Vertex index triples, flattened
    pub triangles: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec4>,
    /// Axis-aligned bounds (min, max) of `vertices`
    pub bounds: (Vec3, Vec3),
}

impl SurfaceMesh {
    /// Build positions, UVs and indices, then derive normals, tangents and bounds
    pub fn generate(heightmap: &Heightmap, config: &DeformerConfig) -> Self {
        let (vertices, uvs) = build_vertices(heightmap, config);
        let triangles = build_triangles(config.grid_size);
        let normals = compute_normals(&vertices, &triangles);
        let tangents = compute_tangents(&vertices, &normals, &uvs, &triangles);
        let bounds = compute_bounds(&vertices);

        Self {
            vertices,
            uvs,
            triangles,
            normals,
            tangents,
            bounds,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    /// Iterate triangles as index triples
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Vertex positions and UVs for a `(n+1)²` grid
fn build_vertices(heightmap: &Heightmap, config: &DeformerConfig) -> (Vec<Vec3>, Vec<Vec2>) {
    let n = config.grid_size;
    let count = (n + 1) * (n + 1);
    let mut vertices = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);

    for z in 0..=n {
        for x in 0..=n {
            let height = heightmap.vertex_height(x, z);
            vertices.push(Vec3::new(x as f32 * config.cell_size, height, z as f32 * config.cell_size));
            uvs.push(Vec2::new(x as f32 / n as f32, z as f32 / n as f32));
        }
    }

    (vertices, uvs)
}

/// Two triangles per cell, `6 * n²` indices
fn build_triangles(n: usize) -> Vec<u32> {
    let stride = (n + 1) as u32;
    let mut triangles = Vec::with_capacity(n * n * 6);

    for z in 0..n as u32 {
        for x in 0..n as u32 {
            let top_left = z * stride + x;
            let top_right = top_left + 1;
            let bottom_left = top_left + stride;
            let bottom_right = bottom_left + 1;

            triangles.extend_from_slice(&[top_left, bottom_left, top_right]);
            triangles.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    triangles
}

/// Smooth per-vertex normals.
///
/// The unnormalized face normal `(v2 - v1) × (v3 - v1)` has length twice the
/// triangle area, so summing it weights each face by area.
pub fn compute_normals(vertices: &[Vec3], triangles: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; vertices.len()];

    for tri in triangles.chunks_exact(3) {
        let (i1, i2, i3) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (vertices[i2] - vertices[i1]).cross(vertices[i3] - vertices[i1]);
        normals[i1] += face;
        normals[i2] += face;
        normals[i3] += face;
    }

    for n in normals.iter_mut() {
        *n = n.normalize();
    }
    normals
}

fn compute_bounds(vertices: &[Vec3]) -> (Vec3, Vec3) {
    let Some(&first) = vertices.first() else {
        return (Vec3::ZERO, Vec3::ZERO);
    };
    vertices
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}
