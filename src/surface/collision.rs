//! Collision shape derived from the surface mesh
//!
//! The same vertex and triangle arrays the renderer gets, reinterpreted as a
//! triangle soup for hit-testing. A surface never edits a collision mesh in
//! place; each rebuild hands out a new one and drops the old.

use crate::math::{Ray, Vec3, ray_triangle_intersect};
use super::mesh::SurfaceMesh;

/// Result of a successful raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the ray
    pub distance: f32,
    /// Hit position, in the mesh's own space
    pub point: Vec3,
    /// Index of the triangle that was hit
    pub triangle: usize,
}

/// Triangle soup with a bounding box for early rejection
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    min: Vec3,
    max: Vec3,
}

impl CollisionMesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let (min, max) = match vertices.first() {
            Some(&first) => vertices
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
            None => (Vec3::ZERO, Vec3::ZERO),
        };
        Self {
            vertices,
            triangles,
            min,
            max,
        }
    }

    pub fn from_surface(mesh: &SurfaceMesh) -> Self {
        Self {
            vertices: mesh.vertices.clone(),
            triangles: mesh.triangle_indices().collect(),
            min: mesh.bounds.0,
            max: mesh.bounds.1,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    /// Nearest triangle hit within `max_distance`
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        if !self.ray_hits_bounds(ray, max_distance) {
            return None;
        }

        let mut best: Option<RayHit> = None;
        for (i, tri) in self.triangles.iter().enumerate() {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            if let Some(t) = ray_triangle_intersect(ray.origin, ray.direction, v0, v1, v2) {
                if t <= max_distance && best.map_or(true, |b| t < b.distance) {
                    best = Some(RayHit {
                        distance: t,
                        point: ray.at(t),
                        triangle: i,
                    });
                }
            }
        }
        best
    }

    /// Slab test against the bounding box, slightly padded so flat
    /// (zero-thickness) boxes still register hits.
    fn ray_hits_bounds(&self, ray: &Ray, max_distance: f32) -> bool {
        const PAD: f32 = 1e-4;
        let origin = [ray.origin.x, ray.origin.y, ray.origin.z];
        let dir = [ray.direction.x, ray.direction.y, ray.direction.z];
        let lo = [self.min.x - PAD, self.min.y - PAD, self.min.z - PAD];
        let hi = [self.max.x + PAD, self.max.y + PAD, self.max.z + PAD];

        let mut t_min = 0.0f32;
        let mut t_max = max_distance;
        for axis in 0..3 {
            if dir[axis].abs() < 1e-12 {
                if origin[axis] < lo[axis] || origin[axis] > hi[axis] {
                    return false;
                }
                continue;
            }
            let inv = 1.0 / dir[axis];
            let mut t0 = (lo[axis] - origin[axis]) * inv;
            let mut t1 = (hi[axis] - origin[axis]) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}
