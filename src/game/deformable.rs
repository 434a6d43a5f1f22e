//! Capability traits for things a dig can hit
//!
//! Every body in the world is `Collidable`. Only some of them can be dug
//! into; callers ask for that capability with `as_deformer` and get `None`
//! from everything else.

use crate::math::Vec3;
use crate::surface::{CollisionMesh, DeformStats, HeightfieldSurface};
use super::transform::Transform;

/// Something that can be carved at a point in its own local space
pub trait MeshDeformer {
    /// Carve at `local_point` with the deformer's own radius and depth
    fn deform(&mut self, local_point: Vec3) -> DeformStats;
}

impl MeshDeformer for HeightfieldSurface {
    fn deform(&mut self, local_point: Vec3) -> DeformStats {
        HeightfieldSurface::deform(self, local_point)
    }
}

/// Anything a ray can hit
pub trait Collidable {
    /// World placement of the collision shape
    fn transform(&self) -> &Transform;

    /// Collision shape in local space
    fn collision(&self) -> &CollisionMesh;

    /// Deform capability, if this body has one
    fn as_deformer(&mut self) -> Option<&mut dyn MeshDeformer> {
        None
    }
}
