//! Bodies placed in the world
//!
//! - `DeformableBody` - a heightfield surface at some transform, diggable
//! - `StaticBody` - a fixed collision mesh (rock, wall) that blocks digs

use std::sync::Arc;
use crate::surface::{CollisionMesh, HeightfieldSurface};
use super::deformable::{Collidable, MeshDeformer};
use super::transform::Transform;

/// A diggable heightfield placed in the world
#[derive(Debug, Clone)]
pub struct DeformableBody {
    pub transform: Transform,
    pub surface: HeightfieldSurface,
}

impl DeformableBody {
    pub fn new(transform: Transform, surface: HeightfieldSurface) -> Self {
        Self { transform, surface }
    }
}

impl Collidable for DeformableBody {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn collision(&self) -> &CollisionMesh {
        self.surface.collision()
    }

    fn as_deformer(&mut self) -> Option<&mut dyn MeshDeformer> {
        Some(&mut self.surface)
    }
}

/// Geometry that can be hit but never dug
#[derive(Debug, Clone)]
pub struct StaticBody {
    pub transform: Transform,
    collision: Arc<CollisionMesh>,
}

impl StaticBody {
    pub fn new(transform: Transform, collision: impl Into<Arc<CollisionMesh>>) -> Self {
        Self {
            transform,
            collision: collision.into(),
        }
    }
}

impl Collidable for StaticBody {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn collision(&self) -> &CollisionMesh {
        &self.collision
    }
}
