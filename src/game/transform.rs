//! Body Transforms
//!
//! Position, euler rotation and uniform scale for a body in the world. The
//! surface works purely in its own local frame, so anything hitting it in
//! world space goes through `inverse_transform_point` first.

use serde::{Serialize, Deserialize};
use crate::math::{
    Vec3, Mat4, mat4_mul, mat4_translation, mat4_rotation, mat4_scale,
    mat4_transform_point, mat4_transform_direction, mat4_inverse_affine,
};

/// World placement of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position of the local origin
    pub position: Vec3,
    /// Rotation in euler angles (degrees)
    pub rotation: Vec3,
    /// Scale factor (uniform)
    pub scale: f32,
}

impl Transform {
    /// Identity transform (origin, no rotation, scale 1)
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    /// Create transform at a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// Local-to-world matrix: translate * rotate * scale
    pub fn to_matrix(&self) -> Mat4 {
        let base = mat4_mul(&mat4_translation(self.position), &mat4_rotation(self.rotation));
        if (self.scale - 1.0).abs() < 0.0001 {
            base
        } else {
            mat4_mul(&base, &mat4_scale(self.scale))
        }
    }

    /// World-to-local matrix, `None` for a zero scale
    pub fn inverse_matrix(&self) -> Option<Mat4> {
        mat4_inverse_affine(&self.to_matrix())
    }

    /// Transform a point from local space to world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        mat4_transform_point(&self.to_matrix(), point)
    }

    /// Transform a point from world space into this body's local space
    pub fn inverse_transform_point(&self, point: Vec3) -> Option<Vec3> {
        self.inverse_matrix().map(|m| mat4_transform_point(&m, point))
    }

    /// Transform a direction from world space into local space (not normalized)
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Option<Vec3> {
        self.inverse_matrix().map(|m| mat4_transform_direction(&m, direction))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
