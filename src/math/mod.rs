//! Small 3D math kit for surface generation and picking
//!
//! # Module Organization
//!
//! - `vec` - Vec2, Vec3, Vec4 and Gram-Schmidt orthonormalization
//! - `mat` - 4x4 affine matrices (row-major, column vector convention)
//! - `ray` - Ray type, ray/triangle intersection

pub mod mat;
pub mod ray;
pub mod vec;

pub use vec::{Vec2, Vec3, Vec4, ortho_normalize};

pub use mat::{
    Mat4,
    mat4_identity, mat4_translation, mat4_rotation, mat4_scale,
    mat4_mul, mat4_transform_point, mat4_transform_direction,
    mat4_inverse_affine,
};

pub use ray::{Ray, ray_triangle_intersect};
