//! 4x4 matrix operations (for transforms)
//!
//! Matrices are row-major and act on column vectors: the translation lives
//! in the last column, `m[row][3]`.

use super::vec::Vec3;

/// 4x4 transformation matrix type
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub fn mat4_identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create translation matrix
pub fn mat4_translation(t: Vec3) -> Mat4 {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Uniform scale matrix
pub fn mat4_scale(s: f32) -> Mat4 {
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Build a rotation matrix from euler angles (degrees).
/// Rotation order: Z * Y * X.
pub fn mat4_rotation(rot: Vec3) -> Mat4 {
    let (sx, cx) = rot.x.to_radians().sin_cos();
    let (sy, cy) = rot.y.to_radians().sin_cos();
    let (sz, cz) = rot.z.to_radians().sin_cos();

    [
        [cy * cz, sx * sy * cz - cx * sz, cx * sy * cz + sx * sz, 0.0],
        [cy * sz, sx * sy * sz + cx * cz, cx * sy * sz - sx * cz, 0.0],
        [-sy, sx * cy, cx * cy, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transform a point by a 4x4 matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Transform a direction (translation ignored)
pub fn mat4_transform_direction(m: &Mat4, d: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * d.x + m[0][1] * d.y + m[0][2] * d.z,
        m[1][0] * d.x + m[1][1] * d.y + m[1][2] * d.z,
        m[2][0] * d.x + m[2][1] * d.y + m[2][2] * d.z,
    )
}

/// Invert an affine matrix (bottom row assumed `0 0 0 1`).
///
/// Returns `None` when the 3x3 linear part is singular, e.g. a zero scale.
pub fn mat4_inverse_affine(m: &Mat4) -> Option<Mat4> {
    let a = m[0][0];
    let b = m[0][1];
    let c = m[0][2];
    let d = m[1][0];
    let e = m[1][1];
    let f = m[1][2];
    let g = m[2][0];
    let h = m[2][1];
    let i = m[2][2];

    let co00 = e * i - f * h;
    let co01 = -(d * i - f * g);
    let co02 = d * h - e * g;

    let det = a * co00 + b * co01 + c * co02;
    if det.abs() < 1e-12 || !det.is_finite() {
        return None;
    }
    let inv_det = 1.0 / det;

    // Adjugate (transposed cofactors) scaled by 1/det
    let r = [
        [co00 * inv_det, -(b * i - c * h) * inv_det, (b * f - c * e) * inv_det],
        [co01 * inv_det, (a * i - c * g) * inv_det, -(a * f - c * d) * inv_det],
        [co02 * inv_det, -(a * h - b * g) * inv_det, (a * e - b * d) * inv_det],
    ];

    let t = Vec3::new(m[0][3], m[1][3], m[2][3]);
    let mut out = mat4_identity();
    for row in 0..3 {
        out[row][0] = r[row][0];
        out[row][1] = r[row][1];
        out[row][2] = r[row][2];
        out[row][3] = -(r[row][0] * t.x + r[row][1] * t.y + r[row][2] * t.z);
    }
    Some(out)
}
