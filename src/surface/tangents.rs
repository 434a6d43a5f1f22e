//! Per-vertex tangent frames from UV gradients
//!
//! For every triangle the UV-space edge deltas give the directions in which
//! `u` and `v` increase across the face (`sdir` and `tdir`). Those are summed
//! per vertex, then the summed `sdir` is orthonormalized against the vertex
//! normal. The w component records handedness: -1 when
//! `normal × tangent` points away from the summed `tdir`.

use crate::math::{Vec2, Vec3, Vec4, ortho_normalize};

/// UV determinants smaller than this are treated as zero-area in UV space
const DEGENERATE_UV_EPSILON: f32 = 1e-8;

/// Compute tangents for an indexed triangle mesh.
///
/// Triangles with a degenerate UV mapping contribute nothing; a vertex left
/// with no usable tangent gets an arbitrary unit axis perpendicular to its
/// normal.
pub fn compute_tangents(
    vertices: &[Vec3],
    normals: &[Vec3],
    uvs: &[Vec2],
    triangles: &[u32],
) -> Vec<Vec4> {
    let mut tan1 = vec![Vec3::ZERO; vertices.len()];
    let mut tan2 = vec![Vec3::ZERO; vertices.len()];
    let mut degenerate = 0usize;

    for tri in triangles.chunks_exact(3) {
        let (i1, i2, i3) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

        let v1 = vertices[i1];
        let v2 = vertices[i2];
        let v3 = vertices[i3];

        let w1 = uvs[i1];
        let w2 = uvs[i2];
        let w3 = uvs[i3];

        let x1 = v2.x - v1.x;
        let x2 = v3.x - v1.x;
        let y1 = v2.y - v1.y;
        let y2 = v3.y - v1.y;
        let z1 = v2.z - v1.z;
        let z2 = v3.z - v1.z;

        let s1 = w2.x - w1.x;
        let s2 = w3.x - w1.x;
        let t1 = w2.y - w1.y;
        let t2 = w3.y - w1.y;

        let det = s1 * t2 - s2 * t1;
        if det.abs() < DEGENERATE_UV_EPSILON || !det.is_finite() {
            degenerate += 1;
            continue;
        }
        let r = 1.0 / det;

        let sdir = Vec3::new(
            (t2 * x1 - t1 * x2) * r,
            (t2 * y1 - t1 * y2) * r,
            (t2 * z1 - t1 * z2) * r,
        );
        let tdir = Vec3::new(
            (s1 * x2 - s2 * x1) * r,
            (s1 * y2 - s2 * y1) * r,
            (s1 * z2 - s2 * z1) * r,
        );

        tan1[i1] += sdir;
        tan1[i2] += sdir;
        tan1[i3] += sdir;

        tan2[i1] += tdir;
        tan2[i2] += tdir;
        tan2[i3] += tdir;
    }

    if degenerate > 0 {
        log::warn!(
            "tangents: {} triangle(s) with degenerate UVs skipped",
            degenerate
        );
    }

    normals
        .iter()
        .zip(tan1.iter().zip(tan2.iter()))
        .map(|(&normal, (&sum_s, &sum_t))| {
            let (n, t) = ortho_normalize(normal, sum_s);
            let handedness = if n.cross(t).dot(sum_t) < 0.0 { -1.0 } else { 1.0 };
            Vec4::from_vec3(t, handedness)
        })
        .collect()
}
