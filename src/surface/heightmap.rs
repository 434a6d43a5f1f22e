//! Per-cell height offsets and radial sculpting
//!
//! The heightmap has one slot per cell, `grid_size × grid_size`, indexed
//! `[x][z]`. Vertex `(x, z)` takes its height from slot `[x][z]`; the extra
//! vertex row and column at `x == grid_size` / `z == grid_size` have no slot
//! and always sit at 0, framing the surface.

use std::ops::RangeInclusive;
use crate::math::Vec3;

/// Inclusive cell range touched by one deform call.
///
/// Computed in grid units and clamped to `[0, grid_size]`. May be empty when
/// the impact point lies entirely outside the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedRange {
    pub x: RangeInclusive<i64>,
    pub z: RangeInclusive<i64>,
}

impl AffectedRange {
    /// `x_start = max(0, floor(gx - radius))`, `x_end = min(grid_size, ceil(gx + radius))`,
    /// same for z, with `gx = point.x / cell_size`.
    ///
    /// The radius is applied in grid units here while the falloff test uses
    /// world units; with `cell_size < 1` the window is narrower than the
    /// falloff disc and trims its outer ring.
    pub fn around(point: Vec3, cell_size: f32, radius: f32, grid_size: usize) -> Self {
        let gx = point.x / cell_size;
        let gz = point.z / cell_size;
        let max = grid_size as i64;

        let x_start = ((gx - radius).floor() as i64).max(0);
        let x_end = ((gx + radius).ceil() as i64).min(max);
        let z_start = ((gz - radius).floor() as i64).max(0);
        let z_end = ((gz + radius).ceil() as i64).min(max);

        Self {
            x: x_start..=x_end,
            z: z_start..=z_end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.z.is_empty()
    }
}

/// Linear radial falloff: full depth at distance 0, nothing at `radius` and beyond
pub fn linear_falloff(distance: f32, radius: f32) -> f32 {
    if distance < radius {
        1.0 - distance / radius
    } else {
        0.0
    }
}

/// Square grid of height offsets, all zero at creation
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    size: usize,
    heights: Vec<f32>,
}

impl Heightmap {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            heights: vec![0.0; size * size],
        }
    }

    /// Cells per edge
    pub fn size(&self) -> usize {
        self.size
    }

    /// Height of vertex `(x, z)`. Frame vertices (and anything past them) are 0.
    pub fn vertex_height(&self, x: usize, z: usize) -> f32 {
        if x < self.size && z < self.size {
            self.heights[x * self.size + z]
        } else {
            0.0
        }
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.heights.iter_mut().for_each(|h| *h = 0.0);
    }

    /// Lower every cell within `radius` (world units, planar) of `point`.
    ///
    /// Each cell loses `(1 - d / radius) * depth`, accumulating on top of
    /// earlier calls with no floor. Cells in the range that sit on the fixed
    /// frame are skipped. Returns the number of cells changed; a radius that
    /// is not positive and finite, or a non-finite depth, changes nothing.
    pub fn carve(&mut self, point: Vec3, cell_size: f32, radius: f32, depth: f32) -> usize {
        if !(radius.is_finite() && radius > 0.0 && depth.is_finite()) {
            return 0;
        }

        let range = AffectedRange::around(point, cell_size, radius, self.size);
        if range.is_empty() {
            return 0;
        }

        let mut changed = 0;
        for z in range.z.clone() {
            for x in range.x.clone() {
                let (xi, zi) = (x as usize, z as usize);
                if xi >= self.size || zi >= self.size {
                    continue;
                }

                let cell_pos = Vec3::new(xi as f32 * cell_size, 0.0, zi as f32 * cell_size);
                let dist = cell_pos.planar_distance(point);
                if dist < radius {
                    self.heights[xi * self.size + zi] -= linear_falloff(dist, radius) * depth;
                    changed += 1;
                }
            }
        }
        changed
    }
}
