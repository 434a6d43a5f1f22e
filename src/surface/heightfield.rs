//! Deformable heightfield surface
//!
//! Owns the heightmap and the published mesh/collision snapshots. Every edit
//! runs mutate-then-rebuild to completion before returning, so readers only
//! ever see one consistent mesh state per finished deform. `deform` takes
//! `&mut self`, which already rules out two callers carving at once; wrap the
//! surface in a lock if several threads need to edit it.

use std::sync::Arc;
use crate::math::Vec3;
use super::collision::CollisionMesh;
use super::config::{ConfigError, DeformerConfig};
use super::heightmap::Heightmap;
use super::mesh::SurfaceMesh;

/// Outcome of a single deform call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeformStats {
    /// Heightmap cells lowered by this call
    pub cells_affected: usize,
}

/// A square grid surface that can be dug into
#[derive(Debug, Clone)]
pub struct HeightfieldSurface {
    config: DeformerConfig,
    heightmap: Heightmap,
    mesh: Arc<SurfaceMesh>,
    collision: Arc<CollisionMesh>,
    revision: u64,
}

impl HeightfieldSurface {
    /// Allocate a flat heightmap and publish the initial mesh.
    /// Fails if the configuration is invalid.
    pub fn new(config: DeformerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let heightmap = Heightmap::new(config.grid_size);
        let mesh = SurfaceMesh::generate(&heightmap, &config);
        let collision = CollisionMesh::from_surface(&mesh);

        log::info!(
            "heightfield surface: {}x{} cells, cell size {}, {} vertices",
            config.grid_size,
            config.grid_size,
            config.cell_size,
            mesh.vertex_count()
        );

        Ok(Self {
            config,
            heightmap,
            mesh: Arc::new(mesh),
            collision: Arc::new(collision),
            revision: 0,
        })
    }

    pub fn config(&self) -> &DeformerConfig {
        &self.config
    }

    /// World-space edge length of the surface
    pub fn extent(&self) -> f32 {
        self.config.extent()
    }

    /// Current render mesh. Holding the `Arc` keeps this exact state alive
    /// even after later edits.
    pub fn mesh(&self) -> &Arc<SurfaceMesh> {
        &self.mesh
    }

    /// Current collision shape, replaced wholesale on every rebuild
    pub fn collision(&self) -> &Arc<CollisionMesh> {
        &self.collision
    }

    /// Number of rebuilds since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Height of vertex `(x, z)` (0 on the outer frame)
    pub fn vertex_height(&self, x: usize, z: usize) -> f32 {
        self.heightmap.vertex_height(x, z)
    }

    /// Carve at `local_point` with the configured radius and depth
    pub fn deform(&mut self, local_point: Vec3) -> DeformStats {
        self.deform_with(
            local_point,
            self.config.deformation_radius,
            self.config.deformation_depth,
        )
    }

    /// Carve at `local_point` with an explicit radius and depth.
    ///
    /// `local_point` is in the surface's own frame; the caller handles the
    /// world-to-local transform. Points off the grid are not an error, they
    /// just change nothing. A radius that is not positive and finite, or a
    /// non-finite depth, is refused the same way with a warning. The mesh is
    /// rebuilt either way.
    pub fn deform_with(&mut self, local_point: Vec3, radius: f32, depth: f32) -> DeformStats {
        let cells_affected = if valid_brush(radius, depth) {
            self.heightmap.carve(local_point, self.config.cell_size, radius, depth)
        } else {
            log::warn!("deform refused: radius {} depth {}", radius, depth);
            0
        };

        log::debug!(
            "deform at ({:.2}, {:.2}, {:.2}) r={} depth={}: {} cell(s)",
            local_point.x,
            local_point.y,
            local_point.z,
            radius,
            depth,
            cells_affected
        );

        self.rebuild();
        DeformStats { cells_affected }
    }

    /// Regenerate the full mesh and swap in new render and collision snapshots
    pub fn rebuild(&mut self) {
        let mesh = SurfaceMesh::generate(&self.heightmap, &self.config);
        let collision = CollisionMesh::from_surface(&mesh);

        self.mesh = Arc::new(mesh);
        self.collision = Arc::new(collision);
        self.revision += 1;

        log::debug!("surface rebuilt (revision {})", self.revision);
    }

    /// Flatten the surface back to its initial state
    pub fn reset(&mut self) {
        self.heightmap.clear();
        self.rebuild();
    }
}

/// Radius must be positive and finite, depth finite (negative raises terrain)
fn valid_brush(radius: f32, depth: f32) -> bool {
    radius.is_finite() && radius > 0.0 && depth.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> HeightfieldSurface {
        HeightfieldSurface::new(DeformerConfig::new(4, 1.0, 1.5, 0.5)).unwrap()
    }

    fn vertex_y(surface: &HeightfieldSurface, x: usize, z: usize) -> f32 {
        let n = surface.config().grid_size + 1;
        surface.mesh().vertices[z * n + x].y
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(HeightfieldSurface::new(DeformerConfig::new(0, 1.0, 1.0, 0.3)).is_err());
        assert!(HeightfieldSurface::new(DeformerConfig::new(4, 0.0, 1.0, 0.3)).is_err());
        assert!(HeightfieldSurface::new(DeformerConfig::new(4, 1.0, -1.0, 0.3)).is_err());
    }

    #[test]
    fn test_flat_state() {
        let surface = HeightfieldSurface::new(DeformerConfig::default()).unwrap();
        let mesh = surface.mesh();
        assert!(mesh.vertices.iter().all(|v| v.y == 0.0));
        for n in &mesh.normals {
            assert!((n.y - 1.0).abs() < 1e-6 && n.x.abs() < 1e-6 && n.z.abs() < 1e-6);
        }
        assert_eq!(surface.revision(), 0);
    }

    #[test]
    fn test_concrete_scenario() {
        let mut surface = scenario();
        let stats = surface.deform(Vec3::new(2.0, 0.0, 2.0));

        assert!((surface.vertex_height(2, 2) + 0.5).abs() < 1e-6);
        assert_eq!(surface.vertex_height(0, 2), 0.0);
        let expected = -0.5 * (1.0 - 1.0 / 1.5);
        assert!((surface.vertex_height(1, 2) - expected).abs() < 1e-6);
        assert!((expected + 0.1667).abs() < 1e-4);

        // Published mesh agrees with the heightmap
        assert!((vertex_y(&surface, 2, 2) + 0.5).abs() < 1e-6);
        assert!((vertex_y(&surface, 1, 2) - expected).abs() < 1e-6);

        // (2,2), four neighbours at 1.0 and four diagonals at ~1.414
        assert_eq!(stats.cells_affected, 9);
    }

    #[test]
    fn test_cells_beyond_radius_untouched() {
        let mut surface = scenario();
        surface.deform(Vec3::new(2.0, 0.0, 2.0));
        for x in 0..=4usize {
            for z in 0..=4usize {
                let dx = x as f32 - 2.0;
                let dz = z as f32 - 2.0;
                if (dx * dx + dz * dz).sqrt() >= 1.5 {
                    assert_eq!(surface.vertex_height(x, z), 0.0, "cell ({}, {})", x, z);
                }
            }
        }
    }

    #[test]
    fn test_cumulative_carving() {
        let config = DeformerConfig::new(6, 1.0, 1.0, 0.3);
        let mut surface = HeightfieldSurface::new(config).unwrap();
        surface.deform(Vec3::new(3.0, 0.0, 3.0));
        surface.deform(Vec3::new(3.0, 0.0, 3.0));
        assert!((surface.vertex_height(3, 3) + 0.6).abs() < 1e-6);

        // No floor: keeps going
        for _ in 0..10 {
            surface.deform(Vec3::new(3.0, 0.0, 3.0));
        }
        assert!((surface.vertex_height(3, 3) + 3.6).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_radius_and_depth() {
        let mut surface = scenario();
        surface.deform_with(Vec3::new(2.0, 0.0, 2.0), 3.0, 1.0);
        assert!((surface.vertex_height(2, 2) + 1.0).abs() < 1e-6);
        assert!((surface.vertex_height(0, 2) + (1.0 - 2.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_clamp() {
        let mut surface = scenario();
        surface.deform(Vec3::new(0.0, 0.0, 0.0));
        assert!((surface.vertex_height(0, 0) + 0.5).abs() < 1e-6);

        surface.deform(Vec3::new(4.0, 0.0, 4.0));
        assert_eq!(vertex_y(&surface, 4, 4), 0.0);
        assert_eq!(vertex_y(&surface, 4, 3), 0.0);
        assert!(surface.vertex_height(3, 3) < 0.0);
    }

    #[test]
    fn test_off_grid_still_rebuilds() {
        let mut surface = scenario();
        let before = Arc::clone(surface.mesh());
        let stats = surface.deform(Vec3::new(-20.0, 0.0, -20.0));

        assert_eq!(stats.cells_affected, 0);
        assert_eq!(surface.revision(), 1);
        assert!(!Arc::ptr_eq(&before, surface.mesh()));
        assert_eq!(*before, **surface.mesh());
    }

    #[test]
    fn test_idempotent_rebuild() {
        let mut surface = scenario();
        surface.deform(Vec3::new(1.7, 0.0, 2.2));
        let first = Arc::clone(surface.mesh());
        surface.rebuild();
        let second = surface.mesh();

        assert_eq!(first.vertices, second.vertices);
        assert_eq!(first.uvs, second.uvs);
        assert_eq!(first.triangles, second.triangles);
        assert_eq!(first.normals, second.normals);
        assert_eq!(first.tangents, second.tangents);
    }

    #[test]
    fn test_deterministic_across_instances() {
        let mut a = scenario();
        let mut b = scenario();
        for p in [Vec3::new(1.2, 0.0, 0.8), Vec3::new(2.5, 3.0, 2.5)] {
            a.deform(p);
            b.deform(p);
        }
        assert_eq!(**a.mesh(), **b.mesh());
    }

    #[test]
    fn test_snapshots_replaced_wholesale() {
        let mut surface = scenario();
        let old_mesh = Arc::clone(surface.mesh());
        let old_collision = Arc::clone(surface.collision());

        surface.deform(Vec3::new(2.0, 0.0, 2.0));

        assert!(!Arc::ptr_eq(&old_mesh, surface.mesh()));
        assert!(!Arc::ptr_eq(&old_collision, surface.collision()));
        // The old snapshot is untouched
        assert!(old_mesh.vertices.iter().all(|v| v.y == 0.0));
        // New collision geometry matches the new mesh
        assert_eq!(surface.collision().vertices(), surface.mesh().vertices.as_slice());
    }

    #[test]
    fn test_tangents_stay_valid_after_deform() {
        let mut surface = scenario();
        surface.deform(Vec3::new(2.0, 0.0, 2.0));
        surface.deform(Vec3::new(1.0, 0.0, 2.5));
        let mesh = surface.mesh();
        for (t, n) in mesh.tangents.iter().zip(mesh.normals.iter()) {
            assert!((t.xyz().len() - 1.0).abs() < 1e-4);
            assert!(t.xyz().dot(*n).abs() < 1e-4);
            assert!(t.w == 1.0 || t.w == -1.0);
        }
    }

    #[test]
    fn test_bad_brush_leaves_heightmap_intact() {
        let mut surface = scenario();
        let p = Vec3::new(2.0, 0.0, 2.0);
        let bad = [
            (1.5, f32::NAN),
            (1.5, f32::INFINITY),
            (f32::NAN, 0.5),
            (f32::INFINITY, 0.5),
            (0.0, 0.5),
            (-1.5, 0.5),
        ];
        for (radius, depth) in bad {
            let stats = surface.deform_with(p, radius, depth);
            assert_eq!(stats.cells_affected, 0, "r={} depth={}", radius, depth);
        }
        assert_eq!(surface.revision(), bad.len() as u64);
        assert!(surface.mesh().vertices.iter().all(|v| v.y == 0.0));

        // A valid dig afterwards still carves normally
        surface.deform(p);
        assert!((surface.vertex_height(2, 2) + 0.5).abs() < 1e-6);
        let mesh = surface.mesh();
        assert!(mesh.normals.iter().all(|n| n.x.is_finite() && n.y.is_finite() && n.z.is_finite()));
        assert!(mesh.tangents.iter().all(|t| t.x.is_finite() && t.y.is_finite() && t.z.is_finite()));
    }

    #[test]
    fn test_fractional_cell_size() {
        let mut surface = HeightfieldSurface::new(DeformerConfig::new(40, 0.25, 1.0, 0.3)).unwrap();
        let stats = surface.deform(Vec3::new(5.0, 0.0, 5.0));

        // Grid-unit window: gx = 20, cells 19..=21 on each axis
        assert_eq!(stats.cells_affected, 9);
        assert!((surface.vertex_height(20, 20) + 0.3).abs() < 1e-6);
        // Cell 21 sits 0.25 world units away: (1 - 0.25) * 0.3
        assert!((surface.vertex_height(21, 20) + 0.225).abs() < 1e-5);
        assert!((surface.vertex_height(19, 20) + 0.225).abs() < 1e-5);
        // 0.5 world units away, inside the falloff disc but outside the window
        assert_eq!(surface.vertex_height(22, 20), 0.0);
        assert_eq!(surface.vertex_height(20, 18), 0.0);

        // Vertex positions are in world units
        let n = 41;
        let v = surface.mesh().vertices[20 * n + 21];
        assert!((v.x - 5.25).abs() < 1e-6);
        assert!((v.z - 5.0).abs() < 1e-6);
        assert!((v.y + 0.225).abs() < 1e-5);
    }

    #[test]
    fn test_reset() {
        let mut surface = scenario();
        surface.deform(Vec3::new(2.0, 0.0, 2.0));
        surface.reset();
        assert!(surface.mesh().vertices.iter().all(|v| v.y == 0.0));
        assert_eq!(surface.revision(), 2);
    }
}
