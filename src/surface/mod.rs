//! Deformable terrain surface
//!
//! A square heightfield that can be carved at a point with a linear radial
//! falloff. After each edit the full render mesh (positions, UVs, indices,
//! normals, tangents, bounds) and its collision shape are regenerated and
//! published as immutable snapshots.
//!
//! # Module Organization
//!
//! - `config` - DeformerConfig, validation and RON persistence
//! - `heightmap` - per-cell heights and the radial carve
//! - `mesh` - grid triangulation and area-weighted normals
//! - `tangents` - UV-gradient tangent frames
//! - `collision` - triangle soup raycasting
//! - `heightfield` - HeightfieldSurface, tying it all together

mod config;
mod heightmap;
pub mod mesh;
mod tangents;
mod collision;
mod heightfield;

pub use config::{ConfigError, DeformerConfig, limits};
pub use heightmap::{AffectedRange, Heightmap, linear_falloff};
pub use mesh::{SurfaceMesh, compute_normals};
pub use tangents::compute_tangents;
pub use collision::{CollisionMesh, RayHit};
pub use heightfield::{DeformStats, HeightfieldSurface};
