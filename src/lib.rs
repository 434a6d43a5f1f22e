//! terradig: deformable heightfield terrain
//!
//! A square grid surface that can be dug into at any point. Each dig lowers
//! nearby cells with a linear radial falloff, then the whole mesh (normals,
//! tangents, bounds, collision shape) is regenerated and published as a new
//! immutable snapshot.
//!
//! - `math` - vectors, matrices, rays
//! - `surface` - configuration, heightmap, mesh generation, HeightfieldSurface
//! - `game` - transforms, events and the Digger that turns a ray into a dig

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod math;
pub mod surface;
pub mod game;

pub use surface::{DeformStats, DeformerConfig, HeightfieldSurface, SurfaceMesh};
pub use game::{Digger, MeshDeformer};
