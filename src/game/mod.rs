//! Game-side collaborators of the surface
//!
//! Everything a caller needs around a `HeightfieldSurface` to dig into it
//! from a world-space pointer.
//!
//! Key concepts:
//! - Transform: world placement of a body, with the world-to-local step
//! - Collidable: anything a ray can hit; may expose a MeshDeformer
//! - Digger: range check, cooldown and world-to-local dig dispatch
//! - Event: a DeformEvent per successful dig for other systems to react to

pub mod transform;
pub mod event;
pub mod deformable;
pub mod body;
pub mod interaction;

// Re-export main types
pub use transform::Transform;
pub use event::{DeformEvent, EventQueue, Events};
pub use deformable::{Collidable, MeshDeformer};
pub use body::{DeformableBody, StaticBody};
pub use interaction::{Digger, InteractionConfig};
