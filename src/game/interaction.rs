//! Digging interaction
//!
//! The `Digger` turns a pointer ray into a dig: find the nearest body the ray
//! hits within reach, check it can be deformed, move the impact point into
//! the body's local space and carve there. A short cooldown keeps a held
//! button from carving every frame.

use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use crate::math::{Ray, Vec3};
use crate::surface::ConfigError;
use super::deformable::Collidable;
use super::event::{DeformEvent, Events};

/// Reach and pacing of the digger
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum world-space distance from the ray origin to the hit
    pub interaction_range: f32,
    /// Seconds between digs
    pub interaction_cooldown: f32,
    /// Energy charged per successful dig
    pub energy_depletion: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            interaction_range: 3.0,
            interaction_cooldown: 0.25,
            energy_depletion: 1,
        }
    }
}

impl InteractionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.interaction_range.is_finite() || self.interaction_range <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "interaction_range must be positive and finite (got {})",
                self.interaction_range
            )));
        }
        if !self.interaction_cooldown.is_finite() || self.interaction_cooldown < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "interaction_cooldown must be non-negative and finite (got {})",
                self.interaction_cooldown
            )));
        }
        Ok(())
    }

    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }
}

/// Nearest hit found while scanning bodies
#[derive(Debug, Clone, Copy)]
struct Candidate {
    body: usize,
    distance: f32,
    world_point: Vec3,
    local_point: Vec3,
}

/// Cooldown-gated dig controller
#[derive(Debug, Clone)]
pub struct Digger {
    config: InteractionConfig,
    cooldown: f32,
}

impl Digger {
    pub fn new(config: InteractionConfig) -> Self {
        Self { config, cooldown: 0.0 }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Advance the cooldown timer
    pub fn update(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    pub fn can_dig(&self) -> bool {
        self.cooldown <= 0.0
    }

    /// Seconds until the next dig is allowed
    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown
    }

    /// Dig where `ray` (world space) first hits.
    ///
    /// Returns `None` while cooling down, when nothing is in range, or when
    /// the nearest hit is a body that can't be deformed. On success the
    /// cooldown restarts and the event is also pushed onto `events.deformed`.
    pub fn try_dig(
        &mut self,
        ray: &Ray,
        bodies: &mut [&mut dyn Collidable],
        events: &mut Events,
    ) -> Option<DeformEvent> {
        if !self.can_dig() {
            return None;
        }

        let hit = self.nearest_hit(ray, bodies)?;
        let Some(deformer) = bodies[hit.body].as_deformer() else {
            log::debug!("dig blocked by non-deformable body {}", hit.body);
            return None;
        };

        let stats = deformer.deform(hit.local_point);
        self.cooldown = self.config.interaction_cooldown;

        let event = DeformEvent {
            body: hit.body,
            world_point: hit.world_point,
            local_point: hit.local_point,
            cells_affected: stats.cells_affected,
            energy_cost: self.config.energy_depletion,
        };
        events.deformed.send(event);
        Some(event)
    }

    fn nearest_hit(&self, ray: &Ray, bodies: &[&mut dyn Collidable]) -> Option<Candidate> {
        let range = self.config.interaction_range;
        let mut best: Option<Candidate> = None;

        for (i, body) in bodies.iter().enumerate() {
            let transform = body.transform();
            let (Some(origin), Some(direction)) = (
                transform.inverse_transform_point(ray.origin),
                transform.inverse_transform_direction(ray.direction),
            ) else {
                continue;
            };

            // Local units per world unit along the ray
            let stretch = direction.len();
            if stretch <= f32::EPSILON {
                continue;
            }

            let local_ray = Ray::new(origin, direction);
            let Some(hit) = body.collision().raycast(&local_ray, range * stretch) else {
                continue;
            };

            let distance = hit.distance / stretch;
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Candidate {
                    body: i,
                    distance,
                    world_point: transform.transform_point(hit.point),
                    local_point: hit.point,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{DeformableBody, StaticBody, Transform};
    use crate::surface::{CollisionMesh, DeformerConfig, HeightfieldSurface};

    fn terrain(transform: Transform) -> DeformableBody {
        let surface = HeightfieldSurface::new(DeformerConfig::new(4, 1.0, 1.5, 0.5)).unwrap();
        DeformableBody::new(transform, surface)
    }

    fn down(x: f32, y: f32, z: f32) -> Ray {
        Ray::new(Vec3::new(x, y, z), Vec3::new(0.0, -1.0, 0.0))
    }

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).len() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_default_config() {
        let config = InteractionConfig::default();
        assert!((config.interaction_range - 3.0).abs() < 1e-6);
        assert!((config.interaction_cooldown - 0.25).abs() < 1e-6);
        assert_eq!(config.energy_depletion, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_ron() {
        let config = InteractionConfig::from_ron_str("(interaction_range: 5.0)").unwrap();
        assert!((config.interaction_range - 5.0).abs() < 1e-6);
        assert_eq!(config.energy_depletion, 1);

        let result = InteractionConfig::from_ron_str("(interaction_range: -1.0)");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_demo_config_parses() {
        let config = InteractionConfig::from_ron_str(include_str!("../../assets/config/interaction.ron")).unwrap();
        assert!(config.interaction_range > 0.0);
    }

    #[test]
    fn test_dig_hits_surface() {
        let mut ground = terrain(Transform::IDENTITY);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        let event = {
            let mut bodies: [&mut dyn Collidable; 1] = [&mut ground];
            digger.try_dig(&down(2.3, 2.0, 1.6), &mut bodies, &mut events).unwrap()
        };

        assert_eq!(event.body, 0);
        assert_vec_close(event.local_point, Vec3::new(2.3, 0.0, 1.6));
        assert_vec_close(event.world_point, Vec3::new(2.3, 0.0, 1.6));
        assert!(event.cells_affected > 0);
        assert_eq!(event.energy_cost, 1);
        assert_eq!(events.deformed.len(), 1);
        assert_eq!(ground.surface.revision(), 1);
        assert!(!digger.can_dig());
    }

    #[test]
    fn test_cooldown_gates_digging() {
        let mut ground = terrain(Transform::IDENTITY);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();
        let ray = down(2.3, 2.0, 1.6);
        let mut bodies: [&mut dyn Collidable; 1] = [&mut ground];

        assert!(digger.try_dig(&ray, &mut bodies, &mut events).is_some());
        assert!(digger.try_dig(&ray, &mut bodies, &mut events).is_none());

        digger.update(0.1);
        assert!(!digger.can_dig());
        digger.update(0.2);
        assert!(digger.can_dig());
        assert_eq!(digger.cooldown_remaining(), 0.0);

        assert!(digger.try_dig(&ray, &mut bodies, &mut events).is_some());
        assert_eq!(events.deformed.len(), 2);
    }

    #[test]
    fn test_out_of_range_does_nothing() {
        let mut ground = terrain(Transform::IDENTITY);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        {
            let mut bodies: [&mut dyn Collidable; 1] = [&mut ground];
            assert!(digger.try_dig(&down(2.3, 5.0, 1.6), &mut bodies, &mut events).is_none());
        }
        assert!(digger.can_dig());
        assert!(events.deformed.is_empty());
        assert_eq!(ground.surface.revision(), 0);
    }

    #[test]
    fn test_dig_in_local_space_of_moved_body() {
        let mut ground = terrain(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        let event = {
            let mut bodies: [&mut dyn Collidable; 1] = [&mut ground];
            digger.try_dig(&down(12.3, 2.0, 1.6), &mut bodies, &mut events).unwrap()
        };
        assert_vec_close(event.local_point, Vec3::new(2.3, 0.0, 1.6));
        assert_vec_close(event.world_point, Vec3::new(12.3, 0.0, 1.6));
    }

    #[test]
    fn test_range_measured_in_world_units() {
        let transform = Transform {
            scale: 2.0,
            ..Transform::IDENTITY
        };
        let mut ground = terrain(transform);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        let event = {
            let mut bodies: [&mut dyn Collidable; 1] = [&mut ground];
            digger.try_dig(&down(4.6, 2.5, 3.2), &mut bodies, &mut events).unwrap()
        };
        assert_vec_close(event.local_point, Vec3::new(2.3, 0.0, 1.6));
        assert_vec_close(event.world_point, Vec3::new(4.6, 0.0, 3.2));
    }

    #[test]
    fn test_static_body_blocks_dig() {
        let mut ground = terrain(Transform::IDENTITY);
        let slab = CollisionMesh::new(
            vec![
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(8.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 8.0),
            ],
            vec![[0, 1, 2]],
        );
        let mut rock = StaticBody::new(Transform::IDENTITY, slab);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        {
            let mut bodies: [&mut dyn Collidable; 2] = [&mut ground, &mut rock];
            assert!(digger.try_dig(&down(2.3, 2.0, 1.6), &mut bodies, &mut events).is_none());
        }
        assert!(events.deformed.is_empty());
        assert_eq!(ground.surface.revision(), 0);
        assert!(digger.can_dig());
    }

    #[test]
    fn test_nearest_body_wins() {
        let mut near = terrain(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        let mut far = terrain(Transform::IDENTITY);
        let mut digger = Digger::new(InteractionConfig::default());
        let mut events = Events::new();

        let event = {
            let mut bodies: [&mut dyn Collidable; 2] = [&mut far, &mut near];
            digger.try_dig(&down(2.3, 2.0, 1.6), &mut bodies, &mut events).unwrap()
        };
        assert_eq!(event.body, 1);
        assert_eq!(near.surface.revision(), 1);
        assert_eq!(far.surface.revision(), 0);
    }
}
