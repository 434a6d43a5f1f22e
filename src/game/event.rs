//! Event System
//!
//! Digging results are published as events instead of calling into the
//! systems that care about them. The digger sends a `DeformEvent`; an
//! economy layer can charge energy for it, audio can play a scrape, VFX can
//! spawn dust, each without knowing about the others.
//!
//! The surface itself never sends events. Only the interaction layer does.

use crate::math::Vec3;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all interaction events
#[derive(Debug, Default)]
pub struct Events {
    /// A surface was dug into
    pub deformed: EventQueue<DeformEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Call at end of frame.
    pub fn clear_all(&mut self) {
        self.deformed.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// A surface was deformed by a dig
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformEvent {
    /// Index of the body that was dug, in the slice handed to the digger
    pub body: usize,
    /// Impact point in world space (for VFX)
    pub world_point: Vec3,
    /// Impact point in the surface's local space
    pub local_point: Vec3,
    /// Heightmap cells changed by the dig
    pub cells_affected: usize,
    /// Energy the caller should deduct for this dig
    pub energy_cost: u32,
}
