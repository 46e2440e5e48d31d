//! Geometry queries the movement core consumes.
//!
//! The core never resolves collisions itself. It asks these questions and
//! interprets the answers; an absent hit always means "nothing here".

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

/// First contact reported by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub entity: Entity,
    /// Travel distance along the cast direction before contact.
    pub distance: f32,
    /// World-space contact point.
    pub point: Vec2,
    /// Surface normal of the hit geometry, pointing away from it.
    pub normal: Vec2,
}

/// Geometry found inside an overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    pub entity: Entity,
    /// Center of the overlapped collider.
    pub center: Vec2,
}

/// Shape-cast, ray-cast and overlap queries against world geometry.
pub trait CollisionProbe {
    /// Sweep an axis-aligned box from `origin` (its center) along `direction`.
    fn cast_shape(
        &self,
        origin: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit>;

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit>;

    /// Any collider in `mask` intersecting the box centered at `center`.
    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: LayerMask) -> Option<Overlap>;

    /// First hit on the segment from `from` to `to`.
    fn line_cast(&self, from: Vec2, to: Vec2, mask: LayerMask) -> Option<ProbeHit> {
        let delta = to - from;
        let direction = Dir2::new(delta).ok()?;
        self.cast_ray(from, direction, delta.length(), mask)
    }
}
