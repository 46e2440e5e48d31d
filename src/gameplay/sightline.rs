//! Line-of-sight checks between a unit and its target.

use bevy::prelude::*;

use super::movement::CollisionProbe;
use crate::third_party::CollisionLayer;

/// Result of a sightline check. A rejected sightline reports an infinite
/// perceived distance so "closer than" comparisons fail on their own.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Sightline {
    pub visible: bool,
    pub perceived_distance: f32,
}

impl Sightline {
    pub const BLIND: Self = Self {
        visible: false,
        perceived_distance: f32::INFINITY,
    };
}

impl Default for Sightline {
    fn default() -> Self {
        Self::BLIND
    }
}

/// Whether `target` can be seen from `origin` within `range`.
/// Recomputed on every call; obstacles move.
#[must_use]
pub fn confirm_sightline<P: CollisionProbe>(
    probe: &P,
    origin: Vec2,
    target: Option<Vec2>,
    range: f32,
) -> Sightline {
    let Some(target) = target else {
        return Sightline::BLIND;
    };
    let distance = origin.distance(target);
    if distance > range {
        return Sightline::BLIND;
    }
    if probe
        .line_cast(origin, target, CollisionLayer::obstacles())
        .is_some()
    {
        return Sightline::BLIND;
    }
    Sightline {
        visible: true,
        perceived_distance: distance,
    }
}
