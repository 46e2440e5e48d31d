//! Terrain probes behind jump decisions, and crowd avoidance.

use bevy::prelude::*;

use crate::config::BehaviorStats;
use crate::gameplay::movement::{CollisionProbe, ProbeHit};
use crate::third_party::CollisionLayer;

/// Rays start this far above the feet so they never begin inside the floor.
const FOOT_CLEARANCE: f32 = 0.1;

fn facing_dir(facing: f32) -> Dir2 {
    if facing < 0.0 { Dir2::NEG_X } else { Dir2::X }
}

/// The ground ends in front of the leading foot.
pub fn ledge_ahead<P: CollisionProbe>(
    probe: &P,
    feet: Vec2,
    size: Vec2,
    facing: f32,
    stats: &BehaviorStats,
) -> bool {
    let origin = feet + Vec2::new(facing.signum() * size.x / 2.0, FOOT_CLEARANCE);
    probe
        .cast_ray(
            origin,
            Dir2::NEG_Y,
            stats.afraid_of_height + FOOT_CLEARANCE,
            CollisionLayer::walkable(),
        )
        .is_none()
}

/// Solid terrain blocks the way at knee height.
pub fn obstacle_ahead<P: CollisionProbe>(
    probe: &P,
    feet: Vec2,
    size: Vec2,
    facing: f32,
    stats: &BehaviorStats,
) -> bool {
    let origin = feet + Vec2::new(facing.signum() * size.x / 2.0, size.y / 4.0);
    probe
        .cast_ray(
            origin,
            facing_dir(facing),
            stats.obstacle_detection_distance,
            CollisionLayer::solid(),
        )
        .is_some()
}

/// Nothing to land on under the unit.
pub fn void_below<P: CollisionProbe>(probe: &P, feet: Vec2, stats: &BehaviorStats) -> bool {
    probe
        .cast_ray(
            feet + Vec2::Y * FOOT_CLEARANCE,
            Dir2::NEG_Y,
            stats.void_detection_distance + FOOT_CLEARANCE,
            CollisionLayer::walkable(),
        )
        .is_none()
}

/// Short rays to either side of the body that find neighbouring units.
pub fn lateral_neighbors<P: CollisionProbe>(
    probe: &P,
    center: Vec2,
    size: Vec2,
    stats: &BehaviorStats,
) -> Vec<ProbeHit> {
    let reach = size.x / 2.0 + stats.local_avoidance_distance;
    [Dir2::X, Dir2::NEG_X]
        .into_iter()
        .filter_map(|direction| {
            probe.cast_ray(center, direction, reach, CollisionLayer::Unit.into())
        })
        .collect()
}

/// Nudge away from every neighbour inside the avoidance radius.
#[must_use]
pub fn avoidance_push(
    center: Vec2,
    neighbors: impl IntoIterator<Item = Vec2>,
    stats: &BehaviorStats,
) -> Vec2 {
    neighbors
        .into_iter()
        .filter(|neighbor| neighbor.distance(center) < stats.avoidance_radius)
        .map(|neighbor| (center - neighbor).normalize_or_zero() * stats.avoidance_push)
        .sum()
}
