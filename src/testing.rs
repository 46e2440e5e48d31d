//! Testing utilities: app builders and an in-memory collision probe.

#![cfg(any(test, feature = "testing"))]

use avian2d::prelude::LayerMask;
use bevy::prelude::*;

use crate::config::MovementStats;
use crate::gameplay::Intention;
use crate::gameplay::movement::{
    CollisionProbe, KinematicBody, MovementController, Overlap, ProbeHit, TickOutcome,
};
use crate::third_party::CollisionLayer;

/// Fixed step used by pure movement tests. A power of two keeps the
/// per-tick arithmetic exact.
pub const DT: f32 = 1.0 / 64.0;

/// Creates a minimal app for testing with essential plugins.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app
}

/// Advance the app by multiple frames.
pub fn tick_multiple(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

/// Assert the number of entities matching a query filter.
pub fn assert_entity_count<F: bevy::ecs::query::QueryFilter>(app: &mut App, expected: usize) {
    let count = app
        .world_mut()
        .query_filtered::<Entity, F>()
        .iter(app.world())
        .count();
    assert_eq!(count, expected, "unexpected entity count");
}

// === Terrain ===

/// An axis-aligned block of world geometry.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    pub entity: Entity,
    pub min: Vec2,
    pub max: Vec2,
    pub layers: LayerMask,
}

impl Block {
    fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    fn in_mask(&self, mask: LayerMask) -> bool {
        self.layers.0 & mask.0 != 0
    }
}

/// A set of boxes answering [`CollisionProbe`] queries exactly.
#[derive(Debug, Clone, Default)]
pub struct TestTerrain {
    pub blocks: Vec<Block>,
}

impl TestTerrain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block given its bottom-left corner and size.
    #[must_use]
    pub fn with_block(mut self, min: Vec2, size: Vec2, layer: CollisionLayer) -> Self {
        self.add_block(min, size, layer);
        self
    }

    pub fn add_block(&mut self, min: Vec2, size: Vec2, layer: CollisionLayer) -> Entity {
        let entity = Entity::from_bits(1_000 + self.blocks.len() as u64);
        self.blocks.push(Block {
            entity,
            min,
            max: min + size,
            layers: layer.into(),
        });
        entity
    }

    pub fn remove_block(&mut self, entity: Entity) {
        self.blocks.retain(|block| block.entity != entity);
    }

    /// A wide floor whose top surface sits at `y = top`.
    #[must_use]
    pub fn with_floor(self, top: f32) -> Self {
        self.with_block(
            Vec2::new(-100.0, top - 1.0),
            Vec2::new(200.0, 1.0),
            CollisionLayer::Ground,
        )
    }
}

/// Slab test of a ray against a box. Returns the entry distance and normal.
fn ray_box(origin: Vec2, direction: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], direction[axis], min[axis], max[axis]);
        if d.abs() < f32::EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let t0 = (lo - o) / d;
        let t1 = (hi - o) / d;
        let (near, far) = if t0 < t1 { (t0, t1) } else { (t1, t0) };
        if near > t_enter {
            t_enter = near;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(far);
    }

    if t_enter > t_exit || t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Started inside the box.
        return Some((0.0, -direction));
    }
    Some((t_enter, normal))
}

impl CollisionProbe for TestTerrain {
    fn cast_shape(
        &self,
        origin: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.blocks
            .iter()
            .filter(|block| block.in_mask(mask))
            .filter_map(|block| {
                let (distance, normal) = ray_box(
                    origin,
                    *direction,
                    block.min - half_extents,
                    block.max + half_extents,
                )?;
                (distance <= max_distance).then(|| ProbeHit {
                    entity: block.entity,
                    distance,
                    point: origin + *direction * distance - normal * half_extents,
                    normal,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.cast_shape(origin, Vec2::ZERO, direction, max_distance, mask)
    }

    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: LayerMask) -> Option<Overlap> {
        self.blocks
            .iter()
            .filter(|block| block.in_mask(mask))
            .find(|block| {
                let min = center - half_extents;
                let max = center + half_extents;
                min.x < block.max.x && max.x > block.min.x && min.y < block.max.y && max.y > block.min.y
            })
            .map(|block| Overlap {
                entity: block.entity,
                center: block.center(),
            })
    }
}

// === Movement harness ===

/// Drives a [`MovementController`] against a [`TestTerrain`] with a crude
/// integrator that stops the body on solid surfaces.
pub struct Rig {
    pub controller: MovementController,
    pub stats: MovementStats,
    pub terrain: TestTerrain,
    pub body: KinematicBody,
}

impl Rig {
    pub fn new(terrain: TestTerrain, feet: Vec2) -> Self {
        Self::with_stats(terrain, feet, MovementStats::default())
    }

    pub fn with_stats(terrain: TestTerrain, feet: Vec2, stats: MovementStats) -> Self {
        Self {
            controller: MovementController::default(),
            stats,
            terrain,
            body: KinematicBody {
                position: feet,
                velocity: Vec2::ZERO,
            },
        }
    }

    /// Run one tick without moving the body.
    pub fn tick_in_place(&mut self, intention: &Intention) -> TickOutcome {
        let outcome = self
            .controller
            .tick(self.body, intention, &self.stats, &self.terrain, DT);
        if let Some(position) = outcome.position {
            self.body.position = position;
        }
        self.body.velocity = outcome.velocity;
        outcome
    }

    /// Run one tick and integrate the resulting velocity.
    pub fn step(&mut self, intention: &Intention) -> TickOutcome {
        let outcome = self.tick_in_place(intention);
        self.integrate();
        outcome
    }

    fn integrate(&mut self) {
        let half = self.controller.body_size(&self.stats) / 2.0;
        let mut velocity = self.body.velocity;
        let mut feet = self.body.position;
        let mask = if self.controller.is_dropping() {
            CollisionLayer::solid()
        } else {
            CollisionLayer::walkable()
        };

        for (axis, positive) in [(0, Dir2::X), (1, Dir2::Y)] {
            let travel = velocity[axis] * DT;
            if travel.abs() <= f32::EPSILON {
                continue;
            }
            let direction = if travel > 0.0 { positive } else { -positive };
            let center = feet + Vec2::Y * half.y;
            let shrunk = if axis == 0 {
                Vec2::new(half.x, half.y - 0.01)
            } else {
                Vec2::new(half.x - 0.01, half.y)
            };
            match self
                .terrain
                .cast_shape(center, shrunk, direction, travel.abs(), mask)
            {
                Some(hit) => {
                    feet[axis] += travel.signum() * hit.distance;
                    velocity[axis] = 0.0;
                }
                None => feet[axis] += travel,
            }
        }

        self.body.position = feet;
        self.body.velocity = velocity;
    }
}
