//! A closed-loop harness for one autonomous unit.

use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use trol_mobb::config::Archetype;
use trol_mobb::gameplay::Intention;
use trol_mobb::gameplay::behavior::{Behavior, PathQueue, Pathfinder, Situation, resolve_requests};
use trol_mobb::gameplay::combat::CombatState;
use trol_mobb::gameplay::events::UnitEvent;
use trol_mobb::gameplay::movement::{KinematicBody, MovementController};
use trol_mobb::gameplay::registry::UnitRegistry;
use trol_mobb::testing::{DT, TestTerrain};

// === Paths ===

/// Paths straight to the goal, as on open ground.
pub struct StraightLine;

impl Pathfinder for StraightLine {
    fn find_path(&self, _from: Vec2, to: Vec2) -> Option<Vec<Vec2>> {
        Some(vec![to])
    }
}

// === Harness ===

/// One mobb hunting a motionless quarry. Thrown spears land at the point
/// they were aimed at.
pub struct Hunt {
    pub terrain: TestTerrain,
    pub archetype: Archetype,
    pub controller: MovementController,
    pub body: KinematicBody,
    pub behavior: Behavior,
    pub combat: CombatState,
    pub registry: UnitRegistry,
    pub paths: PathQueue,
    pub rng: StdRng,
    pub unit: Entity,
    pub quarry: Entity,
    pub quarry_feet: Vec2,
    pub spear: Entity,
    /// Where the spear rests while it is out of hand.
    pub spear_at: Option<Vec2>,
    ignore_until: f32,
    pub now: f32,
    pub events: Vec<UnitEvent>,
    pub path_requests: usize,
}

impl Hunt {
    pub fn new(terrain: TestTerrain, unit_x: f32, quarry_x: f32) -> Self {
        let mut world = World::new();
        let unit = world.spawn_empty().id();
        let quarry = world.spawn_empty().id();
        let spear = world.spawn_empty().id();
        let archetype = Archetype::default();
        let mut registry = UnitRegistry::default();
        registry.add_unit(unit);

        Self {
            terrain,
            behavior: Behavior::new(Some(quarry), &archetype.behavior),
            archetype,
            controller: MovementController::default(),
            body: KinematicBody {
                position: Vec2::new(unit_x, 0.0),
                velocity: Vec2::ZERO,
            },
            combat: CombatState::armed(spear),
            registry,
            paths: PathQueue::default(),
            rng: StdRng::seed_from_u64(42),
            unit,
            quarry,
            quarry_feet: Vec2::new(quarry_x, 0.0),
            spear,
            spear_at: None,
            ignore_until: 0.0,
            now: 0.0,
            events: Vec::new(),
            path_requests: 0,
        }
    }

    /// Think, resolve paths, move and advance timers by one step.
    pub fn step(&mut self) {
        self.now += DT;
        let size = self.controller.body_size(&self.archetype.movement);
        let quarry_center = self.quarry_feet + Vec2::Y * size.y / 2.0;
        let (quarry, spear, spear_at) = (self.quarry, self.spear, self.spear_at);
        let locate = move |entity: Entity| {
            if entity == quarry {
                Some(quarry_center)
            } else if entity == spear {
                spear_at
            } else {
                None
            }
        };
        let (now, ignore_until) = (self.now, self.ignore_until);
        let can_pick_up = move |_: Entity| now >= ignore_until;

        let situation = Situation {
            unit: self.unit,
            feet: self.body.position,
            size,
            grounded: self.controller.is_grounded(),
            max_speed: self.archetype.movement.max_speed,
            now: self.now,
            probe: &self.terrain,
            registry: &self.registry,
            locate: &locate,
            can_pick_up: &can_pick_up,
        };
        let thought = self.behavior.think(
            &mut self.combat,
            &situation,
            &self.archetype.behavior,
            &mut self.rng,
            &mut self.paths,
            DT,
        );
        self.events.extend(thought.events);

        if let Some(spear) = thought.picked_up {
            self.registry.remove_spear(spear);
            self.spear_at = None;
        }
        if let Some((throw, at)) = thought.throw {
            self.registry.add_spear(throw.spear);
            self.spear_at = Some(Vec2::new(at.x, 0.2));
            self.ignore_until = self.now + self.archetype.behavior.spear_ignore_duration;
        }

        self.path_requests += self.paths.len();
        let behavior = &mut self.behavior;
        resolve_requests(&mut self.paths, &StraightLine, 8, |request, path| {
            behavior.on_path_result(request.ticket, path);
        });

        self.advance_body(&thought.intention);
        self.combat
            .update(self.now, &self.archetype.behavior, &mut self.events);
    }

    fn advance_body(&mut self, intention: &Intention) {
        let outcome = self.controller.tick(
            self.body,
            intention,
            &self.archetype.movement,
            &self.terrain,
            DT,
        );
        self.events.extend(outcome.events);
        if let Some(position) = outcome.position {
            self.body.position = position;
        }

        // Flat floor only: move freely and stop on the ground.
        let mut velocity = outcome.velocity;
        let mut feet = self.body.position + velocity * DT;
        if feet.y < 0.0 {
            feet.y = 0.0;
            velocity.y = velocity.y.max(0.0);
        }
        self.body = KinematicBody {
            position: feet,
            velocity,
        };
    }

    pub fn run_for(&mut self, seconds: f32) {
        let steps = (seconds / DT).round() as usize;
        for _ in 0..steps {
            self.step();
        }
    }

    /// Index of the first event matching `predicate`.
    pub fn first(&self, predicate: impl Fn(&UnitEvent) -> bool) -> Option<usize> {
        self.events.iter().position(predicate)
    }
}
