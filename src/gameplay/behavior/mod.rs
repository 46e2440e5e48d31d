//! Autonomous unit behavior: target selection, spear combat decisions,
//! path following and jump assessment.
//!
//! [`Behavior::think`] runs once per frame per unit and produces an
//! [`Intention`] for the movement core, the same input a human would give.

mod obstacles;
pub mod pathing;

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

pub use obstacles::{avoidance_push, lateral_neighbors, ledge_ahead, obstacle_ahead, void_below};
pub use pathing::{NavPath, PathQueue, PathRequest, PathTicket, Pathfinder, resolve_requests};

use super::combat::{CombatState, SimulationRng, Spear, Throw, carry_spear, launch_spear};
use super::events::{UnitEvent, UnitMessage};
use super::movement::{BodyCollider, CollisionProbe, MovementController};
use super::registry::UnitRegistry;
use super::sightline::{Sightline, confirm_sightline};
use super::{Intention, Unit};
use crate::GameSet;
use crate::config::{BehaviorStats, MovementStats};
use crate::third_party::TerrainProbe;

// === Types ===

/// Everything a unit knows about the world while it thinks.
pub struct Situation<'a, P> {
    pub unit: Entity,
    pub feet: Vec2,
    pub size: Vec2,
    pub grounded: bool,
    /// Archetype run speed the speed cap is derived from.
    pub max_speed: f32,
    /// Seconds of game time.
    pub now: f32,
    pub probe: &'a P,
    pub registry: &'a UnitRegistry,
    /// Where to aim at an entity, if it still exists.
    pub locate: &'a dyn Fn(Entity) -> Option<Vec2>,
    /// Whether this unit may pick up the given spear right now.
    pub can_pick_up: &'a dyn Fn(Entity) -> bool,
}

impl<P> Situation<'_, P> {
    /// Eye point: the center of the body.
    #[must_use]
    pub fn eye(&self) -> Vec2 {
        self.feet + Vec2::Y * self.size.y / 2.0
    }
}

/// The outcome of one [`Behavior::think`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Thought {
    pub intention: Intention,
    pub events: Vec<UnitEvent>,
    /// A spear left the hand, aimed at the given point.
    pub throw: Option<(Throw, Vec2)>,
    pub picked_up: Option<Entity>,
}

// === Components ===

/// Decision state of an autonomous unit.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Behavior {
    target: Option<Entity>,
    /// Who to chase when armed.
    quarry: Option<Entity>,
    sightline: Sightline,
    path: NavPath,
    pending: Option<PathTicket>,
    replan: Timer,
    jump_held: bool,
}

impl Behavior {
    #[must_use]
    pub fn new(quarry: Option<Entity>, stats: &BehaviorStats) -> Self {
        Self {
            target: quarry,
            quarry,
            sightline: Sightline::BLIND,
            path: NavPath::default(),
            pending: None,
            replan: Timer::from_seconds(stats.replan_interval, TimerMode::Repeating),
            jump_held: false,
        }
    }

    /// Decide, replan when due, then steer.
    pub fn think<P: CollisionProbe>(
        &mut self,
        combat: &mut CombatState,
        situation: &Situation<P>,
        stats: &BehaviorStats,
        rng: &mut impl Rng,
        paths: &mut PathQueue,
        dt: f32,
    ) -> Thought {
        let mut thought = Thought::default();

        self.refresh_sightline(situation, stats);
        self.decide(combat, situation, stats, rng, &mut thought);

        self.replan.tick(Duration::from_secs_f32(dt));
        if self.replan.just_finished() {
            self.replan_path(combat, situation, stats, paths);
        }

        thought.intention = self.steer(combat, situation, stats, rng);
        thought.intention.speed_cap = Some(self.speed_cap(combat, situation, stats));
        thought
    }

    fn refresh_sightline<P: CollisionProbe>(&mut self, situation: &Situation<P>, stats: &BehaviorStats) {
        let target = self.target.and_then(|target| (situation.locate)(target));
        self.sightline =
            confirm_sightline(situation.probe, situation.eye(), target, stats.sight_range);
    }

    fn set_target(&mut self, target: Option<Entity>) {
        if self.target == target {
            return;
        }
        self.target = target;
        self.path.clear();
        self.pending = None;
    }

    fn decide<P: CollisionProbe>(
        &mut self,
        combat: &mut CombatState,
        situation: &Situation<P>,
        stats: &BehaviorStats,
        rng: &mut impl Rng,
        thought: &mut Thought,
    ) {
        let now = situation.now;

        if combat.is_locked() {
            return;
        }

        if combat.must_celebrate() && situation.grounded {
            combat.begin_celebrating(now, stats);
            return;
        }

        if combat.is_spearless() {
            if self
                .target
                .is_some_and(|target| !situation.registry.contains_spear(target))
            {
                self.set_target(None);
            }
            if self.target.is_none() {
                self.adopt_nearest_spear(situation, stats);
            }

            let Some(spear) = self.target else {
                return;
            };
            if self.sightline.perceived_distance < stats.within_reach_distance
                && (situation.can_pick_up)(spear)
            {
                thought.events.push(combat.pick_up(spear));
                thought.picked_up = Some(spear);
                debug!("{} picked up spear {spear}", situation.unit);
                self.set_target(self.quarry);
                self.refresh_sightline(situation, stats);
            }
            return;
        }

        let in_range = self.sightline.visible
            && self.sightline.perceived_distance < stats.spear_range
            && !combat.must_celebrate();
        if !in_range {
            thought.events.extend(combat.set_aiming(false, now, stats));
            return;
        }

        if combat.should_throw(now) {
            let Some(at) = self.target.and_then(|target| (situation.locate)(target)) else {
                return;
            };
            if let Some(throw) = combat.throw(now, stats, rng, &mut thought.events) {
                debug!(
                    "{} threw spear {} (tripped: {})",
                    situation.unit, throw.spear, throw.tripped
                );
                thought.throw = Some((throw, at));
                self.set_target(None);
            }
        } else {
            thought
                .events
                .extend(combat.set_aiming(situation.grounded, now, stats));
        }
    }

    /// Target the closest free spear in sight, or stop walking if none is.
    fn adopt_nearest_spear<P: CollisionProbe>(
        &mut self,
        situation: &Situation<P>,
        stats: &BehaviorStats,
    ) {
        let nearest = situation.registry.nearest_spear_with_sightline(
            situation.eye(),
            situation.locate,
            situation.probe,
            stats.sight_range,
        );
        match nearest {
            Some((spear, _)) => {
                debug!("{} going for spear {spear}", situation.unit);
                self.set_target(Some(spear));
                self.refresh_sightline(situation, stats);
            }
            None => self.path.clear(),
        }
    }

    fn replan_path<P: CollisionProbe>(
        &mut self,
        combat: &CombatState,
        situation: &Situation<P>,
        stats: &BehaviorStats,
        paths: &mut PathQueue,
    ) {
        if self.pending.is_some() {
            return;
        }

        let closest = combat
            .is_spearless()
            .then(|| {
                situation.registry.nearest_spear_with_sightline(
                    situation.eye(),
                    situation.locate,
                    situation.probe,
                    stats.sight_range,
                )
            })
            .flatten()
            .map(|(spear, _)| spear);
        if closest.is_some() && closest != self.target {
            debug!("{} switching to spear {closest:?}", situation.unit);
            self.set_target(closest);
            self.refresh_sightline(situation, stats);
        }

        let goal = self.target.and_then(|target| (situation.locate)(target));
        match goal {
            Some(goal) if self.sightline.visible => {
                self.pending = Some(paths.request(situation.unit, situation.eye(), goal));
            }
            _ => self.path.clear(),
        }
    }

    /// Deliver a path service result.
    pub fn on_path_result(&mut self, ticket: PathTicket, waypoints: Option<Vec<Vec2>>) {
        if self.pending != Some(ticket) {
            debug!("discarding stale path {ticket:?}");
            return;
        }
        self.pending = None;

        let Some(waypoints) = waypoints else {
            return;
        };
        if !self.sightline.visible {
            debug!("discarding path {ticket:?}: target out of sight");
            return;
        }
        self.path.set(waypoints);
    }

    fn steer<P: CollisionProbe>(
        &mut self,
        combat: &CombatState,
        situation: &Situation<P>,
        stats: &BehaviorStats,
        rng: &mut impl Rng,
    ) -> Intention {
        let mut intention = Intention::default();
        let eye = situation.eye();

        let arrived = self.sightline.perceived_distance < stats.end_reached_distance;
        let halted = combat.is_aiming() || combat.is_locked() || arrived;
        let Some(mut waypoint) = self.path.current_waypoint().filter(|_| !halted) else {
            self.jump_held = false;
            return intention;
        };

        if eye.distance(waypoint) < stats.pick_next_waypoint_distance && self.path.advance() {
            waypoint = self.path.current_waypoint().unwrap_or(waypoint);
        }

        let direction = (waypoint - eye).normalize_or_zero();
        let facing = if direction.x < 0.0 { -1.0 } else { 1.0 };
        intention.movement.x = facing;

        let should_jump = self.should_jump(situation, stats, direction, facing, rng);
        intention.jump_pressed = should_jump && !self.jump_held;
        intention.jump_held = should_jump;
        self.jump_held = should_jump;
        intention
    }

    fn should_jump<P: CollisionProbe>(
        &self,
        situation: &Situation<P>,
        stats: &BehaviorStats,
        direction: Vec2,
        facing: f32,
        rng: &mut impl Rng,
    ) -> bool {
        let descending_onto_target = self.sightline.perceived_distance
            < stats.pathfinder_jump_threshold
            && direction.y < 0.0;
        if descending_onto_target {
            return false;
        }

        let feet = situation.feet;
        ledge_ahead(situation.probe, feet, situation.size, facing, stats)
            || obstacle_ahead(situation.probe, feet, situation.size, facing, stats)
            || void_below(situation.probe, feet, stats)
            || (direction.y > 0.75 && rng.random_range(0..1000) < stats.random_jump_chance)
    }

    /// Run faster without a spear; ease off when lined up with the target.
    fn speed_cap<P>(&self, combat: &CombatState, situation: &Situation<P>, stats: &BehaviorStats) -> f32 {
        let max = situation.max_speed;
        let target = self.target.and_then(|target| (situation.locate)(target));
        match target {
            Some(target) if self.sightline.visible => {
                let dx = (target.x - situation.eye().x).abs();
                (max * dx / stats.slowdown_distance).max(stats.min_speed).min(max)
            }
            _ if combat.is_spearless() => max * stats.spearless_speed_multiplier,
            _ => max,
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<Entity> {
        self.target
    }

    #[must_use]
    pub const fn sightline(&self) -> Sightline {
        self.sightline
    }

    #[must_use]
    pub const fn path(&self) -> &NavPath {
        &self.path
    }

    /// No path request is in flight.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

/// Center of an entity's body, or its origin for things without one.
fn aim_point(
    transform: &GlobalTransform,
    stats: Option<&MovementStats>,
    controller: Option<&MovementController>,
) -> Vec2 {
    let origin = transform.translation().xy();
    match (stats, controller) {
        (Some(stats), Some(controller)) => origin + Vec2::Y * controller.body_size(stats).y / 2.0,
        (Some(stats), None) => origin + Vec2::Y * stats.standing_size.y / 2.0,
        _ => origin,
    }
}

// === Systems ===

/// Runs every autonomous unit's decision step and applies its results.
/// Runs in `GameSet::Ai`.
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
fn think(
    time: Res<Time>,
    mut registry: ResMut<UnitRegistry>,
    probe: TerrainProbe,
    mut paths: ResMut<PathQueue>,
    mut rng: ResMut<SimulationRng>,
    mut units: Query<(
        &BehaviorStats,
        &MovementStats,
        &MovementController,
        &GlobalTransform,
        Option<&BodyCollider>,
        &mut Behavior,
        &mut CombatState,
        &mut Intention,
    )>,
    bodies: Query<(
        &GlobalTransform,
        Option<&MovementStats>,
        Option<&MovementController>,
    )>,
    spears: Query<&Spear>,
    mut messages: MessageWriter<UnitMessage>,
    mut commands: Commands,
) {
    let now = time.elapsed_secs();
    let dt = time.delta_secs();
    let locate = |entity: Entity| {
        bodies
            .get(entity)
            .ok()
            .map(|(transform, stats, controller)| aim_point(transform, stats, controller))
    };

    let order = registry.units().to_vec();
    for unit in order {
        let Ok((
            stats,
            movement_stats,
            controller,
            transform,
            collider,
            mut behavior,
            mut combat,
            mut intention,
        )) = units.get_mut(unit)
        else {
            continue;
        };

        let can_pick_up = |spear: Entity| {
            spears
                .get(spear)
                .is_ok_and(|spear| spear.is_free() && !spear.ignores(unit, now))
        };
        let excluded = std::iter::once(unit).chain(collider.map(|collider| collider.0));
        let unit_probe = probe.excluding(excluded);
        let situation = Situation {
            unit,
            feet: transform.translation().xy(),
            size: controller.body_size(movement_stats),
            grounded: controller.is_grounded(),
            max_speed: movement_stats.max_speed,
            now,
            probe: &unit_probe,
            registry: &registry,
            locate: &locate,
            can_pick_up: &can_pick_up,
        };
        let eye = situation.eye();

        let thought = behavior.think(
            &mut combat,
            &situation,
            stats,
            &mut rng.0,
            &mut paths,
            dt,
        );
        intention.absorb(thought.intention);
        messages.write_batch(
            thought
                .events
                .into_iter()
                .map(|event| UnitMessage { unit, event }),
        );

        if let Some(spear) = thought.picked_up {
            registry.remove_spear(spear);
            carry_spear(&mut commands, spear, unit);
        }
        if let Some((throw, at)) = thought.throw {
            registry.add_spear(throw.spear);
            launch_spear(
                &mut commands,
                throw.spear,
                eye,
                (at - eye) * stats.throw_speed_factor,
                unit,
                now + stats.spear_ignore_duration,
            );
        }
    }
}

/// Nudges autonomous units apart so they do not stack up.
/// Runs in `GameSet::Movement` after the movement tick.
#[allow(clippy::type_complexity)]
fn separate_crowds(
    probe: TerrainProbe,
    mut units: Query<
        (
            Entity,
            &BehaviorStats,
            &MovementStats,
            &MovementController,
            &mut Transform,
            Option<&BodyCollider>,
        ),
        (With<Behavior>, With<Unit>),
    >,
    colliders: Query<&GlobalTransform>,
) {
    for (unit, stats, movement_stats, controller, mut transform, collider) in &mut units {
        let size = controller.body_size(movement_stats);
        let center = transform.translation.xy() + Vec2::Y * size.y / 2.0;
        let excluded = std::iter::once(unit).chain(collider.map(|collider| collider.0));
        let hits = lateral_neighbors(&probe.excluding(excluded), center, size, stats);
        let neighbors = hits
            .iter()
            .filter_map(|hit| colliders.get(hit.entity).ok())
            .map(|neighbor| neighbor.translation().xy());

        let push = avoidance_push(center, neighbors, stats);
        if push != Vec2::ZERO {
            transform.translation += push.extend(0.0);
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Behavior>();
    app.init_resource::<PathQueue>();
    app.add_systems(
        Update,
        (think, pathing::resolve_paths)
            .chain()
            .in_set(GameSet::Ai),
    );
    app.add_systems(
        FixedUpdate,
        separate_crowds
            .in_set(GameSet::Movement)
            .after(super::movement::drive_units),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTerrain;
    use crate::third_party::CollisionLayer;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const SIZE: Vec2 = Vec2::new(0.6, 1.6);

    /// A flat world with a unit, a quarry and optional spears, all at
    /// fixed positions.
    struct World2d {
        terrain: TestTerrain,
        registry: UnitRegistry,
        positions: Vec<(Entity, Vec2)>,
        unit: Entity,
        quarry: Entity,
        paths: PathQueue,
        rng: StdRng,
    }

    impl World2d {
        fn new(unit_x: f32, quarry_x: f32) -> Self {
            let mut world = World::new();
            let unit = world.spawn_empty().id();
            let quarry = world.spawn_empty().id();
            let mut registry = UnitRegistry::default();
            registry.add_unit(unit);
            Self {
                terrain: TestTerrain::new().with_floor(0.0),
                registry,
                positions: vec![(unit, Vec2::new(unit_x, 0.8)), (quarry, Vec2::new(quarry_x, 0.8))],
                unit,
                quarry,
                paths: PathQueue::default(),
                rng: StdRng::seed_from_u64(9),
            }
        }

        fn add_spear(&mut self, x: f32) -> Entity {
            let spear = Entity::from_bits(500 + self.positions.len() as u64);
            self.positions.push((spear, Vec2::new(x, 0.2)));
            self.registry.add_spear(spear);
            spear
        }

        fn feet(&self) -> Vec2 {
            self.positions[0].1 - Vec2::Y * SIZE.y / 2.0
        }

        fn think(
            &mut self,
            behavior: &mut Behavior,
            combat: &mut CombatState,
            now: f32,
            dt: f32,
        ) -> Thought {
            let positions = self.positions.clone();
            let locate = move |entity: Entity| {
                positions
                    .iter()
                    .find(|(candidate, _)| *candidate == entity)
                    .map(|(_, position)| *position)
            };
            let can_pick_up = |_: Entity| true;
            let situation = Situation {
                unit: self.unit,
                feet: self.feet(),
                size: SIZE,
                grounded: true,
                max_speed: 14.0,
                now,
                probe: &self.terrain,
                registry: &self.registry,
                locate: &locate,
                can_pick_up: &can_pick_up,
            };
            behavior.think(
                combat,
                &situation,
                &BehaviorStats::default(),
                &mut self.rng,
                &mut self.paths,
                dt,
            )
        }
    }

    fn armed() -> CombatState {
        CombatState::armed(Entity::from_bits(900))
    }

    #[test]
    fn spearless_unit_adopts_nearest_visible_spear() {
        let mut world = World2d::new(0.0, 40.0);
        let _far = world.add_spear(-30.0);
        let near = world.add_spear(20.0);
        let mut behavior = Behavior::new(None, &BehaviorStats::default());
        let mut combat = CombatState::default();

        world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert_eq!(behavior.target(), Some(near));
        assert!(behavior.sightline().visible);
    }

    #[test]
    fn pickup_within_reach_retargets_quarry() {
        let mut world = World2d::new(0.0, 40.0);
        let spear = world.add_spear(3.0);
        let mut behavior = Behavior::new(Some(world.quarry), &BehaviorStats::default());
        let mut combat = CombatState::default();

        let thought = world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert_eq!(thought.picked_up, Some(spear));
        assert_eq!(thought.events, vec![UnitEvent::ReclaimTriggered]);
        assert_eq!(behavior.target(), Some(world.quarry));
        assert!(!combat.is_spearless());
        assert!(combat.must_celebrate());
    }

    #[test]
    fn spear_behind_a_wall_is_neither_targeted_nor_picked_up() {
        let mut world = World2d::new(0.0, 40.0);
        world.terrain.add_block(
            Vec2::new(2.0, 0.0),
            Vec2::new(0.5, 4.0),
            CollisionLayer::Ground,
        );
        let spear = world.add_spear(4.0);
        let stats = BehaviorStats::default();
        assert!(4.0 < stats.within_reach_distance);
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = CombatState::default();

        let thought = world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert_eq!(behavior.target(), None);
        assert_eq!(thought.picked_up, None);
        assert!(thought.events.is_empty());
        assert!(world.registry.contains_spear(spear));
        assert!(combat.is_spearless());
    }

    #[test]
    fn celebration_starts_on_the_ground_and_locks_decisions() {
        let mut world = World2d::new(0.0, 5.0);
        let spear = world.add_spear(3.0);
        let mut behavior = Behavior::new(Some(world.quarry), &BehaviorStats::default());
        let mut combat = CombatState::default();
        combat.pick_up(spear);

        world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert!(combat.is_locked());

        // Quarry in range, but no aiming while celebrating.
        let thought = world.think(&mut behavior, &mut combat, 0.1, 0.01);
        assert!(!combat.is_aiming());
        assert!(thought.events.is_empty());
        assert_eq!(thought.intention.movement, Vec2::ZERO);
    }

    #[test]
    fn armed_unit_aims_then_throws_once() {
        let mut world = World2d::new(0.0, 20.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();

        let thought = world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert_eq!(thought.events, vec![UnitEvent::AimingChanged { aiming: true }]);
        assert_eq!(thought.intention.movement, Vec2::ZERO);

        let mut throws = Vec::new();
        let mut now = 0.0;
        while now < stats.aim_duration * 2.0 {
            now += 0.1;
            throws.extend(world.think(&mut behavior, &mut combat, now, 0.1).throw);
        }
        assert_eq!(throws.len(), 1);
        let (throw, at) = throws[0];
        assert_eq!(throw.spear, Entity::from_bits(900));
        assert_eq!(at, Vec2::new(20.0, 0.8));
        assert_eq!(behavior.target(), None);
        assert!(combat.is_spearless());
    }

    #[test]
    fn out_of_range_cancels_aim() {
        let mut world = World2d::new(0.0, 20.0);
        let mut behavior = Behavior::new(Some(world.quarry), &BehaviorStats::default());
        let mut combat = armed();
        world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert!(combat.is_aiming());

        world.terrain.add_block(
            Vec2::new(10.0, 0.0),
            Vec2::new(1.0, 10.0),
            CollisionLayer::Ground,
        );
        let thought = world.think(&mut behavior, &mut combat, 0.5, 0.01);
        assert!(!combat.is_aiming());
        assert_eq!(thought.events, vec![UnitEvent::AimingChanged { aiming: false }]);
    }

    #[test]
    fn replan_requests_path_only_when_idle_and_visible() {
        let mut world = World2d::new(0.0, 80.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();

        world.think(&mut behavior, &mut combat, 0.0, stats.replan_interval);
        assert_eq!(world.paths.len(), 1);
        assert!(!behavior.is_idle());

        // Still waiting on the first request.
        world.think(&mut behavior, &mut combat, 0.3, stats.replan_interval);
        assert_eq!(world.paths.len(), 1);

        let request = world.paths.pop().unwrap();
        assert_eq!(request.unit, world.unit);
        assert_eq!(request.to, Vec2::new(80.0, 0.8));
        behavior.on_path_result(request.ticket, Some(vec![Vec2::new(40.0, 0.8), request.to]));
        assert!(behavior.is_idle());
        assert_eq!(behavior.path().waypoints.len(), 2);
    }

    #[test]
    fn stale_path_results_are_discarded() {
        let mut world = World2d::new(0.0, 80.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();
        world.think(&mut behavior, &mut combat, 0.0, stats.replan_interval);
        let request = world.paths.pop().unwrap();

        // Target changes while the request is in flight.
        behavior.set_target(None);
        behavior.on_path_result(request.ticket, Some(vec![request.to]));
        assert!(behavior.path().is_empty());
    }

    #[test]
    fn path_discarded_when_sightline_lost() {
        let mut world = World2d::new(0.0, 80.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();
        world.think(&mut behavior, &mut combat, 0.0, stats.replan_interval);
        let request = world.paths.pop().unwrap();

        world.terrain.add_block(
            Vec2::new(10.0, 0.0),
            Vec2::new(1.0, 10.0),
            CollisionLayer::Ground,
        );
        world.think(&mut behavior, &mut combat, 0.01, 0.01);
        behavior.on_path_result(request.ticket, Some(vec![request.to]));
        assert!(behavior.path().is_empty());
        assert!(behavior.is_idle());
    }

    #[test]
    fn steering_follows_waypoints() {
        let mut world = World2d::new(0.0, -80.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();
        world.think(&mut behavior, &mut combat, 0.0, stats.replan_interval);
        let request = world.paths.pop().unwrap();
        behavior.on_path_result(
            request.ticket,
            Some(vec![Vec2::new(-1.0, 0.8), Vec2::new(-40.0, 0.8)]),
        );

        let thought = world.think(&mut behavior, &mut combat, 0.01, 0.01);
        assert_eq!(thought.intention.movement, Vec2::NEG_X);
        // The first waypoint was within reach, so the cursor moved on.
        assert_eq!(behavior.path().current_index, 1);
        assert!(!thought.intention.jump_pressed);
        assert_eq!(thought.intention.speed_cap, Some(14.0));
    }

    #[test]
    fn jumps_at_obstacles_with_a_single_press() {
        let mut world = World2d::new(0.0, 80.0);
        world.terrain.add_block(
            Vec2::new(0.5, 0.0),
            Vec2::new(1.0, 0.5),
            CollisionLayer::Ground,
        );
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();
        world.think(&mut behavior, &mut combat, 0.0, stats.replan_interval);
        let request = world.paths.pop().unwrap();
        behavior.on_path_result(request.ticket, Some(vec![request.to]));

        let first = world.think(&mut behavior, &mut combat, 0.01, 0.01);
        assert!(first.intention.jump_pressed);
        assert!(first.intention.jump_held);
        let second = world.think(&mut behavior, &mut combat, 0.02, 0.01);
        assert!(!second.intention.jump_pressed);
        assert!(second.intention.jump_held);
    }

    #[test]
    fn speed_cap_eases_off_near_target() {
        let mut world = World2d::new(0.0, 1.5);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(Some(world.quarry), &stats);
        let mut combat = armed();

        let thought = world.think(&mut behavior, &mut combat, 0.0, 0.01);
        let expected = (14.0 * 1.5 / stats.slowdown_distance).max(stats.min_speed);
        assert_eq!(thought.intention.speed_cap, Some(expected));
    }

    #[test]
    fn spearless_without_target_runs_faster() {
        let mut world = World2d::new(0.0, 40.0);
        let stats = BehaviorStats::default();
        let mut behavior = Behavior::new(None, &stats);
        let mut combat = CombatState::default();

        let thought = world.think(&mut behavior, &mut combat, 0.0, 0.01);
        assert_eq!(
            thought.intention.speed_cap,
            Some(14.0 * stats.spearless_speed_multiplier)
        );
    }
}
