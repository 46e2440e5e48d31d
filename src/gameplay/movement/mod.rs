//! Unit movement: the per-unit state machine and the fixed-tick systems that
//! drive it against the physics world.

mod controller;
mod integrate;
mod jump;
mod probe;

use avian2d::prelude::*;
use bevy::prelude::*;

pub use controller::{Force, KinematicBody, MovementController, TickOutcome, VerticalMode};
pub use integrate::{approx_eq, inverse_lerp, move_towards, move_towards_vec};
pub use probe::{CollisionProbe, Overlap, ProbeHit};

use super::events::{LedgeClimbMilestone, LedgeClimbStage, UnitMessage};
use super::registry::UnitRegistry;
use super::{Intention, Player, Unit};
use crate::GameSet;
use crate::config::MovementStats;
use crate::third_party::{CollisionLayer, TerrainProbe};

// === Components ===

/// The child entity carrying a unit's body collider. Its shape and filter
/// follow the unit's pose.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct BodyCollider(pub Entity);

/// Collider for a body of `size` whose feet sit at the parent's origin.
#[must_use]
pub fn body_shape(size: Vec2) -> (Collider, Transform) {
    (
        Collider::rectangle(size.x, size.y),
        Transform::from_xyz(0.0, size.y / 2.0, 0.0),
    )
}

// === Systems ===

/// Feeds ledge-climb animation milestones back into the controllers.
/// Runs in `GameSet::Movement` before `drive_units`.
fn apply_ledge_milestones(
    mut milestones: MessageReader<LedgeClimbMilestone>,
    mut units: Query<(&MovementStats, &mut MovementController)>,
) {
    for milestone in milestones.read() {
        let Ok((stats, mut controller)) = units.get_mut(milestone.unit) else {
            continue;
        };
        match milestone.stage {
            LedgeClimbStage::Midpoint => controller.teleport_mid_ledge_climb(stats),
            LedgeClimbStage::Finished => controller.finish_climbing_ledge(),
        }
    }
}

/// Player units first, then autonomous units in registration order.
fn tick_order(players: impl IntoIterator<Item = Entity>, registry: &UnitRegistry) -> Vec<Entity> {
    let mut order: Vec<Entity> = players.into_iter().collect();
    for unit in registry.units() {
        if !order.contains(unit) {
            order.push(*unit);
        }
    }
    order
}

/// Advances every unit's movement state machine by one fixed tick and hands
/// the result to the physics body.
/// Runs in `GameSet::Movement`.
#[allow(clippy::type_complexity)]
pub(super) fn drive_units(
    time: Res<Time>,
    registry: Res<UnitRegistry>,
    probe: TerrainProbe,
    players: Query<Entity, (With<Player>, With<Unit>)>,
    mut units: Query<
        (
            &MovementStats,
            &mut MovementController,
            &mut Intention,
            &mut Transform,
            &mut LinearVelocity,
            Option<&BodyCollider>,
        ),
        With<Unit>,
    >,
    mut messages: MessageWriter<UnitMessage>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for unit in tick_order(&players, &registry) {
        let Ok((stats, mut controller, mut intention, mut transform, mut velocity, collider)) =
            units.get_mut(unit)
        else {
            continue;
        };

        let was_crouching = controller.is_crouching();
        let was_dropping = controller.is_dropping();
        let body = KinematicBody {
            position: transform.translation.xy(),
            velocity: velocity.0,
        };

        let excluded = std::iter::once(unit).chain(collider.map(|collider| collider.0));
        let outcome = controller.tick(body, &intention, stats, &probe.excluding(excluded), dt);
        intention.clear_presses();

        velocity.0 = outcome.velocity;
        if let Some(position) = outcome.position {
            transform.translation.x = position.x;
            transform.translation.y = position.y;
        }
        messages.write_batch(
            outcome
                .events
                .into_iter()
                .map(|event| UnitMessage { unit, event }),
        );

        let Some(collider) = collider else {
            continue;
        };
        if controller.is_crouching() != was_crouching {
            commands
                .entity(collider.0)
                .insert(body_shape(controller.body_size(stats)));
        }
        if controller.is_dropping() != was_dropping {
            commands
                .entity(collider.0)
                .insert(CollisionLayer::unit_body(controller.is_dropping()));
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<MovementController>()
        .register_type::<BodyCollider>();

    app.add_systems(
        FixedUpdate,
        (apply_ledge_milestones, drive_units)
            .chain()
            .in_set(GameSet::Movement),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_test_app;
    use pretty_assertions::assert_eq;

    #[test]
    fn players_tick_before_registered_units() {
        let mut world = World::new();
        let mob_a = world.spawn_empty().id();
        let player = world.spawn_empty().id();
        let mob_b = world.spawn_empty().id();

        let mut registry = UnitRegistry::default();
        registry.add_unit(mob_a);
        registry.add_unit(player);
        registry.add_unit(mob_b);

        assert_eq!(tick_order([player], &registry), vec![player, mob_a, mob_b]);
    }

    #[test]
    fn body_shape_puts_feet_at_origin() {
        let (_, transform) = body_shape(Vec2::new(0.6, 1.6));
        assert_eq!(transform.translation, Vec3::new(0.0, 0.8, 0.0));
    }

    fn climbing_unit(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                MovementStats::default(),
                MovementController {
                    climbing_ledge: true,
                    has_control: false,
                    ledge_climb_target: Some(Vec2::new(2.0, 3.0)),
                    ..default()
                },
            ))
            .id()
    }

    #[test]
    fn ledge_milestones_reach_the_controller() {
        let mut app = create_test_app();
        app.add_message::<LedgeClimbMilestone>();
        app.add_systems(Update, apply_ledge_milestones);
        let unit = climbing_unit(&mut app);

        app.world_mut().write_message(LedgeClimbMilestone {
            unit,
            stage: LedgeClimbStage::Midpoint,
        });
        app.update();
        let controller = app.world().get::<MovementController>(unit).unwrap();
        assert_eq!(controller.pending_teleport, Some(Vec2::new(2.0, 3.0)));
        assert!(!controller.has_control());

        app.world_mut().write_message(LedgeClimbMilestone {
            unit,
            stage: LedgeClimbStage::Finished,
        });
        app.update();
        let controller = app.world().get::<MovementController>(unit).unwrap();
        assert!(controller.has_control());
        assert!(!controller.is_climbing_ledge());
    }

    #[test]
    fn milestones_for_unknown_units_are_ignored() {
        let mut app = create_test_app();
        app.add_message::<LedgeClimbMilestone>();
        app.add_systems(Update, apply_ledge_milestones);
        let unit = climbing_unit(&mut app);
        let stranger = app.world_mut().spawn_empty().id();

        app.world_mut().write_message(LedgeClimbMilestone {
            unit: stranger,
            stage: LedgeClimbStage::Finished,
        });
        app.update();
        assert!(
            app.world()
                .get::<MovementController>(unit)
                .unwrap()
                .is_climbing_ledge()
        );
    }
}
