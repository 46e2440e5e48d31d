//! Unit construction. Single source of truth for what a unit is made of.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::behavior::Behavior;
use super::combat::{CombatState, spear_bundle};
use super::movement::{BodyCollider, MovementController, body_shape};
use super::registry::UnitRegistry;
use super::{Intention, Player, Unit};
use crate::config::Archetype;
use crate::third_party::CollisionLayer;

/// Player avatar color (green).
const PLAYER_COLOR: Color = Color::srgb(0.2, 0.8, 0.2);

/// Mobb color (red).
const MOBB_COLOR: Color = Color::srgb(0.8, 0.2, 0.2);

/// Spawn a unit body with its feet at `feet` and register it.
///
/// The body is a rotation-locked dynamic rigid body that ignores gravity;
/// the movement controller owns its velocity. The collider lives on a child
/// so it can be resized on crouch without touching the body.
pub fn spawn_unit(
    commands: &mut Commands,
    archetype: &Archetype,
    feet: Vec2,
    color: Color,
    registry: &mut UnitRegistry,
) -> Entity {
    let size = archetype.movement.standing_size;
    let unit = commands
        .spawn((
            Unit,
            archetype.movement.clone(),
            MovementController::default(),
            Intention::default(),
            Transform::from_translation(feet.extend(0.0)),
            Visibility::default(),
        ))
        .insert((
            RigidBody::Dynamic,
            GravityScale(0.0),
            LockedAxes::ROTATION_LOCKED,
            Friction::ZERO,
            LinearVelocity::ZERO,
        ))
        .id();

    let collider = commands
        .spawn((
            Name::new("Body"),
            body_shape(size),
            CollisionLayer::unit_body(false),
            Sprite::from_color(color, size),
            ChildOf(unit),
        ))
        .id();
    commands.entity(unit).insert(BodyCollider(collider));

    registry.add_unit(unit);
    unit
}

/// Spawn the human-driven avatar.
pub fn spawn_player(
    commands: &mut Commands,
    archetype: &Archetype,
    feet: Vec2,
    registry: &mut UnitRegistry,
) -> Entity {
    let unit = spawn_unit(commands, archetype, feet, PLAYER_COLOR, registry);
    commands
        .entity(unit)
        .insert((Name::new("Player"), Player, archetype.behavior.clone()));
    unit
}

/// Spawn an autonomous spear-carrying unit hunting `quarry`.
pub fn spawn_mobb(
    commands: &mut Commands,
    archetype: &Archetype,
    feet: Vec2,
    quarry: Option<Entity>,
    registry: &mut UnitRegistry,
) -> Entity {
    let unit = spawn_unit(commands, archetype, feet, MOBB_COLOR, registry);
    let spear = commands.spawn(spear_bundle(unit)).id();
    commands.entity(unit).insert((
        Name::new("Mobb"),
        archetype.behavior.clone(),
        Behavior::new(quarry, &archetype.behavior),
        CombatState::armed(spear),
    ));
    unit
}
