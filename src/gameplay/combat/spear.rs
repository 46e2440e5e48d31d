//! The spear as a physical object: flight, anchoring and being carried.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::GameSet;
use crate::third_party::CollisionLayer;

pub const SPEAR_LENGTH: f32 = 1.6;
const SPEAR_THICKNESS: f32 = 0.1;

/// Height above the carrier's feet where a held spear rides.
const CARRY_HEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SpearState {
    Flying,
    /// Stuck in terrain. No longer collides with anything.
    Anchored,
    Carried { owner: Entity },
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, Visibility)]
pub struct Spear {
    pub state: SpearState,
    /// The thrower, until the given time. The spear passes through an
    /// ignored unit and that unit cannot pick it up.
    ignored: Option<(Entity, f32)>,
}

impl Spear {
    #[must_use]
    pub const fn carried(owner: Entity) -> Self {
        Self {
            state: SpearState::Carried { owner },
            ignored: None,
        }
    }

    #[must_use]
    pub const fn thrown(thrower: Entity, ignore_until: f32) -> Self {
        Self {
            state: SpearState::Flying,
            ignored: Some((thrower, ignore_until)),
        }
    }

    #[must_use]
    pub fn ignores(&self, unit: Entity, now: f32) -> bool {
        self.ignored
            .is_some_and(|(ignored, until)| ignored == unit && now < until)
    }

    /// Lying loose in the world, flying or anchored.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        !matches!(self.state, SpearState::Carried { .. })
    }
}

fn flight_layers() -> CollisionLayers {
    CollisionLayers::new(
        CollisionLayer::Spear,
        [
            CollisionLayer::Ground,
            CollisionLayer::OneWay,
            CollisionLayer::Climbable,
            CollisionLayer::Unit,
        ],
    )
}

/// Components of a freshly spawned spear held by `owner`.
#[must_use]
pub fn spear_bundle(owner: Entity) -> impl Bundle {
    (
        Name::new("Spear"),
        Spear::carried(owner),
        RigidBody::Kinematic,
        Collider::rectangle(SPEAR_LENGTH, SPEAR_THICKNESS),
        Sensor,
        CollisionLayers::NONE,
        ActiveCollisionHooks::FILTER_PAIRS,
        LockedAxes::ROTATION_LOCKED,
        CollidingEntities::default(),
        Visibility::Hidden,
    )
}

/// Throw `spear` from `origin` with `velocity`.
pub fn launch_spear(
    commands: &mut Commands,
    spear: Entity,
    origin: Vec2,
    velocity: Vec2,
    thrower: Entity,
    ignore_until: f32,
) {
    commands.entity(spear).remove::<Sensor>().insert((
        Spear::thrown(thrower, ignore_until),
        RigidBody::Dynamic,
        Transform::from_translation(origin.extend(0.0))
            .with_rotation(Quat::from_rotation_z(velocity.to_angle())),
        LinearVelocity(velocity),
        flight_layers(),
        Visibility::Visible,
    ));
}

/// Put `spear` back in `owner`'s hands.
pub fn carry_spear(commands: &mut Commands, spear: Entity, owner: Entity) {
    commands.entity(spear).insert((
        Spear::carried(owner),
        RigidBody::Kinematic,
        LinearVelocity::ZERO,
        Sensor,
        CollisionLayers::NONE,
        Visibility::Hidden,
    ));
}

// === Collision Hooks ===

/// Drops contact pairs between a spear and the unit it ignores.
#[derive(SystemParam)]
pub struct SpearCollisionHooks<'w, 's> {
    spears: Query<'w, 's, &'static Spear>,
    parents: Query<'w, 's, &'static ChildOf>,
    time: Res<'w, Time<Virtual>>,
}

impl SpearCollisionHooks<'_, '_> {
    /// Unit bodies collide through a child collider.
    fn owner(&self, collider: Entity) -> Entity {
        self.parents.get(collider).map_or(collider, ChildOf::parent)
    }

    fn passes_through(&self, spear: Entity, other: Entity) -> bool {
        let now = self.time.elapsed_secs();
        self.spears
            .get(spear)
            .is_ok_and(|spear| spear.ignores(self.owner(other), now))
    }
}

impl CollisionHooks for SpearCollisionHooks<'_, '_> {
    fn filter_pairs(&self, collider1: Entity, collider2: Entity, _commands: &mut Commands) -> bool {
        !(self.passes_through(collider1, collider2) || self.passes_through(collider2, collider1))
    }
}

// === Systems ===

/// Sticks flying spears into the first terrain they touch.
/// Runs in `GameSet::Combat`.
fn anchor_spears(
    mut spears: Query<(
        &mut Spear,
        &CollidingEntities,
        &mut RigidBody,
        &mut LinearVelocity,
        &mut CollisionLayers,
    )>,
    terrain: Query<&CollisionLayers, Without<Spear>>,
) {
    for (mut spear, colliding, mut body, mut velocity, mut layers) in &mut spears {
        if spear.state != SpearState::Flying {
            continue;
        }
        let hit_terrain = colliding.iter().any(|entity| {
            terrain.get(*entity).is_ok_and(|terrain_layers| {
                terrain_layers.memberships & CollisionLayer::walkable() != LayerMask::NONE
            })
        });
        if !hit_terrain {
            continue;
        }

        spear.state = SpearState::Anchored;
        *body = RigidBody::Static;
        velocity.0 = Vec2::ZERO;
        *layers = CollisionLayers::NONE;
    }
}

/// Points flying spears along their velocity.
/// Runs in `GameSet::Combat`.
fn orient_spears(mut spears: Query<(&Spear, &LinearVelocity, &mut Rotation)>) {
    for (spear, velocity, mut rotation) in &mut spears {
        if spear.state != SpearState::Flying || velocity.0 == Vec2::ZERO {
            continue;
        }
        *rotation = Rotation::radians(velocity.0.to_angle());
    }
}

/// Ends the thrower's grace window.
/// Runs in `GameSet::Combat`.
fn expire_spear_ignores(time: Res<Time>, mut spears: Query<&mut Spear>) {
    let now = time.elapsed_secs();
    for mut spear in &mut spears {
        if spear.ignored.is_some_and(|(_, until)| now >= until) {
            spear.ignored = None;
        }
    }
}

/// Keeps carried spears with their owner.
/// Runs in `GameSet::Combat`.
fn follow_carriers(
    mut spears: Query<(&Spear, &mut Transform)>,
    owners: Query<&GlobalTransform, Without<Spear>>,
) {
    for (spear, mut transform) in &mut spears {
        let SpearState::Carried { owner } = spear.state else {
            continue;
        };
        let Ok(owner) = owners.get(owner) else {
            continue;
        };
        let held = owner.translation().xy() + Vec2::Y * CARRY_HEIGHT;
        transform.translation = held.extend(transform.translation.z);
        transform.rotation = Quat::IDENTITY;
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Spear>();
    app.add_systems(
        FixedUpdate,
        (orient_spears, anchor_spears).in_set(GameSet::Combat),
    );
    app.add_systems(
        Update,
        (expire_spear_ignores, follow_carriers).in_set(GameSet::Combat),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_test_app;
    use bevy::ecs::system::RunSystemOnce;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn thrower_is_ignored_only_during_grace() {
        let mut world = World::new();
        let thrower = world.spawn_empty().id();
        let other = world.spawn_empty().id();
        let spear = Spear::thrown(thrower, 1.0);

        assert!(spear.ignores(thrower, 0.5));
        assert!(!spear.ignores(other, 0.5));
        assert!(!spear.ignores(thrower, 1.0));
    }

    #[test]
    fn carried_spears_are_not_free() {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        assert!(!Spear::carried(owner).is_free());
        assert!(Spear::thrown(owner, 0.0).is_free());
    }

    #[test]
    fn grace_window_expires() {
        let mut app = create_test_app();
        app.add_systems(Update, expire_spear_ignores);
        let thrower = app.world_mut().spawn_empty().id();
        let spear = app.world_mut().spawn(Spear::thrown(thrower, 0.0)).id();

        app.update();
        assert_eq!(app.world().get::<Spear>(spear).unwrap().ignored, None);
    }

    #[test]
    fn carried_spear_follows_owner() {
        let mut app = create_test_app();
        app.add_systems(Update, follow_carriers);
        let owner = app
            .world_mut()
            .spawn(GlobalTransform::from_xyz(3.0, 4.0, 0.0))
            .id();
        let spear = app.world_mut().spawn(Spear::carried(owner)).id();

        app.update();
        let transform = app.world().get::<Transform>(spear).unwrap();
        assert_eq!(
            transform.translation.xy(),
            Vec2::new(3.0, 4.0 + CARRY_HEIGHT)
        );
    }

    #[test]
    fn flying_spears_and_unit_bodies_filter_each_other() {
        let spear: LayerMask = CollisionLayer::Spear.into();
        let unit: LayerMask = CollisionLayer::Unit.into();
        assert_ne!(flight_layers().filters & unit, LayerMask::NONE);
        assert_ne!(CollisionLayer::unit_body(false).filters & spear, LayerMask::NONE);
    }

    fn contacts(world: &mut World, spear: Entity, bodies: [Entity; 2]) -> [bool; 3] {
        world
            .run_system_once(move |hooks: SpearCollisionHooks, mut commands: Commands| {
                [
                    hooks.filter_pairs(spear, bodies[0], &mut commands),
                    hooks.filter_pairs(bodies[0], spear, &mut commands),
                    hooks.filter_pairs(spear, bodies[1], &mut commands),
                ]
            })
            .unwrap()
    }

    #[test]
    fn thrown_spear_passes_through_only_its_thrower() {
        let mut world = World::new();
        world.insert_resource(Time::<Virtual>::default());
        let thrower = world.spawn_empty().id();
        let thrower_body = world.spawn(ChildOf(thrower)).id();
        let target = world.spawn_empty().id();
        let target_body = world.spawn(ChildOf(target)).id();
        let spear = world.spawn(Spear::thrown(thrower, 1.0)).id();

        let bodies = [thrower_body, target_body];
        assert_eq!(contacts(&mut world, spear, bodies), [false, false, true]);

        world
            .resource_mut::<Time<Virtual>>()
            .advance_by(Duration::from_secs(2));
        assert_eq!(contacts(&mut world, spear, bodies), [true, true, true]);
    }
}
