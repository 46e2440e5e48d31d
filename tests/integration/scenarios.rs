//! Closed-loop hunts: decisions, paths and movement together.

use bevy::prelude::*;
use trol_mobb::gameplay::events::UnitEvent;
use trol_mobb::testing::TestTerrain;
use trol_mobb::third_party::CollisionLayer;

use crate::common::Hunt;

#[test]
fn mobb_throws_then_walks_to_its_spear_and_picks_it_up() {
    let mut hunt = Hunt::new(TestTerrain::new().with_floor(0.0), 0.0, 40.0);
    hunt.run_for(12.0);

    let aimed = hunt
        .first(|event| *event == UnitEvent::AimingChanged { aiming: true })
        .expect("never aimed");
    let threw = hunt
        .first(|event| matches!(event, UnitEvent::Throwing { .. }))
        .expect("never threw");
    let recovered = hunt
        .first(|event| *event == UnitEvent::Recovered)
        .expect("never recovered");
    let reclaimed = hunt
        .first(|event| *event == UnitEvent::ReclaimTriggered)
        .expect("never picked the spear up");
    assert!(aimed < threw && threw < recovered && recovered < reclaimed);

    // It had to cover most of the distance to reach the spear.
    let reach = hunt.archetype.behavior.within_reach_distance;
    assert!(
        hunt.body.position.x > 40.0 - reach - 1.0,
        "stopped at {}",
        hunt.body.position.x
    );
    assert!(hunt.path_requests > 0);
    assert!(hunt.registry.spears().is_empty());
}

#[test]
fn mobb_ignores_a_quarry_behind_a_wall_until_it_opens() {
    let mut terrain = TestTerrain::new().with_floor(0.0);
    let wall = terrain.add_block(
        Vec2::new(20.0, 0.0),
        Vec2::new(1.0, 10.0),
        CollisionLayer::Ground,
    );
    let mut hunt = Hunt::new(terrain, 0.0, 40.0);
    hunt.run_for(5.0);

    assert!(!hunt.behavior.sightline().visible);
    assert!(hunt.behavior.path().is_empty());
    assert_eq!(hunt.path_requests, 0);
    assert!(hunt.first(|event| matches!(event, UnitEvent::AimingChanged { .. })).is_none());
    assert!(hunt.body.position.x.abs() < 0.01);

    hunt.terrain.remove_block(wall);
    hunt.run_for(0.5);
    assert!(hunt.behavior.sightline().visible);
    assert!(hunt.combat.is_aiming());
}

#[test]
fn out_of_range_quarry_is_approached_before_aiming() {
    let mut hunt = Hunt::new(TestTerrain::new().with_floor(0.0), 0.0, 80.0);
    hunt.run_for(1.0);
    assert!(!hunt.combat.is_aiming());
    assert!(hunt.body.position.x > 1.0);

    hunt.run_for(4.0);
    assert!(hunt.combat.is_aiming() || hunt.combat.is_spearless());
}
