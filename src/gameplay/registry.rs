//! The shared registry of units and free spears.

use bevy::prelude::*;

use super::movement::CollisionProbe;
use super::sightline::{Sightline, confirm_sightline};
use super::{Unit, combat::Spear};
use crate::GameSet;

/// Units in registration order and spears lying free in the world.
///
/// Registration order decides the order movement ticks run in.
#[derive(Resource, Debug, Clone, Default, Reflect)]
#[reflect(Resource)]
pub struct UnitRegistry {
    units: Vec<Entity>,
    spears: Vec<Entity>,
}

impl UnitRegistry {
    pub fn add_unit(&mut self, unit: Entity) {
        if !self.units.contains(&unit) {
            self.units.push(unit);
        }
    }

    pub fn remove_unit(&mut self, unit: Entity) {
        self.units.retain(|registered| *registered != unit);
    }

    pub fn add_spear(&mut self, spear: Entity) {
        if !self.spears.contains(&spear) {
            self.spears.push(spear);
        }
    }

    pub fn remove_spear(&mut self, spear: Entity) {
        self.spears.retain(|registered| *registered != spear);
    }

    #[must_use]
    pub fn units(&self) -> &[Entity] {
        &self.units
    }

    #[must_use]
    pub fn spears(&self) -> &[Entity] {
        &self.spears
    }

    #[must_use]
    pub fn contains_spear(&self, spear: Entity) -> bool {
        self.spears.contains(&spear)
    }

    /// The free spear closest to `origin` that is actually in sight.
    /// Ties keep the earliest registered spear.
    pub fn nearest_spear_with_sightline<P: CollisionProbe>(
        &self,
        origin: Vec2,
        position_of: impl Fn(Entity) -> Option<Vec2>,
        probe: &P,
        range: f32,
    ) -> Option<(Entity, Sightline)> {
        self.spears
            .iter()
            .filter_map(|spear| {
                let sightline = confirm_sightline(probe, origin, position_of(*spear), range);
                sightline.visible.then_some((*spear, sightline))
            })
            .fold(None, |best: Option<(Entity, Sightline)>, candidate| match best {
                Some(best)
                    if best.1.perceived_distance <= candidate.1.perceived_distance =>
                {
                    Some(best)
                }
                _ => Some(candidate),
            })
    }
}

/// Drops despawned units and spears from the registry.
/// Runs in `GameSet::Ai`.
fn prune_registry(
    mut registry: ResMut<UnitRegistry>,
    units: Query<(), With<Unit>>,
    spears: Query<(), With<Spear>>,
) {
    let stale_units = registry.units.iter().any(|unit| !units.contains(*unit));
    let stale_spears = registry.spears.iter().any(|spear| !spears.contains(*spear));
    if !stale_units && !stale_spears {
        return;
    }
    registry.units.retain(|unit| units.contains(*unit));
    registry.spears.retain(|spear| spears.contains(*spear));
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<UnitRegistry>();
    app.init_resource::<UnitRegistry>();
    app.add_systems(Update, prune_registry.in_set(GameSet::Ai));
}
