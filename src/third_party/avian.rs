//! Avian2d physics configuration and the spatial-query backed collision probe.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::gameplay::combat::SpearCollisionHooks;
use crate::gameplay::movement::{CollisionProbe, Overlap, ProbeHit};

/// World gravity, applied to free bodies such as thrown spears.
/// Units integrate their own gravity and run with `GravityScale(0.0)`.
pub const GRAVITY: f32 = 40.0;

// === Collision Layers ===

/// Physics collision layers.
///
/// - **Ground**: solid terrain that cannot be climbed.
/// - **OneWay**: platforms a unit may drop through.
/// - **Climbable**: solid terrain that units can cling to and mantle.
/// - **Ladder**: sensor volumes units can mount.
/// - **Unit**: unit bodies; units never block each other, spears hit them.
/// - **Spear**: thrown spears.
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum CollisionLayer {
    #[default]
    Ground,
    OneWay,
    Climbable,
    Ladder,
    Unit,
    Spear,
}

impl CollisionLayer {
    /// Everything a unit can stand on.
    #[must_use]
    pub fn walkable() -> LayerMask {
        [Self::Ground, Self::OneWay, Self::Climbable].into()
    }

    /// Solid terrain, excluding one-way platforms.
    #[must_use]
    pub fn solid() -> LayerMask {
        [Self::Ground, Self::Climbable].into()
    }

    /// Geometry that blocks line of sight.
    #[must_use]
    pub fn obstacles() -> LayerMask {
        Self::solid()
    }

    /// Layers a unit body collides with. One-way platforms drop out while
    /// the unit is falling through them.
    #[must_use]
    pub fn unit_body(dropping: bool) -> CollisionLayers {
        if dropping {
            CollisionLayers::new(Self::Unit, [Self::Ground, Self::Climbable, Self::Spear])
        } else {
            CollisionLayers::new(
                Self::Unit,
                [Self::Ground, Self::OneWay, Self::Climbable, Self::Spear],
            )
        }
    }
}

// === Collision Probe ===

/// Spatial queries against the physics world for one system run.
#[derive(SystemParam)]
pub struct TerrainProbe<'w, 's> {
    spatial: SpatialQuery<'w, 's>,
    transforms: Query<'w, 's, &'static GlobalTransform>,
}

impl<'w, 's> TerrainProbe<'w, 's> {
    /// A probe that ignores the given entities (a unit and its colliders).
    #[must_use]
    pub fn excluding(
        &self,
        excluded: impl IntoIterator<Item = Entity>,
    ) -> ExcludingProbe<'_, 'w, 's> {
        ExcludingProbe {
            spatial: &self.spatial,
            transforms: &self.transforms,
            excluded: excluded.into_iter().collect(),
        }
    }
}

/// [`CollisionProbe`] backed by avian's [`SpatialQuery`].
pub struct ExcludingProbe<'p, 'w, 's> {
    spatial: &'p SpatialQuery<'w, 's>,
    transforms: &'p Query<'w, 's, &'static GlobalTransform>,
    excluded: Vec<Entity>,
}

impl ExcludingProbe<'_, '_, '_> {
    fn filter(&self, mask: LayerMask) -> SpatialQueryFilter {
        SpatialQueryFilter::from_mask(mask).with_excluded_entities(self.excluded.iter().copied())
    }
}

impl CollisionProbe for ExcludingProbe<'_, '_, '_> {
    fn cast_shape(
        &self,
        origin: Vec2,
        half_extents: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        self.spatial
            .cast_shape(
                &shape,
                origin,
                0.0,
                direction,
                &ShapeCastConfig::from_max_distance(max_distance),
                &self.filter(mask),
            )
            .map(|hit| ProbeHit {
                entity: hit.entity,
                distance: hit.distance,
                point: hit.point1,
                normal: hit.normal1,
            })
    }

    fn cast_ray(
        &self,
        origin: Vec2,
        direction: Dir2,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<ProbeHit> {
        self.spatial
            .cast_ray(origin, direction, max_distance, true, &self.filter(mask))
            .map(|hit| ProbeHit {
                entity: hit.entity,
                distance: hit.distance,
                point: origin + *direction * hit.distance,
                normal: hit.normal,
            })
    }

    fn overlap_box(&self, center: Vec2, half_extents: Vec2, mask: LayerMask) -> Option<Overlap> {
        let shape = Collider::rectangle(half_extents.x * 2.0, half_extents.y * 2.0);
        self.spatial
            .shape_intersections(&shape, center, 0.0, &self.filter(mask))
            .into_iter()
            .filter_map(|entity| {
                let transform = self.transforms.get(entity).ok()?;
                Some(Overlap {
                    entity,
                    center: transform.translation().xy(),
                })
            })
            .min_by(|a, b| {
                a.center
                    .distance_squared(center)
                    .total_cmp(&b.center.distance_squared(center))
            })
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default().with_collision_hooks::<SpearCollisionHooks>());
    app.insert_resource(Gravity(Vec2::NEG_Y * GRAVITY));
}
