//! `vleue_navigator` navmesh configuration for the path service.

use avian2d::prelude::*;
use bevy::prelude::*;
use vleue_navigator::prelude::*;

/// Marker: this entity's `Collider` is carved out of the navmesh.
/// Add to solid terrain. Do NOT add to units, spears, ladders or one-way
/// platforms; units pass through those.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct NavObstacle;

/// A navmesh covering `bounds`, kept up to date from [`NavObstacle`]
/// colliders. Obstacles are inflated by `agent_radius`.
#[must_use]
pub fn navmesh_bundle(bounds: Rect, agent_radius: f32) -> impl Bundle {
    (
        Name::new("NavMesh"),
        ManagedNavMesh::single(),
        NavMeshSettings {
            fixed: Triangulation::from_outer_edges(&[
                bounds.min,
                Vec2::new(bounds.max.x, bounds.min.y),
                bounds.max,
                Vec2::new(bounds.min.x, bounds.max.y),
            ]),
            simplify: 0.001,
            merge_steps: 0,
            agent_radius,
            ..default()
        },
        NavMeshUpdateMode::Direct,
        Transform::default(),
    )
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<NavObstacle>();
    app.add_plugins((
        VleueNavigatorPlugin,
        NavmeshUpdaterPlugin::<Collider, NavObstacle>::default(),
    ));
}
