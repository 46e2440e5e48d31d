//! Development tools — only included with `cargo run --features dev`.
//!
//! Gizmo overlays for what autonomous units are thinking.
//! This module is stripped from release builds.

use bevy::prelude::*;

use crate::config::MovementStats;
use crate::gameplay::behavior::Behavior;
use crate::gameplay::movement::MovementController;

const PATH_COLOR: Color = Color::srgb(0.3, 0.6, 1.0);
const VISIBLE_COLOR: Color = Color::srgb(0.2, 0.9, 0.2);
const BLIND_COLOR: Color = Color::srgba(0.9, 0.2, 0.2, 0.4);

/// Radius of the marker on the waypoint being steered toward.
const WAYPOINT_RADIUS: f32 = 0.2;

fn draw_paths(
    mut gizmos: Gizmos,
    units: Query<(&Behavior, &MovementStats, &MovementController, &GlobalTransform)>,
) {
    for (behavior, stats, controller, transform) in &units {
        let path = behavior.path();
        let Some(current) = path.current_waypoint() else {
            continue;
        };
        let eye = transform.translation().xy() + Vec2::Y * controller.body_size(stats).y / 2.0;
        let remaining = path.waypoints.iter().skip(path.current_index).copied();
        gizmos.linestrip_2d(std::iter::once(eye).chain(remaining), PATH_COLOR);
        gizmos.circle_2d(current, WAYPOINT_RADIUS, PATH_COLOR);
    }
}

fn draw_sightlines(
    mut gizmos: Gizmos,
    units: Query<(&Behavior, &MovementStats, &MovementController, &GlobalTransform)>,
    targets: Query<&GlobalTransform>,
) {
    for (behavior, stats, controller, transform) in &units {
        let Some(target) = behavior.target() else {
            continue;
        };
        let Ok(target) = targets.get(target) else {
            continue;
        };
        let eye = transform.translation().xy() + Vec2::Y * controller.body_size(stats).y / 2.0;
        let color = if behavior.sightline().visible {
            VISIBLE_COLOR
        } else {
            BLIND_COLOR
        };
        gizmos.line_2d(eye, target.translation().xy(), color);
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Update, (draw_paths, draw_sightlines));
}
