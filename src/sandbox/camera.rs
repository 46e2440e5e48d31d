//! Camera setup and following the player avatar.

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use super::ARENA_HEIGHT;
use crate::gameplay::Player;

/// How quickly the camera catches up with the player, per second.
const CAMERA_FOLLOW_RATE: f32 = 4.0;

pub(super) fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: ARENA_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(0.0, ARENA_HEIGHT / 2.0, 0.0),
    ));
}

/// Horizontal follow only; the whole arena height is always in view.
pub(super) fn follow_player(
    time: Res<Time>,
    mut camera: Single<&mut Transform, With<Camera2d>>,
    player: Single<&Transform, (With<Player>, Without<Camera2d>)>,
) {
    let t = (CAMERA_FOLLOW_RATE * time.delta_secs()).min(1.0);
    camera.translation.x = camera.translation.x.lerp(player.translation.x, t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::create_test_app;

    #[test]
    fn camera_moves_toward_player() {
        let mut app = create_test_app();
        app.add_systems(Startup, setup_camera)
            .add_systems(Update, follow_player);
        app.world_mut()
            .spawn((Player, Transform::from_xyz(10.0, 0.0, 0.0)));

        app.update();
        std::thread::sleep(std::time::Duration::from_millis(5));
        app.update();

        let x = app
            .world_mut()
            .query_filtered::<&Transform, With<Camera2d>>()
            .single(app.world())
            .unwrap()
            .translation
            .x;
        assert!(x > 0.0 && x <= 10.0, "camera x {x}");
    }
}
