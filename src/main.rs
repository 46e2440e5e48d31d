//! Trol Mobb sandbox entry point.

use bevy::prelude::*;
use trol_mobb::SimulationPlugin;
use trol_mobb::sandbox::SandboxPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Trol Mobb".to_string(),
                        resolution: (1920, 1080).into(),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .add_plugins((SimulationPlugin, SandboxPlugin))
        .run();
}
