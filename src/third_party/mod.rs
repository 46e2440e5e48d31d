//! Third-party plugin isolation.

mod avian;
mod vleue_navigator;

pub use avian::{CollisionLayer, ExcludingProbe, GRAVITY, TerrainProbe};
pub use vleue_navigator::{NavObstacle, navmesh_bundle};

pub fn plugin(app: &mut bevy::prelude::App) {
    app.add_plugins((avian::plugin, vleue_navigator::plugin));
}
