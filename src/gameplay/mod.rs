//! Gameplay domain plugins: unit movement, autonomous behavior and spear combat.

pub mod behavior;
pub mod combat;
pub mod events;
mod intention;
pub mod movement;
pub mod registry;
pub mod sightline;
pub mod spawn;

use bevy::prelude::*;

pub use intention::{Intention, condition_input, snap_axis};

// === Components ===

/// Marker for every simulated unit, human-driven or autonomous.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Unit;

/// Marker for the human-driven avatar.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Unit>().register_type::<Player>();
    app.add_plugins((
        events::plugin,
        intention::plugin,
        registry::plugin,
        movement::plugin,
        behavior::plugin,
        combat::plugin,
    ));
}
