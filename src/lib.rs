//! Side-scroller unit simulation: a shared movement state machine for human
//! and autonomous units, and the spear-hunting behavior that drives the latter.

pub mod config;
#[cfg(feature = "dev")]
mod dev_tools;
pub mod gameplay;
pub mod sandbox;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod third_party;

use bevy::prelude::*;

/// Ordering of the simulation within a frame.
///
/// In `Update`: `Input` → `Ai` → `Combat`.
/// In `FixedUpdate`: `Movement` → `Combat`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Human input into intentions.
    Input,
    /// Behavior decisions and path resolution.
    Ai,
    /// Movement state machine ticks and crowd separation.
    Movement,
    /// Spear physics, throw recovery and celebration timers.
    Combat,
}

/// The whole simulation, without any presentation.
#[derive(Debug)]
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (GameSet::Input, GameSet::Ai, GameSet::Combat).chain(),
        )
        .configure_sets(FixedUpdate, (GameSet::Movement, GameSet::Combat).chain());

        app.add_plugins((third_party::plugin, gameplay::plugin));

        #[cfg(feature = "dev")]
        app.add_plugins(dev_tools::plugin);
    }
}
