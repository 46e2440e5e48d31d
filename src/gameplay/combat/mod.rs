//! Spear combat: aiming, throwing, recovery and reclaiming a thrown spear.

mod spear;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use spear::{
    SPEAR_LENGTH, Spear, SpearCollisionHooks, SpearState, carry_spear, launch_spear, spear_bundle,
};

use super::events::{UnitEvent, UnitMessage};
use crate::GameSet;
use crate::config::BehaviorStats;

// === Resources ===

/// The random source every simulation draw goes through.
#[derive(Resource)]
pub struct SimulationRng(pub StdRng);

impl SimulationRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for SimulationRng {
    fn default() -> Self {
        Self(StdRng::from_os_rng())
    }
}

// === Components ===

/// Post-pickup celebration, in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub enum Celebration {
    #[default]
    None,
    /// Waiting to touch the ground.
    Pending,
    HeadBob {
        until: f32,
    },
    Dancing {
        until: f32,
    },
}

/// What a throw decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throw {
    pub spear: Entity,
    pub tripped: bool,
}

/// Aim, throw and reclaim state of a spear-carrying unit. All times are
/// seconds of game time.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    spear: Option<Entity>,
    aiming: bool,
    aiming_until: f32,
    recovering_until: Option<f32>,
    celebration: Celebration,
}

impl CombatState {
    /// A unit holding `spear`.
    #[must_use]
    pub const fn armed(spear: Entity) -> Self {
        Self {
            spear: Some(spear),
            aiming: false,
            aiming_until: 0.0,
            recovering_until: None,
            celebration: Celebration::None,
        }
    }

    /// Start or stop aiming. Ignored while recovering from a throw; only a
    /// real change produces an event.
    pub fn set_aiming(
        &mut self,
        aiming: bool,
        now: f32,
        stats: &BehaviorStats,
    ) -> Option<UnitEvent> {
        if self.recovering_until.is_some() || self.spear.is_none() || self.aiming == aiming {
            return None;
        }
        self.aiming = aiming;
        if aiming {
            self.aiming_until = now + stats.aim_duration;
        }
        Some(UnitEvent::AimingChanged { aiming })
    }

    /// The aim window has run out and the spear should leave the hand.
    #[must_use]
    pub fn should_throw(&self, now: f32) -> bool {
        self.aiming && self.aiming_until < now
    }

    /// Let go of the spear. Locks the unit until recovery ends; a trip makes
    /// recovery longer.
    pub fn throw(
        &mut self,
        now: f32,
        stats: &BehaviorStats,
        rng: &mut impl Rng,
        events: &mut Vec<UnitEvent>,
    ) -> Option<Throw> {
        let spear = self.spear.take()?;
        let tripped = rng.random_bool(stats.trip_chance);
        let recovery = if tripped {
            stats.trip_recovery_duration
        } else {
            stats.recovery_duration
        };

        if self.aiming {
            self.aiming = false;
            events.push(UnitEvent::AimingChanged { aiming: false });
        }
        self.recovering_until = Some(now + recovery);
        events.push(UnitEvent::Throwing { tripped });
        Some(Throw { spear, tripped })
    }

    /// Take `spear` back in hand and queue a celebration.
    pub fn pick_up(&mut self, spear: Entity) -> UnitEvent {
        self.spear = Some(spear);
        self.celebration = Celebration::Pending;
        UnitEvent::ReclaimTriggered
    }

    pub fn begin_celebrating(&mut self, now: f32, stats: &BehaviorStats) {
        if self.celebration == Celebration::Pending {
            self.celebration = Celebration::HeadBob {
                until: now + stats.celebrate_duration,
            };
        }
    }

    /// Expire recovery and advance the celebration. Only autonomous units
    /// carry combat state, so every celebration ends in a dance.
    pub fn update(&mut self, now: f32, stats: &BehaviorStats, events: &mut Vec<UnitEvent>) {
        if self.recovering_until.is_some_and(|until| until <= now) {
            self.recovering_until = None;
            events.push(UnitEvent::Recovered);
        }

        self.celebration = match self.celebration {
            Celebration::HeadBob { until } if until <= now => Celebration::Dancing {
                until: until + stats.dance_duration,
            },
            Celebration::Dancing { until } if until <= now => Celebration::None,
            celebration => celebration,
        };
    }

    #[must_use]
    pub const fn spear(&self) -> Option<Entity> {
        self.spear
    }

    #[must_use]
    pub const fn is_spearless(&self) -> bool {
        self.spear.is_none()
    }

    #[must_use]
    pub const fn is_aiming(&self) -> bool {
        self.aiming
    }

    #[must_use]
    pub const fn is_recovering(&self) -> bool {
        self.recovering_until.is_some()
    }

    #[must_use]
    pub const fn celebration(&self) -> Celebration {
        self.celebration
    }

    /// Celebration queued or head-bobbing.
    #[must_use]
    pub const fn must_celebrate(&self) -> bool {
        matches!(
            self.celebration,
            Celebration::Pending | Celebration::HeadBob { .. }
        )
    }

    #[must_use]
    pub const fn is_dancing(&self) -> bool {
        matches!(self.celebration, Celebration::Dancing { .. })
    }

    /// Recovering or in a timed celebration; decisions are suspended.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.recovering_until.is_some()
            || matches!(
                self.celebration,
                Celebration::HeadBob { .. } | Celebration::Dancing { .. }
            )
    }
}

// === Systems ===

/// Advances recovery and celebration timers.
/// Runs in `GameSet::Combat`.
fn update_combat_timers(
    time: Res<Time>,
    mut units: Query<(Entity, &BehaviorStats, &mut CombatState)>,
    mut messages: MessageWriter<UnitMessage>,
) {
    let now = time.elapsed_secs();
    let mut events = Vec::new();
    for (unit, stats, mut combat) in &mut units {
        combat.update(now, stats, &mut events);
        for event in events.drain(..) {
            if event == UnitEvent::Recovered {
                debug!("{unit} recovered from a throw");
            }
            messages.write(UnitMessage { unit, event });
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CombatState>();
    app.init_resource::<SimulationRng>();
    app.add_systems(Update, update_combat_timers.in_set(GameSet::Combat));
    spear::plugin(app);
}
