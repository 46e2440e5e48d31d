//! Per-archetype tuning loaded once before the simulation starts.
//!
//! Every value has a default, so an archetype file only needs to list the
//! fields it changes. Frame windows count fixed simulation ticks; durations
//! count seconds of game time.

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default archetype file read by the binary.
pub const ARCHETYPES_PATH: &str = "assets/archetypes.json";

// === Errors ===

/// Failure while loading an archetype file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed archetype file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

// === Movement ===

/// Movement tuning for one unit archetype.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct MovementStats {
    // Capabilities
    pub allow_walls: bool,
    pub allow_ledges: bool,
    pub allow_ladders: bool,
    pub allow_crouch: bool,
    pub allow_dash: bool,
    pub allow_attacks: bool,

    // Input
    /// Snap each axis of human input to -1, 0 or 1.
    pub snap_input: bool,
    pub horizontal_deadzone: f32,
    pub vertical_deadzone: f32,

    // Body geometry (world units, feet-anchored)
    pub standing_size: Vec2,
    pub crouching_size: Vec2,
    pub wall_detector_size: Vec2,
    pub skin_width: f32,
    pub grounder_distance: f32,

    // Horizontal
    pub max_speed: f32,
    pub acceleration: f32,
    pub ground_deceleration: f32,
    pub air_deceleration: f32,
    /// Extra ground deceleration after landing without horizontal input.
    pub sticky_feet_multiplier: f32,

    // Vertical
    pub grounding_force: f32,
    pub jump_power: f32,
    pub max_fall_speed: f32,
    pub fall_acceleration: f32,
    pub jump_end_early_gravity_modifier: f32,
    pub coyote_frames: u32,
    pub jump_buffer_frames: u32,
    pub max_air_jumps: u32,
    pub drop_through_frames: u32,

    /// Linear decay of external velocity, units per second.
    pub external_velocity_decay: f32,

    // Dash
    pub dash_velocity: f32,
    pub dash_duration_frames: u32,
    pub dash_end_horizontal_multiplier: f32,

    // Walls
    pub require_input_push: bool,
    pub wall_climb_speed: f32,
    pub max_wall_fall_speed: f32,
    pub wall_fall_acceleration: f32,
    pub wall_jump_power: Vec2,
    pub wall_jump_input_loss_frames: u32,
    pub wall_jump_coyote_frames: u32,

    // Ledges
    /// Offset from the feet to the hand position while hanging.
    pub ledge_grab_point: Vec2,
    /// Offset from the ledge corner to the feet after climbing up.
    pub stand_up_offset: Vec2,
    pub ledge_raycast_spacing: f32,
    pub ledge_grab_deceleration: f32,

    // Ladders
    pub auto_attach_to_ladders: bool,
    pub snap_to_ladders: bool,
    pub ladder_snap_time: f32,
    pub ladder_climb_speed: f32,
    pub ladder_slide_speed: f32,
    pub ladder_shimmy_multiplier: f32,
    pub ladder_pop_force: f32,
    pub ladder_cooldown_frames: u32,

    // Crouch
    pub crouch_slowdown_frames: u32,
    pub crouch_speed_penalty: f32,
    pub crouch_buffer_check: f32,

    // Attack
    pub attack_cooldown_frames: u32,
}

impl Default for MovementStats {
    fn default() -> Self {
        Self {
            allow_walls: true,
            allow_ledges: true,
            allow_ladders: true,
            allow_crouch: true,
            allow_dash: true,
            allow_attacks: true,

            snap_input: true,
            horizontal_deadzone: 0.1,
            vertical_deadzone: 0.3,

            standing_size: Vec2::new(0.6, 1.6),
            crouching_size: Vec2::new(0.6, 0.9),
            wall_detector_size: Vec2::new(0.8, 1.3),
            skin_width: 0.02,
            grounder_distance: 0.05,

            max_speed: 14.0,
            acceleration: 120.0,
            ground_deceleration: 60.0,
            air_deceleration: 30.0,
            sticky_feet_multiplier: 2.0,

            grounding_force: -1.5,
            jump_power: 36.0,
            max_fall_speed: 40.0,
            fall_acceleration: 110.0,
            jump_end_early_gravity_modifier: 3.0,
            coyote_frames: 7,
            jump_buffer_frames: 7,
            max_air_jumps: 1,
            drop_through_frames: 32,

            external_velocity_decay: 100.0,

            dash_velocity: 50.0,
            dash_duration_frames: 5,
            dash_end_horizontal_multiplier: 0.5,

            require_input_push: false,
            wall_climb_speed: 5.0,
            max_wall_fall_speed: 8.0,
            wall_fall_acceleration: 8.0,
            wall_jump_power: Vec2::new(30.0, 25.0),
            wall_jump_input_loss_frames: 18,
            wall_jump_coyote_frames: 5,

            ledge_grab_point: Vec2::new(0.3, 0.9),
            stand_up_offset: Vec2::new(0.2, 0.1),
            ledge_raycast_spacing: 0.2,
            ledge_grab_deceleration: 4.0,

            auto_attach_to_ladders: false,
            snap_to_ladders: true,
            ladder_snap_time: 0.05,
            ladder_climb_speed: 8.0,
            ladder_slide_speed: 12.0,
            ladder_shimmy_multiplier: 0.5,
            ladder_pop_force: 10.0,
            ladder_cooldown_frames: 8,

            crouch_slowdown_frames: 50,
            crouch_speed_penalty: 0.5,
            crouch_buffer_check: 0.1,

            attack_cooldown_frames: 6,
        }
    }
}

impl MovementStats {
    /// Reject values that would divide by zero or invert a window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wall_jump_input_loss_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "wall_jump_input_loss_frames",
                reason: "must be at least one frame",
            });
        }
        if self.crouch_slowdown_frames == 0 {
            return Err(ConfigError::Invalid {
                field: "crouch_slowdown_frames",
                reason: "must be at least one frame",
            });
        }
        if self.ladder_snap_time <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ladder_snap_time",
                reason: "must be positive",
            });
        }
        if self.crouching_size.y > self.standing_size.y {
            return Err(ConfigError::Invalid {
                field: "crouching_size",
                reason: "must not be taller than the standing pose",
            });
        }
        if self.external_velocity_decay <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "external_velocity_decay",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

// === Behavior ===

/// Decision tuning for autonomous units.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct BehaviorStats {
    pub sight_range: f32,
    pub spear_range: f32,
    pub within_reach_distance: f32,

    // Pathing
    pub replan_interval: f32,
    pub end_reached_distance: f32,
    pub pick_next_waypoint_distance: f32,
    pub slowdown_distance: f32,
    pub min_speed: f32,
    pub spearless_speed_multiplier: f32,

    // Jump assessment
    pub pathfinder_jump_threshold: f32,
    pub obstacle_detection_distance: f32,
    pub void_detection_distance: f32,
    pub afraid_of_height: f32,
    /// Chance out of 1000 per decision tick while heading steeply upward.
    pub random_jump_chance: u32,

    // Crowd separation
    pub local_avoidance_distance: f32,
    pub avoidance_radius: f32,
    pub avoidance_push: f32,

    // Combat timings (seconds)
    pub aim_duration: f32,
    pub recovery_duration: f32,
    pub trip_recovery_duration: f32,
    pub trip_chance: f64,
    pub celebrate_duration: f32,
    pub dance_duration: f32,
    pub spear_ignore_duration: f32,
    /// Multiplier applied to the offset toward the target to get launch velocity.
    pub throw_speed_factor: f32,
}

impl Default for BehaviorStats {
    fn default() -> Self {
        Self {
            sight_range: 100.0,
            spear_range: 50.0,
            within_reach_distance: 10.0,

            replan_interval: 0.25,
            end_reached_distance: 1.0,
            pick_next_waypoint_distance: 2.0,
            slowdown_distance: 3.0,
            min_speed: 4.0,
            spearless_speed_multiplier: 1.25,

            pathfinder_jump_threshold: 5.0,
            obstacle_detection_distance: 1.0,
            void_detection_distance: 3.0,
            afraid_of_height: 2.0,
            random_jump_chance: 1,

            local_avoidance_distance: 0.5,
            avoidance_radius: 5.0,
            avoidance_push: 0.05,

            aim_duration: 2.0,
            recovery_duration: 3.0,
            trip_recovery_duration: 5.0,
            trip_chance: 0.25,
            celebrate_duration: 1.0,
            dance_duration: 3.0,
            spear_ignore_duration: 0.25,
            throw_speed_factor: 2.0,
        }
    }
}

impl BehaviorStats {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slowdown_distance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "slowdown_distance",
                reason: "must be positive",
            });
        }
        if !(0.0..=1.0).contains(&self.trip_chance) {
            return Err(ConfigError::Invalid {
                field: "trip_chance",
                reason: "must be a probability in [0, 1]",
            });
        }
        if self.sight_range < self.spear_range {
            return Err(ConfigError::Invalid {
                field: "spear_range",
                reason: "cannot exceed sight_range",
            });
        }
        if self.replan_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "replan_interval",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

// === Archetypes ===

/// Complete tuning for one kind of unit.
#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct Archetype {
    pub movement: MovementStats,
    pub behavior: BehaviorStats,
}

/// The archetypes known to the simulation.
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct Archetypes {
    pub player: Archetype,
    pub mobb: Archetype,
}

impl Default for Archetypes {
    fn default() -> Self {
        Self {
            player: Archetype::default(),
            mobb: Archetype {
                movement: MovementStats {
                    allow_dash: false,
                    allow_crouch: false,
                    max_air_jumps: 0,
                    ..default()
                },
                behavior: BehaviorStats::default(),
            },
        }
    }
}

impl Archetypes {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.movement.validate()?;
        self.player.behavior.validate()?;
        self.mobb.movement.validate()?;
        self.mobb.behavior.validate()
    }
}

/// Parse and validate archetypes from JSON text.
pub fn parse_archetypes(json: &str) -> Result<Archetypes, ConfigError> {
    let archetypes: Archetypes = serde_json::from_str(json)?;
    archetypes.validate()?;
    Ok(archetypes)
}

/// Read, parse and validate an archetype file.
pub fn load_archetypes(path: impl AsRef<Path>) -> Result<Archetypes, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_archetypes(&json)
}
