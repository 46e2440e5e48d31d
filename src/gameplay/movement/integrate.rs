//! Speed integration and the scalar helpers it is built from.

use bevy::prelude::*;

use super::controller::MovementController;
use crate::config::MovementStats;

/// Move `current` toward `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

#[must_use]
pub fn move_towards_vec(current: Vec2, target: Vec2, max_delta: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_delta
    }
}

/// Critically damped spring toward `target`. `velocity` carries state
/// between calls.
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    // No overshoot.
    if (target > current) == (output > target) {
        *velocity = 0.0;
        return target;
    }
    output
}

/// Where `value` sits between `a` and `b`, clamped to `[0, 1]`.
#[must_use]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

#[must_use]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-5
}

impl MovementController {
    pub(super) fn handle_horizontal(&mut self, stats: &MovementStats, dt: f32) {
        if self.dashing || (self.shimmying && self.pushing_into_wall(stats)) {
            return;
        }

        if !self.horizontal_input_pressed(stats) {
            let deceleration = if self.grounded {
                if self.sticky_feet {
                    stats.ground_deceleration * stats.sticky_feet_multiplier
                } else {
                    stats.ground_deceleration
                }
            } else {
                stats.air_deceleration
            };
            self.speed.x = move_towards(self.speed.x, 0.0, deceleration * dt);
        } else if self.crouching && self.grounded {
            let crawled = self.frame.saturating_sub(self.frame_started_crouching);
            let t = inverse_lerp(0.0, stats.crouch_slowdown_frames as f32, crawled as f32);
            let cap = stats.max_speed * (1.0 + (stats.crouch_speed_penalty - 1.0) * t);
            self.speed.x = move_towards(
                self.speed.x,
                cap * self.input.x,
                stats.ground_deceleration * dt,
            );
        } else {
            if self.contacts.hitting_wall
                && self.body_velocity.x.abs() < 0.02
                && !self.is_leaving_wall
            {
                self.speed.x = 0.0;
            }

            let input = if self.on_ladder {
                self.input.x * stats.ladder_shimmy_multiplier
            } else {
                self.input.x
            };
            let max_speed = self.speed_cap.unwrap_or(stats.max_speed);
            self.speed.x = move_towards(
                self.speed.x,
                input * max_speed,
                self.wall_jump_input_multiplier * stats.acceleration * dt,
            );
        }
    }

    pub(super) fn handle_vertical(&mut self, stats: &MovementStats, dt: f32) {
        if self.dashing || self.climbing_ledge {
            return;
        }

        if self.on_ladder {
            let rate = if self.input.y > 0.0 {
                stats.ladder_climb_speed
            } else {
                stats.ladder_slide_speed
            };
            self.speed.y = self.input.y * rate;
        } else if self.grounded && self.speed.y <= 0.0 {
            self.speed.y = stats.grounding_force;
            let normal = self.ground_normal;
            // Follow the slope instead of launching off it.
            if !approx_eq(normal.y, 1.0) && !approx_eq(normal.y, 0.0) {
                self.speed.y = self.speed.x * -normal.x / normal.y;
                if self.speed.x != 0.0 {
                    self.speed.y += stats.grounding_force;
                }
            }
        } else if self.on_wall && !self.is_leaving_wall {
            self.handle_wall_vertical(stats, dt);
        } else {
            let mut gravity = stats.fall_acceleration;
            if self.ended_jump_early && self.speed.y > 0.0 {
                gravity *= stats.jump_end_early_gravity_modifier;
            }
            self.speed.y = move_towards(self.speed.y, -stats.max_fall_speed, gravity * dt);
        }
    }

    fn handle_wall_vertical(&mut self, stats: &MovementStats, dt: f32) {
        if self.shimmying {
            self.speed.y = stats.wall_climb_speed;
            return;
        }

        if self.pushing_into_wall(stats) {
            self.speed.x = 0.0;
        }

        let deadzone = stats.vertical_deadzone;
        if self.input.y > deadzone {
            if self.can_shimmy {
                self.shimmying = true;
                self.can_shimmy = false;
                self.speed.y = stats.wall_climb_speed;
            } else {
                self.speed.y = -1.0;
            }
        } else if self.input.y < -deadzone {
            self.speed.y = -stats.max_wall_fall_speed;
        } else if self.grabbing_ledge {
            self.speed.y = move_towards(self.speed.y, 0.0, stats.ledge_grab_deceleration * dt);
        } else {
            self.speed.y = move_towards(
                self.speed.y.min(0.0),
                -stats.max_wall_fall_speed,
                stats.wall_fall_acceleration * dt,
            );
        }
    }

    /// Combine controlled and external velocity, then let the external part
    /// decay.
    pub(super) fn apply_movement(&mut self, stats: &MovementStats, dt: f32) {
        if !self.has_control {
            return;
        }
        self.velocity = self.speed + self.external_velocity;
        self.external_velocity = move_towards_vec(
            self.external_velocity,
            Vec2::ZERO,
            stats.external_velocity_decay * dt,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::Intention;
    use crate::gameplay::movement::Force;
    use crate::testing::{DT, Rig, TestTerrain};
    use pretty_assertions::assert_eq;

    #[test]
    fn move_towards_stops_at_target() {
        assert_eq!(move_towards(0.0, 1.0, 0.4), 0.4);
        assert_eq!(move_towards(0.9, 1.0, 0.4), 1.0);
        assert_eq!(move_towards(0.0, -1.0, 2.0), -1.0);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut velocity = 0.0;
        let mut x = 1.0;
        for _ in 0..64 {
            x = smooth_damp(x, 0.0, &mut velocity, 0.05, DT);
            assert!(x >= 0.0);
        }
        assert!(x < 1e-3);
    }

    #[test]
    fn external_velocity_decays_to_exactly_zero() {
        let mut rig = Rig::new(TestTerrain::new(), Vec2::ZERO);
        rig.stats.external_velocity_decay = 128.0;
        rig.controller.apply_velocity(Vec2::new(10.0, 0.0), Force::Decay);

        // 2 units per tick: 10 -> 8 -> 6 -> 4 -> 2 -> 0.
        let first = rig.tick_in_place(&Intention::default());
        assert_eq!(first.velocity.x, 10.0);
        for _ in 0..3 {
            rig.tick_in_place(&Intention::default());
        }
        assert_eq!(rig.controller.external_velocity(), Vec2::new(2.0, 0.0));
        rig.tick_in_place(&Intention::default());
        assert_eq!(rig.controller.external_velocity(), Vec2::ZERO);
    }

    #[test]
    fn crawling_caps_speed_at_penalty() {
        let mut rig = Rig::new(TestTerrain::new().with_floor(0.0), Vec2::ZERO);
        rig.tick_in_place(&Intention::default());
        let crawl = Intention {
            movement: Vec2::new(1.0, -1.0),
            ..default()
        };
        for _ in 0..rig.stats.crouch_slowdown_frames * 2 {
            rig.tick_in_place(&crawl);
        }

        assert!(rig.controller.is_crouching());
        let cap = rig.stats.max_speed * rig.stats.crouch_speed_penalty;
        assert!((rig.controller.speed().x - cap).abs() < 1e-4);
    }

    #[test]
    fn sticky_feet_double_deceleration_until_input() {
        let mut rig = Rig::new(TestTerrain::new().with_floor(0.0), Vec2::ZERO);
        rig.tick_in_place(&Intention::default());

        rig.controller.set_velocity(Vec2::new(10.0, 0.0), Force::Burst);
        rig.tick_in_place(&Intention::default());
        let sticky = rig.stats.ground_deceleration * rig.stats.sticky_feet_multiplier * DT;
        assert_eq!(rig.controller.speed().x, 10.0 - sticky);

        rig.tick_in_place(&Intention {
            movement: Vec2::X,
            ..default()
        });
        rig.controller.set_velocity(Vec2::new(10.0, 0.0), Force::Burst);
        rig.tick_in_place(&Intention::default());
        assert_eq!(
            rig.controller.speed().x,
            10.0 - rig.stats.ground_deceleration * DT
        );
    }

    #[test]
    fn grounded_speed_follows_slope() {
        let stats = MovementStats::default();
        let mut controller = MovementController {
            grounded: true,
            ground_normal: Vec2::new(-0.6, 0.8),
            speed: Vec2::new(8.0, 0.0),
            ..default()
        };
        controller.handle_vertical(&stats, DT);
        assert!((controller.speed.y - (6.0 + stats.grounding_force)).abs() < 1e-4);

        controller.speed = Vec2::ZERO;
        controller.ground_normal = Vec2::Y;
        controller.handle_vertical(&stats, DT);
        assert_eq!(controller.speed.y, stats.grounding_force);
    }

    #[test]
    fn airborne_units_fall_toward_terminal_speed() {
        let mut rig = Rig::new(TestTerrain::new(), Vec2::ZERO);
        rig.tick_in_place(&Intention::default());
        assert_eq!(
            rig.controller.speed().y,
            -rig.stats.fall_acceleration * DT
        );

        for _ in 0..120 {
            rig.tick_in_place(&Intention::default());
        }
        assert_eq!(rig.controller.speed().y, -rig.stats.max_fall_speed);
    }
}
