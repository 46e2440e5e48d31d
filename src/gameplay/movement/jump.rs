//! Jumping, dashing and the one-shot actions.

use bevy::prelude::*;

use super::controller::MovementController;
use super::probe::CollisionProbe;
use crate::config::MovementStats;
use crate::gameplay::events::UnitEvent;

impl MovementController {
    // === Jump ===

    pub(super) fn handle_jump<P: CollisionProbe>(&mut self, stats: &MovementStats, probe: &P) {
        if !self.has_control {
            self.jump_to_consume = false;
            return;
        }

        if !self.ended_jump_early && !self.grounded && !self.jump_held && self.body_velocity.y > 0.0
        {
            self.ended_jump_early = true;
        }

        if !self.jump_to_consume && !self.has_buffered_jump(stats) {
            return;
        }

        if self.can_wall_jump(stats) {
            self.wall_jump(stats);
        } else if self.grounded || self.on_ladder || self.can_use_coyote(stats) {
            self.normal_jump(stats, probe);
        } else if self.jump_to_consume && !self.grounded && self.air_jumps_remaining > 0 {
            self.air_jump(stats);
        }

        self.jump_to_consume = false;
    }

    fn normal_jump<P: CollisionProbe>(&mut self, stats: &MovementStats, probe: &P) {
        if self.crouching && !self.try_toggle_crouching(false, stats, probe) {
            return;
        }

        self.ended_jump_early = false;
        self.frame_jump_pressed = None;
        self.buffered_jump_usable = false;
        self.coyote_usable = false;
        self.toggle_climbing_ladder(false, stats);
        self.speed.y = stats.jump_power;
        self.events.push(UnitEvent::Jumped { wall_jump: false });
    }

    fn wall_jump(&mut self, stats: &MovementStats) {
        self.ended_jump_early = false;
        self.buffered_jump_usable = false;
        if self.on_wall {
            self.is_leaving_wall = true;
            self.reset_wall_shimmy();
        }
        self.wall_coyote_usable = false;
        self.wall_jump_input_multiplier = 0.0;
        self.speed = stats.wall_jump_power * Vec2::new(-f32::from(self.last_wall_direction), 1.0);
        self.events.push(UnitEvent::Jumped { wall_jump: true });
    }

    fn air_jump(&mut self, stats: &MovementStats) {
        self.ended_jump_early = false;
        self.air_jumps_remaining -= 1;
        self.speed.y = stats.jump_power;
        self.external_velocity.y = 0.0;
        self.events.push(UnitEvent::AirJumped);
    }

    /// Re-arm every jump window after touching down.
    pub(super) fn reset_jump(&mut self, stats: &MovementStats) {
        self.coyote_usable = true;
        self.buffered_jump_usable = true;
        self.ended_jump_early = false;
        self.reset_air_jumps(stats);
    }

    pub(super) const fn reset_air_jumps(&mut self, stats: &MovementStats) {
        self.air_jumps_remaining = stats.max_air_jumps;
    }

    fn can_wall_jump(&self, stats: &MovementStats) -> bool {
        (self.on_wall && !self.is_leaving_wall)
            || (self.wall_coyote_usable
                && self
                    .frame_left_wall
                    .is_some_and(|left| self.frame < left + stats.wall_jump_coyote_frames))
    }

    fn has_buffered_jump(&self, stats: &MovementStats) -> bool {
        self.buffered_jump_usable
            && self
                .frame_jump_pressed
                .is_some_and(|pressed| self.frame < pressed + stats.jump_buffer_frames)
    }

    fn can_use_coyote(&self, stats: &MovementStats) -> bool {
        self.coyote_usable
            && !self.grounded
            && self
                .frame_left_grounded
                .is_some_and(|left| self.frame < left + stats.coyote_frames)
    }

    // === Dash ===

    pub(super) fn handle_dash(&mut self, stats: &MovementStats) {
        if !self.has_control {
            self.dash_to_consume = false;
            return;
        }

        if self.dash_to_consume && self.can_dash && !self.crouching {
            let direction = Vec2::new(self.input.x, self.input.y.max(0.0)).normalize_or_zero();
            if direction == Vec2::ZERO {
                self.dash_to_consume = false;
                return;
            }

            self.dash_velocity = direction * stats.dash_velocity;
            self.dashing = true;
            self.can_dash = false;
            self.frame_started_dash = self.frame;
            self.external_velocity = Vec2::ZERO;
            self.events.push(UnitEvent::DashingChanged {
                dashing: true,
                direction,
            });
        }

        if self.dashing {
            self.speed = self.dash_velocity;
            if self.frame > self.frame_started_dash + stats.dash_duration_frames {
                self.dashing = false;
                self.events.push(UnitEvent::DashingChanged {
                    dashing: false,
                    direction: Vec2::ZERO,
                });
                self.speed.y = self.speed.y.min(0.0);
                self.speed.x *= stats.dash_end_horizontal_multiplier;
                if self.grounded {
                    self.can_dash = true;
                }
            }
        }

        self.dash_to_consume = false;
    }

    // === Attack ===

    pub(super) fn handle_attacking(&mut self, stats: &MovementStats) {
        if !self.has_control {
            self.attack_to_consume = false;
            return;
        }

        if self.attack_to_consume
            && self
                .frame_last_attacked
                .is_none_or(|last| self.frame > last + stats.attack_cooldown_frames)
        {
            self.frame_last_attacked = Some(self.frame);
            self.events.push(UnitEvent::Attacked);
        }
        self.attack_to_consume = false;
    }

    pub(super) fn handle_clicking(&mut self) {
        if self.click_was_held && !self.click_held {
            self.events.push(UnitEvent::Clicked);
        }
        self.click_was_held = self.click_held;
    }
}
