//! The unit movement state machine.
//!
//! One [`MovementController`] per unit, advanced once per fixed tick. Each
//! tick runs a fixed sequence of stages; later stages may overwrite state an
//! earlier one set. Timing windows are measured in ticks and stored as the
//! tick on which something happened.

use bevy::prelude::*;

use super::integrate::{move_towards_vec, smooth_damp};
use super::probe::{CollisionProbe, Overlap, ProbeHit};
use crate::config::MovementStats;
use crate::gameplay::events::UnitEvent;
use crate::gameplay::intention::Intention;
use crate::third_party::CollisionLayer;

/// Length of the three rays that locate a ledge corner.
const LEDGE_RAY_LENGTH: f32 = 0.5;

// === Types ===

/// Physics state of the body as seen at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KinematicBody {
    /// Feet position (bottom center of the body).
    pub position: Vec2,
    pub velocity: Vec2,
}

/// What one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// Velocity the body should carry until the next tick.
    pub velocity: Vec2,
    /// Set when the controller moved the body directly (ledges, ladders).
    pub position: Option<Vec2>,
    pub events: Vec<UnitEvent>,
}

/// Which velocity component an outside force feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Force {
    /// The directly controlled speed.
    Burst,
    /// External velocity that decays back to zero on its own.
    Decay,
}

/// The authoritative vertical mode, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum VerticalMode {
    Ladder,
    Grounded,
    Wall,
    Airborne,
}

/// Probe results gathered at the start of a tick.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Contacts {
    pub ground: Option<ProbeHit>,
    pub ceiling: bool,
    /// Upward normal of another unit directly underfoot.
    pub bounce: Option<Vec2>,
    pub hitting_wall: bool,
    pub wall: Option<Overlap>,
    pub ladder: Option<Overlap>,
    pub on_one_way: bool,
}

// === Controller ===

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct MovementController {
    pub(super) frame: u32,
    pub(super) position: Vec2,
    /// Velocity the physics body reported at the start of the tick.
    pub(super) body_velocity: Vec2,
    pub(super) velocity: Vec2,
    pub(super) speed: Vec2,
    pub(super) external_velocity: Vec2,
    pub(super) has_control: bool,
    #[reflect(ignore)]
    pub(super) contacts: Contacts,

    // Latched input
    pub(super) input: Vec2,
    pub(super) jump_held: bool,
    pub(super) speed_cap: Option<f32>,
    pub(super) jump_to_consume: bool,
    pub(super) drop_requested: bool,
    pub(super) dash_to_consume: bool,
    pub(super) attack_to_consume: bool,
    pub(super) click_held: bool,
    pub(super) click_was_held: bool,

    // Ground
    /// Ground contact. Stays set on a ladder mounted from the floor; the
    /// ladder wins in [`MovementController::mode`].
    pub(super) grounded: bool,
    pub(super) ground_normal: Vec2,
    pub(super) frame_left_grounded: Option<u32>,
    pub(super) sticky_feet: bool,
    pub(super) dropping_until: Option<u32>,

    // Jump
    pub(super) frame_jump_pressed: Option<u32>,
    pub(super) buffered_jump_usable: bool,
    pub(super) coyote_usable: bool,
    pub(super) ended_jump_early: bool,
    pub(super) air_jumps_remaining: u32,

    // Walls
    pub(super) on_wall: bool,
    pub(super) wall_direction: i8,
    pub(super) last_wall_direction: i8,
    pub(super) is_leaving_wall: bool,
    pub(super) frame_left_wall: Option<u32>,
    pub(super) wall_coyote_usable: bool,
    pub(super) wall_jump_input_multiplier: f32,
    pub(super) can_shimmy: bool,
    pub(super) shimmying: bool,

    // Ledges
    pub(super) grabbing_ledge: bool,
    pub(super) climbing_ledge: bool,
    pub(super) climb_into_crawl: bool,
    pub(super) ledge_climb_target: Option<Vec2>,
    pub(super) pending_teleport: Option<Vec2>,

    // Ladders
    pub(super) on_ladder: bool,
    pub(super) ladder_snap_velocity: f32,
    pub(super) frame_left_ladder: Option<u32>,

    // Crouch
    pub(super) crouching: bool,
    pub(super) frame_started_crouching: u32,

    // Dash
    pub(super) can_dash: bool,
    pub(super) dashing: bool,
    pub(super) dash_velocity: Vec2,
    pub(super) frame_started_dash: u32,

    // Attack
    pub(super) frame_last_attacked: Option<u32>,

    #[reflect(ignore)]
    pub(super) events: Vec<UnitEvent>,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            frame: 0,
            position: Vec2::ZERO,
            body_velocity: Vec2::ZERO,
            velocity: Vec2::ZERO,
            speed: Vec2::ZERO,
            external_velocity: Vec2::ZERO,
            has_control: true,
            contacts: Contacts::default(),
            input: Vec2::ZERO,
            jump_held: false,
            speed_cap: None,
            jump_to_consume: false,
            drop_requested: false,
            dash_to_consume: false,
            attack_to_consume: false,
            click_held: false,
            click_was_held: false,
            grounded: false,
            ground_normal: Vec2::Y,
            frame_left_grounded: None,
            sticky_feet: false,
            dropping_until: None,
            frame_jump_pressed: None,
            buffered_jump_usable: false,
            coyote_usable: false,
            ended_jump_early: false,
            air_jumps_remaining: 0,
            on_wall: false,
            wall_direction: 0,
            last_wall_direction: 0,
            is_leaving_wall: false,
            frame_left_wall: None,
            wall_coyote_usable: false,
            wall_jump_input_multiplier: 1.0,
            can_shimmy: true,
            shimmying: false,
            grabbing_ledge: false,
            climbing_ledge: false,
            climb_into_crawl: false,
            ledge_climb_target: None,
            pending_teleport: None,
            on_ladder: false,
            ladder_snap_velocity: 0.0,
            frame_left_ladder: None,
            crouching: false,
            frame_started_crouching: 0,
            can_dash: true,
            dashing: false,
            dash_velocity: Vec2::ZERO,
            frame_started_dash: 0,
            frame_last_attacked: None,
            events: Vec::new(),
        }
    }
}

impl MovementController {
    /// Advance one fixed tick.
    pub fn tick<P: CollisionProbe>(
        &mut self,
        body: KinematicBody,
        intention: &Intention,
        stats: &MovementStats,
        probe: &P,
        dt: f32,
    ) -> TickOutcome {
        self.frame += 1;
        self.position = self.pending_teleport.take().unwrap_or(body.position);
        self.body_velocity = body.velocity;
        self.latch(intention, stats);

        self.contacts = self.check_collisions(stats, probe);
        self.handle_collisions(stats);
        self.handle_walls(stats);
        self.handle_ledges(stats, probe, dt);
        self.handle_ladders(stats, dt);
        self.handle_crouching(stats, probe);
        self.handle_jump(stats, probe);
        self.handle_dash(stats);
        self.handle_attacking(stats);
        self.handle_clicking();
        self.handle_horizontal(stats, dt);
        self.handle_vertical(stats, dt);
        self.apply_movement(stats, dt);

        TickOutcome {
            velocity: self.velocity,
            position: (self.position != body.position).then_some(self.position),
            events: std::mem::take(&mut self.events),
        }
    }

    fn latch(&mut self, intention: &Intention, stats: &MovementStats) {
        self.input = intention.movement;
        self.jump_held = intention.jump_held;
        self.speed_cap = intention.speed_cap;
        self.click_held = intention.click_held;

        if intention.drop_pressed {
            self.drop_requested = true;
        } else if !self.is_dropping() && intention.jump_pressed {
            self.jump_to_consume = true;
            self.frame_jump_pressed = Some(self.frame);
        }

        if self.horizontal_input_pressed(stats) {
            self.sticky_feet = false;
        }
        if intention.dash_pressed && stats.allow_dash {
            self.dash_to_consume = true;
        }
        if intention.attack_pressed && stats.allow_attacks {
            self.attack_to_consume = true;
        }
    }

    // === Collisions ===

    fn check_collisions<P: CollisionProbe>(&self, stats: &MovementStats, probe: &P) -> Contacts {
        let size = self.body_size(stats);
        let half = size / 2.0;
        let center = self.position + Vec2::Y * half.y;
        let vertical_cast = Vec2::new((half.x - stats.skin_width).max(0.0), half.y);
        let ground_mask = if self.is_dropping() {
            CollisionLayer::solid()
        } else {
            CollisionLayer::walkable()
        };

        let ground = probe
            .cast_shape(center, vertical_cast, Dir2::NEG_Y, stats.grounder_distance, ground_mask)
            .filter(|hit| hit.normal.y > 0.0);
        let ceiling = probe
            .cast_shape(
                center,
                vertical_cast,
                Dir2::Y,
                stats.grounder_distance,
                CollisionLayer::solid(),
            )
            .is_some();
        let bounce = probe
            .cast_shape(
                center,
                vertical_cast,
                Dir2::NEG_Y,
                stats.grounder_distance,
                CollisionLayer::Unit.into(),
            )
            .map(|hit| hit.normal)
            .filter(|normal| normal.y > 0.0);
        let on_one_way = ground.is_some()
            && probe
                .cast_shape(
                    center,
                    vertical_cast,
                    Dir2::NEG_Y,
                    stats.grounder_distance,
                    CollisionLayer::OneWay.into(),
                )
                .is_some();

        let hitting_wall = Dir2::new(Vec2::new(self.input.x, 0.0)).is_ok_and(|direction| {
            probe
                .cast_shape(
                    center,
                    Vec2::new(half.x, (half.y - stats.skin_width).max(0.0)),
                    direction,
                    stats.grounder_distance,
                    CollisionLayer::solid(),
                )
                .is_some()
        });

        // The detector stays at standing height so crouching mid-air cannot
        // find walls.
        let detector_center = self.position + Vec2::Y * stats.standing_size.y / 2.0;
        let detector_half = stats.wall_detector_size / 2.0;
        let wall = stats
            .allow_walls
            .then(|| {
                probe.overlap_box(
                    detector_center,
                    detector_half,
                    CollisionLayer::Climbable.into(),
                )
            })
            .flatten();
        let ladder = stats
            .allow_ladders
            .then(|| {
                probe.overlap_box(detector_center, detector_half, CollisionLayer::Ladder.into())
            })
            .flatten();

        Contacts {
            ground,
            ceiling,
            bounce,
            hitting_wall,
            wall,
            ladder,
            on_one_way,
        }
    }

    fn handle_collisions(&mut self, stats: &MovementStats) {
        if let Some(normal) = self.contacts.bounce {
            self.external_velocity = normal * stats.jump_power;
        }

        if self.contacts.ceiling {
            self.external_velocity.y = self.external_velocity.y.min(0.0);
            self.speed.y = self.speed.y.min(0.0);
        }

        if std::mem::take(&mut self.drop_requested) && self.contacts.on_one_way {
            self.dropping_until = Some(self.frame + stats.drop_through_frames);
        }

        match (self.grounded, self.contacts.ground) {
            (false, Some(_)) => {
                self.grounded = true;
                if !self.dashing {
                    self.can_dash = true;
                }
                self.reset_jump(stats);
                self.events.push(UnitEvent::GroundedChanged {
                    grounded: true,
                    impact_speed: self.speed.y.abs(),
                });
                if !self.horizontal_input_pressed(stats) {
                    self.sticky_feet = true;
                }
            }
            (true, None) => {
                self.grounded = false;
                self.frame_left_grounded = Some(self.frame);
                self.events.push(UnitEvent::GroundedChanged {
                    grounded: false,
                    impact_speed: 0.0,
                });
            }
            _ => {}
        }

        if let Some(ground) = self.contacts.ground {
            self.ground_normal = ground.normal;
        }
    }

    /// Whether a body of `size` with its feet at `feet` fits in the world.
    pub(super) fn pose_clear<P: CollisionProbe>(
        feet: Vec2,
        size: Vec2,
        stats: &MovementStats,
        probe: &P,
    ) -> bool {
        let half = (size / 2.0 - Vec2::splat(stats.skin_width)).max(Vec2::ZERO);
        probe
            .overlap_box(feet + Vec2::Y * size.y / 2.0, half, CollisionLayer::walkable())
            .is_none()
    }

    // === Walls ===

    fn handle_walls(&mut self, stats: &MovementStats) {
        if !stats.allow_walls {
            return;
        }

        self.wall_jump_input_multiplier = super::integrate::move_towards(
            self.wall_jump_input_multiplier,
            1.0,
            1.0 / stats.wall_jump_input_loss_frames as f32,
        );

        self.wall_direction = self.contacts.wall.map_or(0, |wall| {
            let offset = wall.center.x - self.position.x;
            if offset > 0.0 {
                1
            } else if offset < 0.0 {
                -1
            } else {
                0
            }
        });
        if self.wall_direction != 0 {
            self.last_wall_direction = self.wall_direction;
        }

        let should_stick = self.wall_direction != 0
            && !self.grounded
            && !self.on_ladder
            && (!stats.require_input_push || self.pushing_into_wall(stats));

        if !self.on_wall && should_stick {
            self.toggle_on_wall(true, stats);
        } else if self.on_wall && !should_stick {
            self.toggle_on_wall(false, stats);
        }
    }

    pub(super) fn pushing_into_wall(&self, stats: &MovementStats) -> bool {
        self.horizontal_input_pressed(stats)
            && self.wall_direction != 0
            && self.input.x.signum() == f32::from(self.wall_direction)
    }

    pub(super) fn toggle_on_wall(&mut self, on: bool, stats: &MovementStats) {
        self.on_wall = on;
        if on {
            self.speed = Vec2::ZERO;
            self.external_velocity = Vec2::ZERO;
            self.buffered_jump_usable = true;
            self.wall_coyote_usable = true;
        } else {
            self.frame_left_wall = Some(self.frame);
            self.is_leaving_wall = false;
            self.grabbing_ledge = false;
            self.reset_wall_shimmy();
        }
        self.reset_air_jumps(stats);
        self.events.push(UnitEvent::WallGrabChanged { grabbing: on });
    }

    pub(super) const fn reset_wall_shimmy(&mut self) {
        self.can_shimmy = true;
        self.shimmying = false;
    }

    // === Ledges ===

    fn handle_ledges<P: CollisionProbe>(&mut self, stats: &MovementStats, probe: &P, dt: f32) {
        if !stats.allow_ledges || self.climbing_ledge || !self.on_wall {
            return;
        }

        let Some(corner) = self.find_ledge_corner(stats, probe) else {
            self.grabbing_ledge = false;
            return;
        };
        self.grabbing_ledge = true;

        let facing = Vec2::new(f32::from(self.wall_direction), 1.0);
        let hang_position = corner - stats.ledge_grab_point * facing;

        if !self.horizontal_input_pressed(stats) && self.has_control {
            self.position = move_towards_vec(
                self.position,
                hang_position,
                stats.ledge_grab_deceleration * dt,
            );
        }

        let wants_climb = self.input.y > stats.vertical_deadzone
            || (self.horizontal_input_pressed(stats) && self.pushing_into_wall(stats));
        if !wants_climb {
            return;
        }

        let target = corner + stats.stand_up_offset * facing;
        if Self::pose_clear(target, stats.standing_size, stats, probe) {
            self.start_ledge_climb(hang_position, target, false);
        } else if stats.allow_crouch && Self::pose_clear(target, stats.crouching_size, stats, probe)
        {
            self.start_ledge_climb(hang_position, target, true);
        }
    }

    /// Locate the corner of the ledge in front of the unit, if one is within
    /// reach of its hands.
    fn find_ledge_corner<P: CollisionProbe>(&self, stats: &MovementStats, probe: &P) -> Option<Vec2> {
        let toward_wall = if self.wall_direction > 0 {
            Dir2::X
        } else {
            Dir2::NEG_X
        };
        let climbable = CollisionLayer::Climbable.into();
        let grab_height = self.position + Vec2::Y * stats.ledge_grab_point.y;
        let spacing = stats.ledge_raycast_spacing;

        // Below the lip the wall must be there, above it must not.
        let face = probe.cast_ray(
            grab_height - Vec2::Y * spacing,
            toward_wall,
            LEDGE_RAY_LENGTH,
            climbable,
        )?;
        if probe
            .cast_ray(
                grab_height + Vec2::Y * spacing,
                toward_wall,
                LEDGE_RAY_LENGTH,
                climbable,
            )
            .is_some()
        {
            return None;
        }
        let top = probe.cast_ray(
            grab_height + Vec2::new(f32::from(self.wall_direction) * 0.5, spacing),
            Dir2::NEG_Y,
            LEDGE_RAY_LENGTH,
            climbable,
        )?;

        Some(Vec2::new(face.point.x, top.point.y))
    }

    fn start_ledge_climb(&mut self, hang_position: Vec2, target: Vec2, into_crawl: bool) {
        self.events.push(UnitEvent::LedgeClimbChanged { into_crawl });
        self.take_away_control();
        self.climbing_ledge = true;
        self.grabbing_ledge = false;
        self.climb_into_crawl = into_crawl;
        self.ledge_climb_target = Some(target);
        self.position = hang_position;
    }

    /// Animation midpoint of a ledge climb: move onto the ledge.
    pub fn teleport_mid_ledge_climb(&mut self, stats: &MovementStats) {
        let Some(target) = self.ledge_climb_target else {
            return;
        };
        self.position = target;
        self.pending_teleport = Some(target);
        if self.climb_into_crawl && !self.crouching {
            self.crouching = true;
            self.frame_started_crouching = self.frame;
        }
        if self.on_wall {
            self.toggle_on_wall(false, stats);
        }
    }

    /// Animation end of a ledge climb: hand control back.
    pub fn finish_climbing_ledge(&mut self) {
        if !self.climbing_ledge {
            return;
        }
        self.climbing_ledge = false;
        self.ledge_climb_target = None;
        self.return_control();
    }

    // === Ladders ===

    fn handle_ladders(&mut self, stats: &MovementStats, dt: f32) {
        if !stats.allow_ladders {
            return;
        }

        let deadzone = stats.vertical_deadzone;
        let can_enter = self.contacts.ladder.is_some()
            && self
                .frame_left_ladder
                .is_none_or(|left| self.frame > left + stats.ladder_cooldown_frames);
        let should_mount = stats.auto_attach_to_ladders
            || self.input.y > deadzone
            || (!self.grounded && self.input.y < -deadzone);
        let should_dismount =
            !stats.auto_attach_to_ladders && self.grounded && self.input.y < -deadzone;

        if !self.on_ladder && can_enter && should_mount {
            self.toggle_climbing_ladder(true, stats);
        } else if self.on_ladder && (self.contacts.ladder.is_none() || should_dismount) {
            self.toggle_climbing_ladder(false, stats);
        }

        let Some(ladder) = self.contacts.ladder else {
            return;
        };
        if self.on_ladder
            && stats.snap_to_ladders
            && !self.horizontal_input_pressed(stats)
            && self.has_control
        {
            self.position.x = smooth_damp(
                self.position.x,
                ladder.center.x,
                &mut self.ladder_snap_velocity,
                stats.ladder_snap_time,
                dt,
            );
        }
    }

    pub(super) fn toggle_climbing_ladder(&mut self, on: bool, stats: &MovementStats) {
        if self.on_ladder == on {
            return;
        }
        if on {
            self.speed = Vec2::ZERO;
            self.ladder_snap_velocity = 0.0;
            if self.on_wall {
                self.toggle_on_wall(false, stats);
            }
        } else {
            if self.contacts.ladder.is_some() {
                self.frame_left_ladder = Some(self.frame);
            }
            if self.input.y > 0.0 {
                self.speed.y += stats.ladder_pop_force;
            }
        }
        self.on_ladder = on;
        self.reset_air_jumps(stats);
    }

    // === Crouching ===

    fn handle_crouching<P: CollisionProbe>(&mut self, stats: &MovementStats, probe: &P) {
        if !stats.allow_crouch {
            return;
        }

        let crouch_held = self.input.y < -stats.vertical_deadzone;
        if !self.crouching && crouch_held && self.grounded && !self.on_ladder {
            self.try_toggle_crouching(true, stats, probe);
        } else if self.crouching && (!crouch_held || !self.grounded) {
            self.try_toggle_crouching(false, stats, probe);
        }
    }

    /// Returns false when standing up is blocked by a low ceiling.
    pub(super) fn try_toggle_crouching<P: CollisionProbe>(
        &mut self,
        crouch: bool,
        stats: &MovementStats,
        probe: &P,
    ) -> bool {
        if self.crouching && !self.can_stand(stats, probe) {
            return false;
        }
        self.crouching = crouch;
        if crouch {
            self.frame_started_crouching = self.frame;
        }
        true
    }

    fn can_stand<P: CollisionProbe>(&self, stats: &MovementStats, probe: &P) -> bool {
        Self::pose_clear(
            self.position + Vec2::Y * stats.crouch_buffer_check,
            stats.standing_size,
            stats,
            probe,
        )
    }

    // === Outside control ===

    /// Add velocity from outside the state machine.
    pub fn apply_velocity(&mut self, velocity: Vec2, force: Force) {
        match force {
            Force::Burst => self.speed += velocity,
            Force::Decay => self.external_velocity += velocity,
        }
    }

    /// Overwrite one velocity component from outside the state machine.
    pub fn set_velocity(&mut self, velocity: Vec2, force: Force) {
        match force {
            Force::Burst => self.speed = velocity,
            Force::Decay => self.external_velocity = velocity,
        }
    }

    /// Freeze the body; velocity integration stops until control returns.
    pub fn take_away_control(&mut self) {
        self.velocity = Vec2::ZERO;
        self.has_control = false;
    }

    pub fn return_control(&mut self) {
        self.speed = Vec2::ZERO;
        self.has_control = true;
    }

    // === Queries ===

    pub(super) fn horizontal_input_pressed(&self, stats: &MovementStats) -> bool {
        self.input.x.abs() > stats.horizontal_deadzone
    }

    /// Size of the current pose.
    #[must_use]
    pub fn body_size(&self, stats: &MovementStats) -> Vec2 {
        if self.crouching {
            stats.crouching_size
        } else {
            stats.standing_size
        }
    }

    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Directly controlled speed.
    #[must_use]
    pub const fn speed(&self) -> Vec2 {
        self.speed
    }

    #[must_use]
    pub const fn external_velocity(&self) -> Vec2 {
        self.external_velocity
    }

    /// Velocity handed to the body on the last tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[must_use]
    pub const fn input(&self) -> Vec2 {
        self.input
    }

    /// -1 or 1 while a climbable wall is beside the unit, else 0.
    #[must_use]
    pub const fn wall_direction(&self) -> i8 {
        self.wall_direction
    }

    #[must_use]
    pub const fn ground_normal(&self) -> Vec2 {
        self.ground_normal
    }

    /// Authoritative vertical mode. Ladder beats ground, ground beats wall.
    /// A wall grab never coexists with ground contact or a ladder.
    #[must_use]
    pub fn mode(&self) -> VerticalMode {
        if self.on_ladder {
            VerticalMode::Ladder
        } else if self.grounded {
            VerticalMode::Grounded
        } else if self.on_wall {
            VerticalMode::Wall
        } else {
            VerticalMode::Airborne
        }
    }

    /// Standing on ground and not on a ladder.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.mode() == VerticalMode::Grounded
    }

    #[must_use]
    pub fn is_on_wall(&self) -> bool {
        self.mode() == VerticalMode::Wall
    }

    #[must_use]
    pub const fn is_climbing_ladder(&self) -> bool {
        self.on_ladder
    }

    #[must_use]
    pub const fn is_crouching(&self) -> bool {
        self.crouching
    }

    #[must_use]
    pub const fn is_dashing(&self) -> bool {
        self.dashing
    }

    #[must_use]
    pub const fn is_grabbing_ledge(&self) -> bool {
        self.grabbing_ledge
    }

    #[must_use]
    pub const fn is_climbing_ledge(&self) -> bool {
        self.climbing_ledge
    }

    #[must_use]
    pub const fn has_control(&self) -> bool {
        self.has_control
    }

    #[must_use]
    pub const fn air_jumps_remaining(&self) -> u32 {
        self.air_jumps_remaining
    }

    /// Falling through one-way platforms.
    #[must_use]
    pub fn is_dropping(&self) -> bool {
        self.dropping_until.is_some_and(|until| self.frame < until)
    }
}
