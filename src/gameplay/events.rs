//! Discrete state changes published for the presentation layer.
//!
//! The core only writes these; animation and audio read them once per frame.

use bevy::prelude::*;

/// Something observable happened to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum UnitEvent {
    /// Touched down (with the vertical speed at impact) or left the ground.
    GroundedChanged { grounded: bool, impact_speed: f32 },
    Jumped { wall_jump: bool },
    AirJumped,
    WallGrabChanged { grabbing: bool },
    /// Started mantling a ledge. The presentation layer answers with
    /// [`LedgeClimbMilestone`] messages.
    LedgeClimbChanged { into_crawl: bool },
    DashingChanged { dashing: bool, direction: Vec2 },
    Attacked,
    /// A held click was released.
    Clicked,
    AimingChanged { aiming: bool },
    Throwing { tripped: bool },
    Recovered,
    /// Picked a spear back up.
    ReclaimTriggered,
}

/// A [`UnitEvent`] tagged with the unit it happened to.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct UnitMessage {
    pub unit: Entity,
    pub event: UnitEvent,
}

/// Animation milestones of a ledge climb, sent back into the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum LedgeClimbStage {
    /// Move the body onto the ledge.
    Midpoint,
    /// Hand control back to the unit.
    Finished,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgeClimbMilestone {
    pub unit: Entity,
    pub stage: LedgeClimbStage,
}

pub(super) fn plugin(app: &mut App) {
    app.add_message::<UnitMessage>();
    app.add_message::<LedgeClimbMilestone>();
}
