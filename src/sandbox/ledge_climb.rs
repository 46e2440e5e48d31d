//! Stand-in for a ledge-climb animation: answers the start of a climb with
//! the midpoint and finish milestones the movement core waits for.

use bevy::prelude::*;

use crate::gameplay::events::{LedgeClimbMilestone, LedgeClimbStage, UnitEvent, UnitMessage};

/// Seconds from the start of a climb until the body moves onto the ledge.
const MIDPOINT_SECS: f32 = 0.2;

/// Seconds from the start of a climb until control returns.
const FINISH_SECS: f32 = 0.4;

/// A climb animation in progress.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LedgeClimbClip {
    elapsed: f32,
    midpoint_sent: bool,
}

fn start_clips(mut commands: Commands, mut messages: MessageReader<UnitMessage>) {
    for message in messages.read() {
        if matches!(message.event, UnitEvent::LedgeClimbChanged { .. }) {
            commands.entity(message.unit).insert(LedgeClimbClip {
                elapsed: 0.0,
                midpoint_sent: false,
            });
        }
    }
}

fn play_clips(
    time: Res<Time>,
    mut commands: Commands,
    mut clips: Query<(Entity, &mut LedgeClimbClip)>,
    mut milestones: MessageWriter<LedgeClimbMilestone>,
) {
    for (unit, mut clip) in &mut clips {
        clip.elapsed += time.delta_secs();
        if !clip.midpoint_sent && clip.elapsed >= MIDPOINT_SECS {
            clip.midpoint_sent = true;
            milestones.write(LedgeClimbMilestone {
                unit,
                stage: LedgeClimbStage::Midpoint,
            });
        }
        if clip.elapsed >= FINISH_SECS {
            milestones.write(LedgeClimbMilestone {
                unit,
                stage: LedgeClimbStage::Finished,
            });
            commands.entity(unit).remove::<LedgeClimbClip>();
        }
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<LedgeClimbClip>();
    app.add_systems(Update, (start_clips, play_clips).chain());
}
