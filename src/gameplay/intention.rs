//! Per-tick movement intention and the human input adapter that produces it.

use bevy::prelude::*;

use super::Player;
use crate::GameSet;
use crate::config::MovementStats;

// === Components ===

/// What a unit wants to do this tick.
///
/// Written once per frame by either the keyboard adapter or the behavior
/// engine. Press flags latch until the next fixed movement tick consumes them,
/// so a press between two ticks is never lost.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Intention {
    pub movement: Vec2,
    pub jump_pressed: bool,
    pub jump_held: bool,
    pub drop_pressed: bool,
    pub dash_pressed: bool,
    pub attack_pressed: bool,
    pub click_held: bool,
    /// Overrides the archetype's max run speed.
    pub speed_cap: Option<f32>,
}

impl Intention {
    /// Replace the held state with `next` while keeping presses that have
    /// not been consumed yet.
    pub fn absorb(&mut self, next: Self) {
        *self = Self {
            jump_pressed: self.jump_pressed || next.jump_pressed,
            drop_pressed: self.drop_pressed || next.drop_pressed,
            dash_pressed: self.dash_pressed || next.dash_pressed,
            attack_pressed: self.attack_pressed || next.attack_pressed,
            ..next
        };
    }

    /// Forget one-shot presses once a movement tick has seen them.
    pub const fn clear_presses(&mut self) {
        self.jump_pressed = false;
        self.drop_pressed = false;
        self.dash_pressed = false;
        self.attack_pressed = false;
    }
}

/// Snap an axis to -1, 0 or 1 around a deadzone.
#[must_use]
pub fn snap_axis(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        0.0
    } else {
        value.signum()
    }
}

/// Apply the archetype's deadzone handling to a raw stick or key vector.
#[must_use]
pub fn condition_input(raw: Vec2, stats: &MovementStats) -> Vec2 {
    if stats.snap_input {
        Vec2::new(
            snap_axis(raw.x, stats.horizontal_deadzone),
            snap_axis(raw.y, stats.vertical_deadzone),
        )
    } else {
        raw
    }
}

// === Systems ===

fn axis(keyboard: &ButtonInput<KeyCode>, negative: [KeyCode; 2], positive: [KeyCode; 2]) -> f32 {
    let mut value = 0.0;
    if keyboard.any_pressed(negative) {
        value -= 1.0;
    }
    if keyboard.any_pressed(positive) {
        value += 1.0;
    }
    value
}

/// Reads keyboard and mouse state into the player's [`Intention`].
/// Runs in `GameSet::Input`.
fn gather_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut players: Query<(&MovementStats, &mut Intention), With<Player>>,
) {
    let raw = Vec2::new(
        axis(
            &keyboard,
            [KeyCode::KeyA, KeyCode::ArrowLeft],
            [KeyCode::KeyD, KeyCode::ArrowRight],
        ),
        axis(
            &keyboard,
            [KeyCode::KeyS, KeyCode::ArrowDown],
            [KeyCode::KeyW, KeyCode::ArrowUp],
        ),
    );
    let click_held = mouse.is_some_and(|mouse| mouse.pressed(MouseButton::Left));

    for (stats, mut intention) in &mut players {
        intention.absorb(Intention {
            movement: condition_input(raw, stats),
            jump_pressed: keyboard.just_pressed(KeyCode::Space),
            jump_held: keyboard.pressed(KeyCode::Space),
            drop_pressed: keyboard.just_pressed(KeyCode::KeyC),
            dash_pressed: keyboard.just_pressed(KeyCode::ShiftLeft),
            attack_pressed: keyboard.just_pressed(KeyCode::KeyJ),
            click_held,
            speed_cap: None,
        });
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Intention>();
    app.add_systems(Update, gather_player_input.in_set(GameSet::Input));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absorb_keeps_unconsumed_presses() {
        let mut intention = Intention {
            jump_pressed: true,
            ..default()
        };
        intention.absorb(Intention {
            movement: Vec2::X,
            jump_held: true,
            ..default()
        });

        assert!(intention.jump_pressed);
        assert!(intention.jump_held);
        assert_eq!(intention.movement, Vec2::X);
    }

    #[test]
    fn absorb_replaces_held_state() {
        let mut intention = Intention {
            movement: Vec2::NEG_X,
            jump_held: true,
            click_held: true,
            speed_cap: Some(3.0),
            ..default()
        };
        intention.absorb(Intention::default());

        assert_eq!(intention, Intention::default());
    }

    #[test]
    fn clear_presses_leaves_held_state() {
        let mut intention = Intention {
            movement: Vec2::Y,
            jump_pressed: true,
            jump_held: true,
            dash_pressed: true,
            attack_pressed: true,
            drop_pressed: true,
            ..default()
        };
        intention.clear_presses();

        assert_eq!(
            intention,
            Intention {
                movement: Vec2::Y,
                jump_held: true,
                ..default()
            }
        );
    }

    #[test]
    fn snapping_respects_deadzones() {
        let stats = MovementStats::default();
        assert_eq!(
            condition_input(Vec2::new(0.05, 0.2), &stats),
            Vec2::ZERO
        );
        assert_eq!(
            condition_input(Vec2::new(0.4, -0.8), &stats),
            Vec2::new(1.0, -1.0)
        );
    }

    #[test]
    fn unsnapped_input_passes_through() {
        let stats = MovementStats {
            snap_input: false,
            ..default()
        };
        assert_eq!(
            condition_input(Vec2::new(0.05, 0.2), &stats),
            Vec2::new(0.05, 0.2)
        );
    }

    #[test]
    fn keyboard_adapter_fills_player_intention() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<ButtonInput<KeyCode>>();
        app.add_systems(Update, gather_player_input);

        let player = app
            .world_mut()
            .spawn((Player, MovementStats::default(), Intention::default()))
            .id();

        {
            let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keyboard.press(KeyCode::KeyD);
            keyboard.press(KeyCode::Space);
        }
        app.update();

        let intention = app.world().get::<Intention>(player).unwrap();
        assert_eq!(intention.movement, Vec2::X);
        assert!(intention.jump_pressed);
        assert!(intention.jump_held);
        assert!(!intention.click_held);
    }
}
