#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure play-mode system that turns keyboard state into player commands.

use propeller_core::{Command, Event, PlayMode, PlayerAction};

/// Keyboard snapshot captured by the adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlsInput {
    /// Left arrow is held.
    pub left_held: bool,
    /// Right arrow is held.
    pub right_held: bool,
    /// Up arrow went down on this frame.
    pub jump_pressed: bool,
    /// Escape went down on this frame.
    pub exit_pressed: bool,
    /// Pause key went down on this frame.
    pub pause_pressed: bool,
}

/// Play-mode system translating held keys into run, stop and jump requests.
///
/// Run requests are emitted when the held direction changes or the level
/// restarts; holding both arrows favours running right.
#[derive(Debug, Clone, Default)]
pub struct Controls {
    play_mode: PlayMode,
    running: Option<PlayerAction>,
    paused: bool,
}

impl Controls {
    /// Creates a new controls system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Edit,
            running: None,
            paused: false,
        }
    }

    /// Reports whether the adapter should hold back simulation ticks.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Consumes world events and keyboard state to emit play commands.
    pub fn handle(&mut self, events: &[Event], input: ControlsInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => {
                    self.play_mode = *mode;
                    self.running = None;
                    self.paused = false;
                }
                // Restarts zero the player's velocity.
                Event::LevelRestarted { .. } => self.running = None,
                _ => {}
            }
        }

        if self.play_mode != PlayMode::Play {
            return;
        }

        if input.pause_pressed {
            self.paused = !self.paused;
        }

        if input.exit_pressed {
            out.push(Command::SetPlayMode {
                mode: PlayMode::Edit,
            });
            return;
        }

        if self.paused {
            return;
        }

        let wanted = if input.right_held {
            Some(PlayerAction::GoRight)
        } else if input.left_held {
            Some(PlayerAction::GoLeft)
        } else {
            None
        };
        if wanted != self.running {
            out.push(Command::Control {
                action: wanted.unwrap_or(PlayerAction::Stop),
            });
            self.running = wanted;
        }

        if input.jump_pressed {
            out.push(Command::Control {
                action: PlayerAction::Jump,
            });
        }
    }
}
