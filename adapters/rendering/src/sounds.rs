//! Audio cues derived from world events.

use propeller_core::{Event, JumpKind, PlayMode};

/// Identifies every sound the backend may be asked to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// Propeller boost in mid-air.
    Propeller,
    /// Bounce off a spring.
    Spring,
    /// Looping music while playing.
    PlayMusic,
    /// Looping music while editing.
    EditMusic,
}

impl SoundKey {
    /// Name used for the sound in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Propeller => "snd_propeller",
            Self::Spring => "snd_spring",
            Self::PlayMusic => "snd_play_music",
            Self::EditMusic => "snd_edit_music",
        }
    }

    /// Reports whether the cue loops until replaced.
    #[must_use]
    pub const fn is_music(self) -> bool {
        matches!(self, Self::PlayMusic | Self::EditMusic)
    }
}

/// Sound cue announcing the event, if it has one.
#[must_use]
pub fn sound_for_event(event: &Event) -> Option<SoundKey> {
    match event {
        Event::Jumped {
            kind: JumpKind::Propeller,
        } => Some(SoundKey::Propeller),
        Event::SpringBounced => Some(SoundKey::Spring),
        Event::PlayModeChanged {
            mode: PlayMode::Play,
        } => Some(SoundKey::PlayMusic),
        Event::PlayModeChanged {
            mode: PlayMode::Edit,
        } => Some(SoundKey::EditMusic),
        _ => None,
    }
}
