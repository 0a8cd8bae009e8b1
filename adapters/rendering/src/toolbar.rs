//! Buttons and palette entries laid out in the band above the playfield.

use glam::Vec2;
use propeller_core::{EntityKind, PlayMode};

use crate::SpriteKey;

/// Request raised by clicking a toolbar button or palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Switch between edit and play.
    TogglePlay,
    /// Remove every placed entity.
    Clear,
    /// Show or hide the grid overlay.
    ToggleGrid,
    /// Restart the running level.
    Restart,
    /// Advance to the next background colour.
    CycleBackground,
    /// Save the level to disk.
    Save,
    /// Load the level from disk.
    Load,
    /// Show or hide the help screen.
    Info,
    /// Rotate the stand spikes palette entry.
    Rotate,
    /// Pick a palette entry.
    Select(EntityKind),
}

impl UiAction {
    /// Reports whether the action responds in the provided mode.
    #[must_use]
    pub const fn available_in(self, mode: PlayMode) -> bool {
        match self {
            Self::TogglePlay | Self::Info => true,
            Self::Restart => matches!(mode, PlayMode::Play),
            _ => matches!(mode, PlayMode::Edit),
        }
    }
}

/// Clickable rectangle in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolbarButton {
    /// Action raised when the button is clicked.
    pub action: UiAction,
    /// Top-left corner of the button.
    pub origin: Vec2,
    /// Width and height of the button.
    pub size: Vec2,
}

impl ToolbarButton {
    /// Creates a new toolbar button.
    #[must_use]
    pub const fn new(action: UiAction, origin: Vec2, size: Vec2) -> Self {
        Self {
            action,
            origin,
            size,
        }
    }

    /// Reports whether the cursor lies over the button.
    #[must_use]
    pub fn contains(&self, cursor: Vec2) -> bool {
        let end = self.origin + self.size;
        cursor.x >= self.origin.x && cursor.x < end.x && cursor.y >= self.origin.y && cursor.y < end.y
    }

    /// Sprite drawn for the button in the provided mode.
    #[must_use]
    pub const fn sprite(&self, mode: PlayMode) -> SpriteKey {
        match self.action {
            UiAction::TogglePlay => match mode {
                PlayMode::Edit => SpriteKey::PlayButton,
                PlayMode::Play => SpriteKey::StopButton,
            },
            UiAction::Clear => SpriteKey::ClearButton,
            UiAction::ToggleGrid => SpriteKey::GridButton,
            UiAction::Restart => SpriteKey::RestartButton,
            UiAction::CycleBackground => SpriteKey::ColorButton,
            UiAction::Save => SpriteKey::SaveButton,
            UiAction::Load => SpriteKey::LoadButton,
            UiAction::Info => SpriteKey::InfoButton,
            UiAction::Rotate => SpriteKey::RotateButton,
            UiAction::Select(kind) => SpriteKey::for_kind(kind),
        }
    }
}

const BUTTON_SIZE: Vec2 = Vec2::new(24.0, 24.0);
const MODE_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 32.0);
const DOOR_ICON_SIZE: Vec2 = Vec2::new(24.0, 40.0);

/// Buttons anchored to the right edge, as offsets from the screen width.
const RIGHT_ANCHORED: [(UiAction, f32, f32); 9] = [
    (UiAction::TogglePlay, 50.0, 8.0),
    (UiAction::Clear, 115.0, 10.0),
    (UiAction::ToggleGrid, 150.0, 10.0),
    (UiAction::Restart, 175.0, 10.0),
    (UiAction::CycleBackground, 195.0, 10.0),
    (UiAction::Save, 230.0, 10.0),
    (UiAction::Load, 265.0, 10.0),
    (UiAction::Info, 320.0, 10.0),
    (UiAction::Rotate, 590.0, 7.0),
];

const PALETTE: [(EntityKind, f32, f32); 11] = [
    (EntityKind::Player, 10.0, 4.0),
    (EntityKind::Wall, 40.0, 12.0),
    (EntityKind::StickyBlock, 70.0, 12.0),
    (EntityKind::ReverseWall, 102.0, 12.0),
    (EntityKind::Flyer, 130.0, 12.0),
    (EntityKind::SmilyRobot, 162.0, 12.0),
    (EntityKind::Door, 195.0, 2.0),
    (EntityKind::Diamond, 225.0, 14.0),
    (EntityKind::Spring, 255.0, 12.0),
    (EntityKind::FallSpikes, 290.0, 12.0),
    (EntityKind::StandSpikes, 320.0, 12.0),
];

/// Layout of every toolbar button and palette entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Toolbar {
    buttons: Vec<ToolbarButton>,
}

impl Toolbar {
    /// Lays out the toolbar for a screen of the provided width.
    #[must_use]
    pub fn new(screen_width: f32) -> Self {
        let palette = PALETTE.into_iter().map(|(kind, x, y)| {
            let size = if kind == EntityKind::Door {
                DOOR_ICON_SIZE
            } else {
                BUTTON_SIZE
            };
            ToolbarButton::new(UiAction::Select(kind), Vec2::new(x, y), size)
        });
        let anchored = RIGHT_ANCHORED.into_iter().map(|(action, offset, y)| {
            let size = if action == UiAction::TogglePlay {
                MODE_BUTTON_SIZE
            } else {
                BUTTON_SIZE
            };
            ToolbarButton::new(action, Vec2::new(screen_width - offset, y), size)
        });
        Self {
            buttons: palette.chain(anchored).collect(),
        }
    }

    /// Every button, palette entries first.
    #[must_use]
    pub fn buttons(&self) -> &[ToolbarButton] {
        &self.buttons
    }

    /// Buttons that respond in the provided mode.
    pub fn visible(&self, mode: PlayMode) -> impl Iterator<Item = &ToolbarButton> + '_ {
        self.buttons
            .iter()
            .filter(move |button| button.action.available_in(mode))
    }

    /// Action under the cursor, honouring which buttons respond in the mode.
    #[must_use]
    pub fn hit_test(&self, cursor: Vec2, mode: PlayMode) -> Option<UiAction> {
        self.visible(mode)
            .find(|button| button.contains(cursor))
            .map(|button| button.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_anchored_buttons_follow_screen_width() {
        let toolbar = Toolbar::new(1024.0);
        assert_eq!(
            toolbar.hit_test(Vec2::new(980.0, 20.0), PlayMode::Edit),
            Some(UiAction::TogglePlay)
        );
        assert_eq!(
            toolbar.hit_test(Vec2::new(910.0, 15.0), PlayMode::Edit),
            Some(UiAction::Clear)
        );
        assert_eq!(
            toolbar.hit_test(Vec2::new(440.0, 15.0), PlayMode::Edit),
            Some(UiAction::Rotate)
        );
    }

    #[test]
    fn palette_entries_select_their_kind() {
        let toolbar = Toolbar::new(1024.0);
        assert_eq!(
            toolbar.hit_test(Vec2::new(12.0, 6.0), PlayMode::Edit),
            Some(UiAction::Select(EntityKind::Player))
        );
        assert_eq!(
            toolbar.hit_test(Vec2::new(200.0, 40.0), PlayMode::Edit),
            Some(UiAction::Select(EntityKind::Door)),
            "the door icon is taller than the other entries"
        );
    }

    #[test]
    fn play_mode_only_offers_stop_restart_and_info() {
        let toolbar = Toolbar::new(1024.0);
        let actions: Vec<_> = toolbar
            .visible(PlayMode::Play)
            .map(|button| button.action)
            .collect();
        assert_eq!(
            actions,
            vec![UiAction::TogglePlay, UiAction::Restart, UiAction::Info]
        );
        assert_eq!(
            toolbar.hit_test(Vec2::new(12.0, 6.0), PlayMode::Play),
            None,
            "palette is inert while playing"
        );
        assert_eq!(
            toolbar.hit_test(Vec2::new(855.0, 15.0), PlayMode::Edit),
            None,
            "restart is inert while editing"
        );
    }

    #[test]
    fn mode_button_sprite_tracks_mode() {
        let toolbar = Toolbar::new(1024.0);
        let toggle = toolbar
            .buttons()
            .iter()
            .find(|button| button.action == UiAction::TogglePlay)
            .expect("mode button exists");
        assert_eq!(toggle.sprite(PlayMode::Edit), SpriteKey::PlayButton);
        assert_eq!(toggle.sprite(PlayMode::Play), SpriteKey::StopButton);
    }

    #[test]
    fn clicks_in_the_gap_hit_nothing() {
        let toolbar = Toolbar::new(1024.0);
        assert_eq!(toolbar.hit_test(Vec2::new(500.0, 30.0), PlayMode::Edit), None);
    }
}
