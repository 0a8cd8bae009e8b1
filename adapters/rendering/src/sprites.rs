//! Logical sprite names resolved by the backend's asset manifest.

use propeller_core::EntityKind;

/// Identifies every image the scene may ask the backend to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Player avatar.
    Player,
    /// Player avatar while the propeller spins.
    PlayerPropeller,
    /// Solid block.
    Wall,
    /// Solid block that vetoes jumping.
    StickyBlock,
    /// Patrol turn-around marker.
    ReverseWall,
    /// Flying enemy.
    Flyer,
    /// Walking enemy, first animation frame.
    SmilyRobot,
    /// Walking enemy, second animation frame.
    SmilyRobotStep,
    /// Exit before every diamond is collected.
    DoorClosed,
    /// Exit once every diamond is collected.
    DoorOpen,
    /// Collectible.
    Diamond,
    /// Launch pad.
    Spring,
    /// Ceiling spikes.
    FallSpikes,
    /// Floor spikes.
    StandSpikes,
    /// Placeholder shown where a palette entry is unavailable.
    BlankBox,
    /// Switch from edit to play.
    PlayButton,
    /// Switch from play back to edit.
    StopButton,
    /// Remove every placed entity.
    ClearButton,
    /// Show the help screen.
    InfoButton,
    /// Toggle the grid overlay.
    GridButton,
    /// Restart the running level.
    RestartButton,
    /// Cycle the background colour.
    ColorButton,
    /// Save the level.
    SaveButton,
    /// Load the level.
    LoadButton,
    /// Rotate the stand spikes palette entry.
    RotateButton,
}

impl SpriteKey {
    /// Every sprite key, in manifest order.
    pub const ALL: [SpriteKey; 25] = [
        SpriteKey::Player,
        SpriteKey::PlayerPropeller,
        SpriteKey::Wall,
        SpriteKey::StickyBlock,
        SpriteKey::ReverseWall,
        SpriteKey::Flyer,
        SpriteKey::SmilyRobot,
        SpriteKey::SmilyRobotStep,
        SpriteKey::DoorClosed,
        SpriteKey::DoorOpen,
        SpriteKey::Diamond,
        SpriteKey::Spring,
        SpriteKey::FallSpikes,
        SpriteKey::StandSpikes,
        SpriteKey::BlankBox,
        SpriteKey::PlayButton,
        SpriteKey::StopButton,
        SpriteKey::ClearButton,
        SpriteKey::InfoButton,
        SpriteKey::GridButton,
        SpriteKey::RestartButton,
        SpriteKey::ColorButton,
        SpriteKey::SaveButton,
        SpriteKey::LoadButton,
        SpriteKey::RotateButton,
    ];

    /// Name used for the sprite in asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Player => "spr_player",
            Self::PlayerPropeller => "spr_player_propeller",
            Self::Wall => "spr_wall",
            Self::StickyBlock => "spr_sticky_block",
            Self::ReverseWall => "spr_reverse_wall",
            Self::Flyer => "spr_flyer",
            Self::SmilyRobot => "spr_smily_robot",
            Self::SmilyRobotStep => "spr_smily_robot_2",
            Self::DoorClosed => "spr_door_closed",
            Self::DoorOpen => "spr_door_open",
            Self::Diamond => "spr_diamonds",
            Self::Spring => "spr_spring",
            Self::FallSpikes => "spr_fall_spikes",
            Self::StandSpikes => "spr_stand_spikes",
            Self::BlankBox => "spr_blank_box",
            Self::PlayButton => "spr_play_button",
            Self::StopButton => "spr_stop_button",
            Self::ClearButton => "spr_clear_button",
            Self::InfoButton => "spr_info_button",
            Self::GridButton => "spr_grid_button",
            Self::RestartButton => "spr_restart_button",
            Self::ColorButton => "spr_color_button",
            Self::SaveButton => "spr_save_file_button",
            Self::LoadButton => "spr_load_file_button",
            Self::RotateButton => "spr_rotate_button",
        }
    }

    /// Resolves a manifest name back into its key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Sprite drawn for a placed entity while editing.
    #[must_use]
    pub const fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Player => Self::Player,
            EntityKind::Wall => Self::Wall,
            EntityKind::StickyBlock => Self::StickyBlock,
            EntityKind::ReverseWall => Self::ReverseWall,
            EntityKind::Flyer => Self::Flyer,
            EntityKind::SmilyRobot => Self::SmilyRobot,
            EntityKind::Door => Self::DoorClosed,
            EntityKind::Diamond => Self::Diamond,
            EntityKind::Spring => Self::Spring,
            EntityKind::FallSpikes => Self::FallSpikes,
            EntityKind::StandSpikes => Self::StandSpikes,
        }
    }
}
