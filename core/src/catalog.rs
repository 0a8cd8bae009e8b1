//! Static metadata describing every object kind a level can contain.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of distinct [`EntityKind`] variants.
pub const ENTITY_KIND_COUNT: usize = 11;

/// Object types offered by the editor palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// The avatar controlled by the player.
    Player,
    /// Level exit that opens once every diamond is collected.
    Door,
    /// Solid terrain block.
    Wall,
    /// Invisible marker that turns patrolling enemies around.
    ReverseWall,
    /// Airborne enemy patrolling horizontally.
    Flyer,
    /// Walking enemy that can be stomped.
    SmilyRobot,
    /// Launch pad that bounces the player upwards.
    Spring,
    /// Collectible required to open the door.
    Diamond,
    /// Solid block that supports standing but vetoes jumping.
    StickyBlock,
    /// Ceiling spikes that drop once the player passes beneath.
    FallSpikes,
    /// Static spikes that can face any of the four directions.
    StandSpikes,
}

impl EntityKind {
    /// Every kind in palette order.
    pub const ALL: [EntityKind; ENTITY_KIND_COUNT] = [
        EntityKind::Player,
        EntityKind::Door,
        EntityKind::Wall,
        EntityKind::ReverseWall,
        EntityKind::Flyer,
        EntityKind::SmilyRobot,
        EntityKind::Spring,
        EntityKind::Diamond,
        EntityKind::StickyBlock,
        EntityKind::FallSpikes,
        EntityKind::StandSpikes,
    ];

    /// Dense index of the kind, usable to address per-kind arenas.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Key used for the kind in persisted level files.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Door => "door",
            Self::Wall => "wall",
            Self::ReverseWall => "reverse_wall",
            Self::Flyer => "flyer",
            Self::SmilyRobot => "smily_robot",
            Self::Spring => "spring",
            Self::Diamond => "diamonds",
            Self::StickyBlock => "sticky_block",
            Self::FallSpikes => "fall_spikes",
            Self::StandSpikes => "stand_spikes",
        }
    }

    /// Static behaviour flags for the kind.
    #[must_use]
    pub const fn traits(self) -> KindTraits {
        match self {
            Self::Player | Self::Door | Self::Spring | Self::ReverseWall => KindTraits::NONE,
            Self::Wall | Self::StickyBlock => KindTraits {
                solid: true,
                ..KindTraits::NONE
            },
            Self::Flyer | Self::SmilyRobot => KindTraits {
                hazard: true,
                patrols: true,
                ..KindTraits::NONE
            },
            Self::Diamond => KindTraits {
                collectible: true,
                ..KindTraits::NONE
            },
            Self::FallSpikes => KindTraits {
                hazard: true,
                ..KindTraits::NONE
            },
            Self::StandSpikes => KindTraits {
                hazard: true,
                orientable: true,
                ..KindTraits::NONE
            },
        }
    }

    /// How many instances of the kind a level may contain.
    #[must_use]
    pub const fn cardinality(self) -> Cardinality {
        match self {
            Self::Player | Self::Door => Cardinality::One,
            _ => Cardinality::Many,
        }
    }

    /// Reports whether the kind is limited to a single instance.
    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self.cardinality(), Cardinality::One)
    }

    /// Size of the kind's hitbox in pixels.
    ///
    /// Every kind fills one 24 pixel cell except the door, which stands two
    /// cells tall.
    #[must_use]
    pub const fn hitbox(self) -> HitboxSize {
        match self {
            Self::Door => HitboxSize::new(24, 48),
            _ => HitboxSize::new(24, 24),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a string names no known entity kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown entity kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == value)
            .ok_or_else(|| UnknownKind(value.to_owned()))
    }
}

/// Behaviour flags attached to an [`EntityKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KindTraits {
    /// Blocks the movement of the player and walking enemies.
    pub solid: bool,
    /// Kills the player on contact.
    pub hazard: bool,
    /// Increments the score when touched.
    pub collectible: bool,
    /// Moves back and forth on its own.
    pub patrols: bool,
    /// Supports 0/90/180/270 degree facing.
    pub orientable: bool,
}

impl KindTraits {
    const NONE: Self = Self {
        solid: false,
        hazard: false,
        collectible: false,
        patrols: false,
        orientable: false,
    };
}

/// Number of instances a level may hold for a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// At most one instance.
    One,
    /// Any number of instances.
    Many,
}

/// Width and height of a hitbox in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HitboxSize {
    width: u32,
    height: u32,
}

impl HitboxSize {
    /// Creates a new hitbox size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Facing of an orientable entity, measured counter-clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Spikes point up.
    #[default]
    Deg0,
    /// Spikes point left.
    Deg90,
    /// Spikes point down.
    Deg180,
    /// Spikes point right.
    Deg270,
}

impl Orientation {
    /// Angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Parses an exact right angle in the `0..360` range.
    #[must_use]
    pub const fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Normalises any multiple of 90 degrees, including negative angles.
    #[must_use]
    pub const fn from_any_degrees(degrees: i32) -> Option<Self> {
        Self::from_degrees(degrees.rem_euclid(360))
    }

    /// Orientation reached after one press of the palette's rotate button.
    ///
    /// The button subtracts a quarter turn, so the sequence runs
    /// 0 → 270 → 180 → 90 → 0.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg270,
            Self::Deg270 => Self::Deg180,
            Self::Deg180 => Self::Deg90,
            Self::Deg90 => Self::Deg0,
        }
    }
}
