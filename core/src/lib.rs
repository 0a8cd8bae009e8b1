#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Propeller level editor and platformer.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod catalog;
pub mod grid;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{Cardinality, EntityKind, HitboxSize, KindTraits, Orientation, UnknownKind};
pub use grid::{snap_to_grid, PixelPoint, Playfield, PlayfieldError};
pub use snapshot::{BackgroundColor, LevelSnapshot, SnapshotError, SnapshotPoint};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Propeller.";

/// Number of fixed simulation ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Describes the active gameplay mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayMode {
    /// Level editing: the palette places and removes entities.
    #[default]
    Edit,
    /// Physically simulated play of the current level.
    Play,
}

/// Movement requests issued to the player avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Run towards decreasing x.
    GoLeft,
    /// Run towards increasing x.
    GoRight,
    /// Stop running.
    Stop,
    /// Jump from the ground or fire the propeller in mid-air.
    Jump,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Requests placement of an entity at the provided cell.
    PlaceEntity {
        /// Kind of entity to place.
        kind: EntityKind,
        /// Cell receiving the entity.
        cell: CellCoord,
        /// Facing of the entity; ignored for kinds that cannot rotate.
        orientation: Orientation,
    },
    /// Requests removal of whatever occupies the provided cell.
    RemoveEntity {
        /// Cell to clear.
        cell: CellCoord,
    },
    /// Removes every placed entity.
    ClearLevel,
    /// Changes the colour painted behind the level.
    SetBackground {
        /// New background colour.
        color: BackgroundColor,
    },
    /// Replaces the current level with the provided snapshot.
    LoadLevel {
        /// Level contents to restore.
        snapshot: LevelSnapshot,
    },
    /// Advances the play simulation by a single fixed tick.
    Tick,
    /// Forwards a movement request to the player avatar.
    Control {
        /// Requested movement.
        action: PlayerAction,
    },
    /// Resets every play entity to its spawn state and counts a death.
    RestartLevel,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the play simulation advanced by one tick.
    TimeAdvanced {
        /// Number of ticks simulated since play mode was entered.
        tick: u64,
    },
    /// Announces that the world entered a new play mode.
    PlayModeChanged {
        /// Mode that became active after processing commands.
        mode: PlayMode,
    },
    /// Reports that a mode transition was refused.
    PlayModeRejected {
        /// Reason the transition failed.
        reason: ModeError,
    },
    /// Confirms that an entity was added to the level.
    EntityPlaced {
        /// Kind of the placed entity.
        kind: EntityKind,
        /// Cell the entity occupies.
        cell: CellCoord,
        /// Facing stored for the entity.
        orientation: Orientation,
    },
    /// Confirms that an entity was removed from the level.
    EntityRemoved {
        /// Kind of the removed entity.
        kind: EntityKind,
        /// Cell the entity occupied.
        cell: CellCoord,
    },
    /// Reports that a placement request was rejected.
    PlacementRejected {
        /// Kind the request attempted to place.
        kind: EntityKind,
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// Reports that a removal, clear or background edit was rejected.
    EditRejected {
        /// Reason the request failed.
        reason: PlacementError,
    },
    /// Confirms that every placed entity was removed.
    LevelCleared,
    /// Confirms that the background colour changed.
    BackgroundChanged {
        /// Colour now painted behind the level.
        color: BackgroundColor,
    },
    /// Confirms that a snapshot replaced the current level.
    LevelLoaded {
        /// Number of entities the level now contains.
        entities: usize,
    },
    /// Reports that a snapshot was rejected; the previous level is untouched.
    LevelLoadRejected {
        /// Reason the snapshot failed validation.
        reason: SnapshotError,
    },
    /// Reports that the player left the ground or fired the propeller.
    Jumped {
        /// Kind of jump performed.
        kind: JumpKind,
    },
    /// Reports that a sticky block swallowed a jump request.
    JumpVetoed,
    /// Reports that the player bounced off a spring.
    SpringBounced,
    /// Reports that the player stomped a walking robot.
    RobotStomped,
    /// Reports that ceiling spikes started to fall.
    FallSpikesTriggered,
    /// Reports that a diamond was collected.
    DiamondCollected {
        /// Diamonds collected since the level (re)started.
        score: u32,
        /// Diamonds present in the level.
        total: u32,
    },
    /// Reports that the last diamond was collected and the door is open.
    DoorOpened,
    /// Reports that the player died.
    PlayerDied {
        /// What killed the player.
        cause: DeathCause,
    },
    /// Confirms that the level restarted after a death or a restart request.
    LevelRestarted {
        /// Deaths counted during the current play session.
        deaths: u32,
    },
    /// Reports that the player reached the open door.
    LevelWon {
        /// Deaths counted before the level was beaten.
        deaths: u32,
    },
}

/// Distinguishes ground jumps from mid-air propeller boosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpKind {
    /// Launch from solid ground.
    Ground,
    /// Mid-air boost that engages the propeller.
    Propeller,
}

/// Hazards that end a play attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Touched a flyer.
    Flyer,
    /// Walked into a robot without stomping it.
    SmilyRobot,
    /// Touched standing spikes.
    StandSpikes,
    /// Touched ceiling spikes.
    FallSpikes,
    /// Fell below the bottom of the screen.
    FellOffScreen,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Entity stored in the level while editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlacedEntity {
    kind: EntityKind,
    cell: CellCoord,
    orientation: Orientation,
}

impl PlacedEntity {
    /// Creates a placed entity, discarding the orientation of kinds that cannot rotate.
    #[must_use]
    pub const fn new(kind: EntityKind, cell: CellCoord, orientation: Orientation) -> Self {
        let orientation = if kind.traits().orientable {
            orientation
        } else {
            Orientation::Deg0
        };
        Self {
            kind,
            cell,
            orientation,
        }
    }

    /// Kind of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Cell the entity occupies.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Facing of the entity.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}

/// Reasons an edit request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// A single-instance kind is already present in the level.
    #[error("the level already contains a {kind}")]
    DuplicateSingleton {
        /// Kind that is already present.
        kind: EntityKind,
    },
    /// The targeted cell lies outside the playfield.
    #[error("the cell lies outside the playfield")]
    OutsidePlayfield,
    /// The world is not in edit mode.
    #[error("levels can only be edited in edit mode")]
    InvalidMode,
}

/// Reasons a mode transition may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ModeError {
    /// Play mode needs a player to control.
    #[error("place a player before starting the level")]
    MissingPlayer,
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, DeathCause, EntityKind, ModeError, Orientation, PlacedEntity, PlacementError,
        PlayMode,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn placed_entity_round_trips_through_bincode() {
        let entity = PlacedEntity::new(
            EntityKind::StandSpikes,
            CellCoord::new(3, 9),
            Orientation::Deg270,
        );
        assert_round_trip(&entity);
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::DuplicateSingleton {
            kind: EntityKind::Door,
        });
    }

    #[test]
    fn mode_and_death_cause_round_trip_through_bincode() {
        assert_round_trip(&PlayMode::Play);
        assert_round_trip(&ModeError::MissingPlayer);
        assert_round_trip(&DeathCause::FellOffScreen);
    }

    #[test]
    fn non_orientable_kinds_drop_their_orientation() {
        let wall = PlacedEntity::new(EntityKind::Wall, CellCoord::new(0, 0), Orientation::Deg90);
        assert_eq!(wall.orientation(), Orientation::Deg0);

        let spikes = PlacedEntity::new(
            EntityKind::StandSpikes,
            CellCoord::new(0, 0),
            Orientation::Deg90,
        );
        assert_eq!(spikes.orientation(), Orientation::Deg90);
    }

    #[test]
    fn duplicate_singleton_message_names_the_kind() {
        let error = PlacementError::DuplicateSingleton {
            kind: EntityKind::Player,
        };
        assert_eq!(error.to_string(), "the level already contains a player");
    }
}
