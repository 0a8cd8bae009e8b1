//! Wire representation of a persisted level.
//!
//! A snapshot maps every entity kind key to an ordered list of pixel
//! positions. Stand spikes carry their orientation as a third component and
//! the background colour is stored under the `RGB` key.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::EntityKind;

/// Background colour used when a level does not specify one.
pub const DEFAULT_BACKGROUND: BackgroundColor = BackgroundColor::from_rgb(160, 160, 160);

/// Colour painted behind the playfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct BackgroundColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl BackgroundColor {
    /// Creates a new background colour from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the colour.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the colour.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the colour.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        DEFAULT_BACKGROUND
    }
}

impl From<[u8; 3]> for BackgroundColor {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self::from_rgb(red, green, blue)
    }
}

impl From<BackgroundColor> for [u8; 3] {
    fn from(color: BackgroundColor) -> Self {
        [color.red, color.green, color.blue]
    }
}

/// Single persisted position, optionally carrying an orientation in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct SnapshotPoint {
    /// Horizontal pixel coordinate of the entity's top-left corner.
    pub x: i32,
    /// Vertical pixel coordinate of the entity's top-left corner.
    pub y: i32,
    /// Orientation in degrees, present only for orientable kinds.
    pub degrees: Option<i32>,
}

impl SnapshotPoint {
    /// Creates a position without orientation.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            degrees: None,
        }
    }

    /// Creates a position carrying an orientation.
    #[must_use]
    pub const fn oriented(x: i32, y: i32, degrees: i32) -> Self {
        Self {
            x,
            y,
            degrees: Some(degrees),
        }
    }
}

/// Error raised when a persisted position has the wrong arity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("expected [x, y] or [x, y, degrees], found {0} components")]
pub struct PointArityError(pub usize);

impl TryFrom<Vec<i32>> for SnapshotPoint {
    type Error = PointArityError;

    fn try_from(components: Vec<i32>) -> Result<Self, Self::Error> {
        match components.as_slice() {
            &[x, y] => Ok(Self::new(x, y)),
            &[x, y, degrees] => Ok(Self::oriented(x, y, degrees)),
            other => Err(PointArityError(other.len())),
        }
    }
}

impl From<SnapshotPoint> for Vec<i32> {
    fn from(point: SnapshotPoint) -> Self {
        match point.degrees {
            Some(degrees) => vec![point.x, point.y, degrees],
            None => vec![point.x, point.y],
        }
    }
}

/// Flat, mode-independent description of a level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Player spawn position; at most one entry.
    pub player: Vec<SnapshotPoint>,
    /// Door position; at most one entry.
    pub door: Vec<SnapshotPoint>,
    /// Solid terrain blocks.
    #[serde(default)]
    pub wall: Vec<SnapshotPoint>,
    /// Patrol turn-around markers.
    #[serde(default)]
    pub reverse_wall: Vec<SnapshotPoint>,
    /// Flying enemies.
    #[serde(default)]
    pub flyer: Vec<SnapshotPoint>,
    /// Walking enemies.
    #[serde(default)]
    pub smily_robot: Vec<SnapshotPoint>,
    /// Launch pads.
    #[serde(default)]
    pub spring: Vec<SnapshotPoint>,
    /// Collectibles.
    #[serde(default)]
    pub diamonds: Vec<SnapshotPoint>,
    /// Blocks that veto jumping.
    #[serde(default)]
    pub sticky_block: Vec<SnapshotPoint>,
    /// Ceiling spikes.
    #[serde(default)]
    pub fall_spikes: Vec<SnapshotPoint>,
    /// Oriented floor spikes.
    #[serde(default)]
    pub stand_spikes: Vec<SnapshotPoint>,
    /// Optional background colour.
    #[serde(rename = "RGB", default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundColor>,
}

impl LevelSnapshot {
    /// Positions recorded for the provided kind.
    #[must_use]
    pub fn points(&self, kind: EntityKind) -> &[SnapshotPoint] {
        match kind {
            EntityKind::Player => &self.player,
            EntityKind::Door => &self.door,
            EntityKind::Wall => &self.wall,
            EntityKind::ReverseWall => &self.reverse_wall,
            EntityKind::Flyer => &self.flyer,
            EntityKind::SmilyRobot => &self.smily_robot,
            EntityKind::Spring => &self.spring,
            EntityKind::Diamond => &self.diamonds,
            EntityKind::StickyBlock => &self.sticky_block,
            EntityKind::FallSpikes => &self.fall_spikes,
            EntityKind::StandSpikes => &self.stand_spikes,
        }
    }

    /// Mutable access to the positions recorded for the provided kind.
    pub fn points_mut(&mut self, kind: EntityKind) -> &mut Vec<SnapshotPoint> {
        match kind {
            EntityKind::Player => &mut self.player,
            EntityKind::Door => &mut self.door,
            EntityKind::Wall => &mut self.wall,
            EntityKind::ReverseWall => &mut self.reverse_wall,
            EntityKind::Flyer => &mut self.flyer,
            EntityKind::SmilyRobot => &mut self.smily_robot,
            EntityKind::Spring => &mut self.spring,
            EntityKind::Diamond => &mut self.diamonds,
            EntityKind::StickyBlock => &mut self.sticky_block,
            EntityKind::FallSpikes => &mut self.fall_spikes,
            EntityKind::StandSpikes => &mut self.stand_spikes,
        }
    }

    /// Iterates over every recorded position in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &SnapshotPoint)> + '_ {
        EntityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.points(kind).iter().map(move |point| (kind, point)))
    }

    /// Total number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        EntityKind::ALL
            .into_iter()
            .map(|kind| self.points(kind).len())
            .sum()
    }

    /// Reports whether the snapshot records no entities at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reasons a level snapshot cannot be saved or restored.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Saving requires a player.
    #[error("the level has no player")]
    MissingPlayer,
    /// Saving requires a door.
    #[error("the level has no door")]
    MissingDoor,
    /// A single-instance kind lists more than one position.
    #[error("`{kind}` lists {count} positions but allows at most one")]
    TooManySingletons {
        /// Offending kind.
        kind: EntityKind,
        /// Number of positions found.
        count: usize,
    },
    /// A position is not the corner of a grid cell.
    #[error("`{kind}` at ({x}, {y}) is not aligned to the grid")]
    Misaligned {
        /// Offending kind.
        kind: EntityKind,
        /// Horizontal pixel coordinate.
        x: i32,
        /// Vertical pixel coordinate.
        y: i32,
    },
    /// A position lies outside the playfield.
    #[error("`{kind}` at ({x}, {y}) lies outside the playfield")]
    OutOfBounds {
        /// Offending kind.
        kind: EntityKind,
        /// Horizontal pixel coordinate.
        x: i32,
        /// Vertical pixel coordinate.
        y: i32,
    },
    /// An orientation is not one of 0, 90, 180 or 270 degrees.
    #[error("{degrees} degrees is not a supported orientation")]
    InvalidOrientation {
        /// Angle found in the snapshot.
        degrees: i32,
    },
    /// An orientation was attached to a kind that cannot rotate.
    #[error("`{kind}` does not support an orientation")]
    UnexpectedOrientation {
        /// Offending kind.
        kind: EntityKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_accept_pairs_and_triples() {
        assert_eq!(
            SnapshotPoint::try_from(vec![24, 48]),
            Ok(SnapshotPoint::new(24, 48))
        );
        assert_eq!(
            SnapshotPoint::try_from(vec![24, 48, 90]),
            Ok(SnapshotPoint::oriented(24, 48, 90))
        );
        assert_eq!(SnapshotPoint::try_from(vec![1]), Err(PointArityError(1)));
    }

    #[test]
    fn iter_visits_kinds_in_palette_order() {
        let snapshot = LevelSnapshot {
            player: vec![SnapshotPoint::new(0, 48)],
            door: vec![SnapshotPoint::new(48, 48)],
            wall: vec![SnapshotPoint::new(0, 72), SnapshotPoint::new(24, 72)],
            ..LevelSnapshot::default()
        };
        let kinds: Vec<_> = snapshot.iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::Player,
                EntityKind::Door,
                EntityKind::Wall,
                EntityKind::Wall
            ]
        );
        assert_eq!(snapshot.len(), 4);
    }

    #[test]
    fn background_defaults_to_grey() {
        assert_eq!(
            BackgroundColor::default(),
            BackgroundColor::from_rgb(160, 160, 160)
        );
    }
}
