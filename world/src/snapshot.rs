//! Conversion between the level store and its persisted snapshot.

use propeller_core::{
    BackgroundColor, EntityKind, LevelSnapshot, Orientation, PixelPoint, Playfield, SnapshotError,
    SnapshotPoint,
};

use crate::store::LevelStore;

/// Describes the store as pixel positions grouped by kind.
#[must_use]
pub(crate) fn capture(
    store: &LevelStore,
    playfield: &Playfield,
    background: BackgroundColor,
) -> LevelSnapshot {
    let mut snapshot = LevelSnapshot {
        background: Some(background),
        ..LevelSnapshot::default()
    };
    for entity in store.entities() {
        let origin = playfield.cell_origin(entity.cell());
        let point = if entity.kind().traits().orientable {
            SnapshotPoint::oriented(
                origin.x,
                origin.y,
                i32::from(entity.orientation().degrees()),
            )
        } else {
            SnapshotPoint::new(origin.x, origin.y)
        };
        snapshot.points_mut(entity.kind()).push(point);
    }
    snapshot
}

/// Captures the store for saving; levels need a player and a door.
pub(crate) fn capture_for_save(
    store: &LevelStore,
    playfield: &Playfield,
    background: BackgroundColor,
) -> Result<LevelSnapshot, SnapshotError> {
    if store.player().is_none() {
        return Err(SnapshotError::MissingPlayer);
    }
    if store.door().is_none() {
        return Err(SnapshotError::MissingDoor);
    }
    Ok(capture(store, playfield, background))
}

/// Validates a snapshot and builds a fresh store from it.
///
/// Nothing is returned unless every entry is valid, so callers can swap the
/// result in without ever exposing a half-loaded level.
pub(crate) fn restore(
    snapshot: &LevelSnapshot,
    playfield: &Playfield,
) -> Result<(LevelStore, BackgroundColor), SnapshotError> {
    for kind in [EntityKind::Player, EntityKind::Door] {
        let count = snapshot.points(kind).len();
        if count > 1 {
            return Err(SnapshotError::TooManySingletons { kind, count });
        }
    }

    let mut store = LevelStore::new();
    for (kind, point) in snapshot.iter() {
        let orientation = orientation_of(kind, point)?;
        let pixel = PixelPoint::new(point.x, point.y);
        let cell = match playfield.cell_from_origin(pixel) {
            Some(cell) => cell,
            None if playfield.contains(pixel) => {
                return Err(SnapshotError::Misaligned {
                    kind,
                    x: point.x,
                    y: point.y,
                })
            }
            None => {
                return Err(SnapshotError::OutOfBounds {
                    kind,
                    x: point.x,
                    y: point.y,
                })
            }
        };
        // Singleton counts were checked above, so placement cannot fail.
        let _ = store
            .place(kind, cell, orientation)
            .map_err(|_| SnapshotError::TooManySingletons { kind, count: 2 })?;
    }

    Ok((store, snapshot.background.unwrap_or_default()))
}

fn orientation_of(kind: EntityKind, point: &SnapshotPoint) -> Result<Orientation, SnapshotError> {
    match point.degrees {
        None => Ok(Orientation::Deg0),
        Some(_) if !kind.traits().orientable => Err(SnapshotError::UnexpectedOrientation { kind }),
        Some(degrees) => Orientation::from_any_degrees(degrees)
            .ok_or(SnapshotError::InvalidOrientation { degrees }),
    }
}
