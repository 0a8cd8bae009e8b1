//! Reading and writing `.lvl` level files.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use propeller_core::{LevelSnapshot, SnapshotError};
use propeller_world::{query, World};
use thiserror::Error;

/// Extension given to level files.
pub(crate) const LEVEL_EXTENSION: &str = "lvl";

/// Reasons a level file cannot be read or written.
#[derive(Debug, Error)]
pub(crate) enum LevelFileError {
    /// The file could not be read or written.
    #[error("could not access level file {}", .path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// The file is not a level description.
    #[error("level file {} is malformed", .path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: serde_json::Error,
    },
    /// The level cannot be saved in its current state.
    #[error(transparent)]
    Invalid(#[from] SnapshotError),
}

/// Reads the snapshot stored at the provided path.
///
/// Only the file syntax is checked here; the world validates the contents
/// when the snapshot is loaded.
pub(crate) fn read_level(path: &Path) -> Result<LevelSnapshot, LevelFileError> {
    let contents = fs::read_to_string(path).map_err(|source| LevelFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| LevelFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the world's level to the provided path.
///
/// Nothing is written when the level lacks a player or a door.
pub(crate) fn save_level(world: &World, path: &Path) -> Result<(), LevelFileError> {
    let snapshot = query::save_snapshot(world)?;
    write_level(path, &snapshot)
}

fn write_level(path: &Path, snapshot: &LevelSnapshot) -> Result<(), LevelFileError> {
    let json = serde_json::to_string_pretty(snapshot).map_err(|source| LevelFileError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| LevelFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Appends the level extension when the path has none.
pub(crate) fn with_level_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(LEVEL_EXTENSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propeller_core::{CellCoord, Command, EntityKind, Orientation};
    use propeller_world as world;

    fn place(world: &mut World, kind: EntityKind, column: u32, row: u32) {
        let mut events = Vec::new();
        world::apply(
            world,
            Command::PlaceEntity {
                kind,
                cell: CellCoord::new(column, row),
                orientation: Orientation::Deg90,
            },
            &mut events,
        );
    }

    #[test]
    fn saved_level_reads_back_identically() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("level.lvl");
        let mut world = World::new();
        place(&mut world, EntityKind::Player, 1, 2);
        place(&mut world, EntityKind::Door, 5, 2);
        place(&mut world, EntityKind::StandSpikes, 3, 4);

        save_level(&world, &path).expect("level saves");
        let snapshot = read_level(&path).expect("level reads");

        assert_eq!(snapshot, query::level_snapshot(&world));
        assert_eq!(snapshot.stand_spikes[0].degrees, Some(90));
    }

    #[test]
    fn incomplete_level_is_not_written() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("level.lvl");
        let mut world = World::new();
        place(&mut world, EntityKind::Player, 1, 2);

        let error = save_level(&world, &path).expect_err("door is required");

        assert!(matches!(
            error,
            LevelFileError::Invalid(SnapshotError::MissingDoor)
        ));
        assert!(!path.exists(), "no file is created for a rejected save");
    }

    #[test]
    fn missing_and_malformed_files_report_their_cause() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let missing = dir.path().join("missing.lvl");
        assert!(matches!(
            read_level(&missing),
            Err(LevelFileError::Io { .. })
        ));

        let garbage = dir.path().join("garbage.lvl");
        fs::write(&garbage, "{ not json").expect("write garbage");
        assert!(matches!(
            read_level(&garbage),
            Err(LevelFileError::Parse { .. })
        ));
    }

    #[test]
    fn background_key_is_optional() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("plain.lvl");
        fs::write(&path, r#"{"player": [[24, 96]], "door": [[48, 96]]}"#).expect("write level");

        let snapshot = read_level(&path).expect("level without RGB parses");
        assert_eq!(snapshot.background, None);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn extension_is_added_only_when_missing() {
        assert_eq!(
            with_level_extension(PathBuf::from("levels/first")),
            PathBuf::from("levels/first.lvl")
        );
        assert_eq!(
            with_level_extension(PathBuf::from("levels/first.json")),
            PathBuf::from("levels/first.json")
        );
    }
}
