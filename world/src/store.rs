//! Placed-level storage used while editing.

use std::collections::BTreeMap;

use propeller_core::{CellCoord, EntityKind, Orientation, PlacedEntity, PlacementError};

/// Entities placed on the grid, at most one per cell.
///
/// Players and doors are limited to one instance each; their cells are kept
/// in dedicated slots so lookups never scan the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelStore {
    cells: BTreeMap<CellCoord, PlacedEntity>,
    player: Option<CellCoord>,
    door: Option<CellCoord>,
}

impl LevelStore {
    /// Creates an empty level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an entity, evicting whatever occupied the cell.
    ///
    /// Returns the evicted entity. Placing a second player or door is
    /// rejected and leaves the store untouched.
    pub fn place(
        &mut self,
        kind: EntityKind,
        cell: CellCoord,
        orientation: Orientation,
    ) -> Result<Option<PlacedEntity>, PlacementError> {
        if self.singleton_slot(kind).is_some_and(|slot| slot.is_some()) {
            return Err(PlacementError::DuplicateSingleton { kind });
        }

        let entity = PlacedEntity::new(kind, cell, orientation);
        let evicted = self.cells.insert(cell, entity);
        if let Some(previous) = evicted {
            self.release_slot(previous);
        }
        if let Some(slot) = self.singleton_slot(kind) {
            *slot = Some(cell);
        }
        Ok(evicted)
    }

    /// Removes whatever occupies the cell; empty cells are a no-op.
    pub fn remove_at(&mut self, cell: CellCoord) -> Option<PlacedEntity> {
        let removed = self.cells.remove(&cell)?;
        self.release_slot(removed);
        Some(removed)
    }

    /// Removes every entity.
    pub fn clear_all(&mut self) {
        self.cells.clear();
        self.player = None;
        self.door = None;
    }

    /// Entity occupying the cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<&PlacedEntity> {
        self.cells.get(&cell)
    }

    /// Every entity, grouped by kind in palette order.
    pub fn entities(&self) -> impl Iterator<Item = &PlacedEntity> + '_ {
        EntityKind::ALL.into_iter().flat_map(move |kind| {
            self.cells
                .values()
                .filter(move |entity| entity.kind() == kind)
        })
    }

    /// Number of entities of the provided kind.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells
            .values()
            .filter(|entity| entity.kind() == kind)
            .count()
    }

    /// Total number of placed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the level is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The placed player, if any.
    #[must_use]
    pub fn player(&self) -> Option<&PlacedEntity> {
        self.player.and_then(|cell| self.cells.get(&cell))
    }

    /// The placed door, if any.
    #[must_use]
    pub fn door(&self) -> Option<&PlacedEntity> {
        self.door.and_then(|cell| self.cells.get(&cell))
    }

    fn singleton_slot(&mut self, kind: EntityKind) -> Option<&mut Option<CellCoord>> {
        match kind {
            EntityKind::Player => Some(&mut self.player),
            EntityKind::Door => Some(&mut self.door),
            _ => None,
        }
    }

    fn release_slot(&mut self, entity: PlacedEntity) {
        if let Some(slot) = self.singleton_slot(entity.kind()) {
            debug_assert_eq!(*slot, Some(entity.cell()));
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn second_player_is_rejected() {
        let mut store = LevelStore::new();
        let first = store.place(EntityKind::Player, CellCoord::new(1, 1), Orientation::Deg0);
        assert_eq!(first, Ok(None));

        let second = store.place(EntityKind::Player, CellCoord::new(4, 1), Orientation::Deg0);
        assert_eq!(
            second,
            Err(PlacementError::DuplicateSingleton {
                kind: EntityKind::Player
            })
        );
        assert_eq!(store.count(EntityKind::Player), 1);
        assert_eq!(
            store.player().map(PlacedEntity::cell),
            Some(CellCoord::new(1, 1))
        );
    }

    #[test]
    fn placing_over_an_entity_evicts_it() {
        let mut store = LevelStore::new();
        let cell = CellCoord::new(2, 3);
        let _ = store
            .place(EntityKind::Door, cell, Orientation::Deg0)
            .expect("door fits");

        let evicted = store
            .place(EntityKind::Wall, cell, Orientation::Deg0)
            .expect("walls are unlimited");

        assert_eq!(evicted.map(|entity| entity.kind()), Some(EntityKind::Door));
        assert!(store.door().is_none(), "evicting the door frees its slot");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn removing_the_player_frees_the_slot() {
        let mut store = LevelStore::new();
        let cell = CellCoord::new(0, 0);
        let _ = store
            .place(EntityKind::Player, cell, Orientation::Deg0)
            .expect("player fits");

        let removed = store.remove_at(cell);

        assert_eq!(removed.map(|entity| entity.kind()), Some(EntityKind::Player));
        assert!(store.player().is_none());
        assert!(store
            .place(EntityKind::Player, CellCoord::new(5, 5), Orientation::Deg0)
            .is_ok());
    }

    #[test]
    fn removing_an_empty_cell_is_a_no_op() {
        let mut store = LevelStore::new();
        assert_eq!(store.remove_at(CellCoord::new(3, 3)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn entities_are_grouped_by_kind() {
        let mut store = LevelStore::new();
        let _ = store
            .place(EntityKind::Wall, CellCoord::new(0, 0), Orientation::Deg0)
            .expect("wall");
        let _ = store
            .place(EntityKind::Player, CellCoord::new(9, 9), Orientation::Deg0)
            .expect("player");
        let _ = store
            .place(EntityKind::Wall, CellCoord::new(1, 0), Orientation::Deg0)
            .expect("wall");

        let kinds: Vec<_> = store.entities().map(PlacedEntity::kind).collect();
        assert_eq!(
            kinds,
            vec![EntityKind::Player, EntityKind::Wall, EntityKind::Wall]
        );
    }

    #[test]
    fn clear_all_empties_every_slot() {
        let mut store = LevelStore::new();
        let _ = store
            .place(EntityKind::Player, CellCoord::new(0, 0), Orientation::Deg0)
            .expect("player");
        let _ = store
            .place(EntityKind::Door, CellCoord::new(1, 0), Orientation::Deg0)
            .expect("door");

        store.clear_all();

        assert!(store.is_empty());
        assert!(store.player().is_none());
        assert!(store.door().is_none());
    }

    #[derive(Clone, Debug)]
    enum Edit {
        Place(EntityKind, CellCoord),
        Remove(CellCoord),
    }

    fn edit_strategy() -> impl Strategy<Value = Edit> {
        let cell = (0u32..4, 0u32..4).prop_map(|(column, row)| CellCoord::new(column, row));
        let kind = (0..EntityKind::ALL.len()).prop_map(|index| EntityKind::ALL[index]);
        prop_oneof![
            3 => (kind, cell.clone()).prop_map(|(kind, cell)| Edit::Place(kind, cell)),
            1 => cell.prop_map(Edit::Remove),
        ]
    }

    proptest! {
        #[test]
        fn singletons_never_exceed_one(edits in prop::collection::vec(edit_strategy(), 0..64)) {
            let mut store = LevelStore::new();
            for edit in edits {
                match edit {
                    Edit::Place(kind, cell) => {
                        let _ = store.place(kind, cell, Orientation::Deg0);
                    }
                    Edit::Remove(cell) => {
                        let _ = store.remove_at(cell);
                    }
                }
                prop_assert!(store.count(EntityKind::Player) <= 1);
                prop_assert!(store.count(EntityKind::Door) <= 1);
                prop_assert_eq!(store.player().is_some(), store.count(EntityKind::Player) == 1);
                prop_assert_eq!(store.door().is_some(), store.count(EntityKind::Door) == 1);
            }
        }
    }
}
