#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure edit-mode system responsible for emitting placement and removal commands.

use propeller_core::{CellCoord, Command, EntityKind, Event, Orientation, PlayMode};

/// Ghost of the selected palette entry drawn under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Kind of entity proposed for placement.
    pub kind: EntityKind,
    /// Cell the entity would occupy.
    pub cell: CellCoord,
    /// Facing the entity would receive.
    pub orientation: Orientation,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(kind: EntityKind, cell: CellCoord, orientation: Orientation) -> Self {
        Self {
            kind,
            cell,
            orientation,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Palette entry clicked on this frame.
    pub select: Option<EntityKind>,
    /// Indicates whether the player clicked the grid to place the selection.
    pub confirm_action: bool,
    /// Indicates whether the player requested removal on this frame.
    pub remove_action: bool,
    /// Indicates whether the rotate button was pressed on this frame.
    pub rotate_action: bool,
    /// Cell currently hovered by the cursor, if it lies on the grid.
    pub cursor_cell: Option<CellCoord>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        select: Option<EntityKind>,
        confirm_action: bool,
        remove_action: bool,
        rotate_action: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            select,
            confirm_action,
            remove_action,
            rotate_action,
            cursor_cell,
        }
    }
}

/// Edit-mode system that translates palette selection and clicks into commands.
///
/// Selecting a player or door is refused while the level already holds one,
/// and the selection is dropped as soon as such an entity is placed, so the
/// palette never offers a second instance.
#[derive(Debug, Clone, Default)]
pub struct Builder {
    play_mode: PlayMode,
    selected: Option<EntityKind>,
    orientation: Orientation,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            play_mode: PlayMode::Edit,
            selected: None,
            orientation: Orientation::Deg0,
        }
    }

    /// Palette entry currently held by the cursor.
    #[must_use]
    pub const fn selected(&self) -> Option<EntityKind> {
        self.selected
    }

    /// Facing applied to newly placed stand spikes.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Ghost to draw at the hovered cell, if something is selected.
    #[must_use]
    pub fn preview(&self, cursor_cell: Option<CellCoord>) -> Option<PlacementPreview> {
        if self.play_mode != PlayMode::Edit {
            return None;
        }
        let kind = self.selected?;
        let cell = cursor_cell?;
        let orientation = if kind.traits().orientable {
            self.orientation
        } else {
            Orientation::Deg0
        };
        Some(PlacementPreview::new(kind, cell, orientation))
    }

    /// Consumes world events and adapter-derived input to emit edit commands.
    ///
    /// The `is_present` closure should mirror the world's level store and
    /// report whether the level already holds an entity of the provided kind.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut is_present: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(EntityKind) -> bool,
    {
        for event in events {
            match event {
                Event::PlayModeChanged { mode } => {
                    self.play_mode = *mode;
                    self.selected = None;
                }
                Event::EntityPlaced { kind, .. } if kind.is_singleton() => {
                    if self.selected == Some(*kind) {
                        self.selected = None;
                    }
                }
                Event::LevelLoaded { .. } => self.selected = None,
                _ => {}
            }
        }

        if self.play_mode != PlayMode::Edit {
            return;
        }

        if input.rotate_action {
            self.orientation = self.orientation.rotated_clockwise();
        }

        if let Some(kind) = input.select {
            if !(kind.is_singleton() && is_present(kind)) {
                self.selected = Some(kind);
            }
        }

        if input.confirm_action {
            if let (Some(kind), Some(cell)) = (self.selected, input.cursor_cell) {
                out.push(Command::PlaceEntity {
                    kind,
                    cell,
                    orientation: self.orientation,
                });
            }
        }

        if input.remove_action {
            self.selected = None;
            if let Some(cell) = input.cursor_cell {
                out.push(Command::RemoveEntity { cell });
            }
        }
    }
}
