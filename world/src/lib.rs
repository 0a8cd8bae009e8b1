#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Propeller.
//!
//! The world owns the level being edited and, while playing, the simulation
//! cloned from it. Every mutation flows through [`apply`], which never fails:
//! rejected requests are reported as events and leave the world in its prior
//! valid state.

mod snapshot;
mod store;

use log::{debug, info};
use propeller_core::{
    BackgroundColor, CellCoord, Command, EntityKind, Event, LevelSnapshot, Orientation,
    PlacementError, PlayMode, Playfield, WELCOME_BANNER,
};
use propeller_simulation::{MaskSet, Simulation, SimulationConfig, TickOutcome};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use store::LevelStore;

const DEFAULT_PATROL_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Settings fixed for the lifetime of a world.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Geometry of the editable grid.
    pub playfield: Playfield,
    /// Physics constants handed to every play session.
    pub simulation: SimulationConfig,
    /// Pixel masks refining collisions between sprites.
    pub masks: MaskSet,
    /// Seed for the patrol direction generator.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            simulation: SimulationConfig::default(),
            masks: MaskSet::default(),
            seed: DEFAULT_PATROL_SEED,
        }
    }
}

/// Represents the authoritative Propeller world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    playfield: Playfield,
    config: SimulationConfig,
    masks: MaskSet,
    mode: PlayMode,
    store: LevelStore,
    background: BackgroundColor,
    simulation: Option<Simulation>,
    deaths: u32,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a new world with the default playfield and physics.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a new, empty world in edit mode.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            banner: WELCOME_BANNER,
            playfield: config.playfield,
            config: config.simulation,
            masks: config.masks,
            mode: PlayMode::Edit,
            store: LevelStore::new(),
            background: BackgroundColor::default(),
            simulation: None,
            deaths: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    fn enter_play(&mut self, out_events: &mut Vec<Event>) {
        let spawned = Simulation::spawn(
            self.store.entities().copied(),
            &self.playfield,
            self.config.clone(),
            self.masks.clone(),
            &mut self.rng,
        );
        match spawned {
            Ok(simulation) => {
                self.simulation = Some(simulation);
                self.deaths = 0;
                self.mode = PlayMode::Play;
                info!("entered play mode");
                out_events.push(Event::PlayModeChanged {
                    mode: PlayMode::Play,
                });
            }
            Err(reason) => {
                debug!("play mode rejected: {reason}");
                out_events.push(Event::PlayModeRejected { reason });
            }
        }
    }

    fn enter_edit(&mut self, out_events: &mut Vec<Event>) {
        self.simulation = None;
        self.deaths = 0;
        self.mode = PlayMode::Edit;
        info!("entered edit mode");
        out_events.push(Event::PlayModeChanged {
            mode: PlayMode::Edit,
        });
    }

    fn restart_level(&mut self, out_events: &mut Vec<Event>) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        simulation.restart(&mut self.rng);
        self.deaths = self.deaths.saturating_add(1);
        out_events.push(Event::LevelRestarted {
            deaths: self.deaths,
        });
    }

    fn win_level(&mut self, out_events: &mut Vec<Event>) {
        info!("level won after {} deaths", self.deaths);
        out_events.push(Event::LevelWon {
            deaths: self.deaths,
        });
        self.enter_edit(out_events);
    }

    fn place(
        &mut self,
        kind: EntityKind,
        cell: CellCoord,
        orientation: Orientation,
        out_events: &mut Vec<Event>,
    ) {
        let verdict = if self.mode != PlayMode::Edit {
            Err(PlacementError::InvalidMode)
        } else if !self.playfield.contains_cell(cell) {
            Err(PlacementError::OutsidePlayfield)
        } else {
            self.store.place(kind, cell, orientation)
        };

        match verdict {
            Ok(evicted) => {
                if let Some(evicted) = evicted {
                    out_events.push(Event::EntityRemoved {
                        kind: evicted.kind(),
                        cell,
                    });
                }
                let orientation = self
                    .store
                    .occupant(cell)
                    .map_or(orientation, |placed| placed.orientation());
                debug!("placed {kind} at {cell:?}");
                out_events.push(Event::EntityPlaced {
                    kind,
                    cell,
                    orientation,
                });
            }
            Err(reason) => {
                debug!("rejected {kind} at {cell:?}: {reason}");
                out_events.push(Event::PlacementRejected { kind, cell, reason });
            }
        }
    }

    fn ensure_editing(&self, out_events: &mut Vec<Event>) -> bool {
        if self.mode == PlayMode::Edit {
            return true;
        }
        debug!("edit rejected while playing");
        out_events.push(Event::EditRejected {
            reason: PlacementError::InvalidMode,
        });
        false
    }

    fn load(&mut self, snapshot: &LevelSnapshot, out_events: &mut Vec<Event>) {
        if self.mode == PlayMode::Play {
            self.enter_edit(out_events);
        }
        match snapshot::restore(snapshot, &self.playfield) {
            Ok((store, background)) => {
                self.store = store;
                self.background = background;
                info!("loaded level with {} entities", self.store.len());
                out_events.push(Event::LevelLoaded {
                    entities: self.store.len(),
                });
            }
            Err(reason) => {
                debug!("level load rejected: {reason}");
                out_events.push(Event::LevelLoadRejected { reason });
            }
        }
    }

    fn tick(&mut self, out_events: &mut Vec<Event>) {
        let Some(simulation) = self.simulation.as_mut() else {
            return;
        };
        out_events.push(Event::TimeAdvanced {
            tick: simulation.elapsed_ticks().saturating_add(1),
        });
        match simulation.tick(out_events) {
            TickOutcome::Continue => {}
            TickOutcome::Died(cause) => {
                debug!("player died: {cause:?}");
                out_events.push(Event::PlayerDied { cause });
                self.restart_level(out_events);
            }
            TickOutcome::Won => self.win_level(out_events),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetPlayMode { mode } => match (world.mode, mode) {
            (PlayMode::Edit, PlayMode::Play) => world.enter_play(out_events),
            (PlayMode::Play, PlayMode::Edit) => world.enter_edit(out_events),
            _ => {}
        },
        Command::PlaceEntity {
            kind,
            cell,
            orientation,
        } => world.place(kind, cell, orientation, out_events),
        Command::RemoveEntity { cell } => {
            if !world.ensure_editing(out_events) {
                return;
            }
            if let Some(removed) = world.store.remove_at(cell) {
                debug!("removed {} at {cell:?}", removed.kind());
                out_events.push(Event::EntityRemoved {
                    kind: removed.kind(),
                    cell,
                });
            }
        }
        Command::ClearLevel => {
            if !world.ensure_editing(out_events) {
                return;
            }
            world.store.clear_all();
            out_events.push(Event::LevelCleared);
        }
        Command::SetBackground { color } => {
            if !world.ensure_editing(out_events) {
                return;
            }
            world.background = color;
            out_events.push(Event::BackgroundChanged { color });
        }
        Command::LoadLevel { snapshot } => world.load(&snapshot, out_events),
        Command::Tick => world.tick(out_events),
        Command::Control { action } => {
            if let Some(simulation) = world.simulation.as_mut() {
                simulation.control(action, out_events);
            }
        }
        Command::RestartLevel => world.restart_level(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use propeller_core::{BackgroundColor, LevelSnapshot, PlayMode, Playfield, SnapshotError};
    use propeller_simulation::Simulation;

    use super::{snapshot, LevelStore, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Mode the world is currently in.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.mode
    }

    /// Geometry of the editable grid.
    #[must_use]
    pub fn playfield(world: &World) -> &Playfield {
        &world.playfield
    }

    /// Entities placed in the level being edited.
    #[must_use]
    pub fn level(world: &World) -> &LevelStore {
        &world.store
    }

    /// Colour painted behind the level.
    #[must_use]
    pub fn background(world: &World) -> BackgroundColor {
        world.background
    }

    /// The running play session, if the world is in play mode.
    #[must_use]
    pub fn simulation(world: &World) -> Option<&Simulation> {
        world.simulation.as_ref()
    }

    /// Deaths counted during the current play session.
    #[must_use]
    pub fn death_count(world: &World) -> u32 {
        world.deaths
    }

    /// Describes the current level without validating it.
    #[must_use]
    pub fn level_snapshot(world: &World) -> LevelSnapshot {
        snapshot::capture(&world.store, &world.playfield, world.background)
    }

    /// Describes the current level for saving.
    ///
    /// Saved levels must contain both a player and a door.
    pub fn save_snapshot(world: &World) -> Result<LevelSnapshot, SnapshotError> {
        snapshot::capture_for_save(&world.store, &world.playfield, world.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propeller_core::{ModeError, PlacedEntity};

    fn place(world: &mut World, kind: EntityKind, column: u32, row: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceEntity {
                kind,
                cell: CellCoord::new(column, row),
                orientation: Orientation::Deg0,
            },
            &mut events,
        );
        events
    }

    #[test]
    fn new_world_starts_empty_in_edit_mode() {
        let world = World::new();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::play_mode(&world), PlayMode::Edit);
        assert!(query::level(&world).is_empty());
        assert!(query::simulation(&world).is_none());
        assert_eq!(query::background(&world), BackgroundColor::default());
    }

    #[test]
    fn placing_reports_the_entity() {
        let mut world = World::new();
        let events = place(&mut world, EntityKind::Wall, 3, 4);
        assert_eq!(
            events,
            vec![Event::EntityPlaced {
                kind: EntityKind::Wall,
                cell: CellCoord::new(3, 4),
                orientation: Orientation::Deg0,
            }]
        );
    }

    #[test]
    fn placing_over_an_entity_reports_the_eviction_first() {
        let mut world = World::new();
        let _ = place(&mut world, EntityKind::Diamond, 3, 4);
        let events = place(&mut world, EntityKind::Wall, 3, 4);
        assert_eq!(
            events,
            vec![
                Event::EntityRemoved {
                    kind: EntityKind::Diamond,
                    cell: CellCoord::new(3, 4),
                },
                Event::EntityPlaced {
                    kind: EntityKind::Wall,
                    cell: CellCoord::new(3, 4),
                    orientation: Orientation::Deg0,
                },
            ]
        );
    }

    #[test]
    fn placing_outside_the_grid_is_rejected() {
        let mut world = World::new();
        let columns = query::playfield(&world).columns();
        let events = place(&mut world, EntityKind::Wall, columns, 0);
        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                kind: EntityKind::Wall,
                cell: CellCoord::new(columns, 0),
                reason: PlacementError::OutsidePlayfield,
            }]
        );
        assert!(query::level(&world).is_empty());
    }

    #[test]
    fn reported_orientation_is_normalised_for_fixed_kinds() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceEntity {
                kind: EntityKind::Spring,
                cell: CellCoord::new(1, 1),
                orientation: Orientation::Deg180,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EntityPlaced {
                kind: EntityKind::Spring,
                cell: CellCoord::new(1, 1),
                orientation: Orientation::Deg0,
            }]
        );
    }

    #[test]
    fn play_without_player_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayMode {
                mode: PlayMode::Play,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::PlayModeRejected {
                reason: ModeError::MissingPlayer
            }]
        );
        assert_eq!(query::play_mode(&world), PlayMode::Edit);
    }

    #[test]
    fn tick_in_edit_mode_does_nothing() {
        let mut world = World::new();
        let _ = place(&mut world, EntityKind::Player, 1, 1);
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn clear_and_background_edits_report_changes() {
        let mut world = World::new();
        let _ = place(&mut world, EntityKind::Wall, 0, 0);
        let mut events = Vec::new();
        let color = BackgroundColor::from_rgb(1, 2, 3);

        apply(&mut world, Command::ClearLevel, &mut events);
        apply(&mut world, Command::SetBackground { color }, &mut events);

        assert_eq!(
            events,
            vec![Event::LevelCleared, Event::BackgroundChanged { color }]
        );
        assert!(query::level(&world).is_empty());
        assert_eq!(query::background(&world), color);
    }

    #[test]
    fn removing_reports_the_entity() {
        let mut world = World::new();
        let _ = place(&mut world, EntityKind::Door, 2, 2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::RemoveEntity {
                cell: CellCoord::new(2, 2),
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EntityRemoved {
                kind: EntityKind::Door,
                cell: CellCoord::new(2, 2),
            }]
        );
        assert!(query::level(&world).door().is_none());
    }

    #[test]
    fn level_snapshot_lists_placed_entities() {
        let mut world = World::new();
        let _ = place(&mut world, EntityKind::Player, 0, 0);
        let snapshot = query::level_snapshot(&world);
        assert_eq!(snapshot.len(), 1);
        assert!(query::save_snapshot(&world).is_err());
        let _ = place(&mut world, EntityKind::Door, 1, 0);
        assert!(query::save_snapshot(&world).is_ok());
        assert_eq!(
            query::level(&world).player().map(PlacedEntity::cell),
            Some(CellCoord::new(0, 0))
        );
    }
}
