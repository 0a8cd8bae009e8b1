#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step platformer simulation that plays a level built in the editor.
//!
//! A [`Simulation`] is spawned from the placed entities of a level. Every
//! entity is cloned into a per-kind arena, so the level itself is never read
//! or mutated while playing. Each [`Simulation::tick`] runs the player and the
//! patrolling enemies, resolves contacts, and reports whether the attempt
//! continues, ended in a death, or reached the open door.

mod config;
mod entity;
mod geometry;
mod interactions;
mod mask;
mod patrol;
mod player;
mod terrain;

use glam::Vec2;
use log::{debug, trace};
use propeller_core::{
    catalog::ENTITY_KIND_COUNT, DeathCause, EntityKind, Event, ModeError, PlacedEntity,
    PlayerAction, Playfield,
};
use rand::Rng;

pub use config::SimulationConfig;
pub use entity::{EntityState, PatrolState, PlayEntity, PlayerState, GROUNDED_JUMPS, OUT_OF_PLAY};
pub use geometry::Aabb;
pub use mask::{CollisionMask, MaskSet, MaskSizeError};

use terrain::Terrain;

/// Result of advancing the simulation by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The attempt goes on.
    Continue,
    /// The player died; the level should restart.
    Died(DeathCause),
    /// The player entered the open door.
    Won,
}

/// Play-mode state cloned from a level.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    masks: MaskSet,
    player: PlayEntity,
    arenas: [Vec<PlayEntity>; ENTITY_KIND_COUNT],
    terrain: Terrain,
    score: u32,
    tick: u64,
}

impl Simulation {
    /// Clones the placed entities into play entities.
    ///
    /// Fails when the level contains no player to control.
    pub fn spawn<R, I>(
        entities: I,
        playfield: &Playfield,
        config: SimulationConfig,
        masks: MaskSet,
        rng: &mut R,
    ) -> Result<Self, ModeError>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = PlacedEntity>,
    {
        let mut terrain = Terrain::new(Vec2::new(
            playfield.width() as f32,
            playfield.height() as f32,
        ));
        let mut arenas: [Vec<PlayEntity>; ENTITY_KIND_COUNT] = Default::default();
        let mut player = None;

        for placed in entities {
            let origin = playfield.cell_origin(placed.cell());
            let entity = PlayEntity::spawn(
                placed.kind(),
                placed.orientation(),
                Vec2::new(origin.x as f32, origin.y as f32),
                rng,
            );
            if placed.kind() == EntityKind::Player {
                debug_assert!(player.is_none(), "levels hold a single player");
                player = Some(entity);
                continue;
            }
            terrain.insert(placed.kind(), entity.hitbox());
            arenas[placed.kind().index()].push(entity);
        }

        let player = player.ok_or(ModeError::MissingPlayer)?;
        debug!(
            "spawned play session with {} entities",
            1 + arenas.iter().map(Vec::len).sum::<usize>()
        );
        Ok(Self {
            config,
            masks,
            player,
            arenas,
            terrain,
            score: 0,
            tick: 0,
        })
    }

    /// Advances the simulation by one fixed tick.
    ///
    /// Physics runs before contacts; a death reported in the same tick as a
    /// win takes precedence.
    pub fn tick(&mut self, out: &mut Vec<Event>) -> TickOutcome {
        self.tick += 1;

        player::step(&mut self.player, &self.terrain, &self.config);
        for flyer in self.arenas[EntityKind::Flyer.index()].iter_mut() {
            patrol::step_flyer(flyer, &self.terrain, &self.config);
        }
        for robot in self.arenas[EntityKind::SmilyRobot.index()].iter_mut() {
            patrol::step_robot(robot, &self.terrain, &self.config);
        }
        self.update_fall_spikes(out);

        self.collect_diamonds(out);
        self.bounce_on_springs(out);
        let death = self
            .resolve_robots(out)
            .or_else(|| self.lethal_contact());
        trace!(
            "tick {} player at {:?} moving {:?}",
            self.tick,
            self.player.position(),
            self.player.velocity()
        );

        if let Some(cause) = death {
            return TickOutcome::Died(cause);
        }
        if self.reached_door() {
            return TickOutcome::Won;
        }
        TickOutcome::Continue
    }

    /// Applies a movement request to the player.
    pub fn control(&mut self, action: PlayerAction, out: &mut Vec<Event>) {
        player::control(&mut self.player, action, &self.terrain, &self.config, out);
    }

    /// Resets every play entity to its spawn baseline and clears the score.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.player.reset(rng);
        for entity in self.arenas.iter_mut().flatten() {
            entity.reset(rng);
        }
        self.score = 0;
    }

    /// The player avatar.
    #[must_use]
    pub fn player(&self) -> &PlayEntity {
        &self.player
    }

    /// Play entities of the provided kind, in placement order.
    #[must_use]
    pub fn arena(&self, kind: EntityKind) -> &[PlayEntity] {
        if kind == EntityKind::Player {
            return std::slice::from_ref(&self.player);
        }
        &self.arenas[kind.index()]
    }

    /// Every play entity, kind by kind in palette order.
    pub fn entities(&self) -> impl Iterator<Item = &PlayEntity> + '_ {
        EntityKind::ALL
            .into_iter()
            .flat_map(move |kind| self.arena(kind).iter())
    }

    /// Diamonds collected since the level (re)started.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Diamonds present in the level.
    #[must_use]
    pub fn diamond_count(&self) -> u32 {
        u32::try_from(self.arenas[EntityKind::Diamond.index()].len()).unwrap_or(u32::MAX)
    }

    /// Reports whether every diamond has been collected.
    #[must_use]
    pub fn door_open(&self) -> bool {
        self.score == self.diamond_count()
    }

    /// Ticks simulated since play started.
    #[must_use]
    pub fn elapsed_ticks(&self) -> u64 {
        self.tick
    }

    /// Physics constants in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
