//! Simulation-time clones of placed entities.

use glam::Vec2;
use propeller_core::{EntityKind, Orientation};
use rand::Rng;

use crate::{config::SimulationConfig, geometry::Aabb};

/// Location a stomped robot is parked at until the level restarts.
pub const OUT_OF_PLAY: Vec2 = Vec2::new(0.0, -100.0);

/// Jumps available to a player standing on the ground.
pub const GROUNDED_JUMPS: u8 = 2;

/// Mutable state of the player avatar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerState {
    /// Remaining jumps; two on the ground, one after a ground jump.
    pub jumps_left: u8,
    /// Whether the propeller is currently slowing the fall.
    pub propeller: bool,
    /// Whether the avatar faces right.
    pub facing_right: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            jumps_left: GROUNDED_JUMPS,
            propeller: false,
            facing_right: true,
        }
    }
}

/// Mutable state of a patrolling enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatrolState {
    /// Horizontal direction of travel, `-1.0` or `1.0`.
    pub direction: f32,
    /// Whether the robot was stomped and parked out of play.
    pub stomped: bool,
}

/// Kind-specific state carried by a [`PlayEntity`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EntityState {
    /// The player avatar.
    Player(PlayerState),
    /// A flyer or walking robot.
    Patrol(PatrolState),
    /// Ceiling spikes.
    FallSpikes {
        /// Whether the spikes were released.
        triggered: bool,
    },
    /// A collectible.
    Diamond {
        /// Whether the diamond was picked up.
        collected: bool,
    },
    /// Terrain, springs, doors and stand spikes.
    Static,
}

/// Entity participating in play, cloned from the level at play entry.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayEntity {
    kind: EntityKind,
    orientation: Orientation,
    spawn: Vec2,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) state: EntityState,
}

impl PlayEntity {
    pub(crate) fn spawn<R: Rng + ?Sized>(
        kind: EntityKind,
        orientation: Orientation,
        spawn: Vec2,
        rng: &mut R,
    ) -> Self {
        Self {
            kind,
            orientation,
            spawn,
            position: spawn,
            velocity: Vec2::ZERO,
            state: initial_state(kind, rng),
        }
    }

    /// Returns the entity to its spawn baseline.
    pub(crate) fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position = self.spawn;
        self.velocity = Vec2::ZERO;
        self.state = initial_state(self.kind, rng);
    }

    /// Kind of the entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Facing inherited from the placed entity.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Position the entity returns to on restart.
    #[must_use]
    pub fn spawn_position(&self) -> Vec2 {
        self.spawn
    }

    /// Current top-left corner in pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current velocity in pixels per tick.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Kind-specific state.
    #[must_use]
    pub fn state(&self) -> &EntityState {
        &self.state
    }

    /// Full hitbox at the current position.
    #[must_use]
    pub fn hitbox(&self) -> Aabb {
        let size = self.kind.hitbox();
        Aabb::new(
            self.position,
            Vec2::new(size.width() as f32, size.height() as f32),
        )
    }

    /// Hitbox used when testing the entity as a hazard.
    ///
    /// Stand spikes may shrink to the half cell occupied by their points;
    /// every other kind uses the full hitbox.
    #[must_use]
    pub fn hazard_box(&self, config: &SimulationConfig) -> Aabb {
        let full = self.hitbox();
        if self.kind != EntityKind::StandSpikes || !config.oriented_spike_hitbox {
            return full;
        }
        let size = full.size();
        let half_width = Vec2::new(size.x / 2.0, size.y);
        let half_height = Vec2::new(size.x, size.y / 2.0);
        match self.orientation {
            Orientation::Deg0 => Aabb::new(
                self.position + Vec2::new(0.0, size.y / 2.0),
                half_height,
            ),
            Orientation::Deg180 => Aabb::new(self.position, half_height),
            Orientation::Deg90 => Aabb::new(
                self.position + Vec2::new(size.x / 2.0, 0.0),
                half_width,
            ),
            Orientation::Deg270 => Aabb::new(self.position, half_width),
        }
    }

    /// Reports whether the sprite should be mirrored horizontally.
    #[must_use]
    pub fn faces_left(&self) -> bool {
        match self.state {
            EntityState::Player(player) => !player.facing_right,
            EntityState::Patrol(patrol) => patrol.direction < 0.0,
            _ => false,
        }
    }

    /// Reports whether the entity still takes part in play.
    ///
    /// Collected diamonds and stomped robots remain in their arena but are
    /// ignored by every interaction.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self.state {
            EntityState::Patrol(patrol) => !patrol.stomped,
            EntityState::Diamond { collected } => !collected,
            _ => true,
        }
    }

    /// Reports whether touching the entity kills the player.
    ///
    /// Ceiling spikes only become dangerous once released.
    #[must_use]
    pub fn is_lethal(&self) -> bool {
        self.kind.traits().hazard
            && self.is_active()
            && !matches!(self.state, EntityState::FallSpikes { triggered: false })
    }

    pub(crate) fn player_state(&self) -> Option<PlayerState> {
        match self.state {
            EntityState::Player(player) => Some(player),
            _ => None,
        }
    }

    pub(crate) fn set_player_state(&mut self, player: PlayerState) {
        debug_assert_eq!(self.kind, EntityKind::Player);
        self.state = EntityState::Player(player);
    }

    pub(crate) fn set_bottom(&mut self, bottom: f32) {
        self.position.y = bottom - self.hitbox().size().y;
    }

    pub(crate) fn set_right(&mut self, right: f32) {
        self.position.x = right - self.hitbox().size().x;
    }
}

fn initial_state<R: Rng + ?Sized>(kind: EntityKind, rng: &mut R) -> EntityState {
    let traits = kind.traits();
    if traits.patrols {
        return EntityState::Patrol(PatrolState {
            direction: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
            stomped: false,
        });
    }
    if traits.collectible {
        return EntityState::Diamond { collected: false };
    }
    match kind {
        EntityKind::Player => EntityState::Player(PlayerState::default()),
        EntityKind::FallSpikes => EntityState::FallSpikes { triggered: false },
        _ => EntityState::Static,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn reset_restores_spawn_baseline() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut spikes = PlayEntity::spawn(
            EntityKind::FallSpikes,
            Orientation::Deg0,
            Vec2::new(48.0, 96.0),
            &mut rng,
        );
        spikes.position.y += 40.0;
        spikes.state = EntityState::FallSpikes { triggered: true };

        spikes.reset(&mut rng);

        assert_eq!(spikes.position(), Vec2::new(48.0, 96.0));
        assert_eq!(spikes.state(), &EntityState::FallSpikes { triggered: false });
    }

    #[test]
    fn fall_spikes_are_harmless_until_released() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut spikes =
            PlayEntity::spawn(EntityKind::FallSpikes, Orientation::Deg0, Vec2::ZERO, &mut rng);
        assert!(!spikes.is_lethal());

        spikes.state = EntityState::FallSpikes { triggered: true };
        assert!(spikes.is_lethal());
    }

    #[test]
    fn patrolling_kinds_spawn_with_a_patrol_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for kind in EntityKind::ALL {
            let entity = PlayEntity::spawn(kind, Orientation::Deg0, Vec2::ZERO, &mut rng);
            assert_eq!(
                matches!(entity.state(), EntityState::Patrol(_)),
                kind.traits().patrols,
                "{kind:?}"
            );
            assert_eq!(
                matches!(entity.state(), EntityState::Diamond { .. }),
                kind.traits().collectible,
                "{kind:?}"
            );
        }
    }

    #[test]
    fn door_hitbox_is_two_cells_tall() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let door = PlayEntity::spawn(EntityKind::Door, Orientation::Deg0, Vec2::ZERO, &mut rng);
        assert_eq!(door.hitbox().size(), Vec2::new(24.0, 48.0));
    }

    #[test]
    fn oriented_spike_hitbox_covers_the_pointed_half() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = SimulationConfig {
            oriented_spike_hitbox: true,
            ..SimulationConfig::default()
        };
        let upright = PlayEntity::spawn(
            EntityKind::StandSpikes,
            Orientation::Deg0,
            Vec2::new(0.0, 0.0),
            &mut rng,
        );
        let hazard = upright.hazard_box(&config);
        assert_eq!(hazard.top(), 12.0);
        assert_eq!(hazard.bottom(), 24.0);

        let pointing_right = PlayEntity::spawn(
            EntityKind::StandSpikes,
            Orientation::Deg270,
            Vec2::new(0.0, 0.0),
            &mut rng,
        );
        let hazard = pointing_right.hazard_box(&config);
        assert_eq!(hazard.left(), 0.0);
        assert_eq!(hazard.right(), 12.0);
    }

    #[test]
    fn spike_hitbox_is_full_cell_by_default() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let spikes = PlayEntity::spawn(
            EntityKind::StandSpikes,
            Orientation::Deg180,
            Vec2::ZERO,
            &mut rng,
        );
        assert_eq!(
            spikes.hazard_box(&SimulationConfig::default()),
            spikes.hitbox()
        );
    }
}
