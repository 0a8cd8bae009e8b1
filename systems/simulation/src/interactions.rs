//! Contacts between the player and the other play entities.

use glam::Vec2;
use propeller_core::{DeathCause, EntityKind, Event};

use crate::{
    entity::{EntityState, OUT_OF_PLAY},
    Simulation,
};

impl Simulation {
    /// Releases ceiling spikes once the player passes beneath them and lets released spikes fall.
    pub(crate) fn update_fall_spikes(&mut self, out: &mut Vec<Event>) {
        let player = self.player.hitbox();
        let step = self.config.fall_spike_step;
        for spikes in self.arenas[EntityKind::FallSpikes.index()].iter_mut() {
            let hitbox = spikes.hitbox();
            let EntityState::FallSpikes { triggered } = &mut spikes.state else {
                continue;
            };
            if !*triggered
                && player.right() > hitbox.left()
                && player.left() < hitbox.right()
                && player.top() > hitbox.bottom()
            {
                *triggered = true;
                out.push(Event::FallSpikesTriggered);
            }
            if *triggered {
                spikes.position.y += step;
            }
        }
    }

    /// Collects every uncollected diamond touching the player.
    pub(crate) fn collect_diamonds(&mut self, out: &mut Vec<Event>) {
        let player = self.player.hitbox();
        let total = self.diamond_count();
        for diamond in self.arenas[EntityKind::Diamond.index()].iter_mut() {
            if !diamond.is_active() {
                continue;
            }
            let hitbox = diamond.hitbox();
            if !self
                .masks
                .overlap((EntityKind::Player, &player), (EntityKind::Diamond, &hitbox))
            {
                continue;
            }
            diamond.state = EntityState::Diamond { collected: true };
            self.score += 1;
            out.push(Event::DiamondCollected {
                score: self.score,
                total,
            });
            if self.score == total {
                out.push(Event::DoorOpened);
            }
        }
    }

    /// Bounces the player off springs landed on from above; blocks it otherwise.
    pub(crate) fn bounce_on_springs(&mut self, out: &mut Vec<Event>) {
        let Some(mut state) = self.player.player_state() else {
            return;
        };
        let config = &self.config;
        for spring in &self.arenas[EntityKind::Spring.index()] {
            let player = self.player.hitbox();
            let pad = spring.hitbox();
            if !self
                .masks
                .overlap((EntityKind::Player, &player), (EntityKind::Spring, &pad))
            {
                continue;
            }
            let velocity = self.player.velocity;
            let fast_landing = player.bottom() <= pad.top() + config.high_speed_landing_tolerance
                && velocity.y >= config.high_speed_threshold;
            let landing = player.bottom() <= pad.top() + config.landing_tolerance && velocity.y >= 0.0;
            if fast_landing || landing {
                self.player.set_bottom(pad.top());
                self.player.velocity.y = config.spring_launch;
                state.jumps_left = 1;
                state.propeller = false;
                out.push(Event::SpringBounced);
            } else if velocity.x > 0.0 {
                self.player.set_right(pad.left());
            } else if velocity.x < 0.0 {
                self.player.position.x = pad.right();
            } else if velocity.y < 0.0 {
                self.player.velocity.y = 0.0;
                self.player.position.y = pad.bottom();
                state.propeller = false;
            }
        }
        self.player.set_player_state(state);
    }

    /// Stomps robots landed on from above and reports a death for any other contact.
    pub(crate) fn resolve_robots(&mut self, out: &mut Vec<Event>) -> Option<DeathCause> {
        let mut state = self.player.player_state()?;
        let mut death = None;
        for robot in self.arenas[EntityKind::SmilyRobot.index()].iter_mut() {
            if !robot.is_active() {
                continue;
            }
            let player = self.player.hitbox();
            let body = robot.hitbox();
            if !player.overlaps(&body) {
                continue;
            }
            let stomp = player.bottom() <= body.top() + self.config.landing_tolerance
                && self.player.velocity.y >= 0.0;
            if !stomp {
                death = Some(DeathCause::SmilyRobot);
                break;
            }
            robot.position = OUT_OF_PLAY;
            robot.velocity = Vec2::ZERO;
            if let EntityState::Patrol(patrol) = &mut robot.state {
                patrol.stomped = true;
            }
            self.player.velocity.y = self.config.stomp_bounce;
            state.jumps_left = 1;
            state.propeller = false;
            out.push(Event::RobotStomped);
        }
        self.player.set_player_state(state);
        death
    }

    /// First lethal contact of the player, if any.
    pub(crate) fn lethal_contact(&self) -> Option<DeathCause> {
        let player = self.player.hitbox();
        let hazard = EntityKind::ALL
            .into_iter()
            .filter(|kind| kind.traits().hazard)
            .find(|kind| {
                self.arenas[kind.index()].iter().any(|entity| {
                    entity.is_lethal() && entity.hazard_box(&self.config).overlaps(&player)
                })
            });
        if let Some(kind) = hazard {
            return death_cause(kind);
        }
        if player.top() > self.terrain.height() && self.player.velocity.y >= 0.0 {
            return Some(DeathCause::FellOffScreen);
        }
        None
    }

    /// Reports whether the player stands in the open door.
    pub(crate) fn reached_door(&self) -> bool {
        if !self.door_open() {
            return false;
        }
        let player = self.player.hitbox();
        self.arenas[EntityKind::Door.index()].iter().any(|door| {
            self.masks
                .overlap((EntityKind::Player, &player), (EntityKind::Door, &door.hitbox()))
        })
    }
}

fn death_cause(kind: EntityKind) -> Option<DeathCause> {
    match kind {
        EntityKind::Flyer => Some(DeathCause::Flyer),
        EntityKind::SmilyRobot => Some(DeathCause::SmilyRobot),
        EntityKind::FallSpikes => Some(DeathCause::FallSpikes),
        EntityKind::StandSpikes => Some(DeathCause::StandSpikes),
        _ => None,
    }
}
