//! Player avatar physics: gravity, running, jumping and terrain resolution.

use glam::Vec2;
use propeller_core::{Event, JumpKind, PlayerAction};

use crate::{
    config::SimulationConfig,
    entity::{PlayEntity, GROUNDED_JUMPS},
    terrain::Terrain,
};

/// Applies one tick of gravity to a vertical speed.
///
/// Returns the new speed and whether the propeller keeps spinning. Bodies at
/// rest receive a one pixel nudge so they keep probing their floor.
pub(crate) fn gravity_step(vy: f32, propeller: bool, config: &SimulationConfig) -> (f32, bool) {
    if vy == 0.0 {
        return (1.0, propeller);
    }
    if !propeller {
        return (vy + config.gravity, false);
    }
    let slowed = vy + config.propeller_gravity;
    if slowed > config.propeller_cutoff {
        (slowed + config.propeller_acceleration, false)
    } else {
        (slowed, true)
    }
}

/// Moves the player for one tick, resolving each axis against solid terrain.
pub(crate) fn step(player: &mut PlayEntity, terrain: &Terrain, config: &SimulationConfig) {
    let Some(mut state) = player.player_state() else {
        return;
    };
    let (vy, propeller) = gravity_step(player.velocity.y, state.propeller, config);
    player.velocity.y = vy;
    state.propeller = propeller;

    let vx = player.velocity.x;
    player.position.x += vx;
    for solid in terrain.solids() {
        if !player.hitbox().overlaps(solid) {
            continue;
        }
        if vx > 0.0 {
            player.set_right(solid.left());
        } else if vx < 0.0 {
            player.position.x = solid.right();
        }
    }
    let max_x = terrain.width() - player.hitbox().size().x;
    player.position.x = player.position.x.clamp(0.0, max_x.max(0.0));

    player.position.y += vy;
    let mut contact = false;
    for solid in terrain.solids() {
        if !player.hitbox().overlaps(solid) {
            continue;
        }
        contact = true;
        if vy > 0.0 {
            player.set_bottom(solid.top());
            state.jumps_left = GROUNDED_JUMPS;
        } else if vy < 0.0 {
            player.position.y = solid.bottom();
        }
    }
    if contact {
        player.velocity.y = 0.0;
        state.propeller = false;
    }
    player.set_player_state(state);
}

/// Applies a movement request to the player.
pub(crate) fn control(
    player: &mut PlayEntity,
    action: PlayerAction,
    terrain: &Terrain,
    config: &SimulationConfig,
    out: &mut Vec<Event>,
) {
    let Some(mut state) = player.player_state() else {
        return;
    };
    match action {
        PlayerAction::GoLeft => {
            player.velocity.x = -config.move_speed;
            state.facing_right = false;
        }
        PlayerAction::GoRight => {
            player.velocity.x = config.move_speed;
            state.facing_right = true;
        }
        PlayerAction::Stop => player.velocity.x = 0.0,
        PlayerAction::Jump => {
            if state.jumps_left == 0 {
                return;
            }
            let probe = player.hitbox().translated(Vec2::new(0.0, 1.0));
            if terrain.touches_solid(&probe) {
                if terrain.touches_sticky(&probe) {
                    state.jumps_left = 0;
                    player.set_player_state(state);
                    out.push(Event::JumpVetoed);
                    return;
                }
                player.velocity.y = config.jump_speed;
                state.jumps_left -= 1;
                out.push(Event::Jumped {
                    kind: JumpKind::Ground,
                });
            } else if state.jumps_left == 1 {
                player.velocity.y = config.double_jump_speed;
                state.propeller = true;
                state.jumps_left = 0;
                out.push(Event::Jumped {
                    kind: JumpKind::Propeller,
                });
            }
        }
    }
    player.set_player_state(state);
}
