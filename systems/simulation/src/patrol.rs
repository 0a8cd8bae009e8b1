//! Patrol AI for flyers and walking robots.

use glam::Vec2;

use crate::{
    config::SimulationConfig,
    entity::{EntityState, PlayEntity},
    player::gravity_step,
    terrain::Terrain,
};

/// Moves a flyer one step, turning around at walls, reverse walls and screen sides.
pub(crate) fn step_flyer(flyer: &mut PlayEntity, terrain: &Terrain, config: &SimulationConfig) {
    let EntityState::Patrol(patrol) = &mut flyer.state else {
        return;
    };
    let step = Vec2::new(patrol.direction * config.flyer_speed, 0.0);
    flyer.position += step;
    if terrain.blocks_flyer(&flyer.hitbox()) {
        turn_around(flyer, step);
    }
}

/// Moves a walking robot one tick: it falls onto solid terrain, then steps sideways.
pub(crate) fn step_robot(robot: &mut PlayEntity, terrain: &Terrain, config: &SimulationConfig) {
    let EntityState::Patrol(patrol) = robot.state else {
        return;
    };
    if patrol.stomped || robot.position.y > terrain.height() {
        return;
    }

    let (vy, _) = gravity_step(robot.velocity.y, false, config);
    robot.velocity.y = vy;
    robot.position.y += vy;
    for solid in terrain.solids() {
        if !robot.hitbox().overlaps(solid) {
            continue;
        }
        if vy > 0.0 {
            robot.set_bottom(solid.top());
        } else if vy < 0.0 {
            robot.position.y = solid.bottom();
        }
        robot.velocity.y = 0.0;
    }

    let step = Vec2::new(patrol.direction * config.robot_speed, 0.0);
    robot.position += step;
    if terrain.blocks_robot(&robot.hitbox()) {
        turn_around(robot, step);
    }
}

fn turn_around(entity: &mut PlayEntity, step: Vec2) {
    entity.position -= step;
    if let EntityState::Patrol(patrol) = &mut entity.state {
        patrol.direction = -patrol.direction;
    }
}
