//! Tuning knobs for the play simulation.

use serde::{Deserialize, Serialize};

/// Physics constants applied every tick, in pixels per tick at 60 Hz.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Downward acceleration applied to falling bodies.
    pub gravity: f32,
    /// Reduced acceleration applied while the propeller spins.
    pub propeller_gravity: f32,
    /// Acceleration added once the propeller cuts out.
    pub propeller_acceleration: f32,
    /// Vertical speed above which the propeller stops spinning.
    pub propeller_cutoff: f32,
    /// Vertical speed applied by a ground jump.
    pub jump_speed: f32,
    /// Vertical speed applied by the mid-air propeller boost.
    pub double_jump_speed: f32,
    /// Horizontal running speed of the player.
    pub move_speed: f32,
    /// Vertical speed applied when bouncing off a spring.
    pub spring_launch: f32,
    /// Vertical speed applied after stomping a robot.
    pub stomp_bounce: f32,
    /// Horizontal patrol speed of flyers.
    pub flyer_speed: f32,
    /// Horizontal patrol speed of walking robots.
    pub robot_speed: f32,
    /// Distance falling spikes drop per tick once triggered.
    pub fall_spike_step: f32,
    /// How far the player's feet may sink into a spring or robot and still count as landing on it.
    pub landing_tolerance: f32,
    /// Landing tolerance used for springs hit at high speed.
    pub high_speed_landing_tolerance: f32,
    /// Downward speed from which the high speed tolerance applies.
    pub high_speed_threshold: f32,
    /// Restricts the stand spike hitbox to the half cell the spikes point out of.
    pub oriented_spike_hitbox: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            gravity: 0.25,
            propeller_gravity: 0.01,
            propeller_acceleration: 0.25,
            propeller_cutoff: -1.5,
            jump_speed: -7.0,
            double_jump_speed: -2.0,
            move_speed: 4.0,
            spring_launch: -10.0,
            stomp_bounce: -4.0,
            flyer_speed: 1.0,
            robot_speed: 2.0,
            fall_spike_step: 5.0,
            landing_tolerance: 10.0,
            high_speed_landing_tolerance: 20.0,
            high_speed_threshold: 10.0,
            oriented_spike_hitbox: false,
        }
    }
}
