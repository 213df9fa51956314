//! Elastic Arena - an interactive 2D disk collision sandbox
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, contact detection, collision response)
//! - `input`: Drag gestures that spawn and launch bodies
//! - `scheduler`: Fixed-interval tick driver
//! - `config`: Data-driven simulation tuning
//! - `error`: Crate-wide error type

pub mod config;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod sim;

pub use config::SimConfig;
pub use error::SimError;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Tick rate of the simulation (ticks per second)
    pub const TICK_HZ: f32 = 30.0;
    /// Maximum ticks per scheduler update to prevent spiral of death
    pub const MAX_TICKS_PER_UPDATE: u32 = 8;

    /// Side length of the square arena (arena units)
    pub const ARENA_SIZE: f32 = 1000.0;

    /// Consecutive contact ticks after which a pair stops being resolved
    pub const CONTACT_COOLDOWN_TICKS: u32 = 15;

    /// Slingshot strength: launch velocity = -coeff * drag / mass
    pub const VELOCITY_COEFF: f32 = 100.0;
    /// Launch speed cap (arena units per tick)
    pub const MAX_LAUNCH_SPEED: f32 = 300.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Scale `v` down to `max` length, keeping its direction
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let (len, theta) = cartesian_to_polar(v);
    if len > max {
        polar_to_cartesian(max, theta)
    } else {
        v
    }
}
