//! Red Light Ring - a two-player red light, green light race on a ring
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (light, obstacles, players)
//! - `config`: Load-time game configuration
//! - `input`: Key bindings and per-tick input snapshots
//! - `audio`: Cue start/stop driven by light changes
//! - `layout`: Node to pixel mapping for renderers

pub mod audio;
pub mod config;
pub mod input;
pub mod layout;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use input::{HeldKeys, KeyState, TickInput};
pub use sim::{Round, RoundSnapshot};

use glam::Vec2;

/// Driver constants
pub mod consts {
    /// Nominal frame delta for headless runs (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Headless runs give up after this many seconds of play
    pub const MAX_ROUND_SECS: f32 = 600.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
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
