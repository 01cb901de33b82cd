//! Game configuration
//!
//! Every tunable lives in [`GameConfig`]. Values are load-time constants: a
//! round copies the config when it is created and never re-reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("track length must be at least {min} nodes, got {actual}")]
    TrackTooShort { min: u32, actual: u32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("{phase} duration range is inverted: min {min_ms}ms > max {max_ms}ms")]
    InvertedDuration {
        phase: &'static str,
        min_ms: u32,
        max_ms: u32,
    },
    #[error("obstacle size range is invalid: min {min} max {max}")]
    InvalidObstacleSize { min: u32, max: u32 },
    #[error("obstacle max size {max} does not fit a {track_len}-node track (limit {limit})")]
    ObstacleTooLarge { max: u32, track_len: u32, limit: u32 },
    #[error("player {player} has an empty key binding")]
    EmptyBinding { player: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Smallest ring that still has a wall, two start nodes and room to race
pub const MIN_TRACK_LEN: u32 = 4;

/// Min/max bounds for one light phase, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min_ms: u32,
    pub max_ms: u32,
}

impl DurationRange {
    pub const fn new(min_ms: u32, max_ms: u32) -> Self {
        Self { min_ms, max_ms }
    }
}

/// Key names bound to one player's left/right controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerControls {
    pub left: String,
    pub right: String,
}

impl PlayerControls {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Track ===
    /// Number of discrete nodes on the ring
    pub track_len: u32,
    /// Ring radius in pixels (rendering only)
    pub ring_radius: f32,
    /// Side of each square track pixel (rendering only)
    pub pixel_size: f32,
    /// Canvas size in pixels (rendering only)
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Movement ===
    /// Acceleration while a direction key is held (nodes/s²)
    pub accel: f32,
    /// Velocity retained per tick while moving (0-1, higher = more slippery)
    pub inertia: f32,
    /// Velocity cap (nodes/s)
    pub max_speed: f32,
    /// Velocity retained per tick while frozen in the open during red
    pub red_damping: f32,
    /// Fraction of the track a player must cover before the goal counts
    pub win_distance_fraction: f32,

    // === Obstacles ===
    /// Total obstacle pixels at round start
    pub obstacle_starting_pixels: u32,
    /// Pixels removed from the budget each time the light turns green
    pub obstacle_pixel_decrement: u32,
    /// Minimum separation between blobs and forbidden nodes (in nodes)
    pub obstacle_min_sep: u32,
    pub obstacle_min_size: u32,
    pub obstacle_max_size: u32,

    // === Block breathing (seconds) ===
    /// Time standing on a block before it starts breathing
    pub block_trigger_time: f32,
    /// Time a block breathes before disappearing
    pub block_breathing_duration: f32,

    // === Light timing ===
    pub green: DurationRange,
    /// Warning phase, drawn as a breathing green light
    #[serde(alias = "breathing_green")]
    pub yellow: DurationRange,
    pub red: DurationRange,

    // === Audio sync (seconds) ===
    /// Snap phase durations to whole cue loops
    pub audio_sync: bool,
    pub audio_crossing_duration: f32,
    pub audio_waiting_duration: f32,

    // === Driver ===
    /// Largest frame delta fed to a single tick
    pub max_frame_dt: f32,

    // === Controls ===
    pub controls: [PlayerControls; 2],
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            track_len: 80,
            ring_radius: 250.0,
            pixel_size: 14.0,
            canvas_width: 800.0,
            canvas_height: 800.0,

            accel: 200.0,
            inertia: 0.95,
            max_speed: 10.0,
            red_damping: 0.95,
            win_distance_fraction: 0.75,

            obstacle_starting_pixels: 30,
            obstacle_pixel_decrement: 3,
            obstacle_min_sep: 3,
            obstacle_min_size: 2,
            obstacle_max_size: 4,

            block_trigger_time: 1.0,
            block_breathing_duration: 3.0,

            green: DurationRange::new(1000, 3000),
            yellow: DurationRange::new(2000, 4000),
            red: DurationRange::new(2000, 5000),

            audio_sync: true,
            audio_crossing_duration: 0.287292,
            audio_waiting_duration: 0.862,

            max_frame_dt: 0.1,

            controls: [
                PlayerControls::new("A", "D"),
                PlayerControls::new("ArrowLeft", "ArrowRight"),
            ],
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Distance a player must cover before reaching the goal counts
    pub fn win_distance(&self) -> f32 {
        self.track_len as f32 * self.win_distance_fraction
    }

    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.track_len < MIN_TRACK_LEN {
            return Err(ConfigError::TrackTooShort {
                min: MIN_TRACK_LEN,
                actual: self.track_len,
            });
        }

        let positives = [
            ("ring_radius", self.ring_radius),
            ("pixel_size", self.pixel_size),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("accel", self.accel),
            ("max_speed", self.max_speed),
            ("block_trigger_time", self.block_trigger_time),
            ("block_breathing_duration", self.block_breathing_duration),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positives {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.audio_sync {
            for (field, value) in [
                ("audio_crossing_duration", self.audio_crossing_duration),
                ("audio_waiting_duration", self.audio_waiting_duration),
            ] {
                if value.is_nan() || value <= 0.0 {
                    return Err(ConfigError::NotPositive { field, value });
                }
            }
        }

        let unit_fractions = [
            ("inertia", self.inertia),
            ("red_damping", self.red_damping),
            ("win_distance_fraction", self.win_distance_fraction),
        ];
        for (field, value) in unit_fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }

        for (phase, range) in [("green", self.green), ("yellow", self.yellow), ("red", self.red)] {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::InvertedDuration {
                    phase,
                    min_ms: range.min_ms,
                    max_ms: range.max_ms,
                });
            }
            if range.max_ms == 0 {
                return Err(ConfigError::NotPositive {
                    field: phase,
                    value: 0.0,
                });
            }
        }

        if self.obstacle_min_size == 0 || self.obstacle_min_size > self.obstacle_max_size {
            return Err(ConfigError::InvalidObstacleSize {
                min: self.obstacle_min_size,
                max: self.obstacle_max_size,
            });
        }
        // The light and both start nodes are never available
        let limit = self.track_len - 3;
        if self.obstacle_max_size > limit {
            return Err(ConfigError::ObstacleTooLarge {
                max: self.obstacle_max_size,
                track_len: self.track_len,
                limit,
            });
        }

        for (player, controls) in self.controls.iter().enumerate() {
            if controls.left.trim().is_empty() || controls.right.trim().is_empty() {
                return Err(ConfigError::EmptyBinding { player: player + 1 });
            }
        }

        Ok(())
    }
}
