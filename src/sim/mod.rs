//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - dt-driven updates, one call per frame
//! - Seeded RNG only
//! - Stable iteration order (players by ID, obstacles by ID)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod light;
pub mod obstacle;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod track;

pub use autopilot::autopilot;
pub use light::{LightPhase, TrafficLight};
pub use obstacle::{ExpiredNode, Obstacle, ObstacleField, ObstacleNode};
pub use player::{BlockContact, EliminationCause, Player, PlayerId};
pub use snapshot::{NodeView, ObstacleView, PlayerView, RoundSnapshot};
pub use state::{GameEvent, Outcome, Round, RoundStatus, Winner};
pub use tick::tick;
pub use track::{LIGHT_NODE, Track};
