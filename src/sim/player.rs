//! Player physics and block interaction
//!
//! A player slides along the ring with acceleration, inertia and a speed cap.
//! Standing on a block node long enough starts it breathing; during red, a
//! player out in the open who moves at all is eliminated.

use serde::{Deserialize, Serialize};

use super::light::LightPhase;
use super::obstacle::{ObstacleField, pulse_scale};
use super::track::{LIGHT_NODE, Track};
use crate::config::GameConfig;
use crate::input::HeldKeys;

/// Player identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    #[serde(rename = "player 1")]
    One,
    #[serde(rename = "player 2")]
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerId::One => "player 1",
            PlayerId::Two => "player 2",
        }
    }
}

/// Why a player was knocked out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EliminationCause {
    /// Standing in the open when the light turned red
    CaughtByRedLight,
    /// Pressed a key or drifted to another node while exposed during red
    MovedDuringRed,
}

impl EliminationCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            EliminationCause::CaughtByRedLight => "caught by red light",
            EliminationCause::MovedDuringRed => "moved during red light",
        }
    }
}

/// The block node a player is currently standing on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockContact {
    pub obstacle_id: u32,
    pub node: u32,
    /// Seconds spent on this node before it started breathing
    pub time_on: f32,
    pub breathing: bool,
    /// Player's own pulse timer
    pub breathing_timer: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Continuous track position (node units, not wrapped)
    pub position: f32,
    /// Nodes per second, positive = clockwise
    pub velocity: f32,
    pub start_node: u32,
    pub alive: bool,
    /// Set once, when the player is eliminated
    pub eliminated_by: Option<EliminationCause>,
    /// Sum of absolute movement, in nodes
    pub total_distance: f32,
    /// Node occupied at the end of the previous update
    pub last_node: u32,
    pub contact: Option<BlockContact>,
}

impl Player {
    pub fn new(id: PlayerId, start_node: u32) -> Self {
        Self {
            id,
            position: start_node as f32,
            velocity: 0.0,
            start_node,
            alive: true,
            eliminated_by: None,
            total_distance: 0.0,
            last_node: start_node,
            contact: None,
        }
    }

    /// Discretized node under the player
    #[inline]
    pub fn node(&self, track: &Track) -> u32 {
        track.node_at(self.position)
    }

    /// Standing on any live obstacle node
    pub fn is_hidden(&self, obstacles: &ObstacleField, track: &Track) -> bool {
        obstacles.covers(self.node(track))
    }

    /// Reached the opponent's start after covering enough ground
    pub fn check_win(&self, other: &Player, track: &Track, config: &GameConfig) -> bool {
        self.node(track) == other.start_node && self.total_distance >= config.win_distance()
    }

    pub fn is_breathing(&self) -> bool {
        self.contact.is_some_and(|c| c.breathing)
    }

    /// Renderer scale hint
    pub fn pulse_scale(&self) -> f32 {
        match self.contact {
            Some(c) => pulse_scale(c.breathing, c.breathing_timer),
            None => 1.0,
        }
    }

    /// Knock the player out; the first cause sticks
    pub fn eliminate(&mut self, cause: EliminationCause) {
        if self.alive {
            self.alive = false;
            self.eliminated_by = Some(cause);
            log::debug!("{} {}", self.id.name(), cause.as_str());
        }
    }

    /// Advance this player by one tick.
    ///
    /// Returns the cause if the player was eliminated during this update.
    pub fn update(
        &mut self,
        dt: f32,
        phase: LightPhase,
        obstacles: &mut ObstacleField,
        keys: HeldKeys,
        track: &Track,
        config: &GameConfig,
    ) -> Option<EliminationCause> {
        if !self.alive {
            return None;
        }

        let node = self.node(track);
        self.track_block_contact(node, dt, obstacles, config);

        // Out in the open during red: freeze or die
        if phase == LightPhase::Red && !obstacles.covers(node) {
            if keys.any() || node != self.last_node {
                self.eliminate(EliminationCause::MovedDuringRed);
                return self.eliminated_by;
            }
            self.velocity *= config.red_damping;
            return None;
        }

        self.integrate(dt, keys, node, track, config);
        None
    }

    /// Occupancy bookkeeping for block breathing
    fn track_block_contact(
        &mut self,
        node: u32,
        dt: f32,
        obstacles: &mut ObstacleField,
        config: &GameConfig,
    ) {
        let here = obstacles
            .locate(node)
            .map(|(id, n)| (id, n.breathing, n.breathing_timer));

        // Stepped off the tracked node, or it was destroyed under us
        if let Some(contact) = self.contact {
            let same =
                here.is_some_and(|(id, ..)| id == contact.obstacle_id) && node == contact.node;
            if !same {
                if let Some(prev) = obstacles.node_mut(contact.obstacle_id, contact.node) {
                    prev.calm();
                }
                self.contact = None;
            }
        }

        match (here, self.contact.as_mut()) {
            (Some((obstacle_id, node_breathing, _)), Some(contact)) => {
                if !contact.breathing && !node_breathing {
                    contact.time_on += dt;
                    if contact.time_on >= config.block_trigger_time {
                        contact.breathing = true;
                        contact.breathing_timer = 0.0;
                        if let Some(block) = obstacles.node_mut(obstacle_id, node) {
                            block.breathing = true;
                            block.breathing_timer = 0.0;
                        }
                        log::debug!(
                            "{} started block {} breathing at node {}",
                            self.id.name(),
                            obstacle_id,
                            node
                        );
                    }
                }
            }
            (Some((obstacle_id, node_breathing, node_timer)), None) => {
                self.contact = Some(BlockContact {
                    obstacle_id,
                    node,
                    time_on: 0.0,
                    breathing: node_breathing,
                    breathing_timer: node_timer,
                });
            }
            (None, _) => self.contact = None,
        }

        if let Some(contact) = self.contact.as_mut() {
            if contact.breathing {
                contact.breathing_timer += dt;
            }
        }
    }

    /// Acceleration, inertia, speed cap and the wall at the traffic light
    fn integrate(
        &mut self,
        dt: f32,
        keys: HeldKeys,
        node: u32,
        track: &Track,
        config: &GameConfig,
    ) {
        let accel = keys.direction() * config.accel;
        self.velocity += accel * dt;
        self.velocity *= config.inertia;
        self.velocity = self.velocity.clamp(-config.max_speed, config.max_speed);

        let old_position = self.position;
        let mut new_position = old_position + self.velocity * dt;

        // The light node is a wall: reject the whole step
        if node != LIGHT_NODE && track.path_crosses(old_position, new_position, LIGHT_NODE) {
            new_position = old_position;
            self.velocity = 0.0;
        }

        self.position = new_position;
        self.total_distance += (new_position - old_position).abs();
        self.last_node = self.node(track);
    }
}
