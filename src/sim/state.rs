//! Round state
//!
//! A [`Round`] owns everything one race needs: the light, the obstacles, both
//! players, the seeded RNG and the outcome. Nothing lives outside it.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::light::{LightPhase, TrafficLight};
use super::obstacle::{ExpiredNode, ObstacleField};
use super::player::{EliminationCause, Player, PlayerId};
use super::snapshot::RoundSnapshot;
use super::track::{LIGHT_NODE, Track};
use crate::config::{ConfigError, GameConfig};
use crate::input::TickInput;

/// Lifecycle of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// Who won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "draw")]
    Draw,
    #[serde(untagged)]
    Player(PlayerId),
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::Draw => "draw",
            Winner::Player(id) => id.name(),
        }
    }
}

/// Final result of a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    /// Human-readable, lowercase
    pub reason: String,
}

/// Something that happened during a tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    RoundStarted { seed: u64 },
    LightChanged { phase: LightPhase },
    ObstaclesRegenerated { count: usize, pixels: usize, budget: u32 },
    ObstacleNodeExpired(ExpiredNode),
    PlayerEliminated { player: PlayerId, cause: EliminationCause },
    RoundFinished(Outcome),
}

/// Complete state of one round
#[derive(Debug, Clone)]
pub struct Round {
    pub(crate) config: GameConfig,
    pub track: Track,
    pub status: RoundStatus,
    pub light: TrafficLight,
    pub obstacles: ObstacleField,
    /// Indexed by [`PlayerId::index`]
    pub players: [Player; 2],
    pub outcome: Option<Outcome>,
    /// Seconds since the round started
    pub time: f32,
    /// Ticks since the round started
    pub ticks: u64,
    seed: u64,
    pub(crate) rng: Pcg32,
    /// Events not yet handed to collaborators
    pending: Vec<GameEvent>,
}

impl Round {
    /// Create a round that has not started yet
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected config: {}", e);
            return Err(e);
        }

        let track = Track::new(config.track_len);
        let players = [
            Player::new(PlayerId::One, track.clockwise_start()),
            Player::new(PlayerId::Two, track.counterclockwise_start()),
        ];
        Ok(Self {
            track,
            status: RoundStatus::NotStarted,
            light: TrafficLight::new(LightPhase::Green, 0.0),
            obstacles: ObstacleField::new(config.obstacle_starting_pixels),
            players,
            outcome: None,
            time: 0.0,
            ticks: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pending: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == RoundStatus::InProgress
    }

    /// Start (or restart) the round.
    ///
    /// Config is checked before anything is touched. Players are randomly
    /// assigned to the two nodes beside the light.
    pub fn start(&mut self) -> Result<(), ConfigError> {
        self.config.validate()?;

        let (cw, ccw) = (self.track.clockwise_start(), self.track.counterclockwise_start());
        let (start1, start2) = if self.rng.random_bool(0.5) { (cw, ccw) } else { (ccw, cw) };
        self.players = [
            Player::new(PlayerId::One, start1),
            Player::new(PlayerId::Two, start2),
        ];

        self.outcome = None;
        self.time = 0.0;
        self.ticks = 0;
        self.pending.clear();
        self.light = TrafficLight::green(&self.config, &mut self.rng);
        self.obstacles = ObstacleField::new(self.config.obstacle_starting_pixels);
        self.status = RoundStatus::InProgress;

        self.emit(GameEvent::RoundStarted { seed: self.seed });
        self.emit(GameEvent::LightChanged {
            phase: LightPhase::Green,
        });
        self.regenerate_obstacles();

        log::info!(
            "Round started: player 1 at node {}, player 2 at node {}, green for {:.2}s",
            start1,
            start2,
            self.light.duration
        );
        Ok(())
    }

    /// Record the outcome and finish the round.
    ///
    /// Only the first call has any effect; returns whether this call won.
    pub fn end(&mut self, winner: Winner, reason: impl Into<String>) -> bool {
        if self.outcome.is_some() {
            return false;
        }
        let outcome = Outcome {
            winner,
            reason: reason.into(),
        };
        log::info!("Round over: {} ({})", outcome.winner.as_str(), outcome.reason);
        self.status = RoundStatus::Finished;
        self.outcome = Some(outcome.clone());
        self.emit(GameEvent::RoundFinished(outcome));
        true
    }

    /// Advance the round by one tick; see [`super::tick::tick`]
    pub fn tick(&mut self, dt: f32, input: &TickInput) -> RoundSnapshot {
        super::tick::tick(self, input, dt)
    }

    /// Nodes obstacles may never occupy
    pub fn forbidden_nodes(&self) -> [u32; 3] {
        [
            LIGHT_NODE,
            self.players[0].start_node,
            self.players[1].start_node,
        ]
    }

    /// Drain events emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.pending.push(event);
    }

    /// Place a fresh obstacle set against the current budget
    pub(crate) fn regenerate_obstacles(&mut self) {
        let forbidden = self.forbidden_nodes();
        self.obstacles
            .regenerate(&self.track, &forbidden, &self.config, &mut self.rng);
        self.emit(GameEvent::ObstaclesRegenerated {
            count: self.obstacles.blobs.len(),
            pixels: self.obstacles.pixel_count(),
            budget: self.obstacles.budget,
        });
    }

    /// Light just turned green: fewer hiding spots this time around
    pub(crate) fn on_green(&mut self) {
        self.obstacles
            .shrink_budget(self.config.obstacle_pixel_decrement);
        self.regenerate_obstacles();
    }

    /// Light just turned red: anyone standing in the open is out
    pub(crate) fn check_red_light_loss(&mut self) {
        let exposed = self
            .players
            .each_ref()
            .map(|p| p.alive && !p.is_hidden(&self.obstacles, &self.track));

        for (i, caught) in exposed.into_iter().enumerate() {
            if caught {
                let cause = EliminationCause::CaughtByRedLight;
                self.players[i].eliminate(cause);
                self.emit(GameEvent::PlayerEliminated {
                    player: self.players[i].id,
                    cause,
                });
            }
        }

        match exposed {
            [true, true] => {
                self.end(Winner::Draw, "both players caught by red light");
            }
            [true, false] => {
                self.end(Winner::Player(PlayerId::Two), "player 1 caught by red light");
            }
            [false, true] => {
                self.end(Winner::Player(PlayerId::One), "player 2 caught by red light");
            }
            [false, false] => {}
        }
    }

    /// Per-tick win/loss check; first matching condition wins
    pub(crate) fn evaluate_outcome(&mut self) {
        let [p1, p2] = &self.players;

        let result = match (p1.alive, p2.alive) {
            (false, false) => Some((Winner::Draw, "both players eliminated".to_string())),
            (false, true) => Some((Winner::Player(p2.id), elimination_reason(p1))),
            (true, false) => Some((Winner::Player(p1.id), elimination_reason(p2))),
            (true, true) => {
                let p1_wins = p1.check_win(p2, &self.track, &self.config);
                let p2_wins = p2.check_win(p1, &self.track, &self.config);
                match (p1_wins, p2_wins) {
                    (true, true) => {
                        Some((Winner::Draw, "both players reached the goal".to_string()))
                    }
                    (true, false) => Some((Winner::Player(p1.id), "reached the goal".to_string())),
                    (false, true) => Some((Winner::Player(p2.id), "reached the goal".to_string())),
                    (false, false) => None,
                }
            }
        };

        if let Some((winner, reason)) = result {
            self.end(winner, reason);
        }
    }
}

fn elimination_reason(loser: &Player) -> String {
    let cause = loser
        .eliminated_by
        .unwrap_or(EliminationCause::MovedDuringRed);
    format!("{} {}", loser.id.name(), cause.as_str())
}
