//! Pure-data view of a round for renderers
//!
//! Everything a renderer needs to draw one frame, and nothing it could use to
//! mutate the simulation.

use serde::{Deserialize, Serialize};

use super::light::LightPhase;
use super::player::PlayerId;
use super::state::{GameEvent, Outcome, Round, RoundStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub index: u32,
    pub breathing: bool,
    /// Size multiplier (pulses while breathing)
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub nodes: Vec<NodeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub node: u32,
    pub alive: bool,
    pub breathing: bool,
    pub scale: f32,
}

/// One frame's worth of round state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub status: RoundStatus,
    pub track_len: u32,
    pub light: LightPhase,
    /// Seconds until the light changes
    pub light_remaining: f32,
    pub obstacles: Vec<ObstacleView>,
    pub players: [PlayerView; 2],
    /// Set once the round is finished
    pub outcome: Option<Outcome>,
    /// Events emitted since the previous snapshot
    pub events: Vec<GameEvent>,
}

impl RoundSnapshot {
    /// Capture the round without draining its events
    pub fn capture(round: &Round) -> Self {
        let obstacles = round
            .obstacles
            .blobs
            .iter()
            .map(|blob| ObstacleView {
                id: blob.id,
                nodes: blob
                    .nodes
                    .iter()
                    .map(|n| NodeView {
                        index: n.index,
                        breathing: n.breathing,
                        scale: n.pulse_scale(),
                    })
                    .collect(),
            })
            .collect();

        let players = round.players.each_ref().map(|p| PlayerView {
            id: p.id,
            node: p.node(&round.track),
            alive: p.alive,
            breathing: p.is_breathing(),
            scale: p.pulse_scale(),
        });

        Self {
            status: round.status,
            track_len: round.track.len,
            light: round.light.phase,
            light_remaining: round.light.remaining(),
            obstacles,
            players,
            outcome: round.outcome.clone(),
            events: Vec::new(),
        }
    }

    /// Capture the round and hand over its pending events
    pub fn drain(round: &mut Round) -> Self {
        let mut snapshot = Self::capture(round);
        snapshot.events = round.take_events();
        snapshot
    }

    pub fn player(&self, id: PlayerId) -> &PlayerView {
        &self.players[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::Winner;

    #[test]
    fn test_snapshot_mirrors_round() {
        let mut round = Round::new(GameConfig::default(), 21).unwrap();
        round.start().unwrap();

        let snapshot = RoundSnapshot::drain(&mut round);
        assert_eq!(snapshot.status, RoundStatus::InProgress);
        assert_eq!(snapshot.track_len, 80);
        assert_eq!(snapshot.light, LightPhase::Green);
        assert_eq!(snapshot.obstacles.len(), round.obstacles.blobs.len());
        assert_eq!(
            snapshot.player(PlayerId::One).node,
            round.players[0].start_node
        );
        assert!(snapshot.players.iter().all(|p| p.alive && p.scale == 1.0));
        assert!(snapshot.outcome.is_none());
        assert_eq!(snapshot.events.len(), 3);
        assert!(RoundSnapshot::drain(&mut round).events.is_empty());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut round = Round::new(GameConfig::default(), 21).unwrap();
        round.start().unwrap();
        round.end(Winner::Draw, "both players eliminated");

        let json = serde_json::to_value(RoundSnapshot::capture(&round)).unwrap();
        assert_eq!(json["status"], "finished");
        assert_eq!(json["light"], "green");
        assert_eq!(json["outcome"]["winner"], "draw");
        assert_eq!(json["players"][1]["id"], "player 2");
    }
}
