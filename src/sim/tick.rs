//! Per-tick round update
//!
//! The order is fixed: light, obstacle decay, players, win/loss, snapshot.
//! Obstacle nodes expire before players look at them, so a player never
//! stands on a node that is both expired and still present.

use super::light::LightPhase;
use super::player::PlayerId;
use super::snapshot::RoundSnapshot;
use super::state::{GameEvent, Round};
use crate::input::TickInput;

/// Advance the round by `dt` seconds.
///
/// Does nothing (beyond returning a snapshot) unless the round is in
/// progress. If the red-light check ends the round, the rest of the tick is
/// skipped.
pub fn tick(round: &mut Round, input: &TickInput, dt: f32) -> RoundSnapshot {
    if !round.is_in_progress() {
        return RoundSnapshot::drain(round);
    }

    round.ticks += 1;
    round.time += dt;

    // Light
    if let Some(phase) = round.light.advance(dt, &round.config, &mut round.rng) {
        log::info!("Light turned {} at {:.2}s", phase.as_str(), round.time);
        round.emit(GameEvent::LightChanged { phase });
        match phase {
            LightPhase::Red => round.check_red_light_loss(),
            LightPhase::Green => round.on_green(),
            LightPhase::Yellow => {}
        }
        if !round.is_in_progress() {
            return RoundSnapshot::drain(round);
        }
    }
    let phase = round.light.phase;

    // Obstacle breathing decay
    let expired = round
        .obstacles
        .decay(dt, round.config.block_breathing_duration);
    for node in expired {
        round.emit(GameEvent::ObstacleNodeExpired(node));
    }

    // Players, always in ID order
    for id in PlayerId::ALL {
        let keys = input.players[id.index()];
        let eliminated = round.players[id.index()].update(
            dt,
            phase,
            &mut round.obstacles,
            keys,
            &round.track,
            &round.config,
        );
        if let Some(cause) = eliminated {
            log::info!("{} {}", id.name(), cause.as_str());
            round.emit(GameEvent::PlayerEliminated { player: id, cause });
        }
    }

    round.evaluate_outcome();
    RoundSnapshot::drain(round)
}
