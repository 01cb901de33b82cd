//! Scripted player for demos and headless runs
//!
//! Races toward the opponent's start on green, dives for the nearest block
//! ahead on yellow, and stays frozen in the open on red.

use super::light::LightPhase;
use super::player::PlayerId;
use super::state::Round;
use crate::input::HeldKeys;

/// How far ahead (in nodes) the autopilot looks for a block to coast onto
const BLOCK_LOOKAHEAD: i64 = 3;

/// Speed (nodes/s) below which a hidden autopilot stops braking
const BRAKE_THRESHOLD: f32 = 0.5;

/// Pick this tick's keys for `id`
pub fn autopilot(round: &Round, id: PlayerId) -> HeldKeys {
    let player = round.player(id);
    if !round.is_in_progress() || !player.alive {
        return HeldKeys::NONE;
    }

    let track = &round.track;
    // Starting clockwise of the light means racing clockwise
    let heading: f32 = if player.start_node == track.clockwise_start() {
        1.0
    } else {
        -1.0
    };
    let toward = if heading > 0.0 { HeldKeys::right() } else { HeldKeys::left() };
    let brake = if heading > 0.0 { HeldKeys::left() } else { HeldKeys::right() };

    let node = player.node(track);
    let hidden = round.obstacles.covers(node);
    let moving_forward = player.velocity * heading > BRAKE_THRESHOLD;

    match round.light.phase {
        LightPhase::Green => toward,
        LightPhase::Yellow | LightPhase::Red if hidden => {
            if moving_forward { brake } else { HeldKeys::NONE }
        }
        LightPhase::Yellow => {
            let block_ahead = (1..=BLOCK_LOOKAHEAD).any(|step| {
                let ahead = track.wrap(node as i64 + step * heading as i64);
                round.obstacles.covers(ahead)
            });
            if block_ahead { HeldKeys::NONE } else { toward }
        }
        // Exposed on red: any key is fatal
        LightPhase::Red => HeldKeys::NONE,
    }
}
