//! Traffic light state machine
//!
//! Purely time-driven: GREEN -> YELLOW -> RED -> GREEN, forever. Each phase
//! lasts a random duration drawn when the phase is entered.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{DurationRange, GameConfig};

/// Light phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightPhase {
    /// Free movement
    Green,
    /// Warning phase (rendered as a breathing green); movement still allowed
    Yellow,
    /// Anyone exposed who moves is eliminated
    Red,
}

impl LightPhase {
    /// Phase that follows this one
    pub fn next(self) -> Self {
        match self {
            LightPhase::Green => LightPhase::Yellow,
            LightPhase::Yellow => LightPhase::Red,
            LightPhase::Red => LightPhase::Green,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightPhase::Green => "green",
            LightPhase::Yellow => "yellow",
            LightPhase::Red => "red",
        }
    }

    fn range(self, config: &GameConfig) -> DurationRange {
        match self {
            LightPhase::Green => config.green,
            LightPhase::Yellow => config.yellow,
            LightPhase::Red => config.red,
        }
    }

    /// Length of the audio cue that loops during this phase
    fn cue_length(self, config: &GameConfig) -> f32 {
        match self {
            LightPhase::Green => config.audio_crossing_duration,
            LightPhase::Yellow | LightPhase::Red => config.audio_waiting_duration,
        }
    }

    /// Draw a fresh duration (seconds) for this phase
    pub fn draw_duration<R: Rng + ?Sized>(self, config: &GameConfig, rng: &mut R) -> f32 {
        let range = self.range(config);
        let ms = rng.random_range(range.min_ms as f32..=range.max_ms as f32);
        let secs = ms / 1000.0;
        if config.audio_sync {
            // Whole cue loops only, at least one
            let cue = self.cue_length(config);
            (secs / cue).round().max(1.0) * cue
        } else {
            secs
        }
    }
}

/// The traffic light at node 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficLight {
    pub phase: LightPhase,
    /// Seconds spent in the current phase
    pub timer: f32,
    /// Seconds the current phase lasts
    pub duration: f32,
}

impl TrafficLight {
    pub fn new(phase: LightPhase, duration: f32) -> Self {
        Self {
            phase,
            timer: 0.0,
            duration,
        }
    }

    /// Fresh green light with a random duration
    pub fn green<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        Self::new(LightPhase::Green, LightPhase::Green.draw_duration(config, rng))
    }

    /// Accumulate `dt` and switch phase if the current one has run out.
    ///
    /// At most one transition happens per call. Returns the entered phase.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<LightPhase> {
        self.timer += dt;
        if self.timer < self.duration {
            return None;
        }

        let next = self.phase.next();
        self.phase = next;
        self.duration = next.draw_duration(config, rng);
        self.timer = 0.0;
        log::debug!("Light -> {} for {:.2}s", next.as_str(), self.duration);
        Some(next)
    }

    /// Seconds left before the next transition
    pub fn remaining(&self) -> f32 {
        (self.duration - self.timer).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn unsynced() -> GameConfig {
        GameConfig {
            audio_sync: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_cycle_order() {
        let config = unsynced();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut light = TrafficLight::green(&config, &mut rng);

        let mut seen = Vec::new();
        for _ in 0..6 {
            // Each phase lasts at most 5s, so 10s always triggers exactly one switch
            let entered = light.advance(10.0, &config, &mut rng);
            seen.push(entered.unwrap());
        }
        assert_eq!(
            seen,
            vec![
                LightPhase::Yellow,
                LightPhase::Red,
                LightPhase::Green,
                LightPhase::Yellow,
                LightPhase::Red,
                LightPhase::Green,
            ]
        );
    }

    #[test]
    fn test_waits_for_duration() {
        let config = unsynced();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut light = TrafficLight::new(LightPhase::Green, 1.0);

        assert_eq!(light.advance(0.4, &config, &mut rng), None);
        assert_eq!(light.advance(0.4, &config, &mut rng), None);
        assert_eq!(light.advance(0.2, &config, &mut rng), Some(LightPhase::Yellow));
        assert_eq!(light.timer, 0.0);
    }

    #[test]
    fn test_duration_within_bounds() {
        let config = unsynced();
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..200 {
            let d = LightPhase::Red.draw_duration(&config, &mut rng);
            assert!((2.0..=5.0).contains(&d), "red duration {d} out of range");
            let d = LightPhase::Yellow.draw_duration(&config, &mut rng);
            assert!((2.0..=4.0).contains(&d), "yellow duration {d} out of range");
        }
    }

    #[test]
    fn test_duration_snaps_to_cue() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        for phase in [LightPhase::Green, LightPhase::Yellow, LightPhase::Red] {
            let cue = phase.cue_length(&config);
            for _ in 0..50 {
                let d = phase.draw_duration(&config, &mut rng);
                let loops = d / cue;
                assert!((loops - loops.round()).abs() < 1e-3);
                assert!(loops.round() >= 1.0);
            }
        }
    }

    #[test]
    fn test_snap_floors_at_one_loop() {
        let config = GameConfig {
            green: DurationRange::new(10, 10),
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let d = LightPhase::Green.draw_duration(&config, &mut rng);
        assert!((d - config.audio_crossing_duration).abs() < 1e-6);
    }
}
