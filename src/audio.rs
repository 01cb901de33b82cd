//! Audio cues
//!
//! Two looping cues: "crossing" while the light is green and "waiting"
//! otherwise. The simulation only reports light changes; [`CueDirector`]
//! turns them into start/stop calls on whatever [`CueSink`] plays sound.

use crate::sim::{GameEvent, LightPhase};

/// Looping cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Plays while players may cross (green)
    Crossing,
    /// Plays while the light is yellow or red
    Waiting,
}

impl AudioCue {
    pub fn for_phase(phase: LightPhase) -> Self {
        match phase {
            LightPhase::Green => AudioCue::Crossing,
            LightPhase::Yellow | LightPhase::Red => AudioCue::Waiting,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Crossing => "crossing",
            AudioCue::Waiting => "waiting",
        }
    }
}

/// Whatever actually plays the cues
pub trait CueSink {
    fn start(&mut self, cue: AudioCue);
    fn stop(&mut self, cue: AudioCue);
}

/// Sink that only logs; used by headless runs
#[derive(Debug, Default)]
pub struct LogCueSink;

impl CueSink for LogCueSink {
    fn start(&mut self, cue: AudioCue) {
        log::info!("Audio: start {}", cue.name());
    }

    fn stop(&mut self, cue: AudioCue) {
        log::info!("Audio: stop {}", cue.name());
    }
}

/// Keeps exactly one cue looping, in step with the light
#[derive(Debug, Default)]
pub struct CueDirector {
    playing: Option<AudioCue>,
    muted: bool,
}

impl CueDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playing(&self) -> Option<AudioCue> {
        self.playing
    }

    /// Mute/unmute; muting stops the current cue
    pub fn set_muted(&mut self, muted: bool, sink: &mut dyn CueSink) {
        self.muted = muted;
        if muted {
            self.stop_all(sink);
        }
    }

    /// React to one simulation event
    pub fn handle(&mut self, event: &GameEvent, sink: &mut dyn CueSink) {
        match event {
            GameEvent::LightChanged { phase } => self.switch_to(AudioCue::for_phase(*phase), sink),
            GameEvent::RoundFinished(_) => self.stop_all(sink),
            _ => {}
        }
    }

    pub fn stop_all(&mut self, sink: &mut dyn CueSink) {
        if let Some(cue) = self.playing.take() {
            sink.stop(cue);
        }
    }

    /// Start `cue` unless it is already looping
    fn switch_to(&mut self, cue: AudioCue, sink: &mut dyn CueSink) {
        if self.muted || self.playing == Some(cue) {
            return;
        }
        self.stop_all(sink);
        sink.start(cue);
        self.playing = Some(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Outcome, Winner};

    #[derive(Default)]
    struct RecordingSink {
        calls: Vec<(&'static str, AudioCue)>,
    }

    impl CueSink for RecordingSink {
        fn start(&mut self, cue: AudioCue) {
            self.calls.push(("start", cue));
        }

        fn stop(&mut self, cue: AudioCue) {
            self.calls.push(("stop", cue));
        }
    }

    fn changed(phase: LightPhase) -> GameEvent {
        GameEvent::LightChanged { phase }
    }

    #[test]
    fn test_cycle_switches_cues_idempotently() {
        let mut director = CueDirector::new();
        let mut sink = RecordingSink::default();

        for phase in [LightPhase::Green, LightPhase::Yellow, LightPhase::Red, LightPhase::Green] {
            director.handle(&changed(phase), &mut sink);
        }

        assert_eq!(
            sink.calls,
            vec![
                ("start", AudioCue::Crossing),
                ("stop", AudioCue::Crossing),
                ("start", AudioCue::Waiting),
                // Yellow -> red keeps the waiting loop running
                ("stop", AudioCue::Waiting),
                ("start", AudioCue::Crossing),
            ]
        );
    }

    #[test]
    fn test_round_end_stops_audio() {
        let mut director = CueDirector::new();
        let mut sink = RecordingSink::default();
        director.handle(&changed(LightPhase::Red), &mut sink);
        director.handle(
            &GameEvent::RoundFinished(Outcome {
                winner: Winner::Draw,
                reason: "both players eliminated".to_string(),
            }),
            &mut sink,
        );
        assert_eq!(director.playing(), None);
        assert_eq!(sink.calls.last(), Some(&("stop", AudioCue::Waiting)));
    }

    #[test]
    fn test_muted_director_stays_silent() {
        let mut director = CueDirector::new();
        let mut sink = RecordingSink::default();
        director.set_muted(true, &mut sink);
        director.handle(&changed(LightPhase::Green), &mut sink);
        assert!(sink.calls.is_empty());
    }
}
