//! Red Light Ring entry point
//!
//! Runs a headless round with both players on autopilot and prints the final
//! snapshot as JSON.
//!
//! Usage: `redlight-ring [config.json] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    env_logger::init();
    log::info!("Red Light Ring (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match redlight_ring::GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => redlight_ring::GameConfig::default(),
    };

    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
        None => clock_seed(),
    };

    match headless::run(config, seed) {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize snapshot: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            log::error!("Invalid config: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive `Round` from their own frame loop
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use redlight_ring::audio::{CueDirector, LogCueSink};
    use redlight_ring::consts::{FRAME_DT, MAX_ROUND_SECS};
    use redlight_ring::sim::{PlayerId, autopilot};
    use redlight_ring::{ConfigError, GameConfig, Round, RoundSnapshot, TickInput};

    /// Play one autopilot round to completion (or the time limit)
    pub fn run(config: GameConfig, seed: u64) -> Result<RoundSnapshot, ConfigError> {
        let mut round = Round::new(config, seed)?;
        round.start()?;
        let dt = FRAME_DT.min(round.config().max_frame_dt);
        log::info!(
            "Round initialized with seed: {} ({} nodes)",
            round.seed(),
            round.config().track_len
        );

        let mut director = CueDirector::new();
        let mut sink = LogCueSink;
        let mut last = RoundSnapshot::drain(&mut round);
        for event in &last.events {
            director.handle(event, &mut sink);
        }

        while round.is_in_progress() && round.time < MAX_ROUND_SECS {
            let input = TickInput::new(
                autopilot(&round, PlayerId::One),
                autopilot(&round, PlayerId::Two),
            );
            last = round.tick(dt, &input);
            for event in &last.events {
                director.handle(event, &mut sink);
            }
        }

        if round.is_in_progress() {
            log::warn!("Round still running after {:.0}s, stopping", round.time);
            director.stop_all(&mut sink);
        }
        Ok(last)
    }
}
