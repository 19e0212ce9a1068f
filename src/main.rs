//! Headless attract-mode driver
//!
//! Runs the simulation on a simulated clock with the demo pilot at the
//! controls and reports what happened. Usage: `space-invaders [settings.json]`

use std::path::PathBuf;

use space_invaders::audio;
use space_invaders::consts::{MAX_SUBSTEPS, TICK_RATE_HZ};
use space_invaders::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use space_invaders::{Settings, SoundEffect};

/// Simulated frontend frame length (a slightly slow 60 Hz display)
const FRAME_MS: f64 = 17.0;

#[derive(Debug, Default)]
struct RunStats {
    ticks: u64,
    games: u32,
    best_score: u64,
    aliens_killed: u32,
    bonus_kills: u32,
    ships_lost: u32,
    rounds_cleared: u32,
    cues: u32,
}

impl RunStats {
    fn record(&mut self, events: &[GameEvent], state: &GameState) {
        for event in events {
            match event {
                GameEvent::AlienKilled { .. } => self.aliens_killed += 1,
                GameEvent::BonusKilled { points } => {
                    self.bonus_kills += 1;
                    log::info!("Mystery ship hit for {} points", points);
                }
                GameEvent::ShipDestroyed { lives_left } => {
                    self.ships_lost += 1;
                    log::info!("Ship lost, {} lives left", lives_left);
                }
                GameEvent::PhaseChanged { to, .. } => match to {
                    GamePhase::Playing if state.round == 1 => self.games += 1,
                    GamePhase::RoundTransition => self.rounds_cleared += 1,
                    _ => {}
                },
                _ => {}
            }
        }
        self.cues += audio::cues(events).len() as u32;
        self.best_score = self.best_score.max(state.score);
    }
}

fn main() {
    env_logger::init();
    log::info!("Space Invaders (headless) starting...");

    let path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(path.as_deref());
    let run_ms = f64::from(settings.run_seconds) * 1000.0;
    let input = TickInput {
        autopilot: settings.autopilot,
        ..Default::default()
    };

    let mut state = GameState::new(settings);
    let mut stats = RunStats::default();
    let sim_dt = 1000.0 / f64::from(TICK_RATE_HZ);
    let mut accumulator = 0.0;
    let mut sim_time = 0.0;
    let mut wall_time = 0.0;

    while wall_time < run_ms {
        wall_time += FRAME_MS;
        accumulator += FRAME_MS;

        let mut substeps = 0;
        while accumulator >= sim_dt && substeps < MAX_SUBSTEPS {
            sim_time += sim_dt;
            let result = tick(&mut state, &input, sim_time as u64);
            if result.events.iter().any(|e| SoundEffect::for_event(e) == Some(SoundEffect::MysteryEntered)) {
                log::debug!("Mystery ship entering at {} ms", sim_time as u64);
            }
            stats.record(&result.events, &state);
            stats.ticks += 1;
            accumulator -= sim_dt;
            substeps += 1;
        }
    }

    println!("Simulated {:.1} s in {} ticks", wall_time / 1000.0, stats.ticks);
    println!("Games started:   {}", stats.games);
    println!("Rounds cleared:  {}", stats.rounds_cleared);
    println!("Aliens killed:   {}", stats.aliens_killed);
    println!("Mystery kills:   {}", stats.bonus_kills);
    println!("Ships lost:      {}", stats.ships_lost);
    println!("Sound cues:      {}", stats.cues);
    println!("Best score:      {}", stats.best_score);
    println!("Final phase:     {:?} (score {}, lives {})", state.phase, state.score, state.lives);
}
