//! Per-frame simulation tick
//!
//! The phase machine: MainMenu -> Playing -> RoundTransition <-> Playing ->
//! GameOver -> MainMenu. Within Playing, entities advance first, combat
//! resolves second, and round/game-over conditions are checked last.

use super::collision;
use super::events::{EventSink, GameEvent};
use super::state::{GamePhase, GameState, Projectile, Side};
use crate::consts::*;

/// Input state for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Move left (held)
    pub left: bool,
    /// Move right (held)
    pub right: bool,
    /// Fire pressed this frame
    pub fire: bool,
    /// Any key pressed this frame (menu)
    pub any_key: bool,
    /// Demo mode - the core steers the ship itself
    pub autopilot: bool,
}

/// What happened during a tick
#[derive(Debug)]
pub struct TickResult {
    pub events: Vec<GameEvent>,
    /// Phase after the tick
    pub phase: GamePhase,
}

/// Per-tick context handed to the phase handlers
struct TickContext {
    input: TickInput,
    now: u64,
    events: EventSink,
}

/// Advance the game by one frame at clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> TickResult {
    let now = state.advance_clock(now_ms);
    let mut input = input.clone();
    if input.autopilot {
        drive_autopilot(state, &mut input);
    }
    let mut ctx = TickContext {
        input,
        now,
        events: EventSink::default(),
    };

    match state.phase {
        GamePhase::MainMenu => {
            if ctx.input.any_key {
                state.start_game(now);
                enter_phase(state, GamePhase::Playing, &mut ctx);
            }
        }
        GamePhase::Playing => update_playing(state, &mut ctx),
        GamePhase::RoundTransition => {
            if state.phase_elapsed(now) >= ROUND_TRANSITION_MS {
                state.next_round(now);
                enter_phase(state, GamePhase::Playing, &mut ctx);
            }
        }
        GamePhase::GameOver => {
            if state.phase_elapsed(now) >= GAME_OVER_MS {
                state.reset_altitude();
                enter_phase(state, GamePhase::MainMenu, &mut ctx);
            }
        }
    }

    TickResult {
        events: ctx.events.take(),
        phase: state.phase,
    }
}

fn enter_phase(state: &mut GameState, to: GamePhase, ctx: &mut TickContext) {
    let from = state.phase;
    state.phase = to;
    state.phase_started_at = ctx.now;
    log::info!("Phase {:?} -> {:?} (score {}, lives {})", from, to, state.score, state.lives);
    ctx.events.push(GameEvent::PhaseChanged { from, to });
}

fn update_playing(state: &mut GameState, ctx: &mut TickContext) {
    let now = ctx.now;

    if let Some(index) = state.music.update(now, state.formation.step_interval()) {
        ctx.events.push(GameEvent::MarchNote { index });
    }

    // Player fire and movement; nothing to control while the ship is down
    if let Some(ship) = state.ship.as_mut() {
        if ctx.input.fire && state.player_shots.len() < state.settings.max_player_shots {
            state.player_shots.push(Projectile::from_ship(ship));
            ctx.events.push(GameEvent::ShotFired { side: Side::Player });
        }
        ship.steer(ctx.input.left, ctx.input.right);
    }

    state.formation.step(now);
    state.player_shots.retain_mut(Projectile::advance);
    state.alien_shots.retain_mut(Projectile::advance);
    if state.bonus.update(now) {
        ctx.events.push(GameEvent::BonusEntered);
    }
    state.explosions.retain(|explosion| !explosion.expired(now));

    collision::resolve(state, now, &mut ctx.events);

    if state.respawn_ship(now) {
        log::debug!("Replacement ship ready");
    }
    state.formation.refresh_step_interval();

    if !state.formation.is_empty() && state.alien_fire.due(now) {
        if let Some(shooter) = state.formation.random_bottom_alien(&mut state.rng) {
            state.alien_shots.push(Projectile::from_alien(shooter));
            state.alien_fire.restart(now);
            ctx.events.push(GameEvent::ShotFired { side: Side::Alien });
        }
    }

    if state.game_over {
        enter_phase(state, GamePhase::GameOver, ctx);
    } else if state.formation.is_empty() {
        enter_phase(state, GamePhase::RoundTransition, ctx);
    }
}

/// Demo player: line up under the nearest front-row alien and shoot
fn drive_autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::MainMenu => input.any_key = true,
        GamePhase::Playing => {
            let Some(ship) = state.ship.as_ref() else {
                return;
            };
            let cannon = ship.pos.x + PLAYER_SHOT_OFFSET.x;
            let target = state
                .formation
                .alive_columns()
                .iter()
                .filter_map(|&column| state.formation.bottom_alien(column))
                .map(|alien| alien.rect().center().x)
                .min_by_key(|x| (x - cannon).abs());

            if let Some(target) = target {
                let error = target - cannon;
                input.left = error < -SHIP_SPEED;
                input.right = error > SHIP_SPEED;
                // Alternate frames so each press is a fresh shot
                input.fire = error.abs() <= ALIEN_SIZE.x / 2 && state.now_ms / 16 % 2 == 0;
            }
        }
        GamePhase::RoundTransition | GamePhase::GameOver => {}
    }
}
