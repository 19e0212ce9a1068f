//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clock supplied by the caller, one tick per frame
//! - Seeded RNG only
//! - Stable iteration order (grid order, spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod events;
pub mod formation;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CombatReport, resolve};
pub use events::{EventSink, GameEvent};
pub use formation::{AlienFormation, Cell, Step};
pub use rect::Rect;
pub use state::{
    Alien, BonusTarget, Explosion, ExplosionAppearance, ExplosionKind, GamePhase, GameState,
    MarchMusic, Projectile, ShieldBlock, Ship, Side, Timer,
};
pub use tick::{TickInput, TickResult, tick};
