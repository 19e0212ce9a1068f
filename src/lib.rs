//! Space Invaders - a fixed-formation shoot-em-up simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (formation march, combat, phase machine)
//! - `audio`: Sound cue mapping for the frontend audio layer
//! - `settings`: Runtime configuration loaded from JSON
//!
//! Rendering, audio playback and input polling live outside this crate. The
//! frontend feeds [`sim::TickInput`] plus a millisecond clock into
//! [`sim::tick`] once per frame and reacts to the returned events.

pub mod audio;
pub mod settings;
pub mod sim;

pub use audio::SoundEffect;
pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    use glam::IVec2;

    /// Frontend frame rate; the core advances one tick per frame
    pub const TICK_RATE_HZ: u32 = 60;
    /// Maximum ticks the headless driver runs per wall-clock frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: i32 = 800;
    pub const SCREEN_HEIGHT: i32 = 600;

    /// Projectiles despawn once their top edge leaves [PROJECTILE_MIN_Y, PROJECTILE_MAX_Y]
    pub const PROJECTILE_MIN_Y: i32 = 15;
    pub const PROJECTILE_MAX_Y: i32 = 600;

    /// Player ship
    pub const SHIP_START: IVec2 = IVec2::new(375, 540);
    pub const SHIP_SIZE: IVec2 = IVec2::new(50, 48);
    pub const SHIP_SPEED: i32 = 5;
    pub const SHIP_MIN_X: i32 = 10;
    pub const SHIP_MAX_X: i32 = 740;
    /// Delay between a ship being destroyed and its replacement appearing
    pub const SHIP_RESPAWN_MS: u64 = 900;
    pub const STARTING_LIVES: u8 = 3;

    /// Player laser
    pub const PLAYER_SHOT_SIZE: IVec2 = IVec2::new(5, 15);
    pub const PLAYER_SHOT_SPEED: i32 = 15;
    pub const PLAYER_SHOT_OFFSET: IVec2 = IVec2::new(23, 5);
    /// Player shots allowed in flight at once
    pub const MAX_PLAYER_SHOTS: usize = 4;

    /// Alien laser
    pub const ALIEN_SHOT_SIZE: IVec2 = IVec2::new(5, 15);
    pub const ALIEN_SHOT_SPEED: i32 = 5;
    pub const ALIEN_SHOT_OFFSET: IVec2 = IVec2::new(14, 20);
    pub const ALIEN_FIRE_INTERVAL_MS: u64 = 700;

    /// Formation grid
    pub const FORMATION_ROWS: usize = 5;
    pub const FORMATION_COLUMNS: usize = 10;
    pub const ALIEN_SIZE: IVec2 = IVec2::new(40, 35);
    pub const FORMATION_LEFT: i32 = 157;
    pub const ALIEN_SPACING: IVec2 = IVec2::new(50, 45);
    /// Starting altitude of a new game's first round
    pub const DEFAULT_ALTITUDE: i32 = 65;
    /// Each cleared round starts the next formation this much lower
    pub const ROUND_ALTITUDE_STEP: i32 = 35;

    /// March algorithm
    pub const BASE_STEP_BUDGET: u32 = 30;
    /// The formation spawns centred, halfway through its first sweep
    pub const INITIAL_STEP_COUNTER: u32 = 15;
    pub const STEP_DISTANCE: i32 = 10;
    pub const DROP_DISTANCE: i32 = 35;
    pub const ADD_MOVE_PER_COLUMN: u32 = 5;
    pub const BASE_STEP_INTERVAL_MS: u64 = 600;
    pub const FEW_ALIENS_STEP_INTERVAL_MS: u64 = 400;
    pub const LAST_ALIEN_STEP_INTERVAL_MS: u64 = 200;
    /// Alive count at or below which the formation speeds up
    pub const FEW_ALIENS_THRESHOLD: usize = 10;

    /// Points per formation row
    pub const ROW_POINTS: [u32; FORMATION_ROWS] = [30, 20, 20, 10, 10];
    /// Possible bonus target awards
    pub const BONUS_POINTS: [u32; 4] = [50, 100, 150, 300];

    /// Bonus target
    pub const BONUS_SIZE: IVec2 = IVec2::new(75, 35);
    pub const BONUS_START: IVec2 = IVec2::new(-80, 45);
    pub const BONUS_INTERVAL_MS: u64 = 25_000;
    pub const BONUS_SPEED: i32 = 2;
    /// Traversal turns around past these x positions
    pub const BONUS_TURN_RIGHT_X: i32 = 830;
    pub const BONUS_TURN_LEFT_X: i32 = -90;
    /// The bonus keeps moving only while inside these limits
    pub const BONUS_LIMIT_RIGHT_X: i32 = 840;
    pub const BONUS_LIMIT_LEFT_X: i32 = -100;

    /// Shields
    pub const SHIELD_CLUSTERS: usize = 4;
    pub const SHIELD_ROWS: usize = 4;
    pub const SHIELD_COLUMNS: usize = 9;
    pub const SHIELD_BLOCK_SIZE: i32 = 10;
    pub const SHIELD_ORIGIN: IVec2 = IVec2::new(50, 450);
    pub const SHIELD_CLUSTER_SPACING: i32 = 200;

    /// Explosion lifetimes
    pub const ALIEN_EXPLOSION_SWAP_MS: u64 = 100;
    pub const ALIEN_EXPLOSION_ENLARGED_MS: u64 = 200;
    pub const ALIEN_EXPLOSION_MS: u64 = 400;
    pub const SHIP_EXPLOSION_SHOW_MS: u64 = 300;
    pub const SHIP_EXPLOSION_HIDE_MS: u64 = 600;
    pub const SHIP_EXPLOSION_MS: u64 = 900;
    pub const MYSTERY_EXPLOSION_MS: u64 = 600;

    /// Phase timings
    pub const ROUND_TRANSITION_MS: u64 = 3000;
    pub const GAME_OVER_MS: u64 = 3000;

    /// HUD life indicator slots (x positions, rightmost removed first)
    pub const LIFE_SLOTS_X: [i32; 3] = [715, 742, 769];
    pub const LIFE_SLOT_Y: i32 = 3;
}
