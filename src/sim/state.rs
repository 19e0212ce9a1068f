//! Game state and core simulation types
//!
//! `GameState` owns every entity collection as its own typed container; the
//! tick and the combat passes borrow exactly the pieces they need.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::formation::AlienFormation;
use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for any key
    MainMenu,
    /// Active round
    Playing,
    /// Formation cleared, "Next Round" banner before the next wave
    RoundTransition,
    /// Blinking "Game Over" banner before returning to the menu
    GameOver,
}

/// A "due when now >= last + interval" deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Timestamp the interval is measured from (ms)
    pub last: u64,
    /// Interval length (ms)
    pub interval: u64,
}

impl Timer {
    pub fn started(now: u64, interval: u64) -> Self {
        Self { last: now, interval }
    }

    /// Milliseconds since the last event
    #[inline]
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last)
    }

    #[inline]
    pub fn due(&self, now: u64) -> bool {
        self.elapsed(now) >= self.interval
    }

    /// Measure the next interval from `now`
    pub fn restart(&mut self, now: u64) {
        self.last = now;
    }

    /// Measure the next interval from the end of this one (no drift)
    pub fn advance(&mut self) {
        self.last += self.interval;
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Alien,
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: IVec2,
    /// -1 travels up, +1 travels down
    pub direction: i32,
    /// Pixels per tick
    pub speed: i32,
    pub side: Side,
}

impl Projectile {
    /// Player laser leaving the ship's cannon
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            pos: ship.pos + PLAYER_SHOT_OFFSET,
            direction: -1,
            speed: PLAYER_SHOT_SPEED,
            side: Side::Player,
        }
    }

    /// Alien laser dropped below a shooter
    pub fn from_alien(alien: &Alien) -> Self {
        Self {
            pos: alien.pos + ALIEN_SHOT_OFFSET,
            direction: 1,
            speed: ALIEN_SHOT_SPEED,
            side: Side::Alien,
        }
    }

    pub fn rect(&self) -> Rect {
        let size = match self.side {
            Side::Player => PLAYER_SHOT_SIZE,
            Side::Alien => ALIEN_SHOT_SIZE,
        };
        Rect::new(self.pos, size)
    }

    /// Move one tick; returns false once the bolt has left the field
    pub fn advance(&mut self) -> bool {
        self.pos.y += self.speed * self.direction;
        (PROJECTILE_MIN_Y..=PROJECTILE_MAX_Y).contains(&self.pos.y)
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: IVec2,
}

impl Default for Ship {
    fn default() -> Self {
        Self { pos: SHIP_START }
    }
}

impl Ship {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, SHIP_SIZE)
    }

    /// Apply one tick of held movement keys
    pub fn steer(&mut self, left: bool, right: bool) {
        if left && self.pos.x > SHIP_MIN_X {
            self.pos.x -= SHIP_SPEED;
        }
        if right && self.pos.x < SHIP_MAX_X {
            self.pos.x += SHIP_SPEED;
        }
    }
}

/// One invader; lives only inside an [`AlienFormation`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alien {
    pub row: usize,
    pub column: usize,
    pub pos: IVec2,
    /// Animation frame (0 or 1), toggled on every formation step
    pub frame: u8,
}

impl Alien {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, ALIEN_SIZE)
    }

    /// Sprite family: row 0 is class 1, rows 1-2 class 2, rows 3-4 class 3
    pub fn sprite_class(&self) -> u8 {
        match self.row {
            0 => 1,
            1 | 2 => 2,
            _ => 3,
        }
    }

    pub fn points(&self) -> u32 {
        ROW_POINTS[self.row]
    }

    pub fn next_frame(&mut self) {
        self.frame = (self.frame + 1) % 2;
    }
}

/// The mystery ship crossing the top of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusTarget {
    pub pos: IVec2,
    pub direction: i32,
    /// Traversal starts once this interval has elapsed
    pub timer: Timer,
    /// Armed when the entry cue should fire on the next traversal
    pub play_sound: bool,
}

impl BonusTarget {
    /// A fresh target parked off the left edge
    pub fn new(now: u64) -> Self {
        Self {
            pos: BONUS_START,
            direction: 1,
            timer: Timer::started(now, BONUS_INTERVAL_MS),
            play_sound: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, BONUS_SIZE)
    }

    /// Advance one tick. Returns true when the target enters the field.
    pub fn update(&mut self, now: u64) -> bool {
        let due = self.timer.due(now);
        let mut entered = false;

        if due {
            if (self.pos.x < 0 || self.pos.x > SCREEN_WIDTH) && self.play_sound {
                entered = true;
                self.play_sound = false;
            }
            if self.direction == 1 && self.pos.x < BONUS_LIMIT_RIGHT_X {
                self.pos.x += BONUS_SPEED;
            }
            if self.direction == -1 && self.pos.x > BONUS_LIMIT_LEFT_X {
                self.pos.x -= BONUS_SPEED;
            }
        }

        let mut turned = false;
        if self.pos.x > BONUS_TURN_RIGHT_X {
            self.play_sound = true;
            self.direction = -1;
            turned = true;
        }
        if self.pos.x < BONUS_TURN_LEFT_X {
            self.play_sound = true;
            self.direction = 1;
            turned = true;
        }
        if due && turned {
            self.timer.restart(now);
        }

        entered
    }
}

/// One 10x10 cover block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldBlock {
    /// Which of the four shields this block belongs to
    pub cluster: usize,
    pub row: usize,
    pub column: usize,
    pub pos: IVec2,
}

impl ShieldBlock {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, IVec2::splat(SHIELD_BLOCK_SIZE))
    }
}

/// Build all four shields
pub fn build_shields() -> Vec<ShieldBlock> {
    let mut blocks = Vec::with_capacity(SHIELD_CLUSTERS * SHIELD_ROWS * SHIELD_COLUMNS);
    for cluster in 0..SHIELD_CLUSTERS {
        for row in 0..SHIELD_ROWS {
            for column in 0..SHIELD_COLUMNS {
                let pos = SHIELD_ORIGIN
                    + IVec2::new(
                        SHIELD_CLUSTER_SPACING * cluster as i32 + SHIELD_BLOCK_SIZE * column as i32,
                        SHIELD_BLOCK_SIZE * row as i32,
                    );
                blocks.push(ShieldBlock {
                    cluster,
                    row,
                    column,
                    pos,
                });
            }
        }
    }
    blocks
}

/// Explosion variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// Invader burst; the row picks the colour
    Alien { row: usize },
    /// Player ship wreck
    Ship,
    /// Mystery ship score popup
    Mystery { score: u32 },
}

/// What an explosion should look like at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionAppearance {
    Hidden,
    Normal,
    /// Scaled-up burst drawn 6 px up-left of the normal sprite
    Enlarged,
    Score(u32),
}

/// A short-lived effect entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub kind: ExplosionKind,
    pub pos: IVec2,
    pub spawned_at: u64,
}

impl Explosion {
    pub fn new(kind: ExplosionKind, pos: IVec2, now: u64) -> Self {
        Self {
            kind,
            pos,
            spawned_at: now,
        }
    }

    pub fn lifetime(&self) -> u64 {
        match self.kind {
            ExplosionKind::Alien { .. } => ALIEN_EXPLOSION_MS,
            ExplosionKind::Ship => SHIP_EXPLOSION_MS,
            ExplosionKind::Mystery { .. } => MYSTERY_EXPLOSION_MS,
        }
    }

    pub fn expired(&self, now: u64) -> bool {
        now.saturating_sub(self.spawned_at) > self.lifetime()
    }

    pub fn appearance(&self, now: u64) -> ExplosionAppearance {
        let passed = now.saturating_sub(self.spawned_at);
        match self.kind {
            ExplosionKind::Alien { .. } => match passed {
                0..=ALIEN_EXPLOSION_SWAP_MS => ExplosionAppearance::Normal,
                p if p <= ALIEN_EXPLOSION_ENLARGED_MS => ExplosionAppearance::Enlarged,
                _ => ExplosionAppearance::Hidden,
            },
            ExplosionKind::Ship => {
                if passed > SHIP_EXPLOSION_SHOW_MS && passed <= SHIP_EXPLOSION_HIDE_MS {
                    ExplosionAppearance::Normal
                } else {
                    ExplosionAppearance::Hidden
                }
            }
            ExplosionKind::Mystery { score } => {
                if passed <= 200 || (passed > 400 && passed <= MYSTERY_EXPLOSION_MS) {
                    ExplosionAppearance::Score(score)
                } else {
                    ExplosionAppearance::Hidden
                }
            }
        }
    }
}

/// Background march music: four notes cycled at the formation's pace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarchMusic {
    pub timer: Timer,
    pub note_index: u8,
}

impl MarchMusic {
    pub fn new(now: u64) -> Self {
        Self {
            timer: Timer::started(now, BASE_STEP_INTERVAL_MS),
            note_index: 0,
        }
    }

    /// Returns the note to play if one is due at `now`
    pub fn update(&mut self, now: u64, interval: u64) -> Option<u8> {
        self.timer.interval = interval;
        if !self.timer.due(now) {
            return None;
        }
        let note = self.note_index;
        self.note_index = (self.note_index + 1) % 4;
        self.timer.advance();
        Some(note)
    }
}

/// Complete game state: score, lives and every entity container
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// When the current phase was entered (ms)
    pub phase_started_at: u64,
    /// Latest clock value seen by `tick` (ms)
    pub now_ms: u64,
    pub score: u64,
    pub lives: u8,
    /// 1-based round number within the current game
    pub round: u32,
    /// Starting altitude of the current round's formation
    pub altitude: i32,
    /// None while destroyed
    pub ship: Option<Ship>,
    /// Pending replacement ship
    pub respawn: Option<Timer>,
    pub formation: AlienFormation,
    pub player_shots: Vec<Projectile>,
    pub alien_shots: Vec<Projectile>,
    pub bonus: BonusTarget,
    pub shields: Vec<ShieldBlock>,
    pub explosions: Vec<Explosion>,
    pub alien_fire: Timer,
    pub music: MarchMusic,
    /// Set by combat; consumed by the phase machine at the end of the tick
    pub game_over: bool,
}

impl GameState {
    /// Create a game sitting on the main menu
    pub fn new(settings: Settings) -> Self {
        let settings = settings.sanitized();
        Self {
            seed: settings.seed,
            rng: Pcg32::seed_from_u64(settings.seed),
            phase: GamePhase::MainMenu,
            phase_started_at: 0,
            now_ms: 0,
            score: 0,
            lives: settings.starting_lives,
            round: 0,
            altitude: DEFAULT_ALTITUDE,
            ship: Some(Ship::default()),
            respawn: None,
            formation: AlienFormation::new(DEFAULT_ALTITUDE, 0),
            player_shots: Vec::new(),
            alien_shots: Vec::new(),
            bonus: BonusTarget::new(0),
            shields: build_shields(),
            explosions: Vec::new(),
            alien_fire: Timer::started(0, settings.alien_fire_interval_ms),
            music: MarchMusic::new(0),
            game_over: false,
            settings,
        }
    }

    /// Feed the frontend clock, clamping anything that runs backwards
    pub fn advance_clock(&mut self, now_ms: u64) -> u64 {
        if now_ms < self.now_ms {
            log::debug!("Clock went backwards ({} < {}), clamping", now_ms, self.now_ms);
        }
        self.now_ms = self.now_ms.max(now_ms);
        self.now_ms
    }

    /// Milliseconds spent in the current phase
    pub fn phase_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.phase_started_at)
    }

    /// Fresh game: score, lives, altitude and shields all reset
    pub fn start_game(&mut self, now: u64) {
        self.score = 0;
        self.lives = self.settings.starting_lives;
        self.round = 1;
        self.altitude = DEFAULT_ALTITUDE;
        self.shields = build_shields();
        self.game_over = false;
        self.begin_round(now);
        log::info!("New game (seed {}, {} lives)", self.seed, self.lives);
    }

    /// Next round: score, lives and shields carry over, formation starts lower
    pub fn next_round(&mut self, now: u64) {
        self.round += 1;
        self.altitude += ROUND_ALTITUDE_STEP;
        self.begin_round(now);
        log::info!("Round {} at altitude {}", self.round, self.altitude);
    }

    /// Back to the menu; the next game starts at the default altitude
    pub fn reset_altitude(&mut self) {
        self.altitude = DEFAULT_ALTITUDE;
    }

    fn begin_round(&mut self, now: u64) {
        self.ship = Some(Ship::default());
        self.respawn = None;
        self.formation = AlienFormation::new(self.altitude, now);
        self.player_shots.clear();
        self.alien_shots.clear();
        self.bonus = BonusTarget::new(now);
        self.explosions.clear();
        self.alien_fire = Timer::started(now, self.settings.alien_fire_interval_ms);
        self.music = MarchMusic::new(now);
    }

    pub fn ship_alive(&self) -> bool {
        self.ship.is_some()
    }

    pub fn new_ship_pending(&self) -> bool {
        self.respawn.is_some()
    }

    /// Destroy the ship after a hit. Returns the lives left.
    pub fn lose_ship(&mut self, now: u64) -> u8 {
        if let Some(ship) = self.ship.take() {
            self.explosions
                .push(Explosion::new(ExplosionKind::Ship, ship.pos, now));
        }
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.game_over = true;
            self.respawn = None;
        } else {
            self.respawn = Some(Timer::started(now, SHIP_RESPAWN_MS));
        }
        self.lives
    }

    /// Spawn the replacement ship once its delay has passed
    pub fn respawn_ship(&mut self, now: u64) -> bool {
        match self.respawn {
            Some(timer) if timer.due(now) => {
                self.ship = Some(Ship::default());
                self.respawn = None;
                true
            }
            _ => false,
        }
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += u64::from(points);
    }

    /// HUD life icons still shown, leftmost first
    pub fn lives_indicators(&self) -> Vec<IVec2> {
        LIFE_SLOTS_X
            .iter()
            .take(usize::from(self.lives))
            .map(|&x| IVec2::new(x, LIFE_SLOT_Y))
            .collect()
    }

    /// "Next Round" banner
    pub fn round_banner_visible(&self) -> bool {
        self.phase == GamePhase::RoundTransition
    }

    /// "Game Over" banner, blinking on a fixed schedule
    pub fn game_over_banner_visible(&self, now: u64) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        matches!(self.phase_elapsed(now), 0..750 | 1500..2250)
    }

    /// Read-only JSON snapshot for the presentation layer
    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
