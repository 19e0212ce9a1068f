//! The invader formation and its stepped march
//!
//! The whole grid moves as one body on a shared step timer. Each sweep has a
//! step budget per direction; columns cleared from one edge add bonus steps to
//! that side, so a shrinking swarm reaches further toward the emptied edge.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Alien, Timer};
use crate::consts::*;

/// A grid slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Alive(Alien),
    Dead,
}

impl Cell {
    pub fn alien(&self) -> Option<&Alien> {
        match self {
            Cell::Alive(alien) => Some(alien),
            Cell::Dead => None,
        }
    }

    pub fn is_alive(&self) -> bool {
        matches!(self, Cell::Alive(_))
    }
}

/// What a formation step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved sideways by one step
    March,
    /// Hit the sweep budget: dropped down and turned around
    Reverse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienFormation {
    rows: usize,
    columns: usize,
    /// Row-major grid
    cells: Vec<Cell>,
    alive: usize,
    /// +1 marching right, -1 marching left
    direction: i32,
    right_moves: u32,
    left_moves: u32,
    right_add_move: u32,
    left_add_move: u32,
    step_counter: u32,
    step_timer: Timer,
    /// Total displacement since spawn
    offset: IVec2,
    /// Starting altitude of row 0
    altitude: i32,
    /// Columns holding at least one alien, ascending
    alive_columns: Vec<usize>,
    left_alive_column: usize,
    right_alive_column: usize,
    left_killed_columns: u32,
    right_killed_columns: u32,
}

impl AlienFormation {
    /// Standard 5x10 formation with row 0 at `altitude`
    pub fn new(altitude: i32, now: u64) -> Self {
        Self::with_size(FORMATION_ROWS, FORMATION_COLUMNS, altitude, now)
    }

    pub fn with_size(rows: usize, columns: usize, altitude: i32, now: u64) -> Self {
        assert!(rows > 0 && rows <= FORMATION_ROWS, "formation rows out of range: {rows}");
        assert!(columns > 0, "formation needs at least one column");

        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for column in 0..columns {
                let pos = IVec2::new(
                    FORMATION_LEFT + ALIEN_SPACING.x * column as i32,
                    altitude + ALIEN_SPACING.y * row as i32,
                );
                cells.push(Cell::Alive(Alien {
                    row,
                    column,
                    pos,
                    frame: 0,
                }));
            }
        }

        Self {
            rows,
            columns,
            cells,
            alive: rows * columns,
            direction: 1,
            right_moves: BASE_STEP_BUDGET,
            left_moves: BASE_STEP_BUDGET,
            right_add_move: 0,
            left_add_move: 0,
            step_counter: INITIAL_STEP_COUNTER,
            step_timer: Timer::started(now, BASE_STEP_INTERVAL_MS),
            offset: IVec2::ZERO,
            altitude,
            alive_columns: (0..columns).collect(),
            left_alive_column: 0,
            right_alive_column: columns - 1,
            left_killed_columns: 0,
            right_killed_columns: 0,
        }
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        assert!(
            row < self.rows && column < self.columns,
            "formation cell ({row}, {column}) outside {}x{} grid",
            self.rows,
            self.columns
        );
        row * self.columns + column
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.cells[self.index(row, column)]
    }

    /// Living aliens in row-major order
    pub fn aliens(&self) -> impl Iterator<Item = &Alien> {
        self.cells.iter().filter_map(Cell::alien)
    }

    pub fn alive_count(&self) -> usize {
        self.alive
    }

    pub fn is_empty(&self) -> bool {
        self.alive == 0
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn step_counter(&self) -> u32 {
        self.step_counter
    }

    pub fn step_interval(&self) -> u64 {
        self.step_timer.interval
    }

    pub fn last_step_time(&self) -> u64 {
        self.step_timer.last
    }

    /// Step budgets (right, left) before bonuses
    pub fn step_budgets(&self) -> (u32, u32) {
        (self.right_moves, self.left_moves)
    }

    /// Extra steps earned by cleared edge columns (right, left)
    pub fn add_moves(&self) -> (u32, u32) {
        (self.right_add_move, self.left_add_move)
    }

    /// Outermost living columns (left, right)
    pub fn alive_bounds(&self) -> (usize, usize) {
        (self.left_alive_column, self.right_alive_column)
    }

    /// Fully cleared columns consumed from each edge (left, right)
    pub fn killed_columns(&self) -> (u32, u32) {
        (self.left_killed_columns, self.right_killed_columns)
    }

    pub fn alive_columns(&self) -> &[usize] {
        &self.alive_columns
    }

    /// Displacement since the formation spawned
    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    /// Altitude the formation spawned at
    pub fn altitude(&self) -> i32 {
        self.altitude
    }

    /// Advance the march if a step is due. At most one step per call.
    pub fn step(&mut self, now: u64) -> Option<Step> {
        if !self.step_timer.due(now) {
            return None;
        }

        let max_move = if self.direction == 1 {
            self.right_moves + self.right_add_move
        } else {
            self.left_moves + self.left_add_move
        };

        let (delta, step) = if self.step_counter >= max_move {
            // The far side's budget carries this side's earned bonus
            if self.direction == 1 {
                self.left_moves = BASE_STEP_BUDGET + self.right_add_move;
            } else {
                self.right_moves = BASE_STEP_BUDGET + self.left_add_move;
            }
            self.direction = -self.direction;
            self.step_counter = 0;
            (IVec2::new(0, DROP_DISTANCE), Step::Reverse)
        } else {
            self.step_counter += 1;
            (IVec2::new(STEP_DISTANCE * self.direction, 0), Step::March)
        };

        self.offset += delta;
        for cell in &mut self.cells {
            if let Cell::Alive(alien) = cell {
                alien.pos += delta;
                alien.next_frame();
            }
        }

        self.step_timer.advance();
        log::trace!("Formation {:?} to offset {}", step, self.offset);
        Some(step)
    }

    /// Clear a cell. Killing an empty cell is a no-op and returns None.
    pub fn kill_at(&mut self, row: usize, column: usize) -> Option<Alien> {
        let index = self.index(row, column);
        let alien = match std::mem::replace(&mut self.cells[index], Cell::Dead) {
            Cell::Alive(alien) => alien,
            Cell::Dead => return None,
        };
        self.alive -= 1;

        let mut column_dead = self.is_column_dead(column);
        if column_dead {
            self.alive_columns.retain(|&c| c != column);
        }

        if column == self.right_alive_column {
            while self.right_alive_column > 0 && column_dead {
                self.right_alive_column -= 1;
                self.right_killed_columns += 1;
                self.right_add_move = self.right_killed_columns * ADD_MOVE_PER_COLUMN;
                column_dead = self.is_column_dead(self.right_alive_column);
            }
        } else if column == self.left_alive_column {
            while self.left_alive_column + 1 < self.columns && column_dead {
                self.left_alive_column += 1;
                self.left_killed_columns += 1;
                self.left_add_move = self.left_killed_columns * ADD_MOVE_PER_COLUMN;
                column_dead = self.is_column_dead(self.left_alive_column);
            }
        }

        Some(alien)
    }

    fn is_column_dead(&self, column: usize) -> bool {
        (0..self.rows).all(|row| !self.cells[self.index(row, column)].is_alive())
    }

    /// Lowest living alien of a uniformly chosen living column
    pub fn random_bottom_alien<R: Rng>(&self, rng: &mut R) -> Option<&Alien> {
        if self.alive_columns.is_empty() {
            return None;
        }
        let column = self.alive_columns[rng.random_range(0..self.alive_columns.len())];
        self.bottom_alien(column)
    }

    /// Lowest living alien in a column
    pub fn bottom_alien(&self, column: usize) -> Option<&Alien> {
        (0..self.rows)
            .rev()
            .find_map(|row| self.cell(row, column).alien())
    }

    /// Speed up as the swarm thins out. Never slows back down.
    pub fn refresh_step_interval(&mut self) {
        let interval = match self.alive {
            1 => LAST_ALIEN_STEP_INTERVAL_MS,
            n if n <= FEW_ALIENS_THRESHOLD => FEW_ALIENS_STEP_INTERVAL_MS,
            _ => return,
        };
        if interval < self.step_timer.interval {
            log::debug!("Formation step interval {} -> {} ms", self.step_timer.interval, interval);
            self.step_timer.interval = interval;
        }
    }
}
