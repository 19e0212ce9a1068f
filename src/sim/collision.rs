//! Per-tick combat resolution
//!
//! Runs a fixed sequence of pairwise passes. Each pass works on a snapshot of
//! its two groups: every projectile pairs with at most the first target it
//! overlaps, and whatever a pass consumes is gone before the next one runs.

use rand::Rng;

use super::events::{EventSink, GameEvent};
use super::formation::AlienFormation;
use super::rect::Rect;
use super::state::{
    Alien, BonusTarget, Explosion, ExplosionKind, GameState, Projectile, Ship, ShieldBlock,
};
use crate::consts::*;

/// What a resolution pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatReport {
    /// Player shots cancelled against alien shots
    pub shots_cancelled: usize,
    pub aliens_killed: usize,
    /// Award for the mystery ship, if it was hit
    pub bonus_points: Option<u32>,
    pub ship_hit: bool,
    /// An alien touched the ship
    pub invaded: bool,
    pub shield_blocks_lost: usize,
}

/// Resolve every collision for this tick, in order
pub fn resolve(state: &mut GameState, now: u64, events: &mut EventSink) -> CombatReport {
    let mut report = CombatReport {
        shots_cancelled: cancel_shots(&mut state.player_shots, &mut state.alien_shots),
        ..Default::default()
    };

    for alien in shots_vs_aliens(&mut state.player_shots, &mut state.formation) {
        let points = alien.points();
        state.add_score(points);
        state.explosions.push(Explosion::new(
            ExplosionKind::Alien { row: alien.row },
            alien.pos,
            now,
        ));
        events.push(GameEvent::AlienKilled {
            row: alien.row,
            column: alien.column,
            points,
        });
        report.aliens_killed += 1;
    }

    if shots_vs_bonus(&mut state.player_shots, &state.bonus) {
        let points = BONUS_POINTS[state.rng.random_range(0..BONUS_POINTS.len())];
        state.add_score(points);
        state.explosions.push(Explosion::new(
            ExplosionKind::Mystery { score: points },
            state.bonus.pos,
            now,
        ));
        state.bonus = BonusTarget::new(now);
        events.push(GameEvent::BonusKilled { points });
        log::debug!("Mystery ship down for {} points", points);
        report.bonus_points = Some(points);
    }

    if shots_vs_ship(&mut state.alien_shots, state.ship.as_ref()) {
        let lives_left = state.lose_ship(now);
        events.push(GameEvent::ShipDestroyed { lives_left });
        log::debug!("Ship destroyed, {} lives left", lives_left);
        report.ship_hit = true;
    }

    if aliens_vs_ship(&state.formation, state.ship.as_ref()) {
        state.ship = None;
        state.respawn = None;
        state.game_over = true;
        log::info!("Formation reached the ship");
        report.invaded = true;
    }

    report.shield_blocks_lost += shots_vs_shields(&mut state.player_shots, &mut state.shields);
    report.shield_blocks_lost += shots_vs_shields(&mut state.alien_shots, &mut state.shields);
    report.shield_blocks_lost += aliens_vs_shields(&state.formation, &mut state.shields);

    report
}

/// For each shot, the first target rect it overlaps
fn first_hits(shots: &[Projectile], targets: &[Rect]) -> Vec<(usize, usize)> {
    shots
        .iter()
        .enumerate()
        .filter_map(|(shot, projectile)| {
            let rect = projectile.rect();
            targets
                .iter()
                .position(|target| rect.intersects(target))
                .map(|target| (shot, target))
        })
        .collect()
}

/// One-for-one pairing: each shot takes the first overlapping target that no
/// earlier shot in this pass has claimed
fn exclusive_hits(shots: &[Projectile], targets: &[Rect]) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; targets.len()];
    let mut hits = Vec::new();
    for (shot, projectile) in shots.iter().enumerate() {
        let rect = projectile.rect();
        let hit = targets
            .iter()
            .enumerate()
            .position(|(target, body)| !claimed[target] && rect.intersects(body));
        if let Some(target) = hit {
            claimed[target] = true;
            hits.push((shot, target));
        }
    }
    hits
}

/// Drop every element whose flag is set
fn remove_flagged<T>(items: &mut Vec<T>, flags: &[bool]) {
    let mut index = 0;
    items.retain(|_| {
        let keep = !flags[index];
        index += 1;
        keep
    });
}

/// Player and alien shots that meet cancel each other out
pub fn cancel_shots(player_shots: &mut Vec<Projectile>, alien_shots: &mut Vec<Projectile>) -> usize {
    let targets: Vec<Rect> = alien_shots.iter().map(Projectile::rect).collect();
    let hits = exclusive_hits(player_shots, &targets);

    let mut spent_player = vec![false; player_shots.len()];
    let mut spent_alien = vec![false; alien_shots.len()];
    for &(shot, target) in &hits {
        spent_player[shot] = true;
        spent_alien[target] = true;
    }
    remove_flagged(player_shots, &spent_player);
    remove_flagged(alien_shots, &spent_alien);
    hits.len()
}

/// Player shots into the formation. Returns the aliens actually killed; a cell
/// reported by several shots dies once.
pub fn shots_vs_aliens(player_shots: &mut Vec<Projectile>, formation: &mut AlienFormation) -> Vec<Alien> {
    let snapshot: Vec<(usize, usize, Rect)> = formation
        .aliens()
        .map(|alien| (alien.row, alien.column, alien.rect()))
        .collect();
    let targets: Vec<Rect> = snapshot.iter().map(|&(_, _, rect)| rect).collect();

    let mut spent = vec![false; player_shots.len()];
    let mut killed = Vec::new();
    for (shot, target) in first_hits(player_shots, &targets) {
        spent[shot] = true;
        let (row, column, _) = snapshot[target];
        if let Some(alien) = formation.kill_at(row, column) {
            killed.push(alien);
        }
    }
    remove_flagged(player_shots, &spent);
    killed
}

/// Player shots into the mystery ship
pub fn shots_vs_bonus(player_shots: &mut Vec<Projectile>, bonus: &BonusTarget) -> bool {
    let target = bonus.rect();
    let before = player_shots.len();
    player_shots.retain(|shot| !shot.rect().intersects(&target));
    player_shots.len() != before
}

/// Alien shots into the player's ship
pub fn shots_vs_ship(alien_shots: &mut Vec<Projectile>, ship: Option<&Ship>) -> bool {
    let Some(ship) = ship else {
        return false;
    };
    let target = ship.rect();
    let before = alien_shots.len();
    alien_shots.retain(|shot| !shot.rect().intersects(&target));
    alien_shots.len() != before
}

/// Whether any living alien overlaps the ship
pub fn aliens_vs_ship(formation: &AlienFormation, ship: Option<&Ship>) -> bool {
    ship.is_some_and(|ship| {
        let target = ship.rect();
        formation.aliens().any(|alien| alien.rect().intersects(&target))
    })
}

/// Shots and shield blocks destroy each other one-for-one
pub fn shots_vs_shields(shots: &mut Vec<Projectile>, shields: &mut Vec<ShieldBlock>) -> usize {
    let targets: Vec<Rect> = shields.iter().map(ShieldBlock::rect).collect();
    let hits = exclusive_hits(shots, &targets);

    let mut spent_shots = vec![false; shots.len()];
    let mut spent_blocks = vec![false; shields.len()];
    for &(shot, block) in &hits {
        spent_shots[shot] = true;
        spent_blocks[block] = true;
    }
    remove_flagged(shots, &spent_shots);
    let before = shields.len();
    remove_flagged(shields, &spent_blocks);
    before - shields.len()
}

/// Aliens grind away every block they touch and keep going
pub fn aliens_vs_shields(formation: &AlienFormation, shields: &mut Vec<ShieldBlock>) -> usize {
    let bodies: Vec<Rect> = formation.aliens().map(Alien::rect).collect();
    let before = shields.len();
    shields.retain(|block| {
        let rect = block.rect();
        !bodies.iter().any(|body| body.intersects(&rect))
    });
    before - shields.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use glam::IVec2;
    use crate::sim::state::{ExplosionKind, Side};

    fn playing_state() -> GameState {
        let mut state = GameState::new(Settings::default());
        state.start_game(0);
        state
    }

    fn player_shot(pos: IVec2) -> Projectile {
        Projectile {
            pos,
            direction: -1,
            speed: PLAYER_SHOT_SPEED,
            side: Side::Player,
        }
    }

    fn alien_shot(pos: IVec2) -> Projectile {
        Projectile {
            pos,
            direction: 1,
            speed: ALIEN_SHOT_SPEED,
            side: Side::Alien,
        }
    }

    /// Top-left corner for a projectile centred on `target`
    fn aimed_at(target: Rect, size: IVec2) -> IVec2 {
        target.center() - size / 2
    }

    fn alien_rect(state: &GameState, row: usize, column: usize) -> Rect {
        state.formation.cell(row, column).alien().unwrap().rect()
    }

    #[test]
    fn test_shot_pair_cancels_and_nothing_else() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        state.player_shots.push(player_shot(IVec2::new(100, 350)));
        state.alien_shots.push(alien_shot(IVec2::new(100, 345)));
        let shields = state.shields.len();

        let report = resolve(&mut state, 10, &mut events);
        assert_eq!(report.shots_cancelled, 1);
        assert!(state.player_shots.is_empty());
        assert!(state.alien_shots.is_empty());
        assert_eq!(state.formation.alive_count(), 50);
        assert_eq!(state.shields.len(), shields);
        assert!(state.ship_alive());
        assert_eq!(state.score, 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_cancel_pairs_one_to_one() {
        let mut player = vec![player_shot(IVec2::new(100, 300))];
        let mut alien = vec![alien_shot(IVec2::new(100, 300)), alien_shot(IVec2::new(101, 302))];
        assert_eq!(cancel_shots(&mut player, &mut alien), 1);
        assert!(player.is_empty());
        assert_eq!(alien.len(), 1);
    }

    #[test]
    fn test_alien_shot_cancels_only_one_player_shot() {
        let mut player = vec![player_shot(IVec2::new(100, 300)), player_shot(IVec2::new(101, 300))];
        let mut alien = vec![alien_shot(IVec2::new(100, 300))];
        assert_eq!(cancel_shots(&mut player, &mut alien), 1);
        assert!(alien.is_empty());
        assert_eq!(player.len(), 1);
        assert_eq!(player[0].pos, IVec2::new(101, 300));
    }

    #[test]
    fn test_shield_block_stops_one_shot() {
        let block = ShieldBlock {
            cluster: 0,
            row: 0,
            column: 0,
            pos: IVec2::new(100, 300),
        };
        let mut shields = vec![block];
        let mut shots = vec![player_shot(IVec2::new(100, 300)), player_shot(IVec2::new(101, 300))];
        assert_eq!(shots_vs_shields(&mut shots, &mut shields), 1);
        assert!(shields.is_empty());
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].pos, IVec2::new(101, 300));
    }

    #[test]
    fn test_second_shot_takes_next_overlapping_block() {
        let mut shields: Vec<ShieldBlock> = (0..2)
            .map(|column| ShieldBlock {
                cluster: 0,
                row: 0,
                column,
                pos: IVec2::new(100 + 10 * column as i32, 300),
            })
            .collect();
        // Both shots straddle the seam between the two blocks
        let mut shots = vec![player_shot(IVec2::new(107, 300)), player_shot(IVec2::new(108, 300))];
        assert_eq!(shots_vs_shields(&mut shots, &mut shields), 2);
        assert!(shots.is_empty());
        assert!(shields.is_empty());
    }

    #[test]
    fn test_row_zero_kill_scores_thirty() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        let target = alien_rect(&state, 0, 4);
        state
            .player_shots
            .push(player_shot(aimed_at(target, PLAYER_SHOT_SIZE)));

        let report = resolve(&mut state, 50, &mut events);
        assert_eq!(report.aliens_killed, 1);
        assert_eq!(state.score, 30);
        assert!(!state.formation.cell(0, 4).is_alive());
        assert!(state.player_shots.is_empty());
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].kind, ExplosionKind::Alien { row: 0 });
        assert_eq!(state.explosions[0].pos, target.pos);
        assert_eq!(
            events.take(),
            vec![GameEvent::AlienKilled {
                row: 0,
                column: 4,
                points: 30
            }]
        );
    }

    #[test]
    fn test_double_hit_scores_once() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        // Bottom row so neither shot can clip a second alien
        let target = alien_rect(&state, 4, 2);
        let aim = aimed_at(target, PLAYER_SHOT_SIZE);
        state.player_shots.push(player_shot(aim));
        state.player_shots.push(player_shot(aim + IVec2::new(2, 0)));

        let report = resolve(&mut state, 50, &mut events);
        assert_eq!(report.aliens_killed, 1);
        assert_eq!(state.score, 10);
        assert_eq!(state.formation.alive_count(), 49);
        assert!(state.player_shots.is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cancelled_shot_cannot_also_kill() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        let target = alien_rect(&state, 4, 0);
        let aim = aimed_at(target, PLAYER_SHOT_SIZE);
        state.player_shots.push(player_shot(aim));
        state.alien_shots.push(alien_shot(aim));

        resolve(&mut state, 50, &mut events);
        assert_eq!(state.formation.alive_count(), 50);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bonus_kill_awards_and_respawns() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        state.bonus.pos = IVec2::new(300, 45);
        // Above the formation's top row so only the bonus is in reach
        state.player_shots.push(player_shot(IVec2::new(310, 46)));

        let report = resolve(&mut state, 9_000, &mut events);
        let points = report.bonus_points.expect("bonus should be hit");
        assert!(BONUS_POINTS.contains(&points));
        assert_eq!(state.score, u64::from(points));
        assert_eq!(state.bonus.pos, BONUS_START);
        assert_eq!(state.bonus.timer.last, 9_000);
        assert_eq!(state.explosions[0].kind, ExplosionKind::Mystery { score: points });
        assert_eq!(state.explosions[0].pos, IVec2::new(300, 45));
        assert_eq!(events.take(), vec![GameEvent::BonusKilled { points }]);
    }

    #[test]
    fn test_ship_hit_costs_a_life() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        let aim = aimed_at(state.ship.as_ref().unwrap().rect(), ALIEN_SHOT_SIZE);
        state.alien_shots.push(alien_shot(aim));

        let report = resolve(&mut state, 2_000, &mut events);
        assert!(report.ship_hit);
        assert_eq!(state.lives, 2);
        assert!(!state.ship_alive());
        assert!(state.new_ship_pending());
        assert!(!state.game_over);
        assert!(state.alien_shots.is_empty());
        assert_eq!(state.explosions[0].kind, ExplosionKind::Ship);
        assert_eq!(events.take(), vec![GameEvent::ShipDestroyed { lives_left: 2 }]);
    }

    #[test]
    fn test_last_life_hit_is_game_over() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        state.lives = 1;
        let aim = aimed_at(state.ship.as_ref().unwrap().rect(), ALIEN_SHOT_SIZE);
        state.alien_shots.push(alien_shot(aim));

        resolve(&mut state, 2_000, &mut events);
        assert_eq!(state.lives, 0);
        assert!(state.game_over);
        assert!(!state.new_ship_pending());
    }

    #[test]
    fn test_no_ship_no_hit() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        state.ship = None;
        state.alien_shots.push(alien_shot(SHIP_START + IVec2::new(20, 10)));

        let report = resolve(&mut state, 2_000, &mut events);
        assert!(!report.ship_hit);
        assert_eq!(state.lives, 3);
        assert_eq!(state.alien_shots.len(), 1);
    }

    #[test]
    fn test_invasion_ignores_lives() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        state.shields.clear();
        // March the formation down onto the ship row
        let ship_top = SHIP_START.y;
        while state.formation.aliens().map(|a| a.rect().bottom()).max().unwrap() <= ship_top {
            let now = state.formation.last_step_time() + state.formation.step_interval();
            state.formation.step(now);
        }
        let reaches_ship = state
            .formation
            .aliens()
            .any(|a| a.rect().intersects(&state.ship.as_ref().unwrap().rect()));

        assert!(reaches_ship);

        let report = resolve(&mut state, 0, &mut events);
        assert!(report.invaded);
        assert!(state.game_over);
        assert_eq!(state.lives, 3);
        assert!(!state.ship_alive());
    }

    #[test]
    fn test_invasion_direct_overlap() {
        let mut state = playing_state();
        state.ship = Some(Ship {
            pos: alien_rect(&state, 4, 5).pos + IVec2::new(5, 5),
        });
        let mut events = EventSink::default();

        let report = resolve(&mut state, 0, &mut events);
        assert!(report.invaded);
        assert!(state.game_over);
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_shields_trade_one_for_one() {
        let mut state = playing_state();
        let mut events = EventSink::default();
        let block = state.shields[0].rect();
        state.player_shots.push(player_shot(block.pos));
        state.alien_shots.push(alien_shot(state.shields[40].pos));
        let total = state.shields.len();

        let report = resolve(&mut state, 0, &mut events);
        assert_eq!(report.shield_blocks_lost, 2);
        assert_eq!(state.shields.len(), total - 2);
        assert!(state.player_shots.is_empty());
        assert!(state.alien_shots.is_empty());
    }

    #[test]
    fn test_aliens_erode_shields() {
        let mut formation = AlienFormation::with_size(1, 1, 440, 0);
        let mut shields = vec![
            ShieldBlock {
                cluster: 0,
                row: 0,
                column: 0,
                pos: IVec2::new(160, 450),
            },
            ShieldBlock {
                cluster: 0,
                row: 0,
                column: 1,
                pos: IVec2::new(170, 450),
            },
            ShieldBlock {
                cluster: 0,
                row: 0,
                column: 2,
                pos: IVec2::new(400, 450),
            },
        ];
        assert_eq!(aliens_vs_shields(&formation, &mut shields), 2);
        assert_eq!(shields.len(), 1);
        assert_eq!(formation.alive_count(), 1);
        assert!(formation.kill_at(0, 0).is_some());
    }
}
