//! Blade orbit, enemy movement and combat resolution
//!
//! Per enemy, in order: stun decay or chase, contact damage to the player,
//! at most one landed blade hit, then death handling.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::spawner::drop_loot;
use super::state::{Body, Enemy, GamePhase, GameState, Player};
use crate::consts::*;
use crate::{polar_to_cartesian, push_away};

/// Current spin rate, boosted by combo up to +100%
pub fn spin_rate(player: &Player) -> f32 {
    player.blade_speed * (1.0 + player.combo.min(COMBO_SPIN_CAP) as f32 * COMBO_SPIN_BONUS)
}

/// Distance of the blades from the player center
pub fn orbit_radius(blade_size: f32) -> f32 {
    BLADE_ORBIT_BASE + blade_size * BLADE_ORBIT_SIZE_FACTOR
}

/// Angle of blade `index` given the shared spin angle
pub fn blade_angle(spin: f32, index: u32, count: u32) -> f32 {
    spin + index as f32 * (std::f32::consts::TAU / count.max(1) as f32)
}

/// World positions of every blade, evenly spaced around the player
///
/// Returns a fixed array plus the number of valid entries so the step never
/// allocates.
pub fn blade_positions(player: &Player, spin: f32) -> ([Vec2; MAX_BLADES as usize], usize) {
    let mut out = [Vec2::ZERO; MAX_BLADES as usize];
    let count = player.blade_count.clamp(1, MAX_BLADES);
    let radius = orbit_radius(player.blade_size);
    for i in 0..count {
        out[i as usize] = player.pos + polar_to_cartesian(radius, blade_angle(spin, i, count));
    }
    (out, count as usize)
}

/// Damage of one landed hit, amplified by combo
pub fn hit_damage(blade_damage: f32, combo: u32) -> f32 {
    blade_damage * (1.0 + combo as f32 * COMBO_DAMAGE_BONUS)
}

/// Whether a blade center touches an enemy
pub fn blade_touches(blade: Vec2, blade_size: f32, enemy: &Enemy) -> bool {
    blade.distance(enemy.pos) < blade_size * BLADE_HIT_SIZE_FACTOR + enemy.radius
}

/// Advance the spin angle for this step
pub fn advance_blades(state: &mut GameState, dt: f32) {
    state.blade_angle =
        (state.blade_angle + spin_rate(&state.player) * dt).rem_euclid(std::f32::consts::TAU);
}

/// Count down the combo window; the combo resets when it runs out
pub fn decay_combo(player: &mut Player, dt: f32) {
    if player.combo > 0 {
        player.combo_timer -= dt;
        if player.combo_timer <= 0.0 {
            player.combo = 0;
            player.combo_timer = 0.0;
        }
    }
}

/// Stunned enemies tick their stun down; free ones chase the player
pub fn advance_enemy(enemy: &mut Enemy, target: Vec2, dt: f32) {
    if enemy.is_stunned() {
        enemy.stun = (enemy.stun - dt).max(0.0);
    } else {
        let dir = (target - enemy.pos).normalize_or_zero();
        enemy.pos += dir * enemy.speed * dt;
    }
}

/// Test blades in order; stop after the first landed hit.
///
/// Returns true when a hit landed. Blocked attempts do not count and the
/// remaining blades are still tested.
pub fn strike_with_blades<R: Rng + ?Sized>(
    enemy: &mut Enemy,
    player: &mut Player,
    blades: &[Vec2],
    events: &mut Vec<GameEvent>,
    rng: &mut R,
) -> bool {
    for &blade in blades {
        if !blade_touches(blade, player.blade_size, enemy) {
            continue;
        }

        if enemy.can_block() && rng.random::<f32>() < TANK_BLOCK_CHANCE {
            events.push(GameEvent::Blocked { pos: enemy.pos });
            enemy.pos = push_away(enemy.pos, player.pos, BLOCK_KNOCKBACK);
            continue;
        }

        let damage = hit_damage(player.blade_damage, player.combo);
        enemy.hp -= damage;
        events.push(GameEvent::BladeHit {
            pos: enemy.pos,
            damage,
            highlighted: player.combo > COMBO_HIGHLIGHT,
        });

        player.combo += 1;
        player.combo_timer = COMBO_WINDOW;

        enemy.pos = push_away(enemy.pos, player.pos, enemy.kind.hit_knockback());
        return true;
    }
    false
}

/// Move every enemy, apply contact damage, blade hits and deaths
pub fn update_enemies<R: Rng + ?Sized>(state: &mut GameState, dt: f32, rng: &mut R) {
    let (blades, blade_count) = blade_positions(&state.player, state.blade_angle);
    let blades = &blades[..blade_count];

    let GameState {
        player,
        enemies,
        gems,
        pickups,
        events,
        score,
        next_id,
        ..
    } = state;

    let mut run_ended = false;
    enemies.retain_mut(|enemy| {
        if run_ended {
            return true;
        }

        advance_enemy(enemy, player.pos, dt);

        if player.overlaps(&*enemy, CONTACT_TOLERANCE) {
            let amount = enemy.damage * dt * CONTACT_DAMAGE_SCALE;
            player.hp = (player.hp - amount).max(0.0);
            player.combo = 0;
            player.combo_timer = 0.0;
            events.push(GameEvent::PlayerDamaged { amount });
            if !player.is_alive() {
                run_ended = true;
                return true;
            }
        }

        strike_with_blades(enemy, player, blades, events, &mut *rng);

        if enemy.hp <= 0.0 {
            *score += enemy.kind.score_value();
            events.push(GameEvent::EnemyKilled {
                pos: enemy.pos,
                kind: enemy.kind,
            });
            drop_loot(gems, pickups, next_id, enemy.pos, enemy.kind, &mut *rng);
            return false;
        }
        true
    });

    if run_ended {
        end_run(state);
    }
}

/// Transition to `GameOver` and report the result once
pub fn end_run(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    let summary = state.summary();
    state.events.push(GameEvent::RunEnded {
        score: summary.score,
        level: summary.level,
    });
    log::info!(
        "Run ended: score {} at level {}",
        summary.score,
        summary.level
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;
    use crate::sim::test_rng::ConstRng;

    fn enemy_at(kind: EnemyKind, pos: Vec2) -> Enemy {
        let stats = crate::sim::spawner::enemy_stats(kind, 0);
        Enemy {
            id: 99,
            kind,
            pos,
            radius: stats.radius,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            damage: stats.damage,
            stun: 0.0,
        }
    }

    /// Position of the single blade with spin angle 0
    fn first_blade(state: &GameState) -> Vec2 {
        state.player.pos + Vec2::new(orbit_radius(state.player.blade_size), 0.0)
    }

    #[test]
    fn test_orbit_and_spacing() {
        let mut player = Player::new(0);
        assert!((orbit_radius(60.0) - 108.0).abs() < 1e-4);

        player.blade_count = 4;
        let (blades, count) = blade_positions(&player, 0.0);
        assert_eq!(count, 4);
        assert!((blades[0] - Vec2::new(108.0, 0.0)).length() < 1e-3);
        assert!((blades[1] - Vec2::new(0.0, 108.0)).length() < 1e-3);
        assert!((blades[2] - Vec2::new(-108.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_spin_rate_capped_by_combo() {
        let mut player = Player::new(0);
        assert_eq!(spin_rate(&player), BLADE_SPIN_SPEED);
        player.combo = 50;
        assert!((spin_rate(&player) - BLADE_SPIN_SPEED * 2.0).abs() < 1e-4);
        player.combo = 500;
        assert!((spin_rate(&player) - BLADE_SPIN_SPEED * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_hit_damage_scales_with_combo() {
        assert_eq!(hit_damage(35.0, 0), 35.0);
        assert!((hit_damage(35.0, 10) - 52.5).abs() < 1e-4);
    }

    #[test]
    fn test_blade_hit_damages_and_knocks_back() {
        let mut state = GameState::new();
        let start = first_blade(&state);
        state.enemies.push(enemy_at(EnemyKind::Normal, start));

        update_enemies(&mut state, 0.0, &mut ConstRng(0));

        let enemy = &state.enemies[0];
        assert_eq!(enemy.hp, 40.0 - 35.0);
        assert!((enemy.pos.x - (start.x + HIT_KNOCKBACK)).abs() < 1e-3);
        assert_eq!(state.player.combo, 1);
        assert_eq!(state.player.combo_timer, COMBO_WINDOW);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BladeHit { damage, .. } if *damage == 35.0)));
    }

    #[test]
    fn test_forced_tank_block() {
        let mut state = GameState::new();
        let start = first_blade(&state);
        state.enemies.push(enemy_at(EnemyKind::Tank, start));

        // Draw 0.0 < 0.3: every eligible blade is blocked
        update_enemies(&mut state, 0.0, &mut ConstRng(0));

        let tank = &state.enemies[0];
        assert_eq!(tank.hp, 150.0);
        assert_eq!(state.player.combo, 0);
        assert!(tank.pos.x > start.x);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Blocked { .. })));
        assert!(!state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BladeHit { .. })));
    }

    #[test]
    fn test_failed_block_roll_lands_hit() {
        let mut state = GameState::new();
        let start = first_blade(&state);
        state.enemies.push(enemy_at(EnemyKind::Tank, start));

        update_enemies(&mut state, 0.0, &mut ConstRng(u32::MAX));

        let tank = &state.enemies[0];
        assert_eq!(tank.hp, 150.0 - 35.0);
        assert!((tank.pos.x - (start.x + TANK_HIT_KNOCKBACK)).abs() < 1e-3);
        assert_eq!(state.player.combo, 1);
    }

    #[test]
    fn test_stunned_tank_cannot_block() {
        let mut state = GameState::new();
        let start = first_blade(&state);
        let mut tank = enemy_at(EnemyKind::Tank, start);
        tank.stun = 2.0;
        state.enemies.push(tank);

        update_enemies(&mut state, 0.0, &mut ConstRng(0));
        assert_eq!(state.enemies[0].hp, 150.0 - 35.0);
    }

    #[test]
    fn test_one_hit_per_frame() {
        let mut state = GameState::new();
        state.player.blade_count = 8;
        state.player.blade_size = 400.0; // every blade overlaps
        let mut enemy = enemy_at(EnemyKind::Normal, Vec2::new(200.0, 0.0));
        enemy.hp = 1000.0;
        enemy.max_hp = 1000.0;
        state.enemies.push(enemy);

        update_enemies(&mut state, 0.0, &mut ConstRng(0));
        assert_eq!(state.enemies[0].hp, 1000.0 - 35.0);
        assert_eq!(state.player.combo, 1);
    }

    #[test]
    fn test_kill_drops_gem_and_scores() {
        let mut state = GameState::new();
        let start = first_blade(&state);
        let mut enemy = enemy_at(EnemyKind::Fast, start);
        enemy.hp = 10.0;
        state.enemies.push(enemy);

        update_enemies(&mut state, 0.0, &mut ConstRng(u32::MAX));

        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 10);
        assert_eq!(state.gems.len(), 1);
        assert_eq!(state.gems[0].value, 10);
        assert!(state.pickups.is_empty());
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyKilled { .. })));
    }

    #[test]
    fn test_contact_damage_resets_combo() {
        let mut state = GameState::new();
        state.player.combo = 12;
        state.player.combo_timer = 2.0;
        // Far from the blade (which sits at +x), touching the player
        let mut enemy = enemy_at(EnemyKind::Normal, Vec2::new(-40.0, 0.0));
        enemy.speed = 0.0;
        state.enemies.push(enemy);

        update_enemies(&mut state, 0.1, &mut ConstRng(0));

        assert_eq!(state.player.combo, 0);
        assert!((state.player.hp - (100.0 - 10.0 * 0.1 * 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_lethal_contact_ends_run_once() {
        let mut state = GameState::new();
        state.player.hp = 0.5;
        let mut enemy = enemy_at(EnemyKind::Tank, Vec2::new(-40.0, 0.0));
        enemy.speed = 0.0;
        state.enemies.push(enemy.clone());
        state.enemies.push(enemy);

        update_enemies(&mut state, 0.1, &mut ConstRng(0));

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.hp, 0.0);
        assert!(!state.player.is_alive());
        let ended = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);

        end_run(&mut state);
        let ended = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_stun_blocks_movement_and_decays() {
        let mut enemy = enemy_at(EnemyKind::Normal, Vec2::new(300.0, 0.0));
        enemy.stun = 0.05;
        advance_enemy(&mut enemy, Vec2::ZERO, 0.1);
        assert_eq!(enemy.pos, Vec2::new(300.0, 0.0));
        assert_eq!(enemy.stun, 0.0);

        advance_enemy(&mut enemy, Vec2::ZERO, 0.1);
        assert!((enemy.pos.x - 290.0).abs() < 1e-3);
    }

    #[test]
    fn test_combo_decay() {
        let mut player = Player::new(0);
        player.combo = 5;
        player.combo_timer = COMBO_WINDOW;
        decay_combo(&mut player, 2.0);
        assert_eq!(player.combo, 5);
        decay_combo(&mut player, 1.0);
        assert_eq!(player.combo, 0);
    }
}
