//! Enemy spawning and loot drops
//!
//! Banded rolls take the uniform draw as a parameter so the outcome tables
//! can be checked with fixed inputs.

use glam::Vec2;
use rand::Rng;

use super::events::GameEvent;
use super::state::{Enemy, EnemyKind, GameState, Gem, Pickup, PickupKind, next_id};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Gem tint
pub const GEM_COLOR: [f32; 4] = [0.02, 0.71, 0.83, 1.0];

/// Rolled stats for a new enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub damage: f32,
}

/// Seconds between spawns at a given level (never below 0.1s)
pub fn spawn_interval(level: u32) -> f32 {
    (SPAWN_INTERVAL_BASE - level as f32 * SPAWN_INTERVAL_PER_LEVEL).max(SPAWN_INTERVAL_MIN)
}

/// Spawn ring radius, just outside the visible frame
pub fn spawn_distance(viewport: Vec2) -> f32 {
    viewport.x.min(viewport.y) / 2.0 + SPAWN_MARGIN
}

/// Pick an enemy kind from one uniform draw in [0, 1)
pub fn roll_enemy_kind(draw: f32) -> EnemyKind {
    if draw > 0.9 {
        EnemyKind::Tank
    } else if draw > 0.75 {
        EnemyKind::Fast
    } else {
        EnemyKind::Normal
    }
}

/// Stats for `kind`; hp scales with the cumulative score
pub fn enemy_stats(kind: EnemyKind, score: u64) -> EnemyStats {
    let score = score as f32;
    match kind {
        EnemyKind::Tank => EnemyStats {
            radius: 35.0,
            hp: 150.0 + score * 0.5,
            speed: 60.0,
            damage: 20.0,
        },
        EnemyKind::Fast => EnemyStats {
            radius: 18.0,
            hp: 25.0 + score * 0.1,
            speed: 180.0,
            damage: 5.0,
        },
        EnemyKind::Normal => EnemyStats {
            radius: 22.0,
            hp: 40.0 + score * 0.2,
            speed: 100.0,
            damage: 10.0,
        },
    }
}

/// Pick a pickup (or nothing) from one uniform draw in [0, 1)
pub fn roll_drop(draw: f32) -> Option<PickupKind> {
    if draw > 0.2 {
        None
    } else if draw < 0.05 {
        Some(PickupKind::BladeUp)
    } else if draw < 0.1 {
        Some(PickupKind::PowerUp)
    } else {
        Some(PickupKind::Heal)
    }
}

/// Spawn an enemy once enough simulated time has passed since the last one
pub fn update_spawner<R: Rng + ?Sized>(state: &mut GameState, viewport: Vec2, rng: &mut R) {
    if state.elapsed - state.last_spawn > spawn_interval(state.player.level) {
        spawn_enemy(state, viewport, rng);
        state.last_spawn = state.elapsed;
    }
}

/// Create one enemy on the ring around the player
pub fn spawn_enemy<R: Rng + ?Sized>(state: &mut GameState, viewport: Vec2, rng: &mut R) {
    let angle = rng.random::<f32>() * std::f32::consts::TAU;
    let pos = state.player.pos + polar_to_cartesian(spawn_distance(viewport), angle);

    let kind = roll_enemy_kind(rng.random());
    let stats = enemy_stats(kind, state.score);
    let id = state.next_entity_id();

    state.enemies.push(Enemy {
        id,
        kind,
        pos,
        radius: stats.radius,
        hp: stats.hp,
        max_hp: stats.hp,
        speed: stats.speed,
        damage: stats.damage,
        stun: 0.0,
    });
    state.events.push(GameEvent::EnemySpawned { id, kind });
    log::debug!("Spawned {:?} #{} (hp {:.0})", kind, id, stats.hp);
}

/// Drop the gem (always) and maybe a pickup where an enemy died
pub fn drop_loot<R: Rng + ?Sized>(
    gems: &mut Vec<Gem>,
    pickups: &mut Vec<Pickup>,
    ids: &mut u32,
    pos: Vec2,
    kind: EnemyKind,
    rng: &mut R,
) {
    gems.push(Gem {
        id: next_id(ids),
        pos,
        radius: GEM_RADIUS,
        value: kind.gem_value(),
        color: GEM_COLOR,
    });

    if let Some(pickup_kind) = roll_drop(rng.random()) {
        pickups.push(Pickup {
            id: next_id(ids),
            kind: pickup_kind,
            pos,
            radius: PICKUP_RADIUS,
            life: PICKUP_LIFETIME,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::test_rng::ConstRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_tank_roll_at_zero_score() {
        let kind = roll_enemy_kind(0.95);
        assert_eq!(kind, EnemyKind::Tank);
        let stats = enemy_stats(kind, 0);
        assert_eq!(stats.hp, 150.0);
        assert_eq!(stats.speed, 60.0);
        assert_eq!(stats.radius, 35.0);
        assert_eq!(stats.damage, 20.0);
    }

    #[test]
    fn test_normal_roll_at_zero_score() {
        let kind = roll_enemy_kind(0.5);
        assert_eq!(kind, EnemyKind::Normal);
        assert_eq!(enemy_stats(kind, 0).hp, 40.0);
    }

    #[test]
    fn test_enemy_roll_band_edges() {
        // Thresholds are strict "greater than"
        assert_eq!(roll_enemy_kind(0.9), EnemyKind::Fast);
        assert_eq!(roll_enemy_kind(0.8), EnemyKind::Fast);
        assert_eq!(roll_enemy_kind(0.75), EnemyKind::Normal);
        assert_eq!(roll_enemy_kind(0.0), EnemyKind::Normal);
    }

    #[test]
    fn test_hp_scales_with_score() {
        assert_eq!(enemy_stats(EnemyKind::Normal, 100).hp, 60.0);
        assert_eq!(enemy_stats(EnemyKind::Fast, 100).hp, 35.0);
        assert_eq!(enemy_stats(EnemyKind::Tank, 100).hp, 200.0);
    }

    #[test]
    fn test_drop_roll_bands() {
        assert_eq!(roll_drop(0.21), None);
        assert_eq!(roll_drop(0.99), None);
        assert_eq!(roll_drop(0.0), Some(PickupKind::BladeUp));
        assert_eq!(roll_drop(0.049), Some(PickupKind::BladeUp));
        assert_eq!(roll_drop(0.05), Some(PickupKind::PowerUp));
        assert_eq!(roll_drop(0.099), Some(PickupKind::PowerUp));
        assert_eq!(roll_drop(0.1), Some(PickupKind::Heal));
        assert_eq!(roll_drop(0.2), Some(PickupKind::Heal));
    }

    #[test]
    fn test_spawn_interval_floor() {
        assert!((spawn_interval(1) - 0.49).abs() < 1e-5);
        assert!((spawn_interval(20) - 0.3).abs() < 1e-5);
        assert_eq!(spawn_interval(45), SPAWN_INTERVAL_MIN);
        assert_eq!(spawn_interval(1000), SPAWN_INTERVAL_MIN);
    }

    #[test]
    fn test_spawn_on_ring_outside_view() {
        let mut state = GameState::new();
        state.player.pos = Vec2::new(500.0, -200.0);
        let viewport = Vec2::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(7);

        for _ in 0..20 {
            spawn_enemy(&mut state, viewport, &mut rng);
        }
        assert_eq!(state.enemies.len(), 20);
        for enemy in &state.enemies {
            let d = enemy.pos.distance(state.player.pos);
            assert!((d - 400.0).abs() < 0.01, "distance {d}");
            assert_eq!(enemy.hp, enemy.max_hp);
            assert_eq!(enemy.stun, 0.0);
        }
    }

    #[test]
    fn test_spawner_waits_for_interval() {
        let mut state = GameState::new();
        let viewport = Vec2::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(1);

        state.elapsed = 0.3;
        update_spawner(&mut state, viewport, &mut rng);
        assert!(state.enemies.is_empty());

        state.elapsed = 0.5;
        update_spawner(&mut state, viewport, &mut rng);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_spawn, 0.5);

        // Clock restarts from the spawn
        state.elapsed = 0.8;
        update_spawner(&mut state, viewport, &mut rng);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_gem_always_dropped() {
        let mut gems = Vec::new();
        let mut pickups = Vec::new();
        let mut ids = 10;
        // Draw ~1.0: no pickup
        let mut rng = ConstRng(u32::MAX);
        drop_loot(&mut gems, &mut pickups, &mut ids, Vec2::ONE, EnemyKind::Tank, &mut rng);
        assert_eq!(gems.len(), 1);
        assert_eq!(gems[0].value, 50);
        assert!(pickups.is_empty());

        // Draw 0.0: blade up
        let mut rng = ConstRng(0);
        drop_loot(&mut gems, &mut pickups, &mut ids, Vec2::ONE, EnemyKind::Fast, &mut rng);
        assert_eq!(gems[1].value, 10);
        assert_eq!(pickups.len(), 1);
        assert_eq!(pickups[0].kind, PickupKind::BladeUp);
        assert_eq!(pickups[0].life, PICKUP_LIFETIME);
        assert_ne!(gems[1].id, pickups[0].id);
    }
}
