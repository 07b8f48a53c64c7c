//! Mana, experience, gems and pickups

use super::events::GameEvent;
use super::state::{GameState, Pickup, PickupKind, Player};
use crate::consts::*;

/// XP needed to leave `level`
pub fn xp_threshold(level: u32) -> u32 {
    level.max(1) * XP_PER_LEVEL
}

/// Regenerate mana, capped at the maximum
pub fn regenerate_mana(player: &mut Player, dt: f32) {
    player.mp = (player.mp + MP_REGEN_PER_SEC * dt).min(player.max_mp);
}

/// Add experience and resolve level-ups; returns how many levels were gained.
///
/// The threshold is fixed by the level held when the gain arrives, and the
/// excess over each crossing carries into the next level. Every level gained
/// refills hp and adds blade damage.
pub fn grant_xp(player: &mut Player, amount: u32) -> u32 {
    let threshold = xp_threshold(player.level);
    player.xp += amount;

    let mut gained = 0;
    while player.xp >= threshold {
        player.xp -= threshold;
        player.level += 1;
        player.hp = player.max_hp;
        player.blade_damage += LEVEL_UP_DAMAGE;
        gained += 1;
    }
    gained
}

/// Apply a collected pickup's buff
pub fn apply_pickup(player: &mut Player, kind: PickupKind) {
    match kind {
        PickupKind::Heal => {
            player.hp = (player.hp + HEAL_AMOUNT).min(player.max_hp);
        }
        PickupKind::BladeUp => {
            player.blade_count = (player.blade_count + 1).min(MAX_BLADES);
        }
        PickupKind::PowerUp => {
            player.blade_damage += POWER_UP_DAMAGE;
            player.blade_size += POWER_UP_SIZE;
        }
    }
}

/// Whether the player is close enough to grab a pickup
fn within_reach(player: &Player, pickup: &Pickup) -> bool {
    player.pos.distance(pickup.pos) < player.radius + pickup.radius + PICKUP_REACH_MARGIN
}

/// Age pickups, collect the ones in reach, drop the expired ones
pub fn update_pickups(state: &mut GameState, dt: f32) {
    let GameState {
        player,
        pickups,
        events,
        ..
    } = state;

    pickups.retain_mut(|pickup| {
        pickup.life -= dt;
        if within_reach(player, pickup) {
            apply_pickup(player, pickup.kind);
            events.push(GameEvent::PickupCollected {
                pos: pickup.pos,
                kind: pickup.kind,
            });
            log::debug!("Collected {:?}", pickup.kind);
            return false;
        }
        pickup.life > 0.0
    });
}

/// Pull nearby gems toward the player and collect the ones touching it
///
/// Magnet range is judged on the distance before this step's pull.
pub fn update_gems(state: &mut GameState, dt: f32) {
    let GameState {
        player,
        gems,
        events,
        ..
    } = state;

    gems.retain_mut(|gem| {
        let dist = player.pos.distance(gem.pos);
        if dist < MAGNET_RANGE {
            let dir = (player.pos - gem.pos).normalize_or_zero();
            gem.pos += dir * MAGNET_SPEED * dt;
        }

        if dist >= player.radius + gem.radius {
            return true;
        }

        events.push(GameEvent::GemCollected { value: gem.value });
        let before = player.level;
        let gained = grant_xp(player, gem.value);
        for level in before + 1..=before + gained {
            events.push(GameEvent::LevelUp {
                pos: player.pos,
                level,
            });
        }
        if gained > 0 {
            log::info!("Level up: {} -> {}", before, player.level);
        }
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawner::GEM_COLOR;
    use crate::sim::state::Gem;
    use glam::Vec2;

    fn gem_at(pos: Vec2, value: u32) -> Gem {
        Gem {
            id: 50,
            pos,
            radius: GEM_RADIUS,
            value,
            color: GEM_COLOR,
        }
    }

    #[test]
    fn test_level_up_exact_threshold() {
        let mut player = Player::new(0);
        player.xp = 90;
        player.hp = 12.0;
        let gained = grant_xp(&mut player, 10);
        assert_eq!(gained, 1);
        assert_eq!(player.level, 2);
        assert_eq!(player.xp, 0);
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.blade_damage, BLADE_START_DAMAGE + LEVEL_UP_DAMAGE);
    }

    #[test]
    fn test_level_up_carries_excess() {
        let mut player = Player::new(0);
        player.hp = 20.0;
        let gained = grant_xp(&mut player, 250);
        assert_eq!(gained, 2);
        assert_eq!(player.level, 3);
        assert_eq!(player.xp, 50);
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.blade_damage, BLADE_START_DAMAGE + 2.0 * LEVEL_UP_DAMAGE);
    }

    #[test]
    fn test_below_threshold_keeps_level() {
        let mut player = Player::new(0);
        assert_eq!(grant_xp(&mut player, 99), 0);
        assert_eq!(player.level, 1);
        assert_eq!(player.xp, 99);
    }

    #[test]
    fn test_mana_regen_caps() {
        let mut player = Player::new(0);
        player.mp = 10.0;
        regenerate_mana(&mut player, 2.0);
        assert_eq!(player.mp, 20.0);
        player.mp = 99.0;
        regenerate_mana(&mut player, 1.0);
        assert_eq!(player.mp, player.max_mp);
    }

    #[test]
    fn test_pickup_effects() {
        let mut player = Player::new(0);
        player.hp = 80.0;
        apply_pickup(&mut player, PickupKind::Heal);
        assert_eq!(player.hp, 100.0);

        player.blade_count = MAX_BLADES;
        apply_pickup(&mut player, PickupKind::BladeUp);
        assert_eq!(player.blade_count, MAX_BLADES);

        apply_pickup(&mut player, PickupKind::PowerUp);
        assert_eq!(player.blade_damage, BLADE_START_DAMAGE + POWER_UP_DAMAGE);
        assert_eq!(player.blade_size, BLADE_START_SIZE + POWER_UP_SIZE);
    }

    #[test]
    fn test_pickup_collect_and_expire() {
        let mut state = GameState::new();
        state.player.blade_count = 1;
        // Reach is 30 + 20 + 10 = 60
        state.pickups.push(Pickup {
            id: 7,
            kind: PickupKind::BladeUp,
            pos: Vec2::new(55.0, 0.0),
            radius: PICKUP_RADIUS,
            life: PICKUP_LIFETIME,
        });
        state.pickups.push(Pickup {
            id: 8,
            kind: PickupKind::Heal,
            pos: Vec2::new(500.0, 0.0),
            radius: PICKUP_RADIUS,
            life: 0.05,
        });
        state.pickups.push(Pickup {
            id: 9,
            kind: PickupKind::Heal,
            pos: Vec2::new(-500.0, 0.0),
            radius: PICKUP_RADIUS,
            life: 5.0,
        });

        update_pickups(&mut state, 0.1);

        assert_eq!(state.player.blade_count, 2);
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups[0].id, 9);
        assert!((state.pickups[0].life - 4.9).abs() < 1e-5);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::PickupCollected {
                kind: PickupKind::BladeUp,
                ..
            }
        )));
    }

    #[test]
    fn test_gem_magnet_moves_nearby_only() {
        let mut state = GameState::new();
        state.gems.push(gem_at(Vec2::new(100.0, 0.0), 10));
        state.gems.push(gem_at(Vec2::new(300.0, 0.0), 10));

        update_gems(&mut state, 0.1);

        assert!((state.gems[0].pos.x - 60.0).abs() < 1e-3);
        assert_eq!(state.gems[1].pos.x, 300.0);
    }

    #[test]
    fn test_gem_collect_emits_level_up() {
        let mut state = GameState::new();
        state.player.xp = 95;
        state.gems.push(gem_at(Vec2::new(10.0, 0.0), 10));

        update_gems(&mut state, 0.0);

        assert!(state.gems.is_empty());
        assert_eq!(state.player.level, 2);
        assert_eq!(state.player.xp, 5);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::LevelUp { level: 2, .. })));
    }
}
