//! Area stun ("roar") and its expanding ring

use super::events::GameEvent;
use super::state::{GameState, RoarRing};
use crate::consts::*;
use crate::push_away;

/// Fire the area stun if the player has the mana for it.
///
/// Returns false (and changes nothing) when mana is short. Otherwise every
/// enemy within range is stunned and pushed straight out from the player.
pub fn try_activate(state: &mut GameState) -> bool {
    let player = &mut state.player;
    if player.mp < ROAR_COST {
        return false;
    }

    player.mp -= ROAR_COST;
    let origin = player.pos;
    state.roar = RoarRing {
        active: true,
        radius: 0.0,
        alpha: 1.0,
    };
    state.events.push(GameEvent::AbilityUsed { pos: origin });

    let mut stunned = 0;
    for enemy in &mut state.enemies {
        if enemy.pos.distance(origin) < ROAR_RANGE {
            enemy.stun = ROAR_STUN;
            state.events.push(GameEvent::EnemyStunned { pos: enemy.pos });
            enemy.pos = push_away(enemy.pos, origin, ROAR_KNOCKBACK);
            stunned += 1;
        }
    }
    log::debug!("Roar stunned {} enemies", stunned);
    true
}

/// Grow and fade the ring; it deactivates once fully transparent
pub fn update_ring(ring: &mut RoarRing, dt: f32) {
    if !ring.active {
        return;
    }
    ring.radius += ROAR_RING_SPEED * dt;
    ring.alpha -= ROAR_RING_FADE * dt;
    if ring.alpha <= 0.0 {
        ring.active = false;
        ring.alpha = 0.0;
    }
}
