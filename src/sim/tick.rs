//! Variable timestep simulation step
//!
//! Advances the run by the seconds the frame clock hands in. The input is a
//! snapshot taken when the frame started.

use glam::Vec2;
use rand::Rng;

use super::state::{GamePhase, GameState};
use super::{ability, combat, effects, progression, spawner};

/// Held movement keys (WASD or arrows)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionKeys {
    /// Unnormalized direction; screen y grows downward
    pub fn vector(self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir
    }
}

/// Input for one step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: DirectionKeys,
    /// Virtual joystick vector, each axis in [-1, 1]; zero when released
    pub joystick: Vec2,
    /// Area stun requested since the last processed step
    pub ability: bool,
    /// Visible area in world units
    pub viewport: Vec2,
}

impl TickInput {
    /// Movement direction with magnitude at most 1.
    ///
    /// A non-zero joystick replaces the keyboard entirely.
    pub fn movement(&self) -> Vec2 {
        let dir = if self.joystick != Vec2::ZERO {
            self.joystick
        } else {
            self.keys.vector()
        };
        if dir.length_squared() > 1.0 {
            dir.normalize()
        } else {
            dir
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, input: &TickInput, dt: f32, rng: &mut R) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.events.clear();
    state.elapsed += dt;

    // Mana and ability
    progression::regenerate_mana(&mut state.player, dt);
    if input.ability {
        ability::try_activate(state);
    }
    ability::update_ring(&mut state.roar, dt);
    combat::decay_combo(&mut state.player, dt);

    // Movement and camera
    let player = &mut state.player;
    player.pos += input.movement() * player.speed * dt;
    state.camera = state.player.pos - input.viewport / 2.0;

    combat::advance_blades(state, dt);
    spawner::update_spawner(state, input.viewport, rng);

    combat::update_enemies(state, dt, rng);
    if state.phase == GamePhase::GameOver {
        effects::spawn_from_events(state, rng);
        return;
    }

    progression::update_pickups(state, dt);
    progression::update_gems(state, dt);

    effects::spawn_from_events(state, rng);
    effects::age_effects(state, dt);

    log::trace!(
        "step {:.3}s: {} enemies, {} gems, {} events",
        dt,
        state.enemies.len(),
        state.gems.len(),
        state.events.len()
    );
}
