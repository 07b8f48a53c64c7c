//! Fireblade - a top-down survival arena
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawner, combat, progression, area stun)
//! - `platform`: Frame clock turning display timestamps into simulation steps
//! - `session`: Top-level driver owning the state, pending input and RNG
//! - `renderer`: Draw-list builder and WebGPU pipeline
//! - `wisdom`: Game-over quotes from the master

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod wisdom;

pub use session::{FrameOutcome, Session};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Frame deltas above this are skipped entirely (tab switch, stalls)
    pub const MAX_FRAME_DELTA_MS: f64 = 200.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 30.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    pub const PLAYER_MAX_MP: f32 = 100.0;
    /// Movement speed (units per second)
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Mana regeneration (units per second)
    pub const MP_REGEN_PER_SEC: f32 = 5.0;

    /// Blade defaults
    pub const BLADE_START_COUNT: u32 = 1;
    pub const MAX_BLADES: u32 = 8;
    /// Base spin (radians per second)
    pub const BLADE_SPIN_SPEED: f32 = 3.5;
    pub const BLADE_START_DAMAGE: f32 = 35.0;
    pub const BLADE_START_SIZE: f32 = 60.0;
    pub const BLADE_ORBIT_BASE: f32 = 90.0;
    pub const BLADE_ORBIT_SIZE_FACTOR: f32 = 0.3;
    pub const BLADE_HIT_SIZE_FACTOR: f32 = 0.6;

    /// Combo
    pub const COMBO_WINDOW: f32 = 3.0;
    pub const COMBO_SPIN_CAP: u32 = 50;
    pub const COMBO_SPIN_BONUS: f32 = 0.02;
    pub const COMBO_DAMAGE_BONUS: f32 = 0.05;
    /// Hits above this combo show highlighted damage numbers
    pub const COMBO_HIGHLIGHT: u32 = 10;

    /// Contact damage
    pub const CONTACT_TOLERANCE: f32 = 5.0;
    pub const CONTACT_DAMAGE_SCALE: f32 = 2.0;

    /// Knockback distances
    pub const HIT_KNOCKBACK: f32 = 80.0;
    pub const TANK_HIT_KNOCKBACK: f32 = 30.0;
    pub const BLOCK_KNOCKBACK: f32 = 20.0;
    pub const TANK_BLOCK_CHANCE: f32 = 0.3;

    /// Spawning (seconds)
    pub const SPAWN_INTERVAL_BASE: f32 = 0.5;
    pub const SPAWN_INTERVAL_PER_LEVEL: f32 = 0.01;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.1;
    /// Distance past the half-viewport where enemies appear
    pub const SPAWN_MARGIN: f32 = 100.0;

    /// Gems
    pub const GEM_RADIUS: f32 = 8.0;
    pub const MAGNET_RANGE: f32 = 150.0;
    pub const MAGNET_SPEED: f32 = 400.0;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 20.0;
    pub const PICKUP_LIFETIME: f32 = 30.0;
    pub const PICKUP_REACH_MARGIN: f32 = 10.0;
    pub const HEAL_AMOUNT: f32 = 40.0;
    pub const POWER_UP_DAMAGE: f32 = 15.0;
    pub const POWER_UP_SIZE: f32 = 8.0;

    /// Leveling
    pub const XP_PER_LEVEL: u32 = 100;
    pub const LEVEL_UP_DAMAGE: f32 = 5.0;

    /// Area stun ("roar")
    pub const ROAR_COST: f32 = 30.0;
    pub const ROAR_RANGE: f32 = 400.0;
    pub const ROAR_STUN: f32 = 3.0;
    pub const ROAR_KNOCKBACK: f32 = 150.0;
    pub const ROAR_RING_SPEED: f32 = 1000.0;
    pub const ROAR_RING_FADE: f32 = 2.0;

    /// Cosmetic budgets
    pub const MAX_DAMAGE_TEXTS: usize = 64;
    pub const DAMAGE_TEXT_RISE: f32 = 50.0;
    pub const DAMAGE_TEXT_LIFE: f32 = 1.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Move `pos` directly away from `from` by `distance`.
///
/// Coincident points are pushed along +x.
#[inline]
pub fn push_away(pos: Vec2, from: Vec2, distance: f32) -> Vec2 {
    pos + (pos - from).normalize_or(Vec2::X) * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_away() {
        let pushed = push_away(Vec2::new(10.0, 0.0), Vec2::ZERO, 5.0);
        assert!((pushed.x - 15.0).abs() < 1e-4);
        assert!(pushed.y.abs() < 1e-4);

        let coincident = push_away(Vec2::ONE, Vec2::ONE, 2.0);
        assert!((coincident - Vec2::new(3.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y - 2.0).abs() < 1e-4);
    }
}
