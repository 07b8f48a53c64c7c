//! Game state and core simulation types
//!
//! Every entity collection is owned by [`GameState`]. Subsystems receive it by
//! mutable reference during a step; the renderer only ever sees `&GameState`.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::consts::*;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended (player hp reached zero)
    GameOver,
}

/// Anything with a position and a collision radius
pub trait Body {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Whether two bodies overlap, shrunk by `tolerance`
    fn overlaps<B: Body>(&self, other: &B, tolerance: f32) -> bool {
        self.pos().distance(other.pos()) < self.radius() + other.radius() - tolerance
    }
}

macro_rules! impl_body {
    ($ty:ty) => {
        impl Body for $ty {
            fn pos(&self) -> Vec2 {
                self.pos
            }

            fn radius(&self) -> f32 {
                self.radius
            }
        }
    };
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub mp: f32,
    pub max_mp: f32,
    pub xp: u32,
    pub level: u32,
    /// Movement speed (units per second)
    pub speed: f32,
    /// Number of orbiting blades (1..=8)
    pub blade_count: u32,
    /// Base spin (radians per second)
    pub blade_speed: f32,
    pub blade_damage: f32,
    /// Visual size, also drives orbit radius and hitbox
    pub blade_size: f32,
    pub combo: u32,
    /// Seconds until the combo resets
    pub combo_timer: f32,
}

impl Player {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            mp: PLAYER_MAX_MP,
            max_mp: PLAYER_MAX_MP,
            xp: 0,
            level: 1,
            speed: PLAYER_SPEED,
            blade_count: BLADE_START_COUNT,
            blade_speed: BLADE_SPIN_SPEED,
            blade_damage: BLADE_START_DAMAGE,
            blade_size: BLADE_START_SIZE,
            combo: 0,
            combo_timer: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }
}

impl_body!(Player);

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    /// Slow and heavy, may block blade hits
    Tank,
}

impl EnemyKind {
    /// Score awarded on defeat
    pub fn score_value(self) -> u64 {
        match self {
            EnemyKind::Tank => 50,
            _ => 10,
        }
    }

    /// XP carried by the gem dropped on defeat
    pub fn gem_value(self) -> u32 {
        match self {
            EnemyKind::Tank => 50,
            _ => 10,
        }
    }

    /// Knockback distance from a landed blade hit
    pub fn hit_knockback(self) -> f32 {
        match self {
            EnemyKind::Tank => TANK_HIT_KNOCKBACK,
            _ => HIT_KNOCKBACK,
        }
    }
}

/// An enemy chasing the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    /// Contact damage per second (before the contact scale)
    pub damage: f32,
    /// Seconds of stun remaining (0 when free)
    pub stun: f32,
}

impl Enemy {
    pub fn is_stunned(&self) -> bool {
        self.stun > 0.0
    }

    /// Only a free Tank can block
    pub fn can_block(&self) -> bool {
        self.kind == EnemyKind::Tank && !self.is_stunned()
    }
}

impl_body!(Enemy);

/// XP gem dropped by a defeated enemy
#[derive(Debug, Clone)]
pub struct Gem {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub value: u32,
    pub color: [f32; 4],
}

impl_body!(Gem);

/// Buff item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores hp
    Heal,
    /// One more orbiting blade
    BladeUp,
    /// More blade damage and size
    PowerUp,
}

impl PickupKind {
    pub fn label(self) -> &'static str {
        match self {
            PickupKind::Heal => "HEAL",
            PickupKind::BladeUp => "BLADE UP",
            PickupKind::PowerUp => "POWER UP",
        }
    }
}

/// A timed buff item
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds before it disappears
    pub life: f32,
}

impl_body!(Pickup);

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: [f32; 4],
    /// Seconds remaining
    pub life: f32,
}

impl_body!(Particle);

/// Content of a floating text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextValue {
    Number(u32),
    Label(&'static str),
}

impl std::fmt::Display for TextValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextValue::Number(n) => write!(f, "{n}"),
            TextValue::Label(s) => f.write_str(s),
        }
    }
}

/// Floating feedback text (damage numbers, labels)
#[derive(Debug, Clone)]
pub struct DamageText {
    pub pos: Vec2,
    pub value: TextValue,
    pub color: [f32; 4],
    /// Seconds remaining
    pub life: f32,
}

/// Expanding ring left behind by the area stun (purely visual)
#[derive(Debug, Clone, Copy, Default)]
pub struct RoarRing {
    pub active: bool,
    pub radius: f32,
    pub alpha: f32,
}

/// Flat status snapshot for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub hp: f32,
    pub max_hp: f32,
    pub mp: f32,
    pub max_mp: f32,
    pub xp: u32,
    pub level: u32,
    pub score: u64,
    pub combo: u32,
}

/// Final result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub level: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub gems: Vec<Gem>,
    pub pickups: Vec<Pickup>,
    /// Visual particles (not gameplay-affecting)
    pub particles: VecDeque<Particle>,
    pub damage_texts: VecDeque<DamageText>,
    pub roar: RoarRing,
    /// Top-left corner of the viewport in world units
    pub camera: Vec2,
    /// Shared spin angle of all blades (radians)
    pub blade_angle: f32,
    pub score: u64,
    /// Simulated seconds since the run started
    pub elapsed: f32,
    /// `elapsed` at the last enemy spawn
    pub last_spawn: f32,
    /// Events emitted by the current step (cleared at its start)
    pub events: Vec<GameEvent>,
    /// Particle budget from the quality preset (0 disables particles)
    pub particle_limit: usize,
    /// Floating text budget (0 disables damage numbers)
    pub text_limit: usize,
    pub(crate) next_id: u32,
}

impl GameState {
    /// Create a fresh run in the `Playing` phase
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Playing,
            player: Player::new(0),
            enemies: Vec::new(),
            gems: Vec::new(),
            pickups: Vec::new(),
            particles: VecDeque::new(),
            damage_texts: VecDeque::new(),
            roar: RoarRing::default(),
            camera: Vec2::ZERO,
            blade_angle: 0.0,
            score: 0,
            elapsed: 0.0,
            last_spawn: 0.0,
            events: Vec::with_capacity(64),
            particle_limit: crate::settings::QualityPreset::default().max_particles(),
            text_limit: MAX_DAMAGE_TEXTS,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        next_id(&mut self.next_id)
    }

    pub fn status(&self) -> Status {
        let p = &self.player;
        Status {
            hp: p.hp.max(0.0),
            max_hp: p.max_hp,
            mp: p.mp,
            max_mp: p.max_mp,
            xp: p.xp,
            level: p.level,
            score: self.score,
            combo: p.combo,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            level: self.player.level,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Bump an ID counter; split out so subsystems holding disjoint field
/// borrows can allocate without the whole state.
pub(crate) fn next_id(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_defaults() {
        let state = GameState::new();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.level, 1);
        assert_eq!(state.player.blade_count, 1);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert_eq!(state.player.mp, state.player.max_mp);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut state = GameState::new();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert_ne!(a, state.player.id);
    }

    #[test]
    fn test_overlap_uses_tolerance() {
        let player = Player::new(0);
        let enemy = Enemy {
            id: 1,
            kind: EnemyKind::Normal,
            pos: Vec2::new(49.0, 0.0),
            radius: 22.0,
            hp: 40.0,
            max_hp: 40.0,
            speed: 100.0,
            damage: 10.0,
            stun: 0.0,
        };
        // 30 + 22 - 5 = 47 < 49
        assert!(!player.overlaps(&enemy, CONTACT_TOLERANCE));
        assert!(player.overlaps(&enemy, 0.0));
    }

    #[test]
    fn test_status_clamps_negative_hp() {
        let mut state = GameState::new();
        state.player.hp = -3.0;
        assert_eq!(state.status().hp, 0.0);
    }
}
