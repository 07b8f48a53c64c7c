//! Events emitted during a simulation step
//!
//! The step never talks to audio or particles directly; it records what
//! happened here and the cosmetic layers react afterwards.

use glam::Vec2;

use super::state::{EnemyKind, PickupKind};

/// Fire-and-forget sound cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Hit,
    Deflect,
    Roar,
    Pickup,
    LevelUp,
    GameOver,
}

/// Something that happened inside one step
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    EnemySpawned { id: u32, kind: EnemyKind },
    /// A blade landed; `highlighted` when the combo was already high
    BladeHit { pos: Vec2, damage: f32, highlighted: bool },
    /// A Tank deflected a blade
    Blocked { pos: Vec2 },
    EnemyKilled { pos: Vec2, kind: EnemyKind },
    PlayerDamaged { amount: f32 },
    GemCollected { value: u32 },
    LevelUp { pos: Vec2, level: u32 },
    PickupCollected { pos: Vec2, kind: PickupKind },
    AbilityUsed { pos: Vec2 },
    EnemyStunned { pos: Vec2 },
    /// Terminal event, emitted exactly once per run
    RunEnded { score: u64, level: u32 },
}

impl GameEvent {
    /// Sound cue for this event, if any
    pub fn cue(&self) -> Option<Cue> {
        match self {
            GameEvent::BladeHit { .. } => Some(Cue::Hit),
            GameEvent::Blocked { .. } => Some(Cue::Deflect),
            GameEvent::AbilityUsed { .. } => Some(Cue::Roar),
            GameEvent::PickupCollected { .. } => Some(Cue::Pickup),
            GameEvent::LevelUp { .. } => Some(Cue::LevelUp),
            GameEvent::RunEnded { .. } => Some(Cue::GameOver),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues() {
        assert_eq!(
            GameEvent::Blocked { pos: Vec2::ZERO }.cue(),
            Some(Cue::Deflect)
        );
        assert_eq!(GameEvent::GemCollected { value: 10 }.cue(), None);
        assert_eq!(
            GameEvent::RunEnded { score: 0, level: 1 }.cue(),
            Some(Cue::GameOver)
        );
    }
}
