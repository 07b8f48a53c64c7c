//! Simulation module
//!
//! All gameplay logic lives here. A step is a pure function of the state,
//! the input snapshot, the elapsed seconds and the RNG it is handed:
//! - No rendering, audio or platform dependencies
//! - Randomness only through the `Rng` passed in
//! - Stable iteration order (insertion order of each collection)

pub mod ability;
pub mod combat;
pub mod effects;
pub mod events;
pub mod progression;
pub mod spawner;
pub mod state;
pub mod tick;

pub use events::{Cue, GameEvent};
pub use state::{
    Body, DamageText, Enemy, EnemyKind, GamePhase, GameState, Gem, Particle, Pickup, PickupKind,
    Player, RoarRing, RunSummary, Status, TextValue,
};
pub use tick::{DirectionKeys, TickInput, tick};
