//! Session driver
//!
//! Owns one run's state together with the pending input, the frame clock and
//! the RNG. The browser loop calls [`Session::frame`] once per refresh and
//! reads [`Session::events`] afterwards for audio and HUD updates.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::platform::{FrameClock, FrameStep};
use crate::sim::{GameEvent, GamePhase, GameState, RunSummary, Status, TickInput, tick};

/// Result of one display refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// Clock stopped; the caller should stop scheduling frames
    Halted,
    /// Gap too long; state untouched
    Skipped,
    /// Simulation advanced by this many seconds
    Stepped(f32),
}

pub struct Session {
    pub state: GameState,
    /// Pending input, sampled at the start of every processed frame
    pub input: TickInput,
    clock: FrameClock,
    rng: Pcg32,
}

impl Session {
    /// Idle session on the title screen
    pub fn new(seed: u64) -> Self {
        let mut state = GameState::new();
        state.phase = GamePhase::Menu;
        Self {
            state,
            input: TickInput::default(),
            clock: FrameClock::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a fresh run and start the clock
    pub fn start(&mut self, seed: u64) {
        let viewport = self.input.viewport;
        let particle_limit = self.state.particle_limit;
        let text_limit = self.state.text_limit;

        self.state = GameState::new();
        self.state.particle_limit = particle_limit;
        self.state.text_limit = text_limit;
        self.input = TickInput {
            viewport,
            ..Default::default()
        };
        self.rng = Pcg32::seed_from_u64(seed);
        self.clock.start();
        log::info!("Run started (seed {})", seed);
    }

    /// Halt the loop; idempotent
    pub fn stop(&mut self) {
        if self.clock.is_running() {
            log::debug!("Frame clock stopped");
        }
        self.clock.stop();
    }

    /// Restart the clock after a stop without resetting the run
    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Playing && !self.clock.is_running() {
            self.clock.start();
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Queue the area stun for the next processed frame
    pub fn request_ability(&mut self) {
        self.input.ability = true;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.input.viewport = Vec2::new(width, height);
    }

    /// Process one display refresh at `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        match self.clock.advance(now_ms) {
            FrameStep::Halted => FrameOutcome::Halted,
            FrameStep::Skipped { .. } => {
                self.state.events.clear();
                FrameOutcome::Skipped
            }
            FrameStep::Step(dt) => {
                let input = self.input.clone();
                self.input.ability = false;

                tick(&mut self.state, &input, dt, &mut self.rng);

                if self.state.phase == GamePhase::GameOver {
                    self.stop();
                }
                FrameOutcome::Stepped(dt)
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn summary(&self) -> RunSummary {
        self.state.summary()
    }

    /// Events of the most recent processed frame
    pub fn events(&self) -> &[GameEvent] {
        &self.state.events
    }

    /// Apply particle and text budgets, effective immediately
    pub fn set_effect_limits(&mut self, particles: usize, texts: usize) {
        self.state.particle_limit = particles;
        self.state.text_limit = texts;
        if self.state.particles.len() > particles {
            let excess = self.state.particles.len() - particles;
            self.state.particles.drain(..excess);
        }
        if self.state.damage_texts.len() > texts {
            let excess = self.state.damage_texts.len() - texts;
            self.state.damage_texts.drain(..excess);
        }
    }
}
