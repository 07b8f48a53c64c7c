//! Frame clock
//!
//! Converts the monotonically increasing timestamps delivered with each
//! display refresh into simulation steps. Long gaps (a hidden tab, a stall)
//! are dropped rather than simulated in one large jump.

use crate::consts::MAX_FRAME_DELTA_MS;

/// What a display refresh should do to the simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStep {
    /// The clock is stopped; nothing advances
    Halted,
    /// Gap too large; the anchor moved but nothing is simulated
    Skipped { delta_ms: f64 },
    /// Advance by this many seconds (0 on the first frame after a start)
    Step(f32),
}

/// Anchored display clock
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    running: bool,
    /// Timestamp (ms) of the previous refresh while running
    anchor: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin delivering steps; the next refresh re-anchors with a zero step
    pub fn start(&mut self) {
        self.running = true;
        self.anchor = None;
    }

    /// Stop delivering steps. Calling it twice is harmless.
    pub fn stop(&mut self) {
        self.running = false;
        self.anchor = None;
    }

    /// Feed one refresh timestamp in milliseconds
    pub fn advance(&mut self, now_ms: f64) -> FrameStep {
        if !self.running {
            return FrameStep::Halted;
        }

        let Some(prev) = self.anchor.replace(now_ms) else {
            return FrameStep::Step(0.0);
        };

        let delta_ms = (now_ms - prev).max(0.0);
        if delta_ms > MAX_FRAME_DELTA_MS {
            log::debug!("Skipping {:.0}ms frame gap", delta_ms);
            return FrameStep::Skipped { delta_ms };
        }
        FrameStep::Step((delta_ms / 1000.0) as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        clock.start();
        assert_eq!(clock.advance(1234.0), FrameStep::Step(0.0));
        assert_eq!(clock.advance(1250.0), FrameStep::Step(0.016));
    }

    #[test]
    fn test_stopped_clock_halts() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(10.0), FrameStep::Halted);
        clock.start();
        clock.advance(10.0);
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.advance(20.0), FrameStep::Halted);
    }

    #[test]
    fn test_large_gap_skipped_then_resumes() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        assert_eq!(
            clock.advance(500.0),
            FrameStep::Skipped { delta_ms: 500.0 }
        );
        // Anchor moved to 500
        assert_eq!(clock.advance(510.0), FrameStep::Step(0.01));
    }

    #[test]
    fn test_exact_limit_is_simulated() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        assert_eq!(clock.advance(200.0), FrameStep::Step(0.2));
    }

    #[test]
    fn test_restart_reanchors() {
        let mut clock = FrameClock::new();
        clock.start();
        clock.advance(0.0);
        clock.stop();
        clock.start();
        assert_eq!(clock.advance(90_000.0), FrameStep::Step(0.0));
    }

    proptest! {
        #[test]
        fn test_steps_are_bounded(gaps in prop::collection::vec(0.0f64..1000.0, 1..100)) {
            let mut clock = FrameClock::new();
            clock.start();
            let mut now = 0.0;
            clock.advance(now);
            for gap in gaps {
                now += gap;
                match clock.advance(now) {
                    FrameStep::Step(dt) => prop_assert!(dt >= 0.0 && dt <= 0.2),
                    FrameStep::Skipped { delta_ms } => prop_assert!(delta_ms > MAX_FRAME_DELTA_MS),
                    FrameStep::Halted => prop_assert!(false, "running clock halted"),
                }
            }
        }
    }
}
