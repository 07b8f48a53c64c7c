//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (display timestamps to simulation steps)

pub mod frame_clock;

pub use frame_clock::{FrameClock, FrameStep};
