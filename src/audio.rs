//! Audio system using Web Audio API
//!
//! Every cue is a single procedurally shaped oscillator; no sample files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::{Cue, GameEvent};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Resume audio context (required after a user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Effective gain (0 mutes)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Play the cues for one frame's events, each cue at most once
    pub fn play_events(&self, events: &[GameEvent]) {
        let mut played: Vec<Cue> = Vec::with_capacity(4);
        for cue in events.iter().filter_map(GameEvent::cue) {
            if !played.contains(&cue) {
                self.play(cue);
                played.push(cue);
            }
        }
    }

    /// Play a single cue
    pub fn play(&self, cue: Cue) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Hit => self.play_hit(ctx, vol),
            Cue::Deflect => self.play_deflect(ctx, vol),
            Cue::Roar => self.play_roar(ctx, vol),
            Cue::Pickup => self.play_pickup(ctx, vol),
            Cue::LevelUp => self.play_level_up(ctx, vol),
            Cue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Blade hit - short square thud
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency()
            .exponential_ramp_to_value_at_time(40.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Tank block - high triangle tick
    fn play_deflect(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Area stun - long falling sawtooth
    fn play_roar(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().linear_ramp_to_value_at_time(50.0, t + 0.8).ok();
        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.8).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.8).ok();
    }

    /// Pickup - quick rising chirp
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 600.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency()
            .linear_ramp_to_value_at_time(1200.0, t + 0.1)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Level up - three stepped notes on one voice
    fn play_level_up(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(554.0, t + 0.1).ok();
        osc.frequency().set_value_at_time(659.0, t + 0.2).ok();
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.6).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    /// Game over - slow descending notes
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [330.0, 262.0, 196.0].iter().enumerate() {
            let delay = i as f64 * 0.25;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
