//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Cue
//! playback is fire-and-forget: every failure path degrades to silence and
//! nothing here can block a game state transition.

use web_sys::{AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType};

use crate::game::{Cue, CueSink};
use crate::settings::Settings;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context or in odd embedders
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pull volume/mute preferences from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a feedback cue
    pub fn play(&self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Click => self.play_click(ctx, vol),
            Cue::Move => self.play_move(ctx, vol),
            Cue::Correct => self.play_correct(ctx, vol),
            Cue::Incorrect => self.play_incorrect(ctx, vol),
            Cue::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Button click - short triangle tick
    fn play_click(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.05, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.00001, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Car move - filtered noise whoosh
    fn play_move(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        let sample_rate = ctx.sample_rate();
        let length = (sample_rate * 0.3) as u32;

        let Ok(buffer) = ctx.create_buffer(1, length, sample_rate) else {
            return;
        };
        let mut noise = vec![0.0f32; length as usize];
        for sample in noise.iter_mut() {
            *sample = (js_sys::Math::random() * 2.0 - 1.0) as f32;
        }
        if buffer.copy_to_channel(&mut noise, 0).is_err() {
            return;
        }

        let Ok(source) = ctx.create_buffer_source() else {
            return;
        };
        source.set_buffer(Some(&buffer));

        let Ok(bandpass) = ctx.create_biquad_filter() else {
            return;
        };
        bandpass.set_type(BiquadFilterType::Bandpass);
        bandpass.frequency().set_value_at_time(400.0, t).ok();
        bandpass
            .frequency()
            .exponential_ramp_to_value_at_time(2000.0, t + 0.25)
            .ok();
        bandpass.q().set_value(1.0);

        let Ok(gain) = ctx.create_gain() else { return };
        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.00001, t + 0.25)
            .ok();

        if source.connect_with_audio_node(&bandpass).is_err()
            || bandpass.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(&ctx.destination()).is_err()
        {
            return;
        }
        source.start().ok();
        source.stop_with_when(t + 0.3).ok();
    }

    /// Correct answer - rising two-note chime (C5 then G5)
    fn play_correct(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.25, 783.99].iter().enumerate() {
            let at = t + i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.15, at).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.00001, at + 0.1)
                    .ok();
                osc.start_with_when(at).ok();
                osc.stop_with_when(at + 0.1).ok();
            }
        }
    }

    /// Wrong answer - sagging sawtooth (E3 down)
    fn play_incorrect(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 164.81, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(164.81, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(110.0, t + 0.2)
            .ok();
        gain.gain().set_value_at_time(vol * 0.1, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.00001, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Game over - sad descending run (G4 F4 E4 D4)
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0, 349.0, 329.0, 293.0].iter().enumerate() {
            let at = t + i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.15, at).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.00001, at + 0.1)
                    .ok();
                osc.start_with_when(at).ok();
                osc.stop_with_when(at + 0.1).ok();
            }
        }
    }
}

impl CueSink for AudioManager {
    fn emit(&mut self, cue: Cue) {
        self.play(cue);
    }
}
