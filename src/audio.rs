//! Sound effects
//!
//! The game only names what should be heard; an `AudioPlayer` owned by the
//! host decides how. On the web, `WebAudio` synthesizes everything with
//! oscillators so no asset files are needed.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Gravity flipped
    Flip,
    /// Player left the play area
    Death,
    /// Looping background drone, runs until `stop_ambient`
    Ambient,
}

/// Host-side audio output
pub trait AudioPlayer {
    fn play(&mut self, effect: SoundEffect);
    /// Silence the looping background sound, if any is playing
    fn stop_ambient(&mut self);
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioPlayer, SoundEffect};

    /// Web Audio backed player
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        ambient: Option<OscillatorNode>,
    }

    impl WebAudio {
        pub fn new(volume: f32) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                ambient: None,
            }
        }

        fn create_osc(
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

        /// Flip - short rising chirp
        fn play_flip(ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = Self::create_osc(ctx, 300.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(700.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Death - descending steps
        fn play_death(ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
                let delay = i as f64 * 0.15;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.3).ok();
                }
            }
        }
    }

    impl AudioPlayer for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            if self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Browsers keep the context suspended until a user gesture
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Flip => Self::play_flip(ctx, self.volume),
                SoundEffect::Death => Self::play_death(ctx, self.volume),
                SoundEffect::Ambient => {
                    if self.ambient.is_some() {
                        return;
                    }
                    if let Some((osc, gain)) = Self::create_osc(ctx, 55.0, OscillatorType::Sine) {
                        gain.gain().set_value(self.volume * 0.08);
                        osc.start().ok();
                        self.ambient = Some(osc);
                    }
                }
            }
        }

        fn stop_ambient(&mut self) {
            if let Some(osc) = self.ambient.take() {
                osc.stop().ok();
            }
        }
    }
}
