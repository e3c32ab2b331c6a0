//! Declarative tween sequences
//!
//! The host engine does the actual playback. The game only describes what to
//! animate as a list of steps, which keeps every effect inspectable in tests.
//! `sample` evaluates a sequence at a point in time with linear interpolation,
//! matching the host's default easing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Node a tween is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimTarget {
    Player,
    ScoreLabel,
    Camera,
    Logo,
}

/// Animated property and its value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TweenValue {
    Scale(Vec3),
    Position(Vec3),
    /// 0 = transparent, 255 = opaque
    Opacity(f32),
}

impl TweenValue {
    /// Linear blend; mismatched properties snap to `to`
    pub fn lerp(self, to: TweenValue, t: f32) -> TweenValue {
        let t = t.clamp(0.0, 1.0);
        match (self, to) {
            (TweenValue::Scale(a), TweenValue::Scale(b)) => TweenValue::Scale(a.lerp(b, t)),
            (TweenValue::Position(a), TweenValue::Position(b)) => {
                TweenValue::Position(a.lerp(b, t))
            }
            (TweenValue::Opacity(a), TweenValue::Opacity(b)) => {
                TweenValue::Opacity(a + (b - a) * t)
            }
            _ => to,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TweenStep {
    /// Jump to a value instantly
    Set(TweenValue),
    /// Interpolate from the current value over `duration` seconds
    To { duration: f32, value: TweenValue },
    /// Hold the current value
    Delay(f32),
}

/// An ordered list of tween steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TweenSequence {
    steps: Vec<TweenStep>,
}

impl TweenSequence {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn set(mut self, value: TweenValue) -> Self {
        self.steps.push(TweenStep::Set(value));
        self
    }

    pub fn to(mut self, duration: f32, value: TweenValue) -> Self {
        self.steps.push(TweenStep::To {
            duration: duration.max(0.0),
            value,
        });
        self
    }

    pub fn delay(mut self, duration: f32) -> Self {
        self.steps.push(TweenStep::Delay(duration.max(0.0)));
        self
    }

    pub fn steps(&self) -> &[TweenStep] {
        &self.steps
    }

    /// Total playback time in seconds
    pub fn duration(&self) -> f32 {
        self.steps
            .iter()
            .map(|step| match step {
                TweenStep::Set(_) => 0.0,
                TweenStep::To { duration, .. } => *duration,
                TweenStep::Delay(d) => *d,
            })
            .sum()
    }

    /// Value at `elapsed` seconds, starting from `start` (the node's value
    /// before playback). Returns `None` only if nothing has been set yet.
    pub fn sample(&self, elapsed: f32, start: Option<TweenValue>) -> Option<TweenValue> {
        let mut current = start;
        let mut remaining = elapsed.max(0.0);

        for step in &self.steps {
            match *step {
                TweenStep::Set(value) => current = Some(value),
                TweenStep::Delay(d) => {
                    if remaining < d {
                        return current;
                    }
                    remaining -= d;
                }
                TweenStep::To { duration, value } => {
                    if remaining < duration {
                        let t = remaining / duration;
                        return Some(match current {
                            Some(from) => from.lerp(value, t),
                            None => value,
                        });
                    }
                    current = Some(value);
                    remaining -= duration;
                }
            }
        }

        current
    }

    /// Value once playback has finished
    pub fn final_value(&self, start: Option<TweenValue>) -> Option<TweenValue> {
        self.sample(self.duration(), start)
    }
}

// === Presets ===

/// Quick squash & stretch played on every flip
pub fn squash_stretch() -> TweenSequence {
    let (sx, sy) = SQUASH_SCALE;
    TweenSequence::new()
        .to(SQUASH_STEP_SECS, TweenValue::Scale(Vec3::new(sx, sy, 1.0)))
        .to(SQUASH_STEP_SECS, TweenValue::Scale(Vec3::ONE))
}

/// Score label pop, restarts from unit scale so overlapping pops don't grow
pub fn score_pop() -> TweenSequence {
    TweenSequence::new()
        .set(TweenValue::Scale(Vec3::ONE))
        .to(
            POP_STEP_SECS,
            TweenValue::Scale(Vec3::new(POP_SCALE, POP_SCALE, 1.0)),
        )
        .to(POP_STEP_SECS, TweenValue::Scale(Vec3::ONE))
}

/// Horizontal camera shake ending back at `origin`
pub fn camera_shake(origin: Vec3) -> TweenSequence {
    let offset = Vec3::new(SHAKE_OFFSET, 0.0, 0.0);
    TweenSequence::new()
        .to(SHAKE_STEP_SECS, TweenValue::Position(origin + offset))
        .to(SHAKE_STEP_SECS, TweenValue::Position(origin - offset))
        .to(SHAKE_STEP_SECS, TweenValue::Position(origin))
        .to(SHAKE_STEP_SECS, TweenValue::Position(origin))
}

/// Splash logo: fade in, hold, fade out
pub fn splash_fade() -> TweenSequence {
    TweenSequence::new()
        .set(TweenValue::Opacity(0.0))
        .to(SPLASH_FADE_IN_SECS, TweenValue::Opacity(OPACITY_OPAQUE))
        .delay(SPLASH_HOLD_SECS)
        .to(SPLASH_FADE_OUT_SECS, TweenValue::Opacity(0.0))
}
