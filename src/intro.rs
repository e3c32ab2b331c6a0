//! Splash screen: fade the logo in and out, then open the start menu

use crate::host::{Animator, SceneLoader};
use crate::level::START_MENU_SCENE;
use crate::tween::{self, AnimTarget, TweenSequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroPhase {
    Idle,
    Fading,
    Done,
}

/// One-shot intro. Not restartable.
pub struct IntroSequence {
    phase: IntroPhase,
    sequence: TweenSequence,
    elapsed: f32,
    animator: Option<Box<dyn Animator>>,
    scenes: Option<Box<dyn SceneLoader>>,
}

impl IntroSequence {
    pub fn new(animator: Option<Box<dyn Animator>>, scenes: Option<Box<dyn SceneLoader>>) -> Self {
        Self {
            phase: IntroPhase::Idle,
            sequence: tween::splash_fade(),
            elapsed: 0.0,
            animator,
            scenes,
        }
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase
    }

    /// Total time before the menu loads
    pub fn duration(&self) -> f32 {
        self.sequence.duration()
    }

    pub fn start(&mut self) {
        if self.phase != IntroPhase::Idle {
            return;
        }
        if let Some(animator) = self.animator.as_mut() {
            animator.play(AnimTarget::Logo, self.sequence.clone());
        }
        self.phase = IntroPhase::Fading;
        log::debug!("Intro started ({:.1}s)", self.duration());
    }

    /// Advance the clock; loads the start menu once the fade completes
    pub fn update(&mut self, dt: f32) {
        if self.phase != IntroPhase::Fading {
            return;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed >= self.sequence.duration() {
            self.phase = IntroPhase::Done;
            log::info!("Intro finished, loading {}", START_MENU_SCENE);
            if let Some(scenes) = self.scenes.as_mut() {
                scenes.load_scene(START_MENU_SCENE);
            }
        }
    }
}
