//! Headless stand-ins for the engine
//!
//! Enough physics and tween playback to run a level without a renderer:
//! the native binary uses these to play a full run in the terminal, and the
//! integration tests use them to drive the player through real motion.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::host::{Animator, Camera, PlayerBody, SceneLoader};
use crate::tween::{AnimTarget, TweenSequence, TweenValue};

/// Pixels per physics unit (velocity is given in units/s)
pub const PIXELS_PER_UNIT: f32 = 32.0;
/// Downward acceleration in px/s² per unit of gravity scale, y up
pub const GRAVITY_PX: f32 = 32.0;
/// Canvas half-height used by the demo (640 px tall)
pub const DEMO_HALF_HEIGHT: f32 = 320.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyState {
    pub y: f32,
    /// px/s
    pub vy: f32,
    pub gravity_scale: f32,
}

/// Vertical-only rigid body
#[derive(Clone, Default)]
pub struct HeadlessBody {
    state: Rc<RefCell<BodyState>>,
}

impl HeadlessBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BodyState {
        *self.state.borrow()
    }

    /// Semi-implicit Euler step
    pub fn step(&self, dt: f32) {
        let mut s = self.state.borrow_mut();
        s.vy += s.gravity_scale * GRAVITY_PX * dt;
        s.y += s.vy * dt;
    }
}

impl PlayerBody for HeadlessBody {
    fn set_gravity_scale(&mut self, scale: f32) {
        self.state.borrow_mut().gravity_scale = scale;
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.state.borrow_mut().vy = velocity.y * PIXELS_PER_UNIT;
    }
}

struct ActiveTween {
    sequence: TweenSequence,
    start: Option<TweenValue>,
    elapsed: f32,
}

#[derive(Default)]
struct AnimState {
    active: HashMap<AnimTarget, ActiveTween>,
    values: HashMap<AnimTarget, TweenValue>,
}

/// Plays tween sequences against an in-memory property table.
/// A new sequence on a target replaces the running one.
#[derive(Clone, Default)]
pub struct HeadlessAnimator {
    state: Rc<RefCell<AnimState>>,
}

impl HeadlessAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a property value before anything animates it
    pub fn set_value(&self, target: AnimTarget, value: TweenValue) {
        self.state.borrow_mut().values.insert(target, value);
    }

    pub fn value(&self, target: AnimTarget) -> Option<TweenValue> {
        self.state.borrow().values.get(&target).copied()
    }

    pub fn is_animating(&self, target: AnimTarget) -> bool {
        self.state.borrow().active.contains_key(&target)
    }

    pub fn advance(&self, dt: f32) {
        let mut guard = self.state.borrow_mut();
        let AnimState { active, values } = &mut *guard;

        active.retain(|target, tween| {
            tween.elapsed += dt;
            if let Some(v) = tween.sequence.sample(tween.elapsed, tween.start) {
                values.insert(*target, v);
            }
            tween.elapsed < tween.sequence.duration()
        });
    }
}

impl Animator for HeadlessAnimator {
    fn play(&mut self, target: AnimTarget, sequence: TweenSequence) {
        let mut s = self.state.borrow_mut();
        let start = s.values.get(&target).copied();
        if let Some(v) = sequence.sample(0.0, start) {
            s.values.insert(target, v);
        }
        s.active.insert(
            target,
            ActiveTween {
                sequence,
                start,
                elapsed: 0.0,
            },
        );
    }
}

/// Camera that never moves on its own
#[derive(Debug, Clone, Copy)]
pub struct FixedCamera(pub Vec3);

impl Camera for FixedCamera {
    fn position(&self) -> Vec3 {
        self.0
    }
}

/// Remembers scene load requests so the caller can act on them
#[derive(Clone, Default)]
pub struct HeadlessScenes {
    requests: Rc<RefCell<Vec<String>>>,
}

impl HeadlessScenes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest pending request, if any
    pub fn take_request(&self) -> Option<String> {
        let mut requests = self.requests.borrow_mut();
        if requests.is_empty() {
            None
        } else {
            Some(requests.remove(0))
        }
    }
}

impl SceneLoader for HeadlessScenes {
    fn load_scene(&mut self, name: &str) {
        log::debug!("Scene load requested: {}", name);
        self.requests.borrow_mut().push(name.to_string());
    }
}

/// Plays by flipping when the body drifts too far toward the side gravity
/// pulls it to. Each flip rolls a new trigger depth; a roll beyond the edge
/// means the autopilot hesitates and dies.
pub struct Autopilot {
    rng: Pcg32,
    trigger: f32,
}

impl Autopilot {
    /// Trigger depth range as a fraction of the half-height
    const TRIGGER_RANGE: std::ops::Range<f32> = 0.2..1.15;

    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let trigger = rng.random_range(Self::TRIGGER_RANGE);
        Self { rng, trigger }
    }

    /// Whether to flip this frame
    pub fn should_flip(&mut self, body: &BodyState, half_height: f32) -> bool {
        let pulled_toward = body.gravity_scale.signum();
        if body.y.signum() == pulled_toward && body.y.abs() > self.trigger * half_height {
            self.trigger = self.rng.random_range(Self::TRIGGER_RANGE);
            return true;
        }
        false
    }
}
