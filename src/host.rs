//! Engine-side collaborators
//!
//! Everything the game asks the engine to do goes through one of these
//! traits. All of them are optional at construction time: a level without a
//! camera simply doesn't shake, a level without a panel shows nothing.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};

use crate::audio::{AudioPlayer, SoundEffect};
use crate::color::Color;
use crate::tween::{AnimTarget, TweenSequence};

/// Physics body attached to the player
pub trait PlayerBody {
    /// Signed multiplier on world gravity along the vertical axis (y up)
    fn set_gravity_scale(&mut self, scale: f32);
    fn set_linear_velocity(&mut self, velocity: Vec2);
}

/// Tween playback
pub trait Animator {
    fn play(&mut self, target: AnimTarget, sequence: TweenSequence);
}

/// On-screen score text
pub trait ScoreLabel {
    fn set_text(&mut self, text: &str);
    fn set_color(&mut self, color: Color);
}

/// A UI node that can be shown or hidden
pub trait Panel {
    fn set_visible(&mut self, visible: bool);
}

pub trait Camera {
    fn position(&self) -> Vec3;
}

/// Scene switching
pub trait SceneLoader {
    fn load_scene(&mut self, name: &str);
}

/// Collaborators handed to a player at construction
#[derive(Default)]
pub struct Collaborators {
    pub body: Option<Box<dyn PlayerBody>>,
    pub animator: Option<Box<dyn Animator>>,
    pub audio: Option<Box<dyn AudioPlayer>>,
    pub score_label: Option<Box<dyn ScoreLabel>>,
    pub game_over_panel: Option<Box<dyn Panel>>,
    pub camera: Option<Box<dyn Camera>>,
    pub scenes: Option<Box<dyn SceneLoader>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: impl PlayerBody + 'static) -> Self {
        self.body = Some(Box::new(body));
        self
    }

    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn with_audio(mut self, audio: impl AudioPlayer + 'static) -> Self {
        self.audio = Some(Box::new(audio));
        self
    }

    pub fn with_score_label(mut self, label: impl ScoreLabel + 'static) -> Self {
        self.score_label = Some(Box::new(label));
        self
    }

    pub fn with_game_over_panel(mut self, panel: impl Panel + 'static) -> Self {
        self.game_over_panel = Some(Box::new(panel));
        self
    }

    pub fn with_camera(mut self, camera: impl Camera + 'static) -> Self {
        self.camera = Some(Box::new(camera));
        self
    }

    pub fn with_scenes(mut self, scenes: impl SceneLoader + 'static) -> Self {
        self.scenes = Some(Box::new(scenes));
        self
    }
}

/// A single request made to the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    GravityScale(f32),
    Velocity(Vec2),
    Animate(AnimTarget, TweenSequence),
    Sound(SoundEffect),
    StopAmbient,
    ScoreText(String),
    ScoreColor(Color),
    PanelVisible(bool),
    LoadScene(String),
}

/// Shared log of host calls.
///
/// Every handle cloned from a recorder appends to the same list, so one
/// recorder can stand in for all collaborators at once. Used by the headless
/// demo and by tests.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Rc<RefCell<Vec<HostCall>>>,
    camera: Vec3,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera position reported to the player
    pub fn with_camera_at(mut self, position: Vec3) -> Self {
        self.camera = position;
        self
    }

    /// A full set of collaborators backed by this recorder
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with_body(self.clone())
            .with_animator(self.clone())
            .with_audio(self.clone())
            .with_score_label(self.clone())
            .with_game_over_panel(self.clone())
            .with_camera(self.clone())
            .with_scenes(self.clone())
    }

    fn push(&self, call: HostCall) {
        self.calls.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn last(&self, pred: impl Fn(&HostCall) -> bool) -> Option<HostCall> {
        self.calls.borrow().iter().rev().find(|c| pred(c)).cloned()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl PlayerBody for Recorder {
    fn set_gravity_scale(&mut self, scale: f32) {
        self.push(HostCall::GravityScale(scale));
    }

    fn set_linear_velocity(&mut self, velocity: Vec2) {
        self.push(HostCall::Velocity(velocity));
    }
}

impl Animator for Recorder {
    fn play(&mut self, target: AnimTarget, sequence: TweenSequence) {
        self.push(HostCall::Animate(target, sequence));
    }
}

impl AudioPlayer for Recorder {
    fn play(&mut self, effect: SoundEffect) {
        self.push(HostCall::Sound(effect));
    }

    fn stop_ambient(&mut self) {
        self.push(HostCall::StopAmbient);
    }
}

impl ScoreLabel for Recorder {
    fn set_text(&mut self, text: &str) {
        self.push(HostCall::ScoreText(text.to_string()));
    }

    fn set_color(&mut self, color: Color) {
        self.push(HostCall::ScoreColor(color));
    }
}

impl Panel for Recorder {
    fn set_visible(&mut self, visible: bool) {
        self.push(HostCall::PanelVisible(visible));
    }
}

impl Camera for Recorder {
    fn position(&self) -> Vec3 {
        self.camera
    }
}

impl SceneLoader for Recorder {
    fn load_scene(&mut self, name: &str) {
        self.push(HostCall::LoadScene(name.to_string()));
    }
}
