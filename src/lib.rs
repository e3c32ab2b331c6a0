//! Flip Gravity - a one-tap gravity flipping arcade game
//!
//! Core modules:
//! - `player`: Player state machine (flip, score tick, bounds, game over)
//! - `session`: Level instance that owns a player and wires its input
//! - `menu`: Start menu routing to level variants
//! - `intro`: Splash fade sequence
//! - `host`: Traits for engine-side collaborators (body, animator, UI, scenes)
//! - `persistence`: Key-value storage back-ends
//! - `headless`: In-crate stand-ins for the engine, used by the demo and tests

pub mod audio;
pub mod color;
pub mod headless;
pub mod highscores;
pub mod host;
pub mod input;
pub mod intro;
pub mod level;
pub mod menu;
pub mod persistence;
pub mod platform;
pub mod player;
pub mod session;
pub mod settings;
pub mod tween;

pub use highscores::{HighScores, ScoreRecord};
pub use level::LevelVariant;
pub use player::{Gravity, PlayerController, PlayerState};
pub use session::{FrameInput, GameSession};
pub use settings::{Settings, Tuning};

/// Game configuration constants
pub mod consts {
    /// Gravity scale magnitude applied to the player body
    pub const GRAVITY_SCALE: f32 = 10.0;
    /// Vertical speed applied on flip (same sign as the new gravity)
    pub const FLIP_VELOCITY: f32 = 12.0;
    /// Extra pixels outside the visible area before the player dies
    pub const BOUNDS_MARGIN: f32 = 20.0;
    /// Seconds between score ticks
    pub const SCORE_INTERVAL: f32 = 1.0;
    /// Longest frame a session will simulate (avoids a burst after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Most time the score timer will credit in one call
    pub const MAX_TIMER_STEP_SECS: f32 = 10.0;

    /// Squash & stretch on flip
    pub const SQUASH_SCALE: (f32, f32) = (1.2, 0.8);
    pub const SQUASH_STEP_SECS: f32 = 0.08;

    /// Score label pop
    pub const POP_SCALE: f32 = 1.4;
    pub const POP_STEP_SECS: f32 = 0.1;

    /// Camera shake on death
    pub const SHAKE_OFFSET: f32 = 10.0;
    pub const SHAKE_STEP_SECS: f32 = 0.05;

    /// Splash fade timings
    pub const SPLASH_FADE_IN_SECS: f32 = 1.0;
    pub const SPLASH_HOLD_SECS: f32 = 1.5;
    pub const SPLASH_FADE_OUT_SECS: f32 = 1.0;
    pub const OPACITY_OPAQUE: f32 = 255.0;
}
