//! A running level
//!
//! The session is the level instance that owns the player: it builds the
//! controller on load, hooks it to the event bus, feeds it per-frame readings
//! and unhooks it on teardown.

use crate::consts::MAX_FRAME_DT;
use crate::host::Collaborators;
use crate::input::EventBus;
use crate::level::LevelVariant;
use crate::persistence::KeyValueStore;
use crate::player::{PlayerController, PlayerState};
use crate::settings::Settings;

/// Readings taken from the host each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Player y in canvas space (origin at centre, y up)
    pub player_y: f32,
    /// Half the visible canvas height, None if there is no canvas
    pub visible_half_height: Option<f32>,
}

pub struct GameSession {
    player: PlayerController,
    elapsed: f32,
    frames: u64,
}

impl GameSession {
    /// Load a level and attach its player to `bus`
    pub fn start(
        variant: LevelVariant,
        settings: Settings,
        host: Collaborators,
        store: Box<dyn KeyValueStore>,
        bus: &mut EventBus,
    ) -> Self {
        if !variant.is_playable() {
            log::warn!("{} has no player, starting one anyway", variant.as_str());
        }
        let mut player = PlayerController::new(variant, settings, host, store);
        player.on_load();
        player.attach(bus);
        Self {
            player,
            elapsed: 0.0,
            frames: 0,
        }
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    /// Seconds since load
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One rendered frame: input, score timer, bounds
    pub fn update(&mut self, bus: &mut EventBus, dt: f32, frame: FrameInput) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.frames += 1;
        self.elapsed += dt;

        self.player.poll(bus);
        self.player.advance(dt);

        if let Some(half_height) = frame.visible_half_height {
            self.player.check_bounds(frame.player_y, half_height);
        }
    }

    /// Tear the level down, detaching the player from the bus
    pub fn teardown(mut self, bus: &mut EventBus) -> PlayerState {
        self.player.detach(bus);
        log::info!(
            "{} level torn down after {:.1}s ({} frames)",
            self.player.variant().as_str(),
            self.elapsed,
            self.frames
        );
        *self.player.state()
    }
}
