//! Browser back-ends: LocalStorage and a page-driven game handle

use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::host::Collaborators;
use crate::input::{EventBus, InputEvent, Key};
use crate::level::LevelVariant;
use crate::persistence::KeyValueStore;
use crate::session::{FrameInput, GameSession};
use crate::settings::Settings;

/// `KeyValueStore` over `window.localStorage`.
///
/// If storage is unavailable (private mode, sandboxed iframe) reads return
/// nothing and writes are dropped.
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores will not be saved");
        }
        Self { storage }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to save {}", key);
            }
        }
    }
}

/// Collaborators available in a plain browser page: Web Audio only.
/// The page renders the player itself from `WebGame` readings.
pub fn browser_collaborators(settings: &Settings) -> Collaborators {
    Collaborators::new().with_audio(WebAudio::new(settings.effective_volume()))
}

/// One level, driven from JavaScript. Retrying means building a new one.
#[wasm_bindgen]
pub struct WebGame {
    bus: EventBus,
    session: Option<GameSession>,
}

#[wasm_bindgen]
impl WebGame {
    /// Start the level named by `scene`, e.g. "GAME" or "OPP"
    #[wasm_bindgen(constructor)]
    pub fn new(scene: &str) -> Result<WebGame, JsValue> {
        let variant = LevelVariant::from_scene_name(scene)
            .filter(|v| v.is_playable())
            .ok_or_else(|| JsValue::from_str(&format!("{} is not a playable level", scene)))?;
        let store = LocalStore::new();
        let settings = Settings::load(&store);
        let host = browser_collaborators(&settings);
        let mut bus = EventBus::new();
        let session = GameSession::start(variant, settings, host, Box::new(store), &mut bus);
        Ok(WebGame {
            bus,
            session: Some(session),
        })
    }

    pub fn tap(&mut self) {
        self.bus.publish(InputEvent::PointerDown { x: 0.0, y: 0.0 });
    }

    pub fn debug_key(&mut self) {
        self.bus.publish(InputEvent::KeyDown(Key::R));
    }

    /// One animation frame; a non-positive half-height means there is no canvas
    pub fn frame(&mut self, dt: f32, player_y: f32, visible_half_height: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let frame = FrameInput {
            player_y,
            visible_half_height: (visible_half_height > 0.0).then_some(visible_half_height),
        };
        session.update(&mut self.bus, dt, frame);
    }

    pub fn score(&self) -> u64 {
        self.session.as_ref().map_or(0, |s| s.player().score())
    }

    pub fn is_alive(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.player().is_alive())
    }

    /// Signed gravity scale the page should apply to its body
    pub fn gravity_scale(&self) -> f32 {
        self.session.as_ref().map_or(0.0, |s| s.player().gravity_scale())
    }
}

impl Drop for WebGame {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            session.teardown(&mut self.bus);
        }
    }
}
