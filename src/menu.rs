//! Start menu routing
//!
//! Each menu button loads one level variant by scene name.

use crate::host::SceneLoader;
use crate::input::{ButtonId, EventBus, InputEvent, Subscriptions, Topic};
use crate::level::LevelVariant;

/// Static button to level lookup
#[derive(Debug, Clone)]
pub struct LevelRouter {
    /// Skin selection is optional in menu layouts
    skin_bound: bool,
}

impl Default for LevelRouter {
    fn default() -> Self {
        Self { skin_bound: true }
    }
}

impl LevelRouter {
    pub fn new(skin_bound: bool) -> Self {
        Self { skin_bound }
    }

    /// Level for a button, None for buttons the menu doesn't own
    pub fn route(&self, button: ButtonId) -> Option<LevelVariant> {
        match button {
            ButtonId::Play => Some(LevelVariant::Standard),
            ButtonId::Hardcore => Some(LevelVariant::Hardcore),
            ButtonId::Opp => Some(LevelVariant::Alternate),
            ButtonId::Skin if self.skin_bound => Some(LevelVariant::SkinSelect),
            ButtonId::Skin | ButtonId::Retry => None,
        }
    }

    /// Load the level behind `button`. Returns the variant loaded.
    pub fn press(&self, button: ButtonId, scenes: &mut dyn SceneLoader) -> Option<LevelVariant> {
        let variant = self.route(button)?;
        log::info!("Menu: loading {}", variant.scene_name());
        scenes.load_scene(variant.scene_name());
        Some(variant)
    }
}

/// Start menu scene: listens for button clicks and routes them
pub struct StartMenu {
    router: LevelRouter,
    scenes: Option<Box<dyn SceneLoader>>,
    subscriptions: Option<Subscriptions>,
}

impl StartMenu {
    pub fn new(router: LevelRouter, scenes: Option<Box<dyn SceneLoader>>) -> Self {
        Self {
            router,
            scenes,
            subscriptions: None,
        }
    }

    pub fn attach(&mut self, bus: &mut EventBus) {
        if self.subscriptions.is_none() {
            self.subscriptions = Some(Subscriptions::subscribe(bus, &[Topic::Button]));
        }
    }

    pub fn detach(&mut self, bus: &mut EventBus) {
        if let Some(subs) = self.subscriptions.take() {
            subs.withdraw(bus);
        }
    }

    /// Route pending clicks. Stops after the first level load.
    pub fn poll(&mut self, bus: &mut EventBus) -> Option<LevelVariant> {
        let events = self.subscriptions.as_ref()?.take_all(bus);
        let scenes = self.scenes.as_deref_mut()?;
        events.into_iter().find_map(|event| match event {
            InputEvent::Button(button) => self.router.press(button, scenes),
            _ => None,
        })
    }
}
