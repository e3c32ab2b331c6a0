//! Player state machine
//!
//! The player is either alive or dead; death is terminal for the instance.
//! While alive it flips gravity on tap, scores once per interval and dies
//! when it leaves the visible area. A fresh controller is built whenever the
//! level is reloaded.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::SoundEffect;
use crate::color::{PaletteCursor, RAINBOW};
use crate::consts::MAX_TIMER_STEP_SECS;
use crate::highscores::{HighScores, ScoreRecord};
use crate::host::Collaborators;
use crate::input::{ButtonId, EventBus, InputEvent, Key, Subscriptions, Topic};
use crate::level::LevelVariant;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::tween::{self, AnimTarget};

/// Gravity polarity, y up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gravity {
    #[default]
    Down,
    Up,
}

impl Gravity {
    /// +1 for up, -1 for down
    pub fn sign(self) -> f32 {
        match self {
            Gravity::Down => -1.0,
            Gravity::Up => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Gravity::Down => Gravity::Up,
            Gravity::Up => Gravity::Down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifePhase {
    Alive,
    /// Terminal
    Dead,
}

/// Everything that changes during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub phase: LifePhase,
    pub gravity: Gravity,
    pub score: u64,
    pub palette: PaletteCursor,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            phase: LifePhase::Alive,
            gravity: Gravity::Down,
            score: 0,
            palette: PaletteCursor::default(),
        }
    }
}

impl PlayerState {
    pub fn is_alive(&self) -> bool {
        self.phase == LifePhase::Alive
    }
}

/// Repeating score timer
#[derive(Debug, Clone, Copy)]
struct ScoreTimer {
    interval: f32,
    elapsed: f32,
    scheduled: bool,
}

impl ScoreTimer {
    fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
            scheduled: false,
        }
    }

    fn schedule(&mut self) {
        self.scheduled = true;
        self.elapsed = 0.0;
    }

    fn unschedule(&mut self) {
        self.scheduled = false;
    }

    /// Advance by `dt` seconds, returning how many intervals elapsed
    fn advance(&mut self, dt: f32) -> u32 {
        if !self.scheduled {
            return 0;
        }
        if !dt.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", dt);
            return 0;
        }
        if dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt.min(MAX_TIMER_STEP_SECS);
        let due = (self.elapsed / self.interval).floor();
        self.elapsed = (self.elapsed - due * self.interval).max(0.0);
        due as u32
    }
}

/// Drives one player through a run
pub struct PlayerController {
    state: PlayerState,
    variant: LevelVariant,
    settings: Settings,
    host: Collaborators,
    store: Box<dyn KeyValueStore>,
    timer: ScoreTimer,
    subscriptions: Option<Subscriptions>,
    panel_shown: bool,
    last_record: Option<ScoreRecord>,
}

impl PlayerController {
    pub fn new(
        variant: LevelVariant,
        settings: Settings,
        host: Collaborators,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            state: PlayerState::default(),
            variant,
            timer: ScoreTimer::new(settings.tuning.score_interval),
            settings,
            host,
            store,
            subscriptions: None,
            panel_shown: false,
            last_record: None,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }

    pub fn variant(&self) -> LevelVariant {
        self.variant
    }

    /// Signed gravity scale currently applied to the body
    pub fn gravity_scale(&self) -> f32 {
        self.state.gravity.sign() * self.settings.tuning.gravity_scale
    }

    /// Result of the save made at game over
    pub fn last_record(&self) -> Option<ScoreRecord> {
        self.last_record
    }

    pub fn is_score_scheduled(&self) -> bool {
        self.timer.scheduled
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Level start: apply gravity, start scoring, hide the game over panel
    pub fn on_load(&mut self) {
        let scale = self.gravity_scale();
        if let Some(body) = self.host.body.as_mut() {
            body.set_gravity_scale(scale);
        }

        self.timer.schedule();

        if let Some(panel) = self.host.game_over_panel.as_mut() {
            panel.set_visible(false);
        }
        self.panel_shown = false;

        if self.settings.effective_ambient() {
            self.play_sound(SoundEffect::Ambient);
        }

        log::info!("{} level loaded", self.variant.as_str());
    }

    // === Input wiring ===

    /// Start listening for taps, keys and the retry button
    pub fn attach(&mut self, bus: &mut EventBus) {
        if self.subscriptions.is_some() {
            log::warn!("Player already attached, ignoring");
            return;
        }
        self.subscriptions = Some(Subscriptions::subscribe(
            bus,
            &[Topic::Pointer, Topic::Key, Topic::Button],
        ));
    }

    /// Withdraw every subscription made by `attach`
    pub fn detach(&mut self, bus: &mut EventBus) {
        if let Some(subs) = self.subscriptions.take() {
            subs.withdraw(bus);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Handle everything queued on the bus for this player
    pub fn poll(&mut self, bus: &mut EventBus) {
        let events = match &self.subscriptions {
            Some(subs) => subs.take_all(bus),
            None => return,
        };
        for event in events {
            self.handle_input(event);
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { .. } => self.flip(),
            InputEvent::KeyDown(Key::R) if self.settings.debug_keys => {
                log::info!("Debug key: forcing game over");
                self.game_over();
            }
            InputEvent::Button(ButtonId::Retry) if self.panel_shown => self.retry(),
            _ => {}
        }
    }

    // === Gameplay ===

    /// Invert gravity and kick the body toward the new direction
    pub fn flip(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.state.gravity = self.state.gravity.flipped();
        let scale = self.gravity_scale();
        let sign = self.state.gravity.sign();

        if let Some(body) = self.host.body.as_mut() {
            body.set_gravity_scale(scale);
        }
        if let Some(animator) = self.host.animator.as_mut() {
            animator.play(AnimTarget::Player, tween::squash_stretch());
        }
        self.play_sound(SoundEffect::Flip);
        if let Some(body) = self.host.body.as_mut() {
            body.set_linear_velocity(Vec2::new(0.0, sign * self.settings.tuning.flip_velocity));
        }

        log::debug!("Flip: gravity {:?} (scale {})", self.state.gravity, scale);
    }

    /// Elapsed time for the score timer
    pub fn advance(&mut self, dt: f32) {
        let due = self.timer.advance(dt);
        for _ in 0..due {
            self.tick();
        }
    }

    /// One score point: update label, pop it, step the rainbow
    pub fn tick(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.state.score += 1;
        let color = self.state.palette.advance(&RAINBOW);

        if let Some(label) = self.host.score_label.as_mut() {
            label.set_text(&self.state.score.to_string());
        }
        if let Some(animator) = self.host.animator.as_mut() {
            animator.play(AnimTarget::ScoreLabel, tween::score_pop());
        }
        if let (Some(label), Some(color)) = (self.host.score_label.as_mut(), color) {
            label.set_color(color);
        }
    }

    /// Die if `y` is strictly outside the visible half-height plus margin
    pub fn check_bounds(&mut self, y: f32, visible_half_height: f32) {
        if !self.is_alive() {
            return;
        }
        let limit = visible_half_height + self.settings.tuning.bounds_margin;
        if y > limit || y < -limit {
            log::info!("Out of bounds at y={:.1} (limit {:.1})", y, limit);
            self.game_over();
        }
    }

    /// End the run. Only the first call has any effect.
    pub fn game_over(&mut self) {
        if !self.is_alive() {
            return;
        }
        self.state.phase = LifePhase::Dead;
        self.timer.unschedule();

        if let Some(audio) = self.host.audio.as_mut() {
            audio.stop_ambient();
        }
        self.play_sound(SoundEffect::Death);

        if let Some(panel) = self.host.game_over_panel.as_mut() {
            panel.set_visible(true);
            self.panel_shown = true;
        }

        if self.settings.effective_screen_shake() {
            if let (Some(camera), Some(animator)) =
                (self.host.camera.as_ref(), self.host.animator.as_mut())
            {
                animator.play(AnimTarget::Camera, tween::camera_shake(camera.position()));
            }
        }

        let record = HighScores::record(self.store.as_mut(), self.variant, self.state.score);
        self.last_record = Some(record);

        log::info!("Game over: {} scored {}", self.variant.as_str(), self.state.score);
    }

    /// Reload the current level
    pub fn retry(&mut self) {
        log::info!("Retry requested");
        if let Some(scenes) = self.host.scenes.as_mut() {
            scenes.load_scene(self.variant.scene_name());
        }
    }

    fn play_sound(&mut self, effect: SoundEffect) {
        if !self.settings.sound {
            return;
        }
        if let Some(audio) = self.host.audio.as_mut() {
            audio.play(effect);
        }
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        if self.subscriptions.is_some() {
            log::warn!("Player dropped while still attached to the event bus");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::host::{HostCall, Recorder};
    use crate::persistence::MemoryStore;

    /// Counts writes so tests can assert persistence happened once
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: usize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            self.writes += 1;
            self.inner.set(key, value);
        }
    }

    fn player(variant: LevelVariant) -> (PlayerController, Recorder, Rc<RefCell<CountingStore>>) {
        let rec = Recorder::new().with_camera_at(Vec3::new(0.0, 0.0, 1000.0));
        let store = Rc::new(RefCell::new(CountingStore::default()));
        let mut p = PlayerController::new(
            variant,
            Settings::default(),
            rec.collaborators(),
            Box::new(store.clone()),
        );
        p.on_load();
        rec.clear();
        (p, rec, store)
    }

    #[test]
    fn test_on_load_applies_initial_gravity() {
        let rec = Recorder::new();
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            Settings::default(),
            rec.collaborators(),
            Box::new(MemoryStore::new()),
        );
        p.on_load();
        assert_eq!(rec.calls()[0], HostCall::GravityScale(-10.0));
        assert!(rec.calls().contains(&HostCall::PanelVisible(false)));
        assert!(rec.calls().contains(&HostCall::Sound(SoundEffect::Ambient)));
        assert!(p.is_score_scheduled());
    }

    #[test]
    fn test_flip_sequence() {
        let (mut p, rec, _) = player(LevelVariant::Standard);
        p.flip();
        assert_eq!(p.state().gravity, Gravity::Up);
        assert_eq!(
            rec.calls(),
            vec![
                HostCall::GravityScale(10.0),
                HostCall::Animate(AnimTarget::Player, tween::squash_stretch()),
                HostCall::Sound(SoundEffect::Flip),
                HostCall::Velocity(Vec2::new(0.0, 12.0)),
            ]
        );

        p.flip();
        assert_eq!(p.state().gravity, Gravity::Down);
        assert_eq!(
            rec.last(|c| matches!(c, HostCall::Velocity(_))),
            Some(HostCall::Velocity(Vec2::new(0.0, -12.0)))
        );
    }

    #[test]
    fn test_flip_without_collaborators() {
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            Settings::default(),
            Collaborators::new(),
            Box::new(MemoryStore::new()),
        );
        p.on_load();
        p.flip();
        p.tick();
        p.game_over();
        p.retry();
        assert_eq!(p.state().gravity, Gravity::Up);
        assert_eq!(p.score(), 1);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_sound_disabled_skips_effects() {
        let rec = Recorder::new();
        let settings = Settings {
            sound: false,
            ..Default::default()
        };
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            settings,
            rec.collaborators(),
            Box::new(MemoryStore::new()),
        );
        p.on_load();
        p.flip();
        assert_eq!(rec.count(|c| matches!(c, HostCall::Sound(_))), 0);
    }

    #[test]
    fn test_tick_updates_label() {
        let (mut p, rec, _) = player(LevelVariant::Standard);
        p.tick();
        assert_eq!(
            rec.calls(),
            vec![
                HostCall::ScoreText("1".into()),
                HostCall::Animate(AnimTarget::ScoreLabel, tween::score_pop()),
                HostCall::ScoreColor(RAINBOW[0]),
            ]
        );
        p.tick();
        assert_eq!(
            rec.last(|c| matches!(c, HostCall::ScoreColor(_))),
            Some(HostCall::ScoreColor(RAINBOW[1]))
        );
    }

    #[test]
    fn test_palette_wraps_after_seven_ticks() {
        let (mut p, rec, _) = player(LevelVariant::Standard);
        for _ in 0..7 {
            p.tick();
        }
        assert_eq!(p.state().palette.index(), 0);
        p.tick();
        assert_eq!(
            rec.last(|c| matches!(c, HostCall::ScoreColor(_))),
            Some(HostCall::ScoreColor(RAINBOW[0]))
        );
    }

    #[test]
    fn test_advance_ticks_per_interval() {
        let (mut p, _, _) = player(LevelVariant::Standard);
        p.advance(0.5);
        assert_eq!(p.score(), 0);
        p.advance(0.5);
        assert_eq!(p.score(), 1);
        p.advance(2.25);
        assert_eq!(p.score(), 3);
    }

    #[test]
    fn test_nan_frame_does_not_stall_scoring() {
        let (mut p, _, _) = player(LevelVariant::Standard);
        p.advance(f32::NAN);
        p.advance(f32::INFINITY);
        for _ in 0..10 {
            p.advance(1.0);
        }
        assert_eq!(p.score(), 10);
    }

    #[test]
    fn test_huge_frame_is_capped() {
        let (mut p, _, _) = player(LevelVariant::Standard);
        p.advance(1.0e8);
        assert_eq!(p.score(), MAX_TIMER_STEP_SECS as u64);
        p.advance(1.0);
        assert_eq!(p.score(), MAX_TIMER_STEP_SECS as u64 + 1);
    }

    #[test]
    fn test_bounds_are_strict() {
        let (mut p, _, _) = player(LevelVariant::Standard);
        p.check_bounds(120.0, 100.0);
        p.check_bounds(-120.0, 100.0);
        assert!(p.is_alive());
        p.check_bounds(120.5, 100.0);
        assert!(!p.is_alive());

        let (mut p, _, _) = player(LevelVariant::Standard);
        p.check_bounds(-120.5, 100.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_game_over_sequence() {
        let (mut p, rec, store) = player(LevelVariant::Standard);
        p.tick();
        p.tick();
        rec.clear();

        p.game_over();
        assert_eq!(
            rec.calls(),
            vec![
                HostCall::StopAmbient,
                HostCall::Sound(SoundEffect::Death),
                HostCall::PanelVisible(true),
                HostCall::Animate(
                    AnimTarget::Camera,
                    tween::camera_shake(Vec3::new(0.0, 0.0, 1000.0))
                ),
            ]
        );
        assert!(!p.is_score_scheduled());
        assert_eq!(store.borrow().get("game_highscore").as_deref(), Some("2"));
        assert_eq!(store.borrow().get("bestGameScore").as_deref(), Some("2"));
    }

    #[test]
    fn test_game_over_is_idempotent() {
        let (mut p, rec, store) = player(LevelVariant::Standard);
        p.tick();
        p.game_over();
        let calls = rec.calls().len();
        let writes = store.borrow().writes;
        p.game_over();
        assert_eq!(rec.calls().len(), calls);
        assert_eq!(store.borrow().writes, writes);
    }

    #[test]
    fn test_dead_player_ignores_everything() {
        let (mut p, rec, _) = player(LevelVariant::Standard);
        p.tick();
        p.game_over();
        rec.clear();

        p.flip();
        p.tick();
        p.advance(10.0);
        p.check_bounds(5000.0, 100.0);
        assert_eq!(p.score(), 1);
        assert_eq!(p.state().gravity, Gravity::Down);
        assert!(rec.calls().is_empty());
    }

    #[test]
    fn test_hardcore_saves_nothing() {
        let (mut p, _, store) = player(LevelVariant::Hardcore);
        for _ in 0..50 {
            p.tick();
        }
        p.game_over();
        assert_eq!(store.borrow().writes, 0);
        assert_eq!(p.last_record().map(|r| r.wrote()), Some(false));
    }

    #[test]
    fn test_no_shake_with_reduced_motion() {
        let rec = Recorder::new();
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            settings,
            rec.collaborators(),
            Box::new(MemoryStore::new()),
        );
        p.on_load();
        p.game_over();
        assert_eq!(
            rec.count(|c| matches!(c, HostCall::Animate(AnimTarget::Camera, _))),
            0
        );
    }

    #[test]
    fn test_input_routing() {
        let (mut p, rec, _) = player(LevelVariant::Alternate);
        let mut bus = EventBus::new();
        p.attach(&mut bus);
        assert!(p.is_attached());

        bus.publish(InputEvent::PointerDown { x: 0.0, y: 0.0 });
        // Retry is ignored while the panel is hidden
        bus.publish(InputEvent::Button(ButtonId::Retry));
        p.poll(&mut bus);
        assert_eq!(p.state().gravity, Gravity::Up);
        assert_eq!(rec.count(|c| matches!(c, HostCall::LoadScene(_))), 0);

        bus.publish(InputEvent::KeyDown(Key::R));
        p.poll(&mut bus);
        assert!(!p.is_alive());

        bus.publish(InputEvent::Button(ButtonId::Retry));
        p.poll(&mut bus);
        assert_eq!(
            rec.last(|c| matches!(c, HostCall::LoadScene(_))),
            Some(HostCall::LoadScene("OPP".into()))
        );

        p.detach(&mut bus);
        assert!(!p.is_attached());
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_debug_key_respects_setting() {
        let settings = Settings {
            debug_keys: false,
            ..Default::default()
        };
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            settings,
            Collaborators::new(),
            Box::new(MemoryStore::new()),
        );
        p.handle_input(InputEvent::KeyDown(Key::R));
        assert!(p.is_alive());
    }

    #[test]
    fn test_retry_reloads_own_scene() {
        let (mut p, rec, _) = player(LevelVariant::Hardcore);
        p.retry();
        assert_eq!(rec.calls(), vec![HostCall::LoadScene("HARDCORE".into())]);
        assert!(p.is_alive());
    }
}
