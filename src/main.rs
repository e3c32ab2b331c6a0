//! Flip Gravity entry point
//!
//! Native builds play a full headless run in the terminal: splash, menu
//! choice, then an autopilot run of the chosen level with scores saved to a
//! JSON file. The browser build sets up logging and settings; the page then
//! drives levels through `platform::web::WebGame`.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    use flip_gravity::persistence::KeyValueStore;
    use flip_gravity::platform::web::LocalStore;
    use flip_gravity::{HighScores, Settings};

    let mut store = LocalStore::new();
    let settings = Settings::load(&store);
    if store.get(Settings::STORAGE_KEY).is_none() {
        settings.save(&mut store);
    }
    let scores = HighScores::load(&store);
    log::info!(
        "Flip Gravity (web) ready, best score {}, volume {:.1}",
        scores.best,
        settings.effective_volume()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    native::run(native::Options::from_args(std::env::args().skip(1)));
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use glam::Vec3;

    use flip_gravity::headless::{
        Autopilot, DEMO_HALF_HEIGHT, FixedCamera, HeadlessAnimator, HeadlessBody, HeadlessScenes,
    };
    use flip_gravity::host::{Collaborators, Recorder};
    use flip_gravity::input::{ButtonId, EventBus, InputEvent, InputQueue};
    use flip_gravity::intro::IntroSequence;
    use flip_gravity::menu::{LevelRouter, StartMenu};
    use flip_gravity::persistence::{FileStore, KeyValueStore, MemoryStore};
    use flip_gravity::tween::{AnimTarget, TweenValue};
    use flip_gravity::{FrameInput, GameSession, HighScores, LevelVariant, Settings};

    const FRAME_DT: f32 = 1.0 / 60.0;

    pub struct Options {
        variant: LevelVariant,
        seed: u64,
        save_path: PathBuf,
        max_seconds: f32,
    }

    impl Options {
        pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
            let mut opts = Options {
                variant: LevelVariant::Standard,
                seed: 1,
                save_path: PathBuf::from("flip_gravity_save.json"),
                max_seconds: 120.0,
            };
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--seed" => {
                        if let Some(seed) = args.next().and_then(|s| s.parse().ok()) {
                            opts.seed = seed;
                        }
                    }
                    "--save" => {
                        if let Some(path) = args.next() {
                            opts.save_path = PathBuf::from(path);
                        }
                    }
                    "--max-seconds" => {
                        if let Some(secs) = args.next().and_then(|s| s.parse().ok()) {
                            opts.max_seconds = secs;
                        }
                    }
                    other => match LevelVariant::parse(other) {
                        Some(v) => opts.variant = v,
                        None => log::warn!("Ignoring unknown argument: {}", other),
                    },
                }
            }
            opts
        }
    }

    type SharedStore = Rc<RefCell<dyn KeyValueStore>>;

    fn open_store(path: &Path) -> SharedStore {
        match FileStore::open(path) {
            Ok(store) => Rc::new(RefCell::new(store)),
            Err(e) => {
                log::error!("Cannot open {} ({}), scores will not be kept", path.display(), e);
                Rc::new(RefCell::new(MemoryStore::new()))
            }
        }
    }

    pub fn run(opts: Options) {
        log::info!("Flip Gravity (native) starting, seed {}", opts.seed);

        let store = open_store(&opts.save_path);
        let settings = Settings::load(&*store.borrow());
        if store.borrow().get(Settings::STORAGE_KEY).is_none() {
            settings.save(&mut *store.borrow_mut());
        }

        let scenes = HeadlessScenes::new();
        let animator = HeadlessAnimator::new();
        let mut bus = EventBus::new();

        // Splash
        let mut intro =
            IntroSequence::new(Some(Box::new(animator.clone())), Some(Box::new(scenes.clone())));
        intro.start();
        let menu_scene = loop {
            intro.update(FRAME_DT);
            animator.advance(FRAME_DT);
            if let Some(scene) = scenes.take_request() {
                break scene;
            }
        };
        println!("Splash done -> {}", menu_scene);

        // Menu
        let mut menu = StartMenu::new(LevelRouter::default(), Some(Box::new(scenes.clone())));
        menu.attach(&mut bus);
        let button = match opts.variant {
            LevelVariant::Standard => ButtonId::Play,
            LevelVariant::Hardcore => ButtonId::Hardcore,
            LevelVariant::Alternate => ButtonId::Opp,
            LevelVariant::SkinSelect => ButtonId::Skin,
        };
        bus.publish(InputEvent::Button(button));
        menu.poll(&mut bus);
        menu.detach(&mut bus);

        let Some(variant) = scenes
            .take_request()
            .and_then(|name| LevelVariant::from_scene_name(&name))
        else {
            log::error!("Menu did not load a level");
            return;
        };
        if !variant.is_playable() {
            println!("{}: nothing to play here", variant.as_str());
            return;
        }

        play_level(variant, &opts, settings, store.clone(), &animator, &mut bus);

        let scores = HighScores::load(&*store.borrow());
        println!(
            "High scores: best {} | standard {} | alternate {}",
            scores.best, scores.standard, scores.alternate
        );
    }

    fn play_level(
        variant: LevelVariant,
        opts: &Options,
        settings: Settings,
        store: SharedStore,
        animator: &HeadlessAnimator,
        bus: &mut EventBus,
    ) {
        let body = HeadlessBody::new();
        let ui = Recorder::new();
        let camera = Vec3::new(0.0, 0.0, 1000.0);
        animator.set_value(AnimTarget::Camera, TweenValue::Position(camera));

        let host = Collaborators::new()
            .with_body(body.clone())
            .with_animator(animator.clone())
            .with_audio(ui.clone())
            .with_score_label(ui.clone())
            .with_game_over_panel(ui.clone())
            .with_camera(FixedCamera(camera))
            .with_scenes(ui.clone());

        let mut session = GameSession::start(variant, settings, host, Box::new(store), bus);
        let mut pilot = Autopilot::new(opts.seed);
        let mut queue = InputQueue::new();
        let mut flips = 0u32;

        println!("Playing {} ({})", variant.as_str(), variant.scene_name());
        while session.player().is_alive() {
            body.step(FRAME_DT);
            if pilot.should_flip(&body.state(), DEMO_HALF_HEIGHT) {
                queue.push(InputEvent::PointerDown { x: 0.0, y: 0.0 });
                flips += 1;
            }
            bus.publish_all(&mut queue);

            let frame = FrameInput {
                player_y: body.state().y,
                visible_half_height: Some(DEMO_HALF_HEIGHT),
            };
            session.update(bus, FRAME_DT, frame);
            animator.advance(FRAME_DT);

            if session.elapsed() >= opts.max_seconds && session.player().is_alive() {
                log::info!("Time limit reached");
                session.player_mut().game_over();
            }
        }

        let record = session.player().last_record();
        let state = session.teardown(bus);
        println!(
            "Game over: score {} after {} flips (gravity {:?})",
            state.score, flips, state.gravity
        );
        if let Some(record) = record {
            if record.new_variant_best {
                println!("New {} high score!", variant.as_str());
            }
            if record.new_overall_best {
                println!("New best score!");
            }
        }
    }
}
