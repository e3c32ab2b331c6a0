//! Property tests for the player state machine

use std::cell::RefCell;
use std::rc::Rc;

use flip_gravity::host::{Collaborators, HostCall, Recorder};
use flip_gravity::persistence::{KeyValueStore, MemoryStore};
use flip_gravity::{Gravity, LevelVariant, PlayerController, Settings};
use proptest::prelude::*;

fn bare_player(variant: LevelVariant) -> PlayerController {
    let mut p = PlayerController::new(
        variant,
        Settings::default(),
        Collaborators::new(),
        Box::new(MemoryStore::new()),
    );
    p.on_load();
    p
}

proptest! {
    #[test]
    fn test_flips_alternate_with_parity(n in 0usize..200) {
        let mut p = bare_player(LevelVariant::Standard);
        for _ in 0..n {
            p.flip();
        }
        let expected = if n % 2 == 0 { Gravity::Down } else { Gravity::Up };
        prop_assert_eq!(p.state().gravity, expected);
        prop_assert_eq!(p.gravity_scale(), expected.sign() * 10.0);
    }

    #[test]
    fn test_bounds_trigger_iff_strictly_outside(y in -2000.0f32..2000.0, half in 0.0f32..1000.0) {
        let mut p = bare_player(LevelVariant::Standard);
        p.check_bounds(y, half);
        let limit = half + 20.0;
        let outside = y > limit || y < -limit;
        prop_assert_eq!(p.is_alive(), !outside);
    }

    #[test]
    fn test_score_frozen_after_game_over(before in 0u32..30, after in 0u32..30) {
        let mut p = bare_player(LevelVariant::Alternate);
        for _ in 0..before {
            p.tick();
        }
        p.game_over();
        for _ in 0..after {
            p.tick();
            p.advance(1.0);
        }
        prop_assert_eq!(p.score(), before as u64);
    }

    #[test]
    fn test_saved_score_is_running_max(stored in 0u64..100, score in 0u32..100) {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        store.borrow_mut().set("game_highscore", &stored.to_string());

        let mut p = PlayerController::new(
            LevelVariant::Standard,
            Settings::default(),
            Collaborators::new(),
            Box::new(store.clone()),
        );
        for _ in 0..score {
            p.tick();
        }
        p.game_over();

        let saved: u64 = store.borrow().get("game_highscore").unwrap().parse().unwrap();
        prop_assert_eq!(saved, stored.max(score as u64));
        prop_assert_eq!(
            p.last_record().unwrap().new_variant_best,
            (score as u64) > stored
        );
    }

    #[test]
    fn test_hardcore_never_writes(score in 0u32..100) {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        let mut p = PlayerController::new(
            LevelVariant::Hardcore,
            Settings::default(),
            Collaborators::new(),
            Box::new(store.clone()),
        );
        for _ in 0..score {
            p.tick();
        }
        p.game_over();
        prop_assert!(store.borrow().is_empty());
    }

    #[test]
    fn test_palette_index_tracks_tick_count(ticks in 0usize..100) {
        let rec = Recorder::new();
        let mut p = PlayerController::new(
            LevelVariant::Standard,
            Settings::default(),
            rec.collaborators(),
            Box::new(MemoryStore::new()),
        );
        for _ in 0..ticks {
            p.tick();
        }
        prop_assert_eq!(p.state().palette.index(), ticks % 7);
        prop_assert_eq!(rec.count(|c| matches!(c, HostCall::ScoreColor(_))), ticks);
    }
}
