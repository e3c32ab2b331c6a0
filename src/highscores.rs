//! High score bookkeeping
//!
//! Each saving variant keeps its own running maximum, plus one best score
//! shared across variants. Values only ever go up: a score equal to the
//! stored one is not rewritten.

use serde::{Deserialize, Serialize};

use crate::level::{BEST_SCORE_KEY, LevelVariant};
use crate::persistence::{KeyValueStore, read_u64, write_u64};

/// Outcome of saving one finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreRecord {
    pub score: u64,
    /// Stored per-variant value before this run (None if the variant never saves)
    pub previous_variant_best: Option<u64>,
    pub previous_overall_best: Option<u64>,
    pub new_variant_best: bool,
    pub new_overall_best: bool,
}

impl ScoreRecord {
    /// Whether anything was written
    pub fn wrote(&self) -> bool {
        self.new_variant_best || self.new_overall_best
    }
}

/// Snapshot of every stored score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    pub best: u64,
    pub standard: u64,
    pub alternate: u64,
}

impl HighScores {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let read_variant = |v: LevelVariant| {
            v.persistence()
                .variant_key
                .map(|key| read_u64(store, key))
                .unwrap_or(0)
        };
        Self {
            best: read_u64(store, BEST_SCORE_KEY),
            standard: read_variant(LevelVariant::Standard),
            alternate: read_variant(LevelVariant::Alternate),
        }
    }

    /// Stored best for a variant, None for variants that never save
    pub fn for_variant(&self, variant: LevelVariant) -> Option<u64> {
        match variant {
            LevelVariant::Standard => Some(self.standard),
            LevelVariant::Alternate => Some(self.alternate),
            LevelVariant::Hardcore | LevelVariant::SkinSelect => None,
        }
    }

    /// Check if a score would beat the stored value for its variant
    pub fn qualifies(&self, variant: LevelVariant, score: u64) -> bool {
        self.for_variant(variant).is_some_and(|best| score > best)
    }

    /// Save a finished run's score under the variant's rules
    pub fn record(store: &mut dyn KeyValueStore, variant: LevelVariant, score: u64) -> ScoreRecord {
        let rules = variant.persistence();
        let mut record = ScoreRecord {
            score,
            ..Default::default()
        };

        if let Some(key) = rules.variant_key {
            let previous = read_u64(store, key);
            record.previous_variant_best = Some(previous);
            if score > previous {
                write_u64(store, key, score);
                record.new_variant_best = true;
                log::info!("New {} high score: {} (was {})", variant.as_str(), score, previous);
            }
        }

        if rules.updates_best {
            let previous = read_u64(store, BEST_SCORE_KEY);
            record.previous_overall_best = Some(previous);
            if score > previous {
                write_u64(store, BEST_SCORE_KEY, score);
                record.new_overall_best = true;
                log::info!("New best score: {} (was {})", score, previous);
            }
        }

        if !rules.updates_best && rules.variant_key.is_none() {
            log::debug!("{} scores are not saved", variant.as_str());
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_first_score_is_saved() {
        let mut store = MemoryStore::new();
        let rec = HighScores::record(&mut store, LevelVariant::Standard, 5);
        assert!(rec.new_variant_best);
        assert!(rec.new_overall_best);
        assert_eq!(rec.previous_variant_best, Some(0));
        assert_eq!(store.get("game_highscore").as_deref(), Some("5"));
        assert_eq!(store.get("bestGameScore").as_deref(), Some("5"));
    }

    #[test]
    fn test_equal_score_does_not_rewrite() {
        let mut store = MemoryStore::new();
        store.set("game_highscore", "7");
        store.set("bestGameScore", "7");
        let rec = HighScores::record(&mut store, LevelVariant::Standard, 7);
        assert!(!rec.wrote());
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let mut store = MemoryStore::new();
        store.set("opp_highscore", "9");
        store.set("bestGameScore", "20");
        let rec = HighScores::record(&mut store, LevelVariant::Alternate, 12);
        assert!(rec.new_variant_best);
        assert!(!rec.new_overall_best);
        assert_eq!(store.get("opp_highscore").as_deref(), Some("12"));
        assert_eq!(store.get("bestGameScore").as_deref(), Some("20"));
    }

    #[test]
    fn test_hardcore_writes_nothing() {
        let mut store = MemoryStore::new();
        let rec = HighScores::record(&mut store, LevelVariant::Hardcore, 1_000);
        assert!(!rec.wrote());
        assert_eq!(rec.previous_variant_best, None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_snapshot() {
        let mut store = MemoryStore::new();
        store.set("game_highscore", "3");
        store.set("opp_highscore", "8");
        store.set("bestGameScore", "8");
        let scores = HighScores::load(&store);
        assert_eq!(
            scores,
            HighScores {
                best: 8,
                standard: 3,
                alternate: 8
            }
        );
        assert!(scores.qualifies(LevelVariant::Standard, 4));
        assert!(!scores.qualifies(LevelVariant::Alternate, 8));
        assert!(!scores.qualifies(LevelVariant::Hardcore, 100));
    }
}
