//! Level variants and scene names
//!
//! Scene names must match the host's level registry exactly.

use serde::{Deserialize, Serialize};

/// Splash screen scene
pub const SPLASH_SCENE: &str = "Splash";
/// Start menu scene
pub const START_MENU_SCENE: &str = "StartMenu";

/// Storage key for the cross-variant best score
pub const BEST_SCORE_KEY: &str = "bestGameScore";

/// Playable level configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LevelVariant {
    #[default]
    Standard,
    /// Nothing is ever saved
    Hardcore,
    /// Alternate physics
    Alternate,
    /// Skin selection, no player
    SkinSelect,
}

/// Which high scores a variant updates on game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePersistence {
    /// Per-variant running maximum
    pub variant_key: Option<&'static str>,
    /// Whether the cross-variant best is updated
    pub updates_best: bool,
}

impl LevelVariant {
    pub const ALL: [LevelVariant; 4] = [
        LevelVariant::Standard,
        LevelVariant::Hardcore,
        LevelVariant::Alternate,
        LevelVariant::SkinSelect,
    ];

    pub fn scene_name(&self) -> &'static str {
        match self {
            LevelVariant::Standard => "GAME",
            LevelVariant::Hardcore => "HARDCORE",
            LevelVariant::Alternate => "OPP",
            LevelVariant::SkinSelect => "SKIN",
        }
    }

    pub fn from_scene_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.scene_name() == name)
    }

    /// Parse a user-supplied variant name (CLI, settings)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "game" | "normal" => Some(LevelVariant::Standard),
            "hardcore" => Some(LevelVariant::Hardcore),
            "alternate" | "opp" => Some(LevelVariant::Alternate),
            "skin" | "skin-select" => Some(LevelVariant::SkinSelect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelVariant::Standard => "Standard",
            LevelVariant::Hardcore => "Hardcore",
            LevelVariant::Alternate => "Alternate",
            LevelVariant::SkinSelect => "Skin Select",
        }
    }

    pub fn persistence(&self) -> ScorePersistence {
        match self {
            LevelVariant::Standard => ScorePersistence {
                variant_key: Some("game_highscore"),
                updates_best: true,
            },
            LevelVariant::Alternate => ScorePersistence {
                variant_key: Some("opp_highscore"),
                updates_best: true,
            },
            LevelVariant::Hardcore | LevelVariant::SkinSelect => ScorePersistence {
                variant_key: None,
                updates_best: false,
            },
        }
    }

    /// Whether the variant hosts a player at all
    pub fn is_playable(&self) -> bool {
        !matches!(self, LevelVariant::SkinSelect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_names_round_trip() {
        for v in LevelVariant::ALL {
            assert_eq!(LevelVariant::from_scene_name(v.scene_name()), Some(v));
        }
        assert_eq!(LevelVariant::from_scene_name("game"), None);
    }

    #[test]
    fn test_hardcore_never_persists() {
        let p = LevelVariant::Hardcore.persistence();
        assert_eq!(p.variant_key, None);
        assert!(!p.updates_best);
    }

    #[test]
    fn test_variant_keys() {
        assert_eq!(
            LevelVariant::Standard.persistence().variant_key,
            Some("game_highscore")
        );
        assert_eq!(
            LevelVariant::Alternate.persistence().variant_key,
            Some("opp_highscore")
        );
    }

    #[test]
    fn test_parse() {
        assert_eq!(LevelVariant::parse("OPP"), Some(LevelVariant::Alternate));
        assert_eq!(LevelVariant::parse("Hardcore"), Some(LevelVariant::Hardcore));
        assert_eq!(LevelVariant::parse("zen"), None);
    }
}
