//! Player preferences
//!
//! Persisted separately from high scores in `user_prefs.json`.

use serde::{Deserialize, Serialize};

use crate::consts::NICKNAME_MAX_LENGTH;
use crate::persistence::{self, DataDir, StoreError};
use crate::tuning::Difficulty;

/// Number of selectable avatars
pub const AVATAR_COUNT: usize = 4;

fn default_difficulty() -> u8 {
    Difficulty::Easy.level()
}

/// Player preferences (missing keys take their defaults)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPrefs {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar_index: usize,
    /// Difficulty level (1 = Easy, 2 = Medium, 3 = Hard)
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            nickname: String::new(),
            avatar_index: 0,
            difficulty: default_difficulty(),
        }
    }
}

impl UserPrefs {
    /// Selected difficulty, Easy if the stored level is unknown
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_level(self.difficulty).unwrap_or_else(|| {
            log::warn!("Unknown difficulty level {}, using Easy", self.difficulty);
            Difficulty::Easy
        })
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty.level();
    }

    /// Selected avatar, the first one if the stored index is out of range
    pub fn avatar(&self) -> usize {
        if self.avatar_index < AVATAR_COUNT {
            self.avatar_index
        } else {
            0
        }
    }

    /// Trim the nickname and cap its length
    pub fn normalize(&mut self) {
        self.nickname = self
            .nickname
            .trim()
            .chars()
            .take(NICKNAME_MAX_LENGTH)
            .collect();
    }

    /// Load preferences, using defaults if missing or unreadable
    pub fn load(dir: &DataDir) -> Self {
        persistence::load_or_default(&dir.user_prefs_path())
    }

    /// Normalize and save preferences
    pub fn save(&mut self, dir: &DataDir) -> Result<(), StoreError> {
        self.normalize();
        persistence::save_json(&dir.user_prefs_path(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::test_util::scratch_dir;

    #[test]
    fn test_defaults() {
        let prefs = UserPrefs::default();
        assert_eq!(prefs.nickname, "");
        assert_eq!(prefs.avatar_index, 0);
        assert_eq!(prefs.difficulty, 1);
        assert_eq!(prefs.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_missing_keys_filled() {
        let prefs: UserPrefs = serde_json::from_str(r#"{"nickname":"Bo"}"#).unwrap();
        assert_eq!(prefs.nickname, "Bo");
        assert_eq!(prefs.avatar_index, 0);
        assert_eq!(prefs.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn test_invalid_difficulty_is_easy() {
        let prefs = UserPrefs {
            difficulty: 9,
            ..UserPrefs::default()
        };
        assert_eq!(prefs.difficulty(), Difficulty::Easy);

        let mut prefs = UserPrefs::default();
        prefs.set_difficulty(Difficulty::Hard);
        assert_eq!(prefs.difficulty, 3);
    }

    #[test]
    fn test_normalize_nickname() {
        let mut prefs = UserPrefs {
            nickname: "   Maximilian Longname  ".to_string(),
            ..UserPrefs::default()
        };
        prefs.normalize();
        assert_eq!(prefs.nickname, "Maximilian L");
        assert_eq!(prefs.nickname.chars().count(), NICKNAME_MAX_LENGTH);
    }

    #[test]
    fn test_out_of_range_avatar_resets() {
        let prefs = UserPrefs {
            avatar_index: AVATAR_COUNT + 1,
            ..UserPrefs::default()
        };
        assert_eq!(prefs.avatar(), 0);

        let prefs = UserPrefs {
            avatar_index: AVATAR_COUNT - 1,
            ..UserPrefs::default()
        };
        assert_eq!(prefs.avatar(), AVATAR_COUNT - 1);
    }

    #[test]
    fn test_save_normalizes_and_loads() {
        let dir = DataDir::new(scratch_dir("prefs"));
        let mut prefs = UserPrefs {
            nickname: "  Ada  ".to_string(),
            avatar_index: 2,
            difficulty: 2,
        };
        prefs.save(&dir).unwrap();
        let loaded = UserPrefs::load(&dir);
        assert_eq!(loaded.nickname, "Ada");
        assert_eq!(loaded.difficulty(), Difficulty::Medium);
        assert_eq!(loaded, prefs);
        let _ = std::fs::remove_dir_all(dir.root());
    }
}
