//! High score leaderboard system
//!
//! Persisted to `high_scores.json` in the data directory, tracks top 5 scores.

use serde::{Deserialize, Serialize};

use crate::consts::GAME_OVER_SCORE_THRESHOLD;
use crate::persistence::{self, DataDir, StoreError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// Name recorded when the player left the nickname blank
pub const UNKNOWN_NICKNAME: &str = "Unknown";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub nickname: String,
    /// Final coins
    pub score: i64,
}

/// How a finished round compares to the leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Final score under the game-over threshold
    BelowThreshold,
    NewHighScore,
    NotBeaten,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::BelowThreshold => "Insufficient coins",
            Verdict::NewHighScore => "New high score!",
            Verdict::NotBeaten => "High score not beaten",
        }
    }
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: i64) -> bool {
        if score <= 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        // Ties land after existing entries
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, nickname: &str, score: i64) -> Option<usize> {
        let rank = self.potential_rank(score)?;

        let nickname = match nickname.trim() {
            "" => UNKNOWN_NICKNAME.to_string(),
            name => name.to_string(),
        };
        self.entries
            .insert(rank - 1, HighScoreEntry { nickname, score });
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }

    /// Judge a final score against the current leaderboard
    pub fn verdict(&self, final_score: i64) -> Verdict {
        if final_score < GAME_OVER_SCORE_THRESHOLD {
            Verdict::BelowThreshold
        } else if final_score > 0 && final_score > self.top_score().unwrap_or(0) {
            Verdict::NewHighScore
        } else {
            Verdict::NotBeaten
        }
    }

    /// Judge a finished round and record it if it qualifies
    ///
    /// Losing scores above zero still make the board; the verdict only
    /// describes the round.
    pub fn record_round(&mut self, nickname: &str, final_score: i64) -> (Verdict, Option<usize>) {
        let verdict = self.verdict(final_score);
        (verdict, self.add_score(nickname, final_score))
    }

    /// Load the leaderboard, starting fresh if missing or unreadable
    pub fn load(dir: &DataDir) -> Self {
        let mut scores: Self = persistence::load_or_default(&dir.high_scores_path());
        // Hand-edited files may be out of order or oversized
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        scores
    }

    pub fn save(&self, dir: &DataDir) -> Result<(), StoreError> {
        persistence::save_json(&dir.high_scores_path(), self)
    }
}
