//! MathRisk - catch falling arithmetic, keep your coins
//!
//! Core modules:
//! - `expr`: Expression generation and score evaluation
//! - `tuning`: Difficulty tiers and level configuration
//! - `sim`: Deterministic round simulation (spawning, motion, catches)
//! - `highscores`: Top-score leaderboard
//! - `settings`: Persisted user preferences
//! - `persistence`: JSON file storage

pub mod expr;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use expr::{Expression, Operand, Operator, OperatorToken, apply_operator, generate_expression};
pub use highscores::HighScores;
pub use settings::UserPrefs;
pub use tuning::{Difficulty, LevelConfig};

/// Game configuration constants
pub mod consts {
    /// Frames per second of the game loop
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep (one frame)
    pub const SIM_DT: f32 = 1.0 / FPS as f32;

    /// Playfield dimensions (pixels)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player box and horizontal speed (5 px/frame)
    pub const PLAYER_WIDTH: f32 = 100.0;
    pub const PLAYER_HEIGHT: f32 = 120.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Gap between player box and bottom edge
    pub const PLAYER_FLOOR_MARGIN: f32 = 20.0;
    /// Vertical bobbing while moving
    pub const PLAYER_BOB_AMPLITUDE: f32 = 20.0;
    pub const PLAYER_BOB_FREQUENCY: f32 = 6.0;

    /// Fall speed of expressions (4 px/frame)
    pub const EXPRESSION_SPEED: f32 = 240.0;
    /// Approximate label metrics used to size expression boxes
    pub const GLYPH_WIDTH: f32 = 13.0;
    pub const GLYPH_HEIGHT: f32 = 22.0;

    /// Round length
    pub const TIME_LIMIT_SECS: f32 = 60.0;
    /// Round ends when coins drop below this
    pub const GAME_OVER_SCORE_THRESHOLD: i64 = 10;
    pub const STARTING_COINS: i64 = 25;

    /// Spawn lanes across the screen and expressions per spawn wave
    pub const SPAWN_LANES: usize = 5;
    pub const MAX_SPAWN_PER_WAVE: usize = 2;

    pub const NICKNAME_MAX_LENGTH: usize = 12;
}

/// X coordinate of a spawn lane (lanes sit at 1/6 .. 5/6 of the width)
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    let width = consts::SCREEN_WIDTH as usize;
    (width * (lane + 1) / (consts::SPAWN_LANES + 1)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_positions() {
        let lanes: Vec<f32> = (0..consts::SPAWN_LANES).map(lane_x).collect();
        assert_eq!(lanes, vec![133.0, 266.0, 400.0, 533.0, 666.0]);
    }
}
