//! Round state and core simulation types
//!
//! Everything a round owns lives here: the score, the player, the falling
//! expressions and the single RNG stream that feeds the generator.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;
use crate::expr::Expression;
use crate::tuning::{Difficulty, LevelConfig};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Timer and entities frozen
    Paused,
    /// Round ended, see `GameState::end_reason`
    GameOver,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    TimeUp,
    /// Coins fell below the threshold
    InsufficientCoins,
    /// Player aborted back to the menu; the score is not recorded
    ReturnToMenu,
}

impl RoundEnd {
    pub fn message(&self) -> String {
        match self {
            RoundEnd::TimeUp => "Time Up".to_string(),
            RoundEnd::InsufficientCoins => {
                format!("Insufficient Coins ({} required)", GAME_OVER_SCORE_THRESHOLD)
            }
            RoundEnd::ReturnToMenu => "Returned to menu".to_string(),
        }
    }
}

/// Shape drawn around a falling expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeKind {
    #[default]
    Circle,
    Square,
    Pentagon,
    Star,
    RoundedRect,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Pentagon,
        ShapeKind::Star,
        ShapeKind::RoundedRect,
    ];

    /// Padding between the label and the shape edge
    pub fn padding(&self) -> f32 {
        match self {
            ShapeKind::Pentagon | ShapeKind::Star => 18.0,
            _ => 12.0,
        }
    }

    /// Side length of the square box enclosing `label`
    pub fn extent_for(&self, label: &str) -> f32 {
        let text_width = label.chars().count() as f32 * GLYPH_WIDTH;
        text_width.max(GLYPH_HEIGHT) + self.padding() * 2.0
    }
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned { id: u32, display: String, lane: usize },
    /// Expression caught and applied to the score
    Caught {
        id: u32,
        display: String,
        before: i64,
        after: i64,
    },
    /// Expression fell off the bottom of the screen
    Missed { id: u32 },
    Paused,
    Resumed,
    RoundOver { reason: RoundEnd, score: i64 },
}

/// The player sprite (moves horizontally, bobs while moving)
#[derive(Debug, Clone)]
pub struct Player {
    /// Box center
    pub pos: Vec2,
    pub size: Vec2,
    /// Resting center height
    pub base_y: f32,
    /// Accumulated movement time driving the bob
    pub bob_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        let base_y = SCREEN_HEIGHT - (PLAYER_HEIGHT / 2.0 + PLAYER_FLOOR_MARGIN);
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, base_y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            base_y,
            bob_timer: 0.0,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Move left/right for one tick, clamped to the screen
    pub fn step(&mut self, left: bool, right: bool, dt: f32) {
        let half_w = self.size.x / 2.0;
        let mut moving = false;
        if left && self.pos.x - half_w > 0.0 {
            self.pos.x -= PLAYER_SPEED * dt;
            moving = true;
        }
        if right && self.pos.x + half_w < SCREEN_WIDTH {
            self.pos.x += PLAYER_SPEED * dt;
            moving = true;
        }

        if moving {
            self.bob_timer += dt;
            let offset = PLAYER_BOB_AMPLITUDE * (self.bob_timer * PLAYER_BOB_FREQUENCY).sin();
            self.pos.y = self.base_y + offset.trunc();
        } else {
            self.pos.y = self.base_y;
        }

        self.pos.x = self.pos.x.clamp(half_w, SCREEN_WIDTH - half_w);
    }
}

/// A falling shape carrying one expression
#[derive(Debug, Clone)]
pub struct FallingExpression {
    pub id: u32,
    pub expression: Expression,
    pub shape: ShapeKind,
    /// Box center
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed (pixels/sec)
    pub speed: f32,
}

impl FallingExpression {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Whether the shape has fully left the bottom of the screen
    pub fn is_off_screen(&self) -> bool {
        self.bounds().min().y > SCREEN_HEIGHT
    }
}

/// Complete state of one round (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Round seed for reproducibility
    pub seed: u64,
    /// Single random stream for spawning and generation
    pub(crate) rng: Pcg32,
    pub difficulty: Difficulty,
    pub level: LevelConfig,
    /// Coins
    pub score: i64,
    /// Unpaused play time (seconds)
    pub elapsed: f32,
    /// Simulation tick counter (unpaused ticks only)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub end_reason: Option<RoundEnd>,
    /// Ticks since the last spawn wave
    pub spawn_timer: u32,
    pub player: Player,
    /// Falling expressions (sorted by id for determinism)
    pub falling: Vec<FallingExpression>,
    /// Pending events for the driver
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new round for the given difficulty
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self::with_level(seed, difficulty, difficulty.config())
    }

    /// Create a new round with a custom level configuration
    pub fn with_level(seed: u64, difficulty: Difficulty, level: LevelConfig) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            difficulty,
            level,
            score: STARTING_COINS,
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            end_reason: None,
            spawn_timer: 0,
            player: Player::default(),
            falling: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds left on the round clock
    pub fn time_left(&self) -> f32 {
        (TIME_LIMIT_SECS - self.elapsed).max(0.0)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Put an expression into play with its box centered at `pos`
    pub fn push_falling(&mut self, expression: Expression, shape: ShapeKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        let extent = shape.extent_for(&expression.display);
        self.falling.push(FallingExpression {
            id,
            expression,
            shape,
            pos,
            size: Vec2::splat(extent),
            speed: EXPRESSION_SPEED,
        });
        id
    }

    /// End the round (no-op if already over)
    pub fn end_round(&mut self, reason: RoundEnd) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.events.push(GameEvent::RoundOver {
            reason,
            score: self.score,
        });
        log::info!("Round over: {} (score {})", reason.message(), self.score);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.falling.sort_by_key(|f| f.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_defaults() {
        let state = GameState::new(1, Difficulty::Medium);
        assert_eq!(state.score, STARTING_COINS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.name, "Medium");
        assert_eq!(state.player.pos, Vec2::new(400.0, 520.0));
        assert!((state.time_left() - TIME_LIMIT_SECS).abs() < f32::EPSILON);
    }

    #[test]
    fn test_player_clamped_to_screen() {
        let mut player = Player::default();
        for _ in 0..1000 {
            player.step(true, false, SIM_DT);
        }
        assert!((player.bounds().min().x - 0.0).abs() < 0.001);

        for _ in 0..1000 {
            player.step(false, true, SIM_DT);
        }
        assert!((player.bounds().max().x - SCREEN_WIDTH).abs() < 0.001);
    }

    #[test]
    fn test_player_bobs_only_while_moving() {
        let mut player = Player::default();
        player.step(false, true, 0.1);
        // 20 * sin(0.6) = 11.29 -> 11
        assert_eq!(player.pos.y, player.base_y + 11.0);
        player.step(false, false, 0.1);
        assert_eq!(player.pos.y, player.base_y);
    }

    #[test]
    fn test_shape_extent() {
        // "+3": 2 glyphs = 26px wide
        assert_eq!(ShapeKind::Circle.extent_for("+3"), 26.0 + 24.0);
        // "√": narrower than glyph height, 22 + 36
        assert_eq!(ShapeKind::Star.extent_for("√"), 22.0 + 36.0);
    }

    #[test]
    fn test_end_round_once() {
        let mut state = GameState::new(1, Difficulty::Easy);
        state.end_round(RoundEnd::TimeUp);
        state.end_round(RoundEnd::InsufficientCoins);
        assert_eq!(state.end_reason, Some(RoundEnd::TimeUp));
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::RoundOver {
                reason: RoundEnd::TimeUp,
                score: STARTING_COINS
            }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_round_end_messages() {
        assert_eq!(RoundEnd::TimeUp.message(), "Time Up");
        assert_eq!(
            RoundEnd::InsufficientCoins.message(),
            "Insufficient Coins (10 required)"
        );
    }
}
