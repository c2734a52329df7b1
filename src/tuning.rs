//! Data-driven game balance
//!
//! The three difficulty tiers and the level configuration they map to. A
//! `LevelConfig` can also be loaded from JSON; missing keys take the same
//! defaults the generator would use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expr::OperatorToken;

/// Errors building a level configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),
    #[error("operand range ({min}, {max}) is empty")]
    InvalidRange { min: i64, max: i64 },
}

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Numeric level (1-3) as stored in preferences
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Difficulty::Easy),
            2 => Some(Difficulty::Medium),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Ticks between spawn waves (harder = more frequent)
    pub fn spawn_delay_ticks(&self) -> u32 {
        (100 - i32::from(self.level()) * 18).max(25) as u32
    }

    /// Level configuration for this tier
    pub fn config(&self) -> LevelConfig {
        use OperatorToken::*;
        match self {
            Difficulty::Easy => LevelConfig::new("Easy", vec![Add, Sub, Mul, Div], (1, 10)),
            Difficulty::Medium => {
                LevelConfig::new("Medium", vec![Add, Sub, Mul, Div, Pow, Sqrt], (1, 15))
            }
            Difficulty::Hard => LevelConfig::new(
                "Hard",
                vec![Add, Sub, Mul, Div, Pow, Sqrt, HalfPower],
                (-5, 20),
            ),
        }
    }
}

fn default_operators() -> Vec<OperatorToken> {
    vec![OperatorToken::Add, OperatorToken::Sub]
}

fn default_operand_range() -> (i64, i64) {
    (0, 5)
}

/// Operators and operand range for one difficulty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Display label
    #[serde(default)]
    pub name: String,
    /// Operators to draw from (duplicates are not meaningful)
    #[serde(default = "default_operators")]
    pub operators: Vec<OperatorToken>,
    /// Inclusive (min, max) base range for operand draws
    #[serde(default = "default_operand_range")]
    pub operand_range: (i64, i64),
}

impl LevelConfig {
    pub fn new(name: &str, operators: Vec<OperatorToken>, operand_range: (i64, i64)) -> Self {
        Self {
            name: name.to_string(),
            operators,
            operand_range,
        }
    }

    /// Build from textual operator symbols, rejecting unknown ones
    pub fn parse(name: &str, symbols: &[&str], operand_range: (i64, i64)) -> Result<Self, ConfigError> {
        let operators = symbols
            .iter()
            .map(|s| s.parse())
            .collect::<Result<Vec<OperatorToken>, _>>()?;
        Ok(Self::new(name, operators, operand_range))
    }

    /// Operators actually drawn from (falls back to `+`/`-` when empty)
    pub fn effective_operators(&self) -> Vec<OperatorToken> {
        if self.operators.is_empty() {
            default_operators()
        } else {
            self.operators.clone()
        }
    }

    /// Check the operand range is non-empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = self.operand_range;
        if min > max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_table() {
        let easy = Difficulty::Easy.config();
        assert_eq!(easy.name, "Easy");
        assert_eq!(easy.operand_range, (1, 10));
        assert_eq!(easy.operators.len(), 4);

        let hard = Difficulty::Hard.config();
        assert_eq!(hard.operand_range, (-5, 20));
        assert!(hard.operators.contains(&OperatorToken::HalfPower));

        for d in Difficulty::ALL {
            assert!(d.config().validate().is_ok());
        }
    }

    #[test]
    fn test_spawn_delay() {
        assert_eq!(Difficulty::Easy.spawn_delay_ticks(), 82);
        assert_eq!(Difficulty::Medium.spawn_delay_ticks(), 64);
        assert_eq!(Difficulty::Hard.spawn_delay_ticks(), 46);
    }

    #[test]
    fn test_level_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_level(d.level()), Some(d));
        }
        assert_eq!(Difficulty::from_level(0), None);
        assert_eq!(Difficulty::from_level(4), None);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let cfg = LevelConfig::parse("Custom", &["+", "pow0.5"], (1, 3)).unwrap();
        assert_eq!(cfg.operators, vec![OperatorToken::Add, OperatorToken::HalfPower]);
        assert_eq!(
            LevelConfig::parse("Bad", &["+", "%"], (1, 3)),
            Err(ConfigError::UnknownOperator("%".to_string()))
        );
    }

    #[test]
    fn test_json_defaults() {
        let cfg: LevelConfig = serde_json::from_str(r#"{"name": "Bare"}"#).unwrap();
        assert_eq!(cfg.operators, vec![OperatorToken::Add, OperatorToken::Sub]);
        assert_eq!(cfg.operand_range, (0, 5));

        let cfg: LevelConfig =
            serde_json::from_str(r#"{"operators": ["*", "sqrt"], "operand_range": [2, 9]}"#).unwrap();
        assert_eq!(cfg.operators, vec![OperatorToken::Mul, OperatorToken::Sqrt]);
        assert_eq!(cfg.operand_range, (2, 9));
    }

    #[test]
    fn test_validate_and_effective_operators() {
        let cfg = LevelConfig::new("Broken", Vec::new(), (5, 1));
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidRange { min: 5, max: 1 }));
        assert_eq!(cfg.effective_operators(), vec![OperatorToken::Add, OperatorToken::Sub]);
    }
}
