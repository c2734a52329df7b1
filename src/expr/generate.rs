//! Expression generator
//!
//! Draws one operation per call from a level configuration. The random source
//! is injected so a seeded `Pcg32` reproduces the exact same stream of
//! expressions.
//!
//! Tuning constants below (negation chances, exponent weights) are gameplay
//! balance, not derived values.

use rand::Rng;
use rand::seq::IndexedRandom;
use thiserror::Error;

use super::{Expression, Operand, Operator, OperatorToken};
use crate::tuning::{ConfigError, LevelConfig};

/// Chance an addition operand is negated
pub const ADD_NEGATE_CHANCE: f64 = 0.25;
/// Chance a subtraction operand is negated
pub const SUB_NEGATE_CHANCE: f64 = 0.3;
/// Exponents for `**` with their relative weights
pub const POW_EXPONENTS: [(Operand, u32); 4] = [
    (Operand::Int(0), 3),
    (Operand::Real(0.5), 3),
    (Operand::Int(1), 3),
    (Operand::Int(2), 2),
];

/// Why a well-formed expression could not be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no operand fits [{lo}, {hi}] for '{operator}'")]
    EmptyDrawRange {
        operator: OperatorToken,
        lo: i64,
        hi: i64,
    },
    #[error("exponent weights are unusable")]
    Weights,
    #[error("operator '{0}' ended up without an operand")]
    MissingOperand(Operator),
}

/// Outcome of a generation request
#[derive(Debug, Clone, PartialEq)]
pub enum Generation {
    /// Normally drawn expression
    Fresh(Expression),
    /// Generation failed; `expression` is always the `+1` fallback
    Fallback {
        expression: Expression,
        cause: GenerateError,
    },
}

impl Generation {
    pub fn expression(&self) -> &Expression {
        match self {
            Generation::Fresh(expression) | Generation::Fallback { expression, .. } => expression,
        }
    }

    pub fn into_expression(self) -> Expression {
        match self {
            Generation::Fresh(expression) | Generation::Fallback { expression, .. } => expression,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback { .. })
    }
}

/// Generate one expression, degrading to `+1` instead of failing
pub fn generate_expression<R: Rng + ?Sized>(config: &LevelConfig, rng: &mut R) -> Generation {
    match try_generate_expression(config, rng) {
        Ok(expression) => Generation::Fresh(expression),
        Err(cause) => {
            log::warn!(
                "Expression generation failed for level '{}': {}. Using '+1'.",
                config.name,
                cause
            );
            Generation::Fallback {
                expression: Expression::fallback(),
                cause,
            }
        }
    }
}

/// Generate one expression, reporting why it could not be drawn
pub fn try_generate_expression<R: Rng + ?Sized>(
    config: &LevelConfig,
    rng: &mut R,
) -> Result<Expression, GenerateError> {
    config.validate()?;
    let (min, max) = config.operand_range;

    let operators = config.effective_operators();
    // effective_operators is never empty
    let token = operators.choose(rng).copied().unwrap_or(OperatorToken::Add);

    let expression = match token {
        OperatorToken::Add => {
            let mut n = rng.random_range(min..=max);
            if rng.random_bool(ADD_NEGATE_CHANCE) {
                n = n.saturating_neg();
            }
            let operand = Operand::Int(n);
            let display = if operand.is_negative() {
                format!("+({})", operand)
            } else {
                format!("+{}", operand)
            };
            with_operand(display, Operator::Add, operand)
        }
        OperatorToken::Sub => {
            let n = rng.random_range(min..=max);
            if rng.random_bool(SUB_NEGATE_CHANCE) {
                let n = n.saturating_neg();
                with_operand(format!("-({})", n), Operator::Sub, Operand::Int(n))
            } else {
                with_operand(format!("-{}", n), Operator::Sub, Operand::Int(n))
            }
        }
        OperatorToken::Mul => {
            let n = draw(rng, token, min.max(2), 3_i64.max(max.div_euclid(2)))?;
            with_operand(format!("*{}", n), Operator::Mul, Operand::Int(n))
        }
        OperatorToken::Div => {
            let mut n = draw(rng, token, min.max(2), 4_i64.max(max.div_euclid(2)))?;
            if n == 0 {
                n = 2;
            }
            with_operand(format!("/{}", n), Operator::Div, Operand::Int(n))
        }
        OperatorToken::Pow => {
            let exponent = POW_EXPONENTS
                .choose_weighted(rng, |(_, weight)| *weight)
                .map(|(exponent, _)| *exponent)
                .map_err(|_| GenerateError::Weights)?;
            with_operand(format!("^{}", exponent), Operator::Pow, exponent)
        }
        OperatorToken::Sqrt => Expression {
            display: "√".to_string(),
            operator: Operator::Sqrt,
            operand: None,
        },
        OperatorToken::HalfPower => Expression {
            display: "^0.5".to_string(),
            operator: Operator::Sqrt,
            operand: None,
        },
    };

    if !expression.is_well_formed() {
        return Err(GenerateError::MissingOperand(expression.operator));
    }
    Ok(expression)
}

fn with_operand(display: String, operator: Operator, operand: Operand) -> Expression {
    Expression {
        display,
        operator,
        operand: Some(operand),
    }
}

/// Uniform draw from `[lo, hi]`, rejecting an empty range instead of panicking
fn draw<R: Rng + ?Sized>(
    rng: &mut R,
    operator: OperatorToken,
    lo: i64,
    hi: i64,
) -> Result<i64, GenerateError> {
    if lo > hi {
        return Err(GenerateError::EmptyDrawRange { operator, lo, hi });
    }
    Ok(rng.random_range(lo..=hi))
}
