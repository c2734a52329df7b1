//! Score evaluator
//!
//! Applies a caught expression to the running score. Evaluation never panics:
//! `try_apply_operator` reports why a step could not be taken and
//! `apply_operator` turns every such case into "score unchanged".

use thiserror::Error;

use super::{Operand, Operator};

/// Why an operator could not be applied to the score
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("operator '{0}' requires an operand")]
    MissingOperand(Operator),
    #[error("division by zero")]
    DivisionByZero,
    #[error("'{score} {operator} {operand}' overflows the score")]
    Overflow {
        score: i64,
        operator: Operator,
        operand: Operand,
    },
    #[error("'{score} ** {exponent}' has no real result")]
    NonReal { score: i64, exponent: f64 },
}

/// Apply `operator`/`operand` to `score`, leaving it unchanged on any error
pub fn apply_operator(score: i64, operator: Operator, operand: Option<Operand>) -> i64 {
    match try_apply_operator(score, operator, operand) {
        Ok(next) => next,
        Err(e) => {
            log::warn!("Score kept at {}: {}", score, e);
            score
        }
    }
}

/// Apply `operator`/`operand` to `score`
///
/// Square root of a negative score is defined as `0`, not an error.
pub fn try_apply_operator(
    score: i64,
    operator: Operator,
    operand: Option<Operand>,
) -> Result<i64, EvalError> {
    if operator == Operator::Sqrt {
        return Ok(floor_sqrt(score));
    }

    let operand = operand.ok_or(EvalError::MissingOperand(operator))?;
    let overflow = || EvalError::Overflow {
        score,
        operator,
        operand,
    };

    if operator == Operator::Div && operand.is_zero() {
        return Err(EvalError::DivisionByZero);
    }

    match (operator, operand) {
        (Operator::Add, Operand::Int(n)) => score.checked_add(n).ok_or_else(overflow),
        (Operator::Sub, Operand::Int(n)) => score.checked_sub(n).ok_or_else(overflow),
        (Operator::Mul, Operand::Int(n)) => score.checked_mul(n).ok_or_else(overflow),
        // checked_div truncates toward zero
        (Operator::Div, Operand::Int(n)) => score.checked_div(n).ok_or_else(overflow),
        // Powers of 0, 1 and -1 stay bounded for any exponent
        (Operator::Pow, Operand::Int(e)) if e > 0 && (-1..=1).contains(&score) => {
            Ok(if score == -1 && e % 2 == 0 { 1 } else { score })
        }
        (Operator::Pow, Operand::Int(e)) if e >= 0 => u32::try_from(e)
            .ok()
            .and_then(|e| score.checked_pow(e))
            .ok_or_else(overflow),
        (Operator::Pow, Operand::Real(e)) if e == 0.5 && score >= 0 => Ok(floor_sqrt(score)),
        (Operator::Pow, exponent) => {
            let exponent = exponent.as_f64();
            let value = (score as f64).powf(exponent);
            if value.is_nan() {
                return Err(EvalError::NonReal { score, exponent });
            }
            truncate(value).ok_or_else(overflow)
        }
        (op, Operand::Real(x)) => {
            let s = score as f64;
            let value = match op {
                Operator::Add => s + x,
                Operator::Sub => s - x,
                Operator::Mul => s * x,
                _ => s / x,
            };
            truncate(value).ok_or_else(overflow)
        }
        (Operator::Sqrt, _) => Ok(floor_sqrt(score)),
    }
}

/// Integer square root; negative scores reset to zero
fn floor_sqrt(score: i64) -> i64 {
    if score >= 0 { score.isqrt() } else { 0 }
}

/// Truncate toward zero if the value fits in the score
fn truncate(value: f64) -> Option<i64> {
    // 2^63 as f64; i64::MIN is exactly representable, i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let value = value.trunc();
    if value.is_finite() && value >= -LIMIT && value < LIMIT {
        Some(value as i64)
    } else {
        None
    }
}
