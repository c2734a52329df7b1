//! Arithmetic expressions carried by falling shapes
//!
//! An expression is an operator plus an optional operand, rendered to a short
//! label like `+3`, `-(4)`, `^2` or `√`. Generation and evaluation live in the
//! submodules; this module only holds the value types.

pub mod evaluate;
pub mod generate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::tuning::ConfigError;

pub use evaluate::{EvalError, apply_operator, try_apply_operator};
pub use generate::{GenerateError, Generation, generate_expression, try_generate_expression};

/// Canonical operator applied to the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Sqrt,
}

impl Operator {
    /// Canonical textual identifier
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "**",
            Operator::Sqrt => "sqrt",
        }
    }

    /// Whether this operator consumes an operand
    pub fn takes_operand(&self) -> bool {
        !matches!(self, Operator::Sqrt)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Operator as listed in a level table
///
/// `HalfPower` is the `pow0.5` alias: it evaluates exactly like `Sqrt` but is
/// displayed as `^0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperatorToken {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Sqrt,
    HalfPower,
}

impl OperatorToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatorToken::Add => "+",
            OperatorToken::Sub => "-",
            OperatorToken::Mul => "*",
            OperatorToken::Div => "/",
            OperatorToken::Pow => "**",
            OperatorToken::Sqrt => "sqrt",
            OperatorToken::HalfPower => "pow0.5",
        }
    }

    /// Operator this token evaluates as
    pub fn canonical(&self) -> Operator {
        match self {
            OperatorToken::Add => Operator::Add,
            OperatorToken::Sub => Operator::Sub,
            OperatorToken::Mul => Operator::Mul,
            OperatorToken::Div => Operator::Div,
            OperatorToken::Pow => Operator::Pow,
            OperatorToken::Sqrt | OperatorToken::HalfPower => Operator::Sqrt,
        }
    }
}

impl FromStr for OperatorToken {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(OperatorToken::Add),
            "-" => Ok(OperatorToken::Sub),
            "*" => Ok(OperatorToken::Mul),
            "/" => Ok(OperatorToken::Div),
            "**" => Ok(OperatorToken::Pow),
            "sqrt" => Ok(OperatorToken::Sqrt),
            "pow0.5" => Ok(OperatorToken::HalfPower),
            other => Err(ConfigError::UnknownOperator(other.to_string())),
        }
    }
}

impl TryFrom<String> for OperatorToken {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OperatorToken> for String {
    fn from(token: OperatorToken) -> Self {
        token.as_str().to_string()
    }
}

impl fmt::Display for OperatorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed operand combined with the score
///
/// Generated operands are whole numbers except the `0.5` exponent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Int(i64),
    Real(f64),
}

impl Operand {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Operand::Int(n) => n as f64,
            Operand::Real(x) => x,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Operand::Int(n) => n == 0,
            Operand::Real(x) => x == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match *self {
            Operand::Int(n) => n < 0,
            Operand::Real(x) => x < 0.0,
        }
    }
}

impl From<i64> for Operand {
    fn from(n: i64) -> Self {
        Operand::Int(n)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Int(n) => write!(f, "{}", n),
            Operand::Real(x) => write!(f, "{}", x),
        }
    }
}

/// A generated operation: label, operator and operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Label drawn on the falling shape
    pub display: String,
    pub operator: Operator,
    /// Absent only for `Sqrt`
    pub operand: Option<Operand>,
}

impl Expression {
    /// The safe default `+1`
    pub fn fallback() -> Self {
        Self {
            display: "+1".to_string(),
            operator: Operator::Add,
            operand: Some(Operand::Int(1)),
        }
    }

    /// Operand presence matches the operator
    pub fn is_well_formed(&self) -> bool {
        self.operator.takes_operand() == self.operand.is_some()
    }

    /// Apply this expression to a score (never fails)
    pub fn apply_to(&self, score: i64) -> i64 {
        apply_operator(score, self.operator, self.operand)
    }
}
