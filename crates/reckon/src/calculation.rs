#![forbid(unsafe_code)]

//! A single arithmetic request and its resolved outcome.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Apply the operator. Only division can fail.
    pub fn apply(self, operand1: f64, operand2: f64) -> Result<f64, CalcError> {
        match self {
            Self::Add => Ok(operand1 + operand2),
            Self::Subtract => Ok(operand1 - operand2),
            Self::Multiply => Ok(operand1 * operand2),
            Self::Divide => {
                if operand2 == 0.0 {
                    return Err(CalcError::division_by_zero(operand1, operand2));
                }
                Ok(operand1 / operand2)
            }
        }
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| CalcError::unsupported_operation(s))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Outcome {
    #[serde(rename = "result")]
    value: f64,
    formatted_result: String,
}

/// One arithmetic request.
///
/// Operands and operator are fixed at construction. The result and its
/// formatted text are unset until [`Calculation::compute`] succeeds, and are
/// always set together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    operand1: f64,
    operand2: f64,
    operator: String,
    #[serde(flatten)]
    outcome: Option<Outcome>,
}

impl Calculation {
    pub fn new(operand1: f64, operand2: f64, operator: impl Into<String>) -> Self {
        Self {
            operand1,
            operand2,
            operator: operator.into(),
            outcome: None,
        }
    }

    pub const fn operand1(&self) -> f64 {
        self.operand1
    }

    pub const fn operand2(&self) -> f64 {
        self.operand2
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    pub fn result(&self) -> Option<f64> {
        self.outcome.as_ref().map(|o| o.value)
    }

    pub fn formatted_result(&self) -> Option<&str> {
        self.outcome.as_ref().map(|o| o.formatted_result.as_str())
    }

    pub const fn is_computed(&self) -> bool {
        self.outcome.is_some()
    }

    /// Resolve the calculation.
    ///
    /// On failure the instance is left exactly as it was. Calling this again
    /// recomputes the same value.
    pub fn compute(&mut self) -> Result<f64, CalcError> {
        let operator: Operator = self.operator.parse()?;
        let value = operator.apply(self.operand1, self.operand2)?;

        self.outcome = Some(Outcome {
            value,
            formatted_result: format!(
                "{} {} {} = {}",
                self.operand1, operator, self.operand2, value
            ),
        });
        Ok(value)
    }
}
