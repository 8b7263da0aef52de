//! Arithmetic operations and their metadata.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How many operands an operation takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `num1` and `num2`.
    Pair,
    /// `num`.
    Single,
}

/// Validated operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operands {
    Pair(f64, f64),
    Single(f64),
}

impl Operands {
    pub fn first(&self) -> f64 {
        match *self {
            Operands::Pair(a, _) => a,
            Operands::Single(x) => x,
        }
    }

    /// The second operand; NaN for a single operand.
    pub fn second(&self) -> f64 {
        match *self {
            Operands::Pair(_, b) => b,
            Operands::Single(_) => f64::NAN,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        match *self {
            Operands::Pair(a, b) => vec![a, b],
            Operands::Single(x) => vec![x],
        }
    }
}

/// A guarded computation that faulted instead of producing a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComputeError {
    #[error("{operation} computation panicked: {message}")]
    Panicked { operation: Operation, message: String },
}

/// The arithmetic operations exposed over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Modulo,
    Sqrt,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
        Operation::Modulo,
        Operation::Sqrt,
    ];

    /// Route path.
    pub fn path(self) -> &'static str {
        match self {
            Operation::Add => "/add",
            Operation::Subtract => "/subtract",
            Operation::Multiply => "/multiply",
            Operation::Divide => "/divide",
            Operation::Power => "/power",
            Operation::Modulo => "/modulo",
            Operation::Sqrt => "/sqrt",
        }
    }

    /// Name reported in the `operation` field of a success body.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Add => "addition",
            Operation::Subtract => "subtraction",
            Operation::Multiply => "multiplication",
            Operation::Divide => "division",
            Operation::Power => "exponentiation",
            Operation::Modulo => "modulo",
            Operation::Sqrt => "square_root",
        }
    }

    /// Capitalized name used in log lines.
    pub(crate) fn label(self) -> &'static str {
        match self {
            Operation::Add => "Addition",
            Operation::Subtract => "Subtraction",
            Operation::Multiply => "Multiplication",
            Operation::Divide => "Division",
            Operation::Power => "Exponentiation",
            Operation::Modulo => "Modulo",
            Operation::Sqrt => "Square root",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operation::Sqrt => Arity::Single,
            _ => Arity::Pair,
        }
    }

    /// Field names the operands are reported under, in operand order.
    pub fn operand_fields(self) -> &'static [&'static str] {
        match self {
            Operation::Power => &["base", "exponent"],
            Operation::Modulo => &["dividend", "divisor"],
            Operation::Sqrt => &["radicand"],
            _ => &["num1", "num2"],
        }
    }

    /// Reject operands the operation is undefined for.
    pub fn check_domain(self, operands: &Operands) -> Result<(), DomainError> {
        match self {
            Operation::Divide if operands.second() == 0.0 => Err(DomainError::DivisionByZero),
            Operation::Modulo if operands.second() == 0.0 => Err(DomainError::ModuloByZero),
            Operation::Sqrt if operands.first() < 0.0 => Err(DomainError::NegativeRadicand),
            _ => Ok(()),
        }
    }

    /// Compute the raw IEEE-754 result. Overflow yields infinity, never an error.
    pub fn apply(self, operands: &Operands) -> f64 {
        let (a, b) = (operands.first(), operands.second());
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => a / b,
            Operation::Power => a.powf(b),
            Operation::Modulo => a % b,
            Operation::Sqrt => a.sqrt(),
        }
    }

    /// Human summary, e.g. `Addition: 5 + 3 = 8`.
    pub fn describe(self, operands: &Operands, result: f64) -> String {
        let (a, b) = (operands.first(), operands.second());
        let expr = match self {
            Operation::Add => format!("{a} + {b}"),
            Operation::Subtract => format!("{a} - {b}"),
            Operation::Multiply => format!("{a} * {b}"),
            Operation::Divide => format!("{a} / {b}"),
            Operation::Power => format!("{a}^{b}"),
            Operation::Modulo => format!("{a} % {b}"),
            Operation::Sqrt => format!("√{a}"),
        };
        format!("{}: {} = {}", self.label(), expr, result)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
