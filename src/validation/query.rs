//! Query parameter validation.

use std::collections::HashMap;

use crate::calculator::{Arity, Operands, Operation};
use crate::error::{CalcError, Received};
use crate::validation::numeric::parse_operand;

/// Raw query string parameters as received.
pub type QueryParams = HashMap<String, String>;

/// An operation paired with operands of the matching arity.
///
/// Only [`validate`] constructs one, so the operand shape always matches
/// `operation.arity()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    operation: Operation,
    operands: Operands,
}

impl ValidatedRequest {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn operands(&self) -> Operands {
        self.operands
    }

    pub fn into_parts(self) -> (Operation, Operands) {
        (self.operation, self.operands)
    }
}

/// Validate the raw parameters for `operation`.
///
/// Every failure is logged at error level with the raw values.
pub fn validate(operation: Operation, params: &QueryParams) -> Result<ValidatedRequest, CalcError> {
    let operands = match operation.arity() {
        Arity::Pair => validate_pair(operation, params)?,
        Arity::Single => validate_single(operation, params)?,
    };

    Ok(ValidatedRequest {
        operation,
        operands,
    })
}

fn validate_pair(operation: Operation, params: &QueryParams) -> Result<Operands, CalcError> {
    let (Some(num1), Some(num2)) = (params.get("num1"), params.get("num2")) else {
        tracing::error!(
            num1 = ?params.get("num1"),
            num2 = ?params.get("num2"),
            "Missing parameters"
        );
        return Err(CalcError::MissingParameter {
            arity: Arity::Pair,
            endpoint: operation.path(),
        });
    };

    match (parse_operand(num1), parse_operand(num2)) {
        (Some(a), Some(b)) => Ok(Operands::Pair(a, b)),
        _ => {
            tracing::error!(num1 = %num1, num2 = %num2, "Invalid parameters");
            Err(CalcError::InvalidNumber {
                received: Received::Pair {
                    num1: num1.clone(),
                    num2: num2.clone(),
                },
            })
        }
    }
}

fn validate_single(operation: Operation, params: &QueryParams) -> Result<Operands, CalcError> {
    let Some(num) = params.get("num") else {
        tracing::error!(operation = %operation, "Missing parameter");
        return Err(CalcError::MissingParameter {
            arity: Arity::Single,
            endpoint: operation.path(),
        });
    };

    match parse_operand(num) {
        Some(value) => Ok(Operands::Single(value)),
        None => {
            tracing::error!(operation = %operation, num = %num, "Invalid parameter");
            Err(CalcError::InvalidNumber {
                received: Received::Single(num.clone()),
            })
        }
    }
}
