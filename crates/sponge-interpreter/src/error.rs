//! Runtime failures.

use thiserror::Error;

use crate::env::NameError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("function '{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("'return' outside of function")]
    ReturnOutsideFunction,

    #[error("stack overflow: call depth exceeded {depth}")]
    StackOverflow { depth: usize },

    #[error("integer overflow in '{operation}'")]
    IntegerOverflow { operation: &'static str },

    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
}

impl From<NameError> for RuntimeError {
    fn from(err: NameError) -> Self {
        match err {
            NameError::Undefined { name } => RuntimeError::UndefinedVariable { name },
        }
    }
}
