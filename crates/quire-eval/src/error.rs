//! Runtime error types for the Quire evaluator.

use crate::value::Value;
use thiserror::Error;

/// Evaluation error — runtime faults raised while executing a fragment.
///
/// The kernel never propagates these to its caller: each one is rendered
/// as a single line on the captured error channel.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Unknown variable.
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// Call of a name that is neither bound nor a builtin.
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    /// Call of a non-function value.
    #[error("cannot call a value of type {0}")]
    NotCallable(String),
    /// Argument count mismatch.
    #[error("wrong number of arguments to {name}: expected {expected}, got {got}")]
    WrongArity {
        name: String,
        expected: String,
        got: usize,
    },
    /// Type mismatch at runtime.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Division or modulo by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// List index outside `0..len`.
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: i64, len: usize },
    /// Access of a missing record field.
    #[error("record has no field '{0}'")]
    UnknownField(String),
    /// Fault raised explicitly via the `fail` builtin.
    #[error("{0}")]
    Raised(String),
    /// `return` at the top level of a fragment.
    #[error("return outside a function")]
    ReturnOutsideFunction,
    /// `return` statement (used internally for control flow).
    #[error("return")]
    Return(Value),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
