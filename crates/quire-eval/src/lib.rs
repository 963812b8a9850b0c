//! Quire tree-walking evaluator.
//!
//! Executes Quire fragments directly from the AST against an explicit
//! variable environment. The environment is the *only* state an
//! evaluation mutates; the process-wide output channels are reached
//! only through [`output`], which supports scoped capture.

mod builtins;
mod env;
mod error;
mod evaluator;
pub mod output;
mod value;

pub use env::Environment;
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use value::{Bindings, FunctionValue, Value};
