//! The outcome of evaluating one cell.

use quire_eval::Bindings;
use serde::Serialize;

/// Everything one evaluation produced.
///
/// Evaluation never fails from the caller's point of view: syntax errors
/// and runtime faults are reported on `stderr`, and the other fields
/// describe whatever progress was made.
#[derive(Debug, Clone, Serialize)]
pub struct CellResult {
    /// Text the fragment wrote to the standard output channel.
    pub stdout: String,
    /// Text written to the standard error channel, including rendered
    /// syntax errors and runtime faults.
    pub stderr: String,
    /// The value's textual form, present only when the fragment was a
    /// single expression that evaluated without fault.
    pub representation: Option<String>,
    /// The bindings after execution. Isolated from the input
    /// environment: mutating these never affects the caller's copy.
    pub bindings: Bindings,
}
