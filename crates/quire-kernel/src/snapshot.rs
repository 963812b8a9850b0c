//! Mutation isolation between cells.

use quire_eval::Bindings;

/// Deep-copy a binding environment.
///
/// Every evaluation runs against a snapshot of its input bindings, so
/// in-place mutation inside a cell can never reach backward into the
/// environment the caller handed in. Function values are the one
/// exception: they are code objects with no structural copy and stay
/// shared by identity.
pub fn snapshot(bindings: &Bindings) -> Bindings {
    bindings
        .iter()
        .map(|(name, value)| (name.clone(), value.deep_copy()))
        .collect()
}
