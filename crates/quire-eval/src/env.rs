//! Scoped variable environment for the Quire evaluator.

use crate::value::{Bindings, Value};

/// Scoped variable environment.
///
/// The outermost scope is the cell's global namespace: it is seeded from
/// the snapshot the kernel takes and is handed back as the resulting
/// bindings after execution. Inner scopes exist only for the duration of
/// a function call.
///
/// Lookups search from innermost scope outward. Assignment updates the
/// first scope where the name exists, or defines it in the innermost
/// scope otherwise.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Bindings>,
}

impl Environment {
    /// Create a new environment with one empty global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Bindings::new()],
        }
    }

    /// Create an environment whose global scope is the given bindings.
    pub fn with_globals(globals: Bindings) -> Self {
        Self {
            scopes: vec![globals],
        }
    }

    /// Consume the environment and return the global scope.
    pub fn into_globals(self) -> Bindings {
        self.scopes.into_iter().next().unwrap_or_default()
    }

    /// Push a new scope (for function call frames).
    pub fn push_scope(&mut self) {
        self.scopes.push(Bindings::new());
    }

    /// Pop the innermost scope. The global scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a variable in the current (innermost) scope.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Look up a variable, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        for scope in self.scopes.iter().rev() {
            if let Some(v) = scope.get(name) {
                return Some(v);
            }
        }
        None
    }

    /// Assign: update the variable in the first scope where it exists,
    /// or define it in the innermost scope if it exists nowhere.
    pub fn assign(&mut self, name: &str, value: Value) {
        for scope in self.scopes.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return;
            }
        }
        self.define(name, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_inner_scope_shadows() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.define("x", Value::Number(2.0));
        assert_eq!(env.get("x"), Some(&Value::Number(2.0)));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_outer_scope() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.assign("x", Value::Number(5.0));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Number(5.0)));
    }

    #[test]
    fn test_assign_defines_when_absent() {
        let mut env = Environment::new();
        env.assign("x", Value::Number(1.0));
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_global_scope_never_popped() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_into_globals_preserves_insertion_order() {
        let mut env = Environment::new();
        env.define("b", Value::Number(1.0));
        env.define("a", Value::Number(2.0));
        let globals = env.into_globals();
        let names: Vec<&str> = globals.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
