//! Runtime values.
//!
//! Lists and records are shared, interior-mutable containers: two
//! bindings may alias the same list, and an in-place mutation through
//! one is visible through the other. This is exactly why the kernel
//! snapshots a binding environment before handing it to the next cell.

use indexmap::IndexMap;
use quire_types::ast::Block;
use serde::ser::{Serialize, Serializer};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Identity of a shared container cell, used to detect aliasing and
/// cycles while walking a value graph.
type CellId = *const ();

/// An ordered variable-name → value mapping.
///
/// Insertion order is preserved so that a cell's bindings list reads in
/// the order the names were introduced.
pub type Bindings = IndexMap<String, Value>;

/// A Quire runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
    /// Shared mutable list.
    List(Rc<RefCell<Vec<Value>>>),
    /// Shared mutable record with insertion-ordered fields.
    Record(Rc<RefCell<IndexMap<String, Value>>>),
    /// A function value (named declaration or anonymous `fn`).
    Function(Rc<FunctionValue>),
}

/// A user-defined function: a code object, not a data structure.
#[derive(Debug)]
pub struct FunctionValue {
    /// Declared name, or `None` for an anonymous `fn`.
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Block,
}

impl Value {
    /// Wrap a vector in a fresh shared list cell.
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    /// Wrap a field map in a fresh shared record cell.
    pub fn record(fields: IndexMap<String, Value>) -> Value {
        Value::Record(Rc::new(RefCell::new(fields)))
    }

    /// The type name used in error messages and by the `type` builtin.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Function(_) => "function",
        }
    }

    /// Truthiness: `nil`, `false`, zero, and empty containers are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Nil => false,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Record(fields) => !fields.borrow().is_empty(),
            Value::Function(_) => true,
        }
    }

    // ── Copying ──────────────────────────────────────────────────────────

    /// Structural deep copy.
    ///
    /// Scalars copy trivially; lists and records are cloned recursively
    /// into fresh cells. Copies are memoized by source cell identity, so
    /// a container appearing twice in the graph copies to one shared
    /// cell and a cyclic container terminates with the cycle pointing at
    /// its own copy. Function values have no structural copy — they are
    /// code objects — and are carried over by reference identity
    /// instead. That fallback is an accepted compromise: a function value
    /// stays shared between the source environment and the copy.
    pub fn deep_copy(&self) -> Value {
        self.deep_copy_memo(&mut HashMap::new())
    }

    fn deep_copy_memo(&self, memo: &mut HashMap<CellId, Value>) -> Value {
        match self {
            Value::Number(_) | Value::Str(_) | Value::Bool(_) | Value::Nil => self.clone(),
            Value::List(items) => {
                let id = Rc::as_ptr(items) as CellId;
                if let Some(copied) = memo.get(&id) {
                    return copied.clone();
                }
                // Register the fresh cell before descending so a
                // self-reference resolves to the copy, not the source.
                let cell = Rc::new(RefCell::new(Vec::new()));
                memo.insert(id, Value::List(Rc::clone(&cell)));
                let copied: Vec<Value> = items
                    .borrow()
                    .iter()
                    .map(|v| v.deep_copy_memo(memo))
                    .collect();
                *cell.borrow_mut() = copied;
                Value::List(cell)
            }
            Value::Record(fields) => {
                let id = Rc::as_ptr(fields) as CellId;
                if let Some(copied) = memo.get(&id) {
                    return copied.clone();
                }
                let cell = Rc::new(RefCell::new(IndexMap::new()));
                memo.insert(id, Value::Record(Rc::clone(&cell)));
                let copied: IndexMap<String, Value> = fields
                    .borrow()
                    .iter()
                    .map(|(k, v)| (k.clone(), v.deep_copy_memo(memo)))
                    .collect();
                *cell.borrow_mut() = copied;
                Value::Record(cell)
            }
            Value::Function(f) => Value::Function(Rc::clone(f)),
        }
    }

    // ── Equality ─────────────────────────────────────────────────────────

    /// Deep structural equality. NaN != NaN. Functions compare by
    /// identity. Cyclic containers terminate: a pair of cells already
    /// under comparison is taken as equal on re-entry.
    pub fn structural_eq(&self, other: &Value) -> bool {
        self.structural_eq_guarded(other, &mut Vec::new())
    }

    fn structural_eq_guarded(
        &self,
        other: &Value,
        in_progress: &mut Vec<(CellId, CellId)>,
    ) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => {
                // NaN != NaN
                if a.is_nan() || b.is_nan() {
                    false
                } else {
                    a == b
                }
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::List(a), Value::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a) as CellId, Rc::as_ptr(b) as CellId);
                if in_progress.contains(&pair) {
                    return true;
                }
                in_progress.push(pair);
                let a = a.borrow();
                let b = b.borrow();
                let eq = a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.structural_eq_guarded(y, in_progress));
                in_progress.pop();
                eq
            }
            (Value::Record(a), Value::Record(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (Rc::as_ptr(a) as CellId, Rc::as_ptr(b) as CellId);
                if in_progress.contains(&pair) {
                    return true;
                }
                in_progress.push(pair);
                let a = a.borrow();
                let b = b.borrow();
                let eq = a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| {
                            b.get(k)
                                .is_some_and(|w| v.structural_eq_guarded(w, in_progress))
                        });
                in_progress.pop();
                eq
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// User-facing rendering, used by `print` and `str`: strings appear
    /// without quotes.
    pub fn display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            _ => self.repr_string(),
        }
    }

    /// Debug-oriented rendering: the same introspective form the
    /// language itself would echo back, with strings quoted and escaped.
    /// This is what a cell's `representation` carries. A container
    /// reached again while it is already being rendered prints as
    /// `[...]` / `{...}`.
    pub fn repr_string(&self) -> String {
        self.repr_with_seen(&mut Vec::new())
    }

    fn repr_with_seen(&self, seen: &mut Vec<CellId>) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Str(s) => quote_string(s),
            Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
            Value::Nil => "nil".to_string(),
            Value::List(items) => {
                let id = Rc::as_ptr(items) as CellId;
                if seen.contains(&id) {
                    return "[...]".to_string();
                }
                seen.push(id);
                let parts: Vec<String> = items
                    .borrow()
                    .iter()
                    .map(|v| v.repr_with_seen(seen))
                    .collect();
                seen.pop();
                format!("[{}]", parts.join(", "))
            }
            Value::Record(fields) => {
                let id = Rc::as_ptr(fields) as CellId;
                if seen.contains(&id) {
                    return "{...}".to_string();
                }
                if fields.borrow().is_empty() {
                    return "{}".to_string();
                }
                seen.push(id);
                let parts: Vec<String> = fields
                    .borrow()
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.repr_with_seen(seen)))
                    .collect();
                seen.pop();
                format!("{{ {} }}", parts.join(", "))
            }
            Value::Function(f) => match &f.name {
                Some(name) => format!("<fn {name}>"),
                None => "<fn>".to_string(),
            },
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

/// Whole numbers render without a fractional part, but only inside the
/// range where f64 holds integers exactly; beyond that, `n as i64`
/// would saturate and render the wrong value.
fn format_number(n: f64) -> String {
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0; // 2^53
    if n.fract() == 0.0 && n.is_finite() && n.abs() <= MAX_EXACT_INT {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Quote and escape a string for its repr rendering.
fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Nil => serializer.serialize_unit(),
            Value::List(items) => serializer.collect_seq(items.borrow().iter()),
            Value::Record(fields) => serializer.collect_map(fields.borrow().iter()),
            // Functions have no data form; serialize the repr text.
            Value::Function(_) => serializer.serialize_str(&self.repr_string()),
        }
    }
}
