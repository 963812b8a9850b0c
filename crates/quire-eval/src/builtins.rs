//! Built-in functions.
//!
//! Builtins are not bindings: they are resolved at the call site when a
//! called name is not bound in the environment, so a user binding named
//! `print` shadows the builtin without deleting it.

use crate::error::{EvalError, EvalResult};
use crate::output;
use crate::value::Value;

/// Dispatch a builtin call by name.
///
/// Returns `None` when the name is not a builtin, so the caller can
/// report an unknown function instead.
pub(crate) fn call_builtin(name: &str, args: Vec<Value>) -> Option<EvalResult<Value>> {
    let result = match name {
        "print" => builtin_print(args),
        "eprint" => builtin_eprint(args),
        "len" => builtin_len(args),
        "push" => builtin_push(args),
        "range" => builtin_range(args),
        "str" => builtin_str(args),
        "repr" => builtin_repr(args),
        "type" => builtin_type(args),
        "fail" => builtin_fail(args),
        _ => return None,
    };
    Some(result)
}

fn arity(name: &str, expected: &str, got: usize) -> EvalError {
    EvalError::WrongArity {
        name: name.to_string(),
        expected: expected.to_string(),
        got,
    }
}

/// `print(values...)` — space-separated display forms plus a newline,
/// written to the standard output channel.
fn builtin_print(args: Vec<Value>) -> EvalResult<Value> {
    let parts: Vec<String> = args.iter().map(Value::display_string).collect();
    output::write_stdout(&parts.join(" "));
    output::write_stdout("\n");
    Ok(Value::Nil)
}

/// `eprint(values...)` — like `print`, on the standard error channel.
fn builtin_eprint(args: Vec<Value>) -> EvalResult<Value> {
    let parts: Vec<String> = args.iter().map(Value::display_string).collect();
    output::write_stderr(&parts.join(" "));
    output::write_stderr("\n");
    Ok(Value::Nil)
}

/// `len(value)` — length of a string, list, or record.
fn builtin_len(args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take_args::<1>("len", args)?;
    let len = match &value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Record(fields) => fields.borrow().len(),
        other => {
            return Err(EvalError::TypeMismatch(format!(
                "len expects a string, list, or record, got {}",
                other.type_name()
            )))
        }
    };
    Ok(Value::Number(len as f64))
}

/// `push(list, value)` — append in place, return the list.
fn builtin_push(args: Vec<Value>) -> EvalResult<Value> {
    let [list, value] = take_args::<2>("push", args)?;
    match &list {
        Value::List(items) => {
            items.borrow_mut().push(value);
            Ok(list)
        }
        other => Err(EvalError::TypeMismatch(format!(
            "push expects a list, got {}",
            other.type_name()
        ))),
    }
}

/// `range(stop)` or `range(start, stop)` — a fresh list of whole numbers.
fn builtin_range(args: Vec<Value>) -> EvalResult<Value> {
    let (start, stop) = match args.len() {
        1 => (0, range_bound(&args[0])?),
        2 => (range_bound(&args[0])?, range_bound(&args[1])?),
        got => return Err(arity("range", "1 or 2", got)),
    };
    let items = (start..stop).map(|n| Value::Number(n as f64)).collect();
    Ok(Value::list(items))
}

fn range_bound(value: &Value) -> EvalResult<i64> {
    match value {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        other => Err(EvalError::TypeMismatch(format!(
            "range expects whole numbers, got {}",
            other.type_name()
        ))),
    }
}

/// `str(value)` — user-facing rendering (strings unquoted).
fn builtin_str(args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take_args::<1>("str", args)?;
    Ok(Value::Str(value.display_string()))
}

/// `repr(value)` — introspective rendering (strings quoted).
fn builtin_repr(args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take_args::<1>("repr", args)?;
    Ok(Value::Str(value.repr_string()))
}

/// `type(value)` — the value's type name as a string.
fn builtin_type(args: Vec<Value>) -> EvalResult<Value> {
    let [value] = take_args::<1>("type", args)?;
    Ok(Value::Str(value.type_name().to_string()))
}

/// `fail(message)` — raise a runtime fault with the given message.
fn builtin_fail(args: Vec<Value>) -> EvalResult<Value> {
    let [message] = take_args::<1>("fail", args)?;
    Err(EvalError::Raised(message.display_string()))
}

fn take_args<const N: usize>(name: &str, args: Vec<Value>) -> EvalResult<[Value; N]> {
    let got = args.len();
    args.try_into().map_err(|_| arity(name, &N.to_string(), got))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CaptureGuard;

    #[test]
    fn test_print_writes_line_to_stdout() {
        let guard = CaptureGuard::install();
        call_builtin("print", vec![Value::Str("hi".into()), Value::Number(2.0)])
            .unwrap()
            .unwrap();
        let (stdout, stderr) = guard.finish();
        assert_eq!(stdout, "hi 2\n");
        assert_eq!(stderr, "");
    }

    #[test]
    fn test_eprint_writes_to_stderr() {
        let guard = CaptureGuard::install();
        call_builtin("eprint", vec![Value::Str("oops".into())])
            .unwrap()
            .unwrap();
        let (stdout, stderr) = guard.finish();
        assert_eq!(stdout, "");
        assert_eq!(stderr, "oops\n");
    }

    #[test]
    fn test_len_of_each_container() {
        let len = |v| call_builtin("len", vec![v]).unwrap().unwrap();
        assert_eq!(len(Value::Str("abc".into())), Value::Number(3.0));
        assert_eq!(len(Value::list(vec![Value::Nil])), Value::Number(1.0));
        assert!(call_builtin("len", vec![Value::Number(1.0)]).unwrap().is_err());
    }

    #[test]
    fn test_push_mutates_in_place() {
        let list = Value::list(vec![Value::Number(1.0)]);
        call_builtin("push", vec![list.clone(), Value::Number(2.0)])
            .unwrap()
            .unwrap();
        if let Value::List(items) = &list {
            assert_eq!(items.borrow().len(), 2);
        }
    }

    #[test]
    fn test_range_forms() {
        let r = call_builtin("range", vec![Value::Number(3.0)]).unwrap().unwrap();
        assert_eq!(r.repr_string(), "[0, 1, 2]");
        let r = call_builtin("range", vec![Value::Number(2.0), Value::Number(5.0)])
            .unwrap()
            .unwrap();
        assert_eq!(r.repr_string(), "[2, 3, 4]");
    }

    #[test]
    fn test_fail_raises() {
        let err = call_builtin("fail", vec![Value::Str("boom".into())])
            .unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_unknown_name_is_not_a_builtin() {
        assert!(call_builtin("frobnicate", vec![]).is_none());
    }
}
