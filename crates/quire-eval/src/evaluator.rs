//! Tree-walking evaluator.
//!
//! Executes statements against a scoped [`Environment`]. Only function
//! calls introduce a scope; control-flow blocks run in the enclosing
//! scope, so an assignment inside a top-level `if` or `for` is a global
//! binding afterwards.

use std::rc::Rc;

use quire_types::ast::{
    AccessSeg, AssignStmt, BinOp, Block, ElseBranch, Expr, ExprKind, FnDecl, ForStmt, IfStmt,
    Program, ReturnStmt, Stmt, UnaryOp, WhileStmt,
};

use crate::builtins;
use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::value::{Bindings, FunctionValue, Value};

/// The Quire evaluator: executes an AST against a variable environment.
#[derive(Debug)]
pub struct Evaluator {
    env: Environment,
}

impl Evaluator {
    /// Create an evaluator with an empty global scope.
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Create an evaluator whose global scope is the given bindings.
    pub fn with_globals(globals: Bindings) -> Self {
        Self {
            env: Environment::with_globals(globals),
        }
    }

    /// Consume the evaluator and return its global bindings.
    pub fn into_globals(self) -> Bindings {
        self.env.into_globals()
    }

    /// Execute a program for its effects.
    pub fn run(&mut self, program: &Program) -> EvalResult<()> {
        for stmt in &program.stmts {
            self.exec_stmt(stmt).map_err(escape_return)?;
        }
        Ok(())
    }

    /// Evaluate a single expression to a value.
    pub fn eval_expression(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.eval_expr(expr).map_err(escape_return)
    }

    // ── Statements ───────────────────────────────────────────────────────

    fn exec_block(&mut self, block: &Block) -> EvalResult<()> {
        for stmt in &block.stmts {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match stmt {
            Stmt::Assign(assign) => self.exec_assign(assign),
            Stmt::FnDecl(decl) => self.exec_fn_decl(decl),
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::Return(ret) => self.exec_return(ret),
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
                Ok(())
            }
        }
    }

    fn exec_assign(&mut self, assign: &AssignStmt) -> EvalResult<()> {
        let value = self.eval_expr(&assign.value)?;

        // A bare name rebinds; a path mutates the addressed container.
        let Some((last, prefix)) = assign.target.path.split_last() else {
            self.env.assign(&assign.target.base.name, value);
            return Ok(());
        };

        let base = assign.target.base.name.as_str();
        let mut object = self
            .env
            .get(base)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(base.to_string()))?;
        for seg in prefix {
            object = self.read_segment(&object, seg)?;
        }
        self.write_segment(&object, last, value)
    }

    /// Read one accessor segment (`.field` or `[index]`) off a value.
    fn read_segment(&mut self, object: &Value, seg: &AccessSeg) -> EvalResult<Value> {
        match seg {
            AccessSeg::Field(field) => read_field(object, &field.name),
            AccessSeg::Index(index_expr) => {
                let index = self.eval_expr(index_expr)?;
                read_index(object, &index)
            }
        }
    }

    /// Write through the final accessor segment, mutating in place.
    fn write_segment(&mut self, object: &Value, seg: &AccessSeg, value: Value) -> EvalResult<()> {
        match seg {
            AccessSeg::Field(field) => match object {
                Value::Record(fields) => {
                    fields.borrow_mut().insert(field.name.clone(), value);
                    Ok(())
                }
                other => Err(EvalError::TypeMismatch(format!(
                    "cannot assign field '{}' on a {}",
                    field.name,
                    other.type_name()
                ))),
            },
            AccessSeg::Index(index_expr) => {
                let index = self.eval_expr(index_expr)?;
                match object {
                    Value::List(items) => {
                        let mut items = items.borrow_mut();
                        let i = list_index(&index, items.len())?;
                        items[i] = value;
                        Ok(())
                    }
                    other => Err(EvalError::TypeMismatch(format!(
                        "cannot index-assign into a {}",
                        other.type_name()
                    ))),
                }
            }
        }
    }

    fn exec_fn_decl(&mut self, decl: &FnDecl) -> EvalResult<()> {
        let function = FunctionValue {
            name: Some(decl.name.name.clone()),
            params: decl.params.iter().map(|p| p.name.clone()).collect(),
            body: decl.body.clone(),
        };
        self.env
            .assign(&decl.name.name, Value::Function(Rc::new(function)));
        Ok(())
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> EvalResult<()> {
        if self.eval_expr(&if_stmt.condition)?.is_truthy() {
            return self.exec_block(&if_stmt.then_block);
        }
        match &if_stmt.else_branch {
            Some(ElseBranch::ElseIf(nested)) => self.exec_if(nested),
            Some(ElseBranch::Block(block)) => self.exec_block(block),
            None => Ok(()),
        }
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt) -> EvalResult<()> {
        while self.eval_expr(&while_stmt.condition)?.is_truthy() {
            self.exec_block(&while_stmt.body)?;
        }
        Ok(())
    }

    fn exec_for(&mut self, for_stmt: &ForStmt) -> EvalResult<()> {
        let iterable = self.eval_expr(&for_stmt.iterable)?;
        // Clone the items out before iterating so the body may mutate
        // the list without holding its borrow.
        let items: Vec<Value> = match &iterable {
            Value::List(items) => items.borrow().clone(),
            Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
            other => {
                return Err(EvalError::TypeMismatch(format!(
                    "cannot iterate over a {}",
                    other.type_name()
                )))
            }
        };
        for item in items {
            self.env.assign(&for_stmt.item.name, item);
            self.exec_block(&for_stmt.body)?;
        }
        Ok(())
    }

    fn exec_return(&mut self, ret: &ReturnStmt) -> EvalResult<()> {
        let value = match &ret.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Nil,
        };
        Err(EvalError::Return(value))
    }

    // ── Expressions ──────────────────────────────────────────────────────

    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::StringLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NilLit => Ok(Value::Nil),
            ExprKind::ListLit(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(values))
            }
            ExprKind::RecordLit(fields) => {
                let mut map = indexmap::IndexMap::new();
                for (key, value_expr) in fields {
                    let value = self.eval_expr(value_expr)?;
                    map.insert(key.name.clone(), value);
                }
                Ok(Value::record(map))
            }
            ExprKind::Identifier(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            ExprKind::Call { callee, args } => self.eval_call(callee, args),
            ExprKind::Index { object, index } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                read_index(&object, &index)
            }
            ExprKind::Field { object, field } => {
                let object = self.eval_expr(object)?;
                read_field(&object, &field.name)
            }
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                eval_unary(*op, &value)
            }
            ExprKind::Lambda { params, body } => {
                let function = FunctionValue {
                    name: None,
                    params: params.iter().map(|p| p.name.clone()).collect(),
                    body: body.clone(),
                };
                Ok(Value::Function(Rc::new(function)))
            }
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult<Value> {
        // A called identifier that is not bound falls through to the
        // builtin table; any other unbound identifier is still an error.
        if let ExprKind::Identifier(name) = &callee.kind {
            if self.env.get(name).is_none() {
                let values = self.eval_args(args)?;
                return match builtins::call_builtin(name, values) {
                    Some(result) => result,
                    None => Err(EvalError::UnknownFunction(name.clone())),
                };
            }
        }

        let callee_value = self.eval_expr(callee)?;
        let values = self.eval_args(args)?;
        match callee_value {
            Value::Function(function) => self.call_function(&function, values),
            other => Err(EvalError::NotCallable(other.type_name().to_string())),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Call a user function: bind parameters in a fresh scope, run the
    /// body, and turn a `return` into the call's value. Falling off the
    /// end of the body yields `nil`.
    fn call_function(&mut self, function: &FunctionValue, args: Vec<Value>) -> EvalResult<Value> {
        if args.len() != function.params.len() {
            return Err(EvalError::WrongArity {
                name: function.name.clone().unwrap_or_else(|| "<fn>".to_string()),
                expected: function.params.len().to_string(),
                got: args.len(),
            });
        }

        self.env.push_scope();
        for (param, arg) in function.params.iter().zip(args) {
            self.env.define(param, arg);
        }
        let outcome = self.exec_block(&function.body);
        self.env.pop_scope();

        match outcome {
            Ok(()) => Ok(Value::Nil),
            Err(EvalError::Return(value)) => Ok(value),
            Err(err) => Err(err),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // `and` / `or` short-circuit and always yield a bool.
        match op {
            BinOp::And => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                let right = self.eval_expr(right)?;
                return Ok(Value::Bool(right.is_truthy()));
            }
            BinOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                let right = self.eval_expr(right)?;
                return Ok(Value::Bool(right.is_truthy()));
            }
            _ => {}
        }

        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        match op {
            BinOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
                _ => Err(binary_type_error("+", &left, &right)),
            },
            BinOp::Sub => numeric_op("-", &left, &right, |a, b| Ok(a - b)),
            BinOp::Mul => numeric_op("*", &left, &right, |a, b| Ok(a * b)),
            BinOp::Div => numeric_op("/", &left, &right, |a, b| {
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a / b)
                }
            }),
            BinOp::Mod => numeric_op("%", &left, &right, |a, b| {
                if b == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(a.rem_euclid(b))
                }
            }),
            BinOp::Eq => Ok(Value::Bool(left.structural_eq(&right))),
            BinOp::NotEq => Ok(Value::Bool(!left.structural_eq(&right))),
            BinOp::Less => compare_op("<", &left, &right, |ord| ord.is_lt()),
            BinOp::Greater => compare_op(">", &left, &right, |ord| ord.is_gt()),
            BinOp::LessEq => compare_op("<=", &left, &right, |ord| ord.is_le()),
            BinOp::GreaterEq => compare_op(">=", &left, &right, |ord| ord.is_ge()),
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// A `return` that escapes all call frames reached the top level.
fn escape_return(err: EvalError) -> EvalError {
    match err {
        EvalError::Return(_) => EvalError::ReturnOutsideFunction,
        other => other,
    }
}

fn eval_unary(op: UnaryOp, value: &Value) -> EvalResult<Value> {
    match op {
        UnaryOp::Neg => match value {
            Value::Number(n) => Ok(Value::Number(-n)),
            other => Err(EvalError::TypeMismatch(format!(
                "cannot negate a {}",
                other.type_name()
            ))),
        },
        UnaryOp::Not => Ok(Value::Bool(!value.is_truthy())),
    }
}

fn read_field(object: &Value, field: &str) -> EvalResult<Value> {
    match object {
        Value::Record(fields) => fields
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| EvalError::UnknownField(field.to_string())),
        other => Err(EvalError::TypeMismatch(format!(
            "cannot access field '{field}' on a {}",
            other.type_name()
        ))),
    }
}

fn read_index(object: &Value, index: &Value) -> EvalResult<Value> {
    match object {
        Value::List(items) => {
            let items = items.borrow();
            let i = list_index(index, items.len())?;
            Ok(items[i].clone())
        }
        other => Err(EvalError::TypeMismatch(format!(
            "cannot index a {}",
            other.type_name()
        ))),
    }
}

/// Validate a list index: a whole number in `0..len`.
fn list_index(index: &Value, len: usize) -> EvalResult<usize> {
    let n = match index {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => *n as i64,
        other => {
            return Err(EvalError::TypeMismatch(format!(
                "list index must be a whole number, got {}",
                other.type_name()
            )))
        }
    };
    if n < 0 || n as usize >= len {
        return Err(EvalError::IndexOutOfBounds { index: n, len });
    }
    Ok(n as usize)
}

fn numeric_op(
    op: &str,
    left: &Value,
    right: &Value,
    apply: impl FnOnce(f64, f64) -> EvalResult<f64>,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => apply(*a, *b).map(Value::Number),
        _ => Err(binary_type_error(op, left, right)),
    }
}

fn compare_op(
    op: &str,
    left: &Value,
    right: &Value,
    test: impl FnOnce(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b).ok_or_else(|| {
            EvalError::TypeMismatch("cannot order NaN".to_string())
        })?,
        (Value::Str(a), Value::Str(b)) => a.cmp(b),
        _ => return Err(binary_type_error(op, left, right)),
    };
    Ok(Value::Bool(test(ordering)))
}

fn binary_type_error(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch(format!(
        "unsupported operands for '{op}': {} and {}",
        left.type_name(),
        right.type_name()
    ))
}
