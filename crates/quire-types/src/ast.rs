//! AST node types for the Quire language.
//!
//! Every node carries a [`Span`] for error reporting.
//! Large recursive types are boxed to keep enum sizes reasonable.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete code fragment: a sequence of top-level statements.
///
/// A fragment consisting of exactly one [`Stmt::Expr`] is classified as
/// a single expression by the kernel and produces a textual
/// representation of its value; every other shape is a statement
/// sequence executed for its effects only.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    /// If the fragment is exactly one bare expression statement, return it.
    pub fn as_single_expression(&self) -> Option<&Expr> {
        match self.stmts.as_slice() {
            [Stmt::Expr(stmt)] => Some(&stmt.expr),
            _ => None,
        }
    }
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A single statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `target = expr` — defines or updates a binding, or mutates a
    /// list element / record field in place.
    Assign(AssignStmt),
    /// `fn name(params) { body }`
    FnDecl(FnDecl),
    /// `if cond { } else { }`
    If(IfStmt),
    /// `while cond { }`
    While(WhileStmt),
    /// `for item in expr { }`
    For(ForStmt),
    /// `return [expr]` — only valid inside a function body.
    Return(ReturnStmt),
    /// A bare expression evaluated for its value or effects.
    Expr(ExprStmt),
}

impl Stmt {
    /// The source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign(s) => s.span,
            Stmt::FnDecl(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

/// A brace-delimited block of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// `target = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: AssignTarget,
    pub value: Expr,
    pub span: Span,
}

/// The left-hand side of an assignment: a base name followed by any
/// chain of field / index accessors.
///
/// A bare name (`x = ...`) rebinds; a non-empty path (`xs[0] = ...`,
/// `r.field = ...`) mutates the addressed container in place.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignTarget {
    pub base: Ident,
    pub path: Vec<AccessSeg>,
    pub span: Span,
}

/// One accessor segment in an assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessSeg {
    /// `.field`
    Field(Ident),
    /// `[index]`
    Index(Expr),
}

/// `fn name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// `if cond { } else if ... else { }`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

/// The `else` part of an if statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    ElseIf(Box<IfStmt>),
    Block(Block),
}

/// `while cond { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

/// `for item in iterable { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub item: Ident,
    pub iterable: Expr,
    pub body: Block,
    pub span: Span,
}

/// `return [expr]`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// A bare expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Every expression form in the Quire language.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal: `42`, `3.14`
    NumberLit(f64),
    /// String literal: `"hello"`
    StringLit(String),
    /// `true` / `false`
    BoolLit(bool),
    /// `nil`
    NilLit,
    /// `[a, b, c]`
    ListLit(Vec<Expr>),
    /// `{ key: value, ... }`
    RecordLit(Vec<(Ident, Expr)>),
    /// Variable reference.
    Identifier(String),
    /// `callee(args)`
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `object[index]`
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },
    /// `object.field`
    Field {
        object: Box<Expr>,
        field: Ident,
    },
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `not x`, `-x`
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// Anonymous function: `fn (params) { body }`
    Lambda {
        params: Vec<Ident>,
        body: Block,
    },
    /// Parenthesized expression.
    Paren(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Expr {
        Expr::new(ExprKind::NumberLit(n), Span::point(1, 1))
    }

    #[test]
    fn test_single_expression_classification() {
        let span = Span::point(1, 1);
        let program = Program {
            stmts: vec![Stmt::Expr(ExprStmt {
                expr: num(1.0),
                span,
            })],
            span,
        };
        assert!(program.as_single_expression().is_some());
    }

    #[test]
    fn test_assignment_is_not_an_expression() {
        let span = Span::point(1, 1);
        let program = Program {
            stmts: vec![Stmt::Assign(AssignStmt {
                target: AssignTarget {
                    base: Ident::new("x", span),
                    path: vec![],
                    span,
                },
                value: num(1.0),
                span,
            })],
            span,
        };
        assert!(program.as_single_expression().is_none());
    }

    #[test]
    fn test_multiple_statements_are_not_an_expression() {
        let span = Span::point(1, 1);
        let stmt = Stmt::Expr(ExprStmt {
            expr: num(1.0),
            span,
        });
        let program = Program {
            stmts: vec![stmt.clone(), stmt],
            span,
        };
        assert!(program.as_single_expression().is_none());
    }

    #[test]
    fn test_empty_fragment_is_not_an_expression() {
        let program = Program {
            stmts: vec![],
            span: Span::point(1, 1),
        };
        assert!(program.as_single_expression().is_none());
    }
}
