//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 6. `or`
//! 5. `and`
//! 4. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, `not`
//! 0. postfix: `()` call, `[]` index, `.` field access

use quire_lexer::token::TokenKind;
use quire_types::ast::*;

use crate::parser::Parser;

/// Maximum expression nesting depth.
const MAX_EXPR_DEPTH: u32 = 64;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(format!(
                "maximum expression nesting depth is {MAX_EXPR_DEPTH}"
            ));
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::Or,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `AndExpr = CompExpr { "and" CompExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_comparison()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_comparison()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op: BinOp::And,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `CompExpr = AddExpr [ CompOp AddExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut left = self.parse_add()?;
        if let Some(op) = self.match_comparison_op() {
            self.advance(); // consume operator
            let right = self.parse_add()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
            // Reject chaining
            if self.match_comparison_op().is_some() {
                self.error_at_current(
                    "comparison operators cannot be chained; use 'and' to combine: a < b and b < c",
                );
            }
        }
        Some(left)
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::NotEq),
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Some(left)
    }

    /// `UnaryExpr = [ "not" | "-" ] PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Not => {
                self.advance();
                Some(UnaryOp::Not)
            }
            TokenKind::Minus => {
                self.advance();
                Some(UnaryOp::Neg)
            }
            _ => None,
        };
        let operand = self.parse_postfix()?;
        if let Some(op) = op {
            let span = start.merge(operand.span);
            Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ))
        } else {
            Some(operand)
        }
    }

    /// `PostfixExpr = PrimaryExpr { "(" args ")" | "[" Expr "]" | "." Identifier }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    self.advance(); // eat `(`
                    let args = self.parse_arg_list()?;
                    self.expect(&TokenKind::RParen)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance(); // eat `[`
                    let index = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance(); // eat `.`
                    let field = self.expect_identifier()?;
                    let span = expr.span.merge(field.span);
                    expr = Expr::new(
                        ExprKind::Field {
                            object: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }
        Some(expr)
    }

    /// Comma-separated argument list (the caller consumes the parens).
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        self.skip_newlines();
        while !self.check_exact(&TokenKind::RParen) && !self.at_end() {
            args.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        Some(args)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primaries
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Expr> {
        let span = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::NumberLit(n) => {
                self.advance();
                Some(Expr::new(ExprKind::NumberLit(n), span))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Some(Expr::new(ExprKind::StringLit(s), span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), span))
            }
            TokenKind::Nil => {
                self.advance();
                Some(Expr::new(ExprKind::NilLit, span))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Identifier(name), span))
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expression()?;
                self.skip_newlines();
                self.expect(&TokenKind::RParen)?;
                let full = span.merge(self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), full))
            }
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LBrace => self.parse_record_literal(),
            TokenKind::Fn => self.parse_lambda(),
            other => {
                self.error_at_current(format!("expected expression, got '{other}'"));
                None
            }
        }
    }

    /// `[a, b, c]` — newlines allowed after commas and brackets.
    fn parse_list_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::LBracket)?;
        let mut elems = Vec::new();
        self.skip_newlines();
        while !self.check_exact(&TokenKind::RBracket) && !self.at_end() {
            elems.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ListLit(elems), span))
    }

    /// `{ key: value, ... }` — newlines allowed after commas and braces.
    fn parse_record_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        let mut entries = Vec::new();
        self.skip_newlines();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            let key = self.expect_identifier()?;
            self.expect(&TokenKind::Colon)?;
            let value = self.parse_expression()?;
            entries.push((key, value));
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::RecordLit(entries), span))
    }

    /// Anonymous function: `fn (params) { body }`
    fn parse_lambda(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.expect(&TokenKind::Fn)?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::Lambda { params, body }, span))
    }
}
