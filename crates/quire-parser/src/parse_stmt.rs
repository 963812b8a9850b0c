//! Statement parsing.

use crate::parser::Parser;
use quire_lexer::token::TokenKind;
use quire_types::ast::*;

impl<'src> Parser<'src> {
    /// Parse the whole fragment: a flat sequence of top-level statements.
    pub(crate) fn parse_program(&mut self) -> Option<Program> {
        let start = self.current_span();
        let mut stmts = Vec::new();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
                self.expect_newline_or_eof();
            } else {
                self.synchronize();
            }
            self.skip_newlines();
        }

        let span = if stmts.is_empty() {
            start
        } else {
            start.merge(self.previous_span())
        };
        Some(Program { stmts, span })
    }

    /// Parse a block of statements: `{ stmts... }`
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        self.skip_newlines();
        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
                self.expect_newline_or_eof();
            } else {
                self.synchronize();
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        self.skip_newlines();
        if self.at_end() || self.check_exact(&TokenKind::RBrace) {
            return None;
        }
        match self.peek_kind() {
            TokenKind::If => self.parse_if_stmt().map(Stmt::If),
            TokenKind::While => self.parse_while_stmt().map(Stmt::While),
            TokenKind::For => self.parse_for_stmt().map(Stmt::For),
            TokenKind::Return => self.parse_return_stmt().map(Stmt::Return),
            // `fn name(...)` is a declaration; `fn (...)` starts a lambda expression
            TokenKind::Fn if matches!(self.look_ahead(1), TokenKind::Identifier(_)) => {
                self.parse_fn_decl().map(Stmt::FnDecl)
            }
            _ => self.parse_assign_or_expr(),
        }
    }

    // ── if / while / for / return ─────────────────────────────────────────────

    /// `if cond { } [else if ... | else { }]`
    fn parse_if_stmt(&mut self) -> Option<IfStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::If)?;
        let condition = self.parse_expression()?;
        let then_block = self.parse_block()?;

        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check_exact(&TokenKind::If) {
                Some(ElseBranch::ElseIf(Box::new(self.parse_if_stmt()?)))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Some(IfStmt {
            condition,
            then_block,
            else_branch,
            span,
        })
    }

    /// `while cond { body }`
    fn parse_while_stmt(&mut self) -> Option<WhileStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::While)?;
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(WhileStmt {
            condition,
            body,
            span,
        })
    }

    /// `for item in iterable { body }`
    fn parse_for_stmt(&mut self) -> Option<ForStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::For)?;
        let item = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(ForStmt {
            item,
            iterable,
            body,
            span,
        })
    }

    /// `return [expr]`
    fn parse_return_stmt(&mut self) -> Option<ReturnStmt> {
        let start = self.current_span();
        self.expect(&TokenKind::Return)?;
        let value = if self.check_exact(&TokenKind::Newline)
            || self.check_exact(&TokenKind::RBrace)
            || self.at_end()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let span = start.merge(self.previous_span());
        Some(ReturnStmt { value, span })
    }

    // ── fn declaration ────────────────────────────────────────────────────────

    /// `fn name(params) { body }`
    fn parse_fn_decl(&mut self) -> Option<FnDecl> {
        let start = self.current_span();
        self.expect(&TokenKind::Fn)?;
        let name = self.expect_identifier()?;
        let params = self.parse_param_list()?;
        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(FnDecl {
            name,
            params,
            body,
            span,
        })
    }

    /// `(a, b, c)` — shared by declarations and lambdas.
    pub(crate) fn parse_param_list(&mut self) -> Option<Vec<Ident>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        self.skip_newlines();
        while !self.check_exact(&TokenKind::RParen) && !self.at_end() {
            params.push(self.expect_identifier()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(&TokenKind::RParen)?;
        Some(params)
    }

    // ── Assignment vs expression ──────────────────────────────────────────────

    /// Parse either `target = expr` or a bare expression statement.
    ///
    /// We parse an expression first; if the next token is `=`, the parsed
    /// expression is reinterpreted as an assignment target. This is how a
    /// fragment like `xs[0] = 5` and a fragment like `xs[0] + 5` share a
    /// grammar prefix.
    fn parse_assign_or_expr(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let expr = self.parse_expression()?;

        if self.check_exact(&TokenKind::Eq) {
            self.advance(); // consume '='
            let target = self.expr_to_target(expr)?;
            let value = self.parse_expression()?;
            let span = start.merge(self.previous_span());
            return Some(Stmt::Assign(AssignStmt {
                target,
                value,
                span,
            }));
        }

        let span = expr.span;
        Some(Stmt::Expr(ExprStmt { expr, span }))
    }

    /// Reinterpret an already-parsed expression as an assignment target.
    ///
    /// Valid targets are an identifier followed by any chain of `.field`
    /// and `[index]` accessors. Anything else is reported as an error.
    fn expr_to_target(&mut self, expr: Expr) -> Option<AssignTarget> {
        let span = expr.span;
        let mut path = Vec::new();
        let mut current = expr;

        loop {
            match current.kind {
                ExprKind::Identifier(name) => {
                    path.reverse();
                    return Some(AssignTarget {
                        base: Ident::new(name, current.span),
                        path,
                        span,
                    });
                }
                ExprKind::Field { object, field } => {
                    path.push(AccessSeg::Field(field));
                    current = *object;
                }
                ExprKind::Index { object, index } => {
                    path.push(AccessSeg::Index(*index));
                    current = *object;
                }
                _ => {
                    self.error_at("invalid assignment target", span);
                    return None;
                }
            }
        }
    }
}
