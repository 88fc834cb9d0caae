use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, InfixOperator, Stmt},
    errors::errors::{ParseError, ParseErrorKind},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{
    context::ParsingContext,
    expr::{parse_function_body, parse_parameters},
};

pub type StmtHandler = fn(&mut ParsingContext<'_>) -> Result<Stmt, ParseError>;

pub trait StatementParser {
    /// Whether this parser handles the statement starting at the cursor.
    /// May look one token ahead; must not consume anything.
    fn can_parse(&self, ctx: &ParsingContext<'_>) -> bool;

    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError>;
}

/// Ordered statement parsers with the expression statement as the fallback.
#[derive(Default)]
pub struct StatementDispatcher {
    parsers: Vec<Box<dyn StatementParser>>,
    fallback: ExpressionStatement,
}

impl StatementDispatcher {
    pub fn new() -> Self {
        StatementDispatcher::default()
    }

    pub fn register(&mut self, parser: Box<dyn StatementParser>) {
        self.parsers.push(parser);
    }

    pub fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
        match self.parsers.iter().find(|parser| parser.can_parse(ctx)) {
            Some(parser) => parser.parse(ctx),
            None => self.fallback.parse(ctx),
        }
    }
}

/// A statement introduced by one keyword (or punctuation) token.
pub struct KeywordStatement {
    kind: TokenKind,
    handler: StmtHandler,
}

impl KeywordStatement {
    pub fn new(kind: TokenKind, handler: StmtHandler) -> Self {
        KeywordStatement { kind, handler }
    }
}

impl StatementParser for KeywordStatement {
    fn can_parse(&self, ctx: &ParsingContext<'_>) -> bool {
        ctx.check(self.kind)
    }

    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
        (self.handler)(ctx)
    }
}

/// `fn name(..) { }`. A bare `fn(` is a function literal and is left to the
/// expression statement.
pub struct FunctionDeclaration;

impl StatementParser for FunctionDeclaration {
    fn can_parse(&self, ctx: &ParsingContext<'_>) -> bool {
        ctx.check(TokenKind::Fn) && ctx.peek().kind == TokenKind::Identifier
    }

    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
        Ok(Stmt::Function(parse_fn_decl(ctx)?))
    }
}

/// `x += e` desugared into `x = x + e`.
pub struct CompoundAssignment;

impl StatementParser for CompoundAssignment {
    fn can_parse(&self, ctx: &ParsingContext<'_>) -> bool {
        ctx.check(TokenKind::Identifier) && ctx.peek().kind.is_compound_assignment()
    }

    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
        let identifier = ctx.expect(TokenKind::Identifier)?.value;
        let operator_token = ctx.advance();
        let operator = InfixOperator::from_token_kind(operator_token.kind).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::NoPrefixParser {
                    kind: operator_token.kind,
                },
                operator_token.clone(),
            )
        })?;

        let rhs = parse_expr(ctx, BindingPower::Lowest)?;
        ctx.eat(TokenKind::Semicolon);

        Ok(Stmt::Expression(Expr::Assign {
            target: Box::new(Expr::Identifier(identifier.clone())),
            value: Box::new(Expr::Infix {
                left: Box::new(Expr::Identifier(identifier)),
                operator,
                right: Box::new(rhs),
            }),
        }))
    }
}

/// Anything else: an expression, optionally followed by `;`.
#[derive(Default)]
pub struct ExpressionStatement;

impl StatementParser for ExpressionStatement {
    fn can_parse(&self, _ctx: &ParsingContext<'_>) -> bool {
        true
    }

    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
        let expr = parse_expr(ctx, BindingPower::Lowest)?;
        ctx.eat(TokenKind::Semicolon);

        Ok(Stmt::Expression(expr))
    }
}

pub fn parse_var_decl_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();

    let identifier = ctx.expect(TokenKind::Identifier)?.value;
    ctx.expect(TokenKind::Assignment)?;
    let value = parse_expr(ctx, BindingPower::Lowest)?;
    ctx.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Let { identifier, value })
}

pub fn parse_return_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();

    let value = if ctx.registry().has_prefix(ctx.current_kind()) {
        Some(parse_expr(ctx, BindingPower::Lowest)?)
    } else {
        None
    };

    ctx.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return { value })
}

pub fn parse_if_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();

    let condition = parse_expr(ctx, BindingPower::Lowest)?;
    let then_body = ctx.parse_block()?;

    let else_body = if ctx.eat(TokenKind::Else) {
        let stmt = if ctx.check(TokenKind::If) {
            parse_if_stmt(ctx)?
        } else {
            Stmt::Block(ctx.parse_block()?)
        };
        Some(Box::new(stmt))
    } else {
        None
    };

    Ok(Stmt::If {
        condition,
        then_body,
        else_body,
    })
}

pub fn parse_while_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();

    let condition = parse_expr(ctx, BindingPower::Lowest)?;
    let body = ctx.with_loop_body(true, |ctx| ctx.parse_block())?;

    Ok(Stmt::While { condition, body })
}

/// `for (init; condition; update) { }` with every clause optional.
pub fn parse_for_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();
    ctx.expect(TokenKind::OpenParen)?;

    // `let` consumes its own semicolon
    let init = if ctx.eat(TokenKind::Semicolon) {
        None
    } else if ctx.check(TokenKind::Let) {
        Some(Box::new(parse_var_decl_stmt(ctx)?))
    } else {
        let expr = parse_expr(ctx, BindingPower::Lowest)?;
        ctx.expect(TokenKind::Semicolon)?;
        Some(Box::new(Stmt::Expression(expr)))
    };

    let condition = if ctx.check(TokenKind::Semicolon) {
        None
    } else {
        Some(parse_expr(ctx, BindingPower::Lowest)?)
    };
    ctx.expect(TokenKind::Semicolon)?;

    let update = if ctx.check(TokenKind::CloseParen) {
        None
    } else {
        Some(Box::new(ctx.parse_statement()?))
    };
    ctx.expect(TokenKind::CloseParen)?;

    let body = ctx.with_loop_body(true, |ctx| ctx.parse_block())?;

    Ok(Stmt::For {
        init,
        condition,
        update,
        body,
    })
}

pub fn parse_loop_control_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    let keyword = ctx.advance();

    if !ctx.inside_loop() {
        ctx.report(ParseError::new(
            ParseErrorKind::LoopControlOutsideLoop {
                keyword: keyword.value.clone(),
            },
            keyword.clone(),
        ));
    }

    ctx.expect(TokenKind::Semicolon)?;

    Ok(if keyword.kind == TokenKind::Break {
        Stmt::Break
    } else {
        Stmt::Continue
    })
}

pub fn parse_block_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    Ok(Stmt::Block(ctx.parse_block()?))
}

fn parse_fn_decl(ctx: &mut ParsingContext<'_>) -> Result<FunctionDecl, ParseError> {
    ctx.expect(TokenKind::Fn)?;

    let name = ctx.expect(TokenKind::Identifier)?.value;
    let parameters = parse_parameters(ctx)?;
    let body = parse_function_body(ctx)?;

    Ok(FunctionDecl {
        name,
        parameters,
        body: Rc::new(body),
    })
}

/// `class Name [extends Parent] { fn method(..) { } ... }`
pub fn parse_class_decl_stmt(ctx: &mut ParsingContext<'_>) -> Result<Stmt, ParseError> {
    ctx.advance();

    let name = ctx.expect(TokenKind::Identifier)?.value;
    let parent = if ctx.eat(TokenKind::Extends) {
        Some(ctx.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    ctx.expect(TokenKind::OpenCurly)?;

    let mut methods = Vec::new();
    while !ctx.check(TokenKind::CloseCurly) && !ctx.at_end() {
        let start = ctx.position();
        match parse_fn_decl(ctx) {
            Ok(method) => methods.push(method),
            Err(error) => ctx.recover(error, start),
        }
    }

    ctx.expect(TokenKind::CloseCurly)?;

    Ok(Stmt::Class {
        name,
        parent,
        methods,
    })
}
