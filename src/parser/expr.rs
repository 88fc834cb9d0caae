use std::rc::Rc;

use crate::{
    ast::{BlockStmt, Expr, InfixOperator, PrefixOperator},
    errors::errors::{ParseError, ParseErrorKind},
    lexer::tokens::{Token, TokenKind},
};

use super::{context::ParsingContext, lookups::BindingPower, registry::InfixParser};

pub fn parse_expr(ctx: &mut ParsingContext<'_>, bp: BindingPower) -> Result<Expr, ParseError> {
    let registry = ctx.registry();

    // First parse NUD
    let token_kind = ctx.current_kind();
    let nud = registry.prefix(token_kind).ok_or_else(|| {
        ParseError::new(
            ParseErrorKind::NoPrefixParser { kind: token_kind },
            ctx.current().clone(),
        )
    })?;
    tracing::trace!(kind = %token_kind, ?bp, "prefix");
    let mut left = nud.parse(ctx)?;

    // While the current token is an operator that binds tighter than bp, extend lhs
    while registry.has_infix(ctx.current_kind())
        && !ctx.current_kind().is_expression_terminator()
        && ctx.precedence(ctx.current_kind()) > bp
    {
        let token_kind = ctx.current_kind();
        let Some(led) = registry.infix(token_kind) else {
            break;
        };

        tracing::trace!(kind = %token_kind, ?bp, "infix");
        left = led.parse(ctx, left)?;
    }

    Ok(left)
}

/// Parses `expr (, expr)*` up to and including `close`.
fn parse_expr_list(ctx: &mut ParsingContext<'_>, close: TokenKind) -> Result<Vec<Expr>, ParseError> {
    let mut items = vec![];

    if ctx.eat(close) {
        return Ok(items);
    }

    loop {
        items.push(parse_expr(ctx, BindingPower::Lowest)?);
        if !ctx.eat(TokenKind::Comma) {
            break;
        }
    }

    ctx.expect(close)?;
    Ok(items)
}

/// Parses `(a, b, c)` parameter names.
pub fn parse_parameters(ctx: &mut ParsingContext<'_>) -> Result<Vec<String>, ParseError> {
    ctx.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    if ctx.eat(TokenKind::CloseParen) {
        return Ok(parameters);
    }

    loop {
        parameters.push(ctx.expect(TokenKind::Identifier)?.value);
        if !ctx.eat(TokenKind::Comma) {
            break;
        }
    }

    ctx.expect(TokenKind::CloseParen)?;
    Ok(parameters)
}

/// Parses a function body. Loop control inside it never refers to a loop
/// around the function.
pub fn parse_function_body(ctx: &mut ParsingContext<'_>) -> Result<BlockStmt, ParseError> {
    ctx.with_loop_body(false, |ctx| ctx.parse_block())
}

pub fn parse_integer_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    let token = ctx.advance();
    token
        .value
        .parse::<i64>()
        .map(Expr::Integer)
        .map_err(|_| {
            ParseError::new(
                ParseErrorKind::IntegerOutOfRange {
                    literal: token.value.clone(),
                },
                token.clone(),
            )
        })
}

pub fn parse_string_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    Ok(Expr::String(ctx.advance().value))
}

pub fn parse_boolean_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    Ok(Expr::Boolean(ctx.advance().kind == TokenKind::True))
}

pub fn parse_null_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    Ok(Expr::Null)
}

pub fn parse_identifier_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    Ok(Expr::Identifier(ctx.advance().value))
}

pub fn parse_this_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    Ok(Expr::This)
}

/// `super.method`
pub fn parse_super_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    ctx.expect(TokenKind::Dot)?;
    let method = ctx.expect(TokenKind::Identifier)?.value;

    Ok(Expr::Super { method })
}

pub fn parse_prefix_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    let operator_token = ctx.advance();
    let operator = prefix_operator(&operator_token)?;
    let right = parse_expr(ctx, BindingPower::Prefix)?;

    Ok(Expr::Prefix {
        operator,
        right: Box::new(right),
    })
}

fn prefix_operator(token: &Token) -> Result<PrefixOperator, ParseError> {
    PrefixOperator::from_token_kind(token.kind).ok_or_else(|| {
        ParseError::new(ParseErrorKind::NoPrefixParser { kind: token.kind }, token.clone())
    })
}

pub fn parse_grouping_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    let expr = parse_expr(ctx, BindingPower::Lowest)?;
    ctx.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_array_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    Ok(Expr::Array(parse_expr_list(ctx, TokenKind::CloseBracket)?))
}

/// `{ key: value, ... }`
pub fn parse_hash_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();

    let mut pairs = vec![];
    while !ctx.check(TokenKind::CloseCurly) {
        let key = parse_expr(ctx, BindingPower::Lowest)?;
        ctx.expect(TokenKind::Colon)?;
        let value = parse_expr(ctx, BindingPower::Lowest)?;
        pairs.push((key, value));

        if !ctx.eat(TokenKind::Comma) {
            break;
        }
    }

    ctx.expect(TokenKind::CloseCurly)?;
    Ok(Expr::Hash(pairs))
}

/// `fn(a, b) { ... }`
pub fn parse_function_expr(ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
    ctx.advance();
    let parameters = parse_parameters(ctx)?;
    let body = parse_function_body(ctx)?;

    Ok(Expr::Function {
        parameters,
        body: Rc::new(body),
    })
}

/// Shared parser for every left-associative binary operator.
///
/// The operator's own binding power is read from the precedence table, so
/// one instance serves any number of operator kinds.
pub struct BinaryOperatorParser;

impl InfixParser for BinaryOperatorParser {
    fn parse(&self, ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
        let operator_token = ctx.advance();
        let operator = InfixOperator::from_token_kind(operator_token.kind).ok_or_else(|| {
            ParseError::new(
                ParseErrorKind::NoPrefixParser {
                    kind: operator_token.kind,
                },
                operator_token.clone(),
            )
        })?;

        let bp = ctx.precedence(operator_token.kind);
        let right = parse_expr(ctx, bp)?;

        Ok(Expr::Infix {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }
}

/// `target = value`, right-associative.
pub fn parse_assignment_expr(ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
    let operator_token = ctx.advance();
    if !left.is_assignable() {
        return Err(ParseError::new(
            ParseErrorKind::InvalidAssignmentTarget,
            operator_token,
        ));
    }

    // Right-associative: the right operand may itself be an assignment
    let bp = ctx.precedence(operator_token.kind).lower();
    let value = parse_expr(ctx, bp)?;

    Ok(Expr::Assign {
        target: Box::new(left),
        value: Box::new(value),
    })
}

pub fn parse_call_expr(ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
    ctx.advance();
    let arguments = parse_expr_list(ctx, TokenKind::CloseParen)?;

    Ok(Expr::Call {
        callee: Box::new(left),
        arguments,
    })
}

pub fn parse_index_expr(ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
    ctx.advance();
    let index = parse_expr(ctx, BindingPower::Lowest)?;
    ctx.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Index {
        left: Box::new(left),
        index: Box::new(index),
    })
}

pub fn parse_member_expr(ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
    ctx.advance();
    let name = ctx.expect(TokenKind::Identifier)?.value;

    Ok(Expr::Property {
        object: Box::new(left),
        name,
    })
}
