//! Token kind → expression parser lookup.
//!
//! Prefix (NUD) parsers start an expression; infix (LED) parsers extend an
//! already parsed left operand. Anything callable with the right signature is
//! a parser, so plain functions register directly.

use std::{collections::HashMap, rc::Rc};

use crate::{ast::Expr, errors::errors::ParseError, lexer::tokens::TokenKind};

use super::context::ParsingContext;

pub trait PrefixParser {
    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError>;
}

pub trait InfixParser {
    /// Consumes the operator token(s) at the cursor and combines `left` with
    /// whatever follows.
    fn parse(&self, ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError>;
}

impl<F> PrefixParser for F
where
    F: Fn(&mut ParsingContext<'_>) -> Result<Expr, ParseError>,
{
    fn parse(&self, ctx: &mut ParsingContext<'_>) -> Result<Expr, ParseError> {
        self(ctx)
    }
}

impl<F> InfixParser for F
where
    F: Fn(&mut ParsingContext<'_>, Expr) -> Result<Expr, ParseError>,
{
    fn parse(&self, ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
        self(ctx, left)
    }
}

/// A thin named wrapper that routes a fixed set of token kinds to a shared
/// infix parser.
pub struct OperatorGroup {
    name: &'static str,
    kinds: &'static [TokenKind],
    delegate: Rc<dyn InfixParser>,
}

impl OperatorGroup {
    pub fn new(name: &'static str, kinds: &'static [TokenKind], delegate: Rc<dyn InfixParser>) -> Self {
        OperatorGroup {
            name,
            kinds,
            delegate,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handled_kinds(&self) -> &'static [TokenKind] {
        self.kinds
    }
}

impl InfixParser for OperatorGroup {
    fn parse(&self, ctx: &mut ParsingContext<'_>, left: Expr) -> Result<Expr, ParseError> {
        self.delegate.parse(ctx, left)
    }
}

#[derive(Default)]
pub struct ExpressionParserRegistry {
    prefix: HashMap<TokenKind, Rc<dyn PrefixParser>>,
    infix: HashMap<TokenKind, Rc<dyn InfixParser>>,
}

impl ExpressionParserRegistry {
    pub fn new() -> Self {
        ExpressionParserRegistry::default()
    }

    pub fn register_prefix(&mut self, kind: TokenKind, parser: Rc<dyn PrefixParser>) {
        self.prefix.insert(kind, parser);
    }

    pub fn register_infix(&mut self, kind: TokenKind, parser: Rc<dyn InfixParser>) {
        self.infix.insert(kind, parser);
    }

    /// Registers `group` under every kind it declares.
    pub fn register_group(&mut self, group: Rc<OperatorGroup>) {
        for kind in group.handled_kinds() {
            self.infix.insert(*kind, group.clone());
        }
    }

    pub fn prefix(&self, kind: TokenKind) -> Option<&dyn PrefixParser> {
        self.prefix.get(&kind).map(|parser| parser.as_ref())
    }

    pub fn infix(&self, kind: TokenKind) -> Option<&dyn InfixParser> {
        self.infix.get(&kind).map(|parser| parser.as_ref())
    }

    /// Can this token start an expression?
    pub fn has_prefix(&self, kind: TokenKind) -> bool {
        self.prefix.contains_key(&kind)
    }

    /// Can this token continue an expression as an operator?
    pub fn has_infix(&self, kind: TokenKind) -> bool {
        self.infix.contains_key(&kind)
    }
}
