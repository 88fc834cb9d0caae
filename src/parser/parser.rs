//! The grammar object and the parse entry point.
//!
//! A [`Parser`] holds the lookup tables:
//! - the expression parser registry (NUD/LED handlers)
//! - the precedence table (binding powers)
//! - the ordered statement dispatcher
//!
//! It is immutable while parsing; each call to [`Parser::parse`] gets its own
//! [`ParsingContext`].

use std::rc::Rc;

use crate::{
    ast::Program,
    errors::errors::Diagnostic,
    lexer::tokens::{Token, TokenKind},
};

use super::{
    context::ParsingContext,
    lookups::{create_token_lookups, BindingPower, PrecedenceTable},
    registry::{ExpressionParserRegistry, InfixParser, OperatorGroup, PrefixParser},
    stmt::{StatementDispatcher, StatementParser},
};

pub struct Parser {
    pub(super) registry: ExpressionParserRegistry,
    pub(super) precedence: PrecedenceTable,
    pub(super) statements: StatementDispatcher,
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

impl Parser {
    /// A parser for the full language.
    pub fn new() -> Self {
        let mut parser = Parser::empty();
        create_token_lookups(&mut parser);
        parser
    }

    /// A parser with no registered handlers beyond the expression statement.
    pub fn empty() -> Self {
        Parser {
            registry: ExpressionParserRegistry::new(),
            precedence: PrecedenceTable::new(),
            statements: StatementDispatcher::new(),
        }
    }

    /// Registers a left denotation (infix) handler and its binding power.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led: impl InfixParser + 'static) {
        self.precedence.set(kind, binding_power);
        self.registry.register_infix(kind, Rc::new(led));
    }

    /// Registers a shared infix parser for every kind the group declares.
    ///
    /// Binding powers for the group's kinds are set separately through
    /// [`Parser::precedence`].
    pub fn led_group(&mut self, group: OperatorGroup) {
        tracing::trace!(group = group.name(), kinds = group.handled_kinds().len(), "led group");
        self.registry.register_group(Rc::new(group));
    }

    /// Registers a null denotation (prefix) handler.
    pub fn nud(&mut self, kind: TokenKind, nud: impl PrefixParser + 'static) {
        self.registry.register_prefix(kind, Rc::new(nud));
    }

    pub fn precedence(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.precedence.set(kind, binding_power);
    }

    /// Adds a statement parser after those already registered; the
    /// expression statement always stays last.
    pub fn stmt(&mut self, parser: impl StatementParser + 'static) {
        self.statements.register(Box::new(parser));
    }

    pub fn registry(&self) -> &ExpressionParserRegistry {
        &self.registry
    }

    pub fn precedence_table(&self) -> &PrecedenceTable {
        &self.precedence
    }

    /// Parses a token sequence into a [`Program`].
    ///
    /// Statement errors are recorded and parsing resumes at the next
    /// statement boundary; if anything was recorded, every diagnostic is
    /// returned instead of the program.
    pub fn parse(&self, tokens: Vec<Token>) -> Result<Program, Vec<Diagnostic>> {
        tracing::debug!(tokens = tokens.len(), "parsing program");
        let mut ctx = ParsingContext::new(tokens, self);

        let mut body = vec![];
        while !ctx.at_end() {
            let start = ctx.position();
            match ctx.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(error) => ctx.recover(error, start),
            }
        }

        let reporter = ctx.into_reporter();
        if reporter.has_errors() {
            Err(reporter.into_diagnostics())
        } else {
            Ok(Program { body })
        }
    }
}

/// Parses `tokens` with the full language grammar.
pub fn parse(tokens: Vec<Token>) -> Result<Program, Vec<Diagnostic>> {
    Parser::new().parse(tokens)
}
