//! Per-parse state: the token cursor, the grammar being applied, collected
//! diagnostics and whether the cursor is inside a loop body.

use crate::{
    ast::{BlockStmt, Stmt},
    errors::errors::{Diagnostic, ErrorReporter, ParseError},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::{BindingPower, PrecedenceTable},
    parser::Parser,
    registry::ExpressionParserRegistry,
    stream::TokenStream,
};

pub struct ParsingContext<'p> {
    stream: TokenStream,
    grammar: &'p Parser,
    reporter: ErrorReporter,
    inside_loop: bool,
}

impl<'p> ParsingContext<'p> {
    pub fn new(tokens: Vec<Token>, grammar: &'p Parser) -> Self {
        ParsingContext {
            stream: TokenStream::new(tokens),
            grammar,
            reporter: ErrorReporter::new(),
            inside_loop: false,
        }
    }

    pub fn current(&self) -> &Token {
        self.stream.current()
    }

    pub fn current_kind(&self) -> TokenKind {
        self.stream.current_kind()
    }

    pub fn peek(&self) -> &Token {
        self.stream.peek()
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.stream.check(kind)
    }

    pub fn advance(&mut self) -> Token {
        self.stream.advance()
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        self.stream.expect(kind)
    }

    /// Consumes the current token when it is of `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn at_end(&self) -> bool {
        self.stream.at_end()
    }

    pub fn position(&self) -> usize {
        self.stream.position()
    }

    pub fn precedence(&self, kind: TokenKind) -> BindingPower {
        self.precedence_table().get(kind)
    }

    pub fn precedence_table(&self) -> &'p PrecedenceTable {
        &self.grammar.precedence
    }

    pub fn registry(&self) -> &'p ExpressionParserRegistry {
        &self.grammar.registry
    }

    pub fn report(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.reporter.report(diagnostic);
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    pub fn into_reporter(self) -> ErrorReporter {
        self.reporter
    }

    pub fn inside_loop(&self) -> bool {
        self.inside_loop
    }

    /// Runs `f` with the loop flag set to `inside`, restoring the previous
    /// value afterwards whether or not `f` succeeded.
    pub fn with_loop_body<T>(&mut self, inside: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.inside_loop;
        self.inside_loop = inside;
        let result = f(self);
        self.inside_loop = previous;
        result
    }

    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let grammar = self.grammar;
        grammar.statements.parse(self)
    }

    /// Parses `{ stmt* }`, recording and recovering from statement errors.
    pub fn parse_block(&mut self) -> Result<BlockStmt, ParseError> {
        self.expect(TokenKind::OpenCurly)?;

        let mut body = Vec::new();
        while !self.check(TokenKind::CloseCurly) && !self.at_end() {
            let start = self.position();
            match self.parse_statement() {
                Ok(stmt) => body.push(stmt),
                Err(error) => self.recover(error, start),
            }
        }

        self.expect(TokenKind::CloseCurly)?;
        Ok(BlockStmt { body })
    }

    /// Records `error` and skips to the next statement boundary.
    pub fn recover(&mut self, error: ParseError, start: usize) {
        tracing::trace!(error = error.get_error_name(), at = %error.token().kind, "recovering");
        self.report(error);
        self.synchronize(start);
    }

    /// Skips to a statement boundary after an error.
    ///
    /// Always consumes at least one token when nothing was consumed since
    /// `start`, so recovery cannot loop on the same token.
    pub fn synchronize(&mut self, start: usize) {
        if self.position() == start {
            self.advance();
        }

        while !self.at_end() {
            let kind = self.current_kind();
            if kind == TokenKind::Semicolon {
                self.advance();
                return;
            }
            if kind == TokenKind::CloseCurly || kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }
}
