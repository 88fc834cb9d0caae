use std::fmt::Display;

use thiserror::Error;

use crate::{
    lexer::tokens::{Token, TokenKind},
    Position,
};

/// A fail-fast parse error: aborts the statement being parsed.
///
/// Carries the offending token so the position of the problem is always known.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{internal_error}")]
pub struct ParseError {
    internal_error: ParseErrorKind,
    token: Token,
}

impl ParseError {
    pub fn new(error_impl: ParseErrorKind, token: Token) -> Self {
        ParseError {
            internal_error: error_impl,
            token,
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.internal_error
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn get_position(&self) -> &Position {
        &self.token.span.start
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ParseErrorKind::UnexpectedToken { .. } => "UnexpectedToken",
            ParseErrorKind::NoPrefixParser { .. } => "NoPrefixParser",
            ParseErrorKind::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ParseErrorKind::LoopControlOutsideLoop { .. } => "LoopControlOutsideLoop",
            ParseErrorKind::IntegerOutOfRange { .. } => "IntegerOutOfRange",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("Expected {expected}, got {actual}")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("No prefix parser for {kind}")]
    NoPrefixParser { kind: TokenKind },
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("'{keyword}' outside of a loop body")]
    LoopControlOutsideLoop { keyword: String },
    #[error("Integer literal out of range: {literal}")]
    IntegerOutOfRange { literal: String },
}

/// One recorded problem, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub position: Position,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse Error at line {}, column {}: {}",
            self.position.line, self.position.column, self.message
        )
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        Diagnostic {
            message: error.internal_error.to_string(),
            position: error.token.span.start,
        }
    }
}

/// Accumulates recoverable diagnostics over one parse session.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    pub fn new() -> Self {
        ErrorReporter::default()
    }

    pub fn report(&mut self, diagnostic: impl Into<Diagnostic>) {
        let diagnostic = diagnostic.into();
        tracing::debug!(%diagnostic, "recorded diagnostic");
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
