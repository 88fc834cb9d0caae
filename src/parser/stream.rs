//! Positional cursor over the token sequence.

use crate::{
    errors::errors::{ParseError, ParseErrorKind},
    lexer::tokens::{Token, TokenKind},
    Position, Span, MK_TOKEN,
};

/// A cursor with one token of lookahead.
///
/// The stream always ends in an `EOF` token and the cursor never moves past
/// it, so `current` and `peek` are always defined.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|t| t.span.end.clone())
                .unwrap_or(Position { line: 1, column: 1 });
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span {
                    start: end.clone(),
                    end
                }
            ));
        }

        TokenStream { tokens, pos: 0 }
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// The token after the current one (`EOF` at the end of input).
    pub fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + 1).min(last)]
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it is of `expected` kind.
    pub fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(ParseError::new(
                ParseErrorKind::UnexpectedToken {
                    expected,
                    actual: self.current_kind(),
                },
                self.current().clone(),
            ))
        }
    }

    pub fn at_end(&self) -> bool {
        self.check(TokenKind::EOF)
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}
