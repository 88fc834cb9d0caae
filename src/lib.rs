#![allow(clippy::module_inception)]

use std::fmt::Display;

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod runtime;

extern crate regex;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Returns the text of the 1-based `line` in `source`, without its newline.
pub fn get_line_at_position<'a>(source: &'a str, position: &Position) -> Option<&'a str> {
    source
        .lines()
        .nth(position.line.checked_sub(1)?)
}

/// Renders the offending source line with a caret under `position`.
///
/// ```text
///    |
/// 20 | let a = ;
///    | --------^
/// ```
pub fn render_snippet(source: &str, position: &Position) -> Option<String> {
    let line_text = get_line_at_position(source, position)?;

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);
    let arrows = position.column.saturating_sub(removed_whitespace).max(1);

    Some(format!(
        "{:>padding$}\n{} | {}\n{:>padding$} {:->arrows$}",
        "|",
        line_string,
        line_text_removed.trim_end(),
        "|",
        "^"
    ))
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let start = string.chars().take_while(|c| *c == ' ').count();
    (&string[start..], start)
}
