//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, classes, loops and other control flow)
//! - Expression parsing (binary ops, calls, indexing, literals)
//! - Error recovery and reporting
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling. Every
//! handler is registered on a [`parser::Parser`], so the grammar can be
//! extended without touching the core loop.

pub mod context;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod registry;
pub mod stmt;
pub mod stream;
