//! Abstract Syntax Tree (AST) definitions.
//!
//! The parser produces a [`statements::Program`] made of [`statements::Stmt`]
//! and [`expressions::Expr`] nodes. Nodes are closed enums with structural
//! equality, so two parses of the same source compare equal.

pub mod expressions;
pub mod statements;

pub use expressions::{Expr, InfixOperator, PrefixOperator};
pub use statements::{BlockStmt, FunctionDecl, Program, Stmt};
