//! Tree-walking interpreter.
//!
//! This module evaluates a parsed [`crate::ast::Program`]:
//! - `interpreter`: the entry point and global scope
//! - `stmt`: statement execution, scoping and loop control
//! - `expr`: operators, calls, classes, indexing and properties
//! - `stdlib`: the builtins programs start with

pub mod expr;
pub mod interpreter;
pub mod stdlib;
pub mod stmt;

#[cfg(test)]
mod tests;
