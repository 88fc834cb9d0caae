//! Main interpreter module.
//!
//! This module contains the core Interpreter structure. It owns the global
//! scope and runs a parsed program statement by statement, turning the first
//! runtime error into an error object.

use crate::{
    ast::Program,
    runtime::{
        builtins::BuiltinRegistry,
        environment::{Env, ScopeFactory},
        error::RuntimeError,
        object::Object,
    },
};

use super::{stdlib::default_builtins, stmt::exec_statement};

/// Result of evaluating one statement or expression.
///
/// Runtime errors travel in `Err`; `Return`, `Break` and `Continue` travel
/// as `Ok` signals until the construct that consumes them.
pub type EvalResult = Result<Object, RuntimeError>;

/// Evaluates programs against a persistent global scope.
///
/// Successive calls to [`Interpreter::run`] share globals, so definitions
/// made by one program are visible to the next.
pub struct Interpreter {
    globals: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new(&default_builtins())
    }
}

impl Interpreter {
    /// Creates an interpreter whose global scope is seeded from `builtins`.
    ///
    /// # Arguments
    ///
    /// * `builtins` - The native functions visible to programs
    pub fn new(builtins: &BuiltinRegistry) -> Self {
        Interpreter {
            globals: ScopeFactory::global(builtins),
        }
    }

    pub fn globals(&self) -> &Env {
        &self.globals
    }

    /// Runs `program` and returns the value of its last statement.
    ///
    /// Evaluation stops at the first runtime error, which is returned as an
    /// [`Object::Error`], or at a top-level `return`, whose value is returned.
    pub fn run(&self, program: &Program) -> Object {
        tracing::debug!(statements = program.body.len(), "running program");

        let mut last = Object::Null;
        for stmt in program.iter() {
            match exec_statement(&self.globals, stmt) {
                Ok(Object::Return(value)) => return *value,
                Ok(value) => last = value,
                Err(error) => {
                    tracing::debug!(%error, "runtime error");
                    return Object::Error(error);
                }
            }
        }

        last
    }
}
