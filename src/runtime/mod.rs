//! Runtime object system.
//!
//! Values, the lexical scope chain, runtime errors and the builtin table the
//! interpreter evaluates programs against.

pub mod builtins;
pub mod environment;
pub mod error;
pub mod object;
