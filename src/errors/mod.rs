//! Parse-time error types and error reporting.
//!
//! - [`errors::ParseError`] aborts the statement currently being parsed
//! - [`errors::ErrorReporter`] collects recoverable [`errors::Diagnostic`]s so
//!   several problems surface from one parse
//!
//! Runtime errors are values and live in [`crate::runtime::error`].

pub mod errors;
