use thiserror::Error;

/// An error raised while evaluating a program.
///
/// The `Display` form is always `"<CATEGORY>: <message>"`, which is also
/// what an error object shows when inspected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("IDENTIFIER_ERROR: Identifier '{name}' not found")]
    IdentifierNotFound { name: String },
    #[error("ARITHMETIC_ERROR: {message}")]
    Arithmetic { message: String },
    #[error("CONTEXT_ERROR: {message}")]
    Context { message: String },
    #[error("INDEX_ERROR: Index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("KEY_ERROR: Key '{key}' not found")]
    KeyNotFound { key: String },
    #[error("TYPE_ERROR: {message}")]
    Type { message: String },
    #[error("PROPERTY_ERROR: Undefined property '{name}'")]
    UndefinedProperty { name: String },
    #[error("ERROR: {message}")]
    Custom { message: String },
}

impl RuntimeError {
    pub fn category(&self) -> &'static str {
        match self {
            RuntimeError::IdentifierNotFound { .. } => "IDENTIFIER_ERROR",
            RuntimeError::Arithmetic { .. } => "ARITHMETIC_ERROR",
            RuntimeError::Context { .. } => "CONTEXT_ERROR",
            RuntimeError::IndexOutOfRange { .. } => "INDEX_ERROR",
            RuntimeError::KeyNotFound { .. } => "KEY_ERROR",
            RuntimeError::Type { .. } => "TYPE_ERROR",
            RuntimeError::UndefinedProperty { .. } => "PROPERTY_ERROR",
            RuntimeError::Custom { .. } => "ERROR",
        }
    }

    /// The text after the category prefix.
    pub fn message(&self) -> String {
        match self {
            RuntimeError::IdentifierNotFound { name } => format!("Identifier '{}' not found", name),
            RuntimeError::IndexOutOfRange { index, len } => {
                format!("Index {} out of range for length {}", index, len)
            }
            RuntimeError::KeyNotFound { key } => format!("Key '{}' not found", key),
            RuntimeError::UndefinedProperty { name } => format!("Undefined property '{}'", name),
            RuntimeError::Arithmetic { message }
            | RuntimeError::Context { message }
            | RuntimeError::Type { message }
            | RuntimeError::Custom { message } => message.clone(),
        }
    }

    pub fn identifier_not_found(name: impl Into<String>) -> Self {
        RuntimeError::IdentifierNotFound { name: name.into() }
    }

    pub fn arithmetic(message: impl Into<String>) -> Self {
        RuntimeError::Arithmetic {
            message: message.into(),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError::arithmetic("Division by zero")
    }

    pub fn modulo_by_zero() -> Self {
        RuntimeError::arithmetic("Modulo by zero")
    }

    pub fn overflow() -> Self {
        RuntimeError::arithmetic("Integer overflow")
    }

    pub fn this_outside_instance() -> Self {
        RuntimeError::Context {
            message: "'this' used outside of an instance method".into(),
        }
    }

    pub fn super_outside_method() -> Self {
        RuntimeError::Context {
            message: "'super' used outside of a method".into(),
        }
    }

    pub fn super_without_parent(class: &str) -> Self {
        RuntimeError::Context {
            message: format!("'super' used in class '{}' which has no parent", class),
        }
    }

    pub fn index_out_of_range(index: i64, len: usize) -> Self {
        RuntimeError::IndexOutOfRange { index, len }
    }

    pub fn key_not_found(key: impl Into<String>) -> Self {
        RuntimeError::KeyNotFound { key: key.into() }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::Type {
            message: message.into(),
        }
    }

    pub fn undefined_property(name: impl Into<String>) -> Self {
        RuntimeError::UndefinedProperty { name: name.into() }
    }

    pub fn custom(message: impl Into<String>) -> Self {
        RuntimeError::Custom {
            message: message.into(),
        }
    }
}
