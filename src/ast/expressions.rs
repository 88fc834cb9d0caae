use std::{fmt::Display, rc::Rc};

use crate::lexer::tokens::TokenKind;

use super::statements::BlockStmt;

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixOperator {
    Negate,
    Not,
}

impl PrefixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Dash => Some(PrefixOperator::Negate),
            TokenKind::Not => Some(PrefixOperator::Not),
            _ => None,
        }
    }
}

impl Display for PrefixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixOperator::Negate => write!(f, "-"),
            PrefixOperator::Not => write!(f, "!"),
        }
    }
}

/// Binary operators, including the short-circuiting logical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
}

impl InfixOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus | TokenKind::PlusEquals => Some(InfixOperator::Add),
            TokenKind::Dash | TokenKind::MinusEquals => Some(InfixOperator::Subtract),
            TokenKind::Star | TokenKind::StarEquals => Some(InfixOperator::Multiply),
            TokenKind::Slash | TokenKind::SlashEquals => Some(InfixOperator::Divide),
            TokenKind::Percent | TokenKind::PercentEquals => Some(InfixOperator::Modulo),
            TokenKind::Equals => Some(InfixOperator::Equal),
            TokenKind::NotEquals => Some(InfixOperator::NotEqual),
            TokenKind::Less => Some(InfixOperator::Less),
            TokenKind::LessEquals => Some(InfixOperator::LessEqual),
            TokenKind::Greater => Some(InfixOperator::Greater),
            TokenKind::GreaterEquals => Some(InfixOperator::GreaterEqual),
            TokenKind::And => Some(InfixOperator::And),
            TokenKind::Or => Some(InfixOperator::Or),
            _ => None,
        }
    }
}

impl Display for InfixOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Modulo => "%",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
            InfixOperator::Less => "<",
            InfixOperator::LessEqual => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::And => "&&",
            InfixOperator::Or => "||",
        };
        write!(f, "{}", symbol)
    }
}

/// Expression nodes.
///
/// `Display` renders every compound expression fully parenthesised, which
/// makes the grouping chosen by the parser visible.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Identifier(String),
    This,
    /// `super.method`
    Super {
        method: String,
    },
    Prefix {
        operator: PrefixOperator,
        right: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        operator: InfixOperator,
        right: Box<Expr>,
    },
    /// Target is an identifier, index or property expression.
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
    Property {
        object: Box<Expr>,
        name: String,
    },
    Array(Vec<Expr>),
    Hash(Vec<(Expr, Expr)>),
    Function {
        parameters: Vec<String>,
        body: Rc<BlockStmt>,
    },
}

impl Expr {
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Identifier(_) | Expr::Index { .. } | Expr::Property { .. }
        )
    }
}

fn join<T: Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Integer(value) => write!(f, "{}", value),
            Expr::String(value) => write!(f, "{:?}", value),
            Expr::Boolean(value) => write!(f, "{}", value),
            Expr::Null => write!(f, "null"),
            Expr::Identifier(name) => write!(f, "{}", name),
            Expr::This => write!(f, "this"),
            Expr::Super { method } => write!(f, "super.{}", method),
            Expr::Prefix { operator, right } => write!(f, "({}{})", operator, right),
            Expr::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Expr::Assign { target, value } => write!(f, "({} = {})", target, value),
            Expr::Call { callee, arguments } => write!(f, "{}({})", callee, join(arguments)),
            Expr::Index { left, index } => write!(f, "({}[{}])", left, index),
            Expr::Property { object, name } => write!(f, "{}.{}", object, name),
            Expr::Array(elements) => write!(f, "[{}]", join(elements)),
            Expr::Hash(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect::<Vec<_>>();
                write!(f, "{{{}}}", pairs.join(", "))
            }
            Expr::Function { parameters, body } => {
                write!(f, "fn({}) {}", parameters.join(", "), body)
            }
        }
    }
}
