use std::{fmt::Display, rc::Rc, slice::Iter};

use super::expressions::Expr;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

/// A named function: a `fn name(..) { }` statement or a class method.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Rc<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let {
        identifier: String,
        value: Expr,
    },
    Return {
        value: Option<Expr>,
    },
    Expression(Expr),
    Block(BlockStmt),
    If {
        condition: Expr,
        then_body: BlockStmt,
        /// Either another `If` or a `Block`.
        else_body: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: BlockStmt,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: BlockStmt,
    },
    Break,
    Continue,
    Function(FunctionDecl),
    Class {
        name: String,
        parent: Option<String>,
        methods: Vec<FunctionDecl>,
    },
}

/// The root of a parse: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}

impl Program {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for stmt in &self.body {
            write!(f, " {}", stmt)?;
        }
        write!(f, " }}")
    }
}

impl Display for FunctionDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn {}({}) {}", self.name, self.parameters.join(", "), self.body)
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Let { identifier, value } => write!(f, "let {} = {};", identifier, value),
            Stmt::Return { value: Some(value) } => write!(f, "return {};", value),
            Stmt::Return { value: None } => write!(f, "return;"),
            Stmt::Expression(expr) => write!(f, "{};", expr),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::If {
                condition,
                then_body,
                else_body,
            } => {
                write!(f, "if {} {}", condition, then_body)?;
                if let Some(else_body) = else_body {
                    write!(f, " else {}", else_body)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => write!(f, "while {} {}", condition, body),
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                let init = init.as_ref().map(|s| s.to_string()).unwrap_or_else(|| ";".into());
                let condition = condition.as_ref().map(|c| c.to_string()).unwrap_or_default();
                let update = update.as_ref().map(|s| s.to_string()).unwrap_or_default();
                write!(
                    f,
                    "for ({} {}; {}) {}",
                    init,
                    condition,
                    update.trim_end_matches(';'),
                    body
                )
            }
            Stmt::Break => write!(f, "break;"),
            Stmt::Continue => write!(f, "continue;"),
            Stmt::Function(decl) => write!(f, "{}", decl),
            Stmt::Class {
                name,
                parent,
                methods,
            } => {
                write!(f, "class {}", name)?;
                if let Some(parent) = parent {
                    write!(f, " extends {}", parent)?;
                }
                write!(f, " {{")?;
                for method in methods {
                    write!(f, " {}", method)?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines = self
            .body
            .iter()
            .map(|stmt| stmt.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", lines.join("\n"))
    }
}
