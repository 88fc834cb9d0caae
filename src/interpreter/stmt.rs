use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{BlockStmt, Expr, FunctionDecl, Stmt},
    runtime::{
        environment::{Env, ScopeFactory},
        error::RuntimeError,
        object::{ClassObject, FunctionObject, Object},
    },
};

use super::{expr::eval_expression, interpreter::EvalResult};

/// Runs `statements` in `env`, stopping at the first signal.
pub fn exec_statements(env: &Env, statements: &[Stmt]) -> EvalResult {
    let mut last = Object::Null;
    for stmt in statements {
        let result = exec_statement(env, stmt)?;
        if result.is_signal() {
            return Ok(result);
        }
        last = result;
    }
    Ok(last)
}

/// Runs `block` in a fresh block scope nested in `env`.
pub fn exec_block(env: &Env, block: &BlockStmt) -> EvalResult {
    exec_statements(&ScopeFactory::block_scope(env), &block.body)
}

pub fn exec_statement(env: &Env, stmt: &Stmt) -> EvalResult {
    match stmt {
        Stmt::Let { identifier, value } => {
            let value = eval_expression(env, value)?;
            env.borrow_mut().define(identifier.clone(), value);
            Ok(Object::Null)
        }
        Stmt::Return { value } => {
            let value = match value {
                Some(expr) => eval_expression(env, expr)?,
                None => Object::Null,
            };
            Ok(Object::Return(Box::new(value)))
        }
        Stmt::Expression(expr) => eval_expression(env, expr),
        Stmt::Block(block) => exec_block(env, block),
        Stmt::If {
            condition,
            then_body,
            else_body,
        } => {
            if eval_expression(env, condition)?.is_truthy() {
                exec_block(env, then_body)
            } else if let Some(else_body) = else_body {
                exec_statement(env, else_body)
            } else {
                Ok(Object::Null)
            }
        }
        Stmt::While { condition, body } => exec_loop(env, None, Some(condition), None, body),
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => exec_loop(
            env,
            init.as_deref(),
            condition.as_ref(),
            update.as_deref(),
            body,
        ),
        Stmt::Break => Ok(Object::Break),
        Stmt::Continue => Ok(Object::Continue),
        Stmt::Function(decl) => {
            let function = function_object(env, decl);
            env.borrow_mut()
                .define(decl.name.clone(), Object::Function(function));
            Ok(Object::Null)
        }
        Stmt::Class {
            name,
            parent,
            methods,
        } => {
            let class = class_object(env, name, parent.as_deref(), methods)?;
            env.borrow_mut().define(name.clone(), Object::Class(class));
            Ok(Object::Null)
        }
    }
}

/// Shared driver for `while` and `for`.
///
/// The init clause binds in one loop scope kept for the whole loop; every
/// iteration body gets its own block scope inside it.
fn exec_loop(
    env: &Env,
    init: Option<&Stmt>,
    condition: Option<&Expr>,
    update: Option<&Stmt>,
    body: &BlockStmt,
) -> EvalResult {
    let loop_env = ScopeFactory::loop_scope(env);

    if let Some(init) = init {
        exec_statement(&loop_env, init)?;
    }

    loop {
        if let Some(condition) = condition {
            if !eval_expression(&loop_env, condition)?.is_truthy() {
                break;
            }
        }

        match exec_block(&loop_env, body)? {
            Object::Break => break,
            result @ Object::Return(_) => return Ok(result),
            _ => {}
        }

        if let Some(update) = update {
            exec_statement(&loop_env, update)?;
        }
    }

    Ok(Object::Null)
}

fn function_object(env: &Env, decl: &FunctionDecl) -> Rc<FunctionObject> {
    Rc::new(FunctionObject {
        name: Some(decl.name.clone()),
        parameters: decl.parameters.clone(),
        body: decl.body.clone(),
        env: env.clone(),
    })
}

fn class_object(
    env: &Env,
    name: &str,
    parent: Option<&str>,
    methods: &[FunctionDecl],
) -> Result<Rc<ClassObject>, RuntimeError> {
    let parent = match parent {
        Some(parent_name) => match env.borrow().get(parent_name)? {
            Object::Class(class) => Some(class),
            other => {
                return Err(RuntimeError::type_error(format!(
                    "Class '{}' can only extend a class, got {}",
                    name,
                    other.object_type()
                )))
            }
        },
        None => None,
    };

    let methods = methods
        .iter()
        .map(|decl| (decl.name.clone(), function_object(env, decl)))
        .collect::<HashMap<_, _>>();

    Ok(Rc::new(ClassObject {
        name: name.to_string(),
        parent,
        methods,
    }))
}
