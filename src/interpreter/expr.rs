use std::{collections::BTreeMap, rc::Rc};

use crate::{
    ast::{Expr, InfixOperator, PrefixOperator},
    runtime::{
        environment::{Env, ScopeFactory},
        error::RuntimeError,
        object::{ArrayObject, FunctionObject, HashObject, InstanceObject, Object},
    },
};

use super::{interpreter::EvalResult, stmt::exec_statements};

pub fn eval_expression(env: &Env, expr: &Expr) -> EvalResult {
    match expr {
        Expr::Integer(value) => Ok(Object::Integer(*value)),
        Expr::String(value) => Ok(Object::String(value.clone())),
        Expr::Boolean(value) => Ok(Object::Boolean(*value)),
        Expr::Null => Ok(Object::Null),
        Expr::Identifier(name) => env.borrow().get(name),
        Expr::This => current_this(env).map(Object::Instance),
        Expr::Super { method } => eval_super(env, method),
        Expr::Prefix { operator, right } => {
            let right = eval_expression(env, right)?;
            eval_prefix(*operator, operand(right)?)
        }
        Expr::Infix {
            left,
            operator: InfixOperator::And,
            right,
        } => {
            if !eval_expression(env, left)?.is_truthy() {
                return Ok(Object::Boolean(false));
            }
            Ok(Object::Boolean(eval_expression(env, right)?.is_truthy()))
        }
        Expr::Infix {
            left,
            operator: InfixOperator::Or,
            right,
        } => {
            if eval_expression(env, left)?.is_truthy() {
                return Ok(Object::Boolean(true));
            }
            Ok(Object::Boolean(eval_expression(env, right)?.is_truthy()))
        }
        Expr::Infix {
            left,
            operator,
            right,
        } => {
            let left = operand(eval_expression(env, left)?)?;
            let right = operand(eval_expression(env, right)?)?;
            eval_infix(*operator, left, right)
        }
        Expr::Assign { target, value } => eval_assignment(env, target, value),
        Expr::Call { callee, arguments } => {
            let callee = eval_expression(env, callee)?;
            let arguments = arguments
                .iter()
                .map(|argument| eval_expression(env, argument))
                .collect::<Result<Vec<_>, _>>()?;
            apply(callee, arguments)
        }
        Expr::Index { left, index } => {
            let left = eval_expression(env, left)?;
            let index = eval_expression(env, index)?;
            eval_index(left, index)
        }
        Expr::Property { object, name } => {
            let object = eval_expression(env, object)?;
            eval_property(object, name)
        }
        Expr::Array(elements) => {
            let elements = elements
                .iter()
                .map(|element| eval_expression(env, element))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Object::Array(ArrayObject::new(elements)))
        }
        Expr::Hash(pairs) => {
            let mut entries = BTreeMap::new();
            for (key, value) in pairs {
                let key = hash_key(eval_expression(env, key)?)?;
                let value = eval_expression(env, value)?;
                entries.insert(key, value);
            }
            Ok(Object::Hash(HashObject::new(entries)))
        }
        Expr::Function { parameters, body } => Ok(Object::Function(Rc::new(FunctionObject {
            name: None,
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        }))),
    }
}

/// Rejects signal objects used as operator operands.
fn operand(object: Object) -> EvalResult {
    if object.is_signal() {
        Err(RuntimeError::type_error(format!(
            "{} cannot be used as an operand",
            object.object_type()
        )))
    } else {
        Ok(object)
    }
}

fn hash_key(key: Object) -> Result<String, RuntimeError> {
    match key {
        Object::String(key) => Ok(key),
        other => Err(RuntimeError::type_error(format!(
            "Hash keys must be STRING, got {}",
            other.object_type()
        ))),
    }
}

fn eval_prefix(operator: PrefixOperator, right: Object) -> EvalResult {
    match (operator, right) {
        (PrefixOperator::Not, right) => Ok(Object::Boolean(!right.is_truthy())),
        (PrefixOperator::Negate, Object::Integer(value)) => value
            .checked_neg()
            .map(Object::Integer)
            .ok_or_else(RuntimeError::overflow),
        (PrefixOperator::Negate, right) => Err(RuntimeError::type_error(format!(
            "Unsupported operand type for {}: {}",
            operator,
            right.object_type()
        ))),
    }
}

pub fn eval_infix(operator: InfixOperator, left: Object, right: Object) -> EvalResult {
    match (&left, &right) {
        (Object::Integer(a), Object::Integer(b)) => eval_integer_infix(operator, *a, *b),
        (Object::String(a), Object::String(b)) => eval_string_infix(operator, a, b),
        _ => match operator {
            InfixOperator::Equal => Ok(Object::Boolean(left == right)),
            InfixOperator::NotEqual => Ok(Object::Boolean(left != right)),
            InfixOperator::And => Ok(Object::Boolean(left.is_truthy() && right.is_truthy())),
            InfixOperator::Or => Ok(Object::Boolean(left.is_truthy() || right.is_truthy())),
            _ => Err(unsupported_operands(operator, &left, &right)),
        },
    }
}

fn eval_integer_infix(operator: InfixOperator, a: i64, b: i64) -> EvalResult {
    let value = match operator {
        InfixOperator::Add => a.checked_add(b).ok_or_else(RuntimeError::overflow)?,
        InfixOperator::Subtract => a.checked_sub(b).ok_or_else(RuntimeError::overflow)?,
        InfixOperator::Multiply => a.checked_mul(b).ok_or_else(RuntimeError::overflow)?,
        InfixOperator::Divide => {
            if b == 0 {
                return Err(RuntimeError::division_by_zero());
            }
            a.checked_div(b).ok_or_else(RuntimeError::overflow)?
        }
        InfixOperator::Modulo => {
            if b == 0 {
                return Err(RuntimeError::modulo_by_zero());
            }
            a.checked_rem(b).ok_or_else(RuntimeError::overflow)?
        }
        InfixOperator::Equal => return Ok(Object::Boolean(a == b)),
        InfixOperator::NotEqual => return Ok(Object::Boolean(a != b)),
        InfixOperator::Less => return Ok(Object::Boolean(a < b)),
        InfixOperator::LessEqual => return Ok(Object::Boolean(a <= b)),
        InfixOperator::Greater => return Ok(Object::Boolean(a > b)),
        InfixOperator::GreaterEqual => return Ok(Object::Boolean(a >= b)),
        InfixOperator::And => return Ok(Object::Boolean(a != 0 && b != 0)),
        InfixOperator::Or => return Ok(Object::Boolean(a != 0 || b != 0)),
    };

    Ok(Object::Integer(value))
}

fn eval_string_infix(operator: InfixOperator, a: &str, b: &str) -> EvalResult {
    let result = match operator {
        InfixOperator::Add => return Ok(Object::String(format!("{}{}", a, b))),
        InfixOperator::Equal => a == b,
        InfixOperator::NotEqual => a != b,
        InfixOperator::Less => a < b,
        InfixOperator::LessEqual => a <= b,
        InfixOperator::Greater => a > b,
        InfixOperator::GreaterEqual => a >= b,
        _ => {
            return Err(unsupported_operands(
                operator,
                &Object::String(a.to_string()),
                &Object::String(b.to_string()),
            ))
        }
    };

    Ok(Object::Boolean(result))
}

fn unsupported_operands(operator: InfixOperator, left: &Object, right: &Object) -> RuntimeError {
    RuntimeError::type_error(format!(
        "Unsupported operand types for {}: {} and {}",
        operator,
        left.object_type(),
        right.object_type()
    ))
}

fn eval_assignment(env: &Env, target: &Expr, value: &Expr) -> EvalResult {
    match target {
        Expr::Identifier(name) => {
            let value = eval_expression(env, value)?;
            env.borrow_mut().assign(name, value.clone())?;
            Ok(value)
        }
        Expr::Index { left, index } => {
            let collection = eval_expression(env, left)?;
            let index = eval_expression(env, index)?;
            let value = eval_expression(env, value)?;

            match (&collection, index) {
                (Object::Array(array), Object::Integer(i)) => array.set(i, value.clone())?,
                (Object::Hash(hash), Object::String(key)) => hash.set(key, value.clone()),
                (_, index) => {
                    return Err(RuntimeError::type_error(format!(
                        "Cannot assign to {} with a {} index",
                        collection.object_type(),
                        index.object_type()
                    )))
                }
            }
            Ok(value)
        }
        Expr::Property { object, name } => {
            let object = eval_expression(env, object)?;
            let value = eval_expression(env, value)?;

            match object {
                Object::Instance(instance) => {
                    instance.fields.borrow_mut().define(name.clone(), value.clone());
                    Ok(value)
                }
                other => Err(RuntimeError::type_error(format!(
                    "Cannot set property '{}' on {}",
                    name,
                    other.object_type()
                ))),
            }
        }
        // The parser only produces assignable targets
        other => Err(RuntimeError::type_error(format!(
            "Cannot assign to {}",
            other
        ))),
    }
}

fn eval_index(left: Object, index: Object) -> EvalResult {
    match (&left, &index) {
        (Object::Array(array), Object::Integer(i)) => array.get(*i),
        (Object::Hash(hash), Object::String(key)) => Ok(hash.get(key)),
        _ => Err(RuntimeError::type_error(format!(
            "Cannot index {} with {}",
            left.object_type(),
            index.object_type()
        ))),
    }
}

/// Fields shadow methods; methods come back bound to the instance.
fn eval_property(object: Object, name: &str) -> EvalResult {
    match object {
        Object::Instance(instance) => {
            if let Some(value) = instance.fields.borrow().get_local(name) {
                return Ok(value);
            }
            match instance.class.find_method(name) {
                Some((method, owner)) => Ok(Object::Function(Rc::new(
                    method.bind(instance.clone(), &owner),
                ))),
                None => Err(RuntimeError::undefined_property(name)),
            }
        }
        other => Err(RuntimeError::type_error(format!(
            "Cannot read property '{}' of {}",
            name,
            other.object_type()
        ))),
    }
}

fn current_this(env: &Env) -> Result<Rc<InstanceObject>, RuntimeError> {
    match env.borrow().get("this") {
        Ok(Object::Instance(instance)) => Ok(instance),
        _ => Err(RuntimeError::this_outside_instance()),
    }
}

/// `super.method`: resolves from the owning class's parent, bound to the same `this`.
///
/// Every bound method frame defines `super`, so the nearest binding always
/// belongs to the method that also binds `this`.
fn eval_super(env: &Env, method: &str) -> EvalResult {
    let instance = current_this(env).map_err(|_| RuntimeError::super_outside_method())?;

    let parent = match env.borrow().get("super") {
        Ok(Object::Class(parent)) => parent,
        _ => return Err(RuntimeError::super_without_parent(&instance.class.name)),
    };

    match parent.find_method(method) {
        Some((function, owner)) => Ok(Object::Function(Rc::new(function.bind(instance, &owner)))),
        None => Err(RuntimeError::undefined_property(method)),
    }
}

/// Calls `callee` with already evaluated `arguments`.
pub fn apply(callee: Object, arguments: Vec<Object>) -> EvalResult {
    match callee {
        Object::Function(function) => call_function(&function, arguments),
        Object::Builtin(builtin) => {
            tracing::trace!(builtin = %builtin.name, arguments = arguments.len(), "call");
            builtin.call(&arguments)
        }
        Object::Class(class) => {
            tracing::trace!(class = %class.name, "instantiate");
            let instance = Rc::new(InstanceObject::new(class.clone()));

            match class.find_method("init") {
                Some((init, owner)) => {
                    call_function(&init.bind(instance.clone(), &owner), arguments)?;
                }
                None if !arguments.is_empty() => {
                    return Err(RuntimeError::type_error(format!(
                        "Class '{}' takes no arguments, got {}",
                        class.name,
                        arguments.len()
                    )))
                }
                None => {}
            }

            Ok(Object::Instance(instance))
        }
        other => Err(RuntimeError::type_error(format!(
            "{} is not callable",
            other.object_type()
        ))),
    }
}

pub fn call_function(function: &FunctionObject, arguments: Vec<Object>) -> EvalResult {
    let name = function.name.as_deref().unwrap_or("<anonymous>");
    tracing::trace!(function = name, arguments = arguments.len(), "call");

    if arguments.len() != function.parameters.len() {
        return Err(RuntimeError::type_error(format!(
            "Function '{}' expects {} argument(s), got {}",
            name,
            function.parameters.len(),
            arguments.len()
        )));
    }

    let frame = ScopeFactory::function_scope(&function.env);
    {
        let mut frame = frame.borrow_mut();
        for (parameter, argument) in function.parameters.iter().zip(arguments) {
            frame.define(parameter.clone(), argument);
        }
    }

    match exec_statements(&frame, &function.body.body)? {
        Object::Return(value) => Ok(*value),
        _ => Ok(Object::Null),
    }
}
