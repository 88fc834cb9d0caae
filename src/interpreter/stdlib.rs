//! Standard library builtins.
//!
//! Every builtin takes the evaluated argument list. Wrong argument counts
//! raise `ERROR`, wrong argument types raise `TYPE_ERROR`.

use std::{cell::RefCell, io::Write, rc::Rc};

use crate::runtime::{
    builtins::BuiltinRegistry,
    error::RuntimeError,
    object::{ArrayObject, Object},
};

/// The builtins every interpreter starts with, printing to stdout.
pub fn default_builtins() -> BuiltinRegistry {
    builtins_with_output(Rc::new(RefCell::new(std::io::stdout())))
}

/// The default builtins with `puts` writing to `output`.
pub fn builtins_with_output(output: Rc<RefCell<dyn Write>>) -> BuiltinRegistry {
    let mut builtins = BuiltinRegistry::new();

    builtins.register("len", "len(x): length of a string, array or hash", |args| {
        let [value] = arity::<1>("len", args)?;
        let len = match value {
            Object::String(s) => s.chars().count(),
            Object::Array(array) => array.len(),
            Object::Hash(hash) => hash.len(),
            other => return Err(argument_type("len", "STRING, ARRAY or HASH", other)),
        };
        Ok(Object::Integer(len as i64))
    });

    builtins.register("puts", "puts(..values): print values separated by spaces", move |args| {
        let line = args.iter().map(Object::inspect).collect::<Vec<_>>().join(" ");
        writeln!(output.borrow_mut(), "{}", line)
            .map_err(|error| RuntimeError::custom(format!("puts failed: {}", error)))?;
        Ok(Object::Null)
    });

    builtins.register("push", "push(array, value): append value, returning the array", |args| {
        let [target, value] = arity::<2>("push", args)?;
        let array = expect_array("push", target)?;
        array.append(value.clone());
        Ok(Object::Array(array))
    });

    builtins.register(
        "insert",
        "insert(array, index, value): insert value before index, returning the array",
        |args| {
            let [target, index, value] = arity::<3>("insert", args)?;
            let array = expect_array("insert", target)?;
            array.insert(expect_integer("insert", index)?, value.clone())?;
            Ok(Object::Array(array))
        },
    );

    builtins.register(
        "remove",
        "remove(array, value) / remove(hash, key): remove a value or a key",
        |args| {
            let [target, item] = arity::<2>("remove", args)?;
            match target {
                Object::Array(array) => Ok(Object::Boolean(array.remove(item))),
                Object::Hash(hash) => hash.remove(&expect_string("remove", item)?),
                other => Err(argument_type("remove", "ARRAY or HASH", other)),
            }
        },
    );

    builtins.register("remove_at", "remove_at(array, index): remove and return an element", |args| {
        let [target, index] = arity::<2>("remove_at", args)?;
        let array = expect_array("remove_at", target)?;
        array.remove_at(expect_integer("remove_at", index)?)
    });

    builtins.register("clear", "clear(collection): empty an array or hash", |args| {
        let [target] = arity::<1>("clear", args)?;
        match target {
            Object::Array(array) => array.clear(),
            Object::Hash(hash) => hash.clear(),
            other => return Err(argument_type("clear", "ARRAY or HASH", other)),
        }
        Ok(Object::Null)
    });

    builtins.register("keys", "keys(hash): sorted array of keys", |args| {
        let [target] = arity::<1>("keys", args)?;
        match target {
            Object::Hash(hash) => Ok(Object::Array(ArrayObject::new(
                hash.keys().into_iter().map(Object::String).collect(),
            ))),
            other => Err(argument_type("keys", "HASH", other)),
        }
    });

    builtins.register("has_key", "has_key(hash, key): whether key is present", |args| {
        let [target, key] = arity::<2>("has_key", args)?;
        match target {
            Object::Hash(hash) => Ok(Object::Boolean(hash.has_key(&expect_string("has_key", key)?))),
            other => Err(argument_type("has_key", "HASH", other)),
        }
    });

    builtins.register("delete", "delete(hash, key): remove key if present, reporting whether it was", |args| {
        let [target, key] = arity::<2>("delete", args)?;
        match target {
            Object::Hash(hash) => Ok(Object::Boolean(
                hash.remove(&expect_string("delete", key)?).is_ok(),
            )),
            other => Err(argument_type("delete", "HASH", other)),
        }
    });

    builtins.register("type", "type(x): type tag of a value", |args| {
        let [value] = arity::<1>("type", args)?;
        Ok(Object::String(value.object_type().to_string()))
    });

    builtins.register("str", "str(x): string form of a value", |args| {
        let [value] = arity::<1>("str", args)?;
        Ok(Object::String(value.inspect()))
    });

    builtins
}

fn arity<'a, const N: usize>(name: &str, args: &'a [Object]) -> Result<&'a [Object; N], RuntimeError> {
    args.try_into().map_err(|_| {
        RuntimeError::custom(format!(
            "{}() takes {} argument(s), got {}",
            name,
            N,
            args.len()
        ))
    })
}

fn argument_type(name: &str, expected: &str, actual: &Object) -> RuntimeError {
    RuntimeError::type_error(format!(
        "{}() expects {}, got {}",
        name,
        expected,
        actual.object_type()
    ))
}

fn expect_array(name: &str, value: &Object) -> Result<ArrayObject, RuntimeError> {
    match value {
        Object::Array(array) => Ok(array.clone()),
        other => Err(argument_type(name, "ARRAY", other)),
    }
}

fn expect_integer(name: &str, value: &Object) -> Result<i64, RuntimeError> {
    match value {
        Object::Integer(value) => Ok(*value),
        other => Err(argument_type(name, "INTEGER", other)),
    }
}

fn expect_string(name: &str, value: &Object) -> Result<String, RuntimeError> {
    match value {
        Object::String(value) => Ok(value.clone()),
        other => Err(argument_type(name, "STRING", other)),
    }
}
