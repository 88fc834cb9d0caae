use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::{builtins::BuiltinRegistry, error::RuntimeError, object::Object};

pub type Env = Rc<RefCell<Environment>>;

/// One frame of the lexical scope chain.
///
/// Frames share their parent, so closures created in a frame keep seeing
/// later assignments made through it.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Object>,
    parent: Option<Env>,
    transparent: bool,
}

impl Environment {
    pub fn new(parent: Option<Env>, transparent: bool) -> Self {
        Environment {
            values: HashMap::new(),
            parent,
            transparent,
        }
    }

    /// Looks `name` up from this frame outwards.
    pub fn get(&self, name: &str) -> Result<Object, RuntimeError> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(parent) = &self.parent {
            parent.borrow().get(name)
        } else {
            Err(RuntimeError::identifier_not_found(name))
        }
    }

    /// Looks only in this frame.
    pub fn get_local(&self, name: &str) -> Option<Object> {
        self.values.get(name).cloned()
    }

    /// Binds `name` in this frame, shadowing outer bindings.
    pub fn define(&mut self, name: impl Into<String>, value: Object) {
        self.values.insert(name.into(), value);
    }

    /// Rebinds `name` in the nearest frame that declares it.
    pub fn assign(&mut self, name: &str, value: Object) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(parent) = &self.parent {
            parent.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::identifier_not_found(name))
        }
    }

    /// True for block and loop frames, false for global and function frames.
    pub fn is_transparent_block(&self) -> bool {
        self.transparent
    }

    pub fn parent(&self) -> Option<Env> {
        self.parent.clone()
    }

    /// Names bound in this frame, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.values.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Creates the frames the interpreter works with.
pub struct ScopeFactory;

impl ScopeFactory {
    /// The root frame, seeded with every builtin in `builtins`.
    pub fn global(builtins: &BuiltinRegistry) -> Env {
        let mut env = Environment::new(None, false);
        for builtin in builtins.iter() {
            env.define(builtin.name.clone(), Object::Builtin(builtin.clone()));
        }
        Rc::new(RefCell::new(env))
    }

    /// The frame a call runs in; `defining` is the environment the function closed over.
    pub fn function_scope(defining: &Env) -> Env {
        Rc::new(RefCell::new(Environment::new(Some(defining.clone()), false)))
    }

    pub fn block_scope(enclosing: &Env) -> Env {
        Rc::new(RefCell::new(Environment::new(Some(enclosing.clone()), true)))
    }

    /// The frame holding a loop's init bindings, shared by every iteration.
    pub fn loop_scope(enclosing: &Env) -> Env {
        Rc::new(RefCell::new(Environment::new(Some(enclosing.clone()), true)))
    }

    /// A parentless frame holding an instance's fields.
    pub fn instance_scope() -> Env {
        Rc::new(RefCell::new(Environment::new(None, false)))
    }
}
