use std::rc::Rc;

use super::{
    error::RuntimeError,
    object::{BuiltinObject, Object},
};

/// Name → builtin table used to seed the global scope.
///
/// Registration order is kept, so globals and help output are stable.
#[derive(Debug, Default)]
pub struct BuiltinRegistry {
    builtins: Vec<Rc<BuiltinObject>>,
}

impl BuiltinRegistry {
    pub fn new() -> Self {
        BuiltinRegistry::default()
    }

    /// Adds a builtin, replacing any earlier one with the same name.
    pub fn register<F>(&mut self, name: &str, description: &str, callable: F)
    where
        F: Fn(&[Object]) -> Result<Object, RuntimeError> + 'static,
    {
        let builtin = Rc::new(BuiltinObject {
            name: name.to_string(),
            description: description.to_string(),
            callable: Box::new(callable),
        });

        match self.builtins.iter_mut().find(|b| b.name == name) {
            Some(existing) => *existing = builtin,
            None => self.builtins.push(builtin),
        }
    }

    pub fn get(&self, name: &str) -> Option<Rc<BuiltinObject>> {
        self.builtins.iter().find(|b| b.name == name).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rc<BuiltinObject>> {
        self.builtins.iter()
    }

    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// `(name, description)` pairs in registration order.
    pub fn descriptions(&self) -> Vec<(&str, &str)> {
        self.builtins
            .iter()
            .map(|b| (b.name.as_str(), b.description.as_str()))
            .collect()
    }
}
