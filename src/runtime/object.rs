use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fmt::{Debug, Display},
    rc::Rc,
};

use crate::ast::BlockStmt;

use super::{
    environment::{Env, ScopeFactory},
    error::RuntimeError,
};

/// A stable tag naming the kind of an [`Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Class,
    Instance,
    Return,
    Break,
    Continue,
    Error,
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::String => "STRING",
            ObjectType::Null => "NULL",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Class => "CLASS",
            ObjectType::Instance => "INSTANCE",
            ObjectType::Return => "RETURN",
            ObjectType::Break => "BREAK",
            ObjectType::Continue => "CONTINUE",
            ObjectType::Error => "ERROR",
        };
        write!(f, "{}", tag)
    }
}

/// Every runtime value.
///
/// `Return`, `Break`, `Continue` and `Error` are signals: they unwind
/// statement sequences and are never valid operands.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Array(ArrayObject),
    Hash(HashObject),
    Function(Rc<FunctionObject>),
    Builtin(Rc<BuiltinObject>),
    Class(Rc<ClassObject>),
    Instance(Rc<InstanceObject>),
    Return(Box<Object>),
    Break,
    Continue,
    Error(RuntimeError),
}

impl Object {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::String(_) => ObjectType::String,
            Object::Null => ObjectType::Null,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Class(_) => ObjectType::Class,
            Object::Instance(_) => ObjectType::Instance,
            Object::Return(_) => ObjectType::Return,
            Object::Break => ObjectType::Break,
            Object::Continue => ObjectType::Continue,
            Object::Error(_) => ObjectType::Error,
        }
    }

    /// Human readable form. Top-level strings are shown raw; strings nested
    /// in arrays and hashes are quoted.
    ///
    /// An array or hash reached again while it is being rendered prints as
    /// `[...]` or `{...}`.
    pub fn inspect(&self) -> String {
        self.render(&mut Vec::new())
    }

    fn render(&self, open: &mut Vec<*const ()>) -> String {
        match self {
            Object::Integer(value) => value.to_string(),
            Object::Boolean(value) => value.to_string(),
            Object::String(value) => value.clone(),
            Object::Null => "null".into(),
            Object::Array(array) => {
                let id = array.id();
                if open.contains(&id) {
                    return "[...]".into();
                }
                open.push(id);
                let elements = array
                    .elements()
                    .iter()
                    .map(|element| element.render_nested(open))
                    .collect::<Vec<_>>();
                open.pop();
                format!("[{}]", elements.join(", "))
            }
            Object::Hash(hash) => {
                let id = hash.id();
                if open.contains(&id) {
                    return "{...}".into();
                }
                open.push(id);
                let pairs = hash
                    .entries()
                    .iter()
                    .map(|(key, value)| format!("{:?}: {}", key, value.render_nested(open)))
                    .collect::<Vec<_>>();
                open.pop();
                format!("{{{}}}", pairs.join(", "))
            }
            Object::Function(function) => match &function.name {
                Some(name) => format!("fn {}({})", name, function.parameters.join(", ")),
                None => format!("fn({})", function.parameters.join(", ")),
            },
            Object::Builtin(builtin) => format!("builtin {}", builtin.name),
            Object::Class(class) => format!("class {}", class.name),
            Object::Instance(instance) => format!("{} instance", instance.class.name),
            Object::Return(value) => value.render(open),
            Object::Break => "break".into(),
            Object::Continue => "continue".into(),
            Object::Error(error) => error.to_string(),
        }
    }

    fn render_nested(&self, open: &mut Vec<*const ()>) -> String {
        match self {
            Object::String(value) => format!("{:?}", value),
            other => other.render(open),
        }
    }

    /// Structural equality. A pair of aggregates met again while it is
    /// still being compared counts as equal.
    fn equals(&self, other: &Self, open: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Object::Integer(a), Object::Integer(b)) => a == b,
            (Object::Boolean(a), Object::Boolean(b)) => a == b,
            (Object::String(a), Object::String(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Array(a), Object::Array(b)) => a.equals(b, open),
            (Object::Hash(a), Object::Hash(b)) => a.equals(b, open),
            (Object::Function(a), Object::Function(b)) => Rc::ptr_eq(a, b),
            (Object::Builtin(a), Object::Builtin(b)) => Rc::ptr_eq(a, b),
            (Object::Class(a), Object::Class(b)) => Rc::ptr_eq(a, b),
            (Object::Instance(a), Object::Instance(b)) => Rc::ptr_eq(a, b),
            (Object::Return(a), Object::Return(b)) => a.equals(b, open),
            (Object::Break, Object::Break) => true,
            (Object::Continue, Object::Continue) => true,
            (Object::Error(a), Object::Error(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Integer(value) => *value != 0,
            Object::Boolean(value) => *value,
            Object::String(value) => !value.is_empty(),
            Object::Array(array) => !array.is_empty(),
            Object::Hash(hash) => !hash.is_empty(),
            Object::Null => false,
            _ => true,
        }
    }

    /// Whether this object must stop the enclosing statement sequence.
    pub fn is_signal(&self) -> bool {
        matches!(
            self,
            Object::Return(_) | Object::Break | Object::Continue | Object::Error(_)
        )
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inspect())
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl From<RuntimeError> for Object {
    fn from(error: RuntimeError) -> Self {
        Object::Error(error)
    }
}

/// A shared, mutable list. Clones alias the same storage.
#[derive(Clone, Default)]
pub struct ArrayObject(Rc<RefCell<Vec<Object>>>);

impl ArrayObject {
    pub fn new(elements: Vec<Object>) -> Self {
        ArrayObject(Rc::new(RefCell::new(elements)))
    }

    fn id(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    fn equals(&self, other: &Self, open: &mut Vec<(*const (), *const ())>) -> bool {
        let pair = (self.id(), other.id());
        if pair.0 == pair.1 || open.contains(&pair) {
            return true;
        }

        let (left, right) = (self.elements(), other.elements());
        if left.len() != right.len() {
            return false;
        }
        open.push(pair);
        let equal = left.iter().zip(&right).all(|(a, b)| a.equals(b, open));
        open.pop();
        equal
    }

    /// A snapshot of the current elements.
    pub fn elements(&self) -> Vec<Object> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Checks `index` against `0..limit`.
    fn checked_index(&self, index: i64, limit: usize) -> Result<usize, RuntimeError> {
        usize::try_from(index)
            .ok()
            .filter(|i| *i < limit)
            .ok_or_else(|| RuntimeError::index_out_of_range(index, self.len()))
    }

    pub fn get(&self, index: i64) -> Result<Object, RuntimeError> {
        let i = self.checked_index(index, self.len())?;
        Ok(self.0.borrow()[i].clone())
    }

    pub fn set(&self, index: i64, value: Object) -> Result<(), RuntimeError> {
        let i = self.checked_index(index, self.len())?;
        self.0.borrow_mut()[i] = value;
        Ok(())
    }

    pub fn append(&self, value: Object) {
        self.0.borrow_mut().push(value);
    }

    /// Inserts before `index`; `index == len` appends.
    pub fn insert(&self, index: i64, value: Object) -> Result<(), RuntimeError> {
        let i = self.checked_index(index, self.len() + 1)?;
        self.0.borrow_mut().insert(i, value);
        Ok(())
    }

    /// Removes the first element equal to `value`, reporting whether one was found.
    pub fn remove(&self, value: &Object) -> bool {
        let position = self.0.borrow().iter().position(|element| element == value);
        match position {
            Some(i) => {
                self.0.borrow_mut().remove(i);
                true
            }
            None => false,
        }
    }

    pub fn remove_at(&self, index: i64) -> Result<Object, RuntimeError> {
        let i = self.checked_index(index, self.len())?;
        Ok(self.0.borrow_mut().remove(i))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl PartialEq for ArrayObject {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl Debug for ArrayObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ArrayObject({})", Object::Array(self.clone()).inspect())
    }
}

/// A shared, mutable string-keyed map, iterated in key order.
#[derive(Clone, Default)]
pub struct HashObject(Rc<RefCell<BTreeMap<String, Object>>>);

impl HashObject {
    pub fn new(entries: BTreeMap<String, Object>) -> Self {
        HashObject(Rc::new(RefCell::new(entries)))
    }

    fn id(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }

    fn equals(&self, other: &Self, open: &mut Vec<(*const (), *const ())>) -> bool {
        let pair = (self.id(), other.id());
        if pair.0 == pair.1 || open.contains(&pair) {
            return true;
        }

        let (left, right) = (self.entries(), other.entries());
        if left.len() != right.len() {
            return false;
        }
        open.push(pair);
        let equal = left
            .iter()
            .zip(&right)
            .all(|((ka, va), (kb, vb))| ka == kb && va.equals(vb, open));
        open.pop();
        equal
    }

    pub fn entries(&self) -> Vec<(String, Object)> {
        self.0
            .borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Absent keys read as `Null`.
    pub fn get(&self, key: &str) -> Object {
        self.0.borrow().get(key).cloned().unwrap_or(Object::Null)
    }

    pub fn set(&self, key: impl Into<String>, value: Object) {
        self.0.borrow_mut().insert(key.into(), value);
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.0.borrow().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Result<Object, RuntimeError> {
        self.0
            .borrow_mut()
            .remove(key)
            .ok_or_else(|| RuntimeError::key_not_found(key))
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl PartialEq for HashObject {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

impl Debug for HashObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HashObject({})", Object::Hash(self.clone()).inspect())
    }
}

/// A user function closed over the environment it was defined in.
pub struct FunctionObject {
    pub name: Option<String>,
    pub parameters: Vec<String>,
    pub body: Rc<BlockStmt>,
    pub env: Env,
}

impl FunctionObject {
    /// Binds this method to `instance`.
    ///
    /// The returned function closes over a frame defining `this` and `super`.
    /// `super` is the parent of `owner`, or `null` when `owner` has none.
    pub fn bind(&self, instance: Rc<InstanceObject>, owner: &ClassObject) -> FunctionObject {
        let frame = ScopeFactory::function_scope(&self.env);
        {
            let mut frame = frame.borrow_mut();
            frame.define("this", Object::Instance(instance));
            let parent = match &owner.parent {
                Some(parent) => Object::Class(parent.clone()),
                None => Object::Null,
            };
            frame.define("super", parent);
        }

        FunctionObject {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            body: self.body.clone(),
            env: frame,
        }
    }
}

impl Debug for FunctionObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionObject")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

pub type BuiltinFn = dyn Fn(&[Object]) -> Result<Object, RuntimeError>;

/// A native function exposed to programs.
pub struct BuiltinObject {
    pub name: String,
    pub description: String,
    pub callable: Box<BuiltinFn>,
}

impl BuiltinObject {
    pub fn call(&self, arguments: &[Object]) -> Result<Object, RuntimeError> {
        (self.callable)(arguments)
    }
}

impl Debug for BuiltinObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinObject")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct ClassObject {
    pub name: String,
    pub parent: Option<Rc<ClassObject>>,
    pub methods: HashMap<String, Rc<FunctionObject>>,
}

impl ClassObject {
    /// Finds `name` on this class or the nearest ancestor defining it.
    ///
    /// Returns the method together with the class that owns it.
    pub fn find_method(self: &Rc<Self>, name: &str) -> Option<(Rc<FunctionObject>, Rc<ClassObject>)> {
        let mut class = Some(self.clone());
        while let Some(current) = class {
            if let Some(method) = current.methods.get(name) {
                return Some((method.clone(), current));
            }
            class = current.parent.clone();
        }
        None
    }
}

pub struct InstanceObject {
    pub class: Rc<ClassObject>,
    pub fields: Env,
}

impl InstanceObject {
    pub fn new(class: Rc<ClassObject>) -> Self {
        InstanceObject {
            class,
            fields: ScopeFactory::instance_scope(),
        }
    }
}

impl Debug for InstanceObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceObject")
            .field("class", &self.class.name)
            .finish_non_exhaustive()
    }
}
