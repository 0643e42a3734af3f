//! Dynamic values and the instance object model.
//!
//! The engine moves opaque user data through handler chains, so it carries a
//! small dynamic [`Value`] type instead of a generic parameter: base steps
//! produce values, attributes transform them, and member resolution writes them
//! back onto instances.
//!
//! An [`Instance`] is the engine's rendition of a constructed object: a
//! reference to its [`ClassDef`] plus an ordered field table. Each field slot
//! tracks a runtime accessibility flag seeded from the property's declared
//! visibility; property resolution opens a scoped access window per field and
//! restores the flag on every exit path (see [`AccessScope`]).

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::metadata::{Callable, ClassRef, Visibility};
use crate::{Error, Result};

/// A reference-counted, interior-mutable handle to an [`Instance`].
///
/// Object identity is the handle identity: two `Value::Object`s are equal iff
/// they point at the same instance.
pub type InstanceRef = Rc<RefCell<Instance>>;

/// A dynamically typed value flowing through handler chains.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absent value
    Null,
    /// Boolean value
    Bool(bool),
    /// Signed 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Ordered list of values
    List(Vec<Value>),
    /// A constructed object instance
    Object(InstanceRef),
    /// A standalone callable with signature metadata
    Callable(Callable),
    /// A method reference: the pair of a receiver and a method name, not yet invoked
    BoundMethod(InstanceRef, String),
}

impl Value {
    /// Returns the contained integer, if this is `Value::Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained string slice, if this is `Value::Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the contained boolean, if this is `Value::Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the contained instance handle, if this is `Value::Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&InstanceRef> {
        match self {
            Value::Object(v) => Some(v),
            _ => None,
        }
    }

    /// True iff this is `Value::Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a, am), Value::BoundMethod(b, bm)) => {
                Rc::ptr_eq(a, b) && am == bm
            }
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<InstanceRef> for Value {
    fn from(v: InstanceRef) -> Self {
        Value::Object(v)
    }
}

impl From<Callable> for Value {
    fn from(v: Callable) -> Self {
        Value::Callable(v)
    }
}

/// One field slot of an instance.
#[derive(Debug, Clone)]
struct Field {
    name: String,
    value: Value,
    /// Runtime access flag; non-public fields start closed
    accessible: bool,
}

/// A constructed object: a class reference plus its ordered field table.
#[derive(Clone)]
pub struct Instance {
    class: ClassRef,
    fields: Vec<Field>,
}

impl Instance {
    /// Instantiate a class with every field set to its declared default.
    ///
    /// Non-public fields start inaccessible; see [`AccessScope`] for the
    /// scoped override used during property resolution.
    #[must_use]
    pub fn instantiate(class: &ClassRef) -> InstanceRef {
        let fields = class
            .properties()
            .iter()
            .map(|property| Field {
                name: property.name().to_string(),
                value: property.default().clone(),
                accessible: property.declared_visibility() == Visibility::Public,
            })
            .collect();

        Rc::new(RefCell::new(Instance {
            class: class.clone(),
            fields,
        }))
    }

    /// The class this instance was built from.
    #[must_use]
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    /// Read a field's current value.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] for an unknown field and
    /// [`Error::Inaccessible`] when the field is currently closed.
    pub fn get(&self, name: &str) -> Result<Value> {
        let field = self.field(name)?;
        if !field.accessible {
            return Err(self.inaccessible(name));
        }
        Ok(field.value.clone())
    }

    /// Replace a field's current value.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] for an unknown field and
    /// [`Error::Inaccessible`] when the field is currently closed.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let class = self.class.clone();
        let field = self.field_mut(name)?;
        if !field.accessible {
            return Err(Error::Inaccessible {
                class: class.name().to_string(),
                property: name.to_string(),
            });
        }
        field.value = value;
        Ok(())
    }

    /// Whether the named field currently accepts direct access.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] for an unknown field.
    pub fn is_accessible(&self, name: &str) -> Result<bool> {
        Ok(self.field(name)?.accessible)
    }

    fn field(&self, name: &str) -> Result<&Field> {
        self.fields.iter().find(|f| f.name == name).ok_or_else(|| {
            Error::Reflection(format!(
                "Class '{}' has no property '{name}'",
                self.class.name()
            ))
        })
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Field> {
        let class = self.class.name().to_string();
        self.fields
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::Reflection(format!("Class '{class}' has no property '{name}'")))
    }

    fn inaccessible(&self, name: &str) -> Error {
        Error::Inaccessible {
            class: self.class.name().to_string(),
            property: name.to_string(),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Instance");
        s.field("class", &self.class.name());
        for field in &self.fields {
            s.field(&field.name, &field.value);
        }
        s.finish()
    }
}

/// Scoped access window onto one field of one instance.
///
/// Opening the scope flips the field's runtime access flag; dropping the scope
/// restores the prior flag, on every exit path. Scopes nest: the innermost
/// drop restores what the innermost open observed.
pub struct AccessScope {
    instance: InstanceRef,
    name: String,
    prior: bool,
}

impl AccessScope {
    /// Open access to `name` on `instance` until the returned scope is dropped.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] for an unknown field.
    pub fn open(instance: &InstanceRef, name: &str) -> Result<AccessScope> {
        let prior = {
            let mut inner = instance.borrow_mut();
            let field = inner.field_mut(name)?;
            let prior = field.accessible;
            field.accessible = true;
            prior
        };

        Ok(AccessScope {
            instance: instance.clone(),
            name: name.to_string(),
            prior,
        })
    }
}

impl Drop for AccessScope {
    fn drop(&mut self) {
        let mut inner = self.instance.borrow_mut();
        if let Ok(field) = inner.field_mut(&self.name) {
            field.accessible = self.prior;
        }
    }
}
