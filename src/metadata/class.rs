//! Class declarations and their members.
//!
//! In a language without runtime attribute reflection the metadata the engine
//! walks has to be declared explicitly. A [`ClassDef`] is that declaration: the
//! class-level attributes, an optional constructor, and the ordered member
//! tables (properties, methods, constants), each member carrying its own
//! ordered attribute declarations. Definitions are assembled once at startup
//! through [`ClassBuilder`] and then shared immutably as [`ClassRef`]s.

use std::fmt;
use std::rc::Rc;

use strum::Display;

use crate::metadata::{AttributeSpec, InstanceRef, Signature, Value};
use crate::resolver::ResolvedArguments;
use crate::Result;

/// A reference-counted handle to an immutable class definition.
pub type ClassRef = Rc<ClassDef>;
/// A reference-counted handle to a declared property.
pub type PropertyRef = Rc<PropertyDef>;
/// A reference-counted handle to a declared method.
pub type MethodRef = Rc<MethodDef>;
/// A reference-counted handle to a declared constant.
pub type ConstantRef = Rc<ConstantDef>;

/// Body closure of a method or constructor; receives the instance as receiver.
pub type MethodBody = Rc<dyn Fn(InstanceRef, &ResolvedArguments) -> Result<Value>>;

/// Declared visibility of a property.
///
/// Non-public properties reject direct field access; resolution opens a scoped
/// access window per field when it needs to read and write them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Visibility {
    /// Accessible everywhere
    Public,
    /// Accessible to the declaring class and its extensions
    Protected,
    /// Accessible to the declaring class only
    Private,
}

/// A declared property: name, visibility, default value, attached attributes.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    name: String,
    visibility: Visibility,
    default: Value,
    attributes: Vec<AttributeSpec>,
}

impl PropertyDef {
    /// Declare a public property with a default value.
    #[must_use]
    pub fn new(name: impl Into<String>, default: impl Into<Value>) -> PropertyDef {
        PropertyDef {
            name: name.into(),
            visibility: Visibility::Public,
            default: default.into(),
            attributes: Vec::new(),
        }
    }

    /// Set the declared visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> PropertyDef {
        self.visibility = visibility;
        self
    }

    /// Attach an attribute declaration to this property.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> PropertyDef {
        self.attributes.push(spec);
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared default value.
    #[must_use]
    pub fn default(&self) -> &Value {
        &self.default
    }

    /// Attached attribute declarations, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }
}

impl PropertyDef {
    pub(crate) fn declared_visibility(&self) -> Visibility {
        self.visibility
    }
}

/// A declared method: name, signature, attached attributes, body.
#[derive(Clone)]
pub struct MethodDef {
    name: String,
    signature: Rc<Signature>,
    attributes: Vec<AttributeSpec>,
    body: MethodBody,
}

impl MethodDef {
    /// Declare a method with a signature and a body.
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> MethodDef
    where
        F: Fn(InstanceRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        MethodDef {
            name: name.into(),
            signature: Rc::new(signature),
            attributes: Vec::new(),
            body: Rc::new(body),
        }
    }

    /// Attach an attribute declaration to this method.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> MethodDef {
        self.attributes.push(spec);
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Shared handle to the declared signature.
    #[must_use]
    pub fn signature_rc(&self) -> Rc<Signature> {
        self.signature.clone()
    }

    /// Attached attribute declarations, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// The body closure.
    #[must_use]
    pub fn body(&self) -> MethodBody {
        self.body.clone()
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("parameters", &self.signature.parameters().len())
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// A declared class constant: name, value, attached attributes.
#[derive(Debug, Clone)]
pub struct ConstantDef {
    name: String,
    value: Value,
    attributes: Vec<AttributeSpec>,
}

impl ConstantDef {
    /// Declare a constant.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> ConstantDef {
        ConstantDef {
            name: name.into(),
            value: value.into(),
            attributes: Vec::new(),
        }
    }

    /// Attach an attribute declaration to this constant.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> ConstantDef {
        self.attributes.push(spec);
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Attached attribute declarations, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }
}

/// A declared constructor: signature plus an optional body.
///
/// A signature-only constructor still drives argument resolution; the default
/// object builder then leaves fields at their property defaults.
#[derive(Clone)]
pub struct Constructor {
    signature: Rc<Signature>,
    body: Option<MethodBody>,
}

impl Constructor {
    /// Declare a constructor signature with no body.
    #[must_use]
    pub fn new(signature: Signature) -> Constructor {
        Constructor {
            signature: Rc::new(signature),
            body: None,
        }
    }

    /// Declare a constructor with a body run after field defaults are placed.
    pub fn with_body<F>(signature: Signature, body: F) -> Constructor
    where
        F: Fn(InstanceRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        Constructor {
            signature: Rc::new(signature),
            body: Some(Rc::new(body)),
        }
    }

    /// The declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Shared handle to the declared signature.
    #[must_use]
    pub fn signature_rc(&self) -> Rc<Signature> {
        self.signature.clone()
    }

    /// The body closure, if one was declared.
    #[must_use]
    pub fn body(&self) -> Option<MethodBody> {
        self.body.clone()
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.signature.parameters().len())
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

/// An immutable class definition: attributes, constructor, member tables.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    attributes: Vec<AttributeSpec>,
    constructor: Option<Constructor>,
    properties: Vec<PropertyRef>,
    methods: Vec<MethodRef>,
    constants: Vec<ConstantRef>,
}

impl ClassDef {
    /// The declared class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class-level attribute declarations, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    /// The declared constructor, if any.
    #[must_use]
    pub fn constructor(&self) -> Option<&Constructor> {
        self.constructor.as_ref()
    }

    /// Declared properties, in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[PropertyRef] {
        &self.properties
    }

    /// Declared methods, in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MethodRef] {
        &self.methods
    }

    /// Declared constants, in declaration order.
    #[must_use]
    pub fn constants(&self) -> &[ConstantRef] {
        &self.constants
    }

    /// Look up a declared method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<MethodRef> {
        self.methods.iter().find(|m| m.name() == name).cloned()
    }

    /// Look up a declared property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<PropertyRef> {
        self.properties.iter().find(|p| p.name() == name).cloned()
    }

    /// Look up a declared constant by name.
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<ConstantRef> {
        self.constants.iter().find(|c| c.name() == name).cloned()
    }
}

/// Fluent builder assembling a [`ClassDef`] during the registration pass.
///
/// # Examples
///
/// ```rust
/// use attrweave::metadata::{ClassBuilder, ParameterDef, Signature, Value};
///
/// let class = ClassBuilder::new("App::User")
///     .constructor(Signature::new([ParameterDef::new("name")]))
///     .property("name", Value::Null)
///     .constant("VERSION", 1)
///     .build();
///
/// assert_eq!(class.name(), "App::User");
/// ```
#[derive(Debug, Default)]
pub struct ClassBuilder {
    name: String,
    attributes: Vec<AttributeSpec>,
    constructor: Option<Constructor>,
    properties: Vec<PropertyDef>,
    methods: Vec<MethodDef>,
    constants: Vec<ConstantDef>,
}

impl ClassBuilder {
    /// Start a definition for the named class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder {
            name: name.into(),
            ..ClassBuilder::default()
        }
    }

    /// Attach a class-level attribute declaration.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> ClassBuilder {
        self.attributes.push(spec);
        self
    }

    /// Declare the constructor signature, with no body.
    #[must_use]
    pub fn constructor(mut self, signature: Signature) -> ClassBuilder {
        self.constructor = Some(Constructor::new(signature));
        self
    }

    /// Declare the constructor with a body.
    #[must_use]
    pub fn constructor_with<F>(mut self, signature: Signature, body: F) -> ClassBuilder
    where
        F: Fn(InstanceRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        self.constructor = Some(Constructor::with_body(signature, body));
        self
    }

    /// Declare a public property with a default value.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, default: impl Into<Value>) -> ClassBuilder {
        self.properties.push(PropertyDef::new(name, default));
        self
    }

    /// Declare a protected property with a default value.
    #[must_use]
    pub fn protected_property(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
    ) -> ClassBuilder {
        self.properties
            .push(PropertyDef::new(name, default).visibility(Visibility::Protected));
        self
    }

    /// Declare a private property with a default value.
    #[must_use]
    pub fn private_property(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
    ) -> ClassBuilder {
        self.properties
            .push(PropertyDef::new(name, default).visibility(Visibility::Private));
        self
    }

    /// Declare a property from a full definition.
    #[must_use]
    pub fn property_def(mut self, property: PropertyDef) -> ClassBuilder {
        self.properties.push(property);
        self
    }

    /// Declare a method with a signature and a body.
    #[must_use]
    pub fn method<F>(mut self, name: impl Into<String>, signature: Signature, body: F) -> ClassBuilder
    where
        F: Fn(InstanceRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        self.methods.push(MethodDef::new(name, signature, body));
        self
    }

    /// Declare a method from a full definition.
    #[must_use]
    pub fn method_def(mut self, method: MethodDef) -> ClassBuilder {
        self.methods.push(method);
        self
    }

    /// Declare a constant.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<Value>) -> ClassBuilder {
        self.constants.push(ConstantDef::new(name, value));
        self
    }

    /// Declare a constant from a full definition.
    #[must_use]
    pub fn constant_def(mut self, constant: ConstantDef) -> ClassBuilder {
        self.constants.push(constant);
        self
    }

    /// Finalize the definition.
    #[must_use]
    pub fn build(self) -> ClassRef {
        Rc::new(ClassDef {
            name: self.name,
            attributes: self.attributes,
            constructor: self.constructor,
            properties: self.properties.into_iter().map(Rc::new).collect(),
            methods: self.methods.into_iter().map(Rc::new).collect(),
            constants: self.constants.into_iter().map(Rc::new).collect(),
        })
    }
}
