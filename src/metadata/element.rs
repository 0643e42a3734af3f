//! Reflected elements: the polymorphic attachment points of a handler chain.

use crate::metadata::{
    AttributeSpec, Callable, ClassRef, ConstantRef, ElementKind, MethodRef, ParameterRef,
    PropertyRef, Signature,
};
use crate::{Error, Result};

/// An introspectable description of the element a handler chain is attached to.
///
/// Every handler carries the element its step was built from, so attribute
/// code can inspect its own attachment point (declared attributes, parameter
/// list) or recurse through the resolver with full context.
#[derive(Debug, Clone)]
pub enum ReflectedElement {
    /// A class declaration
    Class(ClassRef),
    /// A class constructor (the owning class is the handle)
    Constructor(ClassRef),
    /// A method
    Method(MethodRef),
    /// A property
    Property(PropertyRef),
    /// A parameter
    Parameter(ParameterRef),
    /// A class constant
    Constant(ConstantRef),
    /// A standalone callable
    Function(Callable),
}

impl ReflectedElement {
    /// The category of this element.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            ReflectedElement::Class(_) => ElementKind::Class,
            ReflectedElement::Constructor(_) => ElementKind::Constructor,
            ReflectedElement::Method(_) => ElementKind::Method,
            ReflectedElement::Property(_) => ElementKind::Property,
            ReflectedElement::Parameter(_) => ElementKind::Parameter,
            ReflectedElement::Constant(_) => ElementKind::Constant,
            ReflectedElement::Function(_) => ElementKind::Function,
        }
    }

    /// A display name for diagnostics.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            ReflectedElement::Class(class) | ReflectedElement::Constructor(class) => {
                class.name().to_string()
            }
            ReflectedElement::Method(method) => method.name().to_string(),
            ReflectedElement::Property(property) => property.name().to_string(),
            ReflectedElement::Parameter(parameter) => parameter.name().to_string(),
            ReflectedElement::Constant(constant) => constant.name().to_string(),
            ReflectedElement::Function(callable) => callable.name().to_string(),
        }
    }

    /// The attribute declarations attached to this element, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        match self {
            ReflectedElement::Class(class) | ReflectedElement::Constructor(class) => {
                class.attributes()
            }
            ReflectedElement::Method(method) => method.attributes(),
            ReflectedElement::Property(property) => property.attributes(),
            ReflectedElement::Parameter(parameter) => parameter.attributes(),
            ReflectedElement::Constant(constant) => constant.attributes(),
            ReflectedElement::Function(callable) => callable.attributes(),
        }
    }

    /// The declared signature, for callable-like elements.
    ///
    /// A constructor-less class yields the empty signature.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] for elements that have no parameter list
    /// (classes, properties, parameters, constants).
    pub fn signature(&self) -> Result<Signature> {
        match self {
            ReflectedElement::Constructor(class) => Ok(class
                .constructor()
                .map(|c| c.signature().clone())
                .unwrap_or_default()),
            ReflectedElement::Method(method) => Ok(method.signature().clone()),
            ReflectedElement::Function(callable) => Ok(callable.signature().clone()),
            other => Err(Error::Reflection(format!(
                "{} '{}' has no parameter list",
                other.kind(),
                other.name()
            ))),
        }
    }
}
