//! The explicit metadata model the resolver walks.
//!
//! Attribute resolution needs to know, for every reflected element, which
//! attributes are declared on it and in which order, and for callable-like
//! elements the ordered parameter list. Languages with native declarative
//! attributes obtain this through runtime reflection; here the same
//! information is declared explicitly during a startup-time registration pass
//! and then shared immutably:
//!
//! - [`ClassBuilder`] assembles a [`ClassDef`] with its properties, methods,
//!   constants, constructor, and attribute declarations.
//! - [`ClassRegistry`] maps class names to definitions for the resolver.
//! - [`Callable`] describes a standalone function with a [`Signature`] and
//!   attribute declarations.
//! - [`AttributeSpec`] is one declared attribute: kind, constructor
//!   arguments, and the factory for the implementing [`AttributeType`].
//! - [`Value`] and [`Instance`] carry the dynamic data handler chains
//!   produce and consume.

mod attribute;
mod callable;
mod class;
mod element;
mod registry;
mod targets;
mod value;

pub use attribute::{AttributeFactory, AttributeInstance, AttributeSpec, AttributeType, StepResult};
pub use callable::{Callable, CallableBody, ParameterDef, ParameterRef, Signature};
pub use class::{
    ClassBuilder, ClassDef, ClassRef, ConstantDef, ConstantRef, Constructor, MethodBody,
    MethodDef, MethodRef, PropertyDef, PropertyRef, Visibility,
};
pub use element::ReflectedElement;
pub use registry::{ClassRegistry, ClassRegistryRef};
pub use targets::{AttributeTargets, ElementKind};
pub use value::{AccessScope, Instance, InstanceRef, Value};

// Re-exported here as well since callers assembling metadata constantly need it.
pub use crate::resolver::{Arguments, ResolvedArguments};
