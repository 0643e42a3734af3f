//! # attrweave Prelude
//!
//! Convenient access to the types nearly every consumer of the engine needs:
//! the resolver and handler, the attribute contract, and the metadata
//! declaration surface.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all attrweave operations
pub use crate::Error;

/// The result type used throughout attrweave
pub use crate::Result;

// ================================================================================================
// Resolver and Handler
// ================================================================================================

/// Owner of the attribute registry and entry point for all resolution operations
pub use crate::AttributesResolver;

/// The current step of a resolution chain
pub use crate::AttributeHandler;

/// Seed options for a resolver
pub use crate::ResolverOptions;

/// Argument containers for invocation entry points
pub use crate::{Arguments, ResolvedArguments};

/// The step callable type handlers wrap
pub use crate::Step;

// ================================================================================================
// Attribute Contract
// ================================================================================================

/// The invocation capability, declaration descriptor, and application result
pub use crate::metadata::{AttributeInstance, AttributeSpec, AttributeType, StepResult};

/// Target masks and element categories
pub use crate::metadata::{AttributeTargets, ElementKind};

// ================================================================================================
// Metadata Declaration Surface
// ================================================================================================

/// Class definitions and their builders
pub use crate::metadata::{ClassBuilder, ClassDef, ClassRef, ClassRegistry};

/// Member declarations
pub use crate::metadata::{ConstantDef, MethodDef, PropertyDef, Visibility};

/// Callable signatures and parameters
pub use crate::metadata::{Callable, ParameterDef, Signature};

/// Reflected elements attached to handlers
pub use crate::metadata::ReflectedElement;

/// Dynamic values and instances
pub use crate::metadata::{Instance, InstanceRef, Value};
