#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

//! # attrweave
//!
//! A metadata-driven attribute resolution engine. Declare metadata
//! annotations ("attributes") on reflected program elements — classes,
//! constructors, methods, properties, constants, functions, parameters — and
//! let the resolver discover the applicable ones, instantiate their handler
//! objects, and compose them into a nested wrapping chain around a base
//! production step: a constructor call, a property read, a raw argument
//! value, a method reference.
//!
//! ## Features
//!
//! - **Per-target filtering** - every attribute kind registers a target mask;
//!   only attributes whose mask intersects the current context are applied
//! - **Declaration-order composition** - attribute *i* wraps the handler
//!   produced by attribute *i-1*; the attribute declared last is the
//!   outermost wrapper and runs first
//! - **Two resolution modes** - value-producing chains (construction,
//!   decoration, invocation, argument resolution) and side-effect-only
//!   application (methods, constants)
//! - **Recursion-ready handlers** - each handler carries its reflected source
//!   element and a back-reference to the resolver, so attribute code can
//!   introspect its attachment point or resolve nested values
//!
//! ## Quick Start
//!
//! ```rust
//! use attrweave::prelude::*;
//!
//! // An attribute that doubles whatever the wrapped step produces.
//! struct Doubled;
//!
//! impl AttributeInstance for Doubled {
//!     fn apply(&self, handler: AttributeHandler) -> Result<StepResult> {
//!         Ok(StepResult::step(move |args| {
//!             match handler.invoke(args)? {
//!                 Value::Int(n) => Ok(Value::Int(n * 2)),
//!                 other => Ok(other),
//!             }
//!         }))
//!     }
//! }
//!
//! impl AttributeType for Doubled {
//!     const KIND: &'static str = "Doubled";
//!     fn from_args(_: &[Value]) -> Result<Self> {
//!         Ok(Doubled)
//!     }
//! }
//!
//! let resolver = AttributesResolver::new();
//! resolver.register_attribute("Doubled", AttributeTargets::PARAMETER);
//!
//! let callable = Callable::new(
//!     "answer",
//!     Signature::new([ParameterDef::new("n")
//!         .default_value(21)
//!         .attribute(AttributeSpec::of::<Doubled>(vec![]))]),
//!     |_, args| Ok(args.value_at(0).cloned().unwrap_or(Value::Null)),
//! );
//!
//! let result = resolver.call(&callable, Arguments::none(), None)?;
//! assert_eq!(result, Value::Int(42));
//! # Ok::<(), attrweave::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Two components, tightly coupled:
//!
//! - [`AttributesResolver`] owns the registry mapping normalized attribute
//!   kinds to accumulated target masks and exposes every resolution entry
//!   point.
//! - [`AttributeHandler`] is the composition primitive: the current step,
//!   its reflected source element, and the owning resolver.
//!
//! The [`metadata`] module holds the explicit metadata model the resolver
//! walks: class definitions with their member tables, callable signatures,
//! attribute declarations, and the dynamic value type. Languages with native
//! attribute reflection discover this at runtime; here it is declared once
//! during a startup registration pass.
//!
//! The whole engine is synchronous and single-threaded: a resolver is a
//! cheap-clone `Rc` handle and is not `Send`. Concurrent use requires one
//! resolver per thread or external synchronization.

pub(crate) mod error;
pub mod metadata;
pub mod prelude;
pub mod resolver;

pub use error::{Error, Result};
pub use resolver::{
    Arguments, AttributeHandler, AttributesResolver, BuilderFn, ResolvedArguments,
    ResolverOptions, Step,
};
