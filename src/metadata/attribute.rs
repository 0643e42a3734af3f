//! Attribute declarations and the attribute invocation contract.
//!
//! An attribute is declared on a reflected element as an [`AttributeSpec`]: a
//! kind string, the constructor arguments the declaration carries, and a
//! factory capturing how to instantiate the user's attribute type. The
//! engine treats the instantiated attribute as opaque except for one
//! capability: it can be applied to an [`AttributeHandler`] and returns the
//! replacement step ([`AttributeInstance::apply`]).

use std::fmt;
use std::rc::Rc;

use crate::metadata::Value;
use crate::resolver::{AttributeHandler, Step};
use crate::{Error, Result};

/// Factory producing an attribute instance from its declared constructor arguments.
pub type AttributeFactory = Rc<dyn Fn(&[Value]) -> Result<Box<dyn AttributeInstance>>>;

/// The invocation capability every attribute type must provide.
///
/// Implementations receive the current handler of the chain and decide whether
/// to wrap it, replace it, or collapse it to a terminal value. The handler
/// exposes its [`source`](AttributeHandler::source) element and owning
/// [`resolver`](AttributeHandler::resolver) so attribute code can introspect
/// its attachment point or recurse into nested resolution.
pub trait AttributeInstance {
    /// Apply this attribute to the current handler, producing the next step.
    ///
    /// # Errors
    /// Any error aborts the whole resolution chain at this point; no partial
    /// chain or terminal value is produced.
    fn apply(&self, handler: AttributeHandler) -> Result<StepResult>;
}

/// An attribute type constructible from declared arguments.
///
/// Implementing this trait is what makes a type usable with
/// [`AttributeSpec::of`]; the invocation capability is checked statically
/// through the [`AttributeInstance`] supertrait rather than probed at each
/// application.
pub trait AttributeType: AttributeInstance + Sized + 'static {
    /// The kind string this type is declared and registered under.
    const KIND: &'static str;

    /// Construct an instance from the declaration's constructor arguments.
    ///
    /// # Errors
    /// Returns [`Error::Attribute`] (or any other error) when the arguments
    /// do not match what the type expects.
    fn from_args(args: &[Value]) -> Result<Self>;
}

/// What an applied attribute may hand back to the engine.
pub enum StepResult {
    /// A handler; composition continues around its step
    Handler(AttributeHandler),
    /// A bare step
    Step(Step),
    /// A terminal value; lowered to a constant step
    Value(Value),
}

impl StepResult {
    /// Wrap a closure as a bare-step result.
    pub fn step<F>(f: F) -> StepResult
    where
        F: Fn(&crate::resolver::ResolvedArguments) -> Result<Value> + 'static,
    {
        StepResult::Step(Rc::new(f))
    }

    /// Lower this result to a plain step.
    #[must_use]
    pub fn into_step(self) -> Step {
        match self {
            StepResult::Handler(handler) => handler.get(),
            StepResult::Step(step) => step,
            StepResult::Value(value) => Rc::new(move |_args| Ok(value.clone())),
        }
    }
}

/// A declared attribute: kind, constructor arguments, and (when known
/// statically) the factory for the implementing type.
///
/// Declarations live in the metadata tables in declaration order; the order is
/// what drives composition order during resolution.
#[derive(Clone)]
pub struct AttributeSpec {
    kind: String,
    args: Vec<Value>,
    factory: Option<AttributeFactory>,
}

impl AttributeSpec {
    /// Declare an attribute of a known type, capturing its factory.
    #[must_use]
    pub fn of<T: AttributeType>(args: Vec<Value>) -> AttributeSpec {
        AttributeSpec {
            kind: T::KIND.to_string(),
            args,
            factory: Some(Rc::new(|args| {
                Ok(Box::new(T::from_args(args)?) as Box<dyn AttributeInstance>)
            })),
        }
    }

    /// Declare an attribute by kind name only, with no factory.
    ///
    /// Useful for generated metadata tables that know names but not types.
    /// Applying such a declaration fails with [`Error::NotInvokable`].
    #[must_use]
    pub fn named(kind: impl Into<String>, args: Vec<Value>) -> AttributeSpec {
        AttributeSpec {
            kind: kind.into(),
            args,
            factory: None,
        }
    }

    /// The declared kind string.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The declared constructor arguments.
    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Instantiate the attribute through its factory.
    ///
    /// # Errors
    /// Returns [`Error::NotInvokable`] when the declaration carries no
    /// factory, or whatever the factory itself reports.
    pub fn instantiate(&self) -> Result<Box<dyn AttributeInstance>> {
        match &self.factory {
            Some(factory) => factory(&self.args),
            None => Err(Error::NotInvokable {
                kind: self.kind.clone(),
            }),
        }
    }
}

impl fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeSpec")
            .field("kind", &self.kind)
            .field("args", &self.args)
            .field("invokable", &self.factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;

    impl AttributeInstance for Tag {
        fn apply(&self, handler: AttributeHandler) -> Result<StepResult> {
            Ok(StepResult::Handler(handler))
        }
    }

    impl AttributeType for Tag {
        const KIND: &'static str = "Tag";

        fn from_args(args: &[Value]) -> Result<Self> {
            if args.is_empty() {
                Ok(Tag)
            } else {
                Err(Error::Attribute("Tag takes no arguments".to_string()))
            }
        }
    }

    #[test]
    fn test_of_captures_factory() {
        let spec = AttributeSpec::of::<Tag>(vec![]);
        assert_eq!(spec.kind(), "Tag");
        assert!(spec.instantiate().is_ok());
    }

    #[test]
    fn test_factory_argument_failure_propagates() {
        let spec = AttributeSpec::of::<Tag>(vec![Value::Int(1)]);
        assert!(matches!(spec.instantiate(), Err(Error::Attribute(_))));
    }

    #[test]
    fn test_named_spec_is_not_invokable() {
        let spec = AttributeSpec::named("Cache", vec![]);
        assert!(matches!(
            spec.instantiate(),
            Err(Error::NotInvokable { kind }) if kind == "Cache"
        ));
    }
}
