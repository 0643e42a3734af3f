//! The handler: the current step of a resolution chain.

use std::fmt;
use std::rc::Rc;

use crate::metadata::{ReflectedElement, Value};
use crate::resolver::{AttributesResolver, ResolvedArguments};
use crate::Result;

/// A resolution step: a callable producing the chain's value.
pub type Step = Rc<dyn Fn(&ResolvedArguments) -> Result<Value>>;

/// The current step of a resolution chain, paired with the reflected element
/// it is attached to and the resolver that built it.
///
/// Invocation forwards the arguments transparently to the wrapped step and
/// returns its result. A fresh handler is created every time a step is
/// wrapped; the only in-place mutation is [`set`](AttributeHandler::set),
/// which replaces the step wholesale when an attribute discards prior
/// wrapping instead of composing with it.
///
/// The resolver reference is a non-owning back-reference (the resolver itself
/// is a cheap-clone handle): attribute code can recurse into nested
/// resolution through [`resolver`](AttributeHandler::resolver).
#[derive(Clone)]
pub struct AttributeHandler {
    step: Step,
    source: ReflectedElement,
    resolver: AttributesResolver,
}

impl AttributeHandler {
    /// Pair a step with its source element and owning resolver.
    #[must_use]
    pub fn new(step: Step, source: ReflectedElement, resolver: AttributesResolver) -> AttributeHandler {
        AttributeHandler {
            step,
            source,
            resolver,
        }
    }

    /// Invoke the wrapped step, forwarding all arguments transparently.
    ///
    /// # Errors
    /// Whatever the wrapped step reports.
    pub fn invoke(&self, args: &ResolvedArguments) -> Result<Value> {
        (self.step)(args)
    }

    /// Replace the wrapped step wholesale.
    pub fn set(&mut self, step: Step) -> &mut Self {
        self.step = step;
        self
    }

    /// The current step.
    #[must_use]
    pub fn get(&self) -> Step {
        self.step.clone()
    }

    /// The reflected element this chain is attached to.
    #[must_use]
    pub fn source(&self) -> &ReflectedElement {
        &self.source
    }

    /// The resolver that built this handler.
    #[must_use]
    pub fn resolver(&self) -> &AttributesResolver {
        &self.resolver
    }
}

impl fmt::Debug for AttributeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeHandler")
            .field("source", &self.source.kind())
            .field("name", &self.source.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassBuilder;

    #[test]
    fn test_invoke_forwards_and_set_replaces() {
        let resolver = AttributesResolver::new();
        let class = ClassBuilder::new("App::T").build();
        let element = ReflectedElement::Class(class);

        let mut handler = AttributeHandler::new(
            Rc::new(|args| Ok(Value::Int(args.len() as i64))),
            element,
            resolver,
        );

        let args = ResolvedArguments::from_pairs([("a", Value::Null), ("b", Value::Null)]);
        assert_eq!(handler.invoke(&args).unwrap(), Value::Int(2));

        handler.set(Rc::new(|_| Ok(Value::Str("replaced".to_string()))));
        assert_eq!(handler.invoke(&args).unwrap(), Value::from("replaced"));

        let step = handler.get();
        assert_eq!(step(&args).unwrap(), Value::from("replaced"));
    }
}
