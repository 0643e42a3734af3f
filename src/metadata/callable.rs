//! Callable signatures, parameters, and standalone callables.
//!
//! A [`Signature`] is the ordered parameter list of a constructor, method, or
//! function; argument resolution walks it in declaration order. A
//! [`Callable`] is the standalone-function analogue of a method: signature
//! metadata, attached attributes, a body closure, and an optional bound
//! receiver context.

use std::fmt;
use std::rc::Rc;

use crate::metadata::{AttributeSpec, InstanceRef, Value};
use crate::resolver::ResolvedArguments;
use crate::{Error, Result};

/// A reference-counted handle to a declared parameter.
pub type ParameterRef = Rc<ParameterDef>;

/// Body closure of a [`Callable`]; receives the bound context, if any.
pub type CallableBody = Rc<dyn Fn(Option<&InstanceRef>, &ResolvedArguments) -> Result<Value>>;

/// A declared parameter: name, position, optional default, attached attributes.
#[derive(Debug, Clone)]
pub struct ParameterDef {
    name: String,
    position: usize,
    default: Option<Value>,
    attributes: Vec<AttributeSpec>,
}

impl ParameterDef {
    /// Declare a required parameter.
    ///
    /// The position is assigned when the parameter joins a [`Signature`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> ParameterDef {
        ParameterDef {
            name: name.into(),
            position: 0,
            default: None,
            attributes: Vec::new(),
        }
    }

    /// Give this parameter a declared default value.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> ParameterDef {
        self.default = Some(value.into());
        self
    }

    /// Attach an attribute declaration to this parameter.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> ParameterDef {
        self.attributes.push(spec);
        self
    }

    /// The declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared position within the owning signature.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The declared default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Attached attribute declarations, in declaration order.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }
}

/// An ordered parameter list.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    parameters: Vec<ParameterRef>,
}

impl Signature {
    /// Build a signature from parameters in declaration order.
    ///
    /// Positions are assigned from the declaration order; anything set
    /// earlier is overwritten.
    #[must_use]
    pub fn new(parameters: impl IntoIterator<Item = ParameterDef>) -> Signature {
        let parameters = parameters
            .into_iter()
            .enumerate()
            .map(|(position, mut parameter)| {
                parameter.position = position;
                Rc::new(parameter)
            })
            .collect();

        Signature { parameters }
    }

    /// A signature with no parameters.
    #[must_use]
    pub fn empty() -> Signature {
        Signature::default()
    }

    /// The declared parameters, in order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterRef] {
        &self.parameters
    }
}

/// A standalone callable: signature metadata, attributes, body, and an
/// optional bound receiver.
///
/// Binding does not execute anything; it produces a rebound clone whose body
/// will observe the context as its receiver when the callable is finally
/// invoked.
#[derive(Clone)]
pub struct Callable {
    name: String,
    signature: Rc<Signature>,
    attributes: Vec<AttributeSpec>,
    body: CallableBody,
    context: Option<InstanceRef>,
}

impl Callable {
    /// Declare a callable with a signature and a body.
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Callable
    where
        F: Fn(Option<&InstanceRef>, &ResolvedArguments) -> Result<Value> + 'static,
    {
        Callable {
            name: name.into(),
            signature: Rc::new(signature),
            attributes: Vec::new(),
            body: Rc::new(body),
            context: None,
        }
    }

    /// Lower a method reference to an invocable callable.
    ///
    /// The produced callable carries the method's signature and attributes and
    /// is pre-bound to the referenced receiver.
    ///
    /// # Errors
    /// Returns [`Error::Reflection`] when the receiver's class declares no
    /// such method.
    pub fn from_bound(instance: &InstanceRef, method_name: &str) -> Result<Callable> {
        let class = instance.borrow().class().clone();
        let method = class.method(method_name).ok_or_else(|| {
            Error::Reflection(format!(
                "Class '{}' has no method '{method_name}'",
                class.name()
            ))
        })?;

        let body = method.body();
        Ok(Callable {
            name: format!("{}::{method_name}", class.name()),
            signature: method.signature_rc(),
            attributes: method.attributes().to_vec(),
            body: Rc::new(move |context, args| {
                let receiver = context.ok_or_else(|| {
                    Error::Reflection("Method reference invoked without a receiver".to_string())
                })?;
                body(receiver.clone(), args)
            }),
            context: Some(instance.clone()),
        })
    }

    /// Attach an attribute declaration to this callable.
    #[must_use]
    pub fn attribute(mut self, spec: AttributeSpec) -> Callable {
        self.attributes.push(spec);
        self
    }

    /// Rebind this callable to execute with `context` as its receiver.
    #[must_use]
    pub fn bind(&self, context: InstanceRef) -> Callable {
        let mut bound = self.clone();
        bound.context = Some(context);
        bound
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

    /// The currently bound receiver, if any.
    #[must_use]
    pub fn context(&self) -> Option<&InstanceRef> {
        self.context.as_ref()
    }

    /// Invoke the body with already-resolved arguments.
    ///
    /// # Errors
    /// Whatever the body reports.
    pub fn invoke(&self, args: &ResolvedArguments) -> Result<Value> {
        (self.body)(self.context.as_ref(), args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("parameters", &self.signature.parameters().len())
            .field("bound", &self.context.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_assigns_positions() {
        let signature = Signature::new([
            ParameterDef::new("a"),
            ParameterDef::new("b").default_value(5),
        ]);

        let parameters = signature.parameters();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name(), "a");
        assert_eq!(parameters[0].position(), 0);
        assert_eq!(parameters[1].position(), 1);
        assert_eq!(parameters[1].default(), Some(&Value::Int(5)));
    }

    #[test]
    fn test_callable_invoke_without_context() {
        let callable = Callable::new("double", Signature::new([ParameterDef::new("n")]), |_, args| {
            let n = args.value_at(0).and_then(Value::as_int).unwrap_or(0);
            Ok(Value::Int(n * 2))
        });

        let args = ResolvedArguments::from_pairs([("n", Value::Int(21))]);
        assert_eq!(callable.invoke(&args).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_bind_produces_rebound_clone() {
        let callable = Callable::new("who", Signature::empty(), |context, _| {
            Ok(Value::Bool(context.is_some()))
        });

        assert_eq!(
            callable.invoke(&ResolvedArguments::empty()).unwrap(),
            Value::Bool(false)
        );

        let class = crate::metadata::ClassBuilder::new("App::Ctx").build();
        let instance = crate::metadata::Instance::instantiate(&class);
        let bound = callable.bind(instance);

        assert_eq!(
            bound.invoke(&ResolvedArguments::empty()).unwrap(),
            Value::Bool(true)
        );
        // The original stays unbound.
        assert!(callable.context().is_none());
    }
}
