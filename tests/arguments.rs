//! Integration tests for argument and parameter resolution.

use attrweave::prelude::*;

/// Multiplies integer parameter values by a declared factor.
struct Times {
    factor: i64,
}

impl AttributeInstance for Times {
    fn apply(&self, handler: AttributeHandler) -> Result<StepResult> {
        let factor = self.factor;
        Ok(StepResult::step(move |args| {
            match handler.invoke(args)? {
                Value::Int(n) => Ok(Value::Int(n * factor)),
                other => Ok(other),
            }
        }))
    }
}

impl AttributeType for Times {
    const KIND: &'static str = "Times";

    fn from_args(args: &[Value]) -> Result<Self> {
        let factor = args
            .first()
            .and_then(Value::as_int)
            .ok_or_else(|| Error::Attribute("Times expects one integer argument".to_string()))?;
        Ok(Times { factor })
    }
}

fn two_param_callable() -> Callable {
    // fn sum(a, b = 5) -> a + b
    Callable::new(
        "sum",
        Signature::new([
            ParameterDef::new("a"),
            ParameterDef::new("b").default_value(5),
        ]),
        |_, args| {
            let a = args.get("a").and_then(Value::as_int).unwrap_or(0);
            let b = args.get("b").and_then(Value::as_int).unwrap_or(0);
            Ok(Value::Int(a + b))
        },
    )
}

#[test]
fn test_positional_value_with_default_fallback() {
    let resolver = AttributesResolver::new();
    let callable = two_param_callable();
    let element = ReflectedElement::Function(callable);

    let resolved = resolver
        .resolve_call_arguments(&element, &Arguments::positional([Value::Int(1)]))
        .unwrap();

    assert_eq!(resolved.get("a"), Some(&Value::Int(1)));
    assert_eq!(resolved.get("b"), Some(&Value::Int(5)));
}

#[test]
fn test_named_values_resolve_in_declaration_order() {
    let resolver = AttributesResolver::new();
    let element = ReflectedElement::Function(two_param_callable());

    let resolved = resolver
        .resolve_call_arguments(
            &element,
            &Arguments::named([("b", Value::Int(2)), ("a", Value::Int(1))]),
        )
        .unwrap();

    // Output order follows the declaration, not the supplied order.
    let pairs: Vec<(String, Value)> = resolved.into_iter().collect();
    assert_eq!(
        pairs,
        [
            ("a".to_string(), Value::Int(1)),
            ("b".to_string(), Value::Int(2)),
        ]
    );
}

#[test]
fn test_named_value_wins_over_positional() {
    let resolver = AttributesResolver::new();
    let element = ReflectedElement::Function(two_param_callable());

    let resolved = resolver
        .resolve_call_arguments(
            &element,
            &Arguments::positional([Value::Int(9)]).with("a", Value::Int(1)),
        )
        .unwrap();

    assert_eq!(resolved.get("a"), Some(&Value::Int(1)));
}

#[test]
fn test_missing_required_argument_fails_before_invocation() {
    let resolver = AttributesResolver::new();
    let element = ReflectedElement::Function(two_param_callable());

    assert!(matches!(
        resolver.resolve_call_arguments(&element, &Arguments::none()),
        Err(Error::MissingArgument { name, position }) if name == "a" && position == 0
    ));
}

#[test]
fn test_parameter_attributes_transform_resolved_values() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Times", AttributeTargets::PARAMETER);

    let callable = Callable::new(
        "scaled",
        Signature::new([ParameterDef::new("n")
            .attribute(AttributeSpec::of::<Times>(vec![Value::Int(10)]))]),
        |_, args| Ok(args.get("n").cloned().unwrap_or(Value::Null)),
    );

    let result = resolver
        .call(&callable, Arguments::positional([Value::Int(4)]), None)
        .unwrap();
    assert_eq!(result, Value::Int(40));
}

#[test]
fn test_parameter_chain_applies_in_declaration_order() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Times", AttributeTargets::PARAMETER);

    // Both declared attributes must run over the base value: 1 * 2 * 3.
    let parameter = Signature::new([ParameterDef::new("n")
        .attribute(AttributeSpec::of::<Times>(vec![Value::Int(2)]))
        .attribute(AttributeSpec::of::<Times>(vec![Value::Int(3)]))])
    .parameters()[0]
        .clone();

    let resolved = resolver.resolve_parameter(Value::Int(1), &parameter).unwrap();
    assert_eq!(resolved, Value::Int(6));
}

#[test]
fn test_parameter_resolution_returns_replacement_value() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Times", AttributeTargets::PARAMETER);

    let parameter = Signature::new([ParameterDef::new("n")
        .attribute(AttributeSpec::of::<Times>(vec![Value::Int(2)]))])
    .parameters()[0]
        .clone();

    // Return-and-reassign contract: the caller's own storage is untouched
    // until it substitutes the returned value itself.
    let original = Value::Int(21);
    let resolved = resolver.resolve_parameter(original.clone(), &parameter).unwrap();
    assert_eq!(original, Value::Int(21));
    assert_eq!(resolved, Value::Int(42));
}

#[test]
fn test_unregistered_parameter_attribute_is_skipped() {
    let resolver = AttributesResolver::new();
    // "Times" registered for properties only; the parameter context misses.
    resolver.register_attribute("Times", AttributeTargets::PROPERTY);

    let parameter = Signature::new([ParameterDef::new("n")
        .attribute(AttributeSpec::of::<Times>(vec![Value::Int(2)]))])
    .parameters()[0]
        .clone();

    let resolved = resolver.resolve_parameter(Value::Int(21), &parameter).unwrap();
    assert_eq!(resolved, Value::Int(21));
}

#[test]
fn test_constructor_arguments_resolve_through_create_object() {
    let resolver = AttributesResolver::new();
    resolver.register_attribute("Times", AttributeTargets::PARAMETER);
    resolver.register_class(
        ClassBuilder::new("App::Scaled")
            .constructor_with(
                Signature::new([ParameterDef::new("n")
                    .attribute(AttributeSpec::of::<Times>(vec![Value::Int(2)]))]),
                |instance, args| {
                    let n = args.get("n").cloned().unwrap_or(Value::Null);
                    instance.borrow_mut().set("n", n)?;
                    Ok(Value::Null)
                },
            )
            .property("n", Value::Null)
            .build(),
    );

    let object = resolver
        .create_object("App::Scaled", Arguments::positional([Value::Int(21)]))
        .unwrap();
    let instance = object.as_object().unwrap();
    assert_eq!(instance.borrow().get("n").unwrap(), Value::Int(42));
}
