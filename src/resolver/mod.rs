//! The attribute resolver: registry, entry points, and chain composition.
//!
//! [`AttributesResolver`] owns a registry mapping normalized attribute-kind
//! names to an accumulated [`AttributeTargets`] mask, and exposes one entry
//! point per reflected-element category. Each entry point builds a base step
//! (a constructor call, an identity read, a raw value, a method reference),
//! then folds the element's declared attributes over it in declaration order:
//! attribute *i* wraps the handler produced by attribute *i-1*, so the
//! attribute declared last is the outermost wrapper and the first code to run
//! when the finished chain is invoked.
//!
//! Two resolution modes exist. Value-producing entry points
//! (`create_object`, `decorate_object`, `call`, parameter resolution) invoke
//! the finished chain and return its terminal value. Side-effecting entry
//! points (`resolve_methods`, `resolve_constants`) apply each attribute for
//! effect only and discard the result.
//!
//! A resolver is a cheap-clone handle over shared single-threaded state; it
//! is deliberately not `Send`/`Sync`. Registry reads happen on every
//! resolution call; writes happen only through the explicit
//! `register_attribute` / `remove_attribute` calls.

mod arguments;
mod handler;

pub use arguments::{Arguments, ResolvedArguments};
pub use handler::{AttributeHandler, Step};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::metadata::{
    AccessScope, AttributeSpec, AttributeTargets, Callable, ClassRef, ClassRegistry,
    ClassRegistryRef, Constructor, Instance, InstanceRef, ParameterRef, ReflectedElement, Value,
};
use crate::{Error, Result};

/// The object-construction collaborator: builds an object for a class from
/// already-resolved constructor arguments.
pub type BuilderFn = Rc<dyn Fn(&ClassRef, &ResolvedArguments) -> Result<Value>>;

/// One registry entry: the normalized kind name and its accumulated mask.
///
/// An entry whose mask went empty through removal stays present but is
/// effectively disabled; `has_attribute` reports false for it.
#[derive(Debug, Clone)]
struct AttributeEntry {
    #[allow(dead_code)]
    name: String,
    targets: AttributeTargets,
}

/// Seed options for a resolver.
///
/// Currently carries only an object-builder override; the same override is
/// available later through [`AttributesResolver::set_builder`].
#[derive(Default)]
pub struct ResolverOptions {
    builder: Option<BuilderFn>,
}

impl ResolverOptions {
    /// Empty options: default builder, own class registry.
    #[must_use]
    pub fn new() -> ResolverOptions {
        ResolverOptions::default()
    }

    /// Replace the default object builder.
    #[must_use]
    pub fn builder<F>(mut self, builder: F) -> ResolverOptions
    where
        F: Fn(&ClassRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        self.builder = Some(Rc::new(builder));
        self
    }
}

struct ResolverInner {
    registry: RefCell<HashMap<String, AttributeEntry>>,
    classes: ClassRegistryRef,
    builder: RefCell<BuilderFn>,
}

/// Owner of the attribute-kind registry and entry point for all resolution
/// operations.
///
/// Cloning produces another handle to the same resolver; handlers hold such a
/// clone as their back-reference so attribute code can recurse.
///
/// # Examples
///
/// ```rust
/// use attrweave::{AttributesResolver, Result};
/// use attrweave::metadata::{
///     AttributeInstance, AttributeSpec, AttributeTargets, AttributeType, ClassBuilder,
///     StepResult, Value,
/// };
///
/// struct Upper;
///
/// impl AttributeInstance for Upper {
///     fn apply(&self, handler: attrweave::AttributeHandler) -> Result<StepResult> {
///         Ok(StepResult::step(move |args| {
///             let inner = handler.invoke(args)?;
///             match inner {
///                 Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
///                 other => Ok(other),
///             }
///         }))
///     }
/// }
///
/// impl AttributeType for Upper {
///     const KIND: &'static str = "Upper";
///     fn from_args(_: &[Value]) -> Result<Self> {
///         Ok(Upper)
///     }
/// }
///
/// let resolver = AttributesResolver::new();
/// resolver.register_attribute("Upper", AttributeTargets::PROPERTY);
/// resolver.register_class(
///     ClassBuilder::new("App::Greeting")
///         .property_def(
///             attrweave::metadata::PropertyDef::new("text", "hello")
///                 .attribute(AttributeSpec::of::<Upper>(vec![])),
///         )
///         .build(),
/// );
///
/// let object = resolver.create_object("App::Greeting", attrweave::metadata::Arguments::none())?;
/// let instance = object.as_object().unwrap().clone();
/// resolver.resolve_properties(&instance)?;
/// assert_eq!(instance.borrow().get("text")?, Value::from("HELLO"));
/// # Ok::<(), attrweave::Error>(())
/// ```
#[derive(Clone)]
pub struct AttributesResolver {
    inner: Rc<ResolverInner>,
}

impl Default for AttributesResolver {
    fn default() -> Self {
        AttributesResolver::new()
    }
}

impl AttributesResolver {
    /// Create a resolver with an empty registry and its own class registry.
    #[must_use]
    pub fn new() -> AttributesResolver {
        AttributesResolver::with_classes(Rc::new(ClassRegistry::new()))
    }

    /// Create a resolver over a shared class registry.
    #[must_use]
    pub fn with_classes(classes: ClassRegistryRef) -> AttributesResolver {
        AttributesResolver {
            inner: Rc::new(ResolverInner {
                registry: RefCell::new(HashMap::new()),
                classes,
                builder: RefCell::new(Rc::new(default_builder)),
            }),
        }
    }

    /// Create a resolver seeded from options.
    #[must_use]
    pub fn with_options(options: ResolverOptions) -> AttributesResolver {
        let resolver = AttributesResolver::new();
        if let Some(builder) = options.builder {
            *resolver.inner.builder.borrow_mut() = builder;
        }
        resolver
    }

    /// The class registry this resolver introspects through.
    #[must_use]
    pub fn classes(&self) -> &ClassRegistry {
        &self.inner.classes
    }

    /// Register a class definition; convenience delegate to [`classes`](Self::classes).
    pub fn register_class(&self, class: ClassRef) -> &Self {
        self.inner.classes.register(class);
        self
    }

    /// Replace the object-construction collaborator.
    pub fn set_builder<F>(&self, builder: F) -> &Self
    where
        F: Fn(&ClassRef, &ResolvedArguments) -> Result<Value> + 'static,
    {
        *self.inner.builder.borrow_mut() = Rc::new(builder);
        self
    }

    // ---------------------------------------------------------------------
    // Registry & query
    // ---------------------------------------------------------------------

    /// Register an attribute kind for the given targets.
    ///
    /// Registering an already-known kind ORs the new bits into the existing
    /// mask rather than overwriting it.
    pub fn register_attribute(&self, kind: &str, targets: AttributeTargets) -> &Self {
        let key = normalize_kind(kind);
        let mut registry = self.inner.registry.borrow_mut();
        let entry = registry.entry(key.clone()).or_insert_with(|| AttributeEntry {
            name: key,
            targets: AttributeTargets::empty(),
        });
        entry.targets |= targets;
        drop(registry);
        self
    }

    /// Remove an attribute kind, entirely or per target bit.
    ///
    /// `ALL` forgets the entry; any narrower mask XORs the given bits out of
    /// the stored mask, possibly leaving the entry present with an empty mask
    /// (disabled but not forgotten).
    pub fn remove_attribute(&self, kind: &str, targets: AttributeTargets) -> &Self {
        let key = normalize_kind(kind);
        let mut registry = self.inner.registry.borrow_mut();
        if targets == AttributeTargets::ALL {
            registry.remove(&key);
        } else if let Some(entry) = registry.get_mut(&key) {
            entry.targets ^= targets;
        }
        drop(registry);
        self
    }

    /// Whether `kind` is registered with a mask intersecting `targets`.
    #[must_use]
    pub fn has_attribute(&self, kind: &str, targets: AttributeTargets) -> bool {
        let key = normalize_kind(kind);
        self.inner
            .registry
            .borrow()
            .get(&key)
            .is_some_and(|entry| entry.targets.intersects(targets))
    }

    // ---------------------------------------------------------------------
    // Object construction
    // ---------------------------------------------------------------------

    /// Create an object by class name, resolving constructor arguments and
    /// class-level attributes.
    ///
    /// # Errors
    /// [`Error::ClassNotFound`] for an unknown class, [`Error::MissingArgument`]
    /// from argument resolution, or whatever an applied attribute reports.
    pub fn create_object(&self, class: &str, args: impl Into<Arguments>) -> Result<Value> {
        let class_ref = self.inner.classes.expect(class)?;
        let args = args.into();

        let resolved = if class_ref.constructor().is_some() {
            self.resolve_call_arguments(&ReflectedElement::Constructor(class_ref), &args)?
        } else {
            ResolvedArguments::empty()
        };

        self.resolve_class_create(class, None)?.invoke(&resolved)
    }

    /// Build the construction chain for a class without invoking it.
    ///
    /// The base step is the supplied `builder`, or a step delegating to the
    /// object-construction collaborator when `None`. Class-level attributes
    /// registered for [`AttributeTargets::CLASS`] wrap it in declaration
    /// order; the attribute declared last is the outermost wrapper and
    /// decides whether and when the inner chain runs.
    ///
    /// # Errors
    /// [`Error::ClassNotFound`] for an unknown class, plus any attribute
    /// instantiation or application failure.
    pub fn resolve_class_create(
        &self,
        class: &str,
        builder: Option<Step>,
    ) -> Result<AttributeHandler> {
        let class_ref = self.inner.classes.expect(class)?;

        let step = builder.unwrap_or_else(|| {
            let resolver = self.clone();
            let class_ref = class_ref.clone();
            Rc::new(move |args: &ResolvedArguments| {
                let build = resolver.inner.builder.borrow().clone();
                build(&class_ref, args)
            })
        });

        let mut handler = self.create_handler(step, ReflectedElement::Class(class_ref.clone()));
        for spec in class_ref.attributes() {
            if self.has_attribute(spec.kind(), AttributeTargets::CLASS) {
                handler = self.run_attribute(spec, handler)?;
            }
        }

        Ok(handler)
    }

    // ---------------------------------------------------------------------
    // Object decoration & member resolution
    // ---------------------------------------------------------------------

    /// Decorate an already-built object through its class-level attributes.
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn decorate_object(&self, object: &InstanceRef) -> Result<Value> {
        self.resolve_object_decorate(object)?
            .invoke(&ResolvedArguments::empty())
    }

    /// Build the decoration chain for an already-built object.
    ///
    /// Unlike [`resolve_class_create`](Self::resolve_class_create), the base
    /// step here is identity over an object that already exists; only the
    /// attribute wrappers defer.
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn resolve_object_decorate(&self, object: &InstanceRef) -> Result<AttributeHandler> {
        let class = object.borrow().class().clone();

        let target = object.clone();
        let step: Step = Rc::new(move |_args| Ok(Value::Object(target.clone())));

        let mut handler = self.create_handler(step, ReflectedElement::Class(class.clone()));
        for spec in class.attributes() {
            if self.has_attribute(spec.kind(), AttributeTargets::CLASS) {
                handler = self.run_attribute(spec, handler)?;
            }
        }

        Ok(handler)
    }

    /// Resolve every declared property of an instance.
    ///
    /// Per property, in declaration order: open a scoped access window (also
    /// for private and protected fields), read the current value as the base
    /// step, chain the property's attributes registered for
    /// [`AttributeTargets::PROPERTY`], invoke, and write the product back.
    /// The access window closes on every exit path, so declared accessibility
    /// is never permanently altered, attribute failure included.
    ///
    /// # Errors
    /// Field access failures and attribute failures, all fatal.
    pub fn resolve_properties(&self, instance: &InstanceRef) -> Result<InstanceRef> {
        let class = instance.borrow().class().clone();

        for property in class.properties() {
            let _scope = AccessScope::open(instance, property.name())?;

            let target = instance.clone();
            let name = property.name().to_string();
            let step: Step = Rc::new(move |_args| target.borrow().get(&name));

            let mut handler =
                self.create_handler(step, ReflectedElement::Property(property.clone()));
            for spec in property.attributes() {
                if self.has_attribute(spec.kind(), AttributeTargets::PROPERTY) {
                    handler = self.run_attribute(spec, handler)?;
                }
            }

            let value = handler.invoke(&ResolvedArguments::empty())?;
            instance.borrow_mut().set(property.name(), value)?;
        }

        Ok(instance.clone())
    }

    /// Apply method attributes for side effect.
    ///
    /// The base step yields a method reference,
    /// [`Value::BoundMethod`]`(instance, name)`, without invoking anything.
    /// Every attribute registered for [`AttributeTargets::METHOD`] receives a
    /// fresh handler over that step; results are discarded. Attributes that
    /// want lasting effects register them elsewhere through the resolver.
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn resolve_methods(&self, instance: &InstanceRef) -> Result<InstanceRef> {
        let class = instance.borrow().class().clone();

        for method in class.methods() {
            let target = instance.clone();
            let name = method.name().to_string();
            let step: Step =
                Rc::new(move |_args| Ok(Value::BoundMethod(target.clone(), name.clone())));

            for spec in method.attributes() {
                if self.has_attribute(spec.kind(), AttributeTargets::METHOD) {
                    let handler =
                        self.create_handler(step.clone(), ReflectedElement::Method(method.clone()));
                    self.run_attribute(spec, handler)?;
                }
            }
        }

        Ok(instance.clone())
    }

    /// Apply constant attributes for side effect.
    ///
    /// Same shape as [`resolve_methods`](Self::resolve_methods); the base
    /// step yields the constant's value. Gated on the dedicated
    /// [`AttributeTargets::CONSTANT`] bit.
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn resolve_constants(&self, instance: &InstanceRef) -> Result<InstanceRef> {
        let class = instance.borrow().class().clone();

        for constant in class.constants() {
            let value = constant.value().clone();
            let step: Step = Rc::new(move |_args| Ok(value.clone()));

            for spec in constant.attributes() {
                if self.has_attribute(spec.kind(), AttributeTargets::CONSTANT) {
                    let handler = self
                        .create_handler(step.clone(), ReflectedElement::Constant(constant.clone()));
                    self.run_attribute(spec, handler)?;
                }
            }
        }

        Ok(instance.clone())
    }

    /// Resolve constants, then methods, then properties, in that fixed order.
    ///
    /// # Errors
    /// Whatever the three member passes report.
    pub fn resolve_object_members(&self, instance: &InstanceRef) -> Result<InstanceRef> {
        self.resolve_constants(instance)?;
        self.resolve_methods(instance)?;
        self.resolve_properties(instance)
    }

    // ---------------------------------------------------------------------
    // Callable invocation
    // ---------------------------------------------------------------------

    /// Resolve arguments against a callable's signature and invoke it through
    /// its attribute chain.
    ///
    /// # Errors
    /// [`Error::MissingArgument`] from argument resolution, plus any
    /// attribute or body failure.
    pub fn call(
        &self,
        callable: &Callable,
        args: impl Into<Arguments>,
        context: Option<InstanceRef>,
    ) -> Result<Value> {
        let resolved = self
            .resolve_call_arguments(&ReflectedElement::Function(callable.clone()), &args.into())?;

        self.resolve_callable(callable, context)?.invoke(&resolved)
    }

    /// Build the invocation chain for a callable without invoking it.
    ///
    /// With a `context`, the callable is rebound to execute with that
    /// instance as its receiver before wrapping. Attributes registered for
    /// [`AttributeTargets::METHOD`] or [`AttributeTargets::FUNCTION`] apply.
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn resolve_callable(
        &self,
        callable: &Callable,
        context: Option<InstanceRef>,
    ) -> Result<AttributeHandler> {
        let bound = match context {
            Some(context) => callable.bind(context),
            None => callable.clone(),
        };

        let invocable = bound.clone();
        let step: Step = Rc::new(move |args| invocable.invoke(args));

        let mut handler = self.create_handler(step, ReflectedElement::Function(bound.clone()));
        for spec in bound.attributes() {
            if self.has_attribute(
                spec.kind(),
                AttributeTargets::METHOD | AttributeTargets::FUNCTION,
            ) {
                handler = self.run_attribute(spec, handler)?;
            }
        }

        Ok(handler)
    }

    // ---------------------------------------------------------------------
    // Argument & parameter resolution
    // ---------------------------------------------------------------------

    /// Resolve a caller's argument bag against a declared parameter list.
    ///
    /// Per parameter, in declaration order: a name-keyed value wins, then a
    /// positional value, then the declared default. Each chosen value passes
    /// through [`resolve_parameter`](Self::resolve_parameter) before landing
    /// in the ordered output mapping. The caller substitutes the returned
    /// mapping for its own storage; nothing aliases the input.
    ///
    /// # Errors
    /// [`Error::MissingArgument`] when a parameter has neither a supplied
    /// value nor a default — raised before any invocation occurs.
    pub fn resolve_call_arguments(
        &self,
        element: &ReflectedElement,
        args: &Arguments,
    ) -> Result<ResolvedArguments> {
        let signature = element.signature()?;
        let mut resolved = ResolvedArguments::empty();

        for parameter in signature.parameters() {
            let value = if let Some(value) = args.by_name(parameter.name()) {
                value.clone()
            } else if let Some(value) = args.at(parameter.position()) {
                value.clone()
            } else if let Some(default) = parameter.default() {
                default.clone()
            } else {
                return Err(Error::MissingArgument {
                    name: parameter.name().to_string(),
                    position: parameter.position(),
                });
            };

            let value = self.resolve_parameter(value, parameter)?;
            resolved.push(parameter.name().to_string(), value);
        }

        Ok(resolved)
    }

    /// Run a single value through a parameter's attribute chain.
    ///
    /// The value becomes a constant base step; parameter attributes
    /// registered for [`AttributeTargets::PARAMETER`] wrap it in declaration
    /// order; the final chain is invoked immediately and its product
    /// returned (terminal application — no chain survives the call).
    ///
    /// # Errors
    /// Any attribute instantiation or application failure.
    pub fn resolve_parameter(&self, value: Value, parameter: &ParameterRef) -> Result<Value> {
        let base = value;
        let step: Step = Rc::new(move |_args| Ok(base.clone()));

        let mut handler = self.create_handler(step, ReflectedElement::Parameter(parameter.clone()));
        for spec in parameter.attributes() {
            if self.has_attribute(spec.kind(), AttributeTargets::PARAMETER) {
                handler = self.run_attribute(spec, handler)?;
            }
        }

        handler.invoke(&ResolvedArguments::empty())
    }

    // ---------------------------------------------------------------------
    // Composition primitive
    // ---------------------------------------------------------------------

    /// Apply one declared attribute to the current handler.
    ///
    /// Instantiates the attribute through its factory, applies it, and wraps
    /// whatever comes back into a fresh handler bound to the same source
    /// element. Instantiation failure aborts the whole chain; no partial
    /// chain is produced.
    fn run_attribute(
        &self,
        spec: &AttributeSpec,
        handler: AttributeHandler,
    ) -> Result<AttributeHandler> {
        let instance = spec.instantiate()?;
        let source = handler.source().clone();
        let result = instance.apply(handler)?;

        Ok(self.create_handler(result.into_step(), source))
    }

    fn create_handler(&self, step: Step, source: ReflectedElement) -> AttributeHandler {
        AttributeHandler::new(step, source, self.clone())
    }
}

/// Default object builder: instantiate fields from property defaults, then
/// run the declared constructor body, if any.
fn default_builder(class: &ClassRef, args: &ResolvedArguments) -> Result<Value> {
    let instance = Instance::instantiate(class);

    if let Some(body) = class.constructor().and_then(Constructor::body) {
        body(instance.clone(), args)?;
    }

    Ok(Value::Object(instance))
}

/// Case-insensitive registry key with surrounding path separators trimmed.
fn normalize_kind(kind: &str) -> String {
    kind.trim_matches(':').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_accumulates_bits() {
        let resolver = AttributesResolver::new();
        resolver
            .register_attribute("Cache", AttributeTargets::METHOD)
            .register_attribute("Cache", AttributeTargets::PROPERTY);

        assert!(resolver.has_attribute("Cache", AttributeTargets::METHOD));
        assert!(resolver.has_attribute("Cache", AttributeTargets::PROPERTY));
        assert!(resolver
            .has_attribute("Cache", AttributeTargets::METHOD | AttributeTargets::PROPERTY));
        assert!(!resolver.has_attribute("Cache", AttributeTargets::CLASS));
        assert!(!resolver.has_attribute("Cache", AttributeTargets::PARAMETER));
    }

    #[test]
    fn test_kind_normalization() {
        let resolver = AttributesResolver::new();
        resolver.register_attribute("::App::Cache::", AttributeTargets::ALL);

        assert!(resolver.has_attribute("app::cache", AttributeTargets::ALL));
        assert!(resolver.has_attribute("APP::CACHE", AttributeTargets::METHOD));
        assert!(!resolver.has_attribute("cache", AttributeTargets::ALL));
    }

    #[test]
    fn test_remove_all_forgets_entry() {
        let resolver = AttributesResolver::new();
        resolver.register_attribute("Cache", AttributeTargets::ALL);
        resolver.remove_attribute("Cache", AttributeTargets::ALL);

        assert!(!resolver.has_attribute("Cache", AttributeTargets::ALL));
    }

    #[test]
    fn test_remove_bits_leaves_disabled_entry() {
        let resolver = AttributesResolver::new();
        resolver.register_attribute("Cache", AttributeTargets::METHOD);
        resolver.remove_attribute("Cache", AttributeTargets::METHOD);

        // Entry survives with an empty mask: disabled but not forgotten.
        assert!(!resolver.has_attribute("Cache", AttributeTargets::ALL));
        assert!(resolver.inner.registry.borrow().contains_key("cache"));
    }

    #[test]
    fn test_remove_unknown_kind_is_noop() {
        let resolver = AttributesResolver::new();
        resolver.remove_attribute("Ghost", AttributeTargets::METHOD);
        assert!(!resolver.has_attribute("Ghost", AttributeTargets::ALL));
    }

    #[test]
    fn test_default_builder_places_property_defaults() {
        use crate::metadata::ClassBuilder;

        let resolver = AttributesResolver::new();
        resolver.register_class(
            ClassBuilder::new("App::Config")
                .property("retries", 3)
                .build(),
        );

        let object = resolver
            .create_object("App::Config", Arguments::none())
            .unwrap();
        let instance = object.as_object().unwrap();
        assert_eq!(instance.borrow().get("retries").unwrap(), Value::Int(3));
    }
}
