//! The class registry: the introspection collaborator resolution starts from.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::metadata::ClassRef;
use crate::{Error, Result};

/// Name-keyed store of class definitions populated by the registration pass.
///
/// The resolver looks classes up here whenever an entry point starts from a
/// class name. The registry uses interior mutability so a shared handle can
/// keep registering definitions after the resolver was built.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RefCell<HashMap<String, ClassRef>>,
}

impl ClassRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> ClassRegistry {
        ClassRegistry::default()
    }

    /// Register a class definition under its declared name.
    ///
    /// Re-registering a name replaces the previous definition.
    pub fn register(&self, class: ClassRef) -> &Self {
        self.classes
            .borrow_mut()
            .insert(class.name().to_string(), class);
        self
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ClassRef> {
        self.classes.borrow().get(name).cloned()
    }

    /// Look up a class by name, failing with [`Error::ClassNotFound`].
    ///
    /// # Errors
    /// Returns [`Error::ClassNotFound`] when the name was never registered.
    pub fn expect(&self, name: &str) -> Result<ClassRef> {
        self.get(name)
            .ok_or_else(|| Error::ClassNotFound(name.to_string()))
    }

    /// Whether a class is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.borrow().contains_key(name)
    }

    /// Number of registered classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.borrow().len()
    }

    /// True iff no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.borrow().is_empty()
    }
}

/// A shareable handle to a [`ClassRegistry`].
pub type ClassRegistryRef = Rc<ClassRegistry>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ClassBuilder;

    #[test]
    fn test_register_and_lookup() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());

        registry.register(ClassBuilder::new("App::A").build());
        registry.register(ClassBuilder::new("App::B").build());

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("App::A"));
        assert!(registry.get("App::C").is_none());
        assert!(matches!(
            registry.expect("App::C"),
            Err(Error::ClassNotFound(name)) if name == "App::C"
        ));
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = ClassRegistry::new();
        registry.register(ClassBuilder::new("App::A").build());
        let replacement = ClassBuilder::new("App::A").constant("V", 2).build();
        registry.register(replacement);

        let stored = registry.get("App::A").unwrap();
        assert!(stored.constant("V").is_some());
    }
}
