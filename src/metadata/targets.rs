//! Attribute target masks and reflected-element categories.
//!
//! Every registered attribute kind carries an [`AttributeTargets`] mask naming the
//! element categories it applies to. During resolution the mask is intersected
//! with the bit of the current context; attributes whose mask misses the context
//! are skipped without being instantiated.

use bitflags::bitflags;
use strum::{Display, EnumIter};

bitflags! {
    /// The closed set of element categories an attribute can be declared applicable to.
    ///
    /// Registering the same kind twice OR-accumulates bits rather than
    /// overwriting; see [`crate::AttributesResolver::register_attribute`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AttributeTargets: u32 {
        /// Applicable to class declarations (construction and decoration)
        const CLASS = 0x0001;
        /// Applicable to free functions and unbound callables
        const FUNCTION = 0x0002;
        /// Applicable to methods
        const METHOD = 0x0004;
        /// Applicable to properties
        const PROPERTY = 0x0008;
        /// Applicable to class constants
        const CONSTANT = 0x0010;
        /// Applicable to parameters
        const PARAMETER = 0x0020;
        /// Applicable everywhere
        const ALL = 0x003F;
    }
}

impl Default for AttributeTargets {
    fn default() -> Self {
        AttributeTargets::ALL
    }
}

/// Category of a reflected element.
///
/// This is the per-context counterpart of [`AttributeTargets`]: each variant maps
/// onto the target bit an attribute must carry to be applied in that context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ElementKind {
    /// A class declaration
    Class,
    /// A class constructor
    Constructor,
    /// A method declared on a class
    Method,
    /// A property declared on a class
    Property,
    /// A parameter of a constructor, method, or function
    Parameter,
    /// A class constant
    Constant,
    /// A free function or standalone callable
    Function,
}

impl ElementKind {
    /// The target bit an attribute must be registered for to apply in this context.
    ///
    /// Constants map onto the dedicated [`AttributeTargets::CONSTANT`] bit.
    #[must_use]
    pub fn target_bit(self) -> AttributeTargets {
        match self {
            ElementKind::Class => AttributeTargets::CLASS,
            ElementKind::Constructor | ElementKind::Method => AttributeTargets::METHOD,
            ElementKind::Property => AttributeTargets::PROPERTY,
            ElementKind::Parameter => AttributeTargets::PARAMETER,
            ElementKind::Constant => AttributeTargets::CONSTANT,
            ElementKind::Function => AttributeTargets::FUNCTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_covers_every_bit() {
        let combined = AttributeTargets::CLASS
            | AttributeTargets::FUNCTION
            | AttributeTargets::METHOD
            | AttributeTargets::PROPERTY
            | AttributeTargets::CONSTANT
            | AttributeTargets::PARAMETER;
        assert_eq!(combined, AttributeTargets::ALL);
    }

    #[test]
    fn test_every_kind_has_a_target_bit() {
        for kind in ElementKind::iter() {
            let bit = kind.target_bit();
            assert!(!bit.is_empty());
            assert!(AttributeTargets::ALL.contains(bit));
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ElementKind::Class.to_string(), "Class");
        assert_eq!(ElementKind::Parameter.to_string(), "Parameter");
    }
}
