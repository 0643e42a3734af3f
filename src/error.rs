use thiserror::Error;

/// The generic Error type, which provides coverage for all errors this library can
/// potentially return.
///
/// Every failure during attribute resolution is fatal for the current resolution
/// call: nothing is retried, swallowed, or logged-and-continued. The error is
/// surfaced synchronously to the immediate caller, and no partial handler chain or
/// terminal value is produced past the point of failure.
///
/// # Error Categories
///
/// ## Reflection Errors
/// - [`Error::ClassNotFound`] - A class name could not be resolved in the registry
/// - [`Error::Reflection`] - A member or signature could not be introspected
///
/// ## Resolution Errors
/// - [`Error::NotInvokable`] - An attribute lacks the invocation capability
/// - [`Error::MissingArgument`] - A required parameter has no value and no default
/// - [`Error::Inaccessible`] - A non-public field was touched outside a resolution scope
/// - [`Error::Attribute`] - User attribute code reported a failure
///
/// # Examples
///
/// ```rust
/// use attrweave::{AttributesResolver, Error};
/// use attrweave::metadata::Arguments;
///
/// let resolver = AttributesResolver::new();
///
/// match resolver.create_object("App::Missing", Arguments::none()) {
///     Err(Error::ClassNotFound(name)) => assert_eq!(name, "App::Missing"),
///     other => panic!("expected ClassNotFound, got {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The named class is not present in the class registry.
    ///
    /// Raised by every entry point that starts from a class name
    /// (`create_object`, `resolve_class_create`) when the registration pass
    /// never declared the class.
    #[error("Class '{0}' was not found in the class registry")]
    ClassNotFound(String),

    /// A reflected element could not be introspected.
    ///
    /// Covers member lookups that miss and signature misuse, e.g. asking for
    /// the parameter list of an element that has none.
    #[error("Reflection failed - {0}")]
    Reflection(String),

    /// An attribute declared on an element cannot be instantiated and invoked.
    ///
    /// An [`crate::metadata::AttributeSpec`] declared by name only carries no
    /// factory; applying it is a logic error that aborts the whole chain at
    /// the point of failure.
    #[error("Attribute '{kind}' is not invokable")]
    NotInvokable {
        /// The declared attribute kind that lacked a factory
        kind: String,
    },

    /// A required parameter received no value.
    ///
    /// Raised during argument resolution, before any invocation occurs, when
    /// neither a named nor a positional value was supplied and the parameter
    /// declares no default.
    #[error("Missing argument '{name}' at position {position}")]
    MissingArgument {
        /// The declared parameter name
        name: String,
        /// The declared parameter position
        position: usize,
    },

    /// A non-public field was read or written outside a resolution access scope.
    ///
    /// Property resolution opens a scoped access window per field; outside of
    /// it, private and protected fields reject direct access.
    #[error("Property '{property}' of class '{class}' is not accessible")]
    Inaccessible {
        /// The owning class name
        class: String,
        /// The field that rejected access
        property: String,
    },

    /// User attribute code reported a failure while being constructed or applied.
    #[error("Attribute error - {0}")]
    Attribute(String),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
