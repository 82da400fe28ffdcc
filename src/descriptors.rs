//! Override descriptors and recipe descriptors for introspection.

use std::fmt;

use crate::component::Injectable;
use crate::key::TypeRef;
use crate::value::Value;

/// Declarative instruction for satisfying a parameter or constructor.
///
/// An override names the type to construct instead of the declared one and
/// the literal constructor arguments to use when that type is built for
/// this particular parameter. An override with no target keeps the declared
/// type. Overrides are immutable once built.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{Override, TypeRef};
///
/// trait Store: Send + Sync {}
///
/// let literal = Override::new().arg(42i32);
/// assert!(literal.target().is_none());
/// assert_eq!(literal.literal_type_names(), vec!["i32"]);
///
/// let as_store = Override::of_type(TypeRef::interface::<dyn Store>());
/// assert!(as_store.target().unwrap().name().contains("Store"));
/// ```
#[derive(Clone, Default)]
pub struct Override {
    target: Option<TypeRef>,
    literal_args: Vec<Value>,
}

impl Override {
    /// Override without a target: keep the declared type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override naming the component `T`.
    pub fn of<T: Injectable>() -> Self {
        Self::of_type(TypeRef::of::<T>())
    }

    /// Override naming the interface `I`.
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::of_type(TypeRef::interface::<I>())
    }

    pub fn of_type(target: TypeRef) -> Self {
        Self {
            target: Some(target),
            literal_args: Vec::new(),
        }
    }

    /// Appends one literal constructor argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.literal_args.push(value.into());
        self
    }

    /// Appends literal constructor arguments.
    pub fn args<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.literal_args.extend(values.into_iter().map(Into::into));
        self
    }

    #[inline]
    pub fn target(&self) -> Option<&TypeRef> {
        self.target.as_ref()
    }

    #[inline]
    pub fn literal_args(&self) -> &[Value] {
        &self.literal_args
    }

    /// Type names of the literal arguments; null arguments read as `"object"`.
    pub fn literal_type_names(&self) -> Vec<&'static str> {
        self.literal_args.iter().map(Value::type_name).collect()
    }
}

impl fmt::Debug for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Override")
            .field("target", &self.target.map(|t| t.name()))
            .field("literal_args", &self.literal_type_names())
            .finish()
    }
}

/// Recipe descriptor for introspection and diagnostics
///
/// A snapshot of one node of the recipe graph, produced by
/// [`TypeRegistry::descriptors`](crate::TypeRegistry::descriptors).
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{Component, Injectable, TypeRegistry};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn component() -> Component {
///         Component::builder::<Self>().constructor([], |_| Ok(Clock)).build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Clock>().unwrap();
///
/// let descriptors = registry.descriptors();
/// let clock = descriptors.iter().find(|d| d.type_name().ends_with("Clock")).unwrap();
/// assert!(clock.initialized);
/// assert!(clock.key.ends_with("Clock()"));
/// assert!(clock.parameters.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDescriptor {
    /// Canonical identifier (graph key)
    pub key: String,
    /// Identifier the finder matches against
    pub type_id: String,
    /// Type the node constructs
    pub concrete_type: &'static str,
    /// Whether a constructor is bound
    pub initialized: bool,
    /// Parameter type names of the bound constructor
    pub signature: Vec<&'static str>,
    /// Keys of the parameter nodes, in declaration order
    pub parameters: Vec<String>,
    /// Type names this node has been asked to support
    pub variants: Vec<&'static str>,
}

impl RecipeDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.concrete_type
    }

    /// Whether this node was reached as a constructor parameter with a type
    /// other than the one it constructs.
    pub fn is_substituted(&self) -> bool {
        self.variants.iter().any(|v| *v != self.concrete_type)
    }
}
