//! Type identity for components, interfaces and plain values.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::component::{Component, Injectable};

/// What a [`TypeRef`] stands for.
///
/// Only `Component` types carry constructor metadata; the default
/// [`TypeFilter`](crate::TypeFilter) uses this to decide eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A type implementing [`Injectable`]; has constructors
    Component,
    /// A trait object such as `dyn Repository`
    Interface,
    /// Anything else: primitives, strings, plain structs
    Value,
}

/// Reference to a type known to the registry.
///
/// A `TypeRef` pairs the `TypeId` with the `std::any::type_name` used as the
/// canonical identifier, and for components a function producing the
/// component descriptor. The descriptor is produced lazily so that
/// descriptors can name each other in cycles without recursing at
/// construction time.
///
/// Equality and hashing use the `TypeId` only, mirroring the hot path of
/// service keys.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{TypeRef, TypeKind};
///
/// trait Clock: Send + Sync {}
///
/// let port = TypeRef::value::<u16>();
/// assert_eq!(port.name(), "u16");
/// assert_eq!(port.kind(), TypeKind::Value);
///
/// let clock = TypeRef::interface::<dyn Clock>();
/// assert_eq!(clock.kind(), TypeKind::Interface);
/// assert!(clock.component().is_none());
/// ```
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    descriptor: Option<fn() -> Component>,
}

impl TypeRef {
    /// Reference to an injectable component.
    pub fn of<T: Injectable>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: TypeKind::Component,
            descriptor: Some(T::component as fn() -> Component),
        }
    }

    /// Reference to a trait object type.
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<I>(),
            name: std::any::type_name::<I>(),
            kind: TypeKind::Interface,
            descriptor: None,
        }
    }

    /// Reference to a plain value type with no constructors of its own.
    pub fn value<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: TypeKind::Value,
            descriptor: None,
        }
    }

    /// Canonical name (`std::any::type_name`).
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Builds the component descriptor, if this is a component type.
    pub fn component(&self) -> Option<Component> {
        self.descriptor.map(|describe| describe())
    }

    /// Whether a value of `candidate` can stand in where `self` is declared.
    ///
    /// True for the same type, or when `candidate` is a component that lists
    /// `self` among the interfaces it implements.
    pub fn is_assignable_from(&self, candidate: &TypeRef) -> bool {
        if self.id == candidate.id {
            return true;
        }
        candidate
            .component()
            .map(|component| component.implements(self))
            .unwrap_or(false)
    }
}

impl PartialEq for TypeRef {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
