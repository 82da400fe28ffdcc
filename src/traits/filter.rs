//! Eligibility filter: which types may be constructed or auto-registered.

use crate::key::{TypeKind, TypeRef};

/// Answers whether a type can be auto-constructed and whether it can be
/// registered as a dependency when it appears as a constructor parameter
/// or override target.
///
/// Implementations are pure predicates.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{TypeFilter, TypeRef};
///
/// /// Refuses to auto-register anything outside the `app` crate.
/// struct AppOnly;
///
/// impl TypeFilter for AppOnly {
///     fn can_create(&self, ty: &TypeRef) -> bool {
///         ty.component().is_some()
///     }
///
///     fn can_register(&self, ty: &TypeRef) -> bool {
///         self.can_create(ty) && ty.name().starts_with("app::")
///     }
/// }
///
/// assert!(!AppOnly.can_register(&TypeRef::value::<u32>()));
/// ```
pub trait TypeFilter: Send + Sync {
    fn can_create(&self, ty: &TypeRef) -> bool;

    fn can_register(&self, ty: &TypeRef) -> bool;
}

/// Accepts component types; rejects interfaces and plain values.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeFilter;

impl TypeFilter for DefaultTypeFilter {
    #[inline]
    fn can_create(&self, ty: &TypeRef) -> bool {
        ty.kind() == TypeKind::Component
    }

    #[inline]
    fn can_register(&self, ty: &TypeRef) -> bool {
        ty.kind() == TypeKind::Component
    }
}
