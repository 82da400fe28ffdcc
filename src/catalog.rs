//! The set of types the registry has seen.
//!
//! The catalog plays the role of the module an identifier is looked up in:
//! every type referenced by a registered component (parameter types,
//! override targets, implemented interfaces) is recorded here so that an
//! identifier produced by the [`TypeResolver`](crate::TypeResolver) can be
//! mapped back to a [`TypeRef`].

use crate::component::Component;
use crate::key::TypeRef;
use crate::node::KeyMap;

/// Name-keyed set of [`TypeRef`]s, filled as components are registered.
#[derive(Default)]
pub struct TypeCatalog {
    types: KeyMap<&'static str, TypeRef>,
}

impl TypeCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a type. The first reference recorded under a name wins.
    pub fn insert(&mut self, ty: TypeRef) {
        self.types.entry(ty.name()).or_insert(ty);
    }

    /// Records every type `component` references.
    pub fn insert_component(&mut self, component: &Component) {
        for ty in component.referenced_types() {
            self.insert(ty);
        }
    }

    /// Looks up a type by its full `type_name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ctor::{TypeCatalog, TypeRef};
    ///
    /// let mut catalog = TypeCatalog::new();
    /// catalog.insert(TypeRef::value::<u8>());
    /// assert_eq!(catalog.get("u8"), Some(TypeRef::value::<u8>()));
    /// assert!(catalog.get("u16").is_none());
    /// ```
    pub fn get(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).copied()
    }

    /// Whether a type named `name` has been recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Number of distinct type names recorded.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Every recorded type, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.values()
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.types.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Injectable, Parameter};
    use crate::descriptors::Override;

    trait Sink: Send + Sync {}

    struct Null;
    impl Sink for Null {}
    impl Injectable for Null {
        fn component() -> Component {
            Component::builder::<Self>().constructor([], |_| Ok(Null)).build()
        }
    }

    struct Writer;
    impl Injectable for Writer {
        fn component() -> Component {
            Component::builder::<Self>()
                .constructor(
                    [Parameter::interface::<dyn Sink>().inject(Override::of::<Null>()), Parameter::value::<u8>()],
                    |_| Ok(Writer),
                )
                .build()
        }
    }

    #[test]
    fn test_insert_component_records_references() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_component(&Writer::component());

        assert!(catalog.contains(std::any::type_name::<Writer>()));
        assert!(catalog.contains(std::any::type_name::<Null>()));
        assert!(catalog.contains(std::any::type_name::<dyn Sink>()));
        assert!(catalog.contains("u8"));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_get_returns_component_ref() {
        let mut catalog = TypeCatalog::new();
        catalog.insert_component(&Writer::component());
        let null = catalog.get(std::any::type_name::<Null>()).unwrap();
        assert!(null.component().is_some());
        assert!(catalog.get("missing::Type").is_none());
    }
}
