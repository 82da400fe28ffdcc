//! Component descriptors: the constructor metadata the registry walks.
//!
//! A component describes its public (and private) constructors, the type of
//! every constructor parameter, optional per-parameter overrides, and the
//! interfaces it can be up-cast to. Descriptors are written by hand through
//! [`Component::builder`] inside an [`Injectable`] impl.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptors::Override;
use crate::error::{DiError, DiResult};
use crate::key::TypeRef;
use crate::value::{AnyArc, Arguments};

pub(crate) type Factory = Arc<dyn Fn(&Arguments) -> DiResult<AnyArc> + Send + Sync>;
pub(crate) type Upcast = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// A type the registry can construct.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{Component, Injectable, Parameter, TypeRegistry, Value};
///
/// struct Config { port: u16 }
///
/// impl Injectable for Config {
///     fn component() -> Component {
///         Component::builder::<Self>()
///             .constructor([Parameter::value::<u16>()], |args| {
///                 Ok(Config { port: args.value::<u16>(0)? })
///             })
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Config>().unwrap();
/// let config = registry.create_type::<Config>(&[Value::new(8080u16)]).unwrap();
/// assert_eq!(config.port, 8080);
/// ```
pub trait Injectable: Send + Sync + 'static {
    fn component() -> Component;
}

/// Constructor accessibility. Only public constructors are registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A constructor parameter: its declared type and an optional override.
#[derive(Clone, Debug)]
pub struct Parameter {
    declared: TypeRef,
    binding: Option<Override>,
}

impl Parameter {
    /// Parameter declared as an injectable component.
    pub fn of<T: Injectable>() -> Self {
        Self::from_type(TypeRef::of::<T>())
    }

    /// Parameter declared as a trait object; read it with `Arguments::get_trait`.
    pub fn interface<I: ?Sized + 'static>() -> Self {
        Self::from_type(TypeRef::interface::<I>())
    }

    /// Parameter declared as a plain value.
    pub fn value<T: 'static>() -> Self {
        Self::from_type(TypeRef::value::<T>())
    }

    pub fn from_type(declared: TypeRef) -> Self {
        Self {
            declared,
            binding: None,
        }
    }

    /// Satisfies this parameter through `binding` instead of the declared type.
    pub fn inject(mut self, binding: Override) -> Self {
        self.binding = Some(binding);
        self
    }

    #[inline]
    pub fn declared_type(&self) -> &TypeRef {
        &self.declared
    }

    #[inline]
    pub fn binding(&self) -> Option<&Override> {
        self.binding.as_ref()
    }
}

/// One constructor of a component.
#[derive(Clone)]
pub struct Constructor {
    parameters: Vec<Parameter>,
    factory: Factory,
    visibility: Visibility,
    descriptor: Option<Override>,
}

impl Constructor {
    #[inline]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_accessible(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Override naming the identifier this constructor registers under.
    pub fn descriptor(&self) -> Option<&Override> {
        self.descriptor.as_ref()
    }

    /// Parameter type names in declaration order.
    pub fn parameter_type_names(&self) -> Vec<&'static str> {
        self.parameters.iter().map(|p| p.declared.name()).collect()
    }

    /// Canonical signature such as `app::Repo(i32,alloc::string::String)`.
    pub fn signature(&self, owner: &TypeRef) -> String {
        format!("{}({})", owner.name(), self.parameter_type_names().join(","))
    }

    pub(crate) fn factory(&self) -> &Factory {
        &self.factory
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .field("visibility", &self.visibility)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

/// An interface a component can be up-cast to.
#[derive(Clone)]
pub struct Implementation {
    interface: TypeRef,
    upcast: Upcast,
}

impl Implementation {
    #[inline]
    pub fn interface(&self) -> &TypeRef {
        &self.interface
    }

    /// Converts an erased concrete instance into an erased `Arc<dyn Interface>`.
    pub fn upcast(&self, instance: AnyArc) -> DiResult<AnyArc> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Implementation").field(&self.interface.name()).finish()
    }
}

/// Constructor metadata for one type.
#[derive(Clone, Debug)]
pub struct Component {
    ty: TypeRef,
    constructors: Vec<Constructor>,
    implementations: Vec<Implementation>,
}

impl Component {
    pub fn builder<T: Injectable>() -> ComponentBuilder<T> {
        ComponentBuilder {
            component: Component {
                ty: TypeRef::of::<T>(),
                constructors: Vec::new(),
                implementations: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn type_ref(&self) -> &TypeRef {
        &self.ty
    }

    #[inline]
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Constructors the registry may bind.
    pub fn accessible_constructors(&self) -> impl Iterator<Item = &Constructor> {
        self.constructors.iter().filter(|c| c.is_accessible())
    }

    #[inline]
    pub fn implementations(&self) -> &[Implementation] {
        &self.implementations
    }

    pub fn implements(&self, interface: &TypeRef) -> bool {
        self.implementation(interface.type_id()).is_some()
    }

    pub(crate) fn implementation(&self, interface: TypeId) -> Option<&Implementation> {
        self.implementations
            .iter()
            .find(|i| i.interface.type_id() == interface)
    }

    /// Every type this component mentions: parameter types, override targets,
    /// constructor overrides and implemented interfaces.
    pub fn referenced_types(&self) -> Vec<TypeRef> {
        let mut types = vec![self.ty];
        for ctor in &self.constructors {
            if let Some(target) = ctor.descriptor.as_ref().and_then(Override::target) {
                types.push(*target);
            }
            for param in &ctor.parameters {
                types.push(param.declared);
                if let Some(target) = param.binding.as_ref().and_then(Override::target) {
                    types.push(*target);
                }
            }
        }
        types.extend(self.implementations.iter().map(|i| i.interface));
        types
    }
}

/// Typed builder for [`Component`].
///
/// `private` and `registered_as` apply to the most recently added constructor.
pub struct ComponentBuilder<T> {
    component: Component,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> ComponentBuilder<T> {
    /// Adds a public constructor taking `parameters` in order.
    pub fn constructor<P, F>(mut self, parameters: P, factory: F) -> Self
    where
        P: IntoIterator<Item = Parameter>,
        F: Fn(&Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |args: &Arguments| -> DiResult<AnyArc> {
            Ok(Arc::new(factory(args)?) as AnyArc)
        });
        self.component.constructors.push(Constructor {
            parameters: parameters.into_iter().collect(),
            factory,
            visibility: Visibility::Public,
            descriptor: None,
        });
        self
    }

    /// Marks the last constructor as private; it will not be registered.
    pub fn private(mut self) -> Self {
        debug_assert!(!self.component.constructors.is_empty(), "private() before constructor()");
        if let Some(ctor) = self.component.constructors.last_mut() {
            ctor.visibility = Visibility::Private;
        }
        self
    }

    /// Registers the last constructor under the identifier `descriptor` names.
    ///
    /// The component must be assignable to that type, typically an interface
    /// declared with [`ComponentBuilder::implements`].
    pub fn registered_as(mut self, descriptor: Override) -> Self {
        debug_assert!(!self.component.constructors.is_empty(), "registered_as() before constructor()");
        if let Some(ctor) = self.component.constructors.last_mut() {
            ctor.descriptor = Some(descriptor);
        }
        self
    }

    /// Declares that `T` can be used where `I` is expected.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use ferrous_ctor::{Component, Injectable};
    ///
    /// trait Clock: Send + Sync {}
    /// struct SystemClock;
    /// impl Clock for SystemClock {}
    ///
    /// impl Injectable for SystemClock {
    ///     fn component() -> Component {
    ///         Component::builder::<Self>()
    ///             .constructor([], |_| Ok(SystemClock))
    ///             .implements::<dyn Clock, _>(|c| c as Arc<dyn Clock>)
    ///             .build()
    ///     }
    /// }
    ///
    /// assert_eq!(SystemClock::component().implementations().len(), 1);
    /// ```
    pub fn implements<I, F>(mut self, cast: F) -> Self
    where
        I: ?Sized + Send + Sync + 'static,
        F: Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    {
        let upcast: Upcast = Arc::new(move |instance: AnyArc| -> DiResult<AnyArc> {
            let concrete = instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
                expected: std::any::type_name::<T>(),
                actual: "dyn core::any::Any",
            })?;
            Ok(Arc::new(cast(concrete)) as AnyArc)
        });
        self.component.implementations.push(Implementation {
            interface: TypeRef::interface::<I>(),
            upcast,
        });
        self
    }

    pub fn build(self) -> Component {
        self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    trait Store: Send + Sync {
        fn size(&self) -> usize;
    }

    struct Memory {
        size: usize,
    }

    impl Store for Memory {
        fn size(&self) -> usize {
            self.size
        }
    }

    impl Injectable for Memory {
        fn component() -> Component {
            Component::builder::<Self>()
                .constructor([], |_| Ok(Memory { size: 0 }))
                .constructor([Parameter::value::<usize>()], |args| {
                    Ok(Memory { size: args.value::<usize>(0)? })
                })
                .private()
                .implements::<dyn Store, _>(|m| m as Arc<dyn Store>)
                .build()
        }
    }

    #[test]
    fn test_accessible_constructors_skip_private() {
        let component = Memory::component();
        assert_eq!(component.constructors().len(), 2);
        assert_eq!(component.accessible_constructors().count(), 1);
        assert_eq!(component.constructors()[1].visibility(), Visibility::Private);
    }

    #[test]
    fn test_signature_lists_parameter_types() {
        let component = Memory::component();
        let owner = *component.type_ref();
        let sig = component.constructors()[1].signature(&owner);
        assert!(sig.ends_with("Memory(usize)"), "{}", sig);
        assert!(component.constructors()[0].signature(&owner).ends_with("Memory()"));
    }

    #[test]
    fn test_upcast_produces_trait_object() {
        let component = Memory::component();
        let store = TypeRef::interface::<dyn Store>();
        assert!(component.implements(&store));

        let instance = (component.constructors()[1].factory())(&Arguments::new(vec![Value::new(3usize)])).unwrap();
        let upcast = component.implementation(store.type_id()).unwrap().upcast(instance).unwrap();
        let store = upcast.downcast::<Arc<dyn Store>>().unwrap();
        assert_eq!(store.size(), 3);
    }

    #[test]
    fn test_referenced_types_include_interfaces() {
        let names: Vec<_> = Memory::component()
            .referenced_types()
            .iter()
            .map(|t| t.name())
            .collect();
        assert!(names.contains(&"usize"));
        assert!(names.iter().any(|n| n.contains("Store")));
    }
}
