//! The type registry: registration walk and on-demand creation.

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::TypeCatalog;
use crate::component::{Component, Constructor, Injectable, Parameter};
use crate::config::RegistryOptions;
use crate::descriptors::{Override, RecipeDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::RegistrationStack;
use crate::key::TypeRef;
use crate::node::{BoundConstructor, CreateContext, NodeId, RecipeGraph, RecipeNode};
use crate::observer::{Observers, RegistryObserver};
use crate::traits::{
    DefaultTypeFilter, DefaultTypeResolver, RecipeFinder, SignatureFinder, TypeFilter, TypeResolver,
};
use crate::value::{AnyArc, Value};

/// Constructor-injection type builder.
///
/// Registering a type walks its accessible constructors, recursively
/// registers the types its parameters need, and wires one [`RecipeNode`]
/// per canonical identifier. Creating an identifier finds the matching
/// node and builds a fresh instance graph, parameters first.
///
/// The registry is single-threaded: registration takes `&mut self`,
/// creation takes `&self`. Nothing but the recipe graph is cached.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use ferrous_ctor::{Component, Injectable, Override, Parameter, TypeRegistry};
///
/// trait Store: Send + Sync {
///     fn name(&self) -> &'static str;
/// }
///
/// struct Disk;
/// impl Store for Disk {
///     fn name(&self) -> &'static str { "disk" }
/// }
/// impl Injectable for Disk {
///     fn component() -> Component {
///         Component::builder::<Self>()
///             .constructor([], |_| Ok(Disk))
///             .implements::<dyn Store, _>(|d| d as Arc<dyn Store>)
///             .build()
///     }
/// }
///
/// struct Service { store: Arc<dyn Store> }
/// impl Injectable for Service {
///     fn component() -> Component {
///         Component::builder::<Self>()
///             .constructor(
///                 [Parameter::interface::<dyn Store>().inject(Override::of::<Disk>())],
///                 |args| Ok(Service { store: args.get_trait::<dyn Store>(0)? }),
///             )
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Service>().unwrap();
///
/// let service = registry.create_type::<Service>(&[]).unwrap();
/// assert_eq!(service.store.name(), "disk");
/// ```
pub struct TypeRegistry {
    filter: Box<dyn TypeFilter>,
    resolver: Box<dyn TypeResolver>,
    finder: Box<dyn RecipeFinder>,
    graph: RecipeGraph,
    catalog: TypeCatalog,
    observers: Observers,
    options: RegistryOptions,
}

impl TypeRegistry {
    /// Creates a registry with the default filter, resolver and finder.
    pub fn new() -> Self {
        Self::with_policies(DefaultTypeFilter, DefaultTypeResolver, SignatureFinder)
    }

    /// Creates a registry with custom policies.
    pub fn with_policies<F, R, P>(filter: F, resolver: R, finder: P) -> Self
    where
        F: TypeFilter + 'static,
        R: TypeResolver + 'static,
        P: RecipeFinder + 'static,
    {
        Self {
            filter: Box::new(filter),
            resolver: Box::new(resolver),
            finder: Box::new(finder),
            graph: RecipeGraph::new(),
            catalog: TypeCatalog::new(),
            observers: Observers::new(),
            options: RegistryOptions::default(),
        }
    }

    /// Replaces the registry's options. Intended to be chained right after
    /// construction, before anything is registered.
    pub fn with_options(mut self, options: RegistryOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds an observer notified around every `register` and `create` call.
    pub fn add_observer(&mut self, observer: Arc<dyn RegistryObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    // ----- Accessors -----

    /// Policy deciding which types may be created and auto-registered.
    pub fn filter(&self) -> &dyn TypeFilter {
        self.filter.as_ref()
    }

    /// Policy mapping overrides to identifiers and canonical keys.
    pub fn resolver(&self) -> &dyn TypeResolver {
        self.resolver.as_ref()
    }

    /// Policy picking a recipe for an identifier and argument signature.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ctor::{Component, Injectable, RecipeFinder, TypeRegistry};
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
    /// let name = std::any::type_name::<Clock>();
    /// assert!(registry.finder().find(name, &[], registry.graph().nodes()).is_some());
    /// ```
    pub fn finder(&self) -> &dyn RecipeFinder {
        self.finder.as_ref()
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    /// The recipe graph built so far. Nodes are only ever added.
    pub fn graph(&self) -> &RecipeGraph {
        &self.graph
    }

    /// Every type referenced by a registered component.
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Canonical identifiers of all nodes, in creation order.
    pub fn registered_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.keys()
    }

    /// Snapshot of every node for diagnostics.
    pub fn descriptors(&self) -> Vec<RecipeDescriptor> {
        self.graph
            .nodes()
            .iter()
            .map(|node| node.to_descriptor(&self.graph))
            .collect()
    }

    /// Whether the filter allows `ty` to be created.
    pub fn can_create(&self, ty: &TypeRef) -> bool {
        self.filter.can_create(ty)
    }

    /// Whether the filter allows `ty` to be registered, directly or as a
    /// dependency.
    pub fn can_register(&self, ty: &TypeRef) -> bool {
        self.filter.can_register(ty)
    }

    // ----- Registration -----

    /// Registers `T` and, transitively, every type its constructors need.
    pub fn register<T: Injectable>(&mut self) -> DiResult<()> {
        self.register_type(TypeRef::of::<T>())
    }

    /// Registers the type `ty` refers to.
    ///
    /// Fails with [`DiError::NoConstructors`] when `ty` has no accessible
    /// constructor, [`DiError::NotAssignable`] when an override names a type
    /// that cannot stand in for the declared one, and [`DiError::Circular`]
    /// when constructors depend on each other in a cycle. Registration is
    /// not transactional: nodes created before a failure stay in the graph.
    pub fn register_type(&mut self, ty: TypeRef) -> DiResult<()> {
        let started = self.observers.has_observers().then(Instant::now);
        self.observers.registering(ty.name());

        let mut stack = RegistrationStack::new(self.options.max_depth);
        let result = self.register_with(ty, &mut stack);

        match (&result, started) {
            (Ok(()), Some(started)) => self.observers.registered(ty.name(), started.elapsed()),
            (Err(error), _) => {
                tracing::debug!(type_name = ty.name(), %error, "registration failed");
                self.observers.registration_failed(ty.name(), error);
            }
            _ => {}
        }
        result
    }

    fn register_with(&mut self, ty: TypeRef, stack: &mut RegistrationStack) -> DiResult<()> {
        self.catalog.insert(ty);
        let component = ty.component().ok_or(DiError::NoConstructors(ty.name()))?;
        if component.accessible_constructors().next().is_none() {
            return Err(DiError::NoConstructors(ty.name()));
        }
        self.catalog.insert_component(&component);

        let mut frame = stack.enter(ty.name())?;
        tracing::trace!(type_name = ty.name(), depth = frame.depth(), "walking constructors");
        for ctor in component.accessible_constructors() {
            self.register_constructor(&component, ctor, &mut frame)?;
        }
        Ok(())
    }

    fn register_constructor(
        &mut self,
        component: &Component,
        ctor: &Constructor,
        stack: &mut RegistrationStack,
    ) -> DiResult<()> {
        let owner = *component.type_ref();
        let signature = ctor.signature(&owner);

        let mut parameters = Vec::with_capacity(ctor.parameters().len());
        for (index, param) in ctor.parameters().iter().enumerate() {
            let node = self.register_parameter(&owner, &signature, index, param, stack)?;
            parameters.push(node);
        }

        self.finalize_constructor(component, ctor, signature, parameters)
    }

    fn register_parameter(
        &mut self,
        owner: &TypeRef,
        signature: &str,
        index: usize,
        param: &Parameter,
        stack: &mut RegistrationStack,
    ) -> DiResult<NodeId> {
        let declared = *param.declared_type();
        let binding = param
            .binding()
            .cloned()
            .unwrap_or_else(|| Override::of_type(declared));

        let type_id = self.resolver.type_id(&binding, declared.name());
        let found = self.resolver.get_type(&self.catalog, &type_id);
        if let Some(candidate) = found {
            if !declared.is_assignable_from(&candidate) {
                return Err(DiError::NotAssignable {
                    declared: declared.name(),
                    candidate: candidate.name(),
                });
            }
        }
        if type_id == owner.name() && type_id == declared.name() {
            return Err(DiError::Circular(vec![owner.name(), owner.name()]));
        }

        let literal_types = binding.literal_type_names();
        if let Some(candidate) = found {
            if self.filter.can_register(&candidate) && self.find(&type_id, &literal_types).is_none() {
                if stack.contains(candidate.name()) {
                    return Err(DiError::Circular(stack.cycle_to(candidate.name())));
                }
                self.register_with(candidate, stack)?;
            }
        }
        if self.filter.can_register(&declared)
            && !stack.contains(declared.name())
            && self.find(declared.name(), &[]).is_none()
        {
            self.register_with(declared, stack)?;
        }

        let injected = self.find(&type_id, &literal_types);
        let key = self.resolver.type_full_name(
            injected.and_then(|id| self.graph.get_node(id)),
            &literal_types,
            &type_id,
        );
        let concrete = binding.target().copied().unwrap_or(declared);
        let id = self.graph.get_or_insert_with(&key, |id| {
            RecipeNode::placeholder(id, key.clone(), type_id.clone(), binding.clone(), concrete)
        });

        let node = self.graph.node_mut(id);
        node.add_variant(declared.name());
        node.register_position(format!("{}:({})", signature, index), binding);
        Ok(id)
    }

    fn finalize_constructor(
        &mut self,
        component: &Component,
        ctor: &Constructor,
        signature: String,
        parameters: Vec<NodeId>,
    ) -> DiResult<()> {
        let owner = *component.type_ref();
        let descriptor = ctor
            .descriptor()
            .cloned()
            .unwrap_or_else(|| Override::of_type(owner));

        let type_id = self.resolver.type_id(&descriptor, owner.name());
        if let Some(target) = self.resolver.get_type(&self.catalog, &type_id) {
            if !target.is_assignable_from(&owner) {
                return Err(DiError::NotAssignable {
                    declared: target.name(),
                    candidate: owner.name(),
                });
            }
        }

        let param_types = ctor.parameter_type_names();
        let injected = self.find(&type_id, &param_types);
        let key = self.resolver.type_full_name(
            injected.and_then(|id| self.graph.get_node(id)),
            &param_types,
            &type_id,
        );

        if let Some(existing) = self.graph.id_of(&key) {
            let node = self.graph.node_mut(existing);
            if node.is_initialized() {
                node.add_variant(owner.name());
                tracing::trace!(%key, "constructor already bound; skipping");
                return Ok(());
            }
        }

        let id = self.graph.get_or_insert_with(&key, |id| {
            RecipeNode::placeholder(id, key.clone(), type_id.clone(), descriptor.clone(), owner)
        });
        for param in &parameters {
            self.graph.node_mut(*param).set_parent_if_absent(id);
        }

        let bound = BoundConstructor {
            signature,
            declared: ctor.parameters().iter().map(|p| *p.declared_type()).collect(),
            factory: ctor.factory().clone(),
            implementations: component.implementations().to_vec(),
        };
        let node = self.graph.node_mut(id);
        node.add_variant(owner.name());
        node.bind(owner, param_types, parameters, bound);
        tracing::trace!(%key, "recipe node initialized");
        Ok(())
    }

    fn find(&self, id: &str, arg_types: &[&str]) -> Option<NodeId> {
        self.finder.find(id, arg_types, self.graph.nodes())
    }

    // ----- Creation -----

    /// Builds a fresh instance for `id`.
    ///
    /// An initialized node keyed exactly `id` is used directly. Otherwise the
    /// finder picks among the nodes for `id` by the type names of `args`
    /// (`Value::null()` matching any parameter type). Non-empty `args` are
    /// passed straight to the chosen constructor; with no `args` and no
    /// parameterless recipe, the finder's auto-wired pick is built from the
    /// graph. That pick favours a recipe whose parameters the graph can
    /// supply, so `Svc(Dep)` is chosen over `Svc(i32)`. A parameter whose
    /// own node was never bound goes through the same pick.
    pub fn create(&self, id: &str, args: &[Value]) -> DiResult<AnyArc> {
        self.create_node(id, args).map(|(_, instance)| instance)
    }

    /// Builds a fresh `T`, looked up by its type name.
    pub fn create_type<T: Send + Sync + 'static>(&self, args: &[Value]) -> DiResult<Arc<T>> {
        self.create_as::<T>(std::any::type_name::<T>(), args)
    }

    /// Builds a fresh instance for `id` and downcasts it to `T`.
    pub fn create_as<T: Send + Sync + 'static>(&self, id: &str, args: &[Value]) -> DiResult<Arc<T>> {
        let (node, instance) = self.create_node(id, args)?;
        instance.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: node.concrete_type().name(),
        })
    }

    /// Builds a fresh instance for `id` and up-casts it to the interface `I`.
    ///
    /// Pairs with constructors registered under an interface through
    /// [`ComponentBuilder::registered_as`](crate::ComponentBuilder::registered_as).
    pub fn create_trait<I: ?Sized + Send + Sync + 'static>(&self, id: &str, args: &[Value]) -> DiResult<Arc<I>> {
        let (node, instance) = self.create_node(id, args)?;
        let value = node.cast_to(instance, &TypeRef::interface::<I>())?;
        value
            .downcast::<Arc<I>>()
            .map(|outer| (*outer).clone())
            .ok_or(DiError::TypeMismatch {
                expected: std::any::type_name::<I>(),
                actual: node.concrete_type().name(),
            })
    }

    fn create_node(&self, id: &str, args: &[Value]) -> DiResult<(&RecipeNode, AnyArc)> {
        let started = self.observers.has_observers().then(Instant::now);
        self.observers.creating(id);

        let ctx = CreateContext {
            graph: &self.graph,
            finder: self.finder.as_ref(),
            max_depth: self.options.max_depth,
        };
        let result = self
            .locate(id, args)
            .and_then(|node| node.create_instance(&ctx, args, 0).map(|instance| (node, instance)));

        match (&result, started) {
            (Ok(_), Some(started)) => self.observers.created(id, started.elapsed()),
            (Err(error), _) => self.observers.creation_failed(id, error),
            _ => {}
        }
        result
    }

    fn locate(&self, id: &str, args: &[Value]) -> DiResult<&RecipeNode> {
        if let Some(node) = self.graph.get(id) {
            if node.is_initialized() {
                return Ok(node);
            }
        }
        let signature: Vec<&str> = args.iter().map(Value::type_name).collect();
        let found = match self.find(id, &signature) {
            None if args.is_empty() => self.finder.find_auto_wired(id, self.graph.nodes()),
            found => found,
        };
        found
            .and_then(|found| self.graph.get_node(found))
            .ok_or_else(|| DiError::NotInstantiated(id.to_string()))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("graph", &self.graph)
            .field("catalog", &self.catalog)
            .field("options", &self.options)
            .finish()
    }
}
