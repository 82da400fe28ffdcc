//! Recipe nodes and the graph arena that owns them.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::component::{Factory, Implementation};
use crate::descriptors::{Override, RecipeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::TypeRef;
use crate::traits::RecipeFinder;
use crate::value::{AnyArc, Arguments, Value};

#[cfg(feature = "ahash")]
pub(crate) type KeyMap<K, V> = HashMap<K, V, ahash::RandomState>;
#[cfg(not(feature = "ahash"))]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;

#[cfg(feature = "smallvec")]
pub(crate) type ParamList = smallvec::SmallVec<[NodeId; 4]>;
#[cfg(not(feature = "smallvec"))]
pub(crate) type ParamList = Vec<NodeId>;

/// Index of a node in the recipe graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Constructor bound to an initialized node.
#[derive(Clone)]
pub(crate) struct BoundConstructor {
    /// `Type(p1,p2)` signature; prefix of the parameter position keys
    pub(crate) signature: String,
    pub(crate) declared: Vec<TypeRef>,
    pub(crate) factory: Factory,
    pub(crate) implementations: Vec<Implementation>,
}

/// One constructible unit of the dependency graph.
///
/// A node is keyed by its canonical identifier. It is created the first time
/// that identifier is seen, either as a constructor being registered or as a
/// constructor parameter, and is merged into (never replaced) by later
/// registrations. Parameter nodes are referenced by [`NodeId`] and shared
/// between every constructor that depends on the same identifier.
pub struct RecipeNode {
    id: NodeId,
    key: String,
    type_id: String,
    descriptor: Override,
    concrete: TypeRef,
    parent: Option<NodeId>,
    parameters: ParamList,
    signature: Vec<&'static str>,
    constructor: Option<BoundConstructor>,
    variants: BTreeSet<&'static str>,
    positions: KeyMap<String, Override>,
}

impl RecipeNode {
    pub(crate) fn placeholder(
        id: NodeId,
        key: String,
        type_id: String,
        descriptor: Override,
        concrete: TypeRef,
    ) -> Self {
        Self {
            id,
            key,
            type_id,
            descriptor,
            concrete,
            parent: None,
            parameters: ParamList::new(),
            signature: Vec::new(),
            constructor: None,
            variants: BTreeSet::new(),
            positions: KeyMap::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Canonical identifier, e.g. `app::Repo(i32)`.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identifier the node answers to when matched by name, e.g. `app::Repo`.
    #[inline]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    #[inline]
    pub fn descriptor(&self) -> &Override {
        &self.descriptor
    }

    #[inline]
    pub fn concrete_type(&self) -> &TypeRef {
        &self.concrete
    }

    /// Node whose constructor parameter first produced this one.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn parameters(&self) -> &[NodeId] {
        &self.parameters
    }

    /// Parameter type names of the bound constructor.
    #[inline]
    pub fn signature(&self) -> &[&'static str] {
        &self.signature
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.constructor.is_some()
    }

    pub fn variants(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().copied()
    }

    /// Override recorded for the parameter at `position`
    /// (`"{constructor signature}:({index})"`).
    pub fn position(&self, position: &str) -> Option<&Override> {
        self.positions.get(position)
    }

    /// Whether this node can be built without call-site arguments.
    ///
    /// Every parameter must be supplied by the graph: its node is
    /// initialized, its position carries exactly one literal, or some other
    /// initialized node answers to its identifier. Only one level is checked.
    pub fn is_auto_wirable(&self, nodes: &[RecipeNode]) -> bool {
        let ctor = match &self.constructor {
            Some(ctor) => ctor,
            None => return false,
        };
        self.parameters.iter().enumerate().all(|(index, child)| {
            nodes.get(child.index()).map_or(false, |child| {
                child.is_initialized()
                    || matches!(child.literal_at(&ctor.signature, index), [_])
                    || nodes.iter().any(|n| n.is_initialized() && n.type_id == child.type_id)
            })
        })
    }

    /// Literal arguments recorded for parameter `index` of `signature`.
    fn literal_at(&self, signature: &str, index: usize) -> &[Value] {
        self.position(&format!("{}:({})", signature, index))
            .map(Override::literal_args)
            .unwrap_or_default()
    }

    pub(crate) fn add_variant(&mut self, type_name: &'static str) {
        self.variants.insert(type_name);
    }

    pub(crate) fn register_position(&mut self, position: String, descriptor: Override) {
        self.positions.insert(position, descriptor);
    }

    pub(crate) fn set_parent_if_absent(&mut self, parent: NodeId) {
        if self.parent.is_none() && parent != self.id {
            self.parent = Some(parent);
        }
    }

    /// Binds a constructor and marks the node initialized.
    pub(crate) fn bind(
        &mut self,
        concrete: TypeRef,
        signature: Vec<&'static str>,
        parameters: Vec<NodeId>,
        constructor: BoundConstructor,
    ) {
        self.concrete = concrete;
        self.signature = signature;
        self.parameters = parameters.into_iter().collect();
        self.constructor = Some(constructor);
    }

    pub(crate) fn to_descriptor(&self, graph: &RecipeGraph) -> RecipeDescriptor {
        RecipeDescriptor {
            key: self.key.clone(),
            type_id: self.type_id.clone(),
            concrete_type: self.concrete.name(),
            initialized: self.is_initialized(),
            signature: self.signature.clone(),
            parameters: self
                .parameters
                .iter()
                .filter_map(|id| graph.get_node(*id))
                .map(|n| n.key.clone())
                .collect(),
            variants: self.variants.iter().copied().collect(),
        }
    }

    /// Instantiates this node, building parameters depth-first.
    ///
    /// Non-empty `args` are passed to the constructor as-is and must match
    /// its arity. Otherwise every parameter node is instantiated first, in
    /// declaration order, with the literal arguments recorded for its
    /// position.
    pub(crate) fn create_instance(
        &self,
        ctx: &CreateContext<'_>,
        args: &[Value],
        depth: usize,
    ) -> DiResult<AnyArc> {
        let ctor = self
            .constructor
            .as_ref()
            .ok_or_else(|| DiError::NotInstantiated(self.key.clone()))?;
        if depth >= ctx.max_depth {
            return Err(DiError::DepthExceeded(depth));
        }

        let values = if args.is_empty() {
            self.parameters
                .iter()
                .enumerate()
                .map(|(index, child)| self.create_parameter(ctx, ctor, index, *child, depth + 1))
                .collect::<DiResult<Vec<_>>>()?
        } else {
            if args.len() != self.parameters.len() {
                return Err(DiError::ArgumentCount {
                    key: self.key.clone(),
                    expected: self.parameters.len(),
                    actual: args.len(),
                });
            }
            args.to_vec()
        };

        tracing::trace!(key = %self.key, arguments = values.len(), "invoking constructor");
        (ctor.factory)(&Arguments::new(values))
    }

    fn create_parameter(
        &self,
        ctx: &CreateContext<'_>,
        ctor: &BoundConstructor,
        index: usize,
        child: NodeId,
        depth: usize,
    ) -> DiResult<Value> {
        let child = ctx
            .graph
            .get_node(child)
            .ok_or_else(|| DiError::NotInstantiated(format!("{}:({})", ctor.signature, index)))?;
        let literal = child.literal_at(&ctor.signature, index);
        let declared = ctor
            .declared
            .get(index)
            .copied()
            .unwrap_or(child.concrete);

        if child.is_initialized() {
            let instance = child.create_instance(ctx, literal, depth)?;
            child.cast_to(instance, &declared)
        } else if let [value] = literal {
            Ok(value.clone())
        } else {
            // Unbound placeholder: build whatever now answers to its identifier
            let bound = ctx
                .finder
                .find_auto_wired(&child.type_id, ctx.graph.nodes())
                .and_then(|id| ctx.graph.get_node(id))
                .ok_or_else(|| DiError::NotInstantiated(child.key.clone()))?;
            let instance = bound.create_instance(ctx, &[], depth)?;
            bound.cast_to(instance, &declared)
        }
    }

    /// Presents an instance built by this node as `declared`.
    pub(crate) fn cast_to(&self, instance: AnyArc, declared: &TypeRef) -> DiResult<Value> {
        if *declared == self.concrete {
            return Ok(Value::erased(self.concrete.name(), instance));
        }
        let implementation = self
            .constructor
            .as_ref()
            .and_then(|c| c.implementations.iter().find(|i| i.interface() == declared))
            .ok_or(DiError::TypeMismatch {
                expected: declared.name(),
                actual: self.concrete.name(),
            })?;
        Ok(Value::erased(declared.name(), implementation.upcast(instance)?))
    }
}

impl fmt::Debug for RecipeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecipeNode")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("type_id", &self.type_id)
            .field("concrete", &self.concrete.name())
            .field("initialized", &self.is_initialized())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// State shared by one `create` call.
pub(crate) struct CreateContext<'g> {
    pub(crate) graph: &'g RecipeGraph,
    pub(crate) finder: &'g dyn RecipeFinder,
    pub(crate) max_depth: usize,
}

/// Arena of recipe nodes indexed by canonical identifier.
///
/// Nodes are never removed; a [`NodeId`] stays valid for the graph's lifetime.
#[derive(Default)]
pub struct RecipeGraph {
    nodes: Vec<RecipeNode>,
    index: KeyMap<String, NodeId>,
}

impl RecipeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&RecipeNode> {
        self.index.get(key).and_then(|id| self.get_node(*id))
    }

    pub fn get_node(&self, id: NodeId) -> Option<&RecipeNode> {
        self.nodes.get(id.0)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All nodes in creation order.
    #[inline]
    pub fn nodes(&self) -> &[RecipeNode] {
        &self.nodes
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn id_of(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut RecipeNode {
        &mut self.nodes[id.0]
    }

    /// Returns the node for `key`, creating it with `make` when absent.
    pub(crate) fn get_or_insert_with<F>(&mut self, key: &str, make: F) -> NodeId
    where
        F: FnOnce(NodeId) -> RecipeNode,
    {
        if let Some(id) = self.id_of(key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(make(id));
        self.index.insert(key.to_string(), id);
        id
    }
}

impl fmt::Debug for RecipeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SignatureFinder;

    fn placeholder(graph: &mut RecipeGraph, key: &str) -> NodeId {
        graph.get_or_insert_with(key, |id| {
            RecipeNode::placeholder(id, key.to_string(), "i32".to_string(), Override::new(), TypeRef::value::<i32>())
        })
    }

    #[test]
    fn test_get_or_insert_is_idempotent() {
        let mut graph = RecipeGraph::new();
        let a = placeholder(&mut graph, "i32()");
        let b = placeholder(&mut graph, "i32()");
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);
        assert!(!graph.get("i32()").unwrap().is_initialized());
    }

    #[test]
    fn test_uninitialized_node_is_not_instantiated() {
        let mut graph = RecipeGraph::new();
        let id = placeholder(&mut graph, "i32()");
        let ctx = CreateContext { graph: &graph, finder: &SignatureFinder, max_depth: 8 };
        let err = graph.get_node(id).unwrap().create_instance(&ctx, &[], 0).err().unwrap();
        assert_eq!(err, DiError::NotInstantiated("i32()".to_string()));
    }

    #[test]
    fn test_parent_is_set_once() {
        let mut graph = RecipeGraph::new();
        let child = placeholder(&mut graph, "i32()");
        let first = placeholder(&mut graph, "first");
        let second = placeholder(&mut graph, "second");
        graph.node_mut(child).set_parent_if_absent(first);
        graph.node_mut(child).set_parent_if_absent(second);
        assert_eq!(graph.get_node(child).unwrap().parent(), Some(first));
    }

    #[test]
    fn test_positions_are_kept_per_constructor() {
        let mut graph = RecipeGraph::new();
        let id = placeholder(&mut graph, "u16(u16)");
        let node = graph.node_mut(id);
        node.register_position("app::A(u16):(0)".to_string(), Override::new().arg(Value::new(7u16)));
        node.register_position("app::B(i32,u16):(1)".to_string(), Override::new());

        let node = graph.get_node(id).unwrap();
        assert_eq!(node.literal_at("app::A(u16)", 0).len(), 1);
        assert!(node.literal_at("app::B(i32,u16)", 1).is_empty());
        assert!(node.position("app::A(u16):(1)").is_none());
        assert!(!node.is_auto_wirable(graph.nodes()));
    }
}
