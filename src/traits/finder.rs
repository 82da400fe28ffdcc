//! Recipe finder: picks a node by identifier and argument signature.

use crate::node::{NodeId, RecipeNode};
use crate::value::NULL_TYPE_NAME;

/// Searches known recipes for the best match of an identifier and an
/// ordered list of argument type names.
///
/// Used during registration to detect "already known" recipes, and at
/// creation time to pick among constructor overloads. Ties must resolve
/// deterministically.
pub trait RecipeFinder: Send + Sync {
    fn find(&self, id: &str, arg_types: &[&str], nodes: &[RecipeNode]) -> Option<NodeId>;

    /// Picks the recipe for `id` to build when the caller supplies no
    /// arguments and no parameterless recipe exists; every parameter is then
    /// built from the graph.
    ///
    /// Also used for a parameter whose own node was never bound, such as an
    /// interface implemented by a constructor that takes parameters.
    ///
    /// Defaults to the initialized node whose parameters can all be supplied
    /// (see [`RecipeNode::is_auto_wirable`]), then the fewest parameters,
    /// then the smallest key.
    fn find_auto_wired(&self, id: &str, nodes: &[RecipeNode]) -> Option<NodeId> {
        nodes
            .iter()
            .filter(|n| n.is_initialized() && n.type_id() == id)
            .map(|n| (!n.is_auto_wirable(nodes), n))
            .min_by(|(a_blocked, a), (b_blocked, b)| {
                a_blocked
                    .cmp(b_blocked)
                    .then_with(|| a.signature().len().cmp(&b.signature().len()))
                    .then_with(|| a.key().cmp(b.key()))
            })
            .map(|(_, n)| n.id())
    }
}

/// Exact-signature finder.
///
/// A node matches when it is initialized, its identifier or key equals `id`,
/// and its constructor signature has the same arity with every argument
/// type equal to the parameter type. A null argument (`"object"`) matches
/// any parameter type.
///
/// A node whose key equals `id` wins outright. Otherwise ties go to the
/// lexicographically smallest key, so a null argument that fits several
/// overloads always picks the same one.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{Component, Injectable, Parameter, RecipeFinder, SignatureFinder, TypeRegistry};
///
/// struct Repo;
/// impl Injectable for Repo {
///     fn component() -> Component {
///         Component::builder::<Self>()
///             .constructor([], |_| Ok(Repo))
///             .constructor([Parameter::value::<i32>()], |_| Ok(Repo))
///             .build()
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Repo>().unwrap();
///
/// let name = std::any::type_name::<Repo>();
/// let nodes = registry.graph().nodes();
/// let by_int = SignatureFinder.find(name, &["i32"], nodes).unwrap();
/// assert!(nodes[by_int.index()].key().ends_with("Repo(i32)"));
/// assert!(SignatureFinder.find(name, &["u8"], nodes).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureFinder;

impl SignatureFinder {
    fn matches(signature: &[&'static str], arg_types: &[&str]) -> bool {
        signature.len() == arg_types.len()
            && signature
                .iter()
                .zip(arg_types)
                .all(|(param, arg)| *arg == NULL_TYPE_NAME || param == arg)
    }
}

impl RecipeFinder for SignatureFinder {
    fn find(&self, id: &str, arg_types: &[&str], nodes: &[RecipeNode]) -> Option<NodeId> {
        let initialized = || nodes.iter().filter(|n| n.is_initialized());

        if let Some(exact) = initialized().find(|n| n.key() == id) {
            return Some(exact.id());
        }

        initialized()
            .filter(|n| n.type_id() == id && Self::matches(n.signature(), arg_types))
            .min_by(|a, b| a.key().cmp(b.key()))
            .map(RecipeNode::id)
    }
}
