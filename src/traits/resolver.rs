//! Identity resolver: turns overrides into canonical identifiers.

use crate::catalog::TypeCatalog;
use crate::descriptors::Override;
use crate::key::TypeRef;
use crate::node::RecipeNode;

/// Computes the canonical identifiers recipe nodes are keyed by.
///
/// The registry calls this trait three ways while wiring a constructor:
///
/// 1. [`type_id`](Self::type_id) names the type an override asks for,
///    falling back to the declared type name.
/// 2. [`get_type`](Self::get_type) maps that identifier back to a type
///    within the catalog, so the registry can check assignability and
///    recurse into it.
/// 3. [`type_full_name`](Self::type_full_name) produces the graph key,
///    preferring the key of a recipe the finder already matched.
///
/// All three must return identical results for identical inputs.
pub trait TypeResolver: Send + Sync {
    fn type_id(&self, descriptor: &Override, fallback: &str) -> String;

    fn get_type(&self, catalog: &TypeCatalog, id: &str) -> Option<TypeRef>;

    fn type_full_name(&self, node: Option<&RecipeNode>, arg_types: &[&str], fallback: &str) -> String;
}

/// Identifiers are `std::any::type_name` strings; keys append the argument
/// signature, as in `app::Repo(i32)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeResolver;

impl TypeResolver for DefaultTypeResolver {
    fn type_id(&self, descriptor: &Override, fallback: &str) -> String {
        match descriptor.target() {
            Some(target) => target.name().to_string(),
            None => fallback.to_string(),
        }
    }

    fn get_type(&self, catalog: &TypeCatalog, id: &str) -> Option<TypeRef> {
        catalog.get(id)
    }

    fn type_full_name(&self, node: Option<&RecipeNode>, arg_types: &[&str], fallback: &str) -> String {
        match node {
            Some(node) => node.key().to_string(),
            None => format!("{}({})", fallback, arg_types.join(",")),
        }
    }
}
