//! # ferrous-ctor
//!
//! Constructor-injection type builder for Rust.
//!
//! Types describe their constructors through [`Injectable`]. Registering a
//! type walks those constructors, registers every type a parameter needs,
//! and records one recipe per canonical identifier. Creating an identifier
//! builds a fresh instance graph from the recipes; nothing is cached.
//!
//! ## Features
//!
//! - **Constructor overloads**: every public constructor becomes a recipe,
//!   picked at creation time by the argument signature
//! - **Overrides**: bind a parameter to an implementation or literal values
//! - **Interface registration**: register a constructor under a trait
//! - **Circular dependency detection**: cycles fail at registration with the full path
//! - **Pluggable policies**: eligibility filter, identity resolver and recipe finder
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ctor::{Component, Injectable, Parameter, TypeRegistry};
//! use std::sync::Arc;
//!
//! struct Database;
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! impl Injectable for Database {
//!     fn component() -> Component {
//!         Component::builder::<Self>()
//!             .constructor([], |_| Ok(Database))
//!             .build()
//!     }
//! }
//!
//! impl Injectable for UserService {
//!     fn component() -> Component {
//!         Component::builder::<Self>()
//!             .constructor([Parameter::of::<Database>()], |args| {
//!                 Ok(UserService { db: args.get::<Database>(0)? })
//!             })
//!             .build()
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<UserService>().unwrap();
//!
//! let a = registry.create_type::<UserService>(&[]).unwrap();
//! let b = registry.create_type::<UserService>(&[]).unwrap();
//! assert!(!Arc::ptr_eq(&a.db, &b.db)); // fresh graph per call
//! ```
//!
//! ## Overloads
//!
//! ```rust
//! use ferrous_ctor::{Component, Injectable, Parameter, TypeRegistry, Value};
//!
//! struct Pool { size: i32 }
//!
//! impl Injectable for Pool {
//!     fn component() -> Component {
//!         Component::builder::<Self>()
//!             .constructor([], |_| Ok(Pool { size: 4 }))
//!             .constructor([Parameter::value::<i32>()], |args| {
//!                 Ok(Pool { size: args.value::<i32>(0)? })
//!             })
//!             .build()
//!     }
//! }
//!
//! let mut registry = TypeRegistry::new();
//! registry.register::<Pool>().unwrap();
//!
//! assert_eq!(registry.create_type::<Pool>(&[]).unwrap().size, 4);
//! assert_eq!(registry.create_type::<Pool>(&[Value::new(16)]).unwrap().size, 16);
//! ```

pub mod catalog;
pub mod component;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod node;
pub mod observer;
pub mod registry;
pub mod traits;
pub mod value;

// Internal modules
mod internal;

// Re-export core types
pub use catalog::TypeCatalog;
pub use component::{Component, ComponentBuilder, Constructor, Implementation, Injectable, Parameter, Visibility};
pub use config::{RegistryOptions, DEFAULT_MAX_DEPTH};
pub use descriptors::{Override, RecipeDescriptor};
pub use error::{DiError, DiResult, ErrorKind};
pub use key::{TypeKind, TypeRef};
pub use node::{NodeId, RecipeGraph, RecipeNode};
pub use observer::{LoggingObserver, RegistryObserver};
pub use registry::TypeRegistry;
pub use traits::{
    DefaultTypeFilter, DefaultTypeResolver, RecipeFinder, SignatureFinder, TypeFilter, TypeResolver,
};
pub use value::{AnyArc, Arguments, Value, NULL_TYPE_NAME};
