//! Pluggable policies consulted by the type registry.
//!
//! Each policy is supplied when the registry is constructed and consulted
//! during registration and creation; the registry's cycle and dedup logic
//! relies on them being deterministic for identical inputs.

mod filter;
mod finder;
mod resolver;

pub use filter::{TypeFilter, DefaultTypeFilter};
pub use finder::{RecipeFinder, SignatureFinder};
pub use resolver::{TypeResolver, DefaultTypeResolver};
