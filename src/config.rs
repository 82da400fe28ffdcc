//! Registry options.
//!
//! Options can be built in code, read from environment variables, or, with
//! the `config` feature, parsed from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default recursion limit for registration and creation.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Default environment variable prefix for [`RegistryOptions::from_env`].
pub const ENV_PREFIX: &str = "FERROUS_CTOR";

/// Tunables for a [`TypeRegistry`](crate::TypeRegistry).
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{RegistryOptions, TypeRegistry};
///
/// let options = RegistryOptions::new().with_max_depth(64);
/// let registry = TypeRegistry::new().with_options(options.clone());
/// assert_eq!(registry.options(), &options);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryOptions {
    /// Deepest constructor chain registration or creation will follow
    pub max_depth: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RegistryOptions {
    /// Options with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recursion limit. Chains deeper than this fail with
    /// [`DiError::DepthExceeded`](crate::DiError::DepthExceeded).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads options from `FERROUS_CTOR_*` environment variables.
    ///
    /// Currently only `FERROUS_CTOR_MAX_DEPTH` is read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ferrous_ctor::{RegistryOptions, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new().with_options(RegistryOptions::from_env());
    /// assert!(registry.options().max_depth > 0);
    /// ```
    pub fn from_env() -> Self {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Reads options from `{PREFIX}_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable values are logged and
    /// ignored.
    pub fn from_env_with_prefix(prefix: &str) -> Self {
        let mut options = Self::default();
        let key = format!("{}_MAX_DEPTH", prefix.to_uppercase());
        if let Ok(value) = env::var(&key) {
            match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => options.max_depth = depth,
                _ => tracing::warn!(%key, %value, "ignoring invalid max depth"),
            }
        }
        options
    }

    /// Parses options from a JSON object; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_depth() {
        assert_eq!(RegistryOptions::default().max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(RegistryOptions::new().with_max_depth(3).max_depth, 3);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_prefixed_variable() {
        env::set_var("CTOR_TEST_MAX_DEPTH", "12");
        assert_eq!(RegistryOptions::from_env_with_prefix("ctor_test").max_depth, 12);
        env::remove_var("CTOR_TEST_MAX_DEPTH");
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_garbage() {
        env::set_var("CTOR_GARBAGE_MAX_DEPTH", "deep");
        assert_eq!(
            RegistryOptions::from_env_with_prefix("CTOR_GARBAGE").max_depth,
            DEFAULT_MAX_DEPTH
        );
        env::set_var("CTOR_GARBAGE_MAX_DEPTH", "0");
        assert_eq!(
            RegistryOptions::from_env_with_prefix("CTOR_GARBAGE").max_depth,
            DEFAULT_MAX_DEPTH
        );
        env::remove_var("CTOR_GARBAGE_MAX_DEPTH");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_json_defaults_missing_fields() {
        assert_eq!(RegistryOptions::from_json_str("{}").unwrap(), RegistryOptions::default());
        assert_eq!(
            RegistryOptions::from_json_str(r#"{"max_depth": 7}"#).unwrap().max_depth,
            7
        );
        assert!(RegistryOptions::from_json_str(r#"{"max_depth": "x"}"#).is_err());
    }
}
