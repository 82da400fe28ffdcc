//! Diagnostic observers for registration and creation events.
//!
//! Observers are notified synchronously around every top-level `register`
//! and `create` call. The built-in [`LoggingObserver`] forwards events to
//! `tracing`; implement [`RegistryObserver`] to feed metrics or test recorders.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;

/// Observer trait for type registry events.
///
/// Keep implementations lightweight: they run inline with registration and
/// creation.
///
/// # Examples
///
/// ```
/// use ferrous_ctor::{DiError, RegistryObserver, TypeRegistry};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Failures(Mutex<Vec<String>>);
///
/// impl RegistryObserver for Failures {
///     fn registering(&self, _type_name: &str) {}
///
///     fn registered(&self, _type_name: &str, _duration: Duration) {}
///
///     fn registration_failed(&self, type_name: &str, error: &DiError) {
///         self.0.lock().unwrap().push(format!("{}: {}", type_name, error));
///     }
/// }
///
/// let failures = Arc::new(Failures::default());
/// let mut registry = TypeRegistry::new();
/// registry.add_observer(failures.clone());
/// assert!(registry.create("app::Missing", &[]).is_err());
/// assert!(failures.0.lock().unwrap().is_empty());
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Called before a type's constructors are walked.
    fn registering(&self, type_name: &str);

    /// Called after a type and everything it depends on was registered.
    fn registered(&self, type_name: &str, duration: Duration);

    /// Called when registration aborts. Nodes created before the failure
    /// remain in the graph.
    fn registration_failed(&self, type_name: &str, error: &DiError);

    /// Called before an instance graph is built for `id`.
    fn creating(&self, _id: &str) {}

    /// Called after an instance graph was built for `id`.
    fn created(&self, _id: &str, _duration: Duration) {}

    /// Called when creation of `id` fails.
    fn creation_failed(&self, _id: &str, _error: &DiError) {}
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn registering(&self, type_name: &str) {
        for observer in &self.observers {
            observer.registering(type_name);
        }
    }

    #[inline]
    pub(crate) fn registered(&self, type_name: &str, duration: Duration) {
        for observer in &self.observers {
            observer.registered(type_name, duration);
        }
    }

    #[inline]
    pub(crate) fn registration_failed(&self, type_name: &str, error: &DiError) {
        for observer in &self.observers {
            observer.registration_failed(type_name, error);
        }
    }

    #[inline]
    pub(crate) fn creating(&self, id: &str) {
        for observer in &self.observers {
            observer.creating(id);
        }
    }

    #[inline]
    pub(crate) fn created(&self, id: &str, duration: Duration) {
        for observer in &self.observers {
            observer.created(id, duration);
        }
    }

    #[inline]
    pub(crate) fn creation_failed(&self, id: &str, error: &DiError) {
        for observer in &self.observers {
            observer.creation_failed(id, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Successful events are logged at `DEBUG`, failures at `WARN`, each tagged
/// with the observer's prefix.
///
/// # Examples
///
/// ```
/// use ferrous_ctor::{LoggingObserver, TypeRegistry};
/// use std::sync::Arc;
///
/// let mut registry = TypeRegistry::new();
/// registry.add_observer(Arc::new(LoggingObserver::with_prefix("wiring")));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[ferrous-ctor]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn registering(&self, type_name: &str) {
        tracing::debug!(prefix = %self.prefix, type_name, "registering");
    }

    fn registered(&self, type_name: &str, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, type_name, ?duration, "registered");
    }

    fn registration_failed(&self, type_name: &str, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, type_name, %error, "registration failed");
    }

    fn creating(&self, id: &str) {
        tracing::debug!(prefix = %self.prefix, id, "creating");
    }

    fn created(&self, id: &str, duration: Duration) {
        tracing::debug!(prefix = %self.prefix, id, ?duration, "created");
    }

    fn creation_failed(&self, id: &str, error: &DiError) {
        tracing::warn!(prefix = %self.prefix, id, %error, "creation failed");
    }
}
