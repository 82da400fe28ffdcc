//! Error types for the type registry.

use std::fmt;

/// Broad category of a [`DiError`].
///
/// Registration failures are raised while walking constructors in
/// [`TypeRegistry::register`](crate::TypeRegistry::register); instantiation
/// failures are raised by [`TypeRegistry::create`](crate::TypeRegistry::create).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The recipe graph could not be built for a type.
    Registration,
    /// An object could not be constructed from the recipe graph.
    Instantiation,
}

/// Type registry errors
///
/// Represents the failure conditions of registering a component and of
/// instantiating one from the recipe graph. All errors are raised
/// synchronously and abort the current call; nothing is retried.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{DiError, ErrorKind};
///
/// let no_ctors = DiError::NoConstructors("app::Other");
/// let circular = DiError::Circular(vec!["app::A", "app::B", "app::A"]);
/// let missing = DiError::NotInstantiated("app::Missing".to_string());
///
/// assert_eq!(no_ctors.kind(), ErrorKind::Registration);
/// assert_eq!(missing.kind(), ErrorKind::Instantiation);
/// assert_eq!(circular.to_string(), "Circular dependency: app::A -> app::B -> app::A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiError {
    /// Type exposes no accessible constructor
    NoConstructors(&'static str),
    /// Override names a type that cannot stand in for the declared type
    NotAssignable {
        declared: &'static str,
        candidate: &'static str,
    },
    /// Circular dependency detected during registration (includes path)
    Circular(Vec<&'static str>),
    /// No initialized recipe matches the identifier and argument signature
    NotInstantiated(String),
    /// Call-site arguments do not line up with the bound constructor
    ArgumentCount {
        key: String,
        expected: usize,
        actual: usize,
    },
    /// Downcast of an argument or instance failed
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// Maximum recursion depth exceeded
    DepthExceeded(usize),
}

impl DiError {
    /// Returns whether this error came out of registration or instantiation.
    ///
    /// `DepthExceeded` is reported as a registration error; creation only
    /// walks graphs that registration already bounded.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiError::NoConstructors(_)
            | DiError::NotAssignable { .. }
            | DiError::Circular(_)
            | DiError::DepthExceeded(_) => ErrorKind::Registration,
            DiError::NotInstantiated(_)
            | DiError::ArgumentCount { .. }
            | DiError::TypeMismatch { .. } => ErrorKind::Instantiation,
        }
    }

    pub fn is_registration(&self) -> bool {
        self.kind() == ErrorKind::Registration
    }

    pub fn is_instantiation(&self) -> bool {
        self.kind() == ErrorKind::Instantiation
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NoConstructors(name) => {
                write!(f, "{} is not registered (no constructors available)", name)
            }
            DiError::NotAssignable { declared, candidate } => {
                write!(f, "{} is not registered (not assignable from {})", declared, candidate)
            }
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::NotInstantiated(key) => {
                write!(f, "{} is not instantiated (no constructors available)", key)
            }
            DiError::ArgumentCount { key, expected, actual } => write!(
                f,
                "{} expects {} arguments, got {}",
                key, expected, actual
            ),
            DiError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {}, got {}", expected, actual)
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for registry operations
///
/// A convenience alias for `Result<T, DiError>` used throughout ferrous-ctor.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::{DiResult, DiError};
///
/// fn lookup(known: bool) -> DiResult<&'static str> {
///     if known {
///         Ok("app::Service")
///     } else {
///         Err(DiError::NotInstantiated("app::Service".to_string()))
///     }
/// }
///
/// assert!(lookup(true).is_ok());
/// assert!(lookup(false).unwrap_err().is_instantiation());
/// ```
pub type DiResult<T> = Result<T, DiError>;
