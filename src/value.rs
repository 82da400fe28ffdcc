//! Type-erased values passed to and produced by constructors.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Type-erased Arc for instances and arguments
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type name recorded in argument signatures for a null argument.
pub const NULL_TYPE_NAME: &str = "object";

/// A constructor argument or a constructed instance, tagged with its type name.
///
/// The type name is what argument signatures are built from: a call such as
/// `create_type::<Repo>(&[Value::new(5i32)])` asks for the constructor whose
/// parameter list is `(i32)`. A [`Value::null`] matches any parameter type.
///
/// # Examples
///
/// ```rust
/// use ferrous_ctor::Value;
///
/// let port = Value::new(8080u16);
/// assert_eq!(port.type_name(), "u16");
/// assert_eq!(*port.downcast::<u16>().unwrap(), 8080);
///
/// let nothing = Value::null();
/// assert!(nothing.is_null());
/// assert_eq!(nothing.type_name(), "object");
/// ```
#[derive(Clone)]
pub struct Value {
    type_name: &'static str,
    inner: Option<AnyArc>,
}

impl Value {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Some(value),
        }
    }

    /// Wraps an already erased instance under the given type name.
    pub fn erased(type_name: &'static str, inner: AnyArc) -> Self {
        Self {
            type_name,
            inner: Some(inner),
        }
    }

    pub fn null() -> Self {
        Self {
            type_name: NULL_TYPE_NAME,
            inner: None,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.inner.clone()?.downcast::<T>().ok()
    }

    pub fn as_any(&self) -> Option<&AnyArc> {
        self.inner.as_ref()
    }

    pub fn into_inner(self) -> Option<AnyArc> {
        self.inner
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type_name", &self.type_name)
            .field("null", &self.is_null())
            .finish()
    }
}

macro_rules! value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::new(value)
                }
            }
        )*
    };
}

value_from!(bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, String);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::new(value.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_else(Value::null)
    }
}

/// Arguments handed to a constructor factory, in parameter order.
///
/// Parameters declared as interfaces arrive already up-cast and are read with
/// [`Arguments::get_trait`]; everything else is read with [`Arguments::get`]
/// or, for `Clone` values, [`Arguments::value`].
pub struct Arguments {
    values: Vec<Value>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw access to the argument at `index`.
    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn is_null(&self, index: usize) -> bool {
        self.values.get(index).map(Value::is_null).unwrap_or(true)
    }

    /// Gets the argument at `index` as a concrete type.
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        let value = self.at::<T>(index)?;
        value.downcast::<T>().ok_or(DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: value.type_name(),
        })
    }

    /// Gets the argument at `index`, treating a null argument as `None`.
    pub fn get_opt<T: Send + Sync + 'static>(&self, index: usize) -> DiResult<Option<Arc<T>>> {
        if self.at::<T>(index)?.is_null() {
            return Ok(None);
        }
        self.get::<T>(index).map(Some)
    }

    /// Gets the argument at `index` as a trait object.
    pub fn get_trait<I: ?Sized + Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<I>> {
        let value = self.at::<I>(index)?;
        value
            .downcast::<Arc<I>>()
            .map(|outer| (*outer).clone())
            .ok_or(DiError::TypeMismatch {
                expected: std::any::type_name::<I>(),
                actual: value.type_name(),
            })
    }

    /// Gets a clone of the argument at `index`.
    pub fn value<T: Clone + Send + Sync + 'static>(&self, index: usize) -> DiResult<T> {
        self.get::<T>(index).map(|arc| (*arc).clone())
    }

    fn at<T: ?Sized>(&self, index: usize) -> DiResult<&Value> {
        self.values.get(index).ok_or(DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            actual: "<missing>",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named: Send + Sync {
        fn name(&self) -> &str;
    }

    struct Fixed;
    impl Named for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(Value::from(5i32).type_name(), "i32");
        assert_eq!(Value::from("x").type_name(), "alloc::string::String");
        assert_eq!(Value::from(None::<i32>).type_name(), NULL_TYPE_NAME);
    }

    #[test]
    fn test_arguments_typed_access() {
        let named: Arc<dyn Named> = Arc::new(Fixed);
        let args = Arguments::new(vec![
            Value::new(7u32),
            Value::new(named),
            Value::null(),
        ]);

        assert_eq!(args.len(), 3);
        assert_eq!(args.value::<u32>(0).unwrap(), 7);
        assert_eq!(args.get_trait::<dyn Named>(1).unwrap().name(), "fixed");
        assert!(args.is_null(2));
        assert!(args.get_opt::<u32>(2).unwrap().is_none());
    }

    #[test]
    fn test_arguments_mismatch_reports_types() {
        let args = Arguments::new(vec![Value::new(1u8)]);
        match args.get::<String>(0) {
            Err(DiError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected, "alloc::string::String");
                assert_eq!(actual, "u8");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other.map(|_| ())),
        }
        assert!(matches!(
            args.get::<u8>(3),
            Err(DiError::TypeMismatch { actual: "<missing>", .. })
        ));
    }
}
