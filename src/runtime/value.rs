//! Runtime values and their static types.
//!
//! [`Value`] is what flows in and out of reflective calls: arguments, return values and field
//! contents. [`TypeSignature`] describes the declared type of a parameter, return value or
//! field, and [`FromValue`] coerces a dynamically obtained [`Value`] back into a static Rust
//! type.
//!
//! # Type Mapping
//!
//! | Signature | Value variant | Rust type |
//! |-----------|---------------|-----------|
//! | `Void` | [`Value::Void`] | `()` |
//! | `Boolean` | [`Value::Bool`] | `bool` |
//! | `Char` | [`Value::Char`] | `char` |
//! | `I4` | [`Value::I32`] | `i32` |
//! | `I8` | [`Value::I64`] | `i64` |
//! | `R8` | [`Value::F64`] | `f64` |
//! | `String` | [`Value::String`] | `String`, `Arc<str>` |
//! | `Object` | any | [`Value`] |
//! | `Class(name)` | [`Value::Object`] | [`ObjectRef`] |
//!
//! Reference-typed slots (`String`, `Object`, `Class`) also accept [`Value::Null`]; use
//! `Option<T>` as the coercion target to observe it.

use std::fmt;
use std::sync::Arc;

use crate::{runtime::ObjectRef, Result};

/// The declared type of a parameter, return value or field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// No value
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.Int32`
    I4,
    /// `System.Int64`
    I8,
    /// `System.Double`
    R8,
    /// `System.String`
    String,
    /// `System.Object`, accepts every value
    Object,
    /// A class defined in the runtime type system, by full name
    Class(String),
}

impl TypeSignature {
    /// Returns `true` for reference types, which admit [`Value::Null`]
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            TypeSignature::String | TypeSignature::Object | TypeSignature::Class(_)
        )
    }

    /// The value a freshly allocated slot of this type holds
    #[must_use]
    pub fn default_value(&self) -> Value {
        match self {
            TypeSignature::Void => Value::Void,
            TypeSignature::Boolean => Value::Bool(false),
            TypeSignature::Char => Value::Char('\0'),
            TypeSignature::I4 => Value::I32(0),
            TypeSignature::I8 => Value::I64(0),
            TypeSignature::R8 => Value::F64(0.0),
            TypeSignature::String | TypeSignature::Object | TypeSignature::Class(_) => Value::Null,
        }
    }

    /// How well `value` fits this signature.
    ///
    /// `None` means the value is not assignable. Otherwise, a higher score is a closer match:
    /// `3` for an exact match, `2` for a widening or derived-class match, `1` for `null`
    /// into a reference slot and for anything into `Object`.
    #[must_use]
    pub fn match_score(&self, value: &Value) -> Option<u8> {
        match (self, value) {
            (TypeSignature::Void, Value::Void)
            | (TypeSignature::Boolean, Value::Bool(_))
            | (TypeSignature::Char, Value::Char(_))
            | (TypeSignature::I4, Value::I32(_))
            | (TypeSignature::I8, Value::I64(_))
            | (TypeSignature::R8, Value::F64(_))
            | (TypeSignature::String, Value::String(_)) => Some(3),
            (TypeSignature::I8, Value::I32(_)) | (TypeSignature::R8, Value::I32(_)) => Some(2),
            (TypeSignature::Class(name), Value::Object(object)) => {
                if object.runtime_type().fullname() == *name {
                    Some(3)
                } else if object.runtime_type().is_subclass_of(name) {
                    Some(2)
                } else {
                    None
                }
            }
            (TypeSignature::Object, Value::Void) => None,
            (TypeSignature::Object, _) => Some(1),
            (signature, Value::Null) if signature.is_reference() => Some(1),
            _ => None,
        }
    }

    /// Returns `true` if `value` can be stored in a slot of this type
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        self.match_score(value).is_some()
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Void => write!(f, "System.Void"),
            TypeSignature::Boolean => write!(f, "System.Boolean"),
            TypeSignature::Char => write!(f, "System.Char"),
            TypeSignature::I4 => write!(f, "System.Int32"),
            TypeSignature::I8 => write!(f, "System.Int64"),
            TypeSignature::R8 => write!(f, "System.Double"),
            TypeSignature::String => write!(f, "System.String"),
            TypeSignature::Object => write!(f, "System.Object"),
            TypeSignature::Class(name) => write!(f, "{name}"),
        }
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// No value (void return)
    Void,
    /// Null reference
    Null,
    /// Boolean value
    Bool(bool),
    /// Unicode character
    Char(char),
    /// 32-bit signed integer
    I32(i32),
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit floating point
    F64(f64),
    /// Immutable string
    String(Arc<str>),
    /// Reference to an instance of a runtime type
    Object(ObjectRef),
}

impl Value {
    /// Returns the referenced object, if this is an object reference
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short name of the dynamic type, used in error messages
    #[must_use]
    pub fn type_name(&self) -> String {
        match self {
            Value::Void => "System.Void".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(_) => "System.Boolean".to_string(),
            Value::Char(_) => "System.Char".to_string(),
            Value::I32(_) => "System.Int32".to_string(),
            Value::I64(_) => "System.Int64".to_string(),
            Value::F64(_) => "System.Double".to_string(),
            Value::String(_) => "System.String".to_string(),
            Value::Object(object) => object.runtime_type().fullname(),
        }
    }
}

impl PartialEq for Value {
    /// Primitives compare by value, objects by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "'{v}'"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}L"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::Object(object) => write!(f, "{}", object.runtime_type().fullname()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    char => Char,
    i32 => I32,
    i64 => I64,
    f64 => F64,
    Arc<str> => String,
    ObjectRef => Object,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Arc::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Coercion from a dynamically obtained [`Value`] into a static type.
///
/// Implemented for the primitive Rust types, for [`ObjectRef`], for [`Value`] itself (no
/// coercion at all) and for `Option<T>` (which maps [`Value::Null`] to `None`).
pub trait FromValue: Sized {
    /// Convert `value`, failing with [`crate::Error::TypeMismatch`] if it is incompatible
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeMismatch`] if `value` is not assignable to `Self`.
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Void | Value::Null => Ok(()),
            other => Err(type_mismatch!(TypeSignature::Void, other.type_name())),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(type_mismatch!(TypeSignature::Boolean, other.type_name())),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(v) => Ok(v),
            other => Err(type_mismatch!(TypeSignature::Char, other.type_name())),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I32(v) => Ok(v),
            other => Err(type_mismatch!(TypeSignature::I4, other.type_name())),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::I32(v) => Ok(i64::from(v)),
            other => Err(type_mismatch!(TypeSignature::I8, other.type_name())),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I32(v) => Ok(f64::from(v)),
            other => Err(type_mismatch!(TypeSignature::R8, other.type_name())),
        }
    }
}

impl FromValue for Arc<str> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            other => Err(type_mismatch!(TypeSignature::String, other.type_name())),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        Arc::<str>::from_value(value).map(|s| s.to_string())
    }
}

impl FromValue for ObjectRef {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(type_mismatch!(TypeSignature::Object, other.type_name())),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_coerce_string() {
        let value = Value::from("test value");
        assert_eq!(String::from_value(value).unwrap(), "test value");
    }

    #[test]
    fn test_coerce_mismatch() {
        let err = String::from_value(Value::I32(42)).unwrap_err();
        assert_eq!(
            err,
            Error::TypeMismatch {
                expected: "System.String".to_string(),
                found: "System.Int32".to_string(),
            }
        );
    }

    #[test]
    fn test_coerce_null() {
        assert!(String::from_value(Value::Null).is_err());
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(Value::from("x")).unwrap(),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_coerce_widening() {
        assert_eq!(i64::from_value(Value::I32(7)).unwrap(), 7);
        assert_eq!(f64::from_value(Value::I32(2)).unwrap(), 2.0);
        assert!(i32::from_value(Value::I64(7)).is_err());
    }

    #[test]
    fn test_coerce_unit() {
        assert!(<()>::from_value(Value::Void).is_ok());
        assert!(<()>::from_value(Value::I32(1)).is_err());
    }

    #[test]
    fn test_match_score() {
        let text = Value::from("a");
        assert_eq!(TypeSignature::String.match_score(&text), Some(3));
        assert_eq!(TypeSignature::String.match_score(&Value::Null), Some(1));
        assert_eq!(TypeSignature::Object.match_score(&text), Some(1));
        assert_eq!(TypeSignature::I8.match_score(&Value::I32(1)), Some(2));
        assert_eq!(TypeSignature::I4.match_score(&Value::Null), None);
        assert_eq!(TypeSignature::I4.match_score(&text), None);
    }

    #[test]
    fn test_default_values() {
        assert_eq!(TypeSignature::I4.default_value(), Value::I32(0));
        assert_eq!(TypeSignature::String.default_value(), Value::Null);
        let class = TypeSignature::Class("A.B".into());
        assert_eq!(class.default_value(), Value::Null);
    }
}
