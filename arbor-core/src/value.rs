//! Argument and property values.
//!
//! Request arguments, persistent properties and template variables all share
//! one loosely typed [`Value`]. Component fields convert to and from it
//! through [`PropertyValue`].

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// An argument bag: argument key to value, ordered by key.
pub type Params = BTreeMap<String, Value>;

/// A loosely typed argument or property value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Name of the value kind, used in conversion errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean payload.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// A value could not be converted into a property's field type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected {expected} value, found {found}")]
pub struct ValueError {
    /// Kind the field needs.
    pub expected: &'static str,
    /// Kind that was supplied.
    pub found: &'static str,
}

impl ValueError {
    fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind(),
        }
    }
}

/// Conversion between a component field and a [`Value`].
///
/// Request arguments usually arrive as strings, so the numeric and boolean
/// impls also accept their string spellings.
pub trait PropertyValue: Sized {
    /// Snapshot the field as a value.
    fn to_value(&self) -> Value;

    /// Convert an incoming value into the field type.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

impl PropertyValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        Ok(value)
    }
}

impl PropertyValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Str(s) => Ok(s),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(value.to_string()),
            other => Err(ValueError::new("string", &other)),
        }
    }
}

impl PropertyValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match &value {
            Value::Bool(b) => Ok(*b),
            Value::Int(0) => Ok(false),
            Value::Int(1) => Ok(true),
            Value::Str(s) => match s.as_str() {
                "1" | "true" => Ok(true),
                "" | "0" | "false" => Ok(false),
                _ => Err(ValueError::new("bool", &value)),
            },
            _ => Err(ValueError::new("bool", &value)),
        }
    }
}

impl PropertyValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match &value {
            Value::Int(i) => Ok(*i),
            Value::Str(s) => s.parse().map_err(|_| ValueError::new("int", &value)),
            _ => Err(ValueError::new("int", &value)),
        }
    }
}

macro_rules! impl_property_value_int {
    ($($T:ty),+) => {
        $(
            impl PropertyValue for $T {
                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, ValueError> {
                    let found = value.kind();
                    let wide = i64::from_value(value)?;
                    <$T>::try_from(wide).map_err(|_| ValueError {
                        expected: stringify!($T),
                        found,
                    })
                }
            }
        )+
    };
}

impl_property_value_int!(i32, u32, u16, u8);

impl PropertyValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match &value {
            Value::Float(x) => Ok(*x),
            #[allow(clippy::cast_precision_loss)]
            Value::Int(i) => Ok(*i as f64),
            Value::Str(s) => s.parse().map_err(|_| ValueError::new("float", &value)),
            _ => Err(ValueError::new("float", &value)),
        }
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, PropertyValue::to_value)
    }

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_strings_convert_to_scalars() {
        assert_eq!(i64::from_value(Value::from("42")), Ok(42));
        assert_eq!(u8::from_value(Value::from("7")), Ok(7));
        assert_eq!(bool::from_value(Value::from("1")), Ok(true));
        assert_eq!(bool::from_value(Value::from("")), Ok(false));
    }

    #[test]
    fn mismatched_kinds_report_both_sides() {
        let err = i64::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(err.expected, "int");
        assert_eq!(err.found, "bool");

        let err = u8::from_value(Value::Int(300)).unwrap_err();
        assert_eq!(err.expected, "u8");
    }

    #[test]
    fn optional_fields_accept_null() {
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(
            Option::<String>::from_value(Value::from("x")),
            Ok(Some("x".to_string()))
        );
        assert_eq!(Some(3_i64).to_value(), Value::Int(3));
    }

    #[test]
    fn display_flattens_lists() {
        let v = Value::from(vec![1_i64, 2, 3]);
        assert_eq!(v.to_string(), "1,2,3");
        assert_eq!(Value::Null.to_string(), "");
    }
}
