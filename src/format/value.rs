//! Dynamic model of call arguments and results.

use std::fmt::Display;

use serde::Serialize;

/// A call argument or result as the formatter sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (`None`, `()`).
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    /// String-typed value; always rendered quoted.
    Str(String),
    /// Text form of any other value.
    Object(String),
    /// Homogeneous array of primitives.
    Primitives(PrimitiveArray),
    /// Array of arbitrary values, possibly nested.
    Array(Vec<Value>),
    /// An array whose element type has no textual form.
    Opaque,
}

/// Arrays of primitive elements, kept typed so each element renders in
/// its own default form.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveArray {
    Bool(Vec<bool>),
    Char(Vec<char>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl Value {
    /// Wrap any displayable value as an object.
    pub fn display(value: impl Display) -> Self {
        Value::Object(value.to_string())
    }

    /// Render a serializable value through its JSON form.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(text) => Value::Object(text),
            Err(_) => Value::Opaque,
        }
    }
}

/// Conversion into a [`Value`] for formatting.
///
/// Primitive types override [`ToValue::slice_to_value`] so that slices of
/// them become [`Value::Primitives`] instead of a generic array.
pub trait ToValue {
    fn to_value(&self) -> Value;

    #[doc(hidden)]
    fn slice_to_value(items: &[Self]) -> Value
    where
        Self: Sized,
    {
        Value::Array(items.iter().map(ToValue::to_value).collect())
    }
}

macro_rules! primitive_to_value {
    ($($ty:ty => $scalar:expr, $array:ident;)*) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    $scalar(*self)
                }

                fn slice_to_value(items: &[Self]) -> Value {
                    Value::Primitives(PrimitiveArray::$array(items.to_vec()))
                }
            }
        )*
    };
}

primitive_to_value! {
    bool => Value::Bool, Bool;
    char => Value::Char, Char;
    i8 => |v| Value::Int(i64::from(v)), I8;
    i16 => |v| Value::Int(i64::from(v)), I16;
    i32 => |v| Value::Int(i64::from(v)), I32;
    i64 => Value::Int, I64;
    u8 => |v| Value::UInt(u64::from(v)), U8;
    u16 => |v| Value::UInt(u64::from(v)), U16;
    u32 => |v| Value::UInt(u64::from(v)), U32;
    u64 => Value::UInt, U64;
    f32 => Value::F32, F32;
    f64 => Value::F64, F64;
}

impl ToValue for isize {
    fn to_value(&self) -> Value {
        Value::Int(*self as i64)
    }
}

impl ToValue for usize {
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }
}

impl ToValue for i128 {
    fn to_value(&self) -> Value {
        Value::display(self)
    }
}

impl ToValue for u128 {
    fn to_value(&self) -> Value {
        Value::display(self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for std::sync::Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// Build the argument list of a monitored call.
///
/// ```
/// use loggable::{args, Value};
///
/// let values = args!["str", 10];
/// assert_eq!(values, vec![Value::Str("str".into()), Value::Int(10)]);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::ToValue::to_value(&$arg)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_slices_stay_typed() {
        assert_eq!(
            vec![1i32, 2, 3].to_value(),
            Value::Primitives(PrimitiveArray::I32(vec![1, 2, 3]))
        );
        assert_eq!(
            [true, false].to_value(),
            Value::Primitives(PrimitiveArray::Bool(vec![true, false]))
        );
    }

    #[test]
    fn test_object_slices_become_arrays() {
        assert_eq!(
            vec!["a", "b"].to_value(),
            Value::Array(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
        assert_eq!(
            vec![vec![1u8], vec![2u8]].to_value(),
            Value::Array(vec![
                Value::Primitives(PrimitiveArray::U8(vec![1])),
                Value::Primitives(PrimitiveArray::U8(vec![2])),
            ])
        );
    }

    #[test]
    fn test_option_and_unit_are_null() {
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Some(5u16).to_value(), Value::UInt(5));
        assert_eq!(().to_value(), Value::Null);
    }

    #[test]
    fn test_json_objects() {
        #[derive(Serialize)]
        struct Sku {
            id: u32,
        }
        assert_eq!(Value::json(&Sku { id: 7 }), Value::Object("{\"id\":7}".into()));
    }
}
