//! Text rendering of arguments and results.

use std::fmt::{self, Write};

use crate::format::value::{PrimitiveArray, Value};

/// Rendered for absent values.
pub const NULL: &str = "NULL";

/// Rendered for arrays whose element type has no textual form.
pub const UNKNOWN: &str = "[unknown]";

/// Render a single value.
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_value(&mut out, value);
    out
}

/// Render an argument list as a bracketed array, e.g. `['str', 10]`.
pub fn format_args(args: &[Value]) -> String {
    let mut out = String::new();
    let _ = write_array(&mut out, args.iter(), write_value);
    out
}

fn write_value(out: &mut String, value: &Value) -> fmt::Result {
    match value {
        Value::Null => out.write_str(NULL),
        Value::Bool(v) => write!(out, "{v}"),
        Value::Char(v) => write!(out, "{v}"),
        Value::Int(v) => write!(out, "{v}"),
        Value::UInt(v) => write!(out, "{v}"),
        Value::F32(v) => write!(out, "{v:?}"),
        Value::F64(v) => write!(out, "{v:?}"),
        Value::Str(text) => write!(out, "'{text}'"),
        Value::Object(text) if text.is_empty() => out.write_str("''"),
        Value::Object(text) => out.write_str(text),
        Value::Primitives(array) => write_primitives(out, array),
        Value::Array(items) => write_array(out, items.iter(), write_value),
        Value::Opaque => out.write_str(UNKNOWN),
    }
}

fn write_primitives(out: &mut String, array: &PrimitiveArray) -> fmt::Result {
    fn display<T: fmt::Display>(out: &mut String, v: &T) -> fmt::Result {
        write!(out, "{v}")
    }
    // Floats keep a fractional part (`1.0`), which Debug gives us.
    fn debug<T: fmt::Debug>(out: &mut String, v: &T) -> fmt::Result {
        write!(out, "{v:?}")
    }

    match array {
        PrimitiveArray::Bool(items) => write_array(out, items.iter(), display),
        PrimitiveArray::Char(items) => write_array(out, items.iter(), display),
        PrimitiveArray::I8(items) => write_array(out, items.iter(), display),
        PrimitiveArray::I16(items) => write_array(out, items.iter(), display),
        PrimitiveArray::I32(items) => write_array(out, items.iter(), display),
        PrimitiveArray::I64(items) => write_array(out, items.iter(), display),
        PrimitiveArray::U8(items) => write_array(out, items.iter(), display),
        PrimitiveArray::U16(items) => write_array(out, items.iter(), display),
        PrimitiveArray::U32(items) => write_array(out, items.iter(), display),
        PrimitiveArray::U64(items) => write_array(out, items.iter(), display),
        PrimitiveArray::F32(items) => write_array(out, items.iter(), debug),
        PrimitiveArray::F64(items) => write_array(out, items.iter(), debug),
    }
}

fn write_array<'a, T: 'a>(
    out: &mut String,
    items: impl Iterator<Item = &'a T>,
    mut write_item: impl FnMut(&mut String, &T) -> fmt::Result,
) -> fmt::Result {
    out.push('[');
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_item(out, item)?;
    }
    out.push(']');
    Ok(())
}
