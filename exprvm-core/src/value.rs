//! Runtime value representation

use crate::types::{Primitive, TypeRef, STRING};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// Runtime value types
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The null reference
    Null,

    Boolean(bool),

    Byte(i8),

    Char(char),

    Short(i16),

    Int(i32),

    Long(i64),

    Float(f32),

    Double(f64),

    /// String value
    String(String),

    /// Array of values (also used to pack variadic arguments)
    Array(Vec<Value>),

    /// Host record
    Object(Arc<ObjectValue>),
}

/// A host record: a declared type name plus its field values
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    type_name: String,
    fields: FxHashMap<String, Value>,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: FxHashMap::default(),
        }
    }

    /// Set a field, returning the record for chaining
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Dynamic type of the value. Primitives report their boxed type.
    pub fn runtime_type(&self) -> TypeRef {
        match self {
            Value::Null => TypeRef::Null,
            Value::Boolean(_) => TypeRef::boolean().boxed(),
            Value::Byte(_) => TypeRef::Primitive(Primitive::Byte).boxed(),
            Value::Char(_) => TypeRef::char().boxed(),
            Value::Short(_) => TypeRef::Primitive(Primitive::Short).boxed(),
            Value::Int(_) => TypeRef::int().boxed(),
            Value::Long(_) => TypeRef::long().boxed(),
            Value::Float(_) => TypeRef::float().boxed(),
            Value::Double(_) => TypeRef::double().boxed(),
            Value::String(_) => TypeRef::reference(STRING),
            Value::Array(_) => TypeRef::array(TypeRef::object()),
            Value::Object(obj) => TypeRef::reference(obj.type_name()),
        }
    }

    /// Human readable type name for error messages
    pub fn type_name(&self) -> String {
        self.runtime_type().to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Integral value, widened to i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(*n as i64),
            Value::Short(n) => Some(*n as i64),
            Value::Int(n) => Some(*n as i64),
            Value::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Any numeric value, widened to f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

fn fmt_floating(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        write!(f, "{:.1}", n)
    } else {
        write!(f, "{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => fmt_floating(f, *n as f64),
            Value::Double(n) => fmt_floating(f, *n),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Object(obj) => {
                let mut fields: Vec<_> = obj.fields().collect();
                fields.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{}{{", obj.type_name())?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", name, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i8> for Value {
    fn from(n: i8) -> Self {
        Value::Byte(n)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::Short(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Double(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<ObjectValue> for Value {
    fn from(obj: ObjectValue) -> Self {
        Value::Object(Arc::new(obj))
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
