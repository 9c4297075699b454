//! Root object type, `Number` and the boxed primitive types

use crate::args::arg;
use crate::registry::{TypeDef, TypeRegistry};
use anyhow::{anyhow, Result};
use exprvm_core::types::OBJECT;
use exprvm_core::{Primitive, TypeRef, Value};
use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Register `Object`, `Number` and the boxed types
pub fn register(registry: &mut TypeRegistry) {
    registry.insert(object());
    registry.insert(number());

    for primitive in Primitive::ALL {
        let mut def = TypeDef::new(primitive.boxed_name());
        if primitive.is_numeric() {
            def = def.extends("Number");
        }
        def = match primitive {
            Primitive::Boolean => def.method("booleanValue", vec![], TypeRef::boolean(), |receiver, _| {
                receiver
                    .as_bool()
                    .map(Value::Boolean)
                    .ok_or_else(|| anyhow!("booleanValue: expected Boolean receiver"))
            }),
            Primitive::Char => def.method("charValue", vec![], TypeRef::char(), |receiver, _| {
                receiver
                    .as_char()
                    .map(Value::Char)
                    .ok_or_else(|| anyhow!("charValue: expected Character receiver"))
            }),
            _ => def,
        };
        registry.insert(def);
    }
}

fn object() -> TypeDef {
    TypeDef::new(OBJECT)
        .method("toString", vec![], TypeRef::string(), |receiver, _| {
            Ok(Value::String(receiver.to_string()))
        })
        .method("equals", vec![TypeRef::object()], TypeRef::boolean(), |receiver, args| {
            Ok(Value::Boolean(receiver == arg(args, 0, "equals")?))
        })
        .method("hashCode", vec![], TypeRef::int(), |receiver, _| {
            Ok(Value::Int(hash_code(receiver)))
        })
}

fn number() -> TypeDef {
    TypeDef::new("Number")
        .method("intValue", vec![], TypeRef::int(), |receiver, _| {
            Ok(Value::Int(integral(receiver, "intValue")? as i32))
        })
        .method("longValue", vec![], TypeRef::long(), |receiver, _| {
            Ok(Value::Long(integral(receiver, "longValue")?))
        })
        .method("floatValue", vec![], TypeRef::float(), |receiver, _| {
            Ok(Value::Float(floating(receiver, "floatValue")? as f32))
        })
        .method("doubleValue", vec![], TypeRef::double(), |receiver, _| {
            Ok(Value::Double(floating(receiver, "doubleValue")?))
        })
}

/// Integral view of a numeric value, truncating floating point towards zero
fn integral(receiver: &Value, method: &str) -> Result<i64> {
    match receiver {
        Value::Float(n) => Ok(*n as i64),
        Value::Double(n) => Ok(*n as i64),
        other => other
            .as_i64()
            .ok_or_else(|| anyhow!("{}: expected Number receiver, got {}", method, other.type_name())),
    }
}

fn floating(receiver: &Value, method: &str) -> Result<f64> {
    receiver
        .as_f64()
        .ok_or_else(|| anyhow!("{}: expected Number receiver, got {}", method, receiver.type_name()))
}

/// Stable hash code. Strings and integers hash the way hosts usually expect
/// (polynomial base 31, identity); everything else hashes its display form.
pub(crate) fn hash_code(value: &Value) -> i32 {
    match value {
        Value::Null => 0,
        Value::Boolean(true) => 1231,
        Value::Boolean(false) => 1237,
        Value::Byte(n) => *n as i32,
        Value::Short(n) => *n as i32,
        Value::Char(c) => *c as i32,
        Value::Int(n) => *n,
        Value::Long(n) => (*n ^ ((*n as u64) >> 32) as i64) as i32,
        Value::String(s) => s
            .chars()
            .fold(0i32, |h, c| h.wrapping_mul(31).wrapping_add(c as i32)),
        other => {
            let mut hasher = FxHasher::default();
            hasher.write(other.to_string().as_bytes());
            hasher.finish() as i32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_code() {
        assert_eq!(hash_code(&Value::from("")), 0);
        assert_eq!(hash_code(&Value::from("a")), 97);
        assert_eq!(hash_code(&Value::from("hello")), 99162322);
    }

    #[test]
    fn test_number_views() {
        assert_eq!(integral(&Value::Double(3.9), "intValue").unwrap(), 3);
        assert_eq!(integral(&Value::Long(-7), "intValue").unwrap(), -7);
        assert_eq!(floating(&Value::Int(2), "doubleValue").unwrap(), 2.0);
        assert!(integral(&Value::from("x"), "intValue").is_err());
    }
}
