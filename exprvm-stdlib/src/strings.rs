//! `CharSequence` and `String`
//!
//! Indices count Unicode scalar values, not bytes.

use crate::args::{arg, index_arg, int_arg, receiver_str, str_arg};
use crate::registry::{TypeDef, TypeRegistry};
use anyhow::{anyhow, bail, Result};
use exprvm_core::types::STRING;
use exprvm_core::{MethodSignature, TypeRef, Value};

/// Largest result, in bytes, `repeat` will build
pub const MAX_REPEAT_LEN: usize = 16 * 1024 * 1024;

/// Register `CharSequence` and `String`
pub fn register(registry: &mut TypeRegistry) {
    registry.insert(char_sequence());
    registry.insert(string());
}

fn char_sequence() -> TypeDef {
    TypeDef::new("CharSequence")
        .method("length", vec![], TypeRef::int(), length)
        .method("isEmpty", vec![], TypeRef::boolean(), is_empty)
        .method("charAt", vec![TypeRef::int()], TypeRef::char(), char_at)
}

fn string() -> TypeDef {
    let s = TypeRef::string;
    TypeDef::new(STRING)
        .extends("CharSequence")
        // Queries
        .method("length", vec![], TypeRef::int(), length)
        .method("isEmpty", vec![], TypeRef::boolean(), is_empty)
        .method("charAt", vec![TypeRef::int()], TypeRef::char(), char_at)
        .method("contains", vec![TypeRef::reference("CharSequence")], TypeRef::boolean(), contains)
        .method("startsWith", vec![s()], TypeRef::boolean(), starts_with)
        .method("endsWith", vec![s()], TypeRef::boolean(), ends_with)
        .method("indexOf", vec![s()], TypeRef::int(), index_of)
        // Slicing
        .method("substring", vec![TypeRef::int()], s(), substring_from)
        .method("substring", vec![TypeRef::int(), TypeRef::int()], s(), substring)
        // Transformations
        .method("concat", vec![s()], s(), concat)
        .method("intern", vec![], s(), |receiver, _| Ok(receiver.clone()))
        .method("trim", vec![], s(), trim)
        .method("toUpperCase", vec![], s(), to_upper_case)
        .method("toLowerCase", vec![], s(), to_lower_case)
        .method("repeat", vec![TypeRef::int()], s(), repeat)
        .method_with(
            MethodSignature::new(STRING, "formatted", vec![TypeRef::array(TypeRef::object())], s())
                .variadic(),
            formatted,
        )
}

fn length(receiver: &Value, _: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "length")?;
    Ok(Value::Int(s.chars().count() as i32))
}

fn is_empty(receiver: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::Boolean(receiver_str(receiver, "isEmpty")?.is_empty()))
}

fn char_at(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "charAt")?;
    let index = int_arg(args, 0, "charAt")?;
    usize::try_from(index)
        .ok()
        .and_then(|i| s.chars().nth(i))
        .map(Value::Char)
        .ok_or_else(|| anyhow!("charAt: index {} out of range for length {}", index, s.chars().count()))
}

fn contains(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "contains")?;
    Ok(Value::Boolean(s.contains(str_arg(args, 0, "contains")?)))
}

fn starts_with(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "startsWith")?;
    Ok(Value::Boolean(s.starts_with(str_arg(args, 0, "startsWith")?)))
}

fn ends_with(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "endsWith")?;
    Ok(Value::Boolean(s.ends_with(str_arg(args, 0, "endsWith")?)))
}

fn index_of(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "indexOf")?;
    let needle = str_arg(args, 0, "indexOf")?;
    let index = match s.find(needle) {
        Some(byte_index) => s[..byte_index].chars().count() as i32,
        None => -1,
    };
    Ok(Value::Int(index))
}

fn substring_from(receiver: &Value, args: &[Value]) -> Result<Value> {
    let chars: Vec<char> = receiver_str(receiver, "substring")?.chars().collect();
    let begin = index_arg(args, 0, chars.len(), "substring")?;
    Ok(Value::String(chars[begin..].iter().collect()))
}

fn substring(receiver: &Value, args: &[Value]) -> Result<Value> {
    let chars: Vec<char> = receiver_str(receiver, "substring")?.chars().collect();
    let begin = index_arg(args, 0, chars.len(), "substring")?;
    let end = index_arg(args, 1, chars.len(), "substring")?;
    if begin > end {
        bail!("substring: begin {} is after end {}", begin, end);
    }
    Ok(Value::String(chars[begin..end].iter().collect()))
}

fn concat(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "concat")?;
    let other = str_arg(args, 0, "concat")?;
    Ok(Value::String(format!("{}{}", s, other)))
}

fn trim(receiver: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::from(receiver_str(receiver, "trim")?.trim()))
}

fn to_upper_case(receiver: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::String(receiver_str(receiver, "toUpperCase")?.to_uppercase()))
}

fn to_lower_case(receiver: &Value, _: &[Value]) -> Result<Value> {
    Ok(Value::String(receiver_str(receiver, "toLowerCase")?.to_lowercase()))
}

fn repeat(receiver: &Value, args: &[Value]) -> Result<Value> {
    let s = receiver_str(receiver, "repeat")?;
    let count = int_arg(args, 0, "repeat")?;
    let count = usize::try_from(count).map_err(|_| anyhow!("repeat: negative count {}", count))?;
    match s.len().checked_mul(count) {
        Some(len) if len <= MAX_REPEAT_LEN => Ok(Value::String(s.repeat(count))),
        _ => bail!("repeat: {} copies of {} bytes exceed {} bytes", count, s.len(), MAX_REPEAT_LEN),
    }
}

/// `printf`-style formatting with `%s`, `%d`, `%f`, `%n` and `%%`
fn formatted(receiver: &Value, args: &[Value]) -> Result<Value> {
    let template = receiver_str(receiver, "formatted")?;
    let values = arg(args, 0, "formatted")?
        .as_array()
        .ok_or_else(|| anyhow!("formatted: expected argument array"))?;
    let mut values = values.iter();
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let conversion = chars
            .next()
            .ok_or_else(|| anyhow!("formatted: dangling '%' at end of format"))?;
        match conversion {
            '%' => out.push('%'),
            'n' => out.push('\n'),
            's' | 'd' | 'f' => {
                let value = values
                    .next()
                    .ok_or_else(|| anyhow!("formatted: missing argument for '%{}'", conversion))?;
                out.push_str(&format_one(conversion, value)?);
            }
            other => bail!("formatted: unknown conversion '%{}'", other),
        }
    }

    Ok(Value::String(out))
}

fn format_one(conversion: char, value: &Value) -> Result<String> {
    match conversion {
        'd' => value
            .as_i64()
            .map(|n| n.to_string())
            .ok_or_else(|| anyhow!("formatted: '%d' needs an integral value, got {}", value.type_name())),
        'f' => match value {
            Value::Float(_) | Value::Double(_) => Ok(format!("{:.6}", value.as_f64().unwrap_or_default())),
            _ => bail!("formatted: '%f' needs a floating point value, got {}", value.type_name()),
        },
        _ => Ok(value.to_string()),
    }
}
