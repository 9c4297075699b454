//! Static type model
//!
//! Types are what the compiler threads through a parse: every value-producing
//! instruction gets one. They are also the unit of the compact descriptor
//! format used to persist member handles:
//!
//! | Type        | Descriptor    |
//! |-------------|---------------|
//! | `boolean`   | `Z`           |
//! | `byte`      | `B`           |
//! | `char`      | `C`           |
//! | `short`     | `S`           |
//! | `int`       | `I`           |
//! | `long`      | `J`           |
//! | `float`     | `F`           |
//! | `double`    | `D`           |
//! | `void`      | `V`           |
//! | null type   | `N`           |
//! | `Name`      | `LName;`      |
//! | `T[]`       | `[T`          |
//!
//! A method descriptor is `(` params `)` return, with a `*` in front of a
//! trailing variadic parameter: `(*[LObject;)LString;`.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Name of the implicit root of every reference type.
pub const OBJECT: &str = "Object";
/// Name of the builtin string type.
pub const STRING: &str = "String";

/// Primitive value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
    ];

    /// Source-level name (`int`, `boolean`, ...)
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// Name of the boxed reference type
    pub fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Char => "Character",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
        }
    }

    /// Whether the boxed type is a `Number`
    pub fn is_numeric(self) -> bool {
        !matches!(self, Primitive::Boolean | Primitive::Char)
    }

    pub fn descriptor(self) -> char {
        match self {
            Primitive::Boolean => 'Z',
            Primitive::Byte => 'B',
            Primitive::Char => 'C',
            Primitive::Short => 'S',
            Primitive::Int => 'I',
            Primitive::Long => 'J',
            Primitive::Float => 'F',
            Primitive::Double => 'D',
        }
    }

    pub fn from_descriptor(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.descriptor() == c)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }
}

/// A static type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// Return type of members that produce no value
    Void,
    /// Type of the `null` literal
    Null,
    /// Primitive value type
    Primitive(Primitive),
    /// Named reference type, resolved through a member directory
    Reference(String),
    /// Array of the element type
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn primitive(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeRef::Reference(name.into())
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn object() -> Self {
        TypeRef::reference(OBJECT)
    }

    pub fn string() -> Self {
        TypeRef::reference(STRING)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(Primitive::Boolean)
    }

    pub fn int() -> Self {
        TypeRef::Primitive(Primitive::Int)
    }

    pub fn long() -> Self {
        TypeRef::Primitive(Primitive::Long)
    }

    pub fn float() -> Self {
        TypeRef::Primitive(Primitive::Float)
    }

    pub fn double() -> Self {
        TypeRef::Primitive(Primitive::Double)
    }

    pub fn char() -> Self {
        TypeRef::Primitive(Primitive::Char)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }

    /// True for types whose values are references (including arrays and null)
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Reference(_) | TypeRef::Array(_) | TypeRef::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, TypeRef::Reference(name) if name == OBJECT)
    }

    pub fn reference_name(&self) -> Option<&str> {
        match self {
            TypeRef::Reference(name) => Some(name),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// Replace a primitive with its boxed reference equivalent
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::reference(p.boxed_name()),
            other => other.clone(),
        }
    }

    /// Parse a source-level type name: `int`, `String`, `String[]`, `void`
    pub fn parse_name(name: &str) -> CoreResult<TypeRef> {
        let name = name.trim();
        if let Some(inner) = name.strip_suffix("[]") {
            return Ok(TypeRef::array(TypeRef::parse_name(inner)?));
        }
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || matches!(c, ';' | '[' | '(' | ')')) {
            return Err(CoreError::InvalidTypeName(name.to_string()));
        }
        Ok(match name {
            "void" => TypeRef::Void,
            "null" => TypeRef::Null,
            _ => match Primitive::from_name(name) {
                Some(p) => TypeRef::Primitive(p),
                None => TypeRef::reference(name),
            },
        })
    }

    /// Encode as a compact descriptor
    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    fn write_descriptor(&self, out: &mut String) {
        match self {
            TypeRef::Void => out.push('V'),
            TypeRef::Null => out.push('N'),
            TypeRef::Primitive(p) => out.push(p.descriptor()),
            TypeRef::Reference(name) => {
                out.push('L');
                out.push_str(name);
                out.push(';');
            }
            TypeRef::Array(elem) => {
                out.push('[');
                elem.write_descriptor(out);
            }
        }
    }

    /// Decode a single-type descriptor; trailing input is an error
    pub fn parse_descriptor(descriptor: &str) -> CoreResult<TypeRef> {
        let mut chars = descriptor.chars().peekable();
        let ty = parse_one(descriptor, &mut chars)?;
        if chars.next().is_some() {
            return Err(malformed(descriptor, "trailing characters"));
        }
        Ok(ty)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => write!(f, "void"),
            TypeRef::Null => write!(f, "null"),
            TypeRef::Primitive(p) => write!(f, "{}", p.name()),
            TypeRef::Reference(name) => write!(f, "{}", name),
            TypeRef::Array(elem) => write!(f, "{}[]", elem),
        }
    }
}

impl From<Primitive> for TypeRef {
    fn from(p: Primitive) -> Self {
        TypeRef::Primitive(p)
    }
}

fn malformed(descriptor: &str, reason: &str) -> CoreError {
    CoreError::MalformedDescriptor {
        descriptor: descriptor.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_one(descriptor: &str, chars: &mut Peekable<Chars<'_>>) -> CoreResult<TypeRef> {
    let c = chars
        .next()
        .ok_or_else(|| malformed(descriptor, "unexpected end"))?;
    match c {
        'V' => Ok(TypeRef::Void),
        'N' => Ok(TypeRef::Null),
        '[' => Ok(TypeRef::array(parse_one(descriptor, chars)?)),
        'L' => {
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some(';') => break,
                    Some(c) => name.push(c),
                    None => return Err(malformed(descriptor, "unterminated reference type")),
                }
            }
            if name.is_empty() {
                return Err(malformed(descriptor, "empty reference type name"));
            }
            Ok(TypeRef::Reference(name))
        }
        other => Primitive::from_descriptor(other)
            .map(TypeRef::Primitive)
            .ok_or_else(|| malformed(descriptor, &format!("unknown type code '{}'", other))),
    }
}

/// Parameter and return types of a method, as persisted in a member handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub params: Vec<TypeRef>,
    pub ret: TypeRef,
    /// The last parameter is an array that accepts a variable argument count
    pub variadic: bool,
}

impl MethodDescriptor {
    pub fn new(params: Vec<TypeRef>, ret: TypeRef, variadic: bool) -> Self {
        Self { params, ret, variadic }
    }

    pub fn encode(&self) -> String {
        let mut out = String::from("(");
        let last = self.params.len().saturating_sub(1);
        for (i, param) in self.params.iter().enumerate() {
            if self.variadic && i == last {
                out.push('*');
            }
            param.write_descriptor(&mut out);
        }
        out.push(')');
        self.ret.write_descriptor(&mut out);
        out
    }

    pub fn parse(descriptor: &str) -> CoreResult<Self> {
        let mut chars = descriptor.chars().peekable();
        if chars.next() != Some('(') {
            return Err(malformed(descriptor, "expected '('"));
        }
        let mut params = Vec::new();
        let mut variadic = false;
        loop {
            match chars.peek() {
                Some(')') => {
                    chars.next();
                    break;
                }
                Some('*') => {
                    chars.next();
                    let param = parse_one(descriptor, &mut chars)?;
                    if !matches!(param, TypeRef::Array(_)) || chars.peek() != Some(&')') {
                        return Err(malformed(
                            descriptor,
                            "variadic marker must precede a trailing array parameter",
                        ));
                    }
                    variadic = true;
                    params.push(param);
                }
                Some(_) => params.push(parse_one(descriptor, &mut chars)?),
                None => return Err(malformed(descriptor, "expected ')'")),
            }
        }
        let ret = parse_one(descriptor, &mut chars)?;
        if chars.next().is_some() {
            return Err(malformed(descriptor, "trailing characters"));
        }
        Ok(Self { params, ret, variadic })
    }
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
