//! Member signatures, persisted handles and the directory trait
//!
//! The compiler and VM never look at host types directly. Everything they
//! know about members comes from a [`MemberDirectory`], which may be backed by
//! a static schema, generated dispatch tables or anything else the host has.

use crate::error::{CoreResult, InvokeError};
use crate::types::{MethodDescriptor, TypeRef};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// Whether a member with this visibility is reachable under the given flag
    pub fn permits(self, allow_private: bool) -> bool {
        allow_private || self == Visibility::Public
    }
}

/// A callable member as declared on its owner type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub owner: String,
    pub name: String,
    pub params: Vec<TypeRef>,
    pub ret: TypeRef,
    /// The last parameter is an array accepting any number of trailing arguments
    pub variadic: bool,
    pub visibility: Visibility,
}

impl MethodSignature {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        ret: TypeRef,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            params,
            ret,
            variadic: false,
            visibility: Visibility::Public,
        }
    }

    /// Mark the trailing array parameter as variadic
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn descriptor(&self) -> MethodDescriptor {
        MethodDescriptor::new(self.params.clone(), self.ret.clone(), self.variadic)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}(", self.ret, self.owner, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if self.variadic && i + 1 == self.params.len() {
                match param.element() {
                    Some(elem) => write!(f, "{}...", elem)?,
                    None => write!(f, "{}", param)?,
                }
            } else {
                write!(f, "{}", param)?;
            }
        }
        write!(f, ")")
    }
}

/// A field as declared on its owner type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSignature {
    pub owner: String,
    pub name: String,
    pub ty: TypeRef,
    pub visibility: Visibility,
}

impl FieldSignature {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ty,
            visibility: Visibility::Public,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }
}

/// Persisted reference to a resolved method.
///
/// Carries only names and a compact descriptor, so a program that was
/// compiled elsewhere can be executed without the compiler's type state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberHandle {
    owner: String,
    name: String,
    descriptor: String,
}

impl MemberHandle {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn for_method(signature: &MethodSignature) -> Self {
        Self::new(
            signature.owner.clone(),
            signature.name.clone(),
            signature.descriptor().encode(),
        )
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded descriptor string
    pub fn descriptor_str(&self) -> &str {
        &self.descriptor
    }

    /// Decoded parameter and return types
    pub fn signature(&self) -> CoreResult<MethodDescriptor> {
        MethodDescriptor::parse(&self.descriptor)
    }

    /// Whether this handle designates the given signature
    pub fn matches(&self, signature: &MethodSignature) -> bool {
        self.owner == signature.owner
            && self.name == signature.name
            && self.descriptor == signature.descriptor().encode()
    }
}

impl fmt::Display for MemberHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.owner, self.name, self.descriptor)
    }
}

/// Host capability the compiler and VM resolve members through.
pub trait MemberDirectory: Send + Sync {
    /// Direct supertypes of a reference type, in declaration order.
    /// `Object` is implied and need not be listed.
    fn supertypes(&self, type_name: &str) -> Vec<TypeRef>;

    /// Methods declared directly on `owner`, private ones included.
    fn methods(&self, owner: &str) -> Vec<MethodSignature>;

    /// Fields declared directly on `owner`, private ones included.
    fn fields(&self, owner: &str) -> Vec<FieldSignature>;

    /// Resolve a type by name, for casts.
    fn lookup_type(&self, name: &str) -> Option<TypeRef>;

    /// Invoke the method designated by `handle`.
    fn invoke(
        &self,
        handle: &MemberHandle,
        receiver: Value,
        args: Vec<Value>,
        allow_private: bool,
    ) -> Result<Value, InvokeError>;

    /// Read field `name` declared on `owner` from `receiver`.
    fn read_field(
        &self,
        owner: &str,
        name: &str,
        receiver: Value,
        allow_private: bool,
    ) -> Result<Value, InvokeError>;
}
