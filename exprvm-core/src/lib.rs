//! Core types and data structures for exprvm
//!
//! This crate provides the pieces shared by the compiler and the VM:
//! - Runtime values
//! - The static type model and compact descriptors
//! - Member signatures, handles and the `MemberDirectory` trait
//! - Overload resolution
//! - Binding environments
//! - Error types

pub mod binding;
pub mod error;
pub mod hierarchy;
pub mod member;
pub mod resolver;
pub mod types;
pub mod value;

pub use binding::{CompileBindings, RuntimeBindings};
pub use error::{CoreError, CoreResult, InvokeError, ResolveError};
pub use hierarchy::TypeHierarchy;
pub use member::{FieldSignature, MemberDirectory, MemberHandle, MethodSignature, Visibility};
pub use resolver::{resolve, resolve_field, resolve_getter, resolve_method, resolve_type, Resolution, Selection};
pub use types::{MethodDescriptor, Primitive, TypeRef};
pub use value::{ObjectValue, Value};
