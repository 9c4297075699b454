//! exprvm standard type library
//!
//! Provides [`TypeRegistry`], a [`MemberDirectory`](exprvm_core::MemberDirectory)
//! built from static type definitions, and the builtin types every host gets:
//! `Object`, `CharSequence`, `String`, `Number` and the boxed primitives.
//! Hosts add their own record types with [`TypeDef`].

mod args;
pub mod lang;
pub mod registry;
pub mod strings;

pub use registry::{MethodDef, NativeMethod, TypeDef, TypeRegistry};

/// Initialize the builtin library and return a populated registry
pub fn init_stdlib() -> TypeRegistry {
    let mut registry = TypeRegistry::new();

    lang::register(&mut registry);
    strings::register(&mut registry);

    registry
}
