//! Compile-time and run-time binding environments
//!
//! Both are frozen once built: there is no way to add or change a binding
//! after `build()`, so a single environment can be shared freely between
//! compilations or executions.

use crate::types::TypeRef;
use crate::value::Value;
use rustc_hash::FxHashMap;

/// Declared variable types plus the private-access flag, consumed by the compiler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileBindings {
    variables: FxHashMap<String, TypeRef>,
    allow_private: bool,
}

impl CompileBindings {
    pub fn builder() -> CompileBindingsBuilder {
        CompileBindingsBuilder::default()
    }

    /// Declared type of a variable
    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn allow_private(&self) -> bool {
        self.allow_private
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct CompileBindingsBuilder {
    variables: FxHashMap<String, TypeRef>,
    allow_private: bool,
}

impl CompileBindingsBuilder {
    /// Declare a variable; a later declaration of the same name replaces it
    pub fn with_variable(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.variables.insert(name.into(), ty);
        self
    }

    /// Let the compiler consider private members
    pub fn with_allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    pub fn build(self) -> CompileBindings {
        CompileBindings {
            variables: self.variables,
            allow_private: self.allow_private,
        }
    }
}

/// Variable values plus the private-access flag, consumed by the VM
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeBindings {
    variables: FxHashMap<String, Value>,
    allow_private: bool,
}

impl RuntimeBindings {
    pub fn builder() -> RuntimeBindingsBuilder {
        RuntimeBindingsBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Whether private members may be invoked or read
    pub fn allow_private(&self) -> bool {
        self.allow_private
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RuntimeBindingsBuilder {
    variables: FxHashMap<String, Value>,
    allow_private: bool,
}

impl RuntimeBindingsBuilder {
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_allow_private(mut self, allow: bool) -> Self {
        self.allow_private = allow;
        self
    }

    pub fn build(self) -> RuntimeBindings {
        RuntimeBindings {
            variables: self.variables,
            allow_private: self.allow_private,
        }
    }
}
