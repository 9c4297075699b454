//! Supertype closure and assignability over a member directory

use crate::member::{FieldSignature, MemberDirectory, MethodSignature};
use crate::types::{TypeRef, OBJECT};
use rustc_hash::FxHashSet;

/// Type relations as seen through a [`MemberDirectory`]
#[derive(Clone, Copy)]
pub struct TypeHierarchy<'a> {
    directory: &'a dyn MemberDirectory,
}

impl<'a> TypeHierarchy<'a> {
    pub fn new(directory: &'a dyn MemberDirectory) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &'a dyn MemberDirectory {
        self.directory
    }

    /// The type followed by all of its supertypes, depth first in declaration
    /// order, without duplicates. Reference and array types end with `Object`.
    pub fn closure(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let mut out = Vec::new();
        let mut seen = FxHashSet::default();
        self.collect(ty, &mut out, &mut seen);
        if matches!(ty, TypeRef::Reference(_) | TypeRef::Array(_)) {
            let object = TypeRef::object();
            if seen.insert(object.clone()) {
                out.push(object);
            }
        }
        out
    }

    fn collect(&self, ty: &TypeRef, out: &mut Vec<TypeRef>, seen: &mut FxHashSet<TypeRef>) {
        if !seen.insert(ty.clone()) {
            return;
        }
        out.push(ty.clone());
        if let TypeRef::Reference(name) = ty {
            for parent in self.directory.supertypes(name) {
                self.collect(&parent, out, seen);
            }
        }
    }

    /// Whether a value of type `source` can be used where `target` is expected.
    /// There is no primitive widening and no implicit boxing here.
    pub fn is_assignable(&self, target: &TypeRef, source: &TypeRef) -> bool {
        if target == source {
            return true;
        }
        match (target, source) {
            (TypeRef::Reference(_) | TypeRef::Array(_), TypeRef::Null) => true,
            (TypeRef::Reference(name), TypeRef::Reference(_) | TypeRef::Array(_)) if name == OBJECT => true,
            (TypeRef::Reference(_), TypeRef::Reference(_)) => self.closure(source).contains(target),
            (TypeRef::Array(t), TypeRef::Array(s)) => {
                t.is_reference() && s.is_reference() && self.is_assignable(t, s)
            }
            _ => false,
        }
    }

    /// Whether every parameter accepts the corresponding argument
    pub fn all_assignable(&self, params: &[TypeRef], args: &[TypeRef]) -> bool {
        params.len() == args.len()
            && params
                .iter()
                .zip(args)
                .all(|(param, arg)| self.is_assignable(param, arg))
    }

    /// Every method reachable on `owner`, most-derived first.
    ///
    /// Private members are only included when `allow_private` is set. A
    /// method whose name and parameters repeat one already collected from a
    /// more derived type is an override and is skipped.
    pub fn methods(&self, owner: &TypeRef, allow_private: bool) -> Vec<MethodSignature> {
        let mut out: Vec<MethodSignature> = Vec::new();
        for ty in self.closure(owner) {
            let Some(name) = ty.reference_name() else {
                continue;
            };
            for method in self.directory.methods(name) {
                if !method.visibility.permits(allow_private) {
                    continue;
                }
                let overridden = out
                    .iter()
                    .any(|m| m.name == method.name && m.params == method.params);
                if !overridden {
                    out.push(method);
                }
            }
        }
        out
    }

    /// Every field reachable on `owner`, most-derived first.
    pub fn fields(&self, owner: &TypeRef, allow_private: bool) -> Vec<FieldSignature> {
        self.closure(owner)
            .iter()
            .filter_map(|ty| ty.reference_name())
            .flat_map(|name| self.directory.fields(name))
            .filter(|field| field.visibility.permits(allow_private))
            .collect()
    }
}
