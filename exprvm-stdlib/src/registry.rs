//! Type registry backing the builtin library and host record types

use anyhow::{bail, Result};
use exprvm_core::types::OBJECT;
use exprvm_core::{
    CoreError, FieldSignature, InvokeError, MemberDirectory, MemberHandle, MethodSignature,
    TypeHierarchy, TypeRef, Value,
};
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Native method body: receives the receiver and the (already packed) arguments
pub type NativeMethod = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

/// A method declared on a type, together with its implementation
#[derive(Clone)]
pub struct MethodDef {
    pub signature: MethodSignature,
    pub func: NativeMethod,
}

impl MethodDef {
    /// Call the body after checking the argument count
    pub fn call(&self, receiver: &Value, args: &[Value]) -> Result<Value> {
        if args.len() != self.signature.arity() {
            bail!(
                "{}: expected {} arguments, got {}",
                self.signature.name,
                self.signature.arity(),
                args.len()
            );
        }
        (self.func)(receiver, args)
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Definition of a reference type: supertypes, methods and fields
#[derive(Debug, Clone)]
pub struct TypeDef {
    name: String,
    supertypes: Vec<TypeRef>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldSignature>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a direct supertype
    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(TypeRef::reference(supertype));
        self
    }

    /// Add a public method
    pub fn method<F>(self, name: &str, params: Vec<TypeRef>, ret: TypeRef, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let signature = MethodSignature::new(self.name.clone(), name, params, ret);
        self.method_with(signature, func)
    }

    /// Add a method from a full signature, keeping its visibility and
    /// variadic flag. The owner is always this type.
    pub fn method_with<F>(mut self, mut signature: MethodSignature, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        signature.owner = self.name.clone();
        self.methods.push(MethodDef {
            signature,
            func: Arc::new(func),
        });
        self
    }

    /// Add a public field, read from the receiver object's field of the same name
    pub fn field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields.push(FieldSignature::new(self.name.clone(), name, ty));
        self
    }

    pub fn private_field(mut self, name: &str, ty: TypeRef) -> Self {
        self.fields
            .push(FieldSignature::new(self.name.clone(), name, ty).private());
        self
    }

    /// Add a private field `name` and a public `get<Name>()` accessor for it
    pub fn getter(self, name: &str, ty: TypeRef) -> Self {
        let field = name.to_string();
        let mut chars = name.chars();
        let accessor = match chars.next() {
            Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
            None => "get".to_string(),
        };
        self.private_field(name, ty.clone())
            .method(&accessor, vec![], ty, move |receiver, _| {
                read_object_field(receiver, &field)
            })
    }

    pub fn supertypes(&self) -> &[TypeRef] {
        &self.supertypes
    }

    pub fn methods(&self) -> &[MethodDef] {
        &self.methods
    }

    pub fn fields(&self) -> &[FieldSignature] {
        &self.fields
    }
}

fn read_object_field(receiver: &Value, name: &str) -> Result<Value> {
    let Some(object) = receiver.as_object() else {
        bail!("{} has no fields", receiver.type_name());
    };
    match object.field(name) {
        Some(value) => Ok(value.clone()),
        None => bail!("{} has no value for field {}", object.type_name(), name),
    }
}

fn check_def(def: &TypeDef) -> Result<(), CoreError> {
    check_type_name(&def.name)?;
    let signatures = def
        .methods
        .iter()
        .flat_map(|m| m.signature.params.iter().chain(std::iter::once(&m.signature.ret)));
    def.supertypes
        .iter()
        .chain(def.fields.iter().map(|f| &f.ty))
        .chain(signatures)
        .try_for_each(check_type_ref)
}

fn check_type_ref(ty: &TypeRef) -> Result<(), CoreError> {
    match ty {
        TypeRef::Reference(name) => check_type_name(name),
        TypeRef::Array(element) => check_type_ref(element),
        _ => Ok(()),
    }
}

fn check_type_name(name: &str) -> Result<(), CoreError> {
    match TypeRef::parse_name(name) {
        Ok(TypeRef::Reference(parsed)) if parsed == name => Ok(()),
        _ => Err(CoreError::InvalidTypeName(name.to_string())),
    }
}

/// A static-schema [`MemberDirectory`].
///
/// Methods are dispatched on the receiver's run-time type: an override in
/// a subtype wins over the declaration the handle was compiled against.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: FxHashMap<String, TypeDef>,
}

impl TypeRegistry {
    /// Create an empty registry (no builtin types)
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous definition with the same name.
    ///
    /// Every type name the definition mentions must be usable in a
    /// descriptor: no whitespace, `;`, `[`, `(` or `)`, and not a primitive.
    pub fn register(&mut self, def: TypeDef) -> Result<(), CoreError> {
        check_def(&def)?;
        self.insert(def);
        Ok(())
    }

    pub fn register_all(&mut self, defs: Vec<TypeDef>) -> Result<(), CoreError> {
        defs.into_iter().try_for_each(|def| self.register(def))
    }

    pub fn with_type(mut self, def: TypeDef) -> Result<Self, CoreError> {
        self.register(def)?;
        Ok(self)
    }

    /// Builtin definitions use constant names and skip the checks
    pub(crate) fn insert(&mut self, def: TypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    fn method_def(&self, handle: &MemberHandle) -> Option<&MethodDef> {
        self.types
            .get(handle.owner())?
            .methods
            .iter()
            .find(|m| handle.matches(&m.signature))
    }

    /// Most derived implementation of `declared` for a receiver of `runtime` type
    fn dispatch<'a>(&'a self, declared: &'a MethodDef, runtime: &TypeRef) -> &'a MethodDef {
        let hierarchy = TypeHierarchy::new(self);
        for ty in hierarchy.closure(runtime) {
            let Some(def) = ty.reference_name().and_then(|name| self.types.get(name)) else {
                continue;
            };
            if def.name == declared.signature.owner {
                break;
            }
            let found = def.methods.iter().find(|m| {
                m.signature.name == declared.signature.name
                    && m.signature.params == declared.signature.params
                    && m.signature.visibility == declared.signature.visibility
            });
            if let Some(method) = found {
                return method;
            }
        }
        declared
    }

    fn check_receiver(&self, owner: &str, receiver: &Value, member: &str) -> Result<(), InvokeError> {
        if receiver.is_null() {
            return Err(InvokeError::NullReceiver {
                member: member.to_string(),
            });
        }
        let expected = TypeRef::reference(owner);
        let actual = receiver.runtime_type();
        if !TypeHierarchy::new(self).is_assignable(&expected, &actual) {
            return Err(InvokeError::ReceiverMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }
}

impl MemberDirectory for TypeRegistry {
    fn supertypes(&self, type_name: &str) -> Vec<TypeRef> {
        self.types
            .get(type_name)
            .map(|def| def.supertypes.clone())
            .unwrap_or_default()
    }

    fn methods(&self, owner: &str) -> Vec<MethodSignature> {
        self.types
            .get(owner)
            .map(|def| def.methods.iter().map(|m| m.signature.clone()).collect())
            .unwrap_or_default()
    }

    fn fields(&self, owner: &str) -> Vec<FieldSignature> {
        self.types
            .get(owner)
            .map(|def| def.fields.clone())
            .unwrap_or_default()
    }

    fn lookup_type(&self, name: &str) -> Option<TypeRef> {
        let ty = TypeRef::parse_name(name).ok()?;
        let mut base = &ty;
        while let Some(element) = base.element() {
            base = element;
        }
        match base {
            TypeRef::Reference(name) if name != OBJECT && !self.types.contains_key(name) => None,
            TypeRef::Void | TypeRef::Null => None,
            _ => Some(ty),
        }
    }

    fn invoke(
        &self,
        handle: &MemberHandle,
        receiver: Value,
        args: Vec<Value>,
        allow_private: bool,
    ) -> Result<Value, InvokeError> {
        let member = handle.to_string();
        let declared = self
            .method_def(handle)
            .ok_or_else(|| InvokeError::NotFound {
                member: member.clone(),
            })?;
        if !declared.signature.visibility.permits(allow_private) {
            return Err(InvokeError::AccessDenied { member });
        }
        self.check_receiver(handle.owner(), &receiver, &member)?;

        let method = self.dispatch(declared, &receiver.runtime_type());
        trace!("invoke {} on {}", method.signature, receiver.type_name());
        method
            .call(&receiver, &args)
            .map_err(|err| InvokeError::target(member, err))
    }

    fn read_field(
        &self,
        owner: &str,
        name: &str,
        receiver: Value,
        allow_private: bool,
    ) -> Result<Value, InvokeError> {
        let member = format!("{}.{}", owner, name);
        let field = self
            .types
            .get(owner)
            .and_then(|def| def.fields.iter().find(|f| f.name == name))
            .ok_or_else(|| InvokeError::NotFound {
                member: member.clone(),
            })?;
        if !field.visibility.permits(allow_private) {
            return Err(InvokeError::AccessDenied { member });
        }
        self.check_receiver(owner, &receiver, &member)?;
        read_object_field(&receiver, name).map_err(|err| InvokeError::target(member, err))
    }
}
