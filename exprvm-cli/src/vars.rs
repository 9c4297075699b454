//! Variables given on the command line
//!
//! `--var name=value` binds a run-time value; `--var name:Type` only
//! declares a static type, which is all `compile` needs.

use anyhow::{anyhow, bail, Result};
use exprvm_core::{CompileBindings, MemberDirectory, RuntimeBindings, TypeRef, Value};
use exprvm_parser::Literal;

/// A parsed `--var` argument
#[derive(Debug, Clone, PartialEq)]
pub enum VarArg {
    Declared { name: String, ty: TypeRef },
    Bound { name: String, value: Value },
}

impl VarArg {
    pub fn name(&self) -> &str {
        match self {
            VarArg::Declared { name, .. } | VarArg::Bound { name, .. } => name,
        }
    }

    /// Static type; a bound value is declared at its run-time type
    pub fn static_type(&self) -> TypeRef {
        match self {
            VarArg::Declared { ty, .. } => ty.clone(),
            VarArg::Bound { value, .. } => value.runtime_type(),
        }
    }
}

/// Parse `name=value` or `name:Type`
pub fn parse_var(arg: &str) -> Result<VarArg> {
    let split = arg
        .find(['=', ':'])
        .ok_or_else(|| anyhow!("expected name=value or name:Type, got '{}'", arg))?;
    let (name, rest) = arg.split_at(split);
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        bail!("invalid variable name '{}'", name);
    }

    let body = &rest[1..];
    if rest.starts_with(':') {
        let ty = TypeRef::parse_name(body)?;
        return Ok(VarArg::Declared {
            name: name.to_string(),
            ty,
        });
    }
    Ok(VarArg::Bound {
        name: name.to_string(),
        value: parse_value(body),
    })
}

/// Numbers follow literal rules, `true`/`false`/`null` are keywords,
/// quotes force a string, and anything else is a plain string.
pub fn parse_value(text: &str) -> Value {
    if let Some(quoted) = strip_quotes(text) {
        return Value::from(quoted);
    }
    match text {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        "null" => return Value::Null,
        _ => {}
    }
    match Literal::parse(text) {
        Some(Literal::Int(n)) => Value::Int(n),
        Some(Literal::Long(n)) => Value::Long(n),
        Some(Literal::Float(n)) => Value::Float(n),
        Some(Literal::Double(n)) => Value::Double(n),
        None => Value::from(text),
    }
}

fn strip_quotes(text: &str) -> Option<&str> {
    ['"', '\'']
        .into_iter()
        .find_map(|q| text.strip_prefix(q).and_then(|t| t.strip_suffix(q)))
}

/// Compile-time declarations for `vars`, checking declared types exist
pub fn compile_bindings(
    vars: &[VarArg],
    directory: &dyn MemberDirectory,
    allow_private: bool,
) -> Result<CompileBindings> {
    let mut builder = CompileBindings::builder().with_allow_private(allow_private);
    for var in vars {
        let ty = var.static_type();
        if let VarArg::Declared { ty: declared, .. } = var {
            ensure_known(declared, directory)?;
        }
        builder = builder.with_variable(var.name(), ty);
    }
    Ok(builder.build())
}

/// Run-time values for `vars`; declared-only variables are rejected
pub fn runtime_bindings(vars: &[VarArg], allow_private: bool) -> Result<RuntimeBindings> {
    let mut builder = RuntimeBindings::builder().with_allow_private(allow_private);
    for var in vars {
        match var {
            VarArg::Bound { name, value } => builder = builder.with_variable(name.as_str(), value.clone()),
            VarArg::Declared { name, .. } => bail!("variable '{}' needs a value (use {}=value)", name, name),
        }
    }
    Ok(builder.build())
}

fn ensure_known(ty: &TypeRef, directory: &dyn MemberDirectory) -> Result<()> {
    match ty {
        TypeRef::Array(element) => ensure_known(element, directory),
        TypeRef::Reference(name) if directory.lookup_type(name).is_none() => {
            bail!("unknown type '{}'", name)
        }
        _ => Ok(()),
    }
}
