//! Member resolution
//!
//! Overload selection works in two passes over the candidates sharing the
//! requested name:
//!
//! 1. Fixed arity. A candidate with exactly as many parameters as there are
//!    arguments matches when every parameter accepts its argument directly,
//!    or, failing that, once primitives on both sides are boxed.
//! 2. Variadic. Only consulted when the first pass found nothing. The
//!    trailing array parameter is expanded to one (boxed) element parameter
//!    per remaining argument and checked the same way.
//!
//! Among the matches of a pass the most specific one wins: A beats B when
//! every boxed parameter of A is assignable to the corresponding parameter
//! of B but not the other way round. When two matches are mutually
//! assignable a direct match beats one that needed boxing. Anything left
//! over is reported as [`ResolveError::Ambiguous`].

use crate::error::ResolveError;
use crate::hierarchy::TypeHierarchy;
use crate::member::{FieldSignature, MemberDirectory, MemberHandle, MethodSignature};
use crate::types::TypeRef;
use tracing::debug;

/// The outcome of [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub signature: &'a MethodSignature,
    /// Trailing arguments must be packed into the variadic array
    pub spread: bool,
}

/// A resolved call site, ready to be emitted
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub signature: MethodSignature,
    pub handle: MemberHandle,
    pub spread: bool,
}

struct Match<'a> {
    signature: &'a MethodSignature,
    /// Parameter list the match was made against, boxed
    params: Vec<TypeRef>,
    boxed: bool,
}

/// Select the best candidate named `name` for the given argument types.
pub fn resolve<'a>(
    hierarchy: &TypeHierarchy<'_>,
    candidates: &'a [MethodSignature],
    name: &str,
    arg_types: &[TypeRef],
) -> Result<Selection<'a>, ResolveError> {
    let named: Vec<&MethodSignature> = candidates.iter().filter(|c| c.name == name).collect();
    let owner = named
        .first()
        .map(|c| c.owner.clone())
        .unwrap_or_default();

    let fixed: Vec<Match<'a>> = named
        .iter()
        .copied()
        .filter(|c| c.params.len() == arg_types.len())
        .filter_map(|c| match_params(hierarchy, c, c.params.clone(), arg_types))
        .collect();
    if !fixed.is_empty() {
        return select(hierarchy, fixed, name, arg_types, false);
    }

    let variadic: Vec<Match<'a>> = named
        .iter()
        .copied()
        .filter(|c| c.variadic)
        .filter_map(|c| {
            let expanded = expand_variadic(c, arg_types.len())?;
            match_params(hierarchy, c, expanded, arg_types)
        })
        .collect();
    if !variadic.is_empty() {
        return select(hierarchy, variadic, name, arg_types, true);
    }

    Err(ResolveError::NoSuchMember {
        owner,
        name: name.to_string(),
        args: arg_types.to_vec(),
    })
}

fn match_params<'a>(
    hierarchy: &TypeHierarchy<'_>,
    signature: &'a MethodSignature,
    params: Vec<TypeRef>,
    args: &[TypeRef],
) -> Option<Match<'a>> {
    let boxed_params: Vec<TypeRef> = params.iter().map(TypeRef::boxed).collect();
    if hierarchy.all_assignable(&params, args) {
        return Some(Match { signature, params: boxed_params, boxed: false });
    }
    let null_into_primitive = params
        .iter()
        .zip(args)
        .any(|(param, arg)| param.is_primitive() && *arg == TypeRef::Null);
    if null_into_primitive {
        return None;
    }
    let boxed_args: Vec<TypeRef> = args.iter().map(TypeRef::boxed).collect();
    if hierarchy.all_assignable(&boxed_params, &boxed_args) {
        return Some(Match { signature, params: boxed_params, boxed: true });
    }
    None
}

/// Fixed parameter list for a variadic candidate called with `argc` arguments
fn expand_variadic(signature: &MethodSignature, argc: usize) -> Option<Vec<TypeRef>> {
    let (last, leading) = signature.params.split_last()?;
    let element = last.element()?.boxed();
    if argc < leading.len() {
        return None;
    }
    let mut params = leading.to_vec();
    params.resize(argc, element);
    Some(params)
}

fn dominates(hierarchy: &TypeHierarchy<'_>, a: &Match<'_>, b: &Match<'_>) -> bool {
    let a_fits_b = hierarchy.all_assignable(&b.params, &a.params);
    let b_fits_a = hierarchy.all_assignable(&a.params, &b.params);
    match (a_fits_b, b_fits_a) {
        (true, false) => true,
        (true, true) => !a.boxed && b.boxed,
        _ => false,
    }
}

fn select<'a>(
    hierarchy: &TypeHierarchy<'_>,
    matches: Vec<Match<'a>>,
    name: &str,
    arg_types: &[TypeRef],
    spread: bool,
) -> Result<Selection<'a>, ResolveError> {
    let maximal: Vec<&Match<'a>> = matches
        .iter()
        .filter(|m| !matches.iter().any(|other| dominates(hierarchy, other, m)))
        .collect();

    match maximal.as_slice() {
        [best] => Ok(Selection { signature: best.signature, spread }),
        _ => Err(ResolveError::Ambiguous {
            owner: matches[0].signature.owner.clone(),
            name: name.to_string(),
            args: arg_types.to_vec(),
            candidates: maximal.iter().map(|m| m.signature.to_string()).collect(),
        }),
    }
}

/// Resolve a call on `owner` through a directory.
///
/// Candidates are gathered over the full supertype closure of `owner`;
/// private members take part only when `allow_private` is set.
pub fn resolve_method(
    directory: &dyn MemberDirectory,
    owner: &TypeRef,
    name: &str,
    arg_types: &[TypeRef],
    allow_private: bool,
) -> Result<Resolution, ResolveError> {
    let hierarchy = TypeHierarchy::new(directory);
    let candidates = hierarchy.methods(owner, allow_private);
    let selection = resolve(&hierarchy, &candidates, name, arg_types).map_err(|err| match err {
        ResolveError::NoSuchMember { name, args, .. } => ResolveError::NoSuchMember {
            owner: owner.to_string(),
            name,
            args,
        },
        ResolveError::Ambiguous { name, args, candidates, .. } => ResolveError::Ambiguous {
            owner: owner.to_string(),
            name,
            args,
            candidates,
        },
        other => other,
    })?;
    debug!(
        "resolved {}.{} -> {} (spread: {})",
        owner, name, selection.signature, selection.spread
    );
    Ok(Resolution {
        handle: MemberHandle::for_method(selection.signature),
        signature: selection.signature.clone(),
        spread: selection.spread,
    })
}

/// Getter step of property access: a zero-parameter method named `name` or
/// `get<Name>`, searched across the supertype closure.
pub fn resolve_getter(
    directory: &dyn MemberDirectory,
    owner: &TypeRef,
    name: &str,
    allow_private: bool,
) -> Option<MethodSignature> {
    let getter = getter_name(name);
    TypeHierarchy::new(directory)
        .methods(owner, allow_private)
        .into_iter()
        .find(|m| m.params.is_empty() && (m.name == name || m.name == getter))
}

/// Field step of property access: a field named exactly `name`.
pub fn resolve_field(
    directory: &dyn MemberDirectory,
    owner: &TypeRef,
    name: &str,
    allow_private: bool,
) -> Option<FieldSignature> {
    TypeHierarchy::new(directory)
        .fields(owner, allow_private)
        .into_iter()
        .find(|f| f.name == name)
}

/// Resolve a source-level type name such as `String` or `int[]`.
pub fn resolve_type(directory: &dyn MemberDirectory, name: &str) -> Result<TypeRef, ResolveError> {
    directory
        .lookup_type(name)
        .ok_or_else(|| ResolveError::UnknownType { name: name.to_string() })
}

fn getter_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
