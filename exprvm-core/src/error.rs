//! Error types for exprvm-core

use crate::types::TypeRef;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Malformed descriptor '{descriptor}': {reason}")]
    MalformedDescriptor { descriptor: String, reason: String },

    #[error("Invalid type name: '{0}'")]
    InvalidTypeName(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failure to select a member for a call site or access.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("No such member {name} in {owner} (args: [{}])", display_types(.args))]
    NoSuchMember {
        owner: String,
        name: String,
        args: Vec<TypeRef>,
    },

    #[error("Ambiguous call {name} in {owner} (args: [{}]): candidates {}", display_types(.args), join_names(.candidates))]
    Ambiguous {
        owner: String,
        name: String,
        args: Vec<TypeRef>,
        candidates: Vec<String>,
    },

    #[error("Unknown type {name}")]
    UnknownType { name: String },
}

/// Failure raised by a [`MemberDirectory`](crate::member::MemberDirectory)
/// while invoking a method or reading a field.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("No such member {member}")]
    NotFound { member: String },

    #[error("Access to private member {member} denied")]
    AccessDenied { member: String },

    #[error("Cannot access {member} on null")]
    NullReceiver { member: String },

    #[error("Receiver of type {actual} is not assignable to {expected}")]
    ReceiverMismatch { expected: String, actual: String },

    #[error("{member} failed: {source}")]
    Target {
        member: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl InvokeError {
    /// Wrap an error raised by a member body.
    pub fn target(member: impl Into<String>, err: anyhow::Error) -> Self {
        InvokeError::Target {
            member: member.into(),
            source: err.into(),
        }
    }
}

fn join_names(names: &[String]) -> String {
    names.join(", ")
}

pub(crate) fn display_types(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
