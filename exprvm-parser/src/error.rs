//! Compile error types

use exprvm_core::ResolveError;
use thiserror::Error;

/// Characters of source shown on either side of an error location
pub const SHOW_BEFORE_AFTER: usize = 15;

/// Location of an error in the source, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceContext {
    pub offset: usize,
    pub length: usize,
}

impl SourceContext {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Span from `start` up to (not including) `end`
    pub fn span(start: usize, end: usize) -> Self {
        Self::new(start, end.saturating_sub(start))
    }
}

/// A name the compiler could not bind
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnresolvedReference {
    #[error("Undeclared variable {name}")]
    Variable { name: String },

    #[error(transparent)]
    Member(ResolveError),

    #[error("Could not resolve {name} in {owner}")]
    Field { owner: String, name: String },

    #[error("Cannot resolve type {name}")]
    Type { name: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof {
        expected: String,
        context: SourceContext,
    },

    #[error("Expected {expected} but got '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        context: SourceContext,
    },

    #[error("Unterminated string literal")]
    UnterminatedLiteral { context: SourceContext },

    #[error("Invalid escape sequence '\\{escape}'")]
    InvalidEscape {
        escape: char,
        context: SourceContext,
    },

    #[error("Call to {name} has no receiver")]
    MissingReceiver {
        name: String,
        context: SourceContext,
    },

    #[error("Invalid cast: {reason}")]
    InvalidCast {
        reason: String,
        context: SourceContext,
    },

    #[error("Maximum nesting depth exceeded: depth {depth} exceeds limit of {max_depth}")]
    MaxDepthExceeded {
        depth: usize,
        max_depth: usize,
        context: SourceContext,
    },

    #[error("{reference}")]
    Unresolved {
        reference: UnresolvedReference,
        context: SourceContext,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnexpectedEof,
    UnexpectedToken,
    UnterminatedLiteral,
    InvalidEscape,
    MissingReceiver,
    InvalidCast,
    MaxDepthExceeded,
    Unresolved,
}

impl CompileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::UnexpectedEof { .. } => ErrorKind::UnexpectedEof,
            CompileError::UnexpectedToken { .. } => ErrorKind::UnexpectedToken,
            CompileError::UnterminatedLiteral { .. } => ErrorKind::UnterminatedLiteral,
            CompileError::InvalidEscape { .. } => ErrorKind::InvalidEscape,
            CompileError::MissingReceiver { .. } => ErrorKind::MissingReceiver,
            CompileError::InvalidCast { .. } => ErrorKind::InvalidCast,
            CompileError::MaxDepthExceeded { .. } => ErrorKind::MaxDepthExceeded,
            CompileError::Unresolved { .. } => ErrorKind::Unresolved,
        }
    }

    pub fn context(&self) -> SourceContext {
        match self {
            CompileError::UnexpectedEof { context, .. }
            | CompileError::UnexpectedToken { context, .. }
            | CompileError::UnterminatedLiteral { context }
            | CompileError::InvalidEscape { context, .. }
            | CompileError::MissingReceiver { context, .. }
            | CompileError::InvalidCast { context, .. }
            | CompileError::MaxDepthExceeded { context, .. }
            | CompileError::Unresolved { context, .. } => *context,
        }
    }

    /// The unresolved reference, if this is a binding failure
    pub fn reference(&self) -> Option<&UnresolvedReference> {
        match self {
            CompileError::Unresolved { reference, .. } => Some(reference),
            _ => None,
        }
    }

    /// Message followed by the surrounding source and a marker under the
    /// offending span:
    ///
    /// ```text
    /// Undeclared variable nmae
    /// nmae.length()
    /// ^~~~
    /// ```
    pub fn render(&self, source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let context = self.context();
        let offset = context.offset.min(chars.len());
        let length = context.length.max(1);

        let start = offset.saturating_sub(SHOW_BEFORE_AFTER);
        let end = offset + (chars.len() - offset).min(SHOW_BEFORE_AFTER.max(length));
        let snippet: String = chars[start..end].iter().collect();

        format!(
            "{}\n{}\n{}^{}",
            self,
            snippet,
            " ".repeat(offset - start),
            "~".repeat(length - 1)
        )
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
