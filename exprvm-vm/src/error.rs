//! Error handling for the VM

use exprvm_core::InvokeError;
use std::fmt;

/// VM error types
#[derive(Debug)]
pub enum VMError {
    /// Stack underflow
    StackUnderflow {
        operation: String,
        stack_size: usize,
    },

    /// Stack overflow
    StackOverflow {
        current_depth: usize,
        max_depth: usize,
    },

    /// Program left extra values on the stack or carries an unusable payload
    MalformedProgram {
        reason: String,
    },

    /// `LoadVariable` named a variable missing from the run-time bindings
    UnboundVariable {
        name: String,
    },

    /// A member invocation or field read failed
    Execution {
        member: String,
        source: InvokeError,
    },
}

impl fmt::Display for VMError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VMError::StackUnderflow { operation, stack_size } => {
                write!(f, "Stack underflow in {}: stack size is {}", operation, stack_size)
            }
            VMError::StackOverflow { current_depth, max_depth } => {
                write!(f, "Stack overflow: depth {} exceeds maximum {}", current_depth, max_depth)
            }
            VMError::MalformedProgram { reason } => {
                write!(f, "Malformed program: {}", reason)
            }
            VMError::UnboundVariable { name } => {
                write!(f, "Unbound variable: '{}'", name)
            }
            VMError::Execution { member, source } => {
                write!(f, "Execution of {} failed: {}", member, source)
            }
        }
    }
}

impl std::error::Error for VMError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VMError::Execution { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for VM operations
pub type VMResult<T> = Result<T, VMError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
