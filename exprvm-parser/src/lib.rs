//! Expression compiler for exprvm
//!
//! Compiles member-access expressions such as `name.substring(1).length()`
//! into bytecode, resolving every call and property against a
//! [`MemberDirectory`] at compile time:
//! - Single pass, no AST
//! - Static types tracked per stack slot and reported as type hints
//! - Errors carry the offending source span and render with a marker

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod literal;

pub use compiler::{Compiled, Compiler, CompilerOptions};
pub use error::{CompileError, CompileResult, ErrorKind, SourceContext, UnresolvedReference};
pub use lexer::{Lexer, Spanned, Token, STOP_CHARS};
pub use literal::Literal;

use exprvm_bytecode::InstructionSet;
use exprvm_core::{CompileBindings, MemberDirectory};

/// Compile `source` with default options
pub fn compile(
    source: &str,
    bindings: &CompileBindings,
    directory: &dyn MemberDirectory,
) -> CompileResult<InstructionSet> {
    Compiler::new(directory).compile(source, bindings)
}

/// Compile `source` with default options, keeping type hints
pub fn compile_typed(
    source: &str,
    bindings: &CompileBindings,
    directory: &dyn MemberDirectory,
) -> CompileResult<Compiled> {
    Compiler::new(directory).compile_typed(source, bindings)
}
