//! Command implementations

pub mod compile;
pub mod config;
pub mod disasm;
pub mod eval;
pub mod run;

use anyhow::{anyhow, Context, Result};
use exprvm_bytecode::{InstructionSet, OpcodeRegistry};
use exprvm_core::CompileBindings;
use exprvm_parser::{Compiled, Compiler};
use exprvm_stdlib::TypeRegistry;
use std::path::Path;

use crate::config::Config;

/// Compile `source`, turning a compile error into its rendered snippet
pub(crate) fn compile_source(
    source: &str,
    bindings: &CompileBindings,
    registry: &TypeRegistry,
    config: &Config,
) -> Result<Compiled> {
    Compiler::with_options(registry, config.compiler_options())
        .compile_typed(source, bindings)
        .map_err(|err| anyhow!("{}", err.render(source)))
}

pub(crate) fn read_program(path: &Path) -> Result<InstructionSet> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    InstructionSet::from_bytes(&bytes, &OpcodeRegistry::standard())
        .with_context(|| format!("decoding {}", path.display()))
}
