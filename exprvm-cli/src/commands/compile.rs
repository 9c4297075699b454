//! Compile command implementation

use anyhow::{Context, Result};
use exprvm_stdlib::init_stdlib;
use std::path::Path;
use tracing::info;

use super::compile_source;
use crate::config::Config;
use crate::vars::{compile_bindings, VarArg};

pub fn compile_expression(
    source: &str,
    output: Option<&Path>,
    vars: &[VarArg],
    allow_private: bool,
    show_hints: bool,
    config: &Config,
) -> Result<()> {
    let registry = init_stdlib();
    let bindings = compile_bindings(vars, &registry, allow_private)?;
    let compiled = compile_source(source, &bindings, &registry, config)?;

    match output {
        Some(path) => {
            let bytes = compiled.program.to_bytes()?;
            std::fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
            info!("wrote {} bytes to {}", bytes.len(), path.display());
            println!(
                "Compiled {} instructions ({}) to {}",
                compiled.program.len(),
                compiled.result_type,
                path.display()
            );
        }
        None => print!("{}", compiled.program),
    }

    if show_hints {
        println!("{}", serde_json::to_string_pretty(&compiled.hints)?);
    }
    Ok(())
}
