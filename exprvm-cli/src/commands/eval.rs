//! Eval command implementation: compile and run in one step

use anyhow::Result;
use exprvm_stdlib::init_stdlib;
use exprvm_vm::VMBuilder;
use std::sync::Arc;

use super::compile_source;
use crate::config::Config;
use crate::vars::{compile_bindings, runtime_bindings, VarArg};

pub fn eval_expression(
    source: &str,
    vars: &[VarArg],
    allow_private: bool,
    show_program: bool,
    config: &Config,
) -> Result<()> {
    let registry = Arc::new(init_stdlib());
    let declared = compile_bindings(vars, registry.as_ref(), allow_private)?;
    let runtime = runtime_bindings(vars, allow_private)?;
    let compiled = compile_source(source, &declared, &registry, config)?;
    if show_program {
        print!("{}", compiled.program);
    }

    let vm = VMBuilder::new()
        .with_directory(registry)
        .with_config(config.vm_config())
        .build()?;
    let result = vm.execute(&compiled.program, &runtime)?;
    println!("{}", result);
    Ok(())
}
