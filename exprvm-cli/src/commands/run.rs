//! Run command implementation

use anyhow::Result;
use exprvm_stdlib::init_stdlib;
use exprvm_vm::VMBuilder;
use std::path::Path;
use std::sync::Arc;

use super::read_program;
use crate::config::Config;
use crate::vars::{runtime_bindings, VarArg};

pub fn run_file(path: &Path, vars: &[VarArg], allow_private: bool, config: &Config) -> Result<()> {
    let program = read_program(path)?;
    let bindings = runtime_bindings(vars, allow_private)?;
    let vm = VMBuilder::new()
        .with_directory(Arc::new(init_stdlib()))
        .with_config(config.vm_config())
        .build()?;

    let result = vm.execute(&program, &bindings)?;
    println!("{}", result);
    Ok(())
}
