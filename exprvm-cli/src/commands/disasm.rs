//! Disassemble command implementation

use anyhow::Result;
use std::path::Path;

use super::read_program;

pub fn disassemble(path: &Path) -> Result<()> {
    let program = read_program(path)?;
    print!("{}", program);
    Ok(())
}
