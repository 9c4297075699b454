//! Variable loads

use super::OpcodeHandler;
use crate::error::{VMError, VMResult};
use crate::vm::ExecutionState;
use exprvm_bytecode::Instruction;
use exprvm_core::Value;

pub struct VariableHandler;

impl OpcodeHandler for VariableHandler {
    fn execute(&self, state: &mut ExecutionState<'_>, instruction: &Instruction) -> VMResult<Option<Value>> {
        let Instruction::LoadVariable { name } = instruction else {
            return Err(VMError::MalformedProgram {
                reason: format!("{} is not a variable load", instruction.opcode()),
            });
        };
        state
            .bindings()
            .get(name)
            .cloned()
            .map(Some)
            .ok_or_else(|| VMError::UnboundVariable { name: name.clone() })
    }
}
