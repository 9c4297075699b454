//! Constant pushes and `Nop`

use super::OpcodeHandler;
use crate::error::{VMError, VMResult};
use crate::vm::ExecutionState;
use exprvm_bytecode::Instruction;
use exprvm_core::Value;

pub struct LiteralHandler;

impl OpcodeHandler for LiteralHandler {
    fn execute(&self, _state: &mut ExecutionState<'_>, instruction: &Instruction) -> VMResult<Option<Value>> {
        let value = match instruction {
            Instruction::Nop => return Ok(None),
            Instruction::PushBoolean(b) => Value::Boolean(*b),
            Instruction::PushByte(n) => Value::Byte(*n),
            Instruction::PushChar(c) => Value::Char(*c),
            Instruction::PushDouble(n) => Value::Double(*n),
            Instruction::PushFloat(n) => Value::Float(*n),
            Instruction::PushInt(n) => Value::Int(*n),
            Instruction::PushLong(n) => Value::Long(*n),
            Instruction::PushShort(n) => Value::Short(*n),
            Instruction::PushString(s) => Value::String(s.clone()),
            Instruction::PushNull => Value::Null,
            other => {
                return Err(VMError::MalformedProgram {
                    reason: format!("{} is not a literal", other.opcode()),
                })
            }
        };
        Ok(Some(value))
    }
}
