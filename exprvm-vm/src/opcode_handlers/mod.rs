//! Opcode handlers for the exprvm VM
//!
//! Instructions are grouped by what they touch: literals only push,
//! variables read the run-time bindings, members go through the directory.

use crate::error::VMResult;
use crate::vm::ExecutionState;
use exprvm_bytecode::Instruction;
use exprvm_core::Value;

pub mod literal;
pub mod member;
pub mod variable;

/// Trait for opcode handlers
pub trait OpcodeHandler: Send + Sync {
    /// Execute the instruction, returning the value to push, if any
    fn execute(&self, state: &mut ExecutionState<'_>, instruction: &Instruction) -> VMResult<Option<Value>>;
}

pub use literal::LiteralHandler;
pub use member::MemberHandler;
pub use variable::VariableHandler;

static LITERALS: LiteralHandler = LiteralHandler;
static VARIABLES: VariableHandler = VariableHandler;
static MEMBERS: MemberHandler = MemberHandler;

/// Handler responsible for `instruction`
pub fn handler_for(instruction: &Instruction) -> &'static dyn OpcodeHandler {
    match instruction {
        Instruction::LoadVariable { .. } => &VARIABLES,
        Instruction::InvokeMember { .. } | Instruction::GetField { .. } => &MEMBERS,
        _ => &LITERALS,
    }
}
