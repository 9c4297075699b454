//! Method invocation and field reads

use super::OpcodeHandler;
use crate::error::{VMError, VMResult};
use crate::vm::ExecutionState;
use exprvm_bytecode::Instruction;
use exprvm_core::{MemberHandle, Value};
use tracing::trace;

pub struct MemberHandler;

impl OpcodeHandler for MemberHandler {
    fn execute(&self, state: &mut ExecutionState<'_>, instruction: &Instruction) -> VMResult<Option<Value>> {
        match instruction {
            Instruction::InvokeMember { handle, argc, spread } => {
                let mut args = state.pop_n(usize::from(*argc), "invoke")?;
                let receiver = state.pop("invoke")?;
                if *spread {
                    args = pack_variadic(handle, args)?;
                }

                trace!("invoke {} on {}", handle, receiver.type_name());
                state
                    .directory()
                    .invoke(handle, receiver, args, state.bindings().allow_private())
                    .map(Some)
                    .map_err(|source| VMError::Execution {
                        member: handle.to_string(),
                        source,
                    })
            }

            Instruction::GetField { owner, name } => {
                let receiver = state.pop("get field")?;
                trace!("read {}.{} on {}", owner, name, receiver.type_name());
                state
                    .directory()
                    .read_field(owner, name, receiver, state.bindings().allow_private())
                    .map(Some)
                    .map_err(|source| VMError::Execution {
                        member: format!("{}.{}", owner, name),
                        source,
                    })
            }

            other => Err(VMError::MalformedProgram {
                reason: format!("{} is not a member access", other.opcode()),
            }),
        }
    }
}

/// Collect the arguments past the fixed parameters into one array for the
/// trailing variadic parameter
fn pack_variadic(handle: &MemberHandle, mut args: Vec<Value>) -> VMResult<Vec<Value>> {
    let signature = handle.signature().map_err(|err| VMError::MalformedProgram {
        reason: format!("{}: {}", handle, err),
    })?;
    if !signature.variadic {
        return Err(VMError::MalformedProgram {
            reason: format!("spread call to non-variadic {}", handle),
        });
    }
    let fixed = signature.params.len().saturating_sub(1);
    if args.len() < fixed {
        return Err(VMError::MalformedProgram {
            reason: format!(
                "{} needs at least {} arguments, got {}",
                handle,
                fixed,
                args.len()
            ),
        });
    }

    let rest = args.split_off(fixed);
    args.push(Value::Array(rest));
    Ok(args)
}
