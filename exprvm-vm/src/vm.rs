//! Stack-based execution engine

use crate::error::{VMError, VMResult};
use crate::opcode_handlers::handler_for;
use exprvm_bytecode::InstructionSet;
use exprvm_core::{MemberDirectory, RuntimeBindings, Value};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Default bound on the operand stack
pub const DEFAULT_MAX_STACK_DEPTH: usize = 1024;

/// VM configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VMConfig {
    /// Maximum number of values on the operand stack
    pub max_stack_depth: usize,
    /// Log every executed instruction at debug level
    pub trace: bool,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            trace: false,
        }
    }
}

/// Operand stack and collaborators of a single execution
pub struct ExecutionState<'a> {
    stack: Vec<Value>,
    max_stack_depth: usize,
    bindings: &'a RuntimeBindings,
    directory: &'a dyn MemberDirectory,
}

impl<'a> ExecutionState<'a> {
    fn new(
        directory: &'a dyn MemberDirectory,
        bindings: &'a RuntimeBindings,
        max_stack_depth: usize,
        capacity: usize,
    ) -> Self {
        Self {
            stack: Vec::with_capacity(capacity.min(max_stack_depth)),
            max_stack_depth,
            bindings,
            directory,
        }
    }

    pub fn bindings(&self) -> &'a RuntimeBindings {
        self.bindings
    }

    pub fn directory(&self) -> &'a dyn MemberDirectory {
        self.directory
    }

    pub fn stack_len(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, value: Value) -> VMResult<()> {
        if self.stack.len() >= self.max_stack_depth {
            return Err(VMError::StackOverflow {
                current_depth: self.stack.len() + 1,
                max_depth: self.max_stack_depth,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    pub fn pop(&mut self, operation: &str) -> VMResult<Value> {
        self.stack.pop().ok_or_else(|| VMError::StackUnderflow {
            operation: operation.to_string(),
            stack_size: 0,
        })
    }

    /// Pop the top `n` values, returned in the order they were pushed
    pub fn pop_n(&mut self, n: usize, operation: &str) -> VMResult<Vec<Value>> {
        if self.stack.len() < n {
            return Err(VMError::StackUnderflow {
                operation: operation.to_string(),
                stack_size: self.stack.len(),
            });
        }
        let split = self.stack.len() - n;
        Ok(self.stack.split_off(split))
    }

    /// The single value a finished program must leave behind
    fn into_result(mut self) -> VMResult<Value> {
        match self.stack.len() {
            1 => self.pop("result"),
            0 => Err(VMError::StackUnderflow {
                operation: "result".to_string(),
                stack_size: 0,
            }),
            n => Err(VMError::MalformedProgram {
                reason: format!("{} values left on the stack", n),
            }),
        }
    }
}

/// Executes instruction sets against a member directory.
///
/// The VM holds no per-execution state: every call to [`VM::execute`] gets
/// its own stack, so one instance may be shared across threads.
#[derive(Clone)]
pub struct VM {
    directory: Arc<dyn MemberDirectory>,
    config: VMConfig,
}

impl VM {
    pub fn new(directory: Arc<dyn MemberDirectory>) -> Self {
        Self::with_config(directory, VMConfig::default())
    }

    pub fn with_config(directory: Arc<dyn MemberDirectory>, config: VMConfig) -> Self {
        Self { directory, config }
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    pub fn directory(&self) -> &dyn MemberDirectory {
        self.directory.as_ref()
    }

    /// Run `program` and return the value it leaves on the stack
    pub fn execute(&self, program: &InstructionSet, bindings: &RuntimeBindings) -> VMResult<Value> {
        let mut state = ExecutionState::new(
            self.directory.as_ref(),
            bindings,
            self.config.max_stack_depth,
            program.len(),
        );

        for (ip, instruction) in program.iter().enumerate() {
            if self.config.trace {
                debug!("{:04} {} (stack {})", ip, instruction, state.stack_len());
            } else {
                trace!("{:04} {} (stack {})", ip, instruction, state.stack_len());
            }

            if let Some(value) = handler_for(instruction).execute(&mut state, instruction)? {
                state.push(value)?;
            }
        }

        state.into_result()
    }
}

impl fmt::Debug for VM {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VM").field("config", &self.config).finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "vm_tests.rs"]
mod tests;
