//! exprvm Virtual Machine
//!
//! Stack-based VM that executes compiled expression programs, dispatching
//! member calls and field reads to a [`MemberDirectory`](exprvm_core::MemberDirectory).

pub mod error;
pub mod opcode_handlers;
pub mod vm;
pub mod vm_builder;

pub use error::{VMError, VMResult};
pub use exprvm_core::Value;
pub use opcode_handlers::OpcodeHandler;
pub use vm::{ExecutionState, VMConfig, DEFAULT_MAX_STACK_DEPTH, VM};
pub use vm_builder::VMBuilder;
