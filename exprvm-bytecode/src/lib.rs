//! Bytecode representation for exprvm
//!
//! This crate defines the instruction set shared by the compiler and the VM,
//! the compile-time type hints and the binary program format.

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod registry;

pub use codec::{read_program, write_program};
pub use error::{CodecError, CodecResult};
pub use instruction::{Instruction, InstructionSet, TypeHint};
pub use opcode::{Opcode, TYPE_HINT_OPCODE};
pub use registry::{Decoder, OpcodeRegistry, OpcodeRegistryBuilder};
