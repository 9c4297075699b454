//! Error types for program serialization

use thiserror::Error;

/// Failure while building an opcode registry or reading/writing a program
#[derive(Error, Debug)]
pub enum CodecError {
    /// The byte at instruction `index` has no decoder in the registry
    #[error("Unknown opcode 0x{opcode:02X} at instruction {index}")]
    UnknownOpcode {
        /// Byte read from the input
        opcode: u8,
        /// Position of the instruction in the program
        index: usize,
    },

    /// The instruction at `index` uses an opcode the registry does not bind
    #[error("Opcode 0x{opcode:02X} at instruction {index} is not bound in the registry")]
    UnboundOpcode {
        /// Opcode of the rejected instruction
        opcode: u8,
        /// Position of the instruction in the program
        index: usize,
    },

    /// The input ended inside an instruction's payload
    #[error("Truncated payload for opcode 0x{opcode:02X} at instruction {index}")]
    Truncated {
        /// Opcode whose payload was cut short
        opcode: u8,
        /// Position of the instruction in the program
        index: usize,
    },

    /// The payload could not be decoded or encoded
    #[error("Invalid payload for opcode 0x{opcode:02X}: {reason}")]
    InvalidPayload {
        /// Opcode whose payload is invalid
        opcode: u8,
        /// What was wrong with it
        reason: String,
    },

    /// Attempt to bind the reserved type-hint opcode
    #[error("Opcode 0x{0:02X} is reserved")]
    ReservedOpcode(u8),

    /// Attempt to bind an opcode twice
    #[error("Opcode 0x{0:02X} is already registered")]
    DuplicateOpcode(u8),

    /// The underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
