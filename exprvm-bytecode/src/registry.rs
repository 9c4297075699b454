//! Opcode registry used when reading programs
//!
//! A registry is an immutable table from opcode byte to payload decoder. It
//! is built once and passed explicitly to [`read_program`](crate::read_program);
//! there is no process-wide table. A registry that omits some opcodes acts as
//! a whitelist: programs using them fail to load.

use crate::codec;
use crate::error::{CodecError, CodecResult};
use crate::instruction::Instruction;
use crate::opcode::{Opcode, TYPE_HINT_OPCODE};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Read};

/// Decodes one instruction's payload; the opcode byte has already been consumed
pub type Decoder = fn(&mut dyn Read) -> io::Result<Instruction>;

/// Immutable opcode → decoder table
#[derive(Clone)]
pub struct OpcodeRegistry {
    decoders: BTreeMap<u8, Decoder>,
}

impl OpcodeRegistry {
    /// Start an empty registry
    pub fn builder() -> OpcodeRegistryBuilder {
        OpcodeRegistryBuilder::default()
    }

    /// Registry with every standard opcode bound to its decoder
    pub fn standard() -> Self {
        Self {
            decoders: Opcode::ALL
                .into_iter()
                .map(|op| (op.code(), codec::standard_decoder(op)))
                .collect(),
        }
    }

    /// Decoder bound to `opcode`
    pub fn decoder(&self, opcode: u8) -> Option<Decoder> {
        self.decoders.get(&opcode).copied()
    }

    /// Whether `opcode` is bound
    pub fn contains(&self, opcode: u8) -> bool {
        self.decoders.contains_key(&opcode)
    }

    /// Bound opcodes in ascending order
    pub fn opcodes(&self) -> impl Iterator<Item = u8> + '_ {
        self.decoders.keys().copied()
    }
}

impl Default for OpcodeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for OpcodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.decoders.keys().map(|op| format!("0x{:02X}", op)))
            .finish()
    }
}

/// Builder for [`OpcodeRegistry`]
#[derive(Default)]
pub struct OpcodeRegistryBuilder {
    decoders: BTreeMap<u8, Decoder>,
}

impl OpcodeRegistryBuilder {
    /// Bind a standard opcode to its standard decoder
    pub fn with_opcode(self, opcode: Opcode) -> CodecResult<Self> {
        self.with_decoder(opcode.code(), codec::standard_decoder(opcode))
    }

    /// Bind every standard opcode
    pub fn with_standard_opcodes(self) -> CodecResult<Self> {
        Opcode::ALL
            .into_iter()
            .try_fold(self, |builder, op| builder.with_opcode(op))
    }

    /// Bind an arbitrary byte to a decoder
    pub fn with_decoder(mut self, opcode: u8, decoder: Decoder) -> CodecResult<Self> {
        if opcode == TYPE_HINT_OPCODE {
            return Err(CodecError::ReservedOpcode(opcode));
        }
        if self.decoders.contains_key(&opcode) {
            return Err(CodecError::DuplicateOpcode(opcode));
        }
        self.decoders.insert(opcode, decoder);
        Ok(self)
    }

    /// Freeze the registry
    pub fn build(self) -> OpcodeRegistry {
        OpcodeRegistry {
            decoders: self.decoders,
        }
    }
}

impl fmt::Debug for OpcodeRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpcodeRegistryBuilder")
            .field("opcodes", &self.decoders.keys().collect::<Vec<_>>())
            .finish()
    }
}
