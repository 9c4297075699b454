//! One-byte operation codes

use std::fmt;

/// Reserved for compile-time type hints. Never bound in a registry and never
/// written to a serialized program.
pub const TYPE_HINT_OPCODE: u8 = 0xFF;

/// Operation codes for the expression VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// No operation
    Nop = 0x00,
    /// Push a boolean constant
    PushBoolean = 0x01,
    /// Push a byte constant
    PushByte = 0x02,
    /// Push a char constant
    PushChar = 0x03,
    /// Push a double constant
    PushDouble = 0x04,
    /// Push a float constant
    PushFloat = 0x05,
    /// Push an int constant
    PushInt = 0x06,
    /// Push a long constant
    PushLong = 0x07,
    /// Push a short constant
    PushShort = 0x08,
    /// Push a string constant
    PushString = 0x09,
    /// Push null
    PushNull = 0x0A,
    /// Push the value bound to a variable
    LoadVariable = 0x0B,
    /// Invoke a method on the receiver below the arguments
    InvokeMember = 0x0C,
    /// Read a field of the receiver
    GetField = 0x0D,
}

impl Opcode {
    /// Every opcode, in numeric order
    pub const ALL: [Opcode; 14] = [
        Opcode::Nop,
        Opcode::PushBoolean,
        Opcode::PushByte,
        Opcode::PushChar,
        Opcode::PushDouble,
        Opcode::PushFloat,
        Opcode::PushInt,
        Opcode::PushLong,
        Opcode::PushShort,
        Opcode::PushString,
        Opcode::PushNull,
        Opcode::LoadVariable,
        Opcode::InvokeMember,
        Opcode::GetField,
    ];

    /// The byte written for this opcode
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Look up an opcode by its byte
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.code() == code)
    }

    /// Disassembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Nop => "NOP",
            Opcode::PushBoolean => "PUSH_BOOLEAN",
            Opcode::PushByte => "PUSH_BYTE",
            Opcode::PushChar => "PUSH_CHAR",
            Opcode::PushDouble => "PUSH_DOUBLE",
            Opcode::PushFloat => "PUSH_FLOAT",
            Opcode::PushInt => "PUSH_INT",
            Opcode::PushLong => "PUSH_LONG",
            Opcode::PushShort => "PUSH_SHORT",
            Opcode::PushString => "PUSH_STRING",
            Opcode::PushNull => "PUSH_NULL",
            Opcode::LoadVariable => "LOAD_VARIABLE",
            Opcode::InvokeMember => "INVOKE_MEMBER",
            Opcode::GetField => "GET_FIELD",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
