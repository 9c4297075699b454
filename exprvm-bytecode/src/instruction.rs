//! Instructions, instruction sets and compile-time type hints

use crate::opcode::Opcode;
use exprvm_core::{MemberHandle, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single VM instruction with its operands
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Does nothing
    Nop,
    /// Push a boolean
    PushBoolean(bool),
    /// Push a byte
    PushByte(i8),
    /// Push a char
    PushChar(char),
    /// Push a double
    PushDouble(f64),
    /// Push a float
    PushFloat(f32),
    /// Push an int
    PushInt(i32),
    /// Push a long
    PushLong(i64),
    /// Push a short
    PushShort(i16),
    /// Push a string
    PushString(String),
    /// Push null
    PushNull,
    /// Push the run-time value bound to `name`
    LoadVariable {
        /// Variable name
        name: String,
    },
    /// Pop `argc` arguments and a receiver, invoke, push the result
    InvokeMember {
        /// Resolved method
        handle: MemberHandle,
        /// Number of arguments on the stack
        argc: u16,
        /// Pack the trailing arguments into the variadic array parameter
        spread: bool,
    },
    /// Pop a receiver and push one of its fields
    GetField {
        /// Declaring type
        owner: String,
        /// Field name
        name: String,
    },
}

impl Instruction {
    /// Opcode for this instruction
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::PushBoolean(_) => Opcode::PushBoolean,
            Instruction::PushByte(_) => Opcode::PushByte,
            Instruction::PushChar(_) => Opcode::PushChar,
            Instruction::PushDouble(_) => Opcode::PushDouble,
            Instruction::PushFloat(_) => Opcode::PushFloat,
            Instruction::PushInt(_) => Opcode::PushInt,
            Instruction::PushLong(_) => Opcode::PushLong,
            Instruction::PushShort(_) => Opcode::PushShort,
            Instruction::PushString(_) => Opcode::PushString,
            Instruction::PushNull => Opcode::PushNull,
            Instruction::LoadVariable { .. } => Opcode::LoadVariable,
            Instruction::InvokeMember { .. } => Opcode::InvokeMember,
            Instruction::GetField { .. } => Opcode::GetField,
        }
    }

    /// Whether executing this instruction leaves a value on the stack
    pub fn produces_value(&self) -> bool {
        !matches!(self, Instruction::Nop)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.opcode();
        match self {
            Instruction::Nop | Instruction::PushNull => write!(f, "{}", op),
            Instruction::PushBoolean(b) => write!(f, "{} {}", op, b),
            Instruction::PushByte(n) => write!(f, "{} {}", op, n),
            Instruction::PushChar(c) => write!(f, "{} {:?}", op, c),
            Instruction::PushDouble(n) => write!(f, "{} {:?}", op, n),
            Instruction::PushFloat(n) => write!(f, "{} {:?}", op, n),
            Instruction::PushInt(n) => write!(f, "{} {}", op, n),
            Instruction::PushLong(n) => write!(f, "{} {}", op, n),
            Instruction::PushShort(n) => write!(f, "{} {}", op, n),
            Instruction::PushString(s) => write!(f, "{} {:?}", op, s),
            Instruction::LoadVariable { name } => write!(f, "{} {}", op, name),
            Instruction::InvokeMember { handle, argc, spread } => {
                write!(f, "{} {} argc={}", op, handle, argc)?;
                if *spread {
                    write!(f, " spread")?;
                }
                Ok(())
            }
            Instruction::GetField { owner, name } => write!(f, "{} {}.{}", op, owner, name),
        }
    }
}

/// An ordered, compiled program.
///
/// Built by appending during compilation; executing it never mutates it, so
/// one set can be run any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    /// Create an empty instruction set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction and return its index
    pub fn push(&mut self, instruction: Instruction) -> usize {
        self.instructions.push(instruction);
        self.instructions.len() - 1
    }

    /// Instruction at `index`
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Last instruction
    pub fn last(&self) -> Option<&Instruction> {
        self.instructions.last()
    }

    /// Iterate in program order
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// All instructions as a slice
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether the set holds no instructions
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl From<Vec<Instruction>> for InstructionSet {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }
}

impl<'a> IntoIterator for &'a InstructionSet {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            writeln!(f, "{:04} {}", i, instruction)?;
        }
        Ok(())
    }
}

/// Static type of the value produced by the instruction at `index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeHint {
    /// Index of the value-producing instruction
    pub index: usize,
    /// Inferred static type
    pub ty: TypeRef,
}

impl TypeHint {
    /// Create a hint for the instruction at `index`
    pub fn new(index: usize, ty: TypeRef) -> Self {
        Self { index, ty }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} : {}", self.index, self.ty)
    }
}
