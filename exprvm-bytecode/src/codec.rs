//! Binary program format
//!
//! A program is the concatenation of its instructions, each written as the
//! opcode byte followed by its payload. Multi-byte numbers are big-endian;
//! strings are a `u32` byte length followed by UTF-8. There is no header.

use crate::error::{CodecError, CodecResult};
use crate::instruction::{Instruction, InstructionSet};
use crate::opcode::Opcode;
use crate::registry::{Decoder, OpcodeRegistry};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use exprvm_core::{MemberHandle, MethodDescriptor};
use std::io::{self, ErrorKind, Read, Write};
use tracing::warn;

/// Write every instruction of `program`, in order.
///
/// Every opcode the program uses must be bound in `registry`; otherwise
/// nothing is written.
pub fn write_program<W: Write + ?Sized>(
    program: &InstructionSet,
    writer: &mut W,
    registry: &OpcodeRegistry,
) -> CodecResult<()> {
    if let Some((index, instruction)) = program
        .iter()
        .enumerate()
        .find(|(_, instruction)| !registry.contains(instruction.opcode().code()))
    {
        let opcode = instruction.opcode().code();
        warn!("opcode 0x{:02X} at instruction {} is not bound", opcode, index);
        return Err(CodecError::UnboundOpcode { opcode, index });
    }
    write_instructions(program, writer)
}

fn write_instructions<W: Write + ?Sized>(program: &InstructionSet, writer: &mut W) -> CodecResult<()> {
    for instruction in program {
        write_instruction(instruction, writer)?;
    }
    Ok(())
}

/// Read instructions until the input is exhausted
pub fn read_program<R: Read>(reader: &mut R, registry: &OpcodeRegistry) -> CodecResult<InstructionSet> {
    let mut program = InstructionSet::new();
    loop {
        let mut byte = [0u8; 1];
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }

        let opcode = byte[0];
        let index = program.len();
        let decoder = registry.decoder(opcode).ok_or_else(|| {
            warn!("unknown opcode 0x{:02X} at instruction {}", opcode, index);
            CodecError::UnknownOpcode { opcode, index }
        })?;
        let instruction = decoder(reader).map_err(|e| {
            warn!("failed to decode opcode 0x{:02X} at instruction {}: {}", opcode, index, e);
            match e.kind() {
                ErrorKind::UnexpectedEof => CodecError::Truncated { opcode, index },
                ErrorKind::InvalidData => CodecError::InvalidPayload {
                    opcode,
                    reason: e.to_string(),
                },
                _ => CodecError::Io(e),
            }
        })?;
        program.push(instruction);
    }
    Ok(program)
}

impl InstructionSet {
    /// Serialize to a byte vector with every standard opcode available
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        write_instructions(self, &mut out)?;
        Ok(out)
    }

    /// Serialize to a byte vector, allowing only the opcodes `registry` binds
    pub fn to_bytes_with(&self, registry: &OpcodeRegistry) -> CodecResult<Vec<u8>> {
        let mut out = Vec::new();
        write_program(self, &mut out, registry)?;
        Ok(out)
    }

    /// Deserialize from a byte slice
    pub fn from_bytes(mut bytes: &[u8], registry: &OpcodeRegistry) -> CodecResult<Self> {
        read_program(&mut bytes, registry)
    }
}

fn write_instruction<W: Write + ?Sized>(instruction: &Instruction, w: &mut W) -> CodecResult<()> {
    let opcode = instruction.opcode();
    w.write_u8(opcode.code())?;
    match instruction {
        Instruction::Nop | Instruction::PushNull => {}
        Instruction::PushBoolean(b) => w.write_u8(u8::from(*b))?,
        Instruction::PushByte(n) => w.write_i8(*n)?,
        Instruction::PushChar(c) => w.write_u32::<BigEndian>(*c as u32)?,
        Instruction::PushDouble(n) => w.write_f64::<BigEndian>(*n)?,
        Instruction::PushFloat(n) => w.write_f32::<BigEndian>(*n)?,
        Instruction::PushInt(n) => w.write_i32::<BigEndian>(*n)?,
        Instruction::PushLong(n) => w.write_i64::<BigEndian>(*n)?,
        Instruction::PushShort(n) => w.write_i16::<BigEndian>(*n)?,
        Instruction::PushString(s) => write_string(w, opcode, s)?,
        Instruction::LoadVariable { name } => write_string(w, opcode, name)?,
        Instruction::InvokeMember { handle, argc, spread } => {
            write_string(w, opcode, handle.owner())?;
            write_string(w, opcode, handle.name())?;
            write_string(w, opcode, handle.descriptor_str())?;
            w.write_u16::<BigEndian>(*argc)?;
            w.write_u8(u8::from(*spread))?;
        }
        Instruction::GetField { owner, name } => {
            write_string(w, opcode, owner)?;
            write_string(w, opcode, name)?;
        }
    }
    Ok(())
}

fn write_string<W: Write + ?Sized>(w: &mut W, opcode: Opcode, s: &str) -> CodecResult<()> {
    let len = u32::try_from(s.len()).map_err(|_| CodecError::InvalidPayload {
        opcode: opcode.code(),
        reason: format!("string of {} bytes exceeds the u32 length prefix", s.len()),
    })?;
    w.write_u32::<BigEndian>(len)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Decoder for a standard opcode
pub(crate) fn standard_decoder(opcode: Opcode) -> Decoder {
    match opcode {
        Opcode::Nop => |_| Ok(Instruction::Nop),
        Opcode::PushBoolean => |r| read_bool(r).map(Instruction::PushBoolean),
        Opcode::PushByte => |r| r.read_i8().map(Instruction::PushByte),
        Opcode::PushChar => decode_char,
        Opcode::PushDouble => |r| r.read_f64::<BigEndian>().map(Instruction::PushDouble),
        Opcode::PushFloat => |r| r.read_f32::<BigEndian>().map(Instruction::PushFloat),
        Opcode::PushInt => |r| r.read_i32::<BigEndian>().map(Instruction::PushInt),
        Opcode::PushLong => |r| r.read_i64::<BigEndian>().map(Instruction::PushLong),
        Opcode::PushShort => |r| r.read_i16::<BigEndian>().map(Instruction::PushShort),
        Opcode::PushString => |r| read_string(r).map(Instruction::PushString),
        Opcode::PushNull => |_| Ok(Instruction::PushNull),
        Opcode::LoadVariable => |r| read_string(r).map(|name| Instruction::LoadVariable { name }),
        Opcode::InvokeMember => decode_invoke,
        Opcode::GetField => |r| {
            let owner = read_string(r)?;
            let name = read_string(r)?;
            Ok(Instruction::GetField { owner, name })
        },
    }
}

fn decode_char(r: &mut dyn Read) -> io::Result<Instruction> {
    let scalar = r.read_u32::<BigEndian>()?;
    char::from_u32(scalar)
        .map(Instruction::PushChar)
        .ok_or_else(|| invalid(format!("0x{:X} is not a char", scalar)))
}

fn decode_invoke(r: &mut dyn Read) -> io::Result<Instruction> {
    let owner = read_string(r)?;
    let name = read_string(r)?;
    let descriptor = read_string(r)?;
    MethodDescriptor::parse(&descriptor).map_err(|e| invalid(e.to_string()))?;
    let argc = r.read_u16::<BigEndian>()?;
    let spread = read_bool(r)?;
    Ok(Instruction::InvokeMember {
        handle: MemberHandle::new(owner, name, descriptor),
        argc,
        spread,
    })
}

fn read_bool(r: &mut dyn Read) -> io::Result<bool> {
    match r.read_u8()? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(invalid(format!("{} is not a boolean", other))),
    }
}

fn read_string(r: &mut dyn Read) -> io::Result<String> {
    let len = r.read_u32::<BigEndian>()? as usize;
    let mut buf = Vec::new();
    Read::take(&mut *r, len as u64).read_to_end(&mut buf)?;
    if buf.len() < len {
        return Err(ErrorKind::UnexpectedEof.into());
    }
    String::from_utf8(buf).map_err(|e| invalid(e.to_string()))
}

fn invalid(reason: String) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, reason)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
