//! Argument extraction helpers for native method bodies

use anyhow::{anyhow, Result};
use exprvm_core::Value;

pub(crate) fn receiver_str<'a>(receiver: &'a Value, method: &str) -> Result<&'a str> {
    receiver
        .as_str()
        .ok_or_else(|| anyhow!("{}: expected String receiver, got {}", method, receiver.type_name()))
}

pub(crate) fn str_arg<'a>(args: &'a [Value], index: usize, method: &str) -> Result<&'a str> {
    let arg = arg(args, index, method)?;
    arg.as_str()
        .ok_or_else(|| anyhow!("{}: expected String argument, got {}", method, arg.type_name()))
}

pub(crate) fn int_arg(args: &[Value], index: usize, method: &str) -> Result<i64> {
    let arg = arg(args, index, method)?;
    arg.as_i64()
        .ok_or_else(|| anyhow!("{}: expected integral argument, got {}", method, arg.type_name()))
}

/// Index argument checked against `0..=len`
pub(crate) fn index_arg(args: &[Value], index: usize, len: usize, method: &str) -> Result<usize> {
    let value = int_arg(args, index, method)?;
    usize::try_from(value)
        .ok()
        .filter(|i| *i <= len)
        .ok_or_else(|| anyhow!("{}: index {} out of range for length {}", method, value, len))
}

pub(crate) fn arg<'a>(args: &'a [Value], index: usize, method: &str) -> Result<&'a Value> {
    args.get(index)
        .ok_or_else(|| anyhow!("{}: missing argument {}", method, index))
}
