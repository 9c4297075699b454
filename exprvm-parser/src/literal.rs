//! Numeric literal classification

use exprvm_bytecode::Instruction;
use exprvm_core::TypeRef;

/// A numeric literal and its static type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Literal {
    /// Classify a token; the first matching form wins:
    ///
    /// 1. `int` when it parses as a 32-bit integer
    /// 2. `long` with an `L`/`l` suffix, or an integer too large for `int`
    /// 3. `float` with an `F`/`f` suffix
    /// 4. `double` with a `D`/`d` suffix, or any other decimal form
    ///
    /// Only ASCII digits, a sign, `.`, an exponent and the suffix may appear,
    /// so words like `NaN` or `Infinity` are never numbers.
    pub fn parse(token: &str) -> Option<Self> {
        if !looks_numeric(token) {
            return None;
        }
        if let Ok(n) = token.parse::<i32>() {
            return Some(Literal::Int(n));
        }
        if let Ok(n) = strip_suffix(token, 'l').parse::<i64>() {
            return Some(Literal::Long(n));
        }
        if let Some(body) = token.strip_suffix(['F', 'f']) {
            return body.parse::<f32>().ok().map(Literal::Float);
        }
        strip_suffix(token, 'd').parse::<f64>().ok().map(Literal::Double)
    }

    pub fn static_type(&self) -> TypeRef {
        match self {
            Literal::Int(_) => TypeRef::int(),
            Literal::Long(_) => TypeRef::long(),
            Literal::Float(_) => TypeRef::float(),
            Literal::Double(_) => TypeRef::double(),
        }
    }

    pub fn instruction(&self) -> Instruction {
        match *self {
            Literal::Int(n) => Instruction::PushInt(n),
            Literal::Long(n) => Instruction::PushLong(n),
            Literal::Float(n) => Instruction::PushFloat(n),
            Literal::Double(n) => Instruction::PushDouble(n),
        }
    }
}

fn strip_suffix(token: &str, suffix: char) -> &str {
    token
        .strip_suffix([suffix, suffix.to_ascii_uppercase()])
        .unwrap_or(token)
}

fn looks_numeric(token: &str) -> bool {
    let body = token
        .strip_suffix(['L', 'l', 'F', 'f', 'D', 'd'])
        .unwrap_or(token);
    let body = body.strip_prefix(['+', '-']).unwrap_or(body);
    body.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && body.chars().any(|c| c.is_ascii_digit())
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
}
