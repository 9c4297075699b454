//! Single-pass expression compiler
//!
//! Source is compiled straight to an [`InstructionSet`]; there is no AST.
//! The static type of every value the program will leave on the stack is
//! tracked on a separate type stack, which is what call and property
//! resolution look at. The same types are reported to callers as
//! [`TypeHint`]s, one per value-producing instruction.

use crate::error::{CompileError, CompileResult, SourceContext, UnresolvedReference};
use crate::lexer::{Lexer, Spanned, Token};
use crate::literal::Literal;
use exprvm_bytecode::{Instruction, InstructionSet, TypeHint};
use exprvm_core::{
    resolve_field, resolve_getter, resolve_method, resolve_type, CompileBindings, MemberDirectory,
    MemberHandle, TypeRef,
};
use tracing::debug;

/// Compiler options
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Maximum nesting of argument lists
    pub max_depth: usize,
    /// Accept one pair of braces around the whole expression
    pub allow_braces: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            allow_braces: true,
        }
    }
}

/// Compiler output with its type side channel
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub program: InstructionSet,
    /// One hint per value-producing instruction, in program order
    pub hints: Vec<TypeHint>,
    /// Static type of the final value; `Void` for an empty program
    pub result_type: TypeRef,
}

impl Compiled {
    /// Hint recorded for the instruction at `index`
    pub fn hint(&self, index: usize) -> Option<&TypeRef> {
        self.hints.iter().find(|h| h.index == index).map(|h| &h.ty)
    }
}

/// Compiles expressions against a member directory
pub struct Compiler<'d> {
    directory: &'d dyn MemberDirectory,
    options: CompilerOptions,
}

impl<'d> Compiler<'d> {
    pub fn new(directory: &'d dyn MemberDirectory) -> Self {
        Self::with_options(directory, CompilerOptions::default())
    }

    pub fn with_options(directory: &'d dyn MemberDirectory, options: CompilerOptions) -> Self {
        Self { directory, options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `source` to a program
    pub fn compile(&self, source: &str, bindings: &CompileBindings) -> CompileResult<InstructionSet> {
        self.compile_typed(source, bindings).map(|compiled| compiled.program)
    }

    /// Compile `source`, keeping the static type information
    pub fn compile_typed(&self, source: &str, bindings: &CompileBindings) -> CompileResult<Compiled> {
        debug!("compiling {:?}", source);
        let mut session = Session {
            lexer: Lexer::new(source),
            directory: self.directory,
            bindings,
            options: &self.options,
            program: InstructionSet::new(),
            hints: Vec::new(),
            types: Vec::new(),
        };
        session.program_rule()?;

        let result_type = session.types.last().cloned().unwrap_or(TypeRef::Void);
        debug!(
            "compiled {} instructions, result type {}",
            session.program.len(),
            result_type
        );
        Ok(Compiled {
            program: session.program,
            hints: session.hints,
            result_type,
        })
    }
}

/// State of one compilation
struct Session<'a, 's> {
    lexer: Lexer<'s>,
    directory: &'a dyn MemberDirectory,
    bindings: &'a CompileBindings,
    options: &'a CompilerOptions,
    program: InstructionSet,
    hints: Vec<TypeHint>,
    /// Static types of the values on the run-time stack
    types: Vec<TypeRef>,
}

impl<'a, 's> Session<'a, 's> {
    /// `program := [ '{' expr '}' | expr ] EOF`
    fn program_rule(&mut self) -> CompileResult<()> {
        if self.options.allow_braces && self.lexer.eat(&Token::LBrace) {
            self.expression(0)?;
            self.expect(Token::RBrace, "'}'")?;
        } else if self.lexer.peek()?.is_some() {
            self.expression(0)?;
        }

        match self.lexer.next()? {
            None => Ok(()),
            Some(trailing) => Err(self.unexpected("end of input", &trailing)),
        }
    }

    /// `expr := primary ( '.' member )*`
    fn expression(&mut self, depth: usize) -> CompileResult<()> {
        if depth > self.options.max_depth {
            return Err(CompileError::MaxDepthExceeded {
                depth,
                max_depth: self.options.max_depth,
                context: self.here(),
            });
        }

        self.primary()?;
        while self.lexer.eat(&Token::Dot) {
            self.member(depth)?;
        }
        Ok(())
    }

    fn primary(&mut self) -> CompileResult<()> {
        let Some(spanned) = self.lexer.next()? else {
            return Err(self.eof("expression"));
        };
        let context = spanned.context();
        let text = match spanned.token {
            Some(Token::Str(literal)) => {
                self.emit(Instruction::PushString(literal), TypeRef::string());
                return Ok(());
            }
            Some(Token::Number(text) | Token::Word(text)) => text,
            _ => return Err(self.unexpected("expression", &spanned)),
        };

        if self.lexer.at(&Token::LParen) {
            return Err(CompileError::MissingReceiver {
                name: text.to_string(),
                context,
            });
        }

        if let Some(literal) = Literal::parse(text) {
            self.emit(literal.instruction(), literal.static_type());
            return Ok(());
        }

        let Some(ty) = self.bindings.get(text).cloned() else {
            return Err(CompileError::Unresolved {
                reference: UnresolvedReference::Variable { name: text.to_string() },
                context,
            });
        };
        self.emit(Instruction::LoadVariable { name: text.to_string() }, ty);
        Ok(())
    }

    /// `member := '?as' '(' string ')' | name [ '(' args ]`
    fn member(&mut self, depth: usize) -> CompileResult<()> {
        let Some(spanned) = self.lexer.next()? else {
            return Err(self.eof("member name"));
        };
        match spanned.token {
            Some(Token::Cast) => {
                self.expect(Token::LParen, "'('")?;
                self.cast(spanned.start)
            }
            Some(Token::Word(name)) if self.lexer.eat(&Token::LParen) => {
                self.call(name.to_string(), spanned.start, depth)
            }
            Some(Token::Word(name)) => self.property(name.to_string(), spanned.context()),
            _ => Err(self.unexpected("member name", &spanned)),
        }
    }

    fn call(&mut self, name: String, start: usize, depth: usize) -> CompileResult<()> {
        let argc = self.arguments(depth)?;
        let context = SourceContext::span(start, self.lexer.consumed());

        let split = self.types.len() - argc;
        let arg_types = self.types.split_off(split);
        let receiver = self.pop_type();
        let resolution = resolve_method(
            self.directory,
            &receiver.boxed(),
            &name,
            &arg_types,
            self.bindings.allow_private(),
        )
        .map_err(|err| CompileError::Unresolved {
            reference: UnresolvedReference::Member(err),
            context,
        })?;

        let argc = u16::try_from(argc).map_err(|_| CompileError::UnexpectedToken {
            expected: format!("at most {} arguments", u16::MAX),
            found: argc.to_string(),
            context,
        })?;
        self.emit(
            Instruction::InvokeMember {
                handle: resolution.handle,
                argc,
                spread: resolution.spread,
            },
            resolution.signature.ret,
        );
        Ok(())
    }

    /// `args := [ expr ( ',' expr )* ] ')'`; returns the count
    fn arguments(&mut self, depth: usize) -> CompileResult<usize> {
        if self.lexer.eat(&Token::RParen) {
            return Ok(0);
        }

        let mut argc = 0;
        loop {
            self.expression(depth + 1)?;
            argc += 1;
            match self.lexer.next()? {
                Some(spanned) if spanned.is(&Token::Comma) => {}
                Some(spanned) if spanned.is(&Token::RParen) => return Ok(argc),
                Some(spanned) => return Err(self.unexpected("',' or ')'", &spanned)),
                None => return Err(self.eof("',' or ')'")),
            }
        }
    }

    /// `receiver.?as("TypeName")`: re-type the receiver, emit nothing
    fn cast(&mut self, start: usize) -> CompileResult<()> {
        let type_name = match self.lexer.next()? {
            Some(Spanned { token: Some(Token::Str(name)), .. }) => name,
            Some(spanned) if spanned.is(&Token::RParen) => {
                return Err(self.invalid_cast(start, "expected exactly one type name"))
            }
            Some(_) => return Err(self.invalid_cast(start, "type name must be a constant string")),
            None => return Err(self.eof("type name")),
        };
        match self.lexer.next()? {
            Some(spanned) if spanned.is(&Token::RParen) => {}
            Some(spanned) if spanned.is(&Token::Comma) => {
                return Err(self.invalid_cast(start, "expected exactly one type name"))
            }
            Some(spanned) => return Err(self.unexpected("')'", &spanned)),
            None => return Err(self.eof("')'")),
        }

        let context = SourceContext::span(start, self.lexer.consumed());
        let ty = resolve_type(self.directory, &type_name).map_err(|_| CompileError::Unresolved {
            reference: UnresolvedReference::Type { name: type_name },
            context,
        })?;
        debug!("cast {} -> {}", self.types.last().map_or(TypeRef::Void, Clone::clone), ty);

        self.pop_type();
        if let Some(hint) = self.hints.last_mut() {
            hint.ty = ty.clone();
        }
        self.types.push(ty);
        Ok(())
    }

    /// Getter first, then field, each across the receiver's supertype closure
    fn property(&mut self, name: String, context: SourceContext) -> CompileResult<()> {
        let receiver = self.pop_type();
        let owner = receiver.boxed();
        let allow_private = self.bindings.allow_private();

        if let Some(getter) = resolve_getter(self.directory, &owner, &name, allow_private) {
            debug!("property {}.{} -> {}", receiver, name, getter);
            self.emit(
                Instruction::InvokeMember {
                    handle: MemberHandle::for_method(&getter),
                    argc: 0,
                    spread: false,
                },
                getter.ret,
            );
            return Ok(());
        }

        if let Some(field) = resolve_field(self.directory, &owner, &name, allow_private) {
            debug!("property {}.{} -> field of {}", receiver, name, field.owner);
            self.emit(
                Instruction::GetField {
                    owner: field.owner,
                    name: field.name,
                },
                field.ty,
            );
            return Ok(());
        }

        Err(CompileError::Unresolved {
            reference: UnresolvedReference::Field {
                owner: receiver.to_string(),
                name,
            },
            context,
        })
    }

    fn emit(&mut self, instruction: Instruction, ty: TypeRef) {
        let index = self.program.push(instruction);
        self.hints.push(TypeHint::new(index, ty.clone()));
        self.types.push(ty);
    }

    /// Every receiver or argument was pushed by an earlier `emit`, so the
    /// type stack cannot be empty here.
    fn pop_type(&mut self) -> TypeRef {
        self.types.pop().unwrap_or(TypeRef::Void)
    }

    fn expect(&mut self, token: Token<'s>, expected: &str) -> CompileResult<()> {
        match self.lexer.next()? {
            Some(spanned) if spanned.is(&token) => Ok(()),
            Some(spanned) => Err(self.unexpected(expected, &spanned)),
            None => Err(self.eof(expected)),
        }
    }

    fn here(&self) -> SourceContext {
        SourceContext::new(self.lexer.offset(), 1)
    }

    fn unexpected(&self, expected: &str, found: &Spanned<'_>) -> CompileError {
        CompileError::UnexpectedToken {
            expected: expected.to_string(),
            found: found.text.to_string(),
            context: found.context(),
        }
    }

    fn eof(&self, expected: &str) -> CompileError {
        CompileError::UnexpectedEof {
            expected: expected.to_string(),
            context: self.here(),
        }
    }

    fn invalid_cast(&self, start: usize, reason: &str) -> CompileError {
        CompileError::InvalidCast {
            reason: reason.to_string(),
            context: SourceContext::span(start, self.lexer.consumed()),
        }
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
