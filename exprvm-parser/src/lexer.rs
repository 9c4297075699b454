//! Token stream for expression source using logos

use crate::error::{CompileError, CompileResult, SourceContext};
use logos::Logos;
use std::collections::VecDeque;

/// Characters that end a word
pub const STOP_CHARS: &[char] = &[
    ' ', '.', ',', '(', ')', '{', '}', '|', ':', ';', '=', '"', '\'', '\n', '\r', '\t',
];

/// Failures raised while matching a single token
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LexError {
    /// No token rule accepts the text
    #[default]
    Unrecognized,
    /// Bad escape at a byte offset inside the literal
    InvalidEscape { escape: char, at: usize },
}

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token<'s> {
    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("?as")]
    Cast,

    // Numbers win over words of the same length
    #[regex(r"[+-]?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?[LlFfDd]?", priority = 3, callback = |lex| lex.slice())]
    Number(&'s str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unescape(lex.slice(), '"'))]
    #[regex(r"'([^'\\]|\\.)*'", |lex| unescape(lex.slice(), '\''))]
    Str(String),

    // Anything up to a stop character
    #[regex(r#"[^ \t\r\n.,(){}|:;="']+"#, priority = 1, callback = |lex| lex.slice())]
    Word(&'s str),
}

/// Strip the quotes of a string literal and apply its escapes.
///
/// Recognized escapes are `\n`, `\r`, `\t`, `\\` and the active quote.
fn unescape(slice: &str, quote: char) -> Result<String, LexError> {
    let body = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((at, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, 'n')) => out.push('\n'),
            Some((_, 'r')) => out.push('\r'),
            Some((_, 't')) => out.push('\t'),
            Some((_, '\\')) => out.push('\\'),
            Some((_, q)) if q == quote => out.push(q),
            Some((_, escape)) => return Err(LexError::InvalidEscape { escape, at: at + 1 }),
            None => return Err(LexError::Unrecognized),
        }
    }
    Ok(out)
}

/// A token with its source text and character span
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<'s> {
    /// `None` for text that no token rule accepts
    pub token: Option<Token<'s>>,
    pub text: &'s str,
    pub start: usize,
    pub end: usize,
}

impl<'s> Spanned<'s> {
    pub fn context(&self) -> SourceContext {
        SourceContext::span(self.start, self.end)
    }

    pub fn is(&self, token: &Token<'s>) -> bool {
        self.token.as_ref() == Some(token)
    }
}

/// Converts the byte offsets logos reports into character offsets
struct CharOffsets<'s> {
    source: &'s str,
    byte: usize,
    chars: usize,
}

impl<'s> CharOffsets<'s> {
    fn new(source: &'s str) -> Self {
        Self { source, byte: 0, chars: 0 }
    }

    fn at(&mut self, byte: usize) -> usize {
        if byte < self.byte {
            return self.source[..byte].chars().count();
        }
        self.chars += self.source[self.byte..byte].chars().count();
        self.byte = byte;
        self.chars
    }
}

/// Tokens of one source with one-token lookahead.
///
/// Offsets count characters, not bytes, so they can be used directly in
/// error contexts. Lexing stops at the first malformed token; its error is
/// returned once the parser reaches it.
#[derive(Debug)]
pub struct Lexer<'s> {
    pending: VecDeque<CompileResult<Spanned<'s>>>,
    end: usize,
    consumed: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s str) -> Self {
        let mut offsets = CharOffsets::new(source);
        let mut pending = VecDeque::new();
        let mut lex = Token::lexer(source);

        while let Some(result) = lex.next() {
            let span = lex.span();
            let text = lex.slice();
            let start = offsets.at(span.start);
            let end = offsets.at(span.end);
            let item = match result {
                Ok(token) => Ok(Spanned {
                    token: Some(token),
                    text,
                    start,
                    end,
                }),
                Err(LexError::Unrecognized) if text.starts_with(['"', '\'']) => {
                    Err(CompileError::UnterminatedLiteral {
                        context: SourceContext::span(start, offsets.at(source.len())),
                    })
                }
                Err(LexError::Unrecognized) => Ok(Spanned {
                    token: None,
                    text,
                    start,
                    end,
                }),
                Err(LexError::InvalidEscape { escape, at }) => Err(CompileError::InvalidEscape {
                    escape,
                    context: SourceContext::new(start + text[..at].chars().count(), 2),
                }),
            };
            let malformed = !matches!(item, Ok(Spanned { token: Some(_), .. }));
            pending.push_back(item);
            if malformed {
                break;
            }
        }

        Self {
            pending,
            end: offsets.at(source.len()),
            consumed: 0,
        }
    }

    /// Next token without consuming it
    pub fn peek(&self) -> CompileResult<Option<&Spanned<'s>>> {
        match self.pending.front() {
            None => Ok(None),
            Some(Ok(spanned)) => Ok(Some(spanned)),
            Some(Err(err)) => Err(err.clone()),
        }
    }

    pub fn next(&mut self) -> CompileResult<Option<Spanned<'s>>> {
        match self.pending.pop_front() {
            None => Ok(None),
            Some(Ok(spanned)) => {
                self.consumed = spanned.end;
                Ok(Some(spanned))
            }
            Some(Err(err)) => Err(err),
        }
    }

    /// Whether the next token is `token`
    pub fn at(&self, token: &Token<'s>) -> bool {
        matches!(self.pending.front(), Some(Ok(spanned)) if spanned.is(token))
    }

    /// Consume the next token if it is `token`
    pub fn eat(&mut self, token: &Token<'s>) -> bool {
        if !self.at(token) {
            return false;
        }
        if let Some(Ok(spanned)) = self.pending.pop_front() {
            self.consumed = spanned.end;
        }
        true
    }

    /// Start of the next token, or the end of input
    pub fn offset(&self) -> usize {
        match self.pending.front() {
            Some(Ok(spanned)) => spanned.start,
            _ => self.end,
        }
    }

    /// End of the last consumed token
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
