use super::*;
use pretty_assertions::assert_eq;

fn tokens(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    let mut out = Vec::new();
    while let Some(spanned) = lexer.next().unwrap() {
        out.push(spanned.token.expect("recognized token"));
    }
    out
}

#[test]
fn test_call_chain() {
    assert_eq!(
        tokens("name.substring(1, 3)"),
        vec![
            Token::Word("name"),
            Token::Dot,
            Token::Word("substring"),
            Token::LParen,
            Token::Number("1"),
            Token::Comma,
            Token::Number("3"),
            Token::RParen,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(tokens("1.5.intValue"), vec![Token::Number("1.5"), Token::Dot, Token::Word("intValue")]);
    assert_eq!(tokens("10.hashCode"), vec![Token::Number("10"), Token::Dot, Token::Word("hashCode")]);
    assert_eq!(tokens("-2147483648"), vec![Token::Number("-2147483648")]);
    assert_eq!(tokens("1e3 10L 2.5f"), vec![Token::Number("1e3"), Token::Number("10L"), Token::Number("2.5f")]);
}

#[test]
fn test_words_run_to_stop_chars() {
    assert_eq!(tokens("10abc"), vec![Token::Word("10abc")]);
    assert_eq!(tokens("NaN"), vec![Token::Word("NaN")]);
    for stop in STOP_CHARS.iter().filter(|c| !matches!(**c, '"' | '\'')) {
        let source = format!("ab{}cd", stop);
        let mut lexer = Lexer::new(&source);
        let first = lexer.next().unwrap().unwrap();
        assert_eq!(first.token, Some(Token::Word("ab")), "{:?}", stop);
        assert_eq!(first.end, 2);
    }
}

#[test]
fn test_cast_keyword() {
    assert_eq!(
        tokens("obj.?as('String')"),
        vec![
            Token::Word("obj"),
            Token::Dot,
            Token::Cast,
            Token::LParen,
            Token::Str("String".to_string()),
            Token::RParen,
        ]
    );
    assert_eq!(tokens("?ask"), vec![Token::Word("?ask")]);
}

#[test]
fn test_quoted_strings() {
    assert_eq!(
        tokens(r#""a\"b\n" 'it\'s' 'say "hi"'"#),
        vec![
            Token::Str("a\"b\n".to_string()),
            Token::Str("it's".to_string()),
            Token::Str("say \"hi\"".to_string()),
        ]
    );
}

#[test]
fn test_invalid_escape() {
    let mut lexer = Lexer::new(r#""ab\q""#);
    assert_eq!(
        lexer.next().unwrap_err(),
        CompileError::InvalidEscape {
            escape: 'q',
            context: SourceContext::new(3, 2)
        }
    );
}

#[test]
fn test_other_quote_is_not_an_escape() {
    let mut lexer = Lexer::new(r#""it\'s""#);
    assert!(matches!(lexer.next(), Err(CompileError::InvalidEscape { escape: '\'', .. })));
}

#[test]
fn test_unterminated() {
    let mut lexer = Lexer::new("x \"abc");
    assert_eq!(lexer.next().unwrap().unwrap().token, Some(Token::Word("x")));
    assert_eq!(
        lexer.next().unwrap_err(),
        CompileError::UnterminatedLiteral {
            context: SourceContext::new(2, 4)
        }
    );
}

#[test]
fn test_unrecognized_text_is_kept() {
    let mut lexer = Lexer::new("a:b");
    lexer.next().unwrap();
    let stray = lexer.next().unwrap().unwrap();
    assert_eq!(stray.token, None);
    assert_eq!(stray.text, ":");
    assert_eq!(stray.context(), SourceContext::new(1, 1));
}

#[test]
fn test_offsets_count_chars() {
    let mut lexer = Lexer::new("'日本'.x");
    let literal = lexer.next().unwrap().unwrap();
    assert_eq!((literal.start, literal.end), (0, 4));
    assert!(lexer.at(&Token::Dot));
    assert_eq!(lexer.offset(), 4);
    assert!(lexer.eat(&Token::Dot));
    assert_eq!(lexer.consumed(), 5);
}

#[test]
fn test_lookahead() {
    let mut lexer = Lexer::new("  a  ");
    assert_eq!(lexer.offset(), 2);
    assert_eq!(lexer.peek().unwrap().map(|s| s.text), Some("a"));
    assert!(!lexer.eat(&Token::Dot));
    lexer.next().unwrap();
    assert_eq!(lexer.peek().unwrap(), None);
    assert_eq!(lexer.offset(), 5);
}
