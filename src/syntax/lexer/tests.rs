use super::*;

fn lex(source: &str) -> Vec<Lexeme> {
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert!(diags.is_empty(), "unexpected lex errors: {:?}", diags);
    tokens.into_iter().map(|t| t.node).collect()
}

fn lex_errors(source: &str) -> (Vec<Lexeme>, Vec<Diagnostic>) {
    let (tokens, diags) = Lexer::new(source).tokenize();
    (tokens.into_iter().map(|t| t.node).collect(), diags)
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        lex("exec const var print _n_ _t_ total$2"),
        vec![
            Lexeme::Exec,
            Lexeme::Const,
            Lexeme::Var,
            Lexeme::Print,
            Lexeme::Newline,
            Lexeme::Tab,
            Lexeme::Ident("total$2".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_type_keywords() {
    assert_eq!(
        lex("[x | float]"),
        vec![
            Lexeme::LBracket,
            Lexeme::Ident("x".into()),
            Lexeme::Pipe,
            Lexeme::FloatTy,
            Lexeme::RBracket,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_punctuators() {
    assert_eq!(
        lex(":= == != >= <= > < && || ! , ; ."),
        vec![
            Lexeme::Assign,
            Lexeme::EqEq,
            Lexeme::NotEq,
            Lexeme::GtEq,
            Lexeme::LtEq,
            Lexeme::Gt,
            Lexeme::Lt,
            Lexeme::AndAnd,
            Lexeme::OrOr,
            Lexeme::Bang,
            Lexeme::Comma,
            Lexeme::Semicolon,
            Lexeme::Dot,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        lex("42 3.25 .5 1.5E3 2.0E-1"),
        vec![
            Lexeme::Integer(42),
            Lexeme::Floating(3.25),
            Lexeme::Floating(0.5),
            Lexeme::Floating(1500.0),
            Lexeme::Floating(0.2),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_integer_followed_by_statement_dot() {
    // `1.` ends a statement; it is not a float
    assert_eq!(
        lex("x := 1."),
        vec![
            Lexeme::Ident("x".into()),
            Lexeme::Assign,
            Lexeme::Integer(1),
            Lexeme::Dot,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_sign_binds_to_literal_after_operator() {
    assert_eq!(
        lex("x := -5 * +2."),
        vec![
            Lexeme::Ident("x".into()),
            Lexeme::Assign,
            Lexeme::Integer(-5),
            Lexeme::Star,
            Lexeme::Integer(2),
            Lexeme::Dot,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_sign_is_operator_after_operand() {
    assert_eq!(
        lex("a-1 (b)+2"),
        vec![
            Lexeme::Ident("a".into()),
            Lexeme::Minus,
            Lexeme::Integer(1),
            Lexeme::LParen,
            Lexeme::Ident("b".into()),
            Lexeme::RParen,
            Lexeme::Plus,
            Lexeme::Integer(2),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_integer_extremes() {
    assert_eq!(
        lex("(-2147483648)"),
        vec![
            Lexeme::LParen,
            Lexeme::Integer(i32::MIN),
            Lexeme::RParen,
            Lexeme::Eof
        ]
    );
    let (_, diags) = lex_errors("2147483648");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("does not fit"));
}

#[test]
fn test_malformed_exponent_leaves_e_unconsumed() {
    let (tokens, diags) = lex_errors("1.5Ex");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("exponent"));
    assert_eq!(
        tokens,
        vec![
            Lexeme::Floating(1.5),
            Lexeme::Ident("Ex".into()),
            Lexeme::Eof
        ]
    );
}

#[test]
fn test_characters_and_strings() {
    assert_eq!(
        lex("^a^ ^ ^ \"hello, world\""),
        vec![
            Lexeme::Character(b'a'),
            Lexeme::Character(b' '),
            Lexeme::Str("hello, world".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_unterminated_string() {
    let (tokens, diags) = lex_errors("\"abc\nprint");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("unterminated"));
    assert_eq!(tokens, vec![Lexeme::Print, Lexeme::Eof]);
}

#[test]
fn test_strings_are_printable_ascii() {
    assert_eq!(
        lex("\"it's\""),
        vec![Lexeme::Str("it's".into()), Lexeme::Eof]
    );

    let (tokens, diags) = lex_errors("\"caf\u{e9}\" print");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("non-printable or non-ASCII"));
    assert_eq!(diags[0].span.start, 4);
    assert_eq!(tokens, vec![Lexeme::Print, Lexeme::Eof]);
}

#[test]
fn test_comments() {
    assert_eq!(
        lex("exec # inline # { # to end of line\n}"),
        vec![Lexeme::Exec, Lexeme::LBrace, Lexeme::RBrace, Lexeme::Eof]
    );
}

#[test]
fn test_identifier_length_limit() {
    let long = "a".repeat(33);
    let (tokens, diags) = lex_errors(&long);
    assert_eq!(diags.len(), 1);
    assert_eq!(tokens, vec![Lexeme::Eof]);

    let ok = "a".repeat(32);
    assert_eq!(lex(&ok), vec![Lexeme::Ident(ok.clone()), Lexeme::Eof]);

    let (_, diags) = Lexer::new("abcdef").with_max_identifier_length(4).tokenize();
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_invalid_characters() {
    let (tokens, diags) = lex_errors("x = @ y");
    assert_eq!(diags.len(), 2);
    assert!(diags[0].help.as_deref().unwrap_or("").contains(":="));
    assert_eq!(
        tokens,
        vec![
            Lexeme::Ident("x".into()),
            Lexeme::Ident("y".into()),
            Lexeme::Eof
        ]
    );
}

#[test]
fn test_spans() {
    let (tokens, _) = Lexer::new("exec {\n  x := 10.\n}").tokenize();
    assert_eq!(tokens[0].span, Span::new(0, 4));
    assert_eq!(tokens[2].span, Span::new(9, 10));
    assert_eq!(tokens[4].span, Span::new(14, 16));
}
