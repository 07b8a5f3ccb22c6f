/// All lexemes of the Pika language.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    Exec,
    Const,
    Var,
    Print,
    True,
    False,
    Newline, // _n_
    Tab,     // _t_

    // Type keywords
    BoolTy,
    CharTy,
    StringTy,
    IntTy,
    FloatTy,

    // Punctuators
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Gt,           // >
    GtEq,         // >=
    Lt,           // <
    LtEq,         // <=
    EqEq,         // ==
    NotEq,        // !=
    Assign,       // :=
    Comma,        // ,
    Semicolon,    // ;
    Dot,          // .
    LBrace,       // {
    RBrace,       // }
    LParen,       // (
    RParen,       // )
    LBracket,     // [
    RBracket,     // ]
    AndAnd,       // &&
    OrOr,         // ||
    Bang,         // !
    Pipe,         // |

    // Literals
    Integer(i32),
    Floating(f64),
    Character(u8),
    Str(String),
    Ident(String),

    // End of file
    Eof,
}

impl Lexeme {
    /// Try to match an identifier string to a keyword or type lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "exec" => Some(Lexeme::Exec),
            "const" => Some(Lexeme::Const),
            "var" => Some(Lexeme::Var),
            "print" => Some(Lexeme::Print),
            "true" => Some(Lexeme::True),
            "false" => Some(Lexeme::False),
            "_n_" => Some(Lexeme::Newline),
            "_t_" => Some(Lexeme::Tab),
            "bool" => Some(Lexeme::BoolTy),
            "char" => Some(Lexeme::CharTy),
            "string" => Some(Lexeme::StringTy),
            "int" => Some(Lexeme::IntTy),
            "float" => Some(Lexeme::FloatTy),
            _ => None,
        }
    }

    /// Whether a `+`/`-` right after this lexeme is a binary operator
    /// rather than the sign of a numeric literal.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Lexeme::Integer(_)
                | Lexeme::Floating(_)
                | Lexeme::Character(_)
                | Lexeme::Str(_)
                | Lexeme::Ident(_)
                | Lexeme::True
                | Lexeme::False
                | Lexeme::RParen
                | Lexeme::RBracket
        )
    }

    /// Human-readable description for error messages.
    pub fn description(&self) -> String {
        match self {
            Lexeme::Exec => "'exec'".into(),
            Lexeme::Const => "'const'".into(),
            Lexeme::Var => "'var'".into(),
            Lexeme::Print => "'print'".into(),
            Lexeme::True => "'true'".into(),
            Lexeme::False => "'false'".into(),
            Lexeme::Newline => "'_n_'".into(),
            Lexeme::Tab => "'_t_'".into(),
            Lexeme::BoolTy => "'bool'".into(),
            Lexeme::CharTy => "'char'".into(),
            Lexeme::StringTy => "'string'".into(),
            Lexeme::IntTy => "'int'".into(),
            Lexeme::FloatTy => "'float'".into(),
            Lexeme::Plus => "'+'".into(),
            Lexeme::Minus => "'-'".into(),
            Lexeme::Star => "'*'".into(),
            Lexeme::Slash => "'/'".into(),
            Lexeme::Gt => "'>'".into(),
            Lexeme::GtEq => "'>='".into(),
            Lexeme::Lt => "'<'".into(),
            Lexeme::LtEq => "'<='".into(),
            Lexeme::EqEq => "'=='".into(),
            Lexeme::NotEq => "'!='".into(),
            Lexeme::Assign => "':='".into(),
            Lexeme::Comma => "','".into(),
            Lexeme::Semicolon => "';'".into(),
            Lexeme::Dot => "'.'".into(),
            Lexeme::LBrace => "'{'".into(),
            Lexeme::RBrace => "'}'".into(),
            Lexeme::LParen => "'('".into(),
            Lexeme::RParen => "')'".into(),
            Lexeme::LBracket => "'['".into(),
            Lexeme::RBracket => "']'".into(),
            Lexeme::AndAnd => "'&&'".into(),
            Lexeme::OrOr => "'||'".into(),
            Lexeme::Bang => "'!'".into(),
            Lexeme::Pipe => "'|'".into(),
            Lexeme::Integer(n) => format!("integer {}", n),
            Lexeme::Floating(x) => format!("floating {}", x),
            Lexeme::Character(c) => format!("character ^{}^", *c as char),
            Lexeme::Str(_) => "string literal".into(),
            Lexeme::Ident(name) => format!("identifier '{}'", name),
            Lexeme::Eof => "end of file".into(),
        }
    }
}
