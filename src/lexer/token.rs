use std::fmt::Display;

use phf::phf_map;

use crate::parser::Span;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "let" => TokenKind::Let,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "fn" => TokenKind::Fn,
    "return" => TokenKind::Return,
    "print" => TokenKind::Print,
    "int" => TokenKind::Int,
};

pub(super) static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "==" => TokenKind::DoubleEqual,
    "!=" => TokenKind::NotEqual,
    "<=" => TokenKind::LessEqual,
    ">=" => TokenKind::GreaterEqual,
    "->" => TokenKind::Arrow,
};

pub(super) static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    '%' => TokenKind::Percent,
    '<' => TokenKind::LessThan,
    '>' => TokenKind::GreaterThan,
    '=' => TokenKind::Equal,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '{' => TokenKind::OpenCurlyBrace,
    '}' => TokenKind::CloseCurlyBrace,
    ',' => TokenKind::Comma,
    ';' => TokenKind::SemiColon,
    ':' => TokenKind::Colon,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Num(i64),
    Str(String),
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    DoubleEqual,
    NotEqual,

    Equal,
    Arrow,
    OpenParen,
    CloseParen,
    OpenCurlyBrace,
    CloseCurlyBrace,
    Comma,
    SemiColon,
    Colon,

    Let,
    If,
    Else,
    While,
    Fn,
    Return,
    Print,
    Int,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Num(n) => write!(f, "{n}"),
            TokenKind::Str(s) => write!(f, "{s:?}"),
            TokenKind::Ident(name) => write!(f, "identifier '{name}'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::LessThan => write!(f, "'<'"),
            TokenKind::LessEqual => write!(f, "'<='"),
            TokenKind::GreaterThan => write!(f, "'>'"),
            TokenKind::GreaterEqual => write!(f, "'>='"),
            TokenKind::DoubleEqual => write!(f, "'=='"),
            TokenKind::NotEqual => write!(f, "'!='"),
            TokenKind::Equal => write!(f, "'='"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::OpenParen => write!(f, "'('"),
            TokenKind::CloseParen => write!(f, "')'"),
            TokenKind::OpenCurlyBrace => write!(f, "'{{'"),
            TokenKind::CloseCurlyBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::SemiColon => write!(f, "';'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::If => write!(f, "'if'"),
            TokenKind::Else => write!(f, "'else'"),
            TokenKind::While => write!(f, "'while'"),
            TokenKind::Fn => write!(f, "'fn'"),
            TokenKind::Return => write!(f, "'return'"),
            TokenKind::Print => write!(f, "'print'"),
            TokenKind::Int => write!(f, "'int'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}..{}", self.kind, self.span.start, self.span.end)
    }
}
